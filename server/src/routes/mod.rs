use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{
    create_cors_layer, create_propagate_request_id_layer, create_request_id_layer,
    create_security_headers_layer,
};
use crate::handlers::{create_order, get_order, get_ticket, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/orders", post(create_order))
        .route("/orders/:order_id", get(get_order))
        .route("/tickets/:barcode", get(get_ticket))
        .with_state(state)
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .layer(create_propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(create_request_id_layer())
}
