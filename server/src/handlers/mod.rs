use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod orders;
pub mod tickets;

pub use orders::{create_order, get_order};
pub use tickets::get_ticket;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "ticket-order-api",
    };

    success(payload).into_response()
}
