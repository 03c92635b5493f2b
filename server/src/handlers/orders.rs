use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::dto::{CreateOrderRequest, OrderCreated};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

/// `POST /orders`. The body is read raw so that bad JSON and a bad
/// content type end up as the same `Invalid input data` response.
pub async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let order = CreateOrderRequest::from_slice(&body).validate()?;
    let barcodes = state.orders.create_order(order).await?;

    Ok(success(OrderCreated::new(barcodes)).into_response())
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Response, AppError> {
    let details = state.orders.find_order(order_id).await?;
    Ok(success(details).into_response())
}
