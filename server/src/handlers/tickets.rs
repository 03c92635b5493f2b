use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Response, AppError> {
    let ticket = state.orders.find_ticket(&barcode).await?;
    Ok(success(ticket).into_response())
}
