use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::api::error::ApiJson;
use crate::api::state::AppState;
use crate::application::{CheckoutReceipt, CheckoutRequest, OrderConfirmation};
use crate::Result;

pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutReceipt>)> {
    let receipt = state.checkout.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn get_order(State(state): State<AppState>, Path(order_id): Path<String>) -> Result<Json<OrderConfirmation>> {
    state.checkout.order_confirmation(&order_id).await.map(Json)
}
