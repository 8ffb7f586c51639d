use axum::{
    extract::{Path, Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::Deserialize;
use crate::api::error::ApiJson;
use crate::api::state::AppState;
use crate::application::OrderStats;
use crate::domain::aggregates::{Order, OrderStatus, PaymentStatus};
use crate::domain::ports::{AdminUser, OrderFilter};
use crate::{Result, StorefrontError};

// ============================================================================
// Admin Authentication Middleware
// ============================================================================

pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StorefrontError::Unauthorized)?;

    let admin = state.auth.authorize(token.trim()).await.ok_or(StorefrontError::Unauthorized)?;
    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusUpdate {
    pub payment_status: PaymentStatus,
}

pub async fn list_orders(State(state): State<AppState>, Query(filter): Query<OrderFilter>) -> Result<Json<Vec<Order>>> {
    state.admin.list_orders(&filter).await.map(Json)
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<OrderStats>> {
    state.admin.stats().await.map(Json)
}

pub async fn get_order(State(state): State<AppState>, Path(order_id): Path<String>) -> Result<Json<Order>> {
    state.admin.get_order(&order_id).await.map(Json)
}

pub async fn set_order_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(order_id): Path<String>,
    ApiJson(update): ApiJson<OrderStatusUpdate>,
) -> Result<Json<Order>> {
    tracing::info!(admin = %admin.name, order_id = %order_id, order_status = %update.order_status, "admin order status change");
    state.admin.set_order_status(&order_id, update.order_status).await.map(Json)
}

pub async fn set_payment_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(order_id): Path<String>,
    ApiJson(update): ApiJson<PaymentStatusUpdate>,
) -> Result<Json<Order>> {
    tracing::info!(admin = %admin.name, order_id = %order_id, payment_status = %update.payment_status, "admin payment status change");
    state.admin.set_payment_status(&order_id, update.payment_status).await.map(Json)
}
