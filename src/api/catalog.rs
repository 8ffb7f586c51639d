use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use crate::api::error::ApiJson;
use crate::api::state::AppState;
use crate::application::catalog::BEST_DEALS_LIMIT;
use crate::application::{ProductDetail, ProductSummary, ReviewRequest};
use crate::domain::aggregates::Review;
use crate::domain::ports::ProductFilter;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct BestDealsParams {
    pub limit: Option<usize>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductSummary>>> {
    state.catalog.list_products(&filter).await.map(Json)
}

pub async fn best_deals(
    State(state): State<AppState>,
    Query(params): Query<BestDealsParams>,
) -> Result<Json<Vec<ProductSummary>>> {
    let limit = params.limit.unwrap_or(BEST_DEALS_LIMIT).min(50);
    state.catalog.best_deals(limit).await.map(Json)
}

pub async fn get_product(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<ProductDetail>> {
    state.catalog.product_detail(&slug).await.map(Json)
}

pub async fn list_reviews(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Vec<Review>>> {
    state.catalog.reviews(&slug).await.map(Json)
}

pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    let review = state.catalog.submit_review(request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
