use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub order_id: Option<String>,
}

/// Gateway return URL. Always answers with a redirect into the storefront.
pub async fn callback(State(state): State<AppState>, Query(params): Query<CallbackParams>) -> Redirect {
    let outcome = state.payments.handle_callback(params.order_id.as_deref()).await;
    Redirect::to(&format!("{}{}", state.public_base_url, outcome.redirect_path()))
}
