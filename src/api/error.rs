use axum::{
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use crate::domain::ports::RepositoryError;
use crate::StorefrontError;

impl StorefrontError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::MalformedBody(_)
            | Self::Pricing(_)
            | Self::Cart(_)
            | Self::Review(_)
            | Self::Value(_)
            | Self::OutOfStock(_) => StatusCode::BAD_REQUEST,
            Self::ProductNotFound(_) | Self::OrderNotFound(_) | Self::Repository(RepositoryError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::IdentifierCollision(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = if status.is_server_error() {
            tracing::error!("Internal Server Error: {}", self);
            match self {
                Self::IdentifierCollision(_) => "Could not allocate an order id, please retry".to_string(),
                _ => "Internal Server Error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// `Json` extractor whose rejections come back as a 400 with the usual `{"error": ..}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(StorefrontError))]
pub struct ApiJson<T>(pub T);
