//! XCosmetic Storefront
//!
//! Backend for a small cosmetics storefront.
//!
//! ## Features
//! - Product catalog, best deals and reviews
//! - Checkout pricing: subtotal, shipping by payment method and courier, total
//! - Online (gateway) and cash-on-delivery order placement
//! - Payment callback reconciliation
//! - Admin order management

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

use thiserror::Error;
use crate::domain::aggregates::{CartError, ReviewError};
use crate::domain::ports::RepositoryError;
use crate::domain::services::PricingError;
use crate::domain::value_objects::ValueError;

pub use crate::config::Config;
pub use crate::domain::aggregates::{Cart, LineItem, Order, OrderStatus, PaymentStatus};
pub use crate::domain::services::{CourierService, OrderIdGenerator, PaymentMethod, PricingResult};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] axum::extract::rejection::JsonRejection),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("product out of stock: {0}")]
    OutOfStock(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("could not allocate a unique order id after {0} attempts")]
    IdentifierCollision(u32),

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
