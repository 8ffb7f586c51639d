//! Ports to the collaborators around the core: order and catalog storage,
//! the payment gateway, transactional e-mail, admin auth and event publishing.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::domain::aggregates::{Category, Customer, Order, OrderStatus, PaymentStatus, Product, Review};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{OrderId, Slug};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub order_status: Option<OrderStatus>,
    pub search: Option<String>,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order. Fails with `DuplicateKey` if the order id is taken.
    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError>;

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Newest first.
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RepositoryError>;

    async fn update_payment_status(&self, id: &OrderId, status: PaymentStatus) -> Result<(), RepositoryError>;

    async fn set_gateway_order_id(&self, id: &OrderId, gateway_order_id: &str) -> Result<(), RepositoryError>;
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub combo: Option<bool>,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError>;
    async fn get_product_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError>;
    async fn list_reviews(&self, product_id: Uuid) -> Result<Vec<Review>, RepositoryError>;
    async fn add_review(&self, review: &Review) -> Result<(), RepositoryError>;
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway is not configured")]
    NotConfigured,
    #[error("payment gateway unreachable: {0}")]
    Unreachable(String),
    #[error("payment gateway rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected payment gateway response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone, Debug)]
pub struct PaymentSessionRequest {
    pub order_id: OrderId,
    pub amount: Decimal,
    pub currency: String,
    pub customer: Customer,
    pub return_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub session_id: String,
    pub gateway_order_id: Option<String>,
}

/// Outcome of one payment attempt as reported by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayPaymentStatus { Success, Failed, Pending }

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_session(&self, request: &PaymentSessionRequest) -> Result<PaymentSession, GatewayError>;

    /// Payment attempts for the order, oldest first.
    async fn fetch_payment_status(&self, order_id: &OrderId) -> Result<Vec<GatewayPaymentStatus>, GatewayError>;
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("e-mail sender is not configured")]
    NotConfigured,
    #[error("e-mail delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), EmailError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub name: String,
}

#[async_trait]
pub trait AdminAuth: Send + Sync {
    async fn authorize(&self, bearer_token: &str) -> Option<AdminUser>;
}

#[derive(Debug, Error)]
#[error("event publish failed: {0}")]
pub struct PublishError(pub String);

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError>;
}
