//! Pure domain services
pub mod order_id;
pub mod pricing;

pub use order_id::OrderIdGenerator;
pub use pricing::{normalize_courier, resolve, CourierService, PaymentMethod, PricingError, PricingResult};
