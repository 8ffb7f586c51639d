//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod review;

pub use product::{Category, Product};
pub use order::{Customer, Order, OrderStatus, PaymentStatus};
pub use cart::{Cart, CartError, LineItem};
pub use review::{Review, ReviewError};
