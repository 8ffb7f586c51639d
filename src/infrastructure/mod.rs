//! Adapters for the domain ports.
pub mod auth;
pub mod cashfree;
pub mod email;
pub mod memory;
pub mod nats;
pub mod postgres;

pub use auth::StaticTokenAuth;
pub use cashfree::{CashfreeGateway, DisabledGateway};
pub use email::{DisabledEmailSender, ResendEmailSender};
pub use memory::{InMemoryCatalogRepository, InMemoryOrderRepository, SeedError};
pub use nats::NatsEventPublisher;
pub use postgres::{PgCatalogRepository, PgOrderRepository};
