use std::sync::Arc;
use crate::application::{AdminService, CatalogService, CheckoutService, PaymentService};
use crate::config::Config;
use crate::domain::ports::{AdminAuth, CatalogRepository, EmailSender, EventPublisher, OrderRepository, PaymentGateway};
use crate::domain::services::OrderIdGenerator;

/// Adapters picked by `main` (or a test) for each port.
pub struct Ports {
    pub orders: Arc<dyn OrderRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailSender>,
    pub auth: Arc<dyn AdminAuth>,
    pub events: Option<Arc<dyn EventPublisher>>,
}

#[derive(Clone)]
pub struct AppState {
    pub checkout: Arc<CheckoutService>,
    pub payments: Arc<PaymentService>,
    pub admin: Arc<AdminService>,
    pub catalog: Arc<CatalogService>,
    pub auth: Arc<dyn AdminAuth>,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(ports: Ports, config: &Config) -> Self {
        let checkout = CheckoutService::new(ports.orders.clone(), ports.catalog.clone(), ports.gateway.clone(), ports.email)
            .with_events(ports.events.clone())
            .with_id_generator(OrderIdGenerator::new(config.order_id_prefix.clone()))
            .with_max_attempts(config.order_id_max_attempts)
            .with_public_base_url(config.public_base_url.clone());
        Self {
            checkout: Arc::new(checkout),
            payments: Arc::new(PaymentService::new(ports.orders.clone(), ports.gateway, ports.events.clone())),
            admin: Arc::new(AdminService::new(ports.orders, ports.events.clone())),
            catalog: Arc::new(CatalogService::new(ports.catalog, ports.events)),
            auth: ports.auth,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}
