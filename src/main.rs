//! XCosmetic Storefront - order pricing, checkout and back office

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xcosmetic_storefront::api::{self, AppState, Ports};
use xcosmetic_storefront::domain::ports::{
    CatalogRepository, EmailSender, EventPublisher, OrderRepository, PaymentGateway,
};
use xcosmetic_storefront::infrastructure::{
    CashfreeGateway, DisabledEmailSender, DisabledGateway, InMemoryCatalogRepository, InMemoryOrderRepository,
    NatsEventPublisher, PgCatalogRepository, PgOrderRepository, ResendEmailSender, StaticTokenAuth,
};
use xcosmetic_storefront::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env();

    let (orders, catalog): (Arc<dyn OrderRepository>, Arc<dyn CatalogRepository>) = match &config.database_url {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            let orders: Arc<dyn OrderRepository> = Arc::new(PgOrderRepository::new(db.clone()));
            let catalog: Arc<dyn CatalogRepository> = Arc::new(PgCatalogRepository::new(db));
            (orders, catalog)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            let catalog = match &config.catalog_seed_file {
                Some(path) => {
                    let json = tokio::fs::read_to_string(path).await?;
                    let catalog = InMemoryCatalogRepository::from_seed_json(&json)?;
                    tracing::info!(path = %path, "seeded in-memory catalog");
                    catalog
                }
                None => {
                    tracing::warn!("CATALOG_SEED_FILE not set, the in-memory catalog is empty and checkout will reject every item");
                    InMemoryCatalogRepository::new()
                }
            };
            let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
            let catalog: Arc<dyn CatalogRepository> = Arc::new(catalog);
            (orders, catalog)
        }
    };

    let events: Option<Arc<dyn EventPublisher>> = match &config.nats_url {
        Some(url) => match NatsEventPublisher::connect(url).await {
            Ok(publisher) => Some(Arc::new(publisher) as Arc<dyn EventPublisher>),
            Err(e) => {
                tracing::warn!(error = %e, "NATS unavailable, domain events disabled");
                None
            }
        },
        None => None,
    };

    let gateway: Arc<dyn PaymentGateway> = match config.cashfree.clone() {
        Some(cashfree) => Arc::new(CashfreeGateway::new(cashfree)),
        None => {
            tracing::warn!("Cashfree credentials missing, online orders will fall back to COD");
            Arc::new(DisabledGateway)
        }
    };

    let email: Arc<dyn EmailSender> = match config.email.clone() {
        Some(email) => Arc::new(ResendEmailSender::new(email)),
        None => Arc::new(DisabledEmailSender),
    };

    let ports = Ports {
        orders, catalog, gateway, email,
        auth: Arc::new(StaticTokenAuth::new(config.admin_token.clone())),
        events,
    };
    let app = api::router(AppState::new(ports, &config));

    tracing::info!("🚀 XCosmetic Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
