use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use xcosmetic_storefront::api::{self, AppState, Ports};
use xcosmetic_storefront::domain::aggregates::{Category, Product};
use xcosmetic_storefront::domain::ports::{
    GatewayError, GatewayPaymentStatus, PaymentGateway, PaymentSession, PaymentSessionRequest,
};
use xcosmetic_storefront::domain::value_objects::OrderId;
use xcosmetic_storefront::infrastructure::{
    DisabledEmailSender, InMemoryCatalogRepository, InMemoryOrderRepository, StaticTokenAuth,
};
use xcosmetic_storefront::Config;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Opens a session for every order and reports a fixed list of payment attempts.
pub struct StubGateway {
    pub attempts: Vec<GatewayPaymentStatus>,
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment_session(&self, request: &PaymentSessionRequest) -> Result<PaymentSession, GatewayError> {
        Ok(PaymentSession {
            session_id: format!("session_{}", request.order_id),
            gateway_order_id: Some(format!("cf_{}", request.order_id)),
        })
    }

    async fn fetch_payment_status(&self, _order_id: &OrderId) -> Result<Vec<GatewayPaymentStatus>, GatewayError> {
        Ok(self.attempts.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub lip_balm: Product,
    pub combo: Product,
}

pub fn test_app(gateway: Arc<dyn PaymentGateway>) -> TestApp {
    let lip_balm = Product::create("Rose Lip Balm", Category::Lipcare, Decimal::from(700), Decimal::from(500)).unwrap();
    let combo = Product::create("Glow Combo", Category::Combo, Decimal::from(2000), Decimal::from(900)).unwrap();
    let catalog = InMemoryCatalogRepository::with_products(vec![lip_balm.clone(), combo.clone()]);

    let ports = Ports {
        orders: Arc::new(InMemoryOrderRepository::new()),
        catalog: Arc::new(catalog),
        gateway,
        email: Arc::new(DisabledEmailSender),
        auth: Arc::new(StaticTokenAuth::new(Some(ADMIN_TOKEN.to_string()))),
        events: None,
    };
    let router = api::router(AppState::new(ports, &Config::default()));
    TestApp { router, lip_balm, combo }
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Status, headers and the body as JSON (`Null` when empty or not JSON).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}
