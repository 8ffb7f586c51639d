//! Cashfree PG client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::config::CashfreeConfig;
use crate::domain::ports::{GatewayError, GatewayPaymentStatus, PaymentGateway, PaymentSession, PaymentSessionRequest};
use crate::domain::value_objects::OrderId;

const API_VERSION: &str = "2023-08-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    order_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    order_amount: Decimal,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
    order_meta: OrderMeta<'a>,
}

#[derive(Debug, Serialize)]
struct CustomerDetails<'a> {
    customer_id: String,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderMeta<'a> {
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    cf_order_id: Option<serde_json::Value>,
    payment_session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    payment_status: String,
}

pub struct CashfreeGateway {
    client: reqwest::Client,
    config: CashfreeConfig,
}

impl CashfreeGateway {
    pub fn new(config: CashfreeConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.environment.base_url(), path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .timeout(REQUEST_TIMEOUT)
            .header("x-client-id", &self.config.app_id)
            .header("x-client-secret", &self.config.secret_key)
            .header("x-api-version", API_VERSION)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = self.request(builder).send().await.map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

/// Maps a Cashfree payment status string onto the attempt outcome.
pub fn parse_payment_status(raw: &str) -> GatewayPaymentStatus {
    match raw {
        "SUCCESS" => GatewayPaymentStatus::Success,
        "PENDING" | "NOT_ATTEMPTED" => GatewayPaymentStatus::Pending,
        _ => GatewayPaymentStatus::Failed,
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    async fn create_payment_session(&self, request: &PaymentSessionRequest) -> Result<PaymentSession, GatewayError> {
        let body = CreateOrderBody {
            order_id: request.order_id.as_str(),
            order_amount: request.amount,
            order_currency: &request.currency,
            customer_details: CustomerDetails {
                customer_id: format!("cust_{}", request.order_id),
                customer_name: &request.customer.name,
                customer_email: &request.customer.email,
                customer_phone: &request.customer.phone,
            },
            order_meta: OrderMeta { return_url: &request.return_url },
        };
        let response = self.send(self.client.post(self.url("/pg/orders")).json(&body)).await?;
        let created: CreateOrderResponse = response.json().await.map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let session_id = created
            .payment_session_id
            .ok_or_else(|| GatewayError::InvalidResponse("missing payment_session_id".into()))?;
        let gateway_order_id = created.cf_order_id.map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        tracing::debug!(order_id = %request.order_id, "created payment session");
        Ok(PaymentSession { session_id, gateway_order_id })
    }

    async fn fetch_payment_status(&self, order_id: &OrderId) -> Result<Vec<GatewayPaymentStatus>, GatewayError> {
        let url = self.url(&format!("/pg/orders/{}/payments", order_id));
        let response = self.send(self.client.get(url)).await?;
        let payments: Vec<PaymentEntity> = response.json().await.map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(payments.iter().map(|p| parse_payment_status(&p.payment_status)).collect())
    }
}

/// Stand-in used when no gateway credentials are configured; every online
/// order falls back to cash on delivery.
pub struct DisabledGateway;

#[async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_payment_session(&self, _request: &PaymentSessionRequest) -> Result<PaymentSession, GatewayError> {
        Err(GatewayError::NotConfigured)
    }

    async fn fetch_payment_status(&self, _order_id: &OrderId) -> Result<Vec<GatewayPaymentStatus>, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
