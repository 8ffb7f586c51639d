//! Order confirmation e-mail over the Resend HTTP API.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use crate::config::EmailConfig;
use crate::domain::aggregates::Order;
use crate::domain::ports::{EmailError, EmailSender};
use crate::domain::services::PaymentMethod;
use crate::domain::value_objects::Money;

const RESEND_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
}

pub fn confirmation_subject(order: &Order) -> String {
    format!("Order Confirmed - {}", order.order_id())
}

/// Plain-text confirmation body.
pub fn confirmation_text(order: &Order) -> String {
    let currency = order.total().currency();
    let items: String = order
        .items()
        .iter()
        .map(|item| format!("  {} x{}  {}\n", item.name, item.quantity, Money::new(item.line_total(), currency)))
        .collect();
    let payment = match order.payment_method() {
        PaymentMethod::CashOnDelivery => "Cash on Delivery",
        PaymentMethod::Online => "Paid Online",
    };

    format!(
        "Hi {name},\n\n\
         Thank you for your order! We're preparing it for shipment.\n\n\
         Order ID: {order_id}\n\n\
         {items}\n\
         Subtotal: {subtotal}\n\
         Shipping ({courier}): {shipping}\n\
         Total: {total}\n\n\
         Shipping address: {address}\n\
         Payment method: {payment}\n",
        name = order.customer().name,
        order_id = order.order_id(),
        subtotal = order.subtotal(),
        courier = order.courier_service().as_str().to_uppercase(),
        shipping = order.shipping_charge(),
        total = order.total(),
        address = order.customer().shipping_address,
    )
}

pub struct ResendEmailSender {
    client: reqwest::Client,
    config: EmailConfig,
}

impl ResendEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), EmailError> {
        let body = SendEmailBody {
            from: &self.config.from,
            to: [order.customer().email.as_str()],
            subject: confirmation_subject(order),
            text: confirmation_text(order),
        };
        let response = self.client
            .post(RESEND_URL)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(10))
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Delivery(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::Delivery(format!("{status}: {detail}")));
        }
        Ok(())
    }
}

pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send_order_confirmation(&self, _order: &Order) -> Result<(), EmailError> {
        Err(EmailError::NotConfigured)
    }
}
