//! Order pricing and fulfillment-option resolution.
//!
//! Everything in here is pure: a cart, a payment method and a courier go in,
//! amounts and the initial status pair come out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use crate::domain::aggregates::cart::Cart;
use crate::domain::aggregates::order::{OrderStatus, PaymentStatus};
use crate::domain::value_objects::{Money, ValueError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Online => "online", Self::CashOnDelivery => "cod" }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PaymentMethod {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "cod" => Ok(Self::CashOnDelivery),
            other => Err(ValueError::UnknownVariant { kind: "payment method", value: other.to_string() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourierService {
    /// DTDC, paid and fast.
    #[serde(rename = "dtdc")]
    ExpressCourier,
    /// India Post.
    #[serde(rename = "postal")]
    PostalService,
}

impl CourierService {
    pub fn as_str(&self) -> &'static str {
        match self { Self::ExpressCourier => "dtdc", Self::PostalService => "postal" }
    }

    /// Courier used when the buyer did not pick one.
    pub fn default_for(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Online => Self::ExpressCourier,
            PaymentMethod::CashOnDelivery => Self::PostalService,
        }
    }
}

impl fmt::Display for CourierService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for CourierService {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dtdc" => Ok(Self::ExpressCourier),
            "postal" => Ok(Self::PostalService),
            other => Err(ValueError::UnknownVariant { kind: "courier service", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("invalid cart: {0}")]
    InvalidCart(String),
    #[error("{courier} is not available for {method} orders")]
    InvalidFulfillmentCombination { method: PaymentMethod, courier: CourierService },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: Money,
    pub shipping_charge: Money,
    pub total: Money,
    pub initial_payment_status: PaymentStatus,
    pub initial_order_status: OrderStatus,
}

/// Fixed shipping table. Cash on delivery ships by post only.
pub fn shipping_charge(method: PaymentMethod, courier: CourierService) -> Result<Decimal, PricingError> {
    match (method, courier) {
        (PaymentMethod::CashOnDelivery, CourierService::PostalService) => Ok(Decimal::from(100)),
        (PaymentMethod::Online, CourierService::ExpressCourier) => Ok(Decimal::from(60)),
        (PaymentMethod::Online, CourierService::PostalService) => Ok(Decimal::ZERO),
        (PaymentMethod::CashOnDelivery, CourierService::ExpressCourier) => {
            Err(PricingError::InvalidFulfillmentCombination { method, courier })
        }
    }
}

/// Lenient counterpart of the strict check in [`resolve`]: cash on delivery
/// always ships by post, whatever was requested.
pub fn normalize_courier(method: PaymentMethod, requested: CourierService) -> CourierService {
    match method {
        PaymentMethod::CashOnDelivery => CourierService::PostalService,
        PaymentMethod::Online => requested,
    }
}

fn validate_cart(cart: &Cart) -> Result<(), PricingError> {
    if cart.is_empty() {
        return Err(PricingError::InvalidCart("cart is empty".into()));
    }
    for item in cart.items() {
        if item.quantity < 1 {
            return Err(PricingError::InvalidCart(format!("quantity for {} must be at least 1", item.product_id)));
        }
        if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
            return Err(PricingError::InvalidCart(format!("unit price for {} is negative", item.product_id)));
        }
    }
    Ok(())
}

pub fn resolve(cart: &Cart, method: PaymentMethod, courier: CourierService) -> Result<PricingResult, PricingError> {
    validate_cart(cart)?;
    let subtotal = cart.subtotal();
    let shipping = Money::inr(shipping_charge(method, courier)?);
    let total = Money::inr(subtotal.amount() + shipping.amount());
    Ok(PricingResult {
        subtotal,
        shipping_charge: shipping,
        total,
        initial_payment_status: PaymentStatus::Pending,
        initial_order_status: OrderStatus::NotYetShipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::LineItem;
    use uuid::Uuid;

    fn cart_of(price: i64, qty: u32) -> Cart {
        Cart::from_items(vec![LineItem::new(Uuid::new_v4(), "Serum", Decimal::from(price), qty)])
    }

    #[test]
    fn test_online_express() {
        let r = resolve(&cart_of(500, 2), PaymentMethod::Online, CourierService::ExpressCourier).unwrap();
        assert_eq!(r.subtotal.amount(), Decimal::from(1000));
        assert_eq!(r.shipping_charge.amount(), Decimal::from(60));
        assert_eq!(r.total.amount(), Decimal::from(1060));
    }

    #[test]
    fn test_online_postal_is_free() {
        let r = resolve(&cart_of(500, 2), PaymentMethod::Online, CourierService::PostalService).unwrap();
        assert_eq!(r.shipping_charge.amount(), Decimal::ZERO);
        assert_eq!(r.total.amount(), Decimal::from(1000));
    }

    #[test]
    fn test_cod_postal() {
        let r = resolve(&cart_of(300, 1), PaymentMethod::CashOnDelivery, CourierService::PostalService).unwrap();
        assert_eq!(r.subtotal.amount(), Decimal::from(300));
        assert_eq!(r.shipping_charge.amount(), Decimal::from(100));
        assert_eq!(r.total.amount(), Decimal::from(400));
    }

    #[test]
    fn test_cod_with_express_is_rejected() {
        let err = resolve(&cart_of(300, 1), PaymentMethod::CashOnDelivery, CourierService::ExpressCourier).unwrap_err();
        assert!(matches!(err, PricingError::InvalidFulfillmentCombination { .. }));
    }

    #[test]
    fn test_cod_normalizes_to_postal_and_costs_100() {
        for requested in [CourierService::ExpressCourier, CourierService::PostalService] {
            let courier = normalize_courier(PaymentMethod::CashOnDelivery, requested);
            assert_eq!(courier, CourierService::PostalService);
            let r = resolve(&cart_of(300, 1), PaymentMethod::CashOnDelivery, courier).unwrap();
            assert_eq!(r.shipping_charge.amount(), Decimal::from(100));
        }
        assert_eq!(normalize_courier(PaymentMethod::Online, CourierService::ExpressCourier), CourierService::ExpressCourier);
    }

    #[test]
    fn test_shipping_table_covers_every_combination() {
        for method in [PaymentMethod::Online, PaymentMethod::CashOnDelivery] {
            for courier in [CourierService::ExpressCourier, CourierService::PostalService] {
                let lenient = shipping_charge(method, normalize_courier(method, courier));
                assert!(lenient.is_ok(), "{method}/{courier}");
            }
        }
    }

    #[test]
    fn test_empty_cart_is_invalid() {
        let err = resolve(&Cart::new(), PaymentMethod::Online, CourierService::PostalService).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCart(_)));
    }

    #[test]
    fn test_malformed_line_items_are_invalid() {
        assert!(resolve(&cart_of(100, 0), PaymentMethod::Online, CourierService::PostalService).is_err());
        assert!(resolve(&cart_of(-1, 1), PaymentMethod::Online, CourierService::PostalService).is_err());
        assert!(resolve(&cart_of(0, 1), PaymentMethod::Online, CourierService::PostalService).is_ok());
    }

    #[test]
    fn test_total_is_exact_sum() {
        let cart = Cart::from_items(vec![
            LineItem::new(Uuid::new_v4(), "A", Decimal::new(19999, 2), 3),
            LineItem::new(Uuid::new_v4(), "B", Decimal::new(1, 2), 7),
        ]);
        let r = resolve(&cart, PaymentMethod::Online, CourierService::ExpressCourier).unwrap();
        assert_eq!(r.subtotal.amount(), Decimal::new(60004, 2));
        assert_eq!(r.total.amount(), r.subtotal.amount() + r.shipping_charge.amount());
    }

    #[test]
    fn test_initial_statuses() {
        for method in [PaymentMethod::Online, PaymentMethod::CashOnDelivery] {
            let r = resolve(&cart_of(10, 1), method, CourierService::PostalService).unwrap();
            assert_eq!(r.initial_payment_status, PaymentStatus::Pending);
            assert_eq!(r.initial_order_status, OrderStatus::NotYetShipped);
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!("cod".parse::<PaymentMethod>().unwrap(), PaymentMethod::CashOnDelivery);
        assert_eq!("dtdc".parse::<CourierService>().unwrap(), CourierService::ExpressCourier);
        assert!("ups".parse::<CourierService>().is_err());
        assert_eq!(serde_json::to_string(&PaymentMethod::Online).unwrap(), "\"online\"");
    }
}
