//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("order id is empty")]
    EmptyOrderId,
    #[error("slug is empty")]
    EmptySlug,
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Money value object. Amounts are exact decimals; rounding only happens in [`Money::display`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn inr(amount: Decimal) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }

    /// Rupee display: whole units, Indian digit grouping (`₹1,23,456`).
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().trunc().to_string();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let symbol = if self.currency == DEFAULT_CURRENCY { "₹".to_string() } else { format!("{} ", self.currency) };
        format!("{sign}{symbol}{}", group_indian(&digits))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.display()) }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Human-readable order identifier, e.g. `XCLZ3K8Q2A7F9`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() { return Err(ValueError::EmptyOrderId); }
        Ok(Self(value))
    }
    /// Already uppercase and non-empty.
    pub(crate) fn from_generated(value: String) -> Self { Self(value) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// URL slug derived from a product name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn from_text(text: &str) -> Result<Self, ValueError> {
        let kept: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .collect();
        let slug = kept.split_whitespace().collect::<Vec<_>>().join("-");
        if slug.is_empty() { return Err(ValueError::EmptySlug); }
        Ok(Self(slug))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Review rating in stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(stars: u8) -> Result<Self, ValueError> {
        if !(1..=5).contains(&stars) { return Err(ValueError::RatingOutOfRange(stars)); }
        Ok(Self(stars))
    }
    pub fn stars(&self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
    type Error = ValueError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self { r.0 }
}
