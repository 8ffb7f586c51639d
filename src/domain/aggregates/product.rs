//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use crate::domain::value_objects::{Money, Slug, ValueError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category { Skincare, Haircare, Lipcare, Combo }

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Skincare => "skincare", Self::Haircare => "haircare", Self::Lipcare => "lipcare", Self::Combo => "combo" }
    }
}

impl FromStr for Category {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skincare" => Ok(Self::Skincare),
            "haircare" => Ok(Self::Haircare),
            "lipcare" => Ok(Self::Lipcare),
            "combo" => Ok(Self::Combo),
            other => Err(ValueError::UnknownVariant { kind: "category", value: other.to_string() }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: Slug,
    pub category: Category,
    pub description: String,
    pub benefits: Vec<String>,
    pub usage: String,
    pub original_price: Decimal,
    pub offer_price: Decimal,
    pub image_url: String,
    pub images: Vec<String>,
    pub is_combo: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn create(name: impl Into<String>, category: Category, original_price: Decimal, offer_price: Decimal) -> Result<Self, ValueError> {
        let name = name.into();
        let slug = Slug::from_text(&name)?;
        Ok(Self {
            id: Uuid::now_v7(), name, slug, category, description: String::new(), benefits: vec![],
            usage: String::new(), original_price, offer_price, image_url: String::new(), images: vec![],
            is_combo: category == Category::Combo, in_stock: true, created_at: Utc::now(),
        })
    }

    pub fn price(&self) -> Money { Money::inr(self.offer_price) }

    /// Whole-percent saving of the offer price against the original price.
    pub fn discount_percent(&self) -> i64 {
        discount_percent(self.original_price, self.offer_price)
    }
}

pub fn discount_percent(original: Decimal, offer: Decimal) -> i64 {
    if original <= Decimal::ZERO {
        return 0;
    }
    let pct = (original - offer) / original * Decimal::ONE_HUNDRED;
    // matches JS Math.round: halves go towards +infinity
    let rounded = pct.round_dp_with_strategy(0, RoundingStrategy::MidpointTowardZero);
    let rounded = if pct - rounded == Decimal::new(5, 1) { rounded + Decimal::ONE } else { rounded };
    i64::try_from(rounded).unwrap_or_default()
}

/// Non-combo products, biggest discount first.
pub fn best_deals(products: &[Product], limit: usize) -> Vec<Product> {
    let mut deals: Vec<Product> = products.iter().filter(|p| !p.is_combo).cloned().collect();
    deals.sort_by(|a, b| {
        let da = deal_ratio(a);
        let db = deal_ratio(b);
        db.cmp(&da)
    });
    deals.truncate(limit);
    deals
}

fn deal_ratio(p: &Product) -> Decimal {
    if p.original_price <= Decimal::ZERO { return Decimal::ZERO; }
    (p.original_price - p.offer_price) / p.original_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_create() {
        let p = Product::create("Rose Face Serum", Category::Skincare, Decimal::from(999), Decimal::from(599)).unwrap();
        assert_eq!(p.slug.as_str(), "rose-face-serum");
        assert_eq!(p.price().amount(), Decimal::from(599));
        assert!(!p.is_combo);
        assert!(p.in_stock);
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(Decimal::from(999), Decimal::from(599)), 40);
        assert_eq!(discount_percent(Decimal::from(200), Decimal::from(199)), 1);
        assert_eq!(discount_percent(Decimal::from(200), Decimal::from(202)), -1);
        assert_eq!(discount_percent(Decimal::from(200), Decimal::from(99)), 51);
        assert_eq!(discount_percent(Decimal::ZERO, Decimal::from(10)), 0);
    }

    #[test]
    fn test_discount_rounds_halves_up() {
        // 12.5% off
        assert_eq!(discount_percent(Decimal::from(200), Decimal::from(175)), 13);
        // -12.5% rounds to -12 like Math.round
        assert_eq!(discount_percent(Decimal::from(200), Decimal::from(225)), -12);
    }

    #[test]
    fn test_best_deals_skips_combos() {
        let a = Product::create("Serum", Category::Skincare, Decimal::from(1000), Decimal::from(900)).unwrap();
        let b = Product::create("Balm", Category::Lipcare, Decimal::from(1000), Decimal::from(500)).unwrap();
        let c = Product::create("Glow Kit", Category::Combo, Decimal::from(1000), Decimal::from(100)).unwrap();
        let deals = best_deals(&[a, b.clone(), c], 10);
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].id, b.id);
    }
}
