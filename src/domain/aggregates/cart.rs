//! Cart Aggregate
//!
//! The cart is a plain value handed to checkout by the caller; nothing here is
//! persisted server-side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_id: Uuid, name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self { product_id, name: name.into(), unit_price, quantity }
    }

    pub fn line_total(&self) -> Decimal { self.unit_price * Decimal::from(self.quantity) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Builds a cart as-is, without merging or validation.
    pub fn from_items(items: Vec<LineItem>) -> Self { Self { items } }

    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn into_items(self) -> Vec<LineItem> { self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Adds an item, merging quantities when the product is already present.
    pub fn add_item(&mut self, item: LineItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    pub fn update_quantity(&mut self, product_id: Uuid, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 { return Err(CartError::InvalidQuantity); }
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound(product_id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound(product_id)); }
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn subtotal(&self) -> Money {
        Money::inr(self.items.iter().map(LineItem::line_total).sum())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("item not found in cart: {0}")]
    ItemNotFound(Uuid),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: Uuid, qty: u32) -> LineItem { LineItem::new(id, "Widget", Decimal::new(10, 0), qty) }

    #[test]
    fn test_cart_operations() {
        let id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(widget(id, 2));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().amount(), Decimal::new(20, 0));
        cart.add_item(widget(id, 1));
        assert_eq!(cart.items()[0].quantity, 3); // Merged
    }

    #[test]
    fn test_update_quantity_rejects_zero() {
        let id = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(widget(id, 2));
        assert_eq!(cart.update_quantity(id, 0), Err(CartError::InvalidQuantity));
        cart.update_quantity(id, 5).unwrap();
        assert_eq!(cart.subtotal().amount(), Decimal::new(50, 0));
        assert!(cart.update_quantity(Uuid::new_v4(), 1).is_err());
    }

    #[test]
    fn test_remove_item() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add_item(widget(a, 1));
        cart.add_item(widget(b, 1));
        cart.remove_item(a).unwrap();
        assert_eq!(cart.items()[0].product_id, b);
        assert_eq!(cart.remove_item(a), Err(CartError::ItemNotFound(a)));
        cart.clear();
        assert!(cart.is_empty());
    }
}
