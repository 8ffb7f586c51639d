//! In-memory repositories, used when no `DATABASE_URL` is configured and in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::domain::aggregates::{Category, Order, OrderStatus, PaymentStatus, Product, Review};
use crate::domain::ports::{CatalogRepository, OrderFilter, OrderRepository, ProductFilter, RepositoryError};
use crate::domain::value_objects::{OrderId, Slug, ValueError};

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self { Self::default() }

    async fn modify<F>(&self, id: &OrderId, f: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Order),
    {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        f(order);
        // events belong to the caller's copy, not the stored one
        order.take_events();
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(order.order_id()) {
            return Err(RepositoryError::DuplicateKey(order.order_id().to_string()));
        }
        let mut stored = order.clone();
        stored.take_events();
        orders.insert(order.order_id().clone(), stored);
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| filter.order_status.map_or(true, |s| o.order_status() == s))
            .filter(|o| filter.search.as_deref().map_or(true, |q| o.matches_search(q)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        self.modify(id, |o| { o.set_order_status(status); }).await
    }

    async fn update_payment_status(&self, id: &OrderId, status: PaymentStatus) -> Result<(), RepositoryError> {
        self.modify(id, |o| { o.set_payment_status(status); }).await
    }

    async fn set_gateway_order_id(&self, id: &OrderId, gateway_order_id: &str) -> Result<(), RepositoryError> {
        self.modify(id, |o| o.attach_gateway_order(gateway_order_id)).await
    }
}

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<Vec<Product>>,
    reviews: RwLock<Vec<Review>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self { Self::default() }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products), reviews: RwLock::default() }
    }

    /// Loads a catalog from a JSON array of [`ProductSeed`]s.
    pub fn from_seed_json(json: &str) -> Result<Self, SeedError> {
        let seeds: Vec<ProductSeed> = serde_json::from_str(json)?;
        let products = seeds.into_iter().map(ProductSeed::into_product).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_products(products))
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// One catalog entry in a seed file. Ids, slugs and timestamps are derived.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub category: Category,
    pub original_price: Decimal,
    pub offer_price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

fn in_stock_default() -> bool { true }

impl ProductSeed {
    fn into_product(self) -> Result<Product, ValueError> {
        let mut product = Product::create(self.name, self.category, self.original_price, self.offer_price)?;
        product.description = self.description;
        product.benefits = self.benefits;
        product.usage = self.usage;
        if !self.image_url.is_empty() {
            product.images = vec![self.image_url.clone()];
        }
        product.image_url = self.image_url;
        product.in_stock = self.in_stock;
        Ok(product)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .iter()
            .filter(|p| filter.category.map_or(true, |c| p.category == c))
            .filter(|p| filter.combo.map_or(true, |combo| p.is_combo == combo))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn get_product_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().await.iter().find(|p| &p.slug == slug).cloned())
    }

    async fn list_reviews(&self, product_id: Uuid) -> Result<Vec<Review>, RepositoryError> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews.iter().filter(|r| r.product_id == product_id).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn add_review(&self, review: &Review) -> Result<(), RepositoryError> {
        self.reviews.write().await.push(review.clone());
        Ok(())
    }
}
