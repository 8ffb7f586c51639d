//! Postgres-backed repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use crate::domain::aggregates::{Customer, LineItem, Order, OrderStatus, PaymentStatus, Product, Review};
use crate::domain::ports::{CatalogRepository, OrderFilter, OrderRepository, ProductFilter, RepositoryError};
use crate::domain::value_objects::{Money, OrderId, Rating, Slug, ValueError};

fn db_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::DuplicateKey(db.message().to_string()),
        _ => RepositoryError::Storage(e.to_string()),
    }
}

fn corrupt(e: ValueError) -> RepositoryError { RepositoryError::Storage(format!("corrupt row: {e}")) }

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    customer_name: String,
    customer_phone: String,
    customer_email: String,
    shipping_address: String,
    items: Json<Vec<LineItem>>,
    subtotal: Decimal,
    shipping_charge: Decimal,
    total: Decimal,
    currency: String,
    payment_method: String,
    courier_service: String,
    payment_status: String,
    order_status: String,
    gateway_order_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            order_id: OrderId::new(r.order_id).map_err(corrupt)?,
            customer: Customer { name: r.customer_name, phone: r.customer_phone, email: r.customer_email, shipping_address: r.shipping_address },
            items: r.items.0,
            subtotal: Money::new(r.subtotal, &r.currency),
            shipping_charge: Money::new(r.shipping_charge, &r.currency),
            total: Money::new(r.total, &r.currency),
            payment_method: r.payment_method.parse().map_err(corrupt)?,
            courier_service: r.courier_service.parse().map_err(corrupt)?,
            payment_status: r.payment_status.parse().map_err(corrupt)?,
            order_status: r.order_status.parse().map_err(corrupt)?,
            gateway_order_id: r.gateway_order_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            events: vec![],
        })
    }
}

#[derive(Clone)]
pub struct PgOrderRepository { pool: PgPool }

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    async fn update_column(&self, id: &OrderId, sql: &str, value: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(sql).bind(id.as_str()).bind(value).execute(&self.pool).await.map_err(db_error)?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound(id.to_string())); }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, o: &Order) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO orders (order_id, customer_name, customer_phone, customer_email, shipping_address, items, subtotal, shipping_charge, total, currency, payment_method, courier_service, payment_status, order_status, gateway_order_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)")
            .bind(o.order_id().as_str()).bind(&o.customer().name).bind(&o.customer().phone).bind(&o.customer().email).bind(&o.customer().shipping_address)
            .bind(Json(o.items().to_vec())).bind(o.subtotal().amount()).bind(o.shipping_charge().amount()).bind(o.total().amount()).bind(o.total().currency())
            .bind(o.payment_method().as_str()).bind(o.courier_service().as_str()).bind(o.payment_status().as_str()).bind(o.order_status().as_str())
            .bind(o.gateway_order_id()).bind(o.created_at()).bind(o.updated_at())
            .execute(&self.pool).await.map_err(db_error)?;
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE order_id = $1")
            .bind(id.as_str()).fetch_optional(&self.pool).await.map_err(db_error)?
            .map(Order::try_from).transpose()
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let status = filter.order_status.map(|s| s.as_str());
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(|s| format!("%{s}%"));
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE ($1::text IS NULL OR order_status = $1) AND ($2::text IS NULL OR order_id ILIKE $2 OR customer_name ILIKE $2 OR customer_phone LIKE $2) ORDER BY created_at DESC")
            .bind(status).bind(search).fetch_all(&self.pool).await.map_err(db_error)?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        self.update_column(id, "UPDATE orders SET order_status = $2, updated_at = NOW() WHERE order_id = $1", status.as_str()).await
    }

    async fn update_payment_status(&self, id: &OrderId, status: PaymentStatus) -> Result<(), RepositoryError> {
        self.update_column(id, "UPDATE orders SET payment_status = $2, updated_at = NOW() WHERE order_id = $1", status.as_str()).await
    }

    async fn set_gateway_order_id(&self, id: &OrderId, gateway_order_id: &str) -> Result<(), RepositoryError> {
        self.update_column(id, "UPDATE orders SET gateway_order_id = $2, updated_at = NOW() WHERE order_id = $1", gateway_order_id).await
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid, name: String, slug: String, category: String, description: String, benefits: Vec<String>, usage: String,
    original_price: Decimal, offer_price: Decimal, image_url: String, images: Vec<String>, is_combo: bool, in_stock: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: r.id, name: r.name, slug: Slug::from_text(&r.slug).map_err(corrupt)?, category: r.category.parse().map_err(corrupt)?,
            description: r.description, benefits: r.benefits, usage: r.usage, original_price: r.original_price, offer_price: r.offer_price,
            image_url: r.image_url, images: r.images, is_combo: r.is_combo, in_stock: r.in_stock, created_at: r.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow { id: Uuid, product_id: Uuid, customer_name: String, rating: i16, comment: String, created_at: DateTime<Utc> }

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(r: ReviewRow) -> Result<Self, Self::Error> {
        let stars = u8::try_from(r.rating).map_err(|_| corrupt(ValueError::RatingOutOfRange(0)))?;
        Ok(Review { id: r.id, product_id: r.product_id, customer_name: r.customer_name, rating: Rating::new(stars).map_err(corrupt)?, comment: r.comment, created_at: r.created_at })
    }
}

#[derive(Clone)]
pub struct PgCatalogRepository { pool: PgPool }

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE ($1::text IS NULL OR category = $1) AND ($2::bool IS NULL OR is_combo = $2) ORDER BY created_at DESC")
            .bind(filter.category.map(|c| c.as_str())).bind(filter.combo).fetch_all(&self.pool).await.map_err(db_error)?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(db_error)?
            .map(Product::try_from).transpose()
    }

    async fn get_product_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE slug = $1")
            .bind(slug.as_str()).fetch_optional(&self.pool).await.map_err(db_error)?
            .map(Product::try_from).transpose()
    }

    async fn list_reviews(&self, product_id: Uuid) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC")
            .bind(product_id).fetch_all(&self.pool).await.map_err(db_error)?;
        rows.into_iter().map(Review::try_from).collect()
    }

    async fn add_review(&self, r: &Review) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO reviews (id, product_id, customer_name, rating, comment, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(r.id).bind(r.product_id).bind(&r.customer_name).bind(i16::from(r.rating.stars())).bind(&r.comment).bind(r.created_at)
            .execute(&self.pool).await.map_err(db_error)?;
        Ok(())
    }
}
