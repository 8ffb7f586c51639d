//! Product listing, product pages and reviews.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use crate::application::publish_events;
use crate::domain::aggregates::{product, Product, Review};
use crate::domain::ports::{CatalogRepository, EventPublisher, ProductFilter};
use crate::domain::value_objects::{Rating, Slug};
use crate::{Result, StorefrontError};

pub const BEST_DEALS_LIMIT: usize = 6;

#[derive(Clone, Debug, Serialize)]
pub struct ProductSummary {
    #[serde(flatten)]
    pub product: Product,
    pub discount_percent: i64,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        let discount_percent = product.discount_percent();
        Self { product, discount_percent }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub reviews: Vec<Review>,
    pub review_count: usize,
    /// Mean rating to one decimal place, absent without reviews.
    pub average_rating: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 80))]
    pub customer_name: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, events: Option<Arc<dyn EventPublisher>>) -> Self {
        Self { catalog, events }
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductSummary>> {
        let products = self.catalog.list_products(filter).await?;
        Ok(products.into_iter().map(ProductSummary::from).collect())
    }

    pub async fn best_deals(&self, limit: usize) -> Result<Vec<ProductSummary>> {
        let products = self.catalog.list_products(&ProductFilter::default()).await?;
        Ok(product::best_deals(&products, limit).into_iter().map(ProductSummary::from).collect())
    }

    pub async fn product_detail(&self, slug: &str) -> Result<ProductDetail> {
        let product = self.by_slug(slug).await?;
        let reviews = self.catalog.list_reviews(product.id).await?;
        let average_rating = average_rating(&reviews);
        Ok(ProductDetail { summary: product.into(), review_count: reviews.len(), reviews, average_rating })
    }

    pub async fn reviews(&self, slug: &str) -> Result<Vec<Review>> {
        let product = self.by_slug(slug).await?;
        Ok(self.catalog.list_reviews(product.id).await?)
    }

    pub async fn submit_review(&self, request: ReviewRequest) -> Result<Review> {
        request.validate()?;
        let product = self
            .catalog
            .get_product(request.product_id)
            .await?
            .ok_or_else(|| StorefrontError::ProductNotFound(request.product_id.to_string()))?;
        let review = Review::submit(product.id, &request.customer_name, Rating::new(request.rating)?, request.comment)?;
        self.catalog.add_review(&review).await?;
        tracing::info!(product = %product.slug, rating = request.rating, "review submitted");
        publish_events(self.events.as_ref(), vec![review.submitted_event()]).await;
        Ok(review)
    }

    async fn by_slug(&self, slug: &str) -> Result<Product> {
        let slug = Slug::from_text(slug)?;
        self.catalog
            .get_product_by_slug(&slug)
            .await?
            .ok_or_else(|| StorefrontError::ProductNotFound(slug.to_string()))
    }
}

fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.stars())).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::domain::aggregates::Category;
    use crate::infrastructure::InMemoryCatalogRepository;

    fn catalog() -> (CatalogService, Uuid) {
        let serum = Product::create("Vitamin C Serum", Category::Skincare, Decimal::from(1000), Decimal::from(600)).unwrap();
        let oil = Product::create("Onion Hair Oil", Category::Haircare, Decimal::from(500), Decimal::from(450)).unwrap();
        let combo = Product::create("Glow Combo", Category::Combo, Decimal::from(2000), Decimal::from(900)).unwrap();
        let serum_id = serum.id;
        let repo = Arc::new(InMemoryCatalogRepository::with_products(vec![serum, oil, combo]));
        (CatalogService::new(repo, None), serum_id)
    }

    #[tokio::test]
    async fn test_filters_and_discounts() {
        let (svc, _) = catalog();
        let combos = svc.list_products(&ProductFilter { category: None, combo: Some(true) }).await.unwrap();
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].discount_percent, 55);

        let hair = svc.list_products(&ProductFilter { category: Some(Category::Haircare), combo: None }).await.unwrap();
        assert_eq!(hair.len(), 1);
        assert_eq!(hair[0].product.name, "Onion Hair Oil");
    }

    #[tokio::test]
    async fn test_best_deals_skip_combos() {
        let (svc, _) = catalog();
        let deals = svc.best_deals(BEST_DEALS_LIMIT).await.unwrap();
        let names: Vec<&str> = deals.iter().map(|d| d.product.name.as_str()).collect();
        assert_eq!(names, vec!["Vitamin C Serum", "Onion Hair Oil"]);
    }

    #[tokio::test]
    async fn test_reviews_and_average() {
        let (svc, serum_id) = catalog();
        for (name, rating) in [("Anu", 5), ("Ravi", 4), ("Zoya", 4)] {
            let req = ReviewRequest { product_id: serum_id, customer_name: name.into(), rating, comment: Some("nice".into()) };
            svc.submit_review(req).await.unwrap();
        }
        let detail = svc.product_detail("vitamin-c-serum").await.unwrap();
        assert_eq!(detail.review_count, 3);
        assert_eq!(detail.average_rating, Some(4.3));
        assert_eq!(svc.reviews("vitamin-c-serum").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_review_rejections() {
        let (svc, serum_id) = catalog();
        let bad_rating = ReviewRequest { product_id: serum_id, customer_name: "Anu".into(), rating: 6, comment: None };
        assert!(matches!(svc.submit_review(bad_rating).await, Err(StorefrontError::Validation(_))));

        let blank_name = ReviewRequest { product_id: serum_id, customer_name: "   ".into(), rating: 3, comment: None };
        assert!(matches!(svc.submit_review(blank_name).await, Err(StorefrontError::Review(_))));

        let unknown = ReviewRequest { product_id: Uuid::new_v4(), customer_name: "Anu".into(), rating: 3, comment: None };
        assert!(matches!(svc.submit_review(unknown).await, Err(StorefrontError::ProductNotFound(_))));

        assert!(matches!(svc.product_detail("no-such-thing").await, Err(StorefrontError::ProductNotFound(_))));
    }
}
