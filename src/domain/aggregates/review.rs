//! Review Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::domain::value_objects::Rating;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn submit(product_id: Uuid, customer_name: &str, rating: Rating, comment: Option<String>) -> Result<Self, ReviewError> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() { return Err(ReviewError::MissingName); }
        Ok(Self {
            id: Uuid::now_v7(), product_id, customer_name: customer_name.to_string(), rating,
            comment: comment.map(|c| c.trim().to_string()).unwrap_or_default(), created_at: Utc::now(),
        })
    }

    pub fn submitted_event(&self) -> DomainEvent {
        DomainEvent::Catalog(CatalogEvent::ReviewSubmitted { review_id: self.id, product_id: self.product_id, rating: self.rating.stars() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("customer name is required")]
    MissingName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims_fields() {
        let r = Review::submit(Uuid::new_v4(), "  Meera ", Rating::new(4).unwrap(), Some(" lovely ".into())).unwrap();
        assert_eq!(r.customer_name, "Meera");
        assert_eq!(r.comment, "lovely");
    }

    #[test]
    fn test_submit_requires_name() {
        assert_eq!(Review::submit(Uuid::new_v4(), " ", Rating::new(5).unwrap(), None), Err(ReviewError::MissingName));
    }
}
