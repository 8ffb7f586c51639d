//! Domain event publishing over NATS.

use async_trait::async_trait;
use crate::domain::events::DomainEvent;
use crate::domain::ports::{EventPublisher, PublishError};

pub struct NatsEventPublisher {
    client: async_nats::Client,
}

impl NatsEventPublisher {
    pub fn new(client: async_nats::Client) -> Self { Self { client } }

    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        let client = async_nats::connect(url).await.map_err(|e| PublishError(e.to_string()))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl EventPublisher for NatsEventPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event).map_err(|e| PublishError(e.to_string()))?;
        self.client
            .publish(event.subject().to_string(), payload.into())
            .await
            .map_err(|e| PublishError(e.to_string()))
    }
}
