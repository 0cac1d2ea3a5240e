//! NATS message producer for score events

use crate::types::ScoreEvent;
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing score events to NATS
#[derive(Clone)]
pub struct ScoreEventProducer {
    client: Client,
    subject: String,
}

impl ScoreEventProducer {
    /// Create a new score event producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a score event
    pub async fn publish(&self, event: &ScoreEvent) -> Result<()> {
        let payload = serde_json::to_vec(event)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            event_id = %event.event_id,
            wallet = %event.wallet_address,
            credit_score = event.result.credit_score,
            "Published score event"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
