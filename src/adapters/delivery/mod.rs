//! Code delivery collaborator
//!
//! MFA codes and tracking codes reach patients and doctors by email or SMS.
//! Actual delivery is an external side-effecting system; the core only hands
//! over the payload. The shipped implementation logs the handoff through
//! `tracing` so development and tests need no mail/SMS infrastructure.

use crate::domain::tracking_code::DeliveryChannel;
use crate::domain::Result;
use async_trait::async_trait;

/// Outbound delivery collaborator for one-time codes
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    /// Hand a payload to the delivery system
    ///
    /// # Arguments
    ///
    /// * `channel` - Email or SMS
    /// * `to` - Recipient address for the channel
    /// * `payload` - Message content (contains the code)
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery system rejects the handoff.
    async fn send(&self, channel: DeliveryChannel, to: &str, payload: &str) -> Result<()>;
}

/// Delivery implementation that logs instead of sending
///
/// The payload itself is never logged; only the channel and recipient.
#[derive(Debug, Default)]
pub struct TracingDelivery;

impl TracingDelivery {
    /// Creates a new tracing-backed delivery
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeDelivery for TracingDelivery {
    async fn send(&self, channel: DeliveryChannel, to: &str, payload: &str) -> Result<()> {
        tracing::info!(
            channel = %channel,
            to = %to,
            payload_len = payload.len(),
            "Code handed to delivery collaborator"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracing_delivery_accepts_payload() {
        let delivery = TracingDelivery::new();
        let result = delivery
            .send(DeliveryChannel::Email, "dr@example.com", "Votre code: 482931")
            .await;
        assert!(result.is_ok());
    }
}
