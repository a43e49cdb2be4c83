//! Team-channel announcement task.
//!
//! [`Announcer`] subscribes to the event bus and forwards every `queue.*`
//! event to a configured webhook URL (e.g. a team chat integration). Delivery
//! is best-effort: failures are logged and never affect the workflow that
//! produced the event.

use tokio::sync::broadcast;

use crate::bus::QueueEvent;
use crate::delivery::webhook::WebhookDelivery;

/// Background task broadcasting queue events outward.
pub struct Announcer {
    url: String,
    delivery: WebhookDelivery,
}

impl Announcer {
    /// Create an announcer posting to the given webhook URL.
    pub fn new(url: String) -> Self {
        Self {
            url,
            delivery: WebhookDelivery::new(),
        }
    }

    /// Run the announcement loop until the bus is closed.
    pub async fn run(self, mut receiver: broadcast::Receiver<QueueEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if !event.event_type.starts_with("queue.") {
                        continue;
                    }
                    if let Err(e) = self.delivery.deliver(&self.url, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Announcement delivery failed"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Announcer lagged, some events were not announced");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, announcer shutting down");
                    break;
                }
            }
        }
    }
}
