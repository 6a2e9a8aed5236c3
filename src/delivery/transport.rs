//! Notification transport interface.

use async_trait::async_trait;

use super::error::DeliveryError;
use super::types::Update;

/// A push channel bound to a single recipient, with a long-poll inbox.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Send one text message to the configured recipient. Markdown markers
    /// in `text` are passed through untouched.
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError>;

    /// Fetch updates with id `>= offset`, blocking up to `timeout_secs`.
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, DeliveryError>;

    /// Non-blocking fetch of the single most recent pending update.
    async fn latest_update(&self) -> Result<Option<Update>, DeliveryError>;
}
