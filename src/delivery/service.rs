//! Outbound delivery with a fixed attempt budget

use backon::{ConstantBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::DeliveryError;
use super::listener::CommandListener;
use super::transport::NotificationTransport;

/// Settings for the inbound command channel.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Only messages from this chat are treated as commands.
    pub recipient_chat_id: i64,
    /// Exact text that triggers an on-demand report.
    pub command_text: String,
    /// Server-side long-poll window.
    pub poll_timeout: Duration,
    /// Pause after a failed poll before retrying the same cursor.
    pub poll_retry_delay: Duration,
}

impl DeliveryConfig {
    pub fn new(recipient_chat_id: i64, command_text: impl Into<String>) -> Self {
        Self {
            recipient_chat_id,
            command_text: command_text.into(),
            poll_timeout: Duration::from_secs(30),
            poll_retry_delay: Duration::from_secs(5),
        }
    }
}

/// Stateless sender plus a factory for the long-poll listener.
///
/// Cheap to clone; every call is self-contained, so it can be shared between
/// the scheduler and the command listener.
#[derive(Clone)]
pub struct DeliveryService {
    transport: Arc<dyn NotificationTransport>,
    config: DeliveryConfig,
}

impl DeliveryService {
    pub fn new(transport: Arc<dyn NotificationTransport>, config: DeliveryConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Single attempt, no retry.
    pub async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.transport.send_message(text).await
    }

    /// Send `text`, making at most `max_attempts` sequential attempts with no
    /// delay between them. Returns the last error once the budget is spent.
    /// A budget of zero still makes one attempt.
    pub async fn send_with_retry(&self, text: &str, max_attempts: usize) -> Result<(), DeliveryError> {
        let max_attempts = max_attempts.max(1);
        let retries = ConstantBuilder::default()
            .with_delay(Duration::ZERO)
            .with_max_times(max_attempts - 1);

        let transport = &self.transport;
        let result = (move || async move { transport.send_message(text).await })
            .retry(retries)
            .notify(|err: &DeliveryError, _| {
                warn!(error = %err, max_attempts, "Send attempt failed, retrying");
            })
            .await;

        if result.is_ok() {
            debug!(max_attempts, "Message delivered");
        }
        result
    }

    /// Listener bound to the same transport. The listener owns its cursor.
    pub fn listener(&self) -> CommandListener {
        CommandListener::new(self.transport.clone(), self.config.clone())
    }
}
