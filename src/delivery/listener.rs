//! Long-poll command listener

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::DeliveryError;
use super::service::DeliveryConfig;
use super::transport::NotificationTransport;
use super::types::Update;

pub const ACK_TEXT: &str = "⏳ Fetching live data, one moment...";

/// Invoked for every recognized command. Must be safe to run concurrently
/// with the scheduled cycle.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn on_command(&self);
}

/// Position in the update stream. Never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn value(self) -> i64 {
        self.0
    }

    pub fn advance_past(&mut self, update_id: i64) {
        self.0 = self.0.max(update_id.saturating_add(1));
    }
}

pub struct CommandListener {
    transport: Arc<dyn NotificationTransport>,
    config: DeliveryConfig,
    cursor: PollCursor,
}

impl CommandListener {
    pub fn new(transport: Arc<dyn NotificationTransport>, config: DeliveryConfig) -> Self {
        Self {
            transport,
            config,
            cursor: PollCursor::default(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor.value()
    }

    /// Fast-forward past whatever piled up while the process was offline.
    /// The latest update's content is discarded. On failure the cursor stays
    /// where it is.
    pub async fn skip_backlog(&mut self) {
        match self.transport.latest_update().await {
            Ok(Some(update)) => {
                self.cursor.advance_past(update.update_id);
                info!(cursor = self.cursor.value(), "Skipped Telegram backlog");
            }
            Ok(None) => debug!("No Telegram backlog to skip"),
            Err(e) => warn!(error = %e, "Failed to skip Telegram backlog, starting from cursor 0"),
        }
    }

    /// One blocking fetch at the current cursor, then dispatch.
    /// Returns the number of commands dispatched.
    pub async fn poll_once(&mut self, handler: &dyn CommandHandler) -> Result<usize, DeliveryError> {
        let timeout_secs = self.config.poll_timeout.as_secs();
        let updates = self
            .transport
            .get_updates(self.cursor.value(), timeout_secs)
            .await?;
        Ok(self.process_batch(updates, handler).await)
    }

    /// Advance the cursor past every update and dispatch the recognized
    /// commands. Cursor movement never depends on filtering, otherwise a
    /// filtered update would be redelivered forever.
    pub async fn process_batch(&mut self, updates: Vec<Update>, handler: &dyn CommandHandler) -> usize {
        let mut dispatched = 0;

        for update in updates {
            self.cursor.advance_past(update.update_id);

            let Some((chat_id, text)) = update.text_message() else {
                continue;
            };

            if chat_id != self.config.recipient_chat_id {
                debug!(chat_id, update_id = update.update_id, "Ignoring message from unknown chat");
                continue;
            }

            if text != self.config.command_text {
                continue;
            }

            info!(command = %text, update_id = update.update_id, "Received user command");
            if let Err(e) = self.transport.send_message(ACK_TEXT).await {
                warn!(error = %e, "Failed to acknowledge command");
            }
            handler.on_command().await;
            dispatched += 1;
        }

        dispatched
    }

    /// Run until `shutdown` flips to `true`.
    ///
    /// Shutdown is observed before each fetch; a fetch already in flight is
    /// allowed to finish. Failed fetches are retried at the same cursor after
    /// `poll_retry_delay`.
    pub async fn listen(mut self, mut shutdown: watch::Receiver<bool>, handler: Arc<dyn CommandHandler>) {
        self.skip_backlog().await;
        info!(cursor = self.cursor.value(), "Telegram polling started, waiting for commands");

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.poll_once(handler.as_ref()).await {
                let delay = self.config.poll_retry_delay;
                warn!(
                    error = %e,
                    cursor = self.cursor.value(),
                    "Failed to fetch Telegram updates, retrying in {:?}",
                    delay
                );

                let sender_gone = tokio::select! {
                    _ = tokio::time::sleep(delay) => false,
                    changed = shutdown.changed() => changed.is_err(),
                };
                if sender_gone {
                    break;
                }
            }
        }

        info!(cursor = self.cursor.value(), "Telegram polling stopped");
    }
}
