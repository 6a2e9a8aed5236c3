//! Telegram Bot API transport

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::DeliveryError;
use super::transport::NotificationTransport;
use super::types::{ApiResponse, SendMessageRequest, Update};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra time granted on top of the server-side long-poll window before the
/// client gives up on the request.
const POLL_GRACE: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: i64,
}

impl TelegramClient {
    pub fn new(bot_token: impl Into<String>, chat_id: i64) -> Self {
        Self::with_client(DEFAULT_API_URL, reqwest::Client::new(), bot_token, chat_id)
    }

    /// Use a prepared client (proxy, timeouts) and API base URL.
    pub fn with_client(
        base_url: impl Into<String>,
        client: reqwest::Client,
        bot_token: impl Into<String>,
        chat_id: i64,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, DeliveryError> {
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                DeliveryError::Decode(e.to_string())
            } else {
                DeliveryError::api(format!("http status {}", status))
            }
        })?;

        if !envelope.ok || !status.is_success() {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("http status {}", status));
            return Err(DeliveryError::api(description));
        }

        envelope
            .result
            .ok_or_else(|| DeliveryError::Decode("response is missing 'result'".to_string()))
    }

    async fn fetch_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DeliveryError> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset.to_string()), ("timeout", timeout_secs.to_string())])
            .timeout(Duration::from_secs(timeout_secs) + POLL_GRACE)
            .send()
            .await?;

        Self::decode(response).await
    }
}

#[async_trait]
impl NotificationTransport for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let request = SendMessageRequest {
            chat_id: self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        let _: serde_json::Value = Self::decode(response).await?;
        debug!(chat_id = self.chat_id, bytes = text.len(), "Telegram message sent");
        Ok(())
    }

    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DeliveryError> {
        self.fetch_updates(offset, timeout_secs).await
    }

    async fn latest_update(&self) -> Result<Option<Update>, DeliveryError> {
        // A negative offset asks Telegram for the tail of the queue.
        let mut updates = self.fetch_updates(-1, 0).await?;
        Ok(updates.pop())
    }
}
