use thiserror::Error;

/// Transport and protocol failures. Both are retried the same way.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegram api returned an error: {description}")]
    Api { description: String },

    #[error("failed to decode telegram response: {0}")]
    Decode(String),
}

impl DeliveryError {
    pub fn api(description: impl Into<String>) -> Self {
        DeliveryError::Api {
            description: description.into(),
        }
    }
}
