//! Outbound notification delivery and the inbound command channel.

pub mod error;
pub mod listener;
pub mod service;
pub mod telegram;
pub mod transport;
pub mod types;

pub use error::DeliveryError;
pub use listener::{CommandHandler, CommandListener, PollCursor, ACK_TEXT};
pub use service::{DeliveryConfig, DeliveryService};
pub use telegram::TelegramClient;
pub use transport::NotificationTransport;
pub use types::{Chat, Message, Update};
