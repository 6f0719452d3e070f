//! Client for the HIBOT conversational-messaging API.
mod client;
mod types;

pub use client::{HibotClient, HibotConfig, DEFAULT_HIBOT_BASE_URL, DEFAULT_HIBOT_CHANNEL_TYPE};
pub use types::{ConversationSource, ConversationSourceError, HibotError};
