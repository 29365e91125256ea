//! Shared types and result aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application-level error.
pub type Err = anyhow::Error;
/// Application-level result.
pub type Res<T> = Result<T, Err>;
/// Application-level result without a value.
pub type Void = Res<()>;

/// A message-created notification from the chat platform.
///
/// One of these exists per inbound event; it is never persisted.
#[derive(Debug, Clone, Default)]
pub struct IncomingMention {
    /// The platform ID of the author.
    pub author_id: String,
    /// The display name of the author.
    pub author_name: String,
    /// Whether the author is a bot account.
    pub author_is_bot: bool,
    /// The channel the message was posted in.
    pub channel_id: String,
    /// The ID of the message itself, used to reply to it.
    pub message_id: String,
    /// The raw message text, including any mention tokens.
    pub raw_text: String,
    /// Whether the message mentions this bot.
    pub mentions_self: bool,
}

/// The request body sent to the remote webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequest {
    /// The question, with the bot mention stripped.
    pub question: String,
    /// The channel the question was asked in.
    pub channel_id: String,
    /// The platform ID of the asker.
    pub user_id: String,
    /// The display name of the asker.
    pub user_name: String,
}

/// The raw reply of the remote webhook.
///
/// The shape is not fixed: JSON bodies are kept as parsed, anything else is
/// kept as a bare string.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReply(
    /// The reply body.
    pub Value,
);

impl RemoteReply {
    /// Interpret a response body.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self(Value::Null);
        }

        match serde_json::from_str(body) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(body.to_string())),
        }
    }
}

// Tests.
