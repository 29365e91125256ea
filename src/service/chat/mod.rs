//! Chat service integration for relay-bot.
//!
//! This module provides functionality for interacting with chat platforms like Discord:
//! - Receiving mentions
//! - Sending replies, channel messages, and typing signals
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Discord.

pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Void;

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Discord. Implementing this trait allows different chat services to be used
/// with the relay-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform,
    /// which is used to strip the bot's mention out of a question.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// This connects to the chat platform and begins handing incoming
    /// mentions to the mention handler.
    async fn start(&self) -> Void;

    /// Show a "typing" indicator in a channel.
    async fn broadcast_typing(&self, channel_id: &str) -> Void;

    /// Reply directly to a message.
    async fn reply_to_message(&self, channel_id: &str, message_id: &str, text: &str) -> Void;

    /// Post a plain message to a channel.
    async fn send_message(&self, channel_id: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
