//! Runtime services and shared state for the relay-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, webhook::WebhookClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the webhook client, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The webhook client instance.
    pub webhook: WebhookClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the webhook client.
        let webhook = WebhookClient::http(&config)?;

        // Initialize the discord client.
        let chat = ChatClient::discord(&config, webhook.clone()).await?;

        Ok(Self { config, webhook, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
