//! Discord implementation of the chat client, built on `serenity`.

use std::{num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use serenity::all::{ChannelId, Context, CreateMessage, EventHandler, GatewayIntents, Http, Message, MessageId, Ready, UserId};
use tracing::{debug, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{IncomingMention, Res, Void},
    },
    interaction,
    service::webhook::WebhookClient,
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub async fn discord(config: &Config, webhook: WebhookClient) -> Res<Self> {
        let client = DiscordChatClient::new(config, webhook).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<DiscordChatClient> for ChatClient {
    fn from(client: DiscordChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Helpers.

/// Parse a snowflake ID such as a channel or message ID.
fn parse_id<T>(raw: &str) -> Res<T>
where
    T: From<NonZeroU64>,
{
    let id: NonZeroU64 = raw.parse().map_err(|e| anyhow::anyhow!("Invalid Discord ID `{}`: {}", raw, e))?;
    Ok(T::from(id))
}

// Structs.

/// Discord client implementation.
#[derive(Clone)]
struct DiscordChatClient {
    token: String,
    http: Arc<Http>,
    bot_user_id: UserId,
    bot_user_id_str: String,
    config: Config,
    webhook: WebhookClient,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub async fn new(config: &Config, webhook: WebhookClient) -> Res<Self> {
        let token = config.discord_token.clone();
        let http = Arc::new(Http::new(&token));

        // Get the bot's user ID.

        let bot_user = http.get_current_user().await?;
        let bot_user_id = bot_user.id;

        info!("Discord bot user ID: {}", bot_user_id);

        Ok(Self {
            token,
            http,
            bot_user_id,
            bot_user_id_str: bot_user_id.to_string(),
            config: config.clone(),
            webhook,
        })
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id_str
    }

    async fn start(&self) -> Void {
        let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        let handler = DiscordEventHandler {
            bot_user_id: self.bot_user_id,
            config: self.config.clone(),
            chat: ChatClient::from(self.clone()),
            webhook: self.webhook.clone(),
        };

        let mut client = serenity::Client::builder(&self.token, intents).event_handler(handler).await?;

        // Runs until the gateway connection is closed for good.
        client.start().await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn broadcast_typing(&self, channel_id: &str) -> Void {
        let channel: ChannelId = parse_id(channel_id)?;

        channel.broadcast_typing(&self.http).await.map_err(|e| anyhow::anyhow!("Failed to send typing signal: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn reply_to_message(&self, channel_id: &str, message_id: &str, text: &str) -> Void {
        let channel: ChannelId = parse_id(channel_id)?;
        let message: MessageId = parse_id(message_id)?;

        let builder = CreateMessage::new().content(text).reference_message((channel, message));

        channel
            .send_message(self.http.as_ref(), builder)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reply to message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, text: &str) -> Void {
        let channel: ChannelId = parse_id(channel_id)?;

        channel.say(self.http.as_ref(), text).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Gateway event handler.

/// Hands every inbound message to the mention handler.
struct DiscordEventHandler {
    bot_user_id: UserId,
    config: Config,
    chat: ChatClient,
    webhook: WebhookClient,
}

#[async_trait]
impl EventHandler for DiscordEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected to Discord as {} ...", ready.user.name);
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        debug!("Received message event ...");

        let mention = IncomingMention {
            author_id: msg.author.id.to_string(),
            author_name: msg.author.name.clone(),
            author_is_bot: msg.author.bot,
            channel_id: msg.channel_id.to_string(),
            message_id: msg.id.to_string(),
            mentions_self: msg.mentions_user_id(self.bot_user_id),
            raw_text: msg.content,
        };

        interaction::mention::handle_mention(mention, self.config.clone(), self.chat.clone(), self.webhook.clone());
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let channel: ChannelId = parse_id("381880193251409931").unwrap();
        assert_eq!(channel.get(), 381880193251409931);

        assert!(parse_id::<ChannelId>("0").is_err());
        assert!(parse_id::<MessageId>("general").is_err());
    }
}
