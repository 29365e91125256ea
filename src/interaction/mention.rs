//! Handling of bot mentions.
//!
//! A mention that passes validation is relayed to the webhook; the answer is
//! chunked and posted back, the first chunk as a reply to the mention and the
//! rest as plain channel messages. Failures end in a single generic reply.

use thiserror::Error;
use tracing::Instrument;

use crate::{
    base::types::{IncomingMention, OutgoingRequest, RemoteReply},
    interaction::{answer::extract_answer, chunk::split_chunks, timers::ReplyTimers},
    service::{
        chat::ChatClient,
        webhook::{WebhookClient, WebhookError},
    },
};

use crate::prelude::*;

// Types.

/// Why a mention was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The author is a bot.
    FromBot,
    /// The message does not mention this bot.
    NotAddressed,
    /// The message is outside the configured channel.
    WrongChannel,
    /// Nothing is left once the mention is stripped.
    EmptyQuestion,
}

/// How a mention was dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionOutcome {
    /// Ignored without relaying.
    Skipped(SkipReason),
    /// Empty question answered with the usage hint.
    Hinted,
    /// The answer went out in this many chunks.
    Answered { chunks: usize },
    /// The webhook answered, but nothing usable was in the reply.
    NoAnswer,
    /// The relay failed and the apology went out.
    Failed,
}

/// Failures of the relay stage.
#[derive(Debug, Error)]
enum RelayError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("failed to deliver reply: {0}")]
    Delivery(anyhow::Error),
}

// Entry points.

/// Handles a mention on its own task.
#[instrument(skip_all, fields(channel_id = %mention.channel_id, message_id = %mention.message_id))]
pub fn handle_mention(mention: IncomingMention, config: Config, chat: ChatClient, webhook: WebhookClient) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_mention(&mention, &config, &chat, &webhook).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    );
}

/// Validates and relays a single mention.
#[instrument(skip_all)]
pub async fn process_mention(mention: &IncomingMention, config: &Config, chat: &ChatClient, webhook: &WebhookClient) -> Res<MentionOutcome> {
    let request = match validate_mention(mention, config, chat.bot_user_id()) {
        Ok(request) => request,
        Err(SkipReason::EmptyQuestion) if config.usage_hint_enabled => {
            info!("Empty question, sending usage hint ...");
            chat.reply_to_message(&mention.channel_id, &mention.message_id, &config.usage_hint_message).await?;
            return Ok(MentionOutcome::Hinted);
        }
        Err(reason) => {
            debug!("Skipping mention: {:?}", reason);
            return Ok(MentionOutcome::Skipped(reason));
        }
    };

    info!("Relaying question from {} ...", request.user_name);

    // Typing and the slow notice only run while the webhook is working.
    let timers = ReplyTimers::start(chat.clone(), &mention.channel_id, config);
    let reply = webhook.send(&request, config.webhook_timeout()).await;
    let slow_notice_sent = timers.stop();

    debug!(slow_notice_sent, "Webhook call finished.");

    let result = match reply {
        Ok(reply) => deliver_answer(&reply, mention, config, chat).await,
        Err(err) => Err(RelayError::from(err)),
    };

    match result {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            match &err {
                RelayError::Webhook(webhook_err) => error!(kind = webhook_err.kind().as_str(), question = %request.question, "Webhook call failed: {}", webhook_err),
                RelayError::Delivery(_) => error!("Reply delivery failed: {}", err),
            }

            send_apology(mention, config, chat).await?;

            Ok(MentionOutcome::Failed)
        }
    }
}

// Helpers.

/// Checks that a mention should be relayed, and builds the request for it.
pub fn validate_mention(mention: &IncomingMention, config: &Config, bot_user_id: &str) -> Result<OutgoingRequest, SkipReason> {
    if mention.author_is_bot {
        return Err(SkipReason::FromBot);
    }

    if !mention.mentions_self {
        return Err(SkipReason::NotAddressed);
    }

    if let Some(target) = config.target_channel()
        && target != mention.channel_id
    {
        info!("Ignoring mention outside of channel {}.", target);
        return Err(SkipReason::WrongChannel);
    }

    let question = strip_mention(&mention.raw_text, bot_user_id);

    if question.is_empty() {
        return Err(SkipReason::EmptyQuestion);
    }

    Ok(OutgoingRequest {
        question,
        channel_id: mention.channel_id.clone(),
        user_id: mention.author_id.clone(),
        user_name: mention.author_name.clone(),
    })
}

/// Removes every mention token of the bot (`<@id>` or `<@!id>`) and trims the rest.
pub fn strip_mention(text: &str, bot_user_id: &str) -> String {
    text.replace(&format!("<@!{bot_user_id}>"), "").replace(&format!("<@{bot_user_id}>"), "").trim().to_string()
}

/// Posts the answer found in the webhook reply.
async fn deliver_answer(reply: &RemoteReply, mention: &IncomingMention, config: &Config, chat: &ChatClient) -> Result<MentionOutcome, RelayError> {
    let Some(answer) = extract_answer(reply) else {
        warn!("No answer in webhook reply: {:?}", reply);

        chat.reply_to_message(&mention.channel_id, &mention.message_id, &config.no_answer_message)
            .await
            .map_err(RelayError::Delivery)?;

        return Ok(MentionOutcome::NoAnswer);
    };

    let chunks: Vec<String> = split_chunks(&answer, config.chunk_limit).into_iter().filter(|c| !c.trim().is_empty()).collect();

    info!("Sending answer in {} chunk(s) ...", chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let sent = if index == 0 {
            chat.reply_to_message(&mention.channel_id, &mention.message_id, chunk).await
        } else {
            tokio::time::sleep(config.chunk_delay()).await;
            chat.send_message(&mention.channel_id, chunk).await
        };

        sent.map_err(RelayError::Delivery)?;
    }

    Ok(MentionOutcome::Answered { chunks: chunks.len() })
}

/// Sends the apology, as a plain channel message if the mention can no longer be replied to.
async fn send_apology(mention: &IncomingMention, config: &Config, chat: &ChatClient) -> Void {
    if let Err(err) = chat.reply_to_message(&mention.channel_id, &mention.message_id, &config.apology_message).await {
        warn!("Failed to reply with apology, posting to the channel instead: {}", err);
        chat.send_message(&mention.channel_id, &config.apology_message).await?;
    }

    Ok(())
}

// Tests.
