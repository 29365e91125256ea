//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use crate::base::messages;

use super::types::Res;

/// Hard platform limit on the size of a single message.
pub const PLATFORM_MESSAGE_LIMIT: usize = 2000;

/// Default upper bound on the webhook call, in seconds.
fn default_webhook_timeout_secs() -> u64 {
    300
}

/// Default typing indicator period, in seconds.
fn default_typing_interval_secs() -> u64 {
    5
}

/// Default delay before the slow-response notice, in seconds.
fn default_slow_notice_secs() -> u64 {
    20
}

/// Default chunk size target; leaves margin under the platform limit.
fn default_chunk_limit() -> usize {
    1900
}

/// Default delay between chunk sends, in milliseconds.
fn default_chunk_delay_ms() -> u64 {
    1000
}

fn default_apology_message() -> String {
    messages::APOLOGY_MESSAGE.to_string()
}

fn default_no_answer_message() -> String {
    messages::NO_ANSWER_MESSAGE.to_string()
}

fn default_slow_notice_message() -> String {
    messages::SLOW_NOTICE_MESSAGE.to_string()
}

fn default_usage_hint_message() -> String {
    messages::USAGE_HINT_MESSAGE.to_string()
}

/// Configuration for the relay-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The configuration values, each overridable by an environment variable.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Discord bot token (`RELAY_BOT_DISCORD_TOKEN`).
    pub discord_token: String,
    /// Webhook endpoint URL (`RELAY_BOT_WEBHOOK_URL`).
    pub webhook_url: String,
    /// Optional static bearer token for the webhook (`RELAY_BOT_WEBHOOK_TOKEN`).
    #[serde(default)]
    pub webhook_token: Option<String>,
    /// Optional restriction to a single channel (`RELAY_BOT_TARGET_CHANNEL_ID`).
    #[serde(default)]
    pub target_channel_id: Option<String>,
    /// Upper bound on the webhook call (`RELAY_BOT_WEBHOOK_TIMEOUT_SECS`).
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,
    /// Typing indicator period (`RELAY_BOT_TYPING_INTERVAL_SECS`).
    #[serde(default = "default_typing_interval_secs")]
    pub typing_interval_secs: u64,
    /// Delay before the slow-response notice (`RELAY_BOT_SLOW_NOTICE_SECS`).
    #[serde(default = "default_slow_notice_secs")]
    pub slow_notice_secs: u64,
    /// Maximum characters per reply chunk (`RELAY_BOT_CHUNK_LIMIT`).
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,
    /// Delay between chunk sends (`RELAY_BOT_CHUNK_DELAY_MS`).
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    /// Reply with a usage hint when a mention carries no question (`RELAY_BOT_USAGE_HINT_ENABLED`).
    #[serde(default)]
    pub usage_hint_enabled: bool,
    /// Reply sent when the webhook call fails (`RELAY_BOT_APOLOGY_MESSAGE`).
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
    /// Reply sent when no answer could be extracted (`RELAY_BOT_NO_ANSWER_MESSAGE`).
    #[serde(default = "default_no_answer_message")]
    pub no_answer_message: String,
    /// Notice sent when the webhook is slow (`RELAY_BOT_SLOW_NOTICE_MESSAGE`).
    #[serde(default = "default_slow_notice_message")]
    pub slow_notice_message: String,
    /// Usage hint (`RELAY_BOT_USAGE_HINT_MESSAGE`).
    #[serde(default = "default_usage_hint_message")]
    pub usage_hint_message: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            webhook_url: String::new(),
            webhook_token: None,
            target_channel_id: None,
            webhook_timeout_secs: default_webhook_timeout_secs(),
            typing_interval_secs: default_typing_interval_secs(),
            slow_notice_secs: default_slow_notice_secs(),
            chunk_limit: default_chunk_limit(),
            chunk_delay_ms: default_chunk_delay_ms(),
            usage_hint_enabled: false,
            apology_message: default_apology_message(),
            no_answer_message: default_no_answer_message(),
            slow_notice_message: default_slow_notice_message(),
            usage_hint_message: default_usage_hint_message(),
        }
    }
}

impl ConfigInner {
    /// The channel restriction, if one is actually set.
    pub fn target_channel(&self) -> Option<&str> {
        self.target_channel_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// The webhook bearer token, if one is actually set.
    pub fn webhook_bearer(&self) -> Option<&str> {
        self.webhook_token.as_deref().map(str::trim).filter(|token| !token.is_empty())
    }

    /// Upper bound on the webhook call.
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    /// Typing indicator period.
    pub fn typing_interval(&self) -> Duration {
        Duration::from_secs(self.typing_interval_secs)
    }

    /// Delay before the slow-response notice.
    pub fn slow_notice_delay(&self) -> Duration {
        Duration::from_secs(self.slow_notice_secs)
    }

    /// Delay between chunk sends.
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

impl Config {
    /// Load the configuration from the environment, layered with an optional TOML file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("RELAY_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the loaded values for consistency.
    pub fn validate(&self) -> Res<()> {
        if self.discord_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Discord token must not be empty."));
        }

        if self.webhook_url.trim().is_empty() {
            return Err(anyhow::anyhow!("Webhook URL must not be empty."));
        }

        reqwest::Url::parse(&self.webhook_url).map_err(|e| anyhow::anyhow!("Webhook URL `{}` is invalid: {}", self.webhook_url, e))?;

        if self.chunk_limit < 1 || self.chunk_limit > PLATFORM_MESSAGE_LIMIT {
            return Err(anyhow::anyhow!("Chunk limit must be between 1 and {}.", PLATFORM_MESSAGE_LIMIT));
        }

        if self.typing_interval_secs < 1 {
            return Err(anyhow::anyhow!("Typing interval must be at least one second."));
        }

        Ok(())
    }
}

// Tests.
