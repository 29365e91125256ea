//! Event handling and user interactions for relay-bot.
//!
//! This module provides functionality for handling mentions:
//! - Validating incoming mentions and relaying them to the webhook
//! - Extracting answers from webhook replies
//! - Splitting answers into platform-sized messages
//! - Keeping the user informed while the webhook works

pub mod answer;
pub mod chunk;
pub mod mention;
pub mod timers;
