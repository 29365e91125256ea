//! Core components, types, and utilities for the relay-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Fixed user-facing messages.
//! - Common types and result handling.

pub mod config;
pub mod messages;
pub mod types;
