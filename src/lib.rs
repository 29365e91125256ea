//! Library root for `relay-bot`.
//!
//! Relay-bot answers Discord mentions by way of a remote workflow webhook:
//! - Listens for messages that mention the bot
//! - Forwards the question to the webhook over HTTP
//! - Posts the webhook's answer back, split into platform-sized messages
//! - Shows a typing indicator, and a notice when the webhook is slow
//!
//! The architecture is built around traits for the chat platform and the
//! webhook, so either side can be swapped out or mocked.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the relay-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with webhook and chat clients
/// - Starts the gateway loop for processing mentions
pub async fn start(config: Config) -> Void {
    info!("Starting relay-bot ...");

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A crypto provider was already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
