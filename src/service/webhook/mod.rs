//! Remote workflow webhook integration.
//!
//! The webhook receives the question as JSON and answers with a body whose
//! shape is not fixed. This module defines the `GenericWebhookClient` trait,
//! the cloneable `WebhookClient` handle, and the failure taxonomy shared by
//! every implementation.

pub mod http;

use std::{ops::Deref, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::base::types::{OutgoingRequest, RemoteReply};

// Errors.

/// Failure modes of a single webhook call.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The endpoint could not be reached, or the connection broke before a response arrived.
    #[error("no response from webhook: {0}")]
    Network(String),
    /// No response arrived within the allotted time.
    #[error("webhook did not respond within {0:?}")]
    Timeout(Duration),
    /// The endpoint responded with a failure status, or with a body that could not be read.
    #[error("webhook responded with status {status}: {body}")]
    Remote { status: u16, body: String },
    /// The request could not be built locally.
    #[error("failed to set up webhook request: {0}")]
    Setup(String),
}

/// Coarse classification of a [`WebhookError`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookErrorKind {
    /// The endpoint answered with an error.
    ErrorStatus,
    /// No response was received.
    NoResponse,
    /// The request never left the process.
    LocalSetup,
}

impl WebhookErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookErrorKind::ErrorStatus => "error-status",
            WebhookErrorKind::NoResponse => "no-response",
            WebhookErrorKind::LocalSetup => "local-setup",
        }
    }
}

impl WebhookError {
    pub fn kind(&self) -> WebhookErrorKind {
        match self {
            WebhookError::Remote { .. } => WebhookErrorKind::ErrorStatus,
            WebhookError::Network(_) | WebhookError::Timeout(_) => WebhookErrorKind::NoResponse,
            WebhookError::Setup(_) => WebhookErrorKind::LocalSetup,
        }
    }
}

// Traits.

/// Generic webhook client trait that clients must implement.
///
/// Implementations perform exactly one attempt per call, with no retries.
/// The caller decides what to do with any failure.
#[async_trait]
pub trait GenericWebhookClient: Send + Sync + 'static {
    /// Send the request and return the raw reply of any 2xx response.
    async fn send(&self, request: &OutgoingRequest, timeout: Duration) -> Result<RemoteReply, WebhookError>;
}

// Structs.

/// Webhook client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct WebhookClient {
    inner: Arc<dyn GenericWebhookClient>,
}

impl Deref for WebhookClient {
    type Target = dyn GenericWebhookClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl WebhookClient {
    pub fn new(inner: Arc<dyn GenericWebhookClient>) -> Self {
        Self { inner }
    }
}

// Tests.
