//! HTTP implementation of the webhook client.
//!
//! Posts the request as JSON and hands back the body of any 2xx response
//! as a [`RemoteReply`].

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{OutgoingRequest, RemoteReply, Res},
};

use super::{GenericWebhookClient, WebhookClient, WebhookError};

// Extra methods on `WebhookClient` applied by the http implementation.

impl WebhookClient {
    /// Creates a new HTTP webhook client.
    pub fn http(config: &Config) -> Res<Self> {
        let client = HttpWebhookClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// HTTP webhook client implementation.
#[derive(Clone)]
pub struct HttpWebhookClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpWebhookClient {
    /// Create a new HTTP webhook client.
    #[instrument(name = "HttpWebhookClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().user_agent(concat!("relay-bot/", env!("CARGO_PKG_VERSION"))).build()?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
            token: config.webhook_bearer().map(str::to_string),
        })
    }
}

/// Map a transport failure onto the webhook taxonomy.
fn classify_transport_error(err: reqwest::Error, timeout: Duration) -> WebhookError {
    if err.is_timeout() {
        WebhookError::Timeout(timeout)
    } else if err.is_builder() {
        WebhookError::Setup(err.to_string())
    } else {
        WebhookError::Network(err.to_string())
    }
}

#[async_trait]
impl GenericWebhookClient for HttpWebhookClient {
    #[instrument(skip_all, fields(channel_id = %request.channel_id))]
    async fn send(&self, request: &OutgoingRequest, timeout: Duration) -> Result<RemoteReply, WebhookError> {
        let mut builder = self.client.post(&self.url).timeout(timeout).json(request);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| classify_transport_error(e, timeout))?;
        let status = response.status();

        debug!("Webhook responded with status {}", status);

        let bytes = response.bytes().await.map_err(|e| classify_transport_error(e, timeout))?;

        let body = String::from_utf8(bytes.to_vec()).map_err(|e| WebhookError::Remote {
            status: status.as_u16(),
            body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })?;

        if !status.is_success() {
            return Err(WebhookError::Remote { status: status.as_u16(), body });
        }

        Ok(RemoteReply::from_body(&body))
    }
}

// Tests.
