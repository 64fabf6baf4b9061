//! HTTP mail relay client.
//!
//! Posts each message as JSON to a relay endpoint that performs the actual
//! SMTP hand-off:
//!
//! ```json
//! { "from": "...", "to": "...", "subject": "...", "text": "..." }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DeliveryError;
use crate::mailer::Mailer;
use crate::message::MailMessage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl<'a> From<&'a MailMessage> for RelayPayload<'a> {
    fn from(message: &'a MailMessage) -> Self {
        Self {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        }
    }
}

/// Delivers messages through an HTTP relay.
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpRelayMailer {
    /// Create a relay client for `endpoint`, authenticating with `api_key`
    /// as a bearer token when given.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Unavailable` if the endpoint is blank or the
    /// HTTP client cannot be built.
    pub fn new(endpoint: &str, api_key: Option<&str>) -> Result<Self, DeliveryError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(DeliveryError::Unavailable("relay endpoint is empty".into()));
        }
        let http = reqwest::Client::builder()
            .user_agent("pmt/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.map(str::to_string),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map a non-success relay answer to [`DeliveryError::Rejected`].
async fn check_response(resp: reqwest::Response) -> Result<(), DeliveryError> {
    if resp.status().is_success() {
        return Ok(());
    }
    Err(DeliveryError::Rejected {
        status: resp.status().as_u16(),
        body: resp.text().await.unwrap_or_default(),
    })
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&RelayPayload::from(message));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        check_response(resp).await
    }
}
