//! HTTP mail relay configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MailConfig {
    /// Relay endpoint accepting JSON messages (e.g. `https://relay.example.com/v1/send`).
    #[serde(default)]
    pub relay_url: String,

    /// Bearer token sent to the relay. Optional.
    #[serde(default)]
    pub api_key: String,
}

impl MailConfig {
    /// Check if a relay endpoint is set.
    pub fn is_configured(&self) -> bool {
        !self.relay_url.trim().is_empty()
    }

    /// The API key, if one is set.
    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|key| !key.is_empty())
    }
}
