use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A user who can be assigned tasks or credited with changes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown to other people: the username when set, else the address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// Whether the address is usable for delivery.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.email.trim().is_empty()
    }
}
