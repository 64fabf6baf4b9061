//! Status and priority enums for tasks.
//!
//! Both enums serialize as their upper-case names (`"TODO"`, `"IN_PROGRESS"`),
//! which is also the form stored in SQL and rendered in change logs.
//!
//! Input parsing never fails: [`TaskStatus::parse_or_default`] and
//! [`TaskPriority::parse_or_default`] fold blank or unknown input into the
//! default variant.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task.
///
/// ```text
/// TODO → IN_PROGRESS → DONE
/// ```
///
/// No transition rules are enforced; any status may be set from any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Case-insensitive lookup by name. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(input))
    }

    /// Parse by name, falling back to [`TaskStatus::Todo`] for absent, blank,
    /// or unrecognised input.
    #[must_use]
    pub fn parse_or_default(input: Option<&str>) -> Self {
        input.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskPriority
// ---------------------------------------------------------------------------

/// Priority of a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(input))
    }

    /// Parse by name, falling back to [`TaskPriority::Medium`].
    #[must_use]
    pub fn parse_or_default(input: Option<&str>) -> Self {
        input.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
