//! Key entity as returned by the remote key-issuing service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One credential instance issued for a project on a network.
///
/// Keys are owned by the remote service; this type is a snapshot of its
/// response and is never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub project_ref: String,
    #[serde(default)]
    pub token: String,
    pub invalid: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub invalidated_at: Option<DateTime<Utc>>,
    pub quota: u64,
}

impl Key {
    /// A freshly issued, valid key
    pub fn issued(project_ref: impl Into<String>, token: impl Into<String>, quota: u64) -> Self {
        Self {
            project_ref: project_ref.into(),
            token: token.into(),
            invalid: false,
            created_at: Utc::now(),
            invalidated_at: None,
            quota,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid
    }
}
