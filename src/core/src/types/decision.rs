//! The authorization decision type

use serde::{Deserialize, Serialize};

/// Outcome of an authorization query.
///
/// `Allow` carries no payload; `Deny` names the provider that produced it
/// so callers can report why an action was blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny { source: String },
}

impl Decision {
    /// The shared allow decision.
    pub fn allow() -> Self {
        Decision::Allow
    }

    /// A denial attributed to the named provider.
    pub fn deny(source: impl Into<String>) -> Self {
        Decision::Deny {
            source: source.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// The provider that denied, if this is a denial.
    pub fn source(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny { source } => Some(source),
        }
    }
}
