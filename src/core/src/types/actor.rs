//! Actor identity and the physical-surface vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a connected actor.
///
/// Hosts typically back this with the account UUID of the connected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A block/material token describing what an actor occupies or stands on.
///
/// The vocabulary is the host's (e.g. `"water"`, `"emerald_block"`); tokens
/// are normalized to lowercase so policy declarations compare reliably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Surface(String);

impl Surface {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().to_lowercase())
    }

    /// The empty surface, used when the host has nothing at the position.
    pub fn air() -> Self {
        Self("air".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Surface {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_normalizes_case() {
        assert_eq!(Surface::new("EMERALD_BLOCK"), Surface::new("emerald_block"));
        assert_eq!(Surface::new("Water").as_str(), "water");
    }

    #[test]
    fn actor_ids_are_stable() {
        let raw = Uuid::new_v4();
        assert_eq!(ActorId::new(raw), ActorId::from(raw));
        assert_ne!(ActorId::random(), ActorId::random());
    }
}
