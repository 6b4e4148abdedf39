//! The actor capability consumed by the engine

use crate::types::{ActorId, Position, Surface};

/// A connected entity whose actions are subject to authorization.
///
/// Implemented by the host over its player/session type. All methods are
/// synchronous: the decision path runs on the host's event-processing
/// thread and must not hand off.
pub trait Actor: Send + Sync {
    /// Stable identifier of the actor.
    fn id(&self) -> ActorId;

    /// Human-readable name, used in diagnostics.
    fn name(&self) -> &str;

    /// The actor's current position.
    fn position(&self) -> Position;

    /// Whether the actor holds the given permission node.
    fn has_permission(&self, node: &str) -> bool;

    /// Elevated privilege (operator status); bypasses all checks.
    fn is_privileged(&self) -> bool {
        false
    }

    /// The block the actor currently occupies.
    fn standing_in(&self) -> Surface {
        Surface::air()
    }

    /// The block directly beneath the actor.
    fn standing_on(&self) -> Surface {
        Surface::air()
    }

    /// Deliver a message to the actor. Default: drop it.
    fn send_message(&self, _message: &str) {}
}
