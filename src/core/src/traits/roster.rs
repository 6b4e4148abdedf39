//! Host-supplied view of connected actors

use crate::traits::Actor;
use std::sync::Arc;

/// Enumerates the currently connected actors.
///
/// Consumed by the stay notifier (per-tick fan-out) and the capacity
/// controller (startup/forced recount). The engine never caches the
/// result; every call should reflect the live connection set.
pub trait Roster: Send + Sync {
    fn connected(&self) -> Vec<Arc<dyn Actor>>;
}
