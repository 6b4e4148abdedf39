//! The provider capability: one backend's view of spatial ownership

use crate::error::ProviderResult;
use crate::traits::Actor;
use crate::types::{Action, Decision, Position, ProviderPriority, RegionBounds, RegionInfo};

/// An external land/claim backend capable of answering authorization and
/// region-identity queries.
///
/// Implementations are thin translations from the engine's action
/// vocabulary to the backend's own flags. Every fallible call returns an
/// explicit `Result`; the aggregator maps `Err` to "no opinion" and keeps
/// consulting other providers, so a provider should report failures
/// honestly rather than guessing at a decision.
pub trait RegionProvider: Send + Sync {
    /// Unique, human-readable provider name (matched case-insensitively).
    fn name(&self) -> &str;

    /// Whether the backend is present and ready. Called once, at
    /// registration; returning `false` keeps the provider out of the
    /// pipeline entirely.
    fn probe(&self) -> bool;

    /// Consultation priority; higher values are asked first.
    fn priority(&self) -> ProviderPriority {
        ProviderPriority::Normal
    }

    /// May the actor perform the action at the position?
    fn authorize(
        &self,
        actor: &dyn Actor,
        position: &Position,
        action: Action,
    ) -> ProviderResult<Decision>;

    /// Describe the region at the position, if this backend knows one.
    fn describe_region(&self, _position: &Position) -> ProviderResult<Option<RegionInfo>> {
        Ok(None)
    }

    /// Bounding volume of the region at the position, if known.
    fn describe_bounds(&self, _position: &Position) -> ProviderResult<Option<RegionBounds>> {
        Ok(None)
    }
}
