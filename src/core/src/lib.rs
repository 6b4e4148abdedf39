//! # Palisade Core
//!
//! Shared types, traits, and error handling for the Palisade authorization
//! layer. The engine crate consumes everything here; host integrations and
//! provider backends implement the traits.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ProviderError, ProviderResult};
pub use traits::{Actor, RegionProvider, Roster};
pub use types::{
    Action, ActorId, BlockPos, Decision, EventKind, Position, ProviderPriority, RegionBounds,
    RegionEvent, RegionIdentity, RegionInfo, RegionRole, SubscriberPriority, Surface, Verdict,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
