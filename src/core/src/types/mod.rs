//! Shared types for the Palisade authorization layer

pub mod action;
pub mod actor;
pub mod decision;
pub mod event;
pub mod position;
pub mod region;

// Re-export commonly used types
pub use action::Action;
pub use actor::{ActorId, Surface};
pub use decision::Decision;
pub use event::{EventKind, RegionEvent, SubscriberPriority, Verdict};
pub use position::{BlockPos, Position};
pub use region::{ProviderPriority, RegionBounds, RegionIdentity, RegionInfo, RegionRole};
