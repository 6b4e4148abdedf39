//! # Palisade Engine
//!
//! Authorization-aggregation engine for spatially-owned regions. A game
//! server asks "may actor A perform action T at position P?" and gets one
//! consistent [`Decision`](palisade_core::Decision) back, while the actual
//! spatial-ownership knowledge stays with independently-developed provider
//! backends.
//!
//! ## Components
//!
//! - [`DecisionEngine`] — priority-ordered provider pipeline with a
//!   short-lived result cache; first denial wins, provider failures abstain.
//! - [`Gate`] — compiles declarative [`GuardPolicy`] markers into cached
//!   validator pipelines keyed by [`OperationId`].
//! - [`TransitionTracker`] — diffs an actor's current region on movement and
//!   proposes vetoable Leave/Enter notifications.
//! - [`CapacityController`] — per-region occupancy limits enforced through
//!   the same notifications.
//! - [`StayNotifier`] — periodic "still here" fan-out for in-region actors.
//! - [`Palisade`] — the context object wiring all of the above.
//!
//! ## Example
//!
//! ```no_run
//! use palisade_engine::{Palisade, PalisadeConfig};
//! use palisade_core::Action;
//! # use std::sync::Arc;
//! # fn provider() -> Arc<dyn palisade_core::RegionProvider> { unimplemented!() }
//! # fn actor() -> Arc<dyn palisade_core::Actor> { unimplemented!() }
//!
//! let palisade = Palisade::new(PalisadeConfig::default());
//! palisade.register_provider(provider());
//!
//! let actor = actor();
//! let position = actor.position();
//! if palisade.can_act(actor.as_ref(), &position, Action::BlockBreak) {
//!     // proceed with the block break
//! }
//! ```

pub mod config;
pub mod context;
pub mod decision;
pub mod events;
pub mod gate;
pub mod limits;
pub mod stay;
pub mod tracking;

// Re-export commonly used types
pub use config::PalisadeConfig;
pub use context::Palisade;
pub use decision::{CacheConfig, CacheStats, DecisionEngine};
pub use events::EventBus;
pub use gate::{Gate, GuardPolicy, OperationId, SurfaceRule};
pub use limits::CapacityController;
pub use stay::StayNotifier;
pub use tracking::TransitionTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
