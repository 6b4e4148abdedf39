//! Notification vocabulary produced by the transition tracker and stay
//! notifier
//!
//! Dispatch is a propose/respond protocol: the emitter proposes an event,
//! each subscriber answers with a [`Verdict`], and the emitter applies the
//! consequence. There is no shared cancellation flag.

use crate::traits::Actor;
use crate::types::RegionInfo;
use std::fmt;
use std::sync::Arc;

/// A region notification, carrying the actor it concerns.
#[derive(Clone)]
pub struct RegionEvent {
    pub actor: Arc<dyn Actor>,
    pub kind: EventKind,
}

impl RegionEvent {
    pub fn new(actor: Arc<dyn Actor>, kind: EventKind) -> Self {
        Self { actor, kind }
    }

    /// The region snapshot the event refers to.
    ///
    /// For `Cross` this is the destination region.
    pub fn region(&self) -> &RegionInfo {
        match &self.kind {
            EventKind::Enter(info) | EventKind::Leave(info) | EventKind::Stay(info) => info,
            EventKind::Cross { to, .. } => to,
        }
    }
}

impl fmt::Debug for RegionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionEvent")
            .field("actor", &self.actor.id())
            .field("kind", &self.kind)
            .finish()
    }
}

/// The kinds of region notification.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// The actor's tracked region changed to this region.
    Enter(RegionInfo),
    /// The actor's tracked region was this region and is no longer.
    Leave(RegionInfo),
    /// Periodic "still here" re-announcement; carries no transition.
    Stay(RegionInfo),
    /// A merged adjacent-region hop.
    ///
    /// Part of the public vocabulary for subscribers that want to treat a
    /// hop as one notification, but the tracker does not produce it: an
    /// adjacent hop is always proposed as `Leave` followed by `Enter`.
    Cross { from: RegionInfo, to: RegionInfo },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Enter(_) => "enter",
            EventKind::Leave(_) => "leave",
            EventKind::Stay(_) => "stay",
            EventKind::Cross { .. } => "cross",
        }
    }
}

/// A subscriber's answer to a proposed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Verdict::Deny)
    }
}

/// Order in which subscribers are asked; `First` runs earliest.
///
/// Admission control belongs at `First` (reject before anyone reacts);
/// pure observation belongs at `Monitor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubscriberPriority {
    First,
    Early,
    Normal,
    Late,
    Monitor,
}
