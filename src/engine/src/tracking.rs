//! Spatial transition tracking: detect region changes, propose
//! Leave/Enter, honor vetoes
//!
//! Per-actor state machine: `Untracked → InRegion(identity) | Outside`.
//! The tracker owns the last-known region of every connected actor and
//! nothing else; subscribers react through the
//! [`EventBus`](crate::EventBus).

use crate::decision::DecisionEngine;
use crate::events::EventBus;
use dashmap::DashMap;
use palisade_core::{Actor, ActorId, EventKind, Position, RegionEvent, RegionInfo, Verdict};
use std::sync::Arc;
use tracing::{debug, trace};

/// Tracks which region each connected actor was last observed in and
/// emits Leave/Enter proposals when that changes.
pub struct TransitionTracker {
    engine: Arc<DecisionEngine>,
    events: Arc<EventBus>,
    last_regions: DashMap<ActorId, Option<RegionInfo>>,
}

impl TransitionTracker {
    pub fn new(engine: Arc<DecisionEngine>, events: Arc<EventBus>) -> Self {
        Self {
            engine,
            events,
            last_regions: DashMap::new(),
        }
    }

    /// Seed tracking state from the actor's current position.
    ///
    /// No notification is emitted for the initial state; an actor that
    /// connects inside a region has simply always been there as far as
    /// subscribers are concerned. Capacity counting for connects happens
    /// in the capacity controller, not here.
    pub fn track_connect(&self, actor: &Arc<dyn Actor>) {
        let current = self.engine.describe_region(&actor.position());
        trace!(
            actor = %actor.id(),
            region = current.as_ref().map(|r| r.identity().to_string()).unwrap_or_default(),
            "tracking connected actor"
        );
        self.last_regions.insert(actor.id(), current);
    }

    /// Discard tracking state for a disconnected actor.
    pub fn forget(&self, actor: ActorId) {
        self.last_regions.remove(&actor);
    }

    /// Evaluate a movement between two positions.
    ///
    /// Sub-block movement is ignored to bound the evaluation rate; a
    /// `Deny` verdict means the originating movement must be rejected by
    /// the host.
    pub fn handle_move(&self, actor: &Arc<dyn Actor>, from: &Position, to: &Position) -> Verdict {
        if from.same_block(to) {
            return Verdict::Allow;
        }
        self.apply(actor, to)
    }

    /// Evaluate a teleport. Teleports always re-evaluate, even within the
    /// same block.
    pub fn handle_teleport(&self, actor: &Arc<dyn Actor>, to: &Position) -> Verdict {
        self.apply(actor, to)
    }

    /// The region the actor was last observed in, if tracked.
    pub fn tracked_region(&self, actor: ActorId) -> Option<RegionInfo> {
        self.last_regions.get(&actor).and_then(|e| e.value().clone())
    }

    /// Whether the actor currently has tracking state at all.
    pub fn is_tracked(&self, actor: ActorId) -> bool {
        self.last_regions.contains_key(&actor)
    }

    /// Number of tracked actors.
    pub fn tracked_count(&self) -> usize {
        self.last_regions.len()
    }

    /// Teardown: drop all tracking state.
    pub fn clear(&self) {
        self.last_regions.clear();
    }

    /// The transition function.
    ///
    /// Compares identities (both-absent counts as equal), proposes Leave
    /// then Enter, and only commits the new state when nothing vetoed.
    /// Re-entrant per actor: repeated reports of the same region are
    /// no-ops.
    fn apply(&self, actor: &Arc<dyn Actor>, to: &Position) -> Verdict {
        let current = self.engine.describe_region(to);
        let last = self
            .last_regions
            .get(&actor.id())
            .map(|entry| entry.value().clone())
            .unwrap_or(None);

        let last_identity = last.as_ref().map(RegionInfo::identity);
        let current_identity = current.as_ref().map(RegionInfo::identity);
        if last_identity == current_identity {
            return Verdict::Allow;
        }

        if let Some(old_region) = last {
            let leave = RegionEvent::new(Arc::clone(actor), EventKind::Leave(old_region));
            if self.events.dispatch(&leave).is_denied() {
                debug!(actor = %actor.id(), "leave vetoed; transition aborted");
                return Verdict::Deny;
            }
        }

        if let Some(new_region) = &current {
            let enter = RegionEvent::new(Arc::clone(actor), EventKind::Enter(new_region.clone()));
            if self.events.dispatch(&enter).is_denied() {
                debug!(actor = %actor.id(), "enter vetoed; transition aborted");
                return Verdict::Deny;
            }
        }

        self.last_regions.insert(actor.id(), current);
        Verdict::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::CacheConfig;
    use palisade_core::{
        Action, Decision, ProviderResult, RegionProvider, SubscriberPriority,
    };
    use parking_lot::Mutex;

    /// Provider that maps x >= 0 to region "east", x < 0 to wilderness.
    struct HalfPlaneProvider;

    impl RegionProvider for HalfPlaneProvider {
        fn name(&self) -> &str {
            "halfplane"
        }

        fn probe(&self) -> bool {
            true
        }

        fn authorize(
            &self,
            _actor: &dyn Actor,
            _position: &Position,
            _action: Action,
        ) -> ProviderResult<Decision> {
            Ok(Decision::allow())
        }

        fn describe_region(&self, position: &Position) -> ProviderResult<Option<RegionInfo>> {
            Ok((position.x >= 0.0).then(|| RegionInfo::new("halfplane", "east")))
        }
    }

    struct Walker {
        id: ActorId,
    }

    impl Actor for Walker {
        fn id(&self) -> ActorId {
            self.id
        }

        fn name(&self) -> &str {
            "walker"
        }

        fn position(&self) -> Position {
            Position::new("world", -10.0, 64.0, 0.0)
        }

        fn has_permission(&self, _node: &str) -> bool {
            false
        }
    }

    fn setup() -> (TransitionTracker, Arc<EventBus>, Arc<dyn Actor>) {
        let engine = Arc::new(DecisionEngine::new(CacheConfig::default(), "palisade.bypass"));
        engine.register_provider(Arc::new(HalfPlaneProvider));
        let events = Arc::new(EventBus::new());
        let tracker = TransitionTracker::new(engine, events.clone());
        let actor: Arc<dyn Actor> = Arc::new(Walker {
            id: ActorId::random(),
        });
        (tracker, events, actor)
    }

    fn at(x: f64) -> Position {
        Position::new("world", x, 64.0, 0.0)
    }

    #[test]
    fn sub_block_movement_is_ignored() {
        let (tracker, events, actor) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = log.clone();
            events.subscribe(SubscriberPriority::Normal, move |event| {
                log.lock().push(event.kind.name());
                Verdict::Allow
            });
        }

        tracker.track_connect(&actor);
        assert_eq!(
            tracker.handle_move(&actor, &at(5.1), &at(5.9)),
            Verdict::Allow
        );
        assert!(log.lock().is_empty());
    }

    #[test]
    fn entering_and_staying_put_emits_one_enter() {
        let (tracker, events, actor) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = log.clone();
            events.subscribe(SubscriberPriority::Normal, move |event| {
                log.lock().push(event.kind.name());
                Verdict::Allow
            });
        }

        tracker.track_connect(&actor); // starts at x = -10, wilderness
        assert_eq!(tracker.handle_move(&actor, &at(-1.0), &at(1.0)), Verdict::Allow);
        // wandering within the region never re-fires
        assert_eq!(tracker.handle_move(&actor, &at(1.0), &at(30.0)), Verdict::Allow);
        assert_eq!(*log.lock(), vec!["enter"]);
    }

    #[test]
    fn vetoed_enter_keeps_state_and_rejects_movement() {
        let (tracker, events, actor) = setup();
        events.subscribe(SubscriberPriority::First, |event| {
            if matches!(event.kind, EventKind::Enter(_)) {
                Verdict::Deny
            } else {
                Verdict::Allow
            }
        });

        tracker.track_connect(&actor);
        assert_eq!(tracker.handle_move(&actor, &at(-1.0), &at(1.0)), Verdict::Deny);
        assert!(tracker.tracked_region(actor.id()).is_none());
    }

    #[test]
    fn connect_inside_a_region_is_silent() {
        let (tracker, events, _) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = log.clone();
            events.subscribe(SubscriberPriority::Normal, move |event| {
                log.lock().push(event.kind.name());
                Verdict::Allow
            });
        }

        struct Camper {
            id: ActorId,
        }
        impl Actor for Camper {
            fn id(&self) -> ActorId {
                self.id
            }
            fn name(&self) -> &str {
                "camper"
            }
            fn position(&self) -> Position {
                Position::new("world", 5.0, 64.0, 0.0)
            }
            fn has_permission(&self, _node: &str) -> bool {
                false
            }
        }

        let camper: Arc<dyn Actor> = Arc::new(Camper {
            id: ActorId::random(),
        });
        tracker.track_connect(&camper);
        assert!(log.lock().is_empty());
        assert!(tracker.tracked_region(camper.id()).is_some());
    }

    #[test]
    fn disconnect_discards_state() {
        let (tracker, _, actor) = setup();
        tracker.track_connect(&actor);
        assert!(tracker.is_tracked(actor.id()));

        tracker.forget(actor.id());
        assert!(!tracker.is_tracked(actor.id()));
    }

    #[test]
    fn teleport_skips_the_block_filter() {
        let (tracker, events, actor) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = log.clone();
            events.subscribe(SubscriberPriority::Normal, move |event| {
                log.lock().push(event.kind.name());
                Verdict::Allow
            });
        }

        tracker.track_connect(&actor);
        assert_eq!(tracker.handle_teleport(&actor, &at(3.0)), Verdict::Allow);
        assert_eq!(*log.lock(), vec!["enter"]);
    }
}
