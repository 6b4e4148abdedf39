//! The Palisade context object
//!
//! One explicit, constructor-initialized object owning the four
//! components and the stay task. Hosts hold a `Palisade`, feed it
//! connect/move/disconnect notifications, and route authorization
//! questions through it; `shutdown` tears everything down again. No
//! component state lives outside this object.

use crate::config::PalisadeConfig;
use crate::decision::{CacheStats, DecisionEngine};
use crate::events::EventBus;
use crate::gate::{Gate, GuardPolicy, OperationId};
use crate::limits::CapacityController;
use crate::stay::StayNotifier;
use crate::tracking::TransitionTracker;
use palisade_core::{
    Action, Actor, Decision, Position, RegionBounds, RegionIdentity, RegionInfo, RegionProvider,
    Roster, Verdict,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Central entry point aggregating providers, guards, transition
/// tracking and capacity control behind one consistent surface.
pub struct Palisade {
    config: PalisadeConfig,
    engine: Arc<DecisionEngine>,
    events: Arc<EventBus>,
    gate: Gate,
    tracker: TransitionTracker,
    limits: Arc<CapacityController>,
    stay: Arc<StayNotifier>,
    stay_task: Mutex<Option<JoinHandle<()>>>,
}

impl Palisade {
    pub fn new(config: PalisadeConfig) -> Self {
        let engine = Arc::new(DecisionEngine::new(
            config.cache.clone(),
            config.bypass_permission.clone(),
        ));
        let events = Arc::new(EventBus::new());
        let gate = Gate::new(Arc::clone(&engine), config.bypass_permission.clone());
        let tracker = TransitionTracker::new(Arc::clone(&engine), Arc::clone(&events));
        let limits = Arc::new(CapacityController::new(
            Arc::clone(&engine),
            config.limit_bypass_permission.clone(),
        ));
        limits.attach(&events);
        let stay = Arc::new(StayNotifier::new(Arc::clone(&engine), Arc::clone(&events)));

        info!("palisade context initialized");

        Self {
            config,
            engine,
            events,
            gate,
            tracker,
            limits,
            stay,
            stay_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PalisadeConfig {
        &self.config
    }

    /// The notification bus, for subscriber registration.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn engine(&self) -> &Arc<DecisionEngine> {
        &self.engine
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn capacity(&self) -> &Arc<CapacityController> {
        &self.limits
    }

    // ----- provider administration ------------------------------------

    pub fn register_provider(&self, provider: Arc<dyn RegionProvider>) {
        self.engine.register_provider(provider);
    }

    pub fn unregister_provider(&self, name: &str) {
        self.engine.unregister_provider(name);
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn RegionProvider>> {
        self.engine.provider(name)
    }

    // ----- decision surface -------------------------------------------

    /// Full authorization check; see [`DecisionEngine::authorize`].
    pub fn authorize(&self, actor: &dyn Actor, position: &Position, action: Action) -> Decision {
        self.engine.authorize(actor, position, action)
    }

    /// Convenience wrapper over [`Self::authorize`].
    pub fn can_act(&self, actor: &dyn Actor, position: &Position, action: Action) -> bool {
        self.authorize(actor, position, action).is_allowed()
    }

    /// Query exactly one named provider, skipping ordering and cache.
    pub fn authorize_via(
        &self,
        provider_name: &str,
        actor: &dyn Actor,
        position: &Position,
        action: Action,
    ) -> Decision {
        self.engine.authorize_via(provider_name, actor, position, action)
    }

    /// The region at a position (highest-priority informative provider).
    pub fn region_at(&self, position: &Position) -> Option<RegionInfo> {
        self.engine.describe_region(position)
    }

    /// The region at a position according to one named provider.
    pub fn region_at_via(&self, provider_name: &str, position: &Position) -> Option<RegionInfo> {
        self.engine.describe_region_via(provider_name, position)
    }

    /// Bounding volume of the region at a position.
    pub fn bounds_at(&self, position: &Position) -> Option<RegionBounds> {
        self.engine.describe_bounds(position)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    // ----- guarded operations -----------------------------------------

    /// Register an operation's guard policy (compiled immediately).
    pub fn register_operation(&self, operation: OperationId, policy: GuardPolicy) {
        self.gate.register(operation, policy);
    }

    /// Evaluate a registered operation's guard for an actor.
    pub fn guard(&self, operation: &OperationId, actor: &dyn Actor) -> bool {
        self.gate.evaluate(operation, actor)
    }

    // ----- capacity administration ------------------------------------

    pub fn set_region_limit(&self, provider: &str, region_id: &str, max: u32) {
        self.limits
            .set_limit(RegionIdentity::new(provider, region_id), max);
    }

    pub fn remove_region_limit(&self, provider: &str, region_id: &str) {
        self.limits
            .remove_limit(&RegionIdentity::new(provider, region_id));
    }

    pub fn is_region_full(&self, info: &RegionInfo) -> bool {
        self.limits.is_full(info)
    }

    /// Forced occupancy recount; also the startup resynchronization.
    pub fn recount(&self, roster: &dyn Roster) {
        self.limits.recount(roster);
    }

    // ----- host notifications -----------------------------------------

    /// An actor connected. Seeds tracking state (silently) and counts the
    /// actor into its region's occupancy.
    pub fn handle_connect(&self, actor: &Arc<dyn Actor>) {
        self.tracker.track_connect(actor);
        self.limits.handle_connect(actor.as_ref());
    }

    /// An actor disconnected. Releases occupancy and tracking state.
    pub fn handle_disconnect(&self, actor: &Arc<dyn Actor>) {
        self.limits.handle_disconnect(actor.as_ref());
        self.tracker.forget(actor.id());
    }

    /// An actor moved. A `Deny` verdict means the host must reject the
    /// movement.
    pub fn handle_move(&self, actor: &Arc<dyn Actor>, from: &Position, to: &Position) -> Verdict {
        self.tracker.handle_move(actor, from, to)
    }

    /// An actor teleported (no sub-block filtering).
    pub fn handle_teleport(&self, actor: &Arc<dyn Actor>, to: &Position) -> Verdict {
        self.tracker.handle_teleport(actor, to)
    }

    /// The region an actor was last observed in.
    pub fn tracked_region(&self, actor: &dyn Actor) -> Option<RegionInfo> {
        self.tracker.tracked_region(actor.id())
    }

    // ----- stay notifier ----------------------------------------------

    /// Start the periodic stay notifier over the given roster. Replaces
    /// any previously running notifier task.
    pub fn start_stay_notifier(&self, roster: Arc<dyn Roster>) {
        let handle = Arc::clone(&self.stay).spawn(roster, self.config.stay_interval);
        if let Some(previous) = self.stay_task.lock().replace(handle) {
            previous.abort();
        }
    }

    /// One synchronous stay tick, for hosts that drive their own
    /// scheduler.
    pub fn stay_tick(&self, roster: &dyn Roster) {
        self.stay.run_once(roster);
    }

    /// Teardown: stop the stay task and clear every map. The object can
    /// be dropped afterwards; nothing lingers.
    pub fn shutdown(&self) {
        if let Some(task) = self.stay_task.lock().take() {
            task.abort();
        }
        self.engine.clear();
        self.gate.clear();
        self.tracker.clear();
        self.limits.clear();
        self.events.clear();
        info!("palisade context shut down");
    }
}

impl Drop for Palisade {
    fn drop(&mut self) {
        if let Some(task) = self.stay_task.lock().take() {
            task.abort();
        }
    }
}
