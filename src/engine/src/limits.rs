//! Per-region occupancy limits
//!
//! The controller owns the limit and live-count maps and keeps them
//! consistent with the transition tracker by subscribing to its
//! notifications: admission control runs at `First` priority on Enter
//! (reject before any other subscriber reacts), bookkeeping runs at
//! `Monitor` priority on Leave (only count departures that actually took
//! effect).

use crate::decision::DecisionEngine;
use crate::events::EventBus;
use dashmap::DashMap;
use palisade_core::{
    Actor, EventKind, RegionIdentity, RegionInfo, Roster, SubscriberPriority, Verdict,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Enforces per-region occupancy limits.
pub struct CapacityController {
    engine: Arc<DecisionEngine>,
    limit_bypass_permission: String,
    limits: DashMap<RegionIdentity, u32>,
    occupancy: DashMap<RegionIdentity, u32>,
}

impl CapacityController {
    pub fn new(engine: Arc<DecisionEngine>, limit_bypass_permission: impl Into<String>) -> Self {
        Self {
            engine,
            limit_bypass_permission: limit_bypass_permission.into(),
            limits: DashMap::new(),
            occupancy: DashMap::new(),
        }
    }

    /// Wire the controller onto the notification bus.
    ///
    /// Called once at construction time by the context object.
    pub fn attach(self: &Arc<Self>, events: &EventBus) {
        let on_enter = Arc::clone(self);
        events.subscribe(SubscriberPriority::First, move |event| {
            let EventKind::Enter(info) = &event.kind else {
                return Verdict::Allow;
            };
            on_enter.admit(event.actor.as_ref(), info)
        });

        let on_leave = Arc::clone(self);
        events.subscribe(SubscriberPriority::Monitor, move |event| {
            if let EventKind::Leave(info) = &event.kind {
                on_leave.decrement(&info.identity());
            }
            Verdict::Allow
        });
    }

    /// Configure the maximum occupant count for a region.
    pub fn set_limit(&self, identity: RegionIdentity, max: u32) {
        info!(region = %identity, max, "region occupancy limit set");
        self.limits.insert(identity, max);
    }

    /// Remove a configured limit. The live count is kept; it becomes
    /// relevant again if the limit is re-added.
    pub fn remove_limit(&self, identity: &RegionIdentity) {
        self.limits.remove(identity);
    }

    /// The configured limit for a region, if any.
    pub fn limit(&self, identity: &RegionIdentity) -> Option<u32> {
        self.limits.get(identity).map(|v| *v)
    }

    /// The live occupant count for a region.
    pub fn occupancy(&self, identity: &RegionIdentity) -> u32 {
        self.occupancy.get(identity).map(|v| *v).unwrap_or(0)
    }

    /// Whether the region is at (or beyond) its configured limit.
    /// `false` when no limit is configured.
    pub fn is_full(&self, info: &RegionInfo) -> bool {
        let identity = info.identity();
        match self.limit(&identity) {
            Some(max) => self.occupancy(&identity) >= max,
            None => false,
        }
    }

    /// Count a connect for an actor already inside a limited region.
    pub fn handle_connect(&self, actor: &dyn Actor) {
        if let Some(info) = self.engine.describe_region(&actor.position()) {
            self.increment(&info.identity());
        }
    }

    /// Count a disconnect for an actor inside a limited region.
    pub fn handle_disconnect(&self, actor: &dyn Actor) {
        if let Some(info) = self.engine.describe_region(&actor.position()) {
            self.decrement(&info.identity());
        }
    }

    /// Clear and recompute all live counts from the connected actors'
    /// current regions. Used at startup to resynchronize after a restart,
    /// and available as a forced administrative recount.
    pub fn recount(&self, roster: &dyn Roster) {
        self.occupancy.clear();
        for actor in roster.connected() {
            if let Some(info) = self.engine.describe_region(&actor.position()) {
                self.increment(&info.identity());
            }
        }
        debug!(regions = self.occupancy.len(), "occupancy recounted");
    }

    /// Teardown: drop all limits and counts.
    pub fn clear(&self) {
        self.limits.clear();
        self.occupancy.clear();
    }

    /// Enter admission: veto when full, count otherwise.
    fn admit(&self, actor: &dyn Actor, info: &RegionInfo) -> Verdict {
        if self.is_full(info) && !actor.has_permission(&self.limit_bypass_permission) {
            let identity = info.identity();
            let current = self.occupancy(&identity);
            let max = self.limit(&identity).unwrap_or(0);
            debug!(actor = %actor.name(), region = %identity, current, max, "enter vetoed: region full");
            actor.send_message(&format!("This region is full ({current}/{max})"));
            return Verdict::Deny;
        }

        self.increment(&info.identity());
        Verdict::Allow
    }

    /// Increment the live count, but only for limited regions.
    fn increment(&self, identity: &RegionIdentity) {
        if self.limits.contains_key(identity) {
            self.occupancy
                .entry(identity.clone())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Decrement the live count, floored at zero.
    fn decrement(&self, identity: &RegionIdentity) {
        if self.limits.contains_key(identity) {
            if let Some(mut count) = self.occupancy.get_mut(identity) {
                *count = count.saturating_sub(1);
            }
        }
    }
}
