//! Periodic "still here" re-announcements for in-region actors

use crate::decision::DecisionEngine;
use crate::events::EventBus;
use palisade_core::{EventKind, RegionEvent, Roster};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Re-announces, on a fixed interval, every connected actor's current
/// region as a [`Stay`](EventKind::Stay) notification.
///
/// Pure fan-out: no tracked state is read or written, and a veto only
/// suppresses the remaining subscribers for that actor's tick — never the
/// actor's position. External subscribers use this for periodic
/// region-scoped effects.
pub struct StayNotifier {
    engine: Arc<DecisionEngine>,
    events: Arc<EventBus>,
}

impl StayNotifier {
    pub fn new(engine: Arc<DecisionEngine>, events: Arc<EventBus>) -> Self {
        Self { engine, events }
    }

    /// One tick: announce every in-region actor.
    pub fn run_once(&self, roster: &dyn Roster) {
        for actor in roster.connected() {
            if let Some(info) = self.engine.describe_region(&actor.position()) {
                trace!(actor = %actor.id(), region = %info.identity(), "stay tick");
                let event = RegionEvent::new(actor, EventKind::Stay(info));
                // a Stay veto has no further consequence
                let _ = self.events.dispatch(&event);
            }
        }
    }

    /// Run ticks on an interval until the returned handle is aborted.
    ///
    /// The first tick fires one full interval after spawning, matching a
    /// delayed-start repeating scheduler.
    pub fn spawn(self: Arc<Self>, roster: Arc<dyn Roster>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                self.run_once(roster.as_ref());
            }
        })
    }
}
