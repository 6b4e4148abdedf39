//! Notification bus with propose/respond veto semantics

use palisade_core::{RegionEvent, SubscriberPriority, Verdict};
use parking_lot::RwLock;
use tracing::trace;

type Handler = Box<dyn Fn(&RegionEvent) -> Verdict + Send + Sync>;

struct Subscriber {
    priority: SubscriberPriority,
    handler: Handler,
}

/// Ordered subscriber registry for region notifications.
///
/// `dispatch` proposes an event to subscribers in priority order (`First`
/// before `Monitor`, registration order within a level). The first `Deny`
/// stops the proposal: later subscribers never observe a vetoed event, so
/// a `Monitor`-level observer only ever sees events that actually took
/// effect.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber at the given priority.
    pub fn subscribe<F>(&self, priority: SubscriberPriority, handler: F)
    where
        F: Fn(&RegionEvent) -> Verdict + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Subscriber {
            priority,
            handler: Box::new(handler),
        });
        subscribers.sort_by_key(|s| s.priority);
    }

    /// Propose an event; returns the collective verdict.
    pub fn dispatch(&self, event: &RegionEvent) -> Verdict {
        trace!(kind = event.kind.name(), actor = %event.actor.id(), "dispatching region event");

        for subscriber in self.subscribers.read().iter() {
            if (subscriber.handler)(event).is_denied() {
                return Verdict::Deny;
            }
        }
        Verdict::Allow
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

    /// Teardown: drop all subscribers.
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}
