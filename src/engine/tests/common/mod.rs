//! Shared fixtures for the integration suites
#![allow(dead_code)]

use palisade_core::{
    Action, Actor, ActorId, Decision, Position, ProviderError, ProviderPriority, ProviderResult,
    RegionBounds, RegionInfo, RegionProvider, Roster, Surface,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;

/// Install a log subscriber once so failing tests print engine
/// diagnostics (`RUST_LOG=palisade_engine=debug`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An actor with settable position/permissions and a message inbox.
pub struct TestActor {
    id: ActorId,
    name: String,
    position: Mutex<Position>,
    permissions: RwLock<HashSet<String>>,
    privileged: bool,
    surface: Mutex<Surface>,
    messages: Mutex<Vec<String>>,
}

impl TestActor {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: ActorId::random(),
            name: name.into(),
            position: Mutex::new(Position::new("world", 0.0, 64.0, 0.0)),
            permissions: RwLock::new(HashSet::new()),
            privileged: false,
            surface: Mutex::new(Surface::air()),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn grant(&self, node: impl Into<String>) {
        self.permissions.write().insert(node.into());
    }

    pub fn move_to(&self, position: Position) {
        *self.position.lock() = position;
    }

    pub fn set_surface(&self, surface: Surface) {
        *self.surface.lock() = surface;
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Actor for TestActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Position {
        self.position.lock().clone()
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.read().contains(node)
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn standing_in(&self) -> Surface {
        self.surface.lock().clone()
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// A provider serving axis-aligned box regions with fixed denials.
pub struct FakeProvider {
    pub name: &'static str,
    pub priority: ProviderPriority,
    pub deny_actions: Vec<Action>,
    pub regions: Vec<(RegionBounds, RegionInfo)>,
    pub fail: bool,
}

impl FakeProvider {
    pub fn named(name: &'static str, priority: ProviderPriority) -> Self {
        Self {
            name,
            priority,
            deny_actions: Vec::new(),
            regions: Vec::new(),
            fail: false,
        }
    }

    pub fn denying(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.deny_actions.extend(actions);
        self
    }

    pub fn with_region(mut self, bounds: RegionBounds, info: RegionInfo) -> Self {
        self.regions.push((bounds, info));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl RegionProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn probe(&self) -> bool {
        true
    }

    fn priority(&self) -> ProviderPriority {
        self.priority
    }

    fn authorize(
        &self,
        _actor: &dyn Actor,
        _position: &Position,
        action: Action,
    ) -> ProviderResult<Decision> {
        if self.fail {
            return Err(ProviderError::backend("simulated backend failure"));
        }
        Ok(if self.deny_actions.contains(&action) {
            Decision::deny(self.name)
        } else {
            Decision::allow()
        })
    }

    fn describe_region(&self, position: &Position) -> ProviderResult<Option<RegionInfo>> {
        if self.fail {
            return Err(ProviderError::backend("simulated backend failure"));
        }
        Ok(self
            .regions
            .iter()
            .find(|(bounds, _)| bounds.contains(position))
            .map(|(_, info)| info.clone()))
    }

    fn describe_bounds(&self, position: &Position) -> ProviderResult<Option<RegionBounds>> {
        Ok(self
            .regions
            .iter()
            .find(|(bounds, _)| bounds.contains(position))
            .map(|(bounds, _)| bounds.clone()))
    }
}

/// A roster backed by a mutable actor list.
#[derive(Default)]
pub struct FixedRoster {
    actors: RwLock<Vec<Arc<dyn Actor>>>,
}

impl FixedRoster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, actor: Arc<dyn Actor>) {
        self.actors.write().push(actor);
    }

    pub fn remove(&self, id: ActorId) {
        self.actors.write().retain(|a| a.id() != id);
    }
}

impl Roster for FixedRoster {
    fn connected(&self) -> Vec<Arc<dyn Actor>> {
        self.actors.read().clone()
    }
}

/// Bounds for a box spanning the given x-range at all relevant heights.
pub fn x_band(dimension: &str, from_x: f64, to_x: f64) -> RegionBounds {
    RegionBounds::new(
        Position::new(dimension, from_x, -64.0, -512.0),
        Position::new(dimension, to_x, 320.0, 512.0),
    )
}

pub fn at(x: f64) -> Position {
    Position::new("world", x, 64.0, 0.0)
}
