//! The guard compiler: declarative policies become cached validator
//! pipelines
//!
//! A [`GuardPolicy`] is compiled exactly once per [`OperationId`] into a
//! [`GateLogic`] — a bypass permission, an optional surface predicate, a
//! region-info fetch strategy and an ordered list of validator closures.
//! Evaluation afterwards is a handful of closure calls; no policy
//! introspection happens on the hot path.

pub mod policy;

pub use policy::{GuardPolicy, OperationId, SurfaceRule};

use crate::decision::DecisionEngine;
use dashmap::DashMap;
use palisade_core::{Actor, RegionInfo, RegionRole};
use std::sync::Arc;
use tracing::warn;

type SurfaceCheck = Box<dyn Fn(&dyn Actor) -> bool + Send + Sync>;
type InfoFetch = Box<dyn Fn(&dyn Actor) -> Option<RegionInfo> + Send + Sync>;
type Validator = Box<dyn Fn(&dyn Actor, Option<&RegionInfo>) -> bool + Send + Sync>;

/// Compiled, executable form of one operation's policy.
struct GateLogic {
    bypass_permission: Option<String>,
    surface_check: Option<SurfaceCheck>,
    fetch: InfoFetch,
    validators: Vec<Validator>,
}

/// Compiles and evaluates operation guards.
///
/// Pipelines are cached for the process lifetime; there is no
/// invalidation path, so an operation's policy is fixed once registered.
pub struct Gate {
    engine: Arc<DecisionEngine>,
    bypass_permission: String,
    compiled: DashMap<OperationId, Arc<GateLogic>>,
}

impl Gate {
    pub fn new(engine: Arc<DecisionEngine>, bypass_permission: impl Into<String>) -> Self {
        Self {
            engine,
            bypass_permission: bypass_permission.into(),
            compiled: DashMap::new(),
        }
    }

    /// Compile and cache the policy for an operation.
    ///
    /// The first registration for an identity wins; a second registration
    /// is ignored (pipelines are built exactly once).
    pub fn register(&self, operation: OperationId, policy: GuardPolicy) {
        self.compiled
            .entry(operation)
            .or_insert_with(|| Arc::new(self.compile(&policy)));
    }

    /// Evaluate the guard for a registered operation.
    ///
    /// An unregistered operation is a compilation failure: it is logged
    /// and a permissive always-true pipeline is cached in its place, so a
    /// wiring mistake cannot permanently block actors.
    pub fn evaluate(&self, operation: &OperationId, actor: &dyn Actor) -> bool {
        let logic = match self.compiled.get(operation) {
            Some(logic) => Arc::clone(&logic),
            None => {
                warn!(%operation, "no guard registered for operation; allowing");
                let permissive = Arc::new(self.compile(&GuardPolicy::new()));
                self.compiled
                    .entry(operation.clone())
                    .or_insert_with(|| Arc::clone(&permissive));
                permissive
            }
        };

        self.run(&logic, actor)
    }

    /// Evaluate, compiling the given policy on first use.
    ///
    /// For callers that carry the declaration to the call site instead of
    /// registering up front. The policy is only consulted the first time
    /// an identity is seen.
    pub fn evaluate_with(
        &self,
        operation: &OperationId,
        policy: &GuardPolicy,
        actor: &dyn Actor,
    ) -> bool {
        let logic = Arc::clone(
            &self
                .compiled
                .entry(operation.clone())
                .or_insert_with(|| Arc::new(self.compile(policy))),
        );

        self.run(&logic, actor)
    }

    /// Number of compiled pipelines.
    pub fn compiled_count(&self) -> usize {
        self.compiled.len()
    }

    /// Teardown: drop all compiled pipelines.
    pub fn clear(&self) {
        self.compiled.clear();
    }

    fn run(&self, logic: &GateLogic, actor: &dyn Actor) -> bool {
        if actor.has_permission(&self.bypass_permission) || actor.is_privileged() {
            return true;
        }

        if let Some(node) = &logic.bypass_permission {
            if actor.has_permission(node) {
                return true;
            }
        }

        if let Some(check) = &logic.surface_check {
            if !check(actor) {
                return false;
            }
        }

        let info = (logic.fetch)(actor);

        logic
            .validators
            .iter()
            .all(|validator| validator(actor, info.as_ref()))
    }

    fn compile(&self, policy: &GuardPolicy) -> GateLogic {
        let needs_region = policy.require_region.is_some() || policy.require_role.is_some();
        if policy.wilderness && needs_region {
            warn!("guard declares wilderness together with a region/role requirement; it can never pass");
        }

        let surface_check: Option<SurfaceCheck> = policy.surface.clone().map(|rule| {
            let check: SurfaceCheck = Box::new(move |actor: &dyn Actor| {
                let surface = if rule.checks_ground() {
                    actor.standing_on()
                } else {
                    actor.standing_in()
                };
                rule.allows(&surface)
            });
            check
        });

        let fetch: InfoFetch = match policy.provider_scope.clone() {
            Some(provider) => {
                let engine = Arc::clone(&self.engine);
                Box::new(move |actor: &dyn Actor| {
                    engine.describe_region_via(&provider, &actor.position())
                })
            }
            None => {
                let engine = Arc::clone(&self.engine);
                Box::new(move |actor: &dyn Actor| engine.describe_region(&actor.position()))
            }
        };

        let mut validators: Vec<Validator> = Vec::new();

        if let Some(rule) = &policy.blacklist {
            let banned: Vec<String> = rule.ids.iter().map(|id| id.to_lowercase()).collect();
            let scoped_provider = rule.provider.clone();
            validators.push(Box::new(move |_actor, info| {
                let Some(info) = info else { return true };
                let in_scope = scoped_provider
                    .as_deref()
                    .map_or(true, |p| info.provider().eq_ignore_ascii_case(p));
                if in_scope {
                    !banned.contains(&info.region_id().to_lowercase())
                } else {
                    true
                }
            }));
        }

        if policy.wilderness {
            validators.push(Box::new(|_actor, info| info.is_none()));
        }

        if let Some(rule) = &policy.action_check {
            let action = rule.action;
            let bypass = rule.bypass_permission.clone();
            let engine = Arc::clone(&self.engine);
            validators.push(Box::new(move |actor, _info| {
                if let Some(node) = &bypass {
                    if actor.has_permission(node) {
                        return true;
                    }
                }
                engine
                    .authorize(actor, &actor.position(), action)
                    .is_allowed()
            }));
        }

        if needs_region {
            // region/role requirements cannot hold in the wilderness
            validators.push(Box::new(|_actor, info| info.is_some()));
        }

        if let Some(rule) = &policy.require_region {
            let region_id = rule.region_id.to_lowercase();
            let scoped_provider = rule.provider.clone();
            validators.push(Box::new(move |_actor, info| {
                let Some(info) = info else { return false };
                if !info.region_id().eq_ignore_ascii_case(&region_id) {
                    return false;
                }
                scoped_provider
                    .as_deref()
                    .map_or(true, |p| info.provider().eq_ignore_ascii_case(p))
            }));
        }

        if let Some(role) = policy.require_role {
            validators.push(Box::new(move |actor, info| {
                let Some(info) = info else { return false };
                match role {
                    RegionRole::Owner => info.is_owner(actor.id()),
                    RegionRole::MemberOrOwner => {
                        info.is_owner(actor.id()) || info.is_member(actor.id())
                    }
                    RegionRole::Visitor => true,
                }
            }));
        }

        GateLogic {
            bypass_permission: policy.bypass_permission.clone(),
            surface_check,
            fetch,
            validators,
        }
    }
}
