//! The decision engine: provider registry, ordered consultation, caching
//!
//! # Pipeline
//!
//! ```text
//! authorize(actor, position, action)
//!   bypass/privilege ──────────────► Allow (uncached)
//!   unresolved dimension ──────────► Allow (fail open)
//!   cache hit ─────────────────────► cached decision
//!   providers, descending priority ► first Deny wins, Err abstains
//!   nobody objected ───────────────► Allow
//! ```
//!
//! Region lookups intentionally differ: *any* denial wins an authorization,
//! but region identity needs a single authority, so `describe_region`
//! returns the first informative provider's answer and stops.

pub mod cache;

pub use cache::{CacheConfig, CacheStats, DecisionCache};

use cache::CacheKey;
use palisade_core::{
    Action, Actor, Decision, Position, RegionBounds, RegionInfo, RegionProvider,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Aggregates providers into one consistent decision surface.
///
/// Owns the provider list (sorted by descending priority, stable for ties)
/// and the result cache. Everything here is synchronous and re-entrant;
/// the interior maps are thread-safe so scheduler-driven callers can race
/// movement-driven ones.
pub struct DecisionEngine {
    providers: RwLock<Vec<Arc<dyn RegionProvider>>>,
    cache: DecisionCache,
    bypass_permission: String,
}

impl DecisionEngine {
    pub fn new(cache_config: CacheConfig, bypass_permission: impl Into<String>) -> Self {
        Self {
            providers: RwLock::new(Vec::new()),
            cache: DecisionCache::new(cache_config),
            bypass_permission: bypass_permission.into(),
        }
    }

    /// Register a provider, if its probe succeeds.
    ///
    /// Re-sorts the pipeline and drops cached decisions so the new
    /// provider's opinion applies immediately.
    pub fn register_provider(&self, provider: Arc<dyn RegionProvider>) {
        if !provider.probe() {
            debug!(provider = provider.name(), "provider skipped: probe failed");
            return;
        }

        info!(
            provider = provider.name(),
            priority = provider.priority().value(),
            "provider active"
        );

        let mut providers = self.providers.write();
        providers.push(provider);
        providers.sort_by_key(|p| std::cmp::Reverse(p.priority().value()));
        drop(providers);

        self.cache.clear();
    }

    /// Remove a provider by name (case-insensitive) and drop cached
    /// decisions that may have depended on it.
    pub fn unregister_provider(&self, name: &str) {
        self.providers
            .write()
            .retain(|p| !p.name().eq_ignore_ascii_case(name));
        self.cache.clear();
    }

    /// Look up a registered provider by name (case-insensitive).
    pub fn provider(&self, name: &str) -> Option<Arc<dyn RegionProvider>> {
        self.providers
            .read()
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Names of all registered providers, in consultation order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// May the actor perform the action at the position?
    ///
    /// First denial wins; a provider failure is logged and contributes no
    /// opinion. The result is cached briefly, keyed by actor, block and
    /// action — bypass results are not cached (they do not depend on
    /// providers at all).
    pub fn authorize(&self, actor: &dyn Actor, position: &Position, action: Action) -> Decision {
        if actor.has_permission(&self.bypass_permission) || actor.is_privileged() {
            return Decision::allow();
        }

        let Some(dimension) = position.dimension.as_deref() else {
            // an invalid world cannot be protected
            return Decision::allow();
        };

        let key = CacheKey {
            actor: actor.id(),
            dimension: dimension.to_string(),
            x: position.block_x(),
            y: position.block_y(),
            z: position.block_z(),
            action,
        };

        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        for provider in self.providers.read().iter() {
            match provider.authorize(actor, position, action) {
                Ok(decision) if decision.is_denied() => {
                    debug!(
                        actor = %actor.name(),
                        provider = provider.name(),
                        %action,
                        "action denied"
                    );
                    self.cache.insert(key, decision.clone());
                    return decision;
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(
                        provider = provider.name(),
                        %error,
                        "provider check failed; treating as abstain"
                    );
                }
            }
        }

        let allowed = Decision::allow();
        self.cache.insert(key, allowed.clone());
        allowed
    }

    /// Query exactly one named provider, skipping ordering and cache.
    ///
    /// Unknown provider or provider failure defaults to Allow: a missing
    /// backend must not be mistaken for a policy decision.
    pub fn authorize_via(
        &self,
        provider_name: &str,
        actor: &dyn Actor,
        position: &Position,
        action: Action,
    ) -> Decision {
        let Some(provider) = self.provider(provider_name) else {
            return Decision::allow();
        };

        match provider.authorize(actor, position, action) {
            Ok(decision) => decision,
            Err(error) => {
                warn!(
                    provider = provider_name,
                    %error,
                    "provider-scoped check failed; allowing"
                );
                Decision::allow()
            }
        }
    }

    /// The region at a position: first informative provider wins.
    pub fn describe_region(&self, position: &Position) -> Option<RegionInfo> {
        for provider in self.providers.read().iter() {
            match provider.describe_region(position) {
                Ok(Some(info)) => return Some(info),
                Ok(None) => {}
                Err(error) => {
                    debug!(
                        provider = provider.name(),
                        %error,
                        "region lookup failed; skipping provider"
                    );
                }
            }
        }
        None
    }

    /// The region at a position according to one named provider.
    pub fn describe_region_via(&self, provider_name: &str, position: &Position) -> Option<RegionInfo> {
        let provider = self.provider(provider_name)?;
        match provider.describe_region(position) {
            Ok(info) => info,
            Err(error) => {
                debug!(
                    provider = provider_name,
                    %error,
                    "provider-scoped region lookup failed"
                );
                None
            }
        }
    }

    /// Bounding volume of the region at a position: first informative
    /// provider wins, same authority rule as `describe_region`.
    pub fn describe_bounds(&self, position: &Position) -> Option<RegionBounds> {
        for provider in self.providers.read().iter() {
            match provider.describe_bounds(position) {
                Ok(Some(bounds)) => return Some(bounds),
                Ok(None) => {}
                Err(error) => {
                    debug!(
                        provider = provider.name(),
                        %error,
                        "bounds lookup failed; skipping provider"
                    );
                }
            }
        }
        None
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Teardown: drop all providers and cached decisions.
    pub fn clear(&self) {
        self.providers.write().clear();
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_core::{ActorId, ProviderError, ProviderPriority, ProviderResult, Surface};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestActor {
        id: ActorId,
        bypass: bool,
    }

    impl Actor for TestActor {
        fn id(&self) -> ActorId {
            self.id
        }

        fn name(&self) -> &str {
            "tester"
        }

        fn position(&self) -> Position {
            Position::new("world", 0.0, 64.0, 0.0)
        }

        fn has_permission(&self, node: &str) -> bool {
            self.bypass && node == "palisade.bypass"
        }

        fn standing_in(&self) -> Surface {
            Surface::air()
        }
    }

    struct CountingProvider {
        name: &'static str,
        priority: ProviderPriority,
        deny: bool,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn allow(name: &'static str, priority: ProviderPriority) -> Self {
            Self {
                name,
                priority,
                deny: false,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn deny(name: &'static str, priority: ProviderPriority) -> Self {
            Self {
                deny: true,
                ..Self::allow(name, priority)
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::allow(name, ProviderPriority::Normal)
            }
        }
    }

    impl RegionProvider for CountingProvider {
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
            _action: Action,
        ) -> ProviderResult<Decision> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::backend("boom"));
            }
            Ok(if self.deny {
                Decision::deny(self.name)
            } else {
                Decision::allow()
            })
        }
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(CacheConfig::default(), "palisade.bypass")
    }

    fn actor() -> TestActor {
        TestActor {
            id: ActorId::random(),
            bypass: false,
        }
    }

    #[test]
    fn first_denial_wins_regardless_of_registration_order() {
        for reversed in [false, true] {
            let engine = engine();
            let denier = Arc::new(CountingProvider::deny("guard", ProviderPriority::Highest));
            let allower = Arc::new(CountingProvider::allow("towny", ProviderPriority::Normal));

            if reversed {
                engine.register_provider(allower.clone());
                engine.register_provider(denier.clone());
            } else {
                engine.register_provider(denier.clone());
                engine.register_provider(allower.clone());
            }

            let who = actor();
            let decision =
                engine.authorize(&who, &who.position(), Action::BlockBreak);
            assert_eq!(decision.source(), Some("guard"));
            // the higher-priority denial short-circuits the sweep
            assert_eq!(allower.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn cache_hit_skips_providers() {
        let engine = engine();
        let provider = Arc::new(CountingProvider::allow("guard", ProviderPriority::Normal));
        engine.register_provider(provider.clone());

        let who = actor();
        let pos = who.position();
        assert!(engine.authorize(&who, &pos, Action::Interact).is_allowed());
        assert!(engine.authorize(&who, &pos, Action::Interact).is_allowed());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bypass_permission_always_allows() {
        let engine = engine();
        engine.register_provider(Arc::new(CountingProvider::deny(
            "guard",
            ProviderPriority::Highest,
        )));

        let who = TestActor {
            id: ActorId::random(),
            bypass: true,
        };
        assert!(engine
            .authorize(&who, &who.position(), Action::BlockBreak)
            .is_allowed());
    }

    #[test]
    fn unresolved_dimension_fails_open() {
        let engine = engine();
        engine.register_provider(Arc::new(CountingProvider::deny(
            "guard",
            ProviderPriority::Highest,
        )));

        let who = actor();
        let decision = engine.authorize(&who, &Position::unresolved(0.0, 64.0, 0.0), Action::Pvp);
        assert!(decision.is_allowed());
    }

    #[test]
    fn failing_provider_abstains() {
        let engine = engine();
        engine.register_provider(Arc::new(CountingProvider::failing("flaky")));

        let who = actor();
        assert!(engine
            .authorize(&who, &who.position(), Action::BlockPlace)
            .is_allowed());
    }

    #[test]
    fn scoped_check_ignores_other_providers() {
        let engine = engine();
        engine.register_provider(Arc::new(CountingProvider::deny(
            "guard",
            ProviderPriority::Highest,
        )));
        engine.register_provider(Arc::new(CountingProvider::allow(
            "towny",
            ProviderPriority::Low,
        )));

        let who = actor();
        let pos = who.position();
        assert!(engine
            .authorize_via("towny", &who, &pos, Action::Interact)
            .is_allowed());
        assert!(engine
            .authorize_via("missing", &who, &pos, Action::Interact)
            .is_allowed());
        assert!(engine
            .authorize_via("guard", &who, &pos, Action::Interact)
            .is_denied());
    }

    #[test]
    fn unregister_drops_the_provider() {
        let engine = engine();
        engine.register_provider(Arc::new(CountingProvider::deny(
            "guard",
            ProviderPriority::Highest,
        )));

        engine.unregister_provider("GUARD");
        let who = actor();
        assert!(engine
            .authorize(&who, &who.position(), Action::BlockBreak)
            .is_allowed());
        assert!(engine.provider("guard").is_none());
    }
}
