//! Authorize hot-path benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use palisade_core::{
    Action, Actor, ActorId, Decision, Position, ProviderPriority, ProviderResult, RegionProvider,
};
use palisade_engine::{CacheConfig, DecisionEngine};
use std::sync::Arc;
use std::time::Duration;

struct BenchActor {
    id: ActorId,
}

impl Actor for BenchActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        "bench"
    }

    fn position(&self) -> Position {
        Position::new("world", 0.0, 64.0, 0.0)
    }

    fn has_permission(&self, _node: &str) -> bool {
        false
    }
}

struct AllowProvider;

impl RegionProvider for AllowProvider {
    fn name(&self) -> &str {
        "bench-provider"
    }

    fn probe(&self) -> bool {
        true
    }

    fn priority(&self) -> ProviderPriority {
        ProviderPriority::Normal
    }

    fn authorize(
        &self,
        _actor: &dyn Actor,
        _position: &Position,
        _action: Action,
    ) -> ProviderResult<Decision> {
        Ok(Decision::allow())
    }
}

fn bench_authorize(c: &mut Criterion) {
    let engine = DecisionEngine::new(CacheConfig::default(), "palisade.bypass");
    engine.register_provider(Arc::new(AllowProvider));
    let actor = BenchActor {
        id: ActorId::random(),
    };
    let position = actor.position();

    c.bench_function("authorize_cached", |b| {
        b.iter(|| {
            black_box(engine.authorize(&actor, black_box(&position), Action::BlockBreak))
        })
    });

    let cold_engine = DecisionEngine::new(
        CacheConfig {
            ttl: Duration::from_nanos(1),
            ..Default::default()
        },
        "palisade.bypass",
    );
    cold_engine.register_provider(Arc::new(AllowProvider));

    c.bench_function("authorize_uncached", |b| {
        b.iter(|| {
            black_box(cold_engine.authorize(&actor, black_box(&position), Action::BlockBreak))
        })
    });
}

criterion_group!(benches, bench_authorize);
criterion_main!(benches);
