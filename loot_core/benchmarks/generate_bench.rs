use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use loot_core::{
    CatalogItem, CatalogItemId, LootConfig, LootEngine, PackageCategory, SeededRandom,
    StaticCatalog,
};

fn catalog(size: usize) -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::from_items((0..size).map(|index| {
        CatalogItem::new(CatalogItemId::builtin(format!("item_{index}")), 64)
    })))
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for category in PackageCategory::ALL {
        let engine = LootEngine::new(Arc::new(LootConfig::default()), catalog(512));
        engine.setup_complete();
        let mut rng = SeededRandom::seeded(7);
        group.bench_function(BenchmarkId::new("category", category.key()), |b| {
            b.iter(|| engine.generate_with(category, &mut rng))
        });
    }

    group.finish();
}

fn bench_pool_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_build");

    for size in [128usize, 1024, 8192] {
        group.bench_with_input(BenchmarkId::new("catalog", size), &size, |b, &size| {
            b.iter_batched(
                || LootEngine::new(Arc::new(LootConfig::default()), catalog(size)),
                |engine| engine.setup_complete(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(generate_benches, bench_generate, bench_pool_build);
criterion_main!(generate_benches);
