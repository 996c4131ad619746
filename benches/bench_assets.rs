use criterion::{black_box, criterion_group, criterion_main, Criterion};
use editor_assets::{
    Asset, AssetCache, AssetData, AssetMetadata, AssetRegistry, AssetType, Handle, PhysicsMaterial,
};

const ASSET_COUNT: u64 = 5_000;

fn populated_registry() -> AssetRegistry {
    let mut registry = AssetRegistry::new("/projects/bench/Assets");
    for i in 1..=ASSET_COUNT {
        registry.insert(AssetMetadata::new(
            Handle::from_raw(i),
            AssetType::Material,
            format!("Materials/Group{}/Material{i}.fmat", i % 32),
        ));
    }
    registry
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = populated_registry();

    c.bench_function("registry_lookup_by_path", |b| {
        b.iter(|| registry.get(black_box("Materials/Group7/Material2503.fmat")));
    });

    c.bench_function("registry_lookup_by_handle", |b| {
        b.iter(|| registry.get_by_handle(black_box(Handle::from_raw(2503))));
    });

    // Linear scan the secondary index replaces
    c.bench_function("registry_handle_scan", |b| {
        b.iter(|| {
            registry
                .iter()
                .find(|metadata| metadata.handle == black_box(Handle::from_raw(2503)))
        });
    });
}

fn bench_registry_relocate(c: &mut Criterion) {
    c.bench_function("registry_relocate_subtree", |b| {
        b.iter_batched(
            populated_registry,
            |mut registry| {
                let moved: Vec<_> = registry
                    .iter()
                    .filter(|metadata| metadata.file_path.starts_with("Materials/Group3"))
                    .map(|metadata| metadata.file_path.clone())
                    .collect();
                for path in moved {
                    let target = std::path::Path::new("Archive").join(&path);
                    black_box(registry.relocate(&path, target).ok());
                }
                black_box(registry)
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_cache_get(c: &mut Criterion) {
    let mut cache = AssetCache::new();
    for i in 1..=ASSET_COUNT {
        cache.insert(Asset::new(
            Handle::from_raw(i),
            AssetData::PhysicsMaterial(PhysicsMaterial::default()),
        ));
    }

    c.bench_function("cache_get_resident", |b| {
        b.iter(|| cache.get(black_box(Handle::from_raw(4096))));
    });
}

criterion_group!(
    benches,
    bench_registry_lookup,
    bench_registry_relocate,
    bench_cache_get
);
criterion_main!(benches);
