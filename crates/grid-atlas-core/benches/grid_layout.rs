use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use grid_atlas_core::prelude::*;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<SpriteSize> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            SpriteSize::new(format!("sprite_{i}.png"), w, h)
        })
        .collect()
}

fn bench_grid_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_layout");
    let cfg = PackerConfig::default();

    for count in [52usize, 200, 1000] {
        let sprites = generate_sprites(count, 16, 64);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("pack", count), &sprites, |b, sprites| {
            b.iter(|| black_box(pack(sprites, &cfg)))
        });
    }

    group.finish();
}

fn bench_index_export(c: &mut Criterion) {
    let sprites = generate_sprites(200, 64, 64);
    let atlas = pack(&sprites, &PackerConfig::default()).expect("pack");
    c.bench_function("index_export_200", |b| {
        b.iter(|| black_box(AtlasIndex::from_atlas(&atlas).to_json_string()))
    });
}

criterion_group!(benches, bench_grid_layout, bench_index_export);
criterion_main!(benches);
