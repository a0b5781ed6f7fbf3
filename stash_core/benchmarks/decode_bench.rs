use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stash_core::{
    decode_stash, SpawnCatalog, StashBlockBuilder, StashDecoder, StashReader, MAX_SLOTS,
};

fn block_with(populated: usize) -> Vec<u8> {
    let mut builder = StashBlockBuilder::new();
    for slot in 0..populated {
        builder = builder.entry(
            0x9000_0000_0000_0000 | slot as u64,
            0x2468_ACE0u32.wrapping_mul(slot as u32 + 1),
            900 + slot as u16 * 3,
        );
    }
    builder.build()
}

fn catalog() -> SpawnCatalog {
    let mut catalog = SpawnCatalog::new();
    let mut source = String::new();
    for index in 0..2_000u64 {
        let hash = 0x9000_0000_0000_0000 | index;
        source.push_str(&format!(
            "Spawner {index} - {hash:016X} - Point V3f({}.5, 0.0, {}.25)\n",
            index % 97,
            index % 53
        ));
    }
    catalog.parse_source(&source, 0);
    catalog
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for populated in [1usize, 5, MAX_SLOTS] {
        let block = block_with(populated);
        group.bench_with_input(BenchmarkId::new("slots", populated), &block, |b, block| {
            b.iter(|| decode_stash(black_box(block)))
        });
    }
    group.finish();
}

fn bench_decode_and_resolve(c: &mut Criterion) {
    let catalog = catalog();
    let reader = StashReader::new(StashDecoder::default(), &catalog);
    let block = block_with(MAX_SLOTS);
    c.bench_function("decode_and_resolve/full", |b| {
        b.iter(|| reader.decode_block(black_box(&block)))
    });
}

criterion_group!(decode_benches, bench_decode, bench_decode_and_resolve);
criterion_main!(decode_benches);
