use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rb_ordered::{OrderedMap, TreeConfig};
use std::hint::black_box;

struct KeyGenerator {
    rng: StdRng,
    limit: u32,
}
impl KeyGenerator {
    fn new() -> Self {
        const LIMIT: u32 = 1_000_000;
        Self {
            rng: StdRng::from_seed([0; 32]),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> u32 {
        self.rng.gen_range(0..self.limit)
    }
}

fn random_keys(count: usize) -> Vec<u32> {
    let mut gen = KeyGenerator::new();
    std::iter::repeat_with(|| gen.next()).take(count).collect()
}

// insert helper fn
fn ordered_map_insert(count: usize, indexed: bool, bench: &mut Bencher) {
    let keys = random_keys(count);
    bench.iter(|| {
        let mut map = OrderedMap::with_config(TreeConfig::new().indexed(indexed));
        for k in keys.iter().copied() {
            black_box(map.insert(k, ()));
        }
    });
}

// sorted load between two existing bounds, with and without hints
fn ordered_map_sorted_load(count: u32, hinted: bool, bench: &mut Bencher) {
    bench.iter(|| {
        let mut map = OrderedMap::new();
        map.insert(0, ());
        map.insert(count, ());
        // every key lands right before `count`, past the reach of the min/max shortcut
        let hint = map.find(&count);
        for k in 1..count {
            if hinted {
                black_box(map.insert_with_hint(k, (), hint));
            } else {
                black_box(map.insert(k, ()));
            }
        }
    });
}

// insert and remove helper fn
fn ordered_map_insert_remove(count: usize, bench: &mut Bencher) {
    let keys = random_keys(count);
    bench.iter(|| {
        let mut map = OrderedMap::new();
        for k in keys.iter().copied() {
            black_box(map.insert(k, ()));
        }
        for k in &keys {
            black_box(map.remove(k));
        }
    });
}

// positional access helper fn
fn ordered_map_get_at(count: usize, indexed: bool, bench: &mut Bencher) {
    let keys = random_keys(count);
    let mut map = OrderedMap::with_config(TreeConfig::new().indexed(indexed));
    for k in keys {
        map.insert(k, ());
    }
    let mut gen = KeyGenerator::new();
    let positions: Vec<_> = std::iter::repeat_with(|| gen.next() as usize % map.len())
        .take(100)
        .collect();
    bench.iter(|| {
        for &pos in &positions {
            let _ = black_box(map.get_at(pos));
        }
    });
}

fn bench_ordered_map_insert(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_insert_100", |b| {
        ordered_map_insert(100, false, b)
    });
    c.bench_function("bench_ordered_map_insert_1000", |b| {
        ordered_map_insert(1000, false, b)
    });
    c.bench_function("bench_ordered_map_insert_10,000", |b| {
        ordered_map_insert(10_000, false, b)
    });
    c.bench_function("bench_ordered_map_insert_100,000", |b| {
        ordered_map_insert(100_000, false, b)
    });
    c.bench_function("bench_ordered_map_insert_indexed_10,000", |b| {
        ordered_map_insert(10_000, true, b)
    });
}

fn bench_ordered_map_sorted_load(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_sorted_load_10,000", |b| {
        ordered_map_sorted_load(10_000, false, b)
    });
    c.bench_function("bench_ordered_map_sorted_load_hinted_10,000", |b| {
        ordered_map_sorted_load(10_000, true, b)
    });
}

fn bench_ordered_map_insert_remove(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_insert_remove_100", |b| {
        ordered_map_insert_remove(100, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_1000", |b| {
        ordered_map_insert_remove(1000, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_10,000", |b| {
        ordered_map_insert_remove(10_000, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_100,000", |b| {
        ordered_map_insert_remove(100_000, b)
    });
}

fn bench_ordered_map_get_at(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_get_at_scan_10,000", |b| {
        ordered_map_get_at(10_000, false, b)
    });
    c.bench_function("bench_ordered_map_get_at_indexed_10,000", |b| {
        ordered_map_get_at(10_000, true, b)
    });
}

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args().without_plots()
}

criterion_group! {
    name = benches_basic_op;
    config = criterion_config();
    targets = bench_ordered_map_insert, bench_ordered_map_sorted_load, bench_ordered_map_insert_remove,
}

criterion_group! {
    name = benches_position;
    config = criterion_config();
    targets = bench_ordered_map_get_at
}

criterion_main!(benches_basic_op, benches_position);
