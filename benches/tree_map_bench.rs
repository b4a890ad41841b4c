use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;
use treebucket::{Avl, RedBlack, TreeMap};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert_random_100k(c: &mut Criterion) {
    c.bench_function("tree::red_black_insert_random_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64, RedBlack>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tree::avl_insert_random_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64, Avl>::new_balanced,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_sequential_100k(c: &mut Criterion) {
    c.bench_function("tree::red_black_insert_sequential_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64, RedBlack>::new,
            |mut m| {
                for k in 0..100_000u64 {
                    m.insert(k, k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_and_remove(c: &mut Criterion) {
    c.bench_function("tree::red_black_get_hit_10k_on_100k", |b| {
        let keys: Vec<u64> = lcg(7).take(100_000).collect();
        let m: TreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            for k in keys.iter().step_by(10) {
                black_box(m.get(k));
            }
        })
    });

    c.bench_function("tree::avl_pop_first_all_10k", |b| {
        b.iter_batched(
            || lcg(9).take(10_000).map(|k| (k, k)).collect::<TreeMap<u64, u64, Avl>>(),
            |mut m| {
                while let Some(e) = m.pop_first() {
                    black_box(e);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_random_100k,
              bench_insert_sequential_100k,
              bench_get_and_remove
}
criterion_main!(benches);
