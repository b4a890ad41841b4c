#[path = "../tests/common/mod.rs"]
mod common;

use common::ConstBuildHasher;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;
use treebucket::{HashTreeMap, LinkedHashTreeMap};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

// 10k indices into 0..n, reproducible.
fn picks(n: usize) -> Vec<usize> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % n
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("hash_tree::insert_fresh_100k", |b| {
        b.iter_batched(
            HashTreeMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("linked_hash_tree::insert_fresh_100k", |b| {
        b.iter_batched(
            LinkedHashTreeMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("hash_tree::insert_presized_100k", |b| {
        b.iter_batched(
            || HashTreeMap::<String, u64>::with_capacity(1 << 18),
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("hash_tree::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let keys: Vec<String> = lcg(5).take(110_000).map(key).collect();
                let mut m = HashTreeMap::new();
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k.clone(), i as u64);
                }
                let to_remove: Vec<String> =
                    picks(keys.len()).into_iter().map(|i| keys[i].clone()).collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("hash_tree::get_hit_10k_on_100k", |b| {
        let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
        let mut m = HashTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            m.insert(k.clone(), i as u64);
        }
        let queries: Vec<&String> = picks(keys.len()).into_iter().map(|i| &keys[i]).collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("hash_tree::get_miss_10k_on_100k", |b| {
        let mut m = HashTreeMap::new();
        for (i, x) in lcg(11).take(100_000).enumerate() {
            m.insert(key(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap_or_default());
                black_box(m.get(&k));
            }
        })
    });
}

// Degenerate hasher: the whole map is one red-black tree.
fn bench_single_bucket_10k(c: &mut Criterion) {
    c.bench_function("hash_tree::single_bucket_ordered_get_10k", |b| {
        let keys: Vec<String> = lcg(13).take(10_000).map(key).collect();
        let mut m = HashTreeMap::from_config(
            Default::default(),
            ConstBuildHasher,
            Some(String::cmp as fn(&String, &String) -> std::cmp::Ordering),
        )
        .expect("default config is valid");
        for (i, k) in keys.iter().enumerate() {
            m.insert(k.clone(), i as u64);
        }
        b.iter(|| {
            for k in &keys {
                black_box(m.get(k));
            }
        })
    });

    c.bench_function("hash_tree::single_bucket_unordered_get_1k", |b| {
        let keys: Vec<String> = lcg(17).take(1_000).map(key).collect();
        let mut m = HashTreeMap::with_hasher(ConstBuildHasher);
        for (i, k) in keys.iter().enumerate() {
            m.insert(k.clone(), i as u64);
        }
        b.iter(|| {
            for k in &keys {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    c.bench_function("hash_tree::iter_all_100k", |b| {
        let mut m = HashTreeMap::new();
        for (i, x) in lcg(999).take(100_000).enumerate() {
            m.insert(key(x), i as u64);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("linked_hash_tree::iter_all_100k", |b| {
        let mut m = LinkedHashTreeMap::new();
        for (i, x) in lcg(999).take(100_000).enumerate() {
            m.insert(key(x), i as u64);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_hit_10k,
              bench_get_miss_10k,
              bench_single_bucket_10k,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
