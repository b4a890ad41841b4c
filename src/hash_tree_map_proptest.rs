#![cfg(test)]

// Property tests for the hash-backed maps, kept inside the crate so the
// structural validators stay reachable.

use crate::hash_tree_map::HashTreeMap;
use crate::linked_hash_tree_map::LinkedHashTreeMap;
use crate::test_util::ConstBuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    ContainsValue(i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), -50..50i32).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => (idx.clone(), -5..5i32).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => (-50..50i32).prop_map(Op::ContainsValue),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

type Compare = fn(&String, &String) -> std::cmp::Ordering;

// Ties on every pair of equal-length keys.
fn by_len(a: &String, b: &String) -> std::cmp::Ordering {
    a.len().cmp(&b.len())
}

// Drive a HashTreeMap against std's HashMap. After every op:
// - every bucket tree is a valid red-black tree in composite order,
// - every node sits in the bucket its hash selects,
// - len/is_empty match the model.
fn run_unordered<S: BuildHasher>(
    mut sut: HashTreeMap<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            Op::Remove(i) => {
                prop_assert_eq!(sut.remove(&pool[i]), model.remove(&pool[i]));
                prop_assert!(!sut.contains_key(&pool[i]));
            }
            Op::Get(i) => {
                prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]));
            }
            Op::Mutate(i, d) => {
                if let Some(v) = sut.get_mut(&pool[i]) {
                    *v += d;
                }
                if let Some(v) = model.get_mut(&pool[i]) {
                    *v += d;
                }
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|m| *m == v));
            }
            Op::Iterate => {
                let s: BTreeSet<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
                prop_assert_eq!(sut.iter().len(), model.len());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        if let Err(e) = sut.validate() {
            return Err(TestCaseError::fail(e.to_string()));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Drive a LinkedHashTreeMap against a Vec kept in first-insertion order.
// After every op the chain must list exactly the model's keys, in order.
fn run_linked<S: BuildHasher>(
    mut sut: LinkedHashTreeMap<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(String, i32)> = Vec::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let pos = model.iter().position(|(mk, _)| *mk == k);
                let prev = match pos {
                    Some(p) => Some(std::mem::replace(&mut model[p].1, v)),
                    None => {
                        model.push((k.clone(), v));
                        None
                    }
                };
                prop_assert_eq!(sut.insert(k, v), prev);
            }
            Op::Remove(i) => {
                let pos = model.iter().position(|(mk, _)| *mk == pool[i]);
                let expected = pos.map(|p| model.remove(p).1);
                prop_assert_eq!(sut.remove(&pool[i]), expected);
            }
            Op::Get(i) => {
                let expected = model.iter().find(|(mk, _)| *mk == pool[i]).map(|(_, v)| v);
                prop_assert_eq!(sut.get(&pool[i]), expected);
            }
            Op::Mutate(i, d) => {
                if let Some(v) = sut.get_mut(&pool[i]) {
                    *v += d;
                }
                if let Some((_, v)) = model.iter_mut().find(|(mk, _)| *mk == pool[i]) {
                    *v += d;
                }
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.iter().any(|(_, m)| *m == v));
            }
            Op::Iterate => {
                let back: Vec<_> = sut.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
                let expected: Vec<_> = model.iter().rev().cloned().collect();
                prop_assert_eq!(back, expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        if let Err(e) = sut.validate() {
            return Err(TestCaseError::fail(e.to_string()));
        }
        let order: Vec<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&order, &model);
        prop_assert_eq!(sut.front().map(|(k, _)| k), model.first().map(|(k, _)| k));
        prop_assert_eq!(sut.back().map(|(k, _)| k), model.last().map(|(k, _)| k));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_hash_tree_map((pool, ops) in arb_scenario()) {
        run_unordered(HashTreeMap::with_capacity(2), &pool, ops)?;
    }

    #[test]
    fn prop_hash_tree_map_collisions((pool, ops) in arb_scenario()) {
        run_unordered(HashTreeMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    #[test]
    fn prop_hash_tree_map_collisions_with_comparator((pool, ops) in arb_scenario()) {
        let sut = HashTreeMap::from_config(
            Default::default(),
            ConstBuildHasher,
            Some(by_len as Compare),
        )
        .expect("default config");
        run_unordered(sut, &pool, ops)?;
    }

    #[test]
    fn prop_linked_hash_tree_map((pool, ops) in arb_scenario()) {
        run_linked(LinkedHashTreeMap::with_capacity(1), &pool, ops)?;
    }

    #[test]
    fn prop_linked_hash_tree_map_collisions((pool, ops) in arb_scenario()) {
        run_linked(LinkedHashTreeMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    #[test]
    fn prop_linked_hash_tree_map_ordered_collisions((pool, ops) in arb_scenario()) {
        let sut = LinkedHashTreeMap::from_config(
            Default::default(),
            ConstBuildHasher,
            Some(String::cmp as Compare),
        )
        .expect("default config");
        run_linked(sut, &pool, ops)?;
    }
}
