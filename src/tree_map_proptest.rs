#![cfg(test)]

// State-machine properties for TreeMap under both balancing policies.

use crate::balance::{Avl, Balance, RedBlack};
use crate::tree_map::TreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    PopFirst,
    PopLast,
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // A narrow key range forces replacements and removals of present keys.
    let key = 0..64u16;
    let op = prop_oneof![
        5 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Get),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..200)
}

// Against BTreeMap, after every op:
// - the tree is linked both ways, ascending, and satisfies the policy,
// - len, first and last match the model.
fn run<B: Balance>(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut: TreeMap<u16, u32, B> = TreeMap::new_balanced();
    let mut model: BTreeMap<u16, u32> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::PopFirst => {
                prop_assert_eq!(sut.pop_first(), model.pop_first());
            }
            Op::PopLast => {
                prop_assert_eq!(sut.pop_last(), model.pop_last());
            }
            Op::Iterate => {
                let s: Vec<_> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
                let m: Vec<_> = model.iter().rev().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(s, m);
            }
        }
        if let Err(e) = sut.validate() {
            return Err(TestCaseError::fail(e.to_string()));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.first_key_value(), model.first_key_value());
        prop_assert_eq!(sut.last_key_value(), model.last_key_value());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_red_black_tree_map(ops in arb_ops()) {
        run::<RedBlack>(ops)?;
    }

    #[test]
    fn prop_avl_tree_map(ops in arb_ops()) {
        run::<Avl>(ops)?;
    }
}
