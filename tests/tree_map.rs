// TreeMap and the sets through the public API.
//
// Invariants exercised:
// - In-order traversal is strictly ascending under the map's comparator.
// - Both balancing policies satisfy the same map contract.
// - Sets report whether an insert or remove changed them.
use treebucket::balance::Balance;
use treebucket::{Avl, HashTreeSet, LinkedHashTreeSet, RedBlack, TreeMap, TreeSet};

const SCENARIO: [i32; 11] = [7, 4, 9, 2, 5, 6, 8, 11, 3, 12, 1];

fn scenario<B: Balance>() {
    let mut m: TreeMap<i32, (), B> = SCENARIO.iter().map(|&k| (k, ())).collect();
    assert_eq!(
        m.keys().copied().collect::<Vec<_>>(),
        [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 12]
    );
    assert_eq!(m.remove(&7), Some(()));
    assert_eq!(
        m.keys().copied().collect::<Vec<_>>(),
        [1, 2, 3, 4, 5, 6, 8, 9, 11, 12]
    );
    assert_eq!(m.len(), 10);
}

// Test: the eleven-key scenario, then deleting the root-area key 7.
#[test]
fn scenario_red_black() {
    scenario::<RedBlack>();
}

#[test]
fn scenario_avl() {
    scenario::<Avl>();
}

// Test: a reversed comparator yields a descending map.
#[test]
fn custom_comparator_orders_keys() {
    let mut m = TreeMap::<String, usize>::with_comparator(|a, b| b.cmp(a));
    for w in ["pear", "apple", "fig"] {
        m.insert(w.to_string(), w.len());
    }
    let keys: Vec<&str> = m.keys().map(String::as_str).collect();
    assert_eq!(keys, ["pear", "fig", "apple"]);
    assert_eq!(m.first_key_value(), Some((&"pear".to_string(), &4)));
}

// Test: visitor orders on a small balanced tree.
// Assumes: inserting 2, 1, 3 leaves 2 at the root under either policy.
#[test]
fn visitors() {
    let m: TreeMap<i32, i32> = [(2, 20), (1, 10), (3, 30)].into_iter().collect();
    let mut pre = Vec::new();
    m.preorder(|k, _| pre.push(*k));
    assert_eq!(pre, [2, 1, 3]);
    let mut post = Vec::new();
    m.postorder(|k, _| post.push(*k));
    assert_eq!(post, [1, 3, 2]);
    let mut level = Vec::new();
    m.level_order(|k, _| level.push(*k));
    assert_eq!(level, [2, 1, 3]);
    let mut ino = Vec::new();
    m.inorder(|_, v| ino.push(*v));
    assert_eq!(ino, [10, 20, 30]);
    assert_eq!(m.height(), 2);
    assert!(m.is_complete());
}

// Test: ascending inserts stay logarithmic in height.
#[test]
fn sequential_inserts_stay_shallow() {
    let rb: TreeMap<u32, ()> = (0..4096).map(|k| (k, ())).collect();
    let avl: TreeMap<u32, (), Avl> = (0..4096).map(|k| (k, ())).collect();
    // 2 * log2(n + 1) bounds a red-black tree; AVL is tighter.
    assert!(rb.height() <= 24);
    assert!(avl.height() <= 17);
    assert!(avl.height() <= rb.height());
}

// Test: the plain constructors need no type annotations.
// Assumes: `new` exists only for the default policy.
// Verifies: inference settles on RedBlack; other policies use new_balanced.
#[test]
fn new_infers_default_policy() {
    let mut m = TreeMap::new();
    m.insert(2, "two");
    m.insert(1, "one");
    let _: &TreeMap<i32, &str, RedBlack> = &m;
    assert_eq!(m.first_key_value(), Some((&1, &"one")));

    let mut s = TreeSet::new();
    s.insert('b');
    s.insert('a');
    let _: &TreeSet<char, RedBlack> = &s;
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), ['a', 'b']);

    let mut a = TreeMap::<i32, (), Avl>::new_balanced();
    a.insert(1, ());
    assert_eq!(a.len(), 1);
}

#[test]
fn sets() {
    let mut t = TreeSet::new();
    assert!(t.insert(3));
    assert!(t.insert(1));
    assert!(!t.insert(3));
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), [1, 3]);
    assert_eq!(format!("{t:?}"), "{1, 3}");

    let mut h: HashTreeSet<&str> = ["x", "y"].into_iter().collect();
    assert!(h.contains(&"x"));
    assert!(h.remove(&"x"));
    assert!(!h.remove(&"x"));
    assert_eq!(h.len(), 1);

    let mut l = LinkedHashTreeSet::new();
    for v in [5, 3, 9] {
        l.insert(v);
    }
    assert!(l.remove(&3));
    l.insert(3);
    assert_eq!(l.iter().copied().collect::<Vec<_>>(), [5, 9, 3]);
}
