//! Policy-independent binary search tree machinery over a node arena.
//!
//! Every routine takes the arena plus the root slot that owns the tree. For a
//! standalone tree that slot is the map's `root` field; for the hybrid table it
//! is one entry of the bucket array, so a rotation at a bucket root rewrites
//! `buckets[index]` directly. Balancing policies build on `rotate`; maps build
//! on `attach`, `detach` and the walks.
//!
//! A missing node index or a rotation without a pivot means the structure is
//! already corrupt, so those paths panic instead of limping on.

use crate::balance::Balance;
#[cfg(test)]
use crate::error::InvariantViolation;
use crate::node::{Links, NodeId, Nodes, Side, TreeNode};
use std::collections::VecDeque;

#[inline]
pub(crate) fn links<N: TreeNode>(nodes: &Nodes<N>, id: NodeId) -> &Links<N::Meta> {
    nodes[id].links()
}

#[inline]
pub(crate) fn links_mut<N: TreeNode>(nodes: &mut Nodes<N>, id: NodeId) -> &mut Links<N::Meta> {
    nodes[id].links_mut()
}

#[inline]
pub(crate) fn parent<N: TreeNode>(nodes: &Nodes<N>, id: NodeId) -> Option<NodeId> {
    links(nodes, id).parent
}

#[inline]
pub(crate) fn child<N: TreeNode>(nodes: &Nodes<N>, id: NodeId, side: Side) -> Option<NodeId> {
    links(nodes, id).child(side)
}

/// Side of its parent that `id` hangs from; `None` for a root.
pub(crate) fn side_of<N: TreeNode>(nodes: &Nodes<N>, id: NodeId) -> Option<Side> {
    let p = parent(nodes, id)?;
    if links(nodes, p).left == Some(id) {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

/// Put `new` into the slot that owned `old`: its parent's child pointer, or
/// the root slot when `old` was the root.
fn replace_in_parent<N: TreeNode>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    old: NodeId,
    new: Option<NodeId>,
) {
    let p = parent(nodes, old);
    match p {
        None => *root = new,
        Some(p) => {
            let pl = links_mut(nodes, p);
            if pl.left == Some(old) {
                pl.left = new;
            } else {
                pl.right = new;
            }
        }
    }
    if let Some(n) = new {
        links_mut(nodes, n).parent = p;
    }
}

/// Rotate the subtree at `node` toward `dir`. The child on the opposite side
/// (the pivot) takes `node`'s place, `node` becomes the pivot's `dir` child and
/// the pivot's inner subtree moves across. Returns the pivot.
pub(crate) fn rotate<N: TreeNode>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    node: NodeId,
    dir: Side,
) -> NodeId {
    let up = dir.opposite();
    let pivot = child(nodes, node, up).expect("rotation requires a pivot child");
    let inner = child(nodes, pivot, dir);

    links_mut(nodes, node).set_child(up, inner);
    if let Some(i) = inner {
        links_mut(nodes, i).parent = Some(node);
    }
    replace_in_parent(nodes, root, node, Some(pivot));
    links_mut(nodes, pivot).set_child(dir, Some(node));
    links_mut(nodes, node).parent = Some(pivot);
    pivot
}

/// Leftmost (`Side::Left`) or rightmost node of the subtree at `id`.
pub(crate) fn extreme<N: TreeNode>(nodes: &Nodes<N>, mut id: NodeId, side: Side) -> NodeId {
    while let Some(c) = child(nodes, id, side) {
        id = c;
    }
    id
}

pub(crate) fn first<N: TreeNode>(nodes: &Nodes<N>, root: Option<NodeId>) -> Option<NodeId> {
    root.map(|r| extreme(nodes, r, Side::Left))
}

pub(crate) fn last<N: TreeNode>(nodes: &Nodes<N>, root: Option<NodeId>) -> Option<NodeId> {
    root.map(|r| extreme(nodes, r, Side::Right))
}

/// In-order neighbour of `id` toward `side` (`Right` is the successor).
fn step<N: TreeNode>(nodes: &Nodes<N>, id: NodeId, side: Side) -> Option<NodeId> {
    if let Some(c) = child(nodes, id, side) {
        return Some(extreme(nodes, c, side.opposite()));
    }
    let mut cur = id;
    while let Some(p) = parent(nodes, cur) {
        if child(nodes, p, side) != Some(cur) {
            return Some(p);
        }
        cur = p;
    }
    None
}

pub(crate) fn successor<N: TreeNode>(nodes: &Nodes<N>, id: NodeId) -> Option<NodeId> {
    step(nodes, id, Side::Right)
}

pub(crate) fn predecessor<N: TreeNode>(nodes: &Nodes<N>, id: NodeId) -> Option<NodeId> {
    step(nodes, id, Side::Left)
}

/// Hang a detached node below `at` (parent, side), or into the empty root slot.
pub(crate) fn attach<N: TreeNode>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    id: NodeId,
    at: Option<(NodeId, Side)>,
) {
    match at {
        None => {
            debug_assert!(root.is_none(), "attaching a new root over a live tree");
            *root = Some(id);
        }
        Some((p, side)) => {
            debug_assert!(child(nodes, p, side).is_none(), "attach slot is occupied");
            links_mut(nodes, p).set_child(side, Some(id));
            links_mut(nodes, id).parent = Some(p);
        }
    }
}

/// Attach a fresh node and let the policy restore its invariants.
pub(crate) fn link<N, B>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    id: NodeId,
    at: Option<(NodeId, Side)>,
) where
    N: TreeNode<Meta = B::Meta>,
    B: Balance,
{
    attach(nodes, root, id, at);
    B::after_insert(nodes, root, id);
}

/// Unlink the entry stored at `id` from the tree.
///
/// A node with two children is not unlinked itself: it exchanges payloads
/// with its in-order successor, `on_swap(nodes, id, successor)` is called, and
/// the successor (degree <= 1) is spliced out instead. Returns the id of the
/// node that actually left the tree. That node is still in the arena, carries
/// the removed entry and has no relations left.
pub(crate) fn detach<N, B, F>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    id: NodeId,
    mut on_swap: F,
) -> NodeId
where
    N: TreeNode<Meta = B::Meta>,
    B: Balance,
    F: FnMut(&mut Nodes<N>, NodeId, NodeId),
{
    let mut target = id;
    if links(nodes, id).degree() == 2 {
        let succ = successor(nodes, id).expect("a node with two children has a successor");
        let [shown, moved] = nodes
            .get_disjoint_mut([id, succ])
            .expect("successor is a distinct live node");
        shown.swap_payload(moved);
        on_swap(nodes, id, succ);
        target = succ;
    }

    let l = links(nodes, target);
    let replacement = l.left.or(l.right);
    let above = l.parent;
    replace_in_parent(nodes, root, target, replacement);
    B::after_remove(nodes, root, target, replacement, above);

    let l = links_mut(nodes, target);
    l.parent = None;
    l.left = None;
    l.right = None;
    target
}

/// Ascending walk between two nodes of one tree, usable from both ends.
pub(crate) struct InOrder<'a, N> {
    nodes: &'a Nodes<N>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a, N: TreeNode> InOrder<'a, N> {
    pub(crate) fn new(nodes: &'a Nodes<N>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            front: first(nodes, root),
            back: last(nodes, root),
        }
    }

    pub(crate) fn nodes(&self) -> &'a Nodes<N> {
        self.nodes
    }
}

impl<'a, N: TreeNode> Iterator for InOrder<'a, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = successor(self.nodes, id);
        }
        Some(id)
    }
}

impl<'a, N: TreeNode> DoubleEndedIterator for InOrder<'a, N> {
    fn next_back(&mut self) -> Option<NodeId> {
        let id = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = predecessor(self.nodes, id);
        }
        Some(id)
    }
}

/// Breadth-first walk from a root.
pub(crate) struct LevelOrder<'a, N> {
    nodes: &'a Nodes<N>,
    queue: VecDeque<NodeId>,
}

impl<'a, N: TreeNode> LevelOrder<'a, N> {
    pub(crate) fn new(nodes: &'a Nodes<N>, root: Option<NodeId>) -> Self {
        Self {
            nodes,
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, N: TreeNode> Iterator for LevelOrder<'a, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        let l = links(self.nodes, id);
        self.queue.extend(l.left);
        self.queue.extend(l.right);
        Some(id)
    }
}

pub(crate) fn preorder<N: TreeNode>(
    nodes: &Nodes<N>,
    root: Option<NodeId>,
    mut visit: impl FnMut(NodeId),
) {
    let mut stack: Vec<NodeId> = root.into_iter().collect();
    while let Some(id) = stack.pop() {
        visit(id);
        let l = links(nodes, id);
        stack.extend(l.right);
        stack.extend(l.left);
    }
}

pub(crate) fn postorder<N: TreeNode>(
    nodes: &Nodes<N>,
    root: Option<NodeId>,
    mut visit: impl FnMut(NodeId),
) {
    // Reverse of a root-right-left preorder.
    let mut stack: Vec<NodeId> = root.into_iter().collect();
    let mut out = Vec::new();
    while let Some(id) = stack.pop() {
        out.push(id);
        let l = links(nodes, id);
        stack.extend(l.left);
        stack.extend(l.right);
    }
    out.into_iter().rev().for_each(&mut visit);
}

/// Number of levels below and including `id`.
pub(crate) fn height<N: TreeNode>(nodes: &Nodes<N>, id: Option<NodeId>) -> usize {
    match id {
        None => 0,
        Some(id) => {
            let l = links(nodes, id);
            1 + height(nodes, l.left).max(height(nodes, l.right))
        }
    }
}

/// Whether every level is full except possibly the last, which fills from
/// the left. An empty tree is not complete.
pub(crate) fn is_complete<N: TreeNode>(nodes: &Nodes<N>, root: Option<NodeId>) -> bool {
    if root.is_none() {
        return false;
    }
    let mut leaves_only = false;
    for id in LevelOrder::new(nodes, root) {
        let l = links(nodes, id);
        if leaves_only && l.degree() > 0 {
            return false;
        }
        if l.left.is_none() && l.right.is_some() {
            return false;
        }
        if l.right.is_none() {
            leaves_only = true;
        }
    }
    true
}

#[cfg(test)]
/// Check that every child points back at its parent and the root has no
/// parent. Returns the number of nodes reachable from `root`.
pub(crate) fn check_links<N: TreeNode>(
    nodes: &Nodes<N>,
    root: Option<NodeId>,
) -> Result<usize, InvariantViolation> {
    if let Some(r) = root {
        if parent(nodes, r).is_some() {
            return Err(InvariantViolation::new(format!("root {r:?} has a parent")));
        }
    }
    let mut count = 0;
    for id in LevelOrder::new(nodes, root) {
        count += 1;
        let l = links(nodes, id);
        for c in l.left.into_iter().chain(l.right) {
            if parent(nodes, c) != Some(id) {
                return Err(InvariantViolation::new(format!(
                    "{c:?} does not point back at its parent {id:?}"
                )));
            }
        }
    }
    Ok(count)
}

#[cfg(test)]
/// Check that the in-order walk is strictly ascending under `less`.
pub(crate) fn check_ascending<N: TreeNode>(
    nodes: &Nodes<N>,
    root: Option<NodeId>,
    mut less: impl FnMut(&N, &N) -> bool,
) -> Result<(), InvariantViolation> {
    let mut prev: Option<NodeId> = None;
    for id in InOrder::new(nodes, root) {
        if let Some(p) = prev {
            if !less(&nodes[p], &nodes[id]) {
                return Err(InvariantViolation::new(format!(
                    "{p:?} is not ordered before its successor {id:?}"
                )));
            }
        }
        prev = Some(id);
    }
    Ok(())
}
