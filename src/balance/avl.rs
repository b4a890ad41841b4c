//! AVL (height-balanced) rebalancing.
//!
//! Each node caches its height; the heights of a node's two subtrees never
//! differ by more than one.

use super::Balance;
use crate::engine::{self, links, links_mut, parent, side_of};
use crate::error::InvariantViolation;
use crate::node::{NodeId, Nodes, Side, TreeNode};

/// Height-balanced policy.
#[derive(Copy, Clone, Debug, Default)]
pub struct Avl;

#[inline]
fn height<N: TreeNode<Meta = u32>>(nodes: &Nodes<N>, id: Option<NodeId>) -> u32 {
    id.map_or(0, |id| links(nodes, id).meta)
}

fn update_height<N: TreeNode<Meta = u32>>(nodes: &mut Nodes<N>, id: NodeId) {
    let l = links(nodes, id);
    let h = 1 + height(nodes, l.left).max(height(nodes, l.right));
    links_mut(nodes, id).meta = h;
}

fn is_balanced<N: TreeNode<Meta = u32>>(nodes: &Nodes<N>, id: NodeId) -> bool {
    let l = links(nodes, id);
    height(nodes, l.left).abs_diff(height(nodes, l.right)) <= 1
}

/// Child with the taller subtree. On a tie, the child on the same side as
/// `id` itself, which keeps a single rotation sufficient after a delete.
fn taller_child<N: TreeNode<Meta = u32>>(nodes: &Nodes<N>, id: NodeId) -> NodeId {
    let l = links(nodes, id);
    let (lh, rh) = (height(nodes, l.left), height(nodes, l.right));
    let pick = if lh > rh {
        l.left
    } else if rh > lh {
        l.right
    } else if side_of(nodes, id) == Some(Side::Right) {
        l.right
    } else {
        l.left
    };
    pick.expect("an unbalanced subtree has a taller child")
}

fn rotate<N: TreeNode<Meta = u32>>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    node: NodeId,
    dir: Side,
) {
    let pivot = engine::rotate(nodes, root, node, dir);
    update_height(nodes, node);
    update_height(nodes, pivot);
}

fn rebalance<N: TreeNode<Meta = u32>>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    grand: NodeId,
) {
    let p = taller_child(nodes, grand);
    let node = taller_child(nodes, p);
    let p_side = side_of(nodes, p).expect("taller child hangs below its parent");
    if side_of(nodes, node) != Some(p_side) {
        rotate(nodes, root, p, p_side);
    }
    rotate(nodes, root, grand, p_side.opposite());
}

fn heights_ok<N: TreeNode<Meta = u32>>(
    nodes: &Nodes<N>,
    id: Option<NodeId>,
) -> Result<u32, InvariantViolation> {
    let Some(id) = id else {
        return Ok(0);
    };
    let l = links(nodes, id);
    let lh = heights_ok(nodes, l.left)?;
    let rh = heights_ok(nodes, l.right)?;
    let h = 1 + lh.max(rh);
    if l.meta != h {
        return Err(InvariantViolation::new(format!(
            "{id:?} caches height {} but is {h} tall",
            l.meta
        )));
    }
    if lh.abs_diff(rh) > 1 {
        return Err(InvariantViolation::new(format!(
            "{id:?} is unbalanced: {lh} left, {rh} right"
        )));
    }
    Ok(h)
}

impl Balance for Avl {
    type Meta = u32;

    fn fresh() -> u32 {
        1
    }

    fn after_insert<N: TreeNode<Meta = u32>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        inserted: NodeId,
    ) {
        let mut cur = parent(nodes, inserted);
        while let Some(id) = cur {
            if is_balanced(nodes, id) {
                update_height(nodes, id);
                cur = parent(nodes, id);
            } else {
                // One restructuring restores the height the subtree had
                // before the insert, so nothing above changes.
                rebalance(nodes, root, id);
                break;
            }
        }
    }

    fn after_remove<N: TreeNode<Meta = u32>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        _removed: NodeId,
        _replacement: Option<NodeId>,
        parent_of_removed: Option<NodeId>,
    ) {
        let mut cur = parent_of_removed;
        while let Some(id) = cur {
            if is_balanced(nodes, id) {
                update_height(nodes, id);
            } else {
                rebalance(nodes, root, id);
            }
            cur = parent(nodes, id);
        }
    }

    fn check<N: TreeNode<Meta = u32>>(
        nodes: &Nodes<N>,
        root: Option<NodeId>,
    ) -> Result<(), InvariantViolation> {
        heights_ok(nodes, root).map(|_| ())
    }
}
