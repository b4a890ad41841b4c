//! Red-black rebalancing.
//!
//! Invariants restored after every insert and delete:
//! 1. The root is black.
//! 2. A red node never has a red child.
//! 3. Every path from a node down to an absent child crosses the same number
//!    of black nodes.
//!
//! Absent children count as black.

use super::Balance;
use crate::engine::{self, child, links, links_mut, parent, side_of};
use crate::error::InvariantViolation;
use crate::node::{NodeId, Nodes, Side, TreeNode};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Red-black balancing policy.
#[derive(Copy, Clone, Debug, Default)]
pub struct RedBlack;

#[inline]
fn color_of<N: TreeNode<Meta = Color>>(nodes: &Nodes<N>, id: Option<NodeId>) -> Color {
    id.map_or(Color::Black, |id| links(nodes, id).meta)
}

#[inline]
fn is_red<N: TreeNode<Meta = Color>>(nodes: &Nodes<N>, id: Option<NodeId>) -> bool {
    color_of(nodes, id) == Color::Red
}

#[inline]
fn paint<N: TreeNode<Meta = Color>>(nodes: &mut Nodes<N>, id: NodeId, color: Color) {
    links_mut(nodes, id).meta = color;
}

fn fix_after_insert<N: TreeNode<Meta = Color>>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    mut node: NodeId,
) {
    loop {
        let Some(p) = parent(nodes, node) else {
            paint(nodes, node, Color::Black);
            return;
        };
        if !is_red(nodes, Some(p)) {
            return;
        }
        let grand = parent(nodes, p).expect("a red node is never the root");
        let p_side = side_of(nodes, p).expect("parent has a parent");
        let uncle = child(nodes, grand, p_side.opposite());

        if is_red(nodes, uncle) {
            // Push the violation two levels up.
            paint(nodes, p, Color::Black);
            if let Some(u) = uncle {
                paint(nodes, u, Color::Black);
            }
            paint(nodes, grand, Color::Red);
            node = grand;
            continue;
        }

        // LL / RR rotate once at the grandparent; LR / RL first straighten
        // the parent so the new node becomes the pivot.
        if side_of(nodes, node) == Some(p_side) {
            paint(nodes, p, Color::Black);
        } else {
            paint(nodes, node, Color::Black);
            engine::rotate(nodes, root, p, p_side);
        }
        paint(nodes, grand, Color::Red);
        engine::rotate(nodes, root, grand, p_side.opposite());
        return;
    }
}

/// Repair a black deficit on the path through `node` (possibly absent) whose
/// parent is `above`.
fn fix_after_remove<N: TreeNode<Meta = Color>>(
    nodes: &mut Nodes<N>,
    root: &mut Option<NodeId>,
    mut node: Option<NodeId>,
    mut above: Option<NodeId>,
) {
    while let Some(p) = above {
        if is_red(nodes, node) {
            break;
        }
        let side = if links(nodes, p).left == node {
            Side::Left
        } else {
            Side::Right
        };
        let far = side.opposite();
        let mut sibling = child(nodes, p, far).expect("a black deficit implies a sibling");

        if is_red(nodes, Some(sibling)) {
            paint(nodes, sibling, Color::Black);
            paint(nodes, p, Color::Red);
            engine::rotate(nodes, root, p, side);
            sibling = child(nodes, p, far).expect("rotation leaves a black sibling");
        }

        let near_nephew = child(nodes, sibling, side);
        let far_nephew = child(nodes, sibling, far);
        if !is_red(nodes, near_nephew) && !is_red(nodes, far_nephew) {
            paint(nodes, sibling, Color::Red);
            if is_red(nodes, Some(p)) {
                paint(nodes, p, Color::Black);
                return;
            }
            node = Some(p);
            above = parent(nodes, p);
            continue;
        }

        if !is_red(nodes, far_nephew) {
            if let Some(n) = near_nephew {
                paint(nodes, n, Color::Black);
            }
            paint(nodes, sibling, Color::Red);
            engine::rotate(nodes, root, sibling, far);
            sibling = child(nodes, p, far).expect("rotation leaves a sibling");
        }

        let parent_color = color_of(nodes, Some(p));
        paint(nodes, sibling, parent_color);
        paint(nodes, p, Color::Black);
        if let Some(n) = child(nodes, sibling, far) {
            paint(nodes, n, Color::Black);
        }
        engine::rotate(nodes, root, p, side);
        return;
    }
    if let Some(n) = node {
        paint(nodes, n, Color::Black);
    }
}

/// Black height of the subtree at `id`, counting the absent leaves.
fn black_height<N: TreeNode<Meta = Color>>(
    nodes: &Nodes<N>,
    id: Option<NodeId>,
) -> Result<usize, InvariantViolation> {
    let Some(id) = id else {
        return Ok(1);
    };
    let l = links(nodes, id);
    if l.meta == Color::Red && (is_red(nodes, l.left) || is_red(nodes, l.right)) {
        return Err(InvariantViolation::new(format!(
            "red node {id:?} has a red child"
        )));
    }
    let lh = black_height(nodes, l.left)?;
    let rh = black_height(nodes, l.right)?;
    if lh != rh {
        return Err(InvariantViolation::new(format!(
            "black heights under {id:?} differ: {lh} left, {rh} right"
        )));
    }
    Ok(lh + usize::from(l.meta == Color::Black))
}

impl Balance for RedBlack {
    type Meta = Color;

    fn fresh() -> Color {
        Color::Red
    }

    fn after_insert<N: TreeNode<Meta = Color>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        inserted: NodeId,
    ) {
        fix_after_insert(nodes, root, inserted);
    }

    fn after_remove<N: TreeNode<Meta = Color>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        removed: NodeId,
        replacement: Option<NodeId>,
        parent: Option<NodeId>,
    ) {
        // Losing a red node never changes a black height.
        if links(nodes, removed).meta == Color::Red {
            return;
        }
        if let Some(r) = replacement {
            if is_red(nodes, Some(r)) {
                paint(nodes, r, Color::Black);
                return;
            }
        }
        fix_after_remove(nodes, root, replacement, parent);
    }

    fn check<N: TreeNode<Meta = Color>>(
        nodes: &Nodes<N>,
        root: Option<NodeId>,
    ) -> Result<(), InvariantViolation> {
        if is_red(nodes, root) {
            return Err(InvariantViolation::new("root is red"));
        }
        black_height(nodes, root).map(|_| ())
    }
}
