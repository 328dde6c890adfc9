//! Height maintenance and AVL rebalancing.
//!
//! After a structural edit the tree hands the recorded [`Path`] to
//! [`fix_path`], which walks it deepest-first. At every element it
//! recomputes the cached height and asks the [`Balance`] strategy to
//! rebalance the node. A strategy returns the root of the (possibly rotated)
//! subtree; when that differs from the node the path recorded, the parent's
//! slot is rewired through the recorded side.
//!
//! ```text
//!   bf = height(right) - height(left)
//!
//!   bf < -1, bf(left) <= 0        bf < -1, bf(left) > 0
//!
//!        z              y              z             z            x
//!       /              / \            /             /            / \
//!      y       =>     x   z          y      =>     x     =>     y   z
//!     /                               \           /
//!    x                                 x         y
//!     rotate_right(z)             rotate_left(y), then rotate_right(z)
//! ```
//!
//! The cases for `bf > 1` are the mirror image.

use tracing::trace;

use crate::arena::Arena;
use crate::node::{Node, NodeId};
use crate::path::{Path, Side};

/// A rebalancing strategy plugged into the tree at the type level.
pub trait Balance {
	/// Whether the strategy guarantees the AVL height bound.
	const BALANCED: bool;

	/// Restores the strategy's invariant at `id`, whose height has already
	/// been refreshed, and returns the root of the resulting subtree.
	fn rebalance<N: Node>(nodes: &mut Arena<N>, id: NodeId) -> NodeId;
}

/// AVL balancing: every node's subtrees differ in height by at most one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avl;

/// No rotations. Heights are still cached so that `height()` and the
/// invariant checker work, but the shape follows insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbalanced;

impl Balance for Avl {
	const BALANCED: bool = true;

	fn rebalance<N: Node>(nodes: &mut Arena<N>, id: NodeId) -> NodeId {
		let balance = nodes.balance_factor(id);
		if balance < -1 {
			let Some(left) = nodes.left(id) else {
				unreachable!("left-heavy node {} without a left child", id)
			};
			if nodes.balance_factor(left) > 0 {
				let pivot = rotate_left(nodes, left);
				nodes.link(id, Side::Left, Some(pivot));
			}
			rotate_right(nodes, id)
		} else if balance > 1 {
			let Some(right) = nodes.right(id) else {
				unreachable!("right-heavy node {} without a right child", id)
			};
			if nodes.balance_factor(right) < 0 {
				let pivot = rotate_right(nodes, right);
				nodes.link(id, Side::Right, Some(pivot));
			}
			rotate_left(nodes, id)
		} else {
			id
		}
	}
}

impl Balance for Unbalanced {
	const BALANCED: bool = false;

	#[inline]
	fn rebalance<N: Node>(_nodes: &mut Arena<N>, id: NodeId) -> NodeId {
		id
	}
}

/// Rotates `id` down to the left; its right child takes its place and is
/// returned. The caller links the returned node into `id`'s former slot.
pub(crate) fn rotate_left<N: Node>(nodes: &mut Arena<N>, id: NodeId) -> NodeId {
	let Some(pivot) = nodes.right(id) else {
		unreachable!("rotate_left on {} without a right child", id)
	};
	trace!(node = nodes.key(id), pivot = nodes.key(pivot), "rotate left");
	let inner = nodes.left(pivot);
	nodes.link(id, Side::Right, inner);
	nodes.link(pivot, Side::Left, Some(id));
	nodes.update_height(id);
	nodes.update_height(pivot);
	pivot
}

/// Mirror of [`rotate_left`].
pub(crate) fn rotate_right<N: Node>(nodes: &mut Arena<N>, id: NodeId) -> NodeId {
	let Some(pivot) = nodes.left(id) else {
		unreachable!("rotate_right on {} without a left child", id)
	};
	trace!(node = nodes.key(id), pivot = nodes.key(pivot), "rotate right");
	let inner = nodes.right(pivot);
	nodes.link(id, Side::Left, inner);
	nodes.link(pivot, Side::Right, Some(id));
	nodes.update_height(id);
	nodes.update_height(pivot);
	pivot
}

/// Walks `path` bottom-up, refreshing heights and rebalancing with `B`.
///
/// `root` is the tree root at the time of the call. Returns the new root
/// when the walk rotated the root away, `None` otherwise.
pub(crate) fn fix_path<N: Node, B: Balance>(
	nodes: &mut Arena<N>,
	path: &Path,
	root: Option<NodeId>,
) -> Option<NodeId> {
	let mut elements = path.iter().rev();
	let first = *elements.next()?;

	nodes.update_height(first.node);
	let mut result = B::rebalance(nodes, first.node);
	let mut affected = first.node;
	let mut child = first;

	for element in elements {
		if child.node != result {
			nodes.link(element.node, child.side, Some(result));
		}
		nodes.update_height(element.node);
		result = B::rebalance(nodes, element.node);
		affected = element.node;
		child = *element;
	}

	(root == Some(affected) && affected != result).then_some(result)
}
