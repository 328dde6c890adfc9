//! Ordered-map views over a key range.
//!
//! A [`View`] is a borrowed window onto a tree: a [`Range`] restricting the
//! visible keys and a [`Direction`] for iteration. Views are cheap `Copy`
//! values; narrowing or flipping one never touches the tree.
//!
//! ```text
//! tree.view()                      all keys, forward
//!   .sub(2..=6)                    [2, 6], forward
//!   .descending()                  [2, 6], reverse
//!   .tail(4, true)                 [4, 6], reverse
//! ```
//!
//! Positional queries (`first`, `last`, `floor`, `ceiling`, `lower`,
//! `higher`) are always answered in key order and ignore the direction.
//! Each one narrows the view range and runs a traversal that stops at the
//! first node it visits.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::balance::Balance;
use crate::iter::{Iter, Keys};
use crate::node::{NodeFactory, NodeRef};
use crate::range::Range;
use crate::traversal::{DepthFirstTraversal, Iterative, Order, Recursive, TraversalContext};
use crate::{Direction, GenericTree};

/// A range-restricted, directed view of a tree.
pub struct View<'t, F: NodeFactory, B> {
	tree: &'t GenericTree<F, B>,
	range: Range,
	direction: Direction,
}

impl<'t, F: NodeFactory, B> Clone for View<'t, F, B> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'t, F: NodeFactory, B> Copy for View<'t, F, B> {}

impl<'t, F: NodeFactory, B> fmt::Debug for View<'t, F, B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View").field("range", &self.range).field("direction", &self.direction).finish()
	}
}

impl<'t, F: NodeFactory, B: Balance> View<'t, F, B> {
	pub(crate) fn new(tree: &'t GenericTree<F, B>, range: Range, direction: Direction) -> Self {
		View {
			tree,
			range,
			direction,
		}
	}

	#[inline]
	pub fn range(&self) -> &Range {
		&self.range
	}

	#[inline]
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Runs `order` over `range` and returns the first node visited.
	fn find_one(&self, order: Order, range: Range) -> Option<NodeRef<'t, F::Node>> {
		let mut ctx = TraversalContext::new(range, None);
		Iterative.traverse(self.tree.arena(), self.tree.root(), order, &mut ctx, |ctx, node| {
			ctx.set_result(Some(node));
			ctx.stop();
		});
		ctx.into_result()
	}

	/// The node with the smallest key in the view.
	pub fn first(&self) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(Order::InOrder, self.range)
	}

	/// The node with the largest key in the view.
	pub fn last(&self) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(Order::ReverseInOrder, self.range)
	}

	/// The node with the largest key `<= key`.
	pub fn floor(&self, key: i64) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(Order::ReverseInOrder, self.range.narrow_to(..=key))
	}

	/// The node with the largest key `< key`.
	pub fn lower(&self, key: i64) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(Order::ReverseInOrder, self.range.narrow_to(..key))
	}

	/// The node with the smallest key `>= key`.
	pub fn ceiling(&self, key: i64) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(Order::InOrder, self.range.narrow_to(key..))
	}

	/// The node with the smallest key `> key`.
	pub fn higher(&self, key: i64) -> Option<NodeRef<'t, F::Node>> {
		self.find_one(
			Order::InOrder,
			self.range.narrow_to((Bound::Excluded(key), Bound::Unbounded)),
		)
	}

	/// A view of the keys in both this view and `bounds`, same direction.
	pub fn sub<R: RangeBounds<i64>>(&self, bounds: R) -> View<'t, F, B> {
		View::new(self.tree, self.range.narrow_to(bounds), self.direction)
	}

	/// Keys below `to` (or up to and including it).
	pub fn head(&self, to: i64, inclusive: bool) -> View<'t, F, B> {
		let end = if inclusive {
			Bound::Included(to)
		} else {
			Bound::Excluded(to)
		};
		self.sub((Bound::Unbounded, end))
	}

	/// Keys above `from` (or from it onwards).
	pub fn tail(&self, from: i64, inclusive: bool) -> View<'t, F, B> {
		let start = if inclusive {
			Bound::Included(from)
		} else {
			Bound::Excluded(from)
		};
		self.sub((start, Bound::Unbounded))
	}

	/// The same keys, iterated in the opposite direction.
	pub fn descending(&self) -> View<'t, F, B> {
		View::new(self.tree, self.range, self.direction.reverse())
	}

	/// Lazily iterates the nodes of the view in its direction.
	pub fn iter(&self) -> Iter<'t, F::Node> {
		Iter::new(self.tree.arena(), self.tree.root(), self.range, self.direction)
	}

	/// Lazily iterates the keys of the view in its direction.
	pub fn keys(&self) -> Keys<'t, F::Node> {
		Keys::new(self.iter())
	}

	/// Number of nodes in the view. Walks the range.
	pub fn len(&self) -> usize {
		if self.range.is_open() {
			return self.tree.len();
		}
		let mut ctx = TraversalContext::new(self.range, 0usize);
		Iterative.in_order(self.tree.arena(), self.tree.root(), &mut ctx, |ctx, _| {
			*ctx.result_mut() += 1;
		});
		ctx.into_result()
	}

	pub fn is_empty(&self) -> bool {
		self.first().is_none()
	}

	/// Whether `key` is stored in the tree and lies in the view.
	pub fn contains_key(&self, key: i64) -> bool {
		self.get(key).is_some()
	}

	/// The node holding `key`, if it lies in the view.
	pub fn get(&self, key: i64) -> Option<NodeRef<'t, F::Node>> {
		if !self.range.contains(key) {
			return None;
		}
		self.tree.search(key)
	}

	/// Whether `node` is one of the nodes of this view, by identity.
	pub fn contains_node(&self, node: NodeRef<'_, F::Node>) -> bool {
		let mut ctx = TraversalContext::new(self.range, false);
		Recursive.in_order(self.tree.arena(), self.tree.root(), &mut ctx, |ctx, candidate| {
			if candidate.id() == node.id() && std::ptr::eq(candidate.node(), node.node()) {
				ctx.set_result(true);
				ctx.stop();
			}
		});
		ctx.into_result()
	}
}

impl<'t, F: NodeFactory, B: Balance> IntoIterator for View<'t, F, B> {
	type Item = NodeRef<'t, F::Node>;
	type IntoIter = Iter<'t, F::Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
