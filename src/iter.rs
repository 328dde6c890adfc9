//! Iterators for the `GenericTree` data structure
//!
//! Both iterators are thin adapters over two [`SteppingContext`]s: one walks
//! the range from the front in the iterator's direction, the other from the
//! back in the opposite direction. Each end remembers the last key it
//! yielded, and the iterator finishes as soon as the two ends meet, so
//! mixing `next` and `next_back` never yields a node twice.
//!
//! Iterators borrow the tree immutably; the tree cannot be modified while
//! one is alive.

use std::iter::FusedIterator;

use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeRef};
use crate::range::Range;
use crate::traversal::SteppingContext;
use crate::Direction;

/// Lazy iterator over the nodes of a range, in key order or reverse key
/// order.
pub struct Iter<'t, N> {
	nodes: &'t Arena<N>,
	direction: Direction,
	front: SteppingContext,
	back: SteppingContext,
	front_key: Option<i64>,
	back_key: Option<i64>,
	finished: bool,
}

impl<'t, N: Node> Iter<'t, N> {
	pub(crate) fn new(
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		range: Range,
		direction: Direction,
	) -> Iter<'t, N> {
		Iter {
			nodes,
			direction,
			front: SteppingContext::new(root, direction.order(), range),
			back: SteppingContext::new(root, direction.reverse().order(), range),
			front_key: None,
			back_key: None,
			finished: root.is_none(),
		}
	}

	/// The direction `next` walks in.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Whether `key` from one end has reached the key last yielded by the
	/// other end.
	#[inline]
	fn reached(&self, leading: i64, trailing: i64) -> bool {
		match self.direction {
			Direction::Forward => leading >= trailing,
			Direction::Reverse => leading <= trailing,
		}
	}
}

impl<'t, N: Node> Iterator for Iter<'t, N> {
	type Item = NodeRef<'t, N>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		let Some(id) = self.front.advance(self.nodes) else {
			self.finished = true;
			return None;
		};
		let key = self.nodes.key(id);
		if self.back_key.is_some_and(|back| self.reached(key, back)) {
			self.finished = true;
			return None;
		}
		self.front_key = Some(key);
		Some(self.nodes.node_ref(id))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if self.finished {
			(0, Some(0))
		} else {
			(0, Some(self.nodes.len()))
		}
	}
}

impl<'t, N: Node> DoubleEndedIterator for Iter<'t, N> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		let Some(id) = self.back.advance(self.nodes) else {
			self.finished = true;
			return None;
		};
		let key = self.nodes.key(id);
		if self.front_key.is_some_and(|front| self.reached(front, key)) {
			self.finished = true;
			return None;
		}
		self.back_key = Some(key);
		Some(self.nodes.node_ref(id))
	}
}

impl<'t, N: Node> FusedIterator for Iter<'t, N> {}

/// Lazy iterator over the keys of a range.
pub struct Keys<'t, N> {
	inner: Iter<'t, N>,
}

impl<'t, N: Node> Keys<'t, N> {
	pub(crate) fn new(inner: Iter<'t, N>) -> Keys<'t, N> {
		Keys {
			inner,
		}
	}
}

impl<'t, N: Node> Iterator for Keys<'t, N> {
	type Item = i64;

	#[inline]
	fn next(&mut self) -> Option<i64> {
		self.inner.next().map(|node| node.key())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'t, N: Node> DoubleEndedIterator for Keys<'t, N> {
	#[inline]
	fn next_back(&mut self) -> Option<i64> {
		self.inner.next_back().map(|node| node.key())
	}
}

impl<'t, N: Node> FusedIterator for Keys<'t, N> {}
