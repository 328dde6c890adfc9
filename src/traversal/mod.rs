//! # Depth-First Traversal Engines
//!
//! Every range query, ordered-map view and iterator in this crate is driven by
//! one of three interchangeable engines:
//!
//! | Engine        | State                        | Use                            |
//! |---------------|------------------------------|--------------------------------|
//! | [`Recursive`] | call stack                   | simple, depth bounded by height |
//! | [`Iterative`] | explicit `SmallVec` stack    | eager scans (`first`, `floor`)  |
//! | [`Stepping`]  | a detached [`SteppingContext`] | lazy iteration, one node per step |
//!
//! All three share one contract: given an [`Order`], a [`TraversalContext`]
//! and a visitor, call the visitor for every node whose key lies in the
//! context's range, in that order. Subtrees that cannot hold in-range keys
//! are never entered. Once the visitor calls [`TraversalContext::stop`], no
//! further node is visited.
//!
//! ```text
//!              6             PreOrder        6 3 1 5 11 9 15
//!            /   \           InOrder         1 3 5 6 9 11 15
//!           3     11         ReverseInOrder  15 11 9 6 5 3 1
//!          / \   /  \        PostOrder       1 5 3 9 15 11 6
//!         1   5 9    15
//! ```
//!
//! The engines are driven through [`crate::GenericTree::traverse`] or, for
//! callers holding an arena directly, through [`DepthFirstTraversal`].

mod iterative;
mod recursive;
mod stepping;

pub use iterative::Iterative;
pub use recursive::Recursive;
pub use stepping::{Stepping, SteppingContext};

use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeRef};
use crate::path::Side;
use crate::range::Range;

/// Inline capacity of the explicit traversal stacks.
pub(crate) const STACK_CAPACITY: usize = 64;

/// The order in which a depth-first traversal visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
	/// Node, then left subtree, then right subtree.
	PreOrder,
	/// Left subtree, then right subtree, then node.
	PostOrder,
	/// Ascending key order.
	InOrder,
	/// Descending key order.
	ReverseInOrder,
}

/// Per-traversal state handed to the visitor: the range being scanned, an
/// accumulator and the stop flag.
#[derive(Debug, Clone)]
pub struct TraversalContext<R> {
	range: Range,
	result: R,
	stopped: bool,
}

impl<R: Default> TraversalContext<R> {
	/// A context with a default accumulator.
	pub fn with_range(range: Range) -> Self {
		TraversalContext::new(range, R::default())
	}
}

impl<R> TraversalContext<R> {
	pub fn new(range: Range, result: R) -> Self {
		TraversalContext {
			range,
			result,
			stopped: false,
		}
	}

	#[inline]
	pub fn range(&self) -> &Range {
		&self.range
	}

	/// Ends the traversal; no node is visited after this call returns.
	#[inline]
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	#[inline]
	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	#[inline]
	pub fn result(&self) -> &R {
		&self.result
	}

	#[inline]
	pub fn result_mut(&mut self) -> &mut R {
		&mut self.result
	}

	#[inline]
	pub fn set_result(&mut self, result: R) {
		self.result = result;
	}

	pub fn into_result(self) -> R {
		self.result
	}
}

/// A depth-first traversal engine.
pub trait DepthFirstTraversal {
	/// Visits every in-range node reachable from `root` in `order`.
	fn traverse<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		order: Order,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>);

	fn pre_order<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
	{
		self.traverse(nodes, root, Order::PreOrder, ctx, visitor)
	}

	fn post_order<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
	{
		self.traverse(nodes, root, Order::PostOrder, ctx, visitor)
	}

	fn in_order<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
	{
		self.traverse(nodes, root, Order::InOrder, ctx, visitor)
	}

	fn reverse_in_order<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
	{
		self.traverse(nodes, root, Order::ReverseInOrder, ctx, visitor)
	}
}

/// The child to descend into on the way "first" for an order, pruned by the
/// range: left for everything but reverse in-order.
#[inline]
pub(crate) fn leading_child<N: Node>(
	nodes: &Arena<N>,
	range: &Range,
	order: Order,
	id: NodeId,
) -> Option<NodeId> {
	pruned_child(nodes, range, leading_side(order), id)
}

/// The child to descend into "second" for an order, pruned by the range.
#[inline]
pub(crate) fn trailing_child<N: Node>(
	nodes: &Arena<N>,
	range: &Range,
	order: Order,
	id: NodeId,
) -> Option<NodeId> {
	pruned_child(nodes, range, leading_side(order).opposite(), id)
}

#[inline]
fn leading_side(order: Order) -> Side {
	match order {
		Order::ReverseInOrder => Side::Right,
		_ => Side::Left,
	}
}

#[inline]
fn pruned_child<N: Node>(nodes: &Arena<N>, range: &Range, side: Side, id: NodeId) -> Option<NodeId> {
	let key = nodes.key(id);
	let descend = match side {
		Side::Left => range.descend_left(key),
		Side::Right => range.descend_right(key),
	};
	nodes.child(id, side).filter(|_| descend)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::{Tree, UnbalancedTree};

	/// The tree drawn in the module docs, built without rotations.
	pub(crate) fn doc_tree() -> UnbalancedTree {
		let mut tree = UnbalancedTree::new();
		for key in [6, 3, 11, 1, 5, 9, 15] {
			tree.insert(key).unwrap();
		}
		tree
	}

	pub(crate) fn collect<E: DepthFirstTraversal>(
		engine: &E,
		tree: &UnbalancedTree,
		order: Order,
		range: Range,
	) -> Vec<i64> {
		let mut ctx = TraversalContext::<Vec<i64>>::with_range(range);
		tree.traverse(engine, order, &mut ctx, |ctx, node| ctx.result_mut().push(node.key()));
		ctx.into_result()
	}

	#[test]
	fn context_accumulates_and_stops() {
		let mut ctx = TraversalContext::new(Range::OPEN, 0usize);
		assert!(!ctx.is_stopped());
		*ctx.result_mut() += 2;
		ctx.stop();
		assert!(ctx.is_stopped());
		assert_eq!(*ctx.result(), 2);
		ctx.set_result(7);
		assert_eq!(ctx.into_result(), 7);
	}

	#[test]
	fn convenience_methods_match_order() {
		let tree = Tree::from_keys([2, 1, 3]).unwrap();
		let (nodes, root) = (tree.arena(), tree.root());
		let mut ctx = TraversalContext::<Vec<i64>>::with_range(Range::OPEN);
		Recursive.pre_order(nodes, root, &mut ctx, |ctx, n| ctx.result_mut().push(n.key()));
		Recursive.post_order(nodes, root, &mut ctx, |ctx, n| ctx.result_mut().push(n.key()));
		Iterative.in_order(nodes, root, &mut ctx, |ctx, n| ctx.result_mut().push(n.key()));
		Stepping.reverse_in_order(nodes, root, &mut ctx, |ctx, n| ctx.result_mut().push(n.key()));
		assert_eq!(ctx.into_result(), vec![2, 1, 3, 1, 3, 2, 1, 2, 3, 3, 2, 1]);
	}

	#[test]
	fn doc_tree_orders() {
		let tree = doc_tree();
		let cases = [
			(Order::PreOrder, vec![6, 3, 1, 5, 11, 9, 15]),
			(Order::InOrder, vec![1, 3, 5, 6, 9, 11, 15]),
			(Order::ReverseInOrder, vec![15, 11, 9, 6, 5, 3, 1]),
			(Order::PostOrder, vec![1, 5, 3, 9, 15, 11, 6]),
		];
		for (order, expected) in cases {
			assert_eq!(collect(&Recursive, &tree, order, Range::OPEN), expected, "{:?}", order);
			assert_eq!(collect(&Iterative, &tree, order, Range::OPEN), expected, "{:?}", order);
			assert_eq!(collect(&Stepping, &tree, order, Range::OPEN), expected, "{:?}", order);
		}
	}

	#[test]
	fn stopped_context_visits_nothing() {
		let tree = doc_tree();
		for order in [Order::PreOrder, Order::PostOrder, Order::InOrder, Order::ReverseInOrder] {
			for engine in 0..3 {
				let mut ctx = TraversalContext::<Vec<i64>>::with_range(Range::OPEN);
				ctx.stop();
				let visitor = |ctx: &mut TraversalContext<Vec<i64>>, node: NodeRef<'_, crate::PlainNode>| {
					ctx.result_mut().push(node.key())
				};
				match engine {
					0 => tree.traverse(&Recursive, order, &mut ctx, visitor),
					1 => tree.traverse(&Iterative, order, &mut ctx, visitor),
					_ => tree.traverse(&Stepping, order, &mut ctx, visitor),
				}
				assert!(ctx.into_result().is_empty(), "engine {} {:?}", engine, order);
			}
		}
	}

	#[test]
	fn stacks_deeper_than_inline_capacity() {
		let depth = STACK_CAPACITY as i64 * 2;
		let tree = UnbalancedTree::from_keys(0..depth).unwrap();
		assert_eq!(tree.height() as i64, depth - 1);
		let ascending: Vec<i64> = (0..depth).collect();
		let descending: Vec<i64> = (0..depth).rev().collect();
		for engine in 0..3 {
			let (in_order, post_order) = match engine {
				0 => (
					collect(&Recursive, &tree, Order::InOrder, Range::OPEN),
					collect(&Recursive, &tree, Order::PostOrder, Range::OPEN),
				),
				1 => (
					collect(&Iterative, &tree, Order::InOrder, Range::OPEN),
					collect(&Iterative, &tree, Order::PostOrder, Range::OPEN),
				),
				_ => (
					collect(&Stepping, &tree, Order::InOrder, Range::OPEN),
					collect(&Stepping, &tree, Order::PostOrder, Range::OPEN),
				),
			};
			assert_eq!(in_order, ascending, "engine {}", engine);
			assert_eq!(post_order, descending, "engine {}", engine);
		}
	}
}
