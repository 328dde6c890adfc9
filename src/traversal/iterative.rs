//! Eager traversal with an explicit stack.

use smallvec::SmallVec;

use super::{leading_child, trailing_child, DepthFirstTraversal, Order, TraversalContext, STACK_CAPACITY};
use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeRef};

/// Iterative engine. Runs to completion (or until stopped) in one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iterative;

impl DepthFirstTraversal for Iterative {
	fn traverse<'t, N, R, V>(
		&self,
		nodes: &'t Arena<N>,
		root: Option<NodeId>,
		order: Order,
		ctx: &mut TraversalContext<R>,
		mut visitor: V,
	) where
		N: Node,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
	{
		let Some(root) = root else {
			return;
		};
		if ctx.is_stopped() {
			return;
		}
		let range = *ctx.range();
		let mut stack: SmallVec<[NodeId; STACK_CAPACITY]> = SmallVec::new();

		let mut visit = |ctx: &mut TraversalContext<R>, id: NodeId| {
			let node = nodes.node_ref(id);
			if range.contains(node.key()) {
				visitor(ctx, node);
			}
		};

		match order {
			Order::PreOrder => {
				stack.push(root);
				while let Some(id) = stack.pop() {
					// Right is pushed first so that left is visited first
					if let Some(right) = trailing_child(nodes, &range, order, id) {
						stack.push(right);
					}
					if let Some(left) = leading_child(nodes, &range, order, id) {
						stack.push(left);
					}
					visit(ctx, id);
					if ctx.is_stopped() {
						return;
					}
				}
			}
			Order::InOrder | Order::ReverseInOrder => {
				let mut cursor = Some(root);
				loop {
					while let Some(id) = cursor {
						stack.push(id);
						cursor = leading_child(nodes, &range, order, id);
					}
					let Some(id) = stack.pop() else {
						return;
					};
					visit(ctx, id);
					if ctx.is_stopped() {
						return;
					}
					cursor = trailing_child(nodes, &range, order, id);
				}
			}
			Order::PostOrder => {
				let mut cursor = Some(root);
				let mut last_popped: Option<NodeId> = None;
				loop {
					if let Some(id) = cursor {
						stack.push(id);
						cursor = leading_child(nodes, &range, order, id);
						continue;
					}
					let Some(&top) = stack.last() else {
						return;
					};
					let right = trailing_child(nodes, &range, order, top);
					if right.is_some() && right != last_popped {
						cursor = right;
						continue;
					}
					stack.pop();
					last_popped = Some(top);
					visit(ctx, top);
					if ctx.is_stopped() {
						return;
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::range::Range;
	use crate::traversal::tests::{collect, doc_tree};

	#[test]
	fn open_ended_ranges() {
		let tree = doc_tree();
		assert_eq!(
			collect(&Iterative, &tree, Order::InOrder, Range::from_bounds(6..)),
			vec![6, 9, 11, 15]
		);
		assert_eq!(
			collect(&Iterative, &tree, Order::ReverseInOrder, Range::from_bounds(..=5)),
			vec![5, 3, 1]
		);
		assert_eq!(
			collect(&Iterative, &tree, Order::PostOrder, Range::from_bounds(4..12)),
			vec![5, 9, 11, 6]
		);
	}

	#[test]
	fn stop_after_first_visit() {
		let tree = doc_tree();
		for order in [Order::PreOrder, Order::InOrder, Order::ReverseInOrder, Order::PostOrder] {
			let mut ctx = TraversalContext::new(Range::OPEN, Vec::new());
			tree.traverse(&Iterative, order, &mut ctx, |ctx, node| {
				ctx.result_mut().push(node.key());
				ctx.stop();
			});
			assert_eq!(ctx.result().len(), 1, "{:?}", order);
		}
	}

	#[test]
	fn empty_tree_visits_nothing() {
		let tree = crate::Tree::new();
		let mut ctx = TraversalContext::new(Range::OPEN, 0);
		tree.traverse(&Iterative, Order::InOrder, &mut ctx, |ctx, _| *ctx.result_mut() += 1);
		assert_eq!(ctx.into_result(), 0);
	}
}
