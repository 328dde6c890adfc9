//! Structural recursion over the tree.

use super::{DepthFirstTraversal, Order, TraversalContext};
use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeRef};

/// Recursive engine. Stack depth is bounded by the tree height.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recursive;

impl DepthFirstTraversal for Recursive {
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
		if let Some(root) = root {
			walk(nodes, root, order, ctx, &mut visitor);
		}
	}
}

fn walk<'t, N, R, V>(
	nodes: &'t Arena<N>,
	id: NodeId,
	order: Order,
	ctx: &mut TraversalContext<R>,
	visitor: &mut V,
) where
	N: Node,
	V: FnMut(&mut TraversalContext<R>, NodeRef<'t, N>),
{
	let node = nodes.node_ref(id);
	let key = node.key();
	let range = *ctx.range();
	let left = node.left().filter(|_| range.descend_left(key));
	let right = node.right().filter(|_| range.descend_right(key));

	let descend = |ctx: &mut TraversalContext<R>, child: Option<NodeId>, visitor: &mut V| {
		if let Some(child) = child {
			if !ctx.is_stopped() {
				walk(nodes, child, order, ctx, visitor);
			}
		}
	};
	let visit = |ctx: &mut TraversalContext<R>, visitor: &mut V| {
		if !ctx.is_stopped() && range.contains(key) {
			visitor(ctx, node);
		}
	};

	match order {
		Order::PreOrder => {
			visit(ctx, visitor);
			descend(ctx, left, visitor);
			descend(ctx, right, visitor);
		}
		Order::InOrder => {
			descend(ctx, left, visitor);
			visit(ctx, visitor);
			descend(ctx, right, visitor);
		}
		Order::ReverseInOrder => {
			descend(ctx, right, visitor);
			visit(ctx, visitor);
			descend(ctx, left, visitor);
		}
		Order::PostOrder => {
			descend(ctx, left, visitor);
			descend(ctx, right, visitor);
			visit(ctx, visitor);
		}
	}
}
