//! Resumable traversal.
//!
//! The eager engines keep their position on the call stack or in a local
//! stack, so they run to completion. [`SteppingContext`] holds the same
//! position in a value instead: every call to [`SteppingContext::advance`]
//! resumes where the previous one stopped and returns the next in-range node.
//!
//! ```text
//!   state:  stack  [6, 3]      cursor  None      last_popped  #1
//!
//!   advance() ─► pops 3, cursor = 5      ─► Some(3)
//!   advance() ─► pushes 5, pops 5        ─► Some(5)
//!   advance() ─► pops 6, cursor = 11     ─► Some(6)
//!   ...
//!   advance() ─► stack empty, no cursor  ─► None (and None forever after)
//! ```
//!
//! A context is bound to the arena it was started on. Mutating the tree while
//! a detached context is alive and then resuming it yields unspecified
//! nodes (or a panic on a vacated slot), never memory unsafety.

use smallvec::SmallVec;

use super::{leading_child, trailing_child, DepthFirstTraversal, Order, TraversalContext, STACK_CAPACITY};
use crate::arena::Arena;
use crate::node::{Node, NodeId, NodeRef};
use crate::range::Range;

/// Resumable engine. As a [`DepthFirstTraversal`] it drives a fresh
/// [`SteppingContext`] to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stepping;

impl Stepping {
	/// Starts a resumable traversal from `root`.
	pub fn start(&self, root: Option<NodeId>, order: Order, range: Range) -> SteppingContext {
		SteppingContext::new(root, order, range)
	}
}

impl DepthFirstTraversal for Stepping {
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
		let mut stepping = self.start(root, order, *ctx.range());
		while !ctx.is_stopped() {
			let Some(id) = stepping.advance(nodes) else {
				break;
			};
			visitor(ctx, nodes.node_ref(id));
		}
	}
}

/// The suspended state of a depth-first traversal.
#[derive(Debug, Clone)]
pub struct SteppingContext {
	order: Order,
	range: Range,
	stack: SmallVec<[NodeId; STACK_CAPACITY]>,
	cursor: Option<NodeId>,
	last_popped: Option<NodeId>,
}

impl SteppingContext {
	pub fn new(root: Option<NodeId>, order: Order, range: Range) -> SteppingContext {
		let mut stack = SmallVec::new();
		let cursor = match order {
			Order::PreOrder => {
				stack.extend(root);
				None
			}
			_ => root,
		};
		SteppingContext {
			order,
			range,
			stack,
			cursor,
			last_popped: None,
		}
	}

	#[inline]
	pub fn order(&self) -> Order {
		self.order
	}

	#[inline]
	pub fn range(&self) -> &Range {
		&self.range
	}

	/// Whether the traversal has nothing left to yield.
	pub fn is_finished(&self) -> bool {
		self.stack.is_empty() && self.cursor.is_none()
	}

	/// Resumes the traversal and returns the next in-range node, or `None`
	/// once the traversal is exhausted.
	pub fn advance<N: Node>(&mut self, nodes: &Arena<N>) -> Option<NodeId> {
		match self.order {
			Order::PreOrder => self.advance_pre_order(nodes),
			Order::InOrder | Order::ReverseInOrder => self.advance_in_order(nodes),
			Order::PostOrder => self.advance_post_order(nodes),
		}
	}

	fn advance_pre_order<N: Node>(&mut self, nodes: &Arena<N>) -> Option<NodeId> {
		while let Some(id) = self.stack.pop() {
			self.stack.extend(trailing_child(nodes, &self.range, self.order, id));
			self.stack.extend(leading_child(nodes, &self.range, self.order, id));
			if self.range.contains(nodes.key(id)) {
				return Some(id);
			}
		}
		None
	}

	fn advance_in_order<N: Node>(&mut self, nodes: &Arena<N>) -> Option<NodeId> {
		loop {
			while let Some(id) = self.cursor {
				self.stack.push(id);
				self.cursor = leading_child(nodes, &self.range, self.order, id);
			}
			let id = self.stack.pop()?;
			self.cursor = trailing_child(nodes, &self.range, self.order, id);
			if self.range.contains(nodes.key(id)) {
				return Some(id);
			}
		}
	}

	fn advance_post_order<N: Node>(&mut self, nodes: &Arena<N>) -> Option<NodeId> {
		loop {
			if let Some(id) = self.cursor {
				self.stack.push(id);
				self.cursor = leading_child(nodes, &self.range, self.order, id);
				continue;
			}
			let top = *self.stack.last()?;
			let right = trailing_child(nodes, &self.range, self.order, top);
			if right.is_some() && right != self.last_popped {
				self.cursor = right;
				continue;
			}
			self.stack.pop();
			self.last_popped = Some(top);
			if self.range.contains(nodes.key(top)) {
				return Some(top);
			}
		}
	}
}
