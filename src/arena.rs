//! Slot storage for the nodes of one tree.
//!
//! Every node of a tree lives in a slot of its arena and is addressed by a
//! [`NodeId`]. Child and parent links are handles into the same arena, which
//! gives each node exactly one owner (the arena) while still allowing the
//! back references and multiple path entries the algorithms need.
//!
//! Slots vacated by deletes are kept on a free list and reused by later
//! inserts.

use std::ops::{Index, IndexMut};

use crate::node::{Node, NodeId, NodeRef};
use crate::path::Side;

/// Node storage with slot recycling.
#[derive(Debug, Clone)]
pub struct Arena<N> {
	slots: Vec<Option<N>>,
	free: Vec<usize>,
	len: usize,
}

impl<N> Default for Arena<N> {
	fn default() -> Self {
		Arena::with_capacity(0)
	}
}

impl<N> Arena<N> {
	pub fn with_capacity(capacity: usize) -> Arena<N> {
		Arena {
			slots: Vec::with_capacity(capacity),
			free: Vec::new(),
			len: 0,
		}
	}

	/// Number of occupied slots.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the node in slot `id`, or `None` if the slot is vacant or out of range.
	#[inline]
	pub fn get(&self, id: NodeId) -> Option<&N> {
		self.slots.get(id.0).and_then(|slot| slot.as_ref())
	}

	/// Stores `node` in a free slot (or a new one) and returns its handle.
	pub(crate) fn insert(&mut self, node: N) -> NodeId {
		self.len += 1;
		if let Some(index) = self.free.pop() {
			debug_assert!(self.slots[index].is_none());
			self.slots[index] = Some(node);
			NodeId(index)
		} else {
			self.slots.push(Some(node));
			NodeId(self.slots.len() - 1)
		}
	}

	/// Moves the node out of slot `id` and puts the slot on the free list.
	pub(crate) fn remove(&mut self, id: NodeId) -> Option<N> {
		let node = self.slots.get_mut(id.0)?.take()?;
		self.free.push(id.0);
		self.len -= 1;
		Some(node)
	}

	/// Empties the arena, yielding every stored node.
	pub(crate) fn drain(&mut self) -> impl Iterator<Item = N> + '_ {
		self.free.clear();
		self.len = 0;
		self.slots.drain(..).flatten()
	}
}

impl<N> Index<NodeId> for Arena<N> {
	type Output = N;

	#[inline]
	fn index(&self, id: NodeId) -> &N {
		match self.slots.get(id.0) {
			Some(Some(node)) => node,
			_ => panic!("no node in arena slot {}", id),
		}
	}
}

impl<N> IndexMut<NodeId> for Arena<N> {
	#[inline]
	fn index_mut(&mut self, id: NodeId) -> &mut N {
		match self.slots.get_mut(id.0) {
			Some(Some(node)) => node,
			_ => panic!("no node in arena slot {}", id),
		}
	}
}

impl<N: Node> Arena<N> {
	#[inline]
	pub fn node_ref(&self, id: NodeId) -> NodeRef<'_, N> {
		NodeRef::new(id, &self[id])
	}

	#[inline]
	pub fn key(&self, id: NodeId) -> i64 {
		self[id].key()
	}

	#[inline]
	pub fn left(&self, id: NodeId) -> Option<NodeId> {
		self[id].links().left
	}

	#[inline]
	pub fn right(&self, id: NodeId) -> Option<NodeId> {
		self[id].links().right
	}

	#[inline]
	pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
		self[id].links().child(side)
	}

	#[inline]
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self[id].links().parent
	}

	/// Height of an optional subtree; an absent subtree has height -1.
	#[inline]
	pub fn height_of(&self, id: Option<NodeId>) -> i32 {
		match id {
			Some(id) => self[id].links().height,
			None => -1,
		}
	}

	/// `height(right) - height(left)`.
	#[inline]
	pub fn balance_factor(&self, id: NodeId) -> i32 {
		let links = self[id].links();
		self.height_of(links.right) - self.height_of(links.left)
	}

	/// Recomputes the cached height of `id` from its children.
	#[inline]
	pub(crate) fn update_height(&mut self, id: NodeId) {
		let links = self[id].links();
		let height = 1 + self.height_of(links.left).max(self.height_of(links.right));
		self[id].links_mut().height = height;
	}

	/// Puts `child` into the `side` slot of `parent` and points the child's
	/// parent link back at `parent`.
	#[inline]
	pub(crate) fn link(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
		self[parent].links_mut().set_child(side, child);
		if let Some(child) = child {
			self[child].links_mut().parent = Some(parent);
		}
	}

	/// Leftmost node of the subtree rooted at `id`.
	pub fn min_of(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.left(id) {
			id = left;
		}
		id
	}

	/// Rightmost node of the subtree rooted at `id`.
	pub fn max_of(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.right(id) {
			id = right;
		}
		id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::{NodeFactory, PlainNodeFactory};

	#[test]
	fn insert_remove_reuses_slots() {
		let mut arena = Arena::default();
		let a = arena.insert(PlainNodeFactory.create_node(1));
		let b = arena.insert(PlainNodeFactory.create_node(2));
		assert_eq!(arena.len(), 2);
		assert_ne!(a, b);

		let removed = arena.remove(a).expect("slot occupied");
		assert_eq!(removed.key(), 1);
		assert_eq!(arena.len(), 1);
		assert!(arena.get(a).is_none());
		assert!(arena.remove(a).is_none());

		let c = arena.insert(PlainNodeFactory.create_node(3));
		assert_eq!(c, a, "vacated slot should be reused");
		assert_eq!(arena.key(c), 3);

		let mut drained: Vec<i64> = arena.drain().map(|node| node.key()).collect();
		drained.sort_unstable();
		assert_eq!(drained, vec![2, 3]);
		assert!(arena.is_empty());
		assert!(arena.get(b).is_none());
	}

	#[test]
	fn link_sets_parent_and_heights() {
		let mut arena = Arena::default();
		let root = arena.insert(PlainNodeFactory.create_node(2));
		let left = arena.insert(PlainNodeFactory.create_node(1));
		arena.link(root, Side::Left, Some(left));
		arena.update_height(root);

		assert_eq!(arena.left(root), Some(left));
		assert_eq!(arena.parent(left), Some(root));
		assert_eq!(arena.height_of(Some(root)), 1);
		assert_eq!(arena.height_of(None), -1);
		assert_eq!(arena.balance_factor(root), -1);
		assert_eq!(arena.min_of(root), left);
		assert_eq!(arena.max_of(root), root);
	}

	#[test]
	#[should_panic(expected = "no node in arena slot")]
	fn indexing_vacant_slot_panics() {
		let arena: Arena<crate::node::PlainNode> = Arena::default();
		let _ = &arena[NodeId(3)];
	}
}
