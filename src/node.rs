//! Node representation and the node factory capability.
//!
//! The tree never constructs nodes itself. Every node is produced by a
//! [`NodeFactory`] chosen when the tree is built, which lets callers plug in
//! node types that carry extra payload (or need to release resources when
//! they leave the tree) without touching any of the tree algorithms.
//!
//! Structural state lives in a [`Links`] record embedded in every node. The
//! tree only reads and writes nodes through the [`Node`] trait, so a custom
//! node needs nothing more than a key, a `Links` field and, optionally, the
//! two extension hooks.

use std::fmt;
use std::ops::Deref;

use crate::path::Side;

/// Handle to a node stored in a tree.
///
/// Handles are only meaningful for the tree that issued them. The slot of a
/// removed node may be handed to a later insertion, so a handle kept across
/// a delete of that node can come to name a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	/// Position of the node's slot in the tree's arena.
	#[inline]
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Structural state of a node: child and parent links, cached height and
/// the reserved colour bit.
///
/// The parent link is a non-owning back reference. The tree keeps it in sync
/// on every relink; it is `None` for the root and for nodes that have been
/// removed from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
	pub(crate) left: Option<NodeId>,
	pub(crate) right: Option<NodeId>,
	pub(crate) parent: Option<NodeId>,
	pub(crate) height: i32,
	pub(crate) color: bool,
}

impl Default for Links {
	fn default() -> Self {
		Links {
			left: None,
			right: None,
			parent: None,
			// A node without children
			height: 0,
			color: false,
		}
	}
}

impl Links {
	#[inline]
	pub fn left(&self) -> Option<NodeId> {
		self.left
	}

	#[inline]
	pub fn right(&self) -> Option<NodeId> {
		self.right
	}

	#[inline]
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// The child on the given side.
	#[inline]
	pub fn child(&self, side: Side) -> Option<NodeId> {
		match side {
			Side::Left => self.left,
			Side::Right => self.right,
		}
	}

	/// Cached height of the subtree rooted at this node. A leaf has height 0.
	#[inline]
	pub fn height(&self) -> i32 {
		self.height
	}

	/// The colour bit. Not used by AVL balancing.
	#[inline]
	pub fn color(&self) -> bool {
		self.color
	}

	#[inline]
	pub fn set_color(&mut self, color: bool) {
		self.color = color;
	}

	#[inline]
	pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
		match side {
			Side::Left => self.left = child,
			Side::Right => self.right = child,
		}
	}
}

/// A node that can be stored in a tree.
///
/// Implementors hold a key and a [`Links`] record. The hooks have empty
/// default implementations.
pub trait Node {
	/// The key this node is ordered by.
	fn key(&self) -> i64;

	fn links(&self) -> &Links;

	fn links_mut(&mut self) -> &mut Links;

	/// Whether this is a sentinel produced by [`NodeFactory::nil_node`].
	fn is_nil(&self) -> bool {
		false
	}

	/// Called exactly once when the node is removed from the tree, after its
	/// links have been reset. Release any auxiliary state here.
	fn on_delete(&mut self) {}

	/// Copies all non-structural state (payload, bookkeeping that does not
	/// affect navigation) from `source`, leaving key and links untouched.
	///
	/// The tree relinks nodes rather than moving keys between them, so it
	/// never calls this itself.
	fn copy_auxiliary_state_from(&mut self, source: &Self)
	where
		Self: Sized,
	{
		let _ = source;
	}
}

/// Constructs the nodes of a tree.
pub trait NodeFactory {
	type Node: Node;

	/// Creates a detached node holding `key`.
	fn create_node(&self, key: i64) -> Self::Node;

	/// Creates a sentinel node for representations that model absence with
	/// a placeholder object. The tree itself models absence with `Option`.
	fn nil_node(&self) -> Self::Node;
}

/// The default node: a key and its links, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainNode {
	key: i64,
	links: Links,
	nil: bool,
}

impl Node for PlainNode {
	#[inline]
	fn key(&self) -> i64 {
		self.key
	}

	#[inline]
	fn links(&self) -> &Links {
		&self.links
	}

	#[inline]
	fn links_mut(&mut self) -> &mut Links {
		&mut self.links
	}

	fn is_nil(&self) -> bool {
		self.nil
	}
}

/// Factory for [`PlainNode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNodeFactory;

impl NodeFactory for PlainNodeFactory {
	type Node = PlainNode;

	fn create_node(&self, key: i64) -> PlainNode {
		PlainNode {
			key,
			links: Links::default(),
			nil: false,
		}
	}

	fn nil_node(&self) -> PlainNode {
		PlainNode {
			key: 0,
			links: Links {
				height: -1,
				..Links::default()
			},
			nil: true,
		}
	}
}

/// A borrowed node together with its handle.
///
/// This is what queries and traversals hand out: the node itself is the
/// "value" of the ordered map.
pub struct NodeRef<'t, N> {
	id: NodeId,
	node: &'t N,
}

impl<'t, N> Clone for NodeRef<'t, N> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'t, N> Copy for NodeRef<'t, N> {}

impl<'t, N: Node> NodeRef<'t, N> {
	#[inline]
	pub(crate) fn new(id: NodeId, node: &'t N) -> Self {
		NodeRef {
			id,
			node,
		}
	}

	#[inline]
	pub fn id(&self) -> NodeId {
		self.id
	}

	#[inline]
	pub fn key(&self) -> i64 {
		self.node.key()
	}

	/// The underlying node, with the full borrow lifetime.
	#[inline]
	pub fn node(&self) -> &'t N {
		self.node
	}

	#[inline]
	pub fn left(&self) -> Option<NodeId> {
		self.node.links().left
	}

	#[inline]
	pub fn right(&self) -> Option<NodeId> {
		self.node.links().right
	}

	#[inline]
	pub fn parent(&self) -> Option<NodeId> {
		self.node.links().parent
	}

	#[inline]
	pub fn height(&self) -> i32 {
		self.node.links().height
	}
}

impl<'t, N> Deref for NodeRef<'t, N> {
	type Target = N;

	fn deref(&self) -> &N {
		self.node
	}
}

impl<'t, N> PartialEq for NodeRef<'t, N> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && std::ptr::eq(self.node, other.node)
	}
}

impl<'t, N> Eq for NodeRef<'t, N> {}

impl<'t, N: Node> fmt::Debug for NodeRef<'t, N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeRef")
			.field("id", &self.id)
			.field("key", &self.key())
			.field("height", &self.height())
			.finish()
	}
}
