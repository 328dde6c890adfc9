//! # Ordtree: An Ordered, Self-Balancing Key Store
//!
//! This crate provides an in-memory binary search tree over `i64` keys with
//! AVL balancing, range-bounded traversal and a resumable iteration protocol.
//! Together they give ordered-map semantics: first/last, floor/ceiling,
//! sub-range views, and ascending or descending iteration.
//!
//! ## Design Overview
//!
//! ### Key Concepts
//!
//! **Arena Storage**: Every node lives in a slot of the tree's [`arena::Arena`] and is
//! addressed by a [`NodeId`]. Child links and the parent back link are handles into the
//! same arena, so there is exactly one owner per node and no reference cycles.
//!
//! **Pluggable Nodes**: The tree never builds nodes itself. A [`NodeFactory`] chosen at
//! construction creates them, so callers can carry extra payload in their own node type
//! and get an [`Node::on_delete`] callback when a node leaves the tree.
//!
//! **Path Tracking**: Insert and delete descend iteratively and record every node they
//! touch in a [`path::Path`]. After the structural edit the path is walked bottom-up to
//! refresh cached heights and rotate, rewiring parent slots through the recorded sides.
//!
//! **Range Decisions**: A [`Range`] turns inclusive and exclusive bounds into fixed
//! thresholds once, so every traversal step is a single comparison per decision.
//!
//! ### Tree Structure
//!
//! ```text
//!                  ┌──────────────────┐
//!                  │   GenericTree    │  <- root handle, factory, balancer
//!                  │  root: NodeId    │
//!                  └────────┬─────────┘
//!                           │
//!                           ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │ Arena   [#0: 6] [#1: 3] [#2: 11] [#3: free] [#4: 1] │  <- slots, free list
//!   └─────────────────────────────────────────────────────┘
//!                           │
//!                 #0 key 6, height 2
//!                  /                \
//!        #1 key 3, height 1     #2 key 11, height 0
//!          /
//!   #4 key 1, height 0            (every child points back to its parent)
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use ordtree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! for key in [3, 1, 13, 5, 6, 10, 11] {
//!     tree.insert(key).unwrap();
//! }
//!
//! // Duplicate keys are rejected
//! assert!(tree.insert(5).is_err());
//!
//! // Navigation
//! assert_eq!(tree.floor(7).map(|n| n.key()), Some(6));
//! assert_eq!(tree.ceiling(7).map(|n| n.key()), Some(10));
//!
//! // Range views iterate lazily, in either direction
//! let keys: Vec<i64> = tree.range(5..=11).descending().keys().collect();
//! assert_eq!(keys, vec![11, 10, 6, 5]);
//!
//! // Deletion hands the node back
//! let removed = tree.delete(5).unwrap();
//! assert_eq!(ordtree::Node::key(&removed), 5);
//! ```
//!
//! ## Mutation and Iteration
//!
//! The tree is single-threaded. Views and iterators borrow it immutably, so it
//! cannot be modified while one is alive. A detached [`traversal::SteppingContext`]
//! does not borrow the tree; resuming one after a mutation yields unspecified nodes.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeBounds;

use tracing::{debug, trace};

pub mod arena;
pub mod balance;
pub mod error;
pub mod iter;
pub mod node;
pub mod path;
pub mod range;
pub mod traversal;
#[cfg(feature = "test-utils")]
pub mod util;
pub mod view;

pub use balance::{Avl, Balance, Unbalanced};
pub use error::{Error, Result};
pub use node::{Links, Node, NodeFactory, NodeId, NodeRef, PlainNode, PlainNodeFactory};
pub use range::Range;
pub use traversal::{DepthFirstTraversal, Order, TraversalContext};
pub use view::View;

use arena::Arena;
use path::{Path, Side};
use traversal::SteppingContext;

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// An AVL tree of [`PlainNode`]s.
///
/// This is the recommended type for most use cases. Use [`GenericTree`]
/// directly to plug in a custom [`NodeFactory`] or a different [`Balance`].
pub type Tree = GenericTree<PlainNodeFactory, Avl>;

/// A plain binary search tree of [`PlainNode`]s: same algorithms, no rotations.
pub type UnbalancedTree = GenericTree<PlainNodeFactory, Unbalanced>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Runtime settings for a tree.
///
/// With the `serde` feature enabled the config can be deserialized; missing
/// fields take their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
	/// Number of node slots to allocate up front.
	pub initial_capacity: usize,
}

/// Direction for iteration over a view.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Direction {
	/// Toward higher keys.
	#[default]
	Forward,
	/// Toward lower keys.
	Reverse,
}

impl Direction {
	#[inline]
	pub fn reverse(self) -> Direction {
		match self {
			Direction::Forward => Direction::Reverse,
			Direction::Reverse => Direction::Forward,
		}
	}

	/// The traversal order that walks keys in this direction.
	#[inline]
	pub fn order(self) -> Order {
		match self {
			Direction::Forward => Order::InOrder,
			Direction::Reverse => Order::ReverseInOrder,
		}
	}
}

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// A binary search tree with a pluggable node factory and balancer.
///
/// # Type Parameters
///
/// - `F`: The [`NodeFactory`] producing the tree's nodes. Default is [`PlainNodeFactory`].
/// - `B`: The [`Balance`] strategy. Default is [`Avl`]; [`Unbalanced`] keeps
///   insertion shape.
///
/// # Internal Structure
///
/// The tree consists of:
/// - An **arena** owning every node, addressed by [`NodeId`].
/// - A **root handle**, `None` when the tree is empty.
/// - The **factory**, consulted once per successful insert.
pub struct GenericTree<F: NodeFactory = PlainNodeFactory, B = Avl> {
	nodes: Arena<F::Node>,
	root: Option<NodeId>,
	factory: F,
	balance: PhantomData<B>,
}

impl<F: NodeFactory + Default, B: Balance> Default for GenericTree<F, B> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F, B> Clone for GenericTree<F, B>
where
	F: NodeFactory + Clone,
	F::Node: Clone,
{
	fn clone(&self) -> Self {
		GenericTree {
			nodes: self.nodes.clone(),
			root: self.root,
			factory: self.factory.clone(),
			balance: PhantomData,
		}
	}
}

impl<F: NodeFactory + Default, B: Balance> GenericTree<F, B> {
	/// Creates an empty tree using the factory's default value.
	///
	/// # Example
	///
	/// ```
	/// use ordtree::Tree;
	///
	/// let tree = Tree::new();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.height(), -1);
	/// ```
	pub fn new() -> Self {
		Self::with_factory(F::default())
	}

	/// Builds a tree by inserting `keys` in order.
	///
	/// Fails on the first duplicate key.
	pub fn from_keys<I: IntoIterator<Item = i64>>(keys: I) -> Result<Self> {
		let mut tree = Self::new();
		for key in keys {
			tree.insert(key)?;
		}
		Ok(tree)
	}
}

// ---------------------------------------------------------------------------
// GenericTree Implementation
// ---------------------------------------------------------------------------

impl<F: NodeFactory, B: Balance> GenericTree<F, B> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree whose nodes are produced by `factory`.
	pub fn with_factory(factory: F) -> Self {
		Self::with_config(factory, TreeConfig::default())
	}

	/// Creates an empty tree with explicit runtime settings.
	pub fn with_config(factory: F, config: TreeConfig) -> Self {
		GenericTree {
			nodes: Arena::with_capacity(config.initial_capacity),
			root: None,
			factory,
			balance: PhantomData,
		}
	}

	// -----------------------------------------------------------------------
	// Tree Metadata
	// -----------------------------------------------------------------------

	/// The arena holding the tree's nodes, for driving traversal engines
	/// directly.
	#[inline]
	pub fn arena(&self) -> &Arena<F::Node> {
		&self.nodes
	}

	#[inline]
	pub fn factory(&self) -> &F {
		&self.factory
	}

	#[inline]
	pub fn root(&self) -> Option<NodeId> {
		self.root
	}

	pub fn root_node(&self) -> Option<NodeRef<'_, F::Node>> {
		self.root.map(|id| self.nodes.node_ref(id))
	}

	/// Number of nodes in the tree. O(1).
	#[inline]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Height of the root: -1 for an empty tree, 0 for a single node.
	pub fn height(&self) -> i32 {
		self.nodes.height_of(self.root)
	}

	/// The node behind `id`, or `None` if the handle no longer names a node.
	pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, F::Node>> {
		self.nodes.get(id).map(|node| NodeRef::new(id, node))
	}

	/// The parent of `id`; `None` for the root or a stale handle.
	pub fn parent(&self, id: NodeId) -> Option<NodeRef<'_, F::Node>> {
		let parent = self.nodes.get(id)?.links().parent()?;
		Some(self.nodes.node_ref(parent))
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Finds the node holding `key`.
	pub fn search(&self, key: i64) -> Option<NodeRef<'_, F::Node>> {
		let mut cursor = self.root;
		while let Some(id) = cursor {
			cursor = match key.cmp(&self.nodes.key(id)) {
				Ordering::Less => self.nodes.left(id),
				Ordering::Greater => self.nodes.right(id),
				Ordering::Equal => return Some(self.nodes.node_ref(id)),
			};
		}
		None
	}

	pub fn contains_key(&self, key: i64) -> bool {
		self.search(key).is_some()
	}

	/// The in-order successor of `id`.
	///
	/// With a right subtree this is its leftmost node; otherwise the deepest
	/// ancestor reached by going left on the way down from the root.
	pub fn successor(&self, id: NodeId) -> Option<NodeRef<'_, F::Node>> {
		let key = self.nodes.get(id)?.key();
		if let Some(right) = self.nodes.right(id) {
			return Some(self.nodes.node_ref(self.nodes.min_of(right)));
		}
		let mut candidate = None;
		let mut cursor = self.root;
		while let Some(current) = cursor {
			cursor = match key.cmp(&self.nodes.key(current)) {
				Ordering::Less => {
					candidate = Some(current);
					self.nodes.left(current)
				}
				Ordering::Greater => self.nodes.right(current),
				Ordering::Equal => break,
			};
		}
		candidate.map(|id| self.nodes.node_ref(id))
	}

	/// The in-order predecessor of `id`. Mirror of [`GenericTree::successor`].
	pub fn predecessor(&self, id: NodeId) -> Option<NodeRef<'_, F::Node>> {
		let key = self.nodes.get(id)?.key();
		if let Some(left) = self.nodes.left(id) {
			return Some(self.nodes.node_ref(self.nodes.max_of(left)));
		}
		let mut candidate = None;
		let mut cursor = self.root;
		while let Some(current) = cursor {
			cursor = match key.cmp(&self.nodes.key(current)) {
				Ordering::Greater => {
					candidate = Some(current);
					self.nodes.right(current)
				}
				Ordering::Less => self.nodes.left(current),
				Ordering::Equal => break,
			};
		}
		candidate.map(|id| self.nodes.node_ref(id))
	}

	// -----------------------------------------------------------------------
	// Mutation
	// -----------------------------------------------------------------------

	/// Inserts a new node holding `key` and returns its handle.
	///
	/// # Errors
	///
	/// [`Error::DuplicateKey`] if `key` is already present. The tree is left
	/// untouched and the factory is not called.
	///
	/// # Example
	///
	/// ```
	/// use ordtree::{Error, Tree};
	///
	/// let mut tree = Tree::new();
	/// let id = tree.insert(4).unwrap();
	/// assert_eq!(tree.node(id).map(|n| n.key()), Some(4));
	/// assert_eq!(tree.insert(4), Err(Error::DuplicateKey(4)));
	/// ```
	pub fn insert(&mut self, key: i64) -> Result<NodeId> {
		let mut path = Path::new();
		let mut side = Side::Left;
		let mut parent = None;
		let mut cursor = self.root;

		while let Some(id) = cursor {
			path.push(side, id);
			side = match key.cmp(&self.nodes.key(id)) {
				Ordering::Less => Side::Left,
				Ordering::Greater => Side::Right,
				Ordering::Equal => {
					debug!(key, "rejected duplicate insert");
					return Err(Error::DuplicateKey(key));
				}
			};
			parent = Some(id);
			cursor = self.nodes.child(id, side);
		}

		let node = self.factory.create_node(key);
		debug_assert_eq!(node.links().left(), None, "factory returned a linked node");
		debug_assert_eq!(node.links().right(), None, "factory returned a linked node");
		let id = self.nodes.insert(node);
		path.push(side, id);
		self.replace_child(parent, side, Some(id));
		self.fix(&path);
		Ok(id)
	}

	/// Removes the node holding `key` and returns it.
	///
	/// The returned node has default [`Links`] and has already had
	/// [`Node::on_delete`] called. Handles to all other nodes stay valid: a
	/// node with two children is replaced by relinking its in-order
	/// successor, never by moving keys between nodes.
	pub fn delete(&mut self, key: i64) -> Option<F::Node> {
		let mut path = Path::new();
		let mut side = Side::Left;
		let mut cursor = self.root;

		let target = loop {
			let Some(id) = cursor else {
				debug!(key, "delete of absent key");
				return None;
			};
			let next = match key.cmp(&self.nodes.key(id)) {
				Ordering::Less => Side::Left,
				Ordering::Greater => Side::Right,
				Ordering::Equal => break id,
			};
			path.push(side, id);
			side = next;
			cursor = self.nodes.child(id, next);
		};

		// The path ends at the target's parent; `side` is the target's slot.
		let parent = path.last().map(|element| element.node);
		match (self.nodes.left(target), self.nodes.right(target)) {
			(Some(left), Some(right)) => {
				let mut successor = right;
				let mut successor_parent = target;
				let mut descent = Path::new();
				let mut descent_side = Side::Right;
				while let Some(next) = self.nodes.left(successor) {
					descent.push(descent_side, successor);
					descent_side = Side::Left;
					successor_parent = successor;
					successor = next;
				}
				trace!(key, successor = self.nodes.key(successor), "splice in successor");

				path.push(side, successor);
				path.extend(descent.iter().copied());
				self.replace_child(parent, side, Some(successor));
				if successor == right {
					self.nodes.link(successor, Side::Left, Some(left));
				} else {
					let successor_right = self.nodes.right(successor);
					self.nodes.link(successor_parent, Side::Left, successor_right);
					self.nodes.link(successor, Side::Left, Some(left));
					self.nodes.link(successor, Side::Right, Some(right));
				}
			}
			(child, None) | (None, child) => self.replace_child(parent, side, child),
		}

		self.fix(&path);

		let mut node = self.nodes.remove(target)?;
		*node.links_mut() = Links::default();
		node.on_delete();
		Some(node)
	}

	/// Removes and returns the node with the smallest key.
	pub fn pop_first(&mut self) -> Option<F::Node> {
		let key = self.first()?.key();
		self.delete(key)
	}

	/// Removes and returns the node with the largest key.
	pub fn pop_last(&mut self) -> Option<F::Node> {
		let key = self.last()?.key();
		self.delete(key)
	}

	/// Removes every node, calling [`Node::on_delete`] on each.
	pub fn clear(&mut self) {
		self.root = None;
		for mut node in self.nodes.drain() {
			*node.links_mut() = Links::default();
			node.on_delete();
		}
	}

	/// Links `child` into `side` of `parent`, or makes it the root.
	fn replace_child(&mut self, parent: Option<NodeId>, side: Side, child: Option<NodeId>) {
		match parent {
			Some(parent) => self.nodes.link(parent, side, child),
			None => self.set_root(child),
		}
	}

	fn set_root(&mut self, root: Option<NodeId>) {
		if let Some(id) = root {
			self.nodes[id].links_mut().parent = None;
		}
		self.root = root;
	}

	fn fix(&mut self, path: &Path) {
		if let Some(root) = balance::fix_path::<_, B>(&mut self.nodes, path, self.root) {
			debug!(root = self.nodes.key(root), "root replaced by rotation");
			self.set_root(Some(root));
		}
	}

	// -----------------------------------------------------------------------
	// Traversal
	// -----------------------------------------------------------------------

	/// Runs `engine` over the tree in `order`, restricted to the context's
	/// range.
	///
	/// ```
	/// use ordtree::traversal::Iterative;
	/// use ordtree::{Order, Range, TraversalContext, Tree};
	///
	/// let tree = Tree::from_keys([4, 2, 6, 1, 3]).unwrap();
	/// let mut ctx = TraversalContext::new(Range::from_bounds(2..), 0);
	/// tree.traverse(&Iterative, Order::InOrder, &mut ctx, |ctx, node| {
	///     *ctx.result_mut() += node.key();
	/// });
	/// assert_eq!(ctx.into_result(), 2 + 3 + 4 + 6);
	/// ```
	pub fn traverse<'t, E, R, V>(
		&'t self,
		engine: &E,
		order: Order,
		ctx: &mut TraversalContext<R>,
		visitor: V,
	) where
		E: DepthFirstTraversal,
		V: FnMut(&mut TraversalContext<R>, NodeRef<'t, F::Node>),
	{
		engine.traverse(&self.nodes, self.root, order, ctx, visitor)
	}

	/// Starts a resumable traversal. Drive it with
	/// [`SteppingContext::advance`] on [`GenericTree::arena`].
	pub fn stepping(&self, order: Order, range: Range) -> SteppingContext {
		SteppingContext::new(self.root, order, range)
	}

	// -----------------------------------------------------------------------
	// Ordered-Map Views
	// -----------------------------------------------------------------------

	/// A forward view over every key.
	pub fn view(&self) -> View<'_, F, B> {
		View::new(self, Range::OPEN, Direction::Forward)
	}

	/// A forward view over the keys in `bounds`.
	pub fn range<R: RangeBounds<i64>>(&self, bounds: R) -> View<'_, F, B> {
		View::new(self, Range::from_bounds(bounds), Direction::Forward)
	}

	pub fn iter(&self) -> iter::Iter<'_, F::Node> {
		self.view().iter()
	}

	pub fn keys(&self) -> iter::Keys<'_, F::Node> {
		self.view().keys()
	}

	pub fn first(&self) -> Option<NodeRef<'_, F::Node>> {
		self.view().first()
	}

	pub fn last(&self) -> Option<NodeRef<'_, F::Node>> {
		self.view().last()
	}

	/// The node with the largest key `<= key`.
	pub fn floor(&self, key: i64) -> Option<NodeRef<'_, F::Node>> {
		self.view().floor(key)
	}

	/// The node with the largest key `< key`.
	pub fn lower(&self, key: i64) -> Option<NodeRef<'_, F::Node>> {
		self.view().lower(key)
	}

	/// The node with the smallest key `>= key`.
	pub fn ceiling(&self, key: i64) -> Option<NodeRef<'_, F::Node>> {
		self.view().ceiling(key)
	}

	/// The node with the smallest key `> key`.
	pub fn higher(&self, key: i64) -> Option<NodeRef<'_, F::Node>> {
		self.view().higher(key)
	}
}

impl<'t, F: NodeFactory, B: Balance> IntoIterator for &'t GenericTree<F, B> {
	type Item = NodeRef<'t, F::Node>;
	type IntoIter = iter::Iter<'t, F::Node>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<F: NodeFactory, B: Balance> fmt::Debug for GenericTree<F, B> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.keys()).finish()
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<F: NodeFactory, B: Balance> GenericTree<F, B> {
	/// Validates all tree invariants. Panics with diagnostic info if any invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Key ordering: left subtree keys < node key < right subtree keys
	/// 2. Height cache: every cached height equals `1 + max(child heights)`
	/// 3. Balance: `|height(right) - height(left)| <= 1` (balanced strategies only)
	/// 4. Parent links: every child points back at its parent, the root at nothing
	/// 5. Length: the arena holds exactly the reachable nodes
	pub fn assert_invariants(&self) {
		let Some(root) = self.root else {
			assert_eq!(self.nodes.len(), 0, "empty tree still holds {} nodes", self.nodes.len());
			return;
		};
		assert_eq!(self.nodes.parent(root), None, "root {} has a parent", root);
		let (count, _) = self.validate_subtree(root, None, None);
		assert_eq!(count, self.nodes.len(), "reachable nodes != arena length");
	}

	/// Validates the subtree at `id` against exclusive key bounds and returns
	/// its node count and height.
	fn validate_subtree(&self, id: NodeId, lower: Option<i64>, upper: Option<i64>) -> (usize, i32) {
		let key = self.nodes.key(id);
		if let Some(lower) = lower {
			assert!(key > lower, "key {} not greater than lower bound {}", key, lower);
		}
		if let Some(upper) = upper {
			assert!(key < upper, "key {} not less than upper bound {}", key, upper);
		}

		let mut count = 1;
		let mut heights = [-1, -1];
		for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
			let Some(child) = self.nodes.child(id, side) else {
				continue;
			};
			assert_eq!(
				self.nodes.parent(child),
				Some(id),
				"child {} (key {}) does not point back at {} (key {})",
				child,
				self.nodes.key(child),
				id,
				key
			);
			let (child_lower, child_upper) = match side {
				Side::Left => (lower, Some(key)),
				Side::Right => (Some(key), upper),
			};
			let (child_count, child_height) = self.validate_subtree(child, child_lower, child_upper);
			count += child_count;
			heights[slot] = child_height;
		}

		let height = 1 + heights[0].max(heights[1]);
		assert_eq!(
			self.nodes.height_of(Some(id)),
			height,
			"stale height cache at key {}",
			key
		);
		if B::BALANCED {
			let balance = heights[1] - heights[0];
			assert!(balance.abs() <= 1, "key {} out of balance: {}", key, balance);
		}
		(count, height)
	}
}
