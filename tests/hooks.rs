//! # Node Factory and Hook Tests
//!
//! A custom node type carrying a payload, built by a custom factory, must
//! flow through every tree operation unchanged, and `on_delete` must fire
//! exactly once for every node that leaves the tree.

use std::cell::Cell;
use std::rc::Rc;

use ordtree::{GenericTree, Links, Node, NodeFactory, Unbalanced};

// ===========================================================================
// Counting Node
// ===========================================================================

#[derive(Debug)]
struct TaggedNode {
	key: i64,
	links: Links,
	payload: String,
	deletes: Rc<Cell<usize>>,
	released: bool,
	nil: bool,
}

impl Node for TaggedNode {
	fn key(&self) -> i64 {
		self.key
	}

	fn links(&self) -> &Links {
		&self.links
	}

	fn links_mut(&mut self) -> &mut Links {
		&mut self.links
	}

	fn is_nil(&self) -> bool {
		self.nil
	}

	fn on_delete(&mut self) {
		assert!(!self.released, "on_delete called twice for {}", self.key);
		self.released = true;
		self.deletes.set(self.deletes.get() + 1);
	}

	fn copy_auxiliary_state_from(&mut self, source: &Self) {
		self.payload = source.payload.clone();
	}
}

#[derive(Debug, Clone, Default)]
struct TaggedFactory {
	created: Rc<Cell<usize>>,
	deletes: Rc<Cell<usize>>,
}

impl NodeFactory for TaggedFactory {
	type Node = TaggedNode;

	fn create_node(&self, key: i64) -> TaggedNode {
		self.created.set(self.created.get() + 1);
		TaggedNode {
			key,
			links: Links::default(),
			payload: format!("node-{}", key),
			deletes: Rc::clone(&self.deletes),
			released: false,
			nil: false,
		}
	}

	fn nil_node(&self) -> TaggedNode {
		TaggedNode {
			key: 0,
			links: Links::default(),
			payload: String::new(),
			deletes: Rc::clone(&self.deletes),
			released: false,
			nil: true,
		}
	}
}

type TaggedTree = GenericTree<TaggedFactory>;

fn tagged_tree(keys: &[i64]) -> (TaggedTree, TaggedFactory) {
	let factory = TaggedFactory::default();
	let mut tree = TaggedTree::with_factory(factory.clone());
	for &key in keys {
		tree.insert(key).unwrap();
	}
	(tree, factory)
}

// ===========================================================================
// Factory Tests
// ===========================================================================

#[test]
fn payload_travels_with_node() {
	let (tree, _) = tagged_tree(&[5, 2, 8, 1, 9]);
	tree.assert_invariants();
	assert_eq!(tree.search(8).map(|n| n.payload.clone()), Some("node-8".to_string()));
	let payloads: Vec<String> = tree.range(2..=8).iter().map(|n| n.payload.clone()).collect();
	assert_eq!(payloads, vec!["node-2", "node-5", "node-8"]);
}

#[test]
fn duplicate_insert_does_not_call_factory() {
	let (mut tree, factory) = tagged_tree(&[1, 2, 3]);
	assert_eq!(factory.created.get(), 3);
	assert!(tree.insert(2).is_err());
	assert_eq!(factory.created.get(), 3);
}

#[test]
fn nil_node_never_enters_the_tree() {
	let (tree, factory) = tagged_tree(&[3, 1, 2]);
	assert!(factory.nil_node().is_nil());
	assert_eq!(factory.created.get(), 3);
	assert!(tree.iter().all(|node| !node.is_nil()));
}

// ===========================================================================
// Deletion Hook Tests
// ===========================================================================

#[test]
fn on_delete_fires_once_per_removed_node() {
	let (mut tree, factory) = tagged_tree(&[50, 20, 80, 10, 30, 70, 90, 60]);

	// Leaf, one child, two children with near and deep successor
	for key in [10, 70, 50, 80] {
		let node = tree.delete(key).unwrap();
		assert_eq!(node.key, key);
		assert_eq!(node.payload, format!("node-{}", key));
		assert!(node.released);
		assert_eq!(node.links, Links::default());
		tree.assert_invariants();
	}
	assert_eq!(factory.deletes.get(), 4);

	assert!(tree.delete(999).is_none());
	assert_eq!(factory.deletes.get(), 4);
}

#[test]
fn survivors_keep_their_payload_after_two_child_delete() {
	let (mut tree, _) = tagged_tree(&[4, 2, 6, 1, 3, 5, 7]);
	tree.delete(4).unwrap();
	for key in [1, 2, 3, 5, 6, 7] {
		let node = tree.search(key).unwrap();
		assert_eq!(node.payload, format!("node-{}", key));
		assert!(!node.released);
	}
}

#[test]
fn pop_and_clear_fire_hooks() {
	let (mut tree, factory) = tagged_tree(&[3, 1, 2, 5, 4]);
	tree.pop_first().unwrap();
	tree.pop_last().unwrap();
	assert_eq!(factory.deletes.get(), 2);

	tree.clear();
	assert_eq!(factory.deletes.get(), 5);
	assert!(tree.is_empty());
}

#[test]
fn unbalanced_tree_with_custom_factory() {
	let factory = TaggedFactory::default();
	let mut tree: GenericTree<TaggedFactory, Unbalanced> = GenericTree::with_factory(factory.clone());
	for key in 1..=6 {
		tree.insert(key).unwrap();
	}
	tree.assert_invariants();
	assert_eq!(tree.height(), 5);
	tree.delete(3).unwrap();
	assert_eq!(factory.deletes.get(), 1);
	assert_eq!(tree.keys().collect::<Vec<_>>(), vec![1, 2, 4, 5, 6]);
}

// ===========================================================================
// Auxiliary State Tests
// ===========================================================================

#[test]
fn copy_auxiliary_state_leaves_structure_alone() {
	let factory = TaggedFactory::default();
	let mut target = factory.create_node(1);
	let source = factory.create_node(2);

	target.copy_auxiliary_state_from(&source);
	assert_eq!(target.payload, "node-2");
	assert_eq!(target.key, 1);
	assert_eq!(target.links, Links::default());
}
