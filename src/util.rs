//! Test utilities for loading sample trees from JSON fixtures
//!
//! A fixture is a scripted workload plus the shape it must produce:
//!
//! ```json
//! {
//!   "config": { "initial_capacity": 16 },
//!   "insert": [3, 1, 13, 5],
//!   "delete": [1],
//!   "expect": { "in_order": [3, 5, 13], "pre_order": [5, 3, 13], "height": 1 }
//! }
//! ```
//!
//! Every field except `insert` may be omitted.
use crate::{Order, Range, Tree, TreeConfig};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Expectation {
	pub in_order: Option<Vec<i64>>,
	pub pre_order: Option<Vec<i64>>,
	pub post_order: Option<Vec<i64>>,
	pub height: Option<i32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Fixture {
	#[serde(default)]
	pub config: TreeConfig,
	pub insert: Vec<i64>,
	#[serde(default)]
	pub delete: Vec<i64>,
	#[serde(default)]
	pub expect: Expectation,
}

impl Fixture {
	/// Runs the inserts, then the deletes, on a fresh AVL tree.
	///
	/// Panics on a duplicate insert or a delete of an absent key, since either
	/// means the fixture itself is wrong.
	pub fn build(&self) -> Tree {
		let mut tree = Tree::with_config(Default::default(), self.config.clone());
		for &key in &self.insert {
			tree.insert(key).unwrap_or_else(|err| panic!("fixture insert failed: {}", err));
		}
		for &key in &self.delete {
			assert!(tree.delete(key).is_some(), "fixture deletes absent key {}", key);
		}
		tree
	}

	/// Checks every expectation the fixture states against `tree`.
	pub fn verify(&self, tree: &Tree) {
		let expect = &self.expect;
		if let Some(keys) = &expect.in_order {
			assert_eq!(&keys_in_order(tree, Order::InOrder), keys, "in-order mismatch");
		}
		if let Some(keys) = &expect.pre_order {
			assert_eq!(&keys_in_order(tree, Order::PreOrder), keys, "pre-order mismatch");
		}
		if let Some(keys) = &expect.post_order {
			assert_eq!(&keys_in_order(tree, Order::PostOrder), keys, "post-order mismatch");
		}
		if let Some(height) = expect.height {
			assert_eq!(tree.height(), height, "height mismatch");
		}
	}
}

/// Collects every key of `tree` in `order`.
pub fn keys_in_order(tree: &Tree, order: Order) -> Vec<i64> {
	let mut ctx = crate::TraversalContext::new(Range::OPEN, Vec::new());
	tree.traverse(&crate::traversal::Iterative, order, &mut ctx, |ctx, node| {
		ctx.result_mut().push(node.key())
	});
	ctx.into_result()
}

pub fn load_fixture<P: AsRef<std::path::Path>>(path: P) -> Fixture {
	let file = std::fs::File::open(path).expect("failed to find file");
	serde_json::from_reader(file).expect("malformed fixture")
}

pub fn sample_tree<P: AsRef<std::path::Path>>(path: P) -> Tree {
	load_fixture(path).build()
}
