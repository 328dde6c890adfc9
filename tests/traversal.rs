//! # Traversal Engine Equivalence Tests
//!
//! The recursive, iterative and stepping engines must agree node for node
//! on every order and every range. These tests drive all three over the same
//! trees and compare.

use std::ops::Bound;

use ordtree::traversal::{Iterative, Recursive, Stepping};
use ordtree::{DepthFirstTraversal, Order, Range, TraversalContext, Tree};
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng as _;

const ORDERS: [Order; 4] = [Order::PreOrder, Order::PostOrder, Order::InOrder, Order::ReverseInOrder];

fn sample() -> Tree {
	Tree::from_keys([3, 1, 13, 5, 6, 10, 11, 16, 15, 9, 4, 2]).unwrap()
}

fn collect<E: DepthFirstTraversal>(engine: &E, tree: &Tree, order: Order, range: Range) -> Vec<i64> {
	let mut ctx = TraversalContext::new(range, Vec::new());
	tree.traverse(engine, order, &mut ctx, |ctx, node| ctx.result_mut().push(node.key()));
	ctx.into_result()
}

fn step_all(tree: &Tree, order: Order, range: Range) -> Vec<i64> {
	let mut stepping = tree.stepping(order, range);
	let mut keys = Vec::new();
	while let Some(id) = stepping.advance(tree.arena()) {
		keys.push(tree.arena().key(id));
	}
	keys
}

// ===========================================================================
// Fixed Sample Tests
// ===========================================================================

#[test]
fn sample_orders_on_every_engine() {
	let tree = sample();
	let expected = [
		(Order::PreOrder, vec![6, 3, 1, 2, 5, 4, 11, 10, 9, 15, 13, 16]),
		(Order::PostOrder, vec![2, 1, 4, 5, 3, 9, 10, 13, 16, 15, 11, 6]),
		(Order::InOrder, vec![1, 2, 3, 4, 5, 6, 9, 10, 11, 13, 15, 16]),
		(Order::ReverseInOrder, vec![16, 15, 13, 11, 10, 9, 6, 5, 4, 3, 2, 1]),
	];
	for (order, keys) in expected {
		assert_eq!(collect(&Recursive, &tree, order, Range::OPEN), keys, "recursive {:?}", order);
		assert_eq!(collect(&Iterative, &tree, order, Range::OPEN), keys, "iterative {:?}", order);
		assert_eq!(collect(&Stepping, &tree, order, Range::OPEN), keys, "stepping {:?}", order);
		assert_eq!(step_all(&tree, order, Range::OPEN), keys, "stepping context {:?}", order);
	}
}

#[test]
fn sample_ranges_on_every_engine() {
	let tree = sample();
	let cases = [
		(Range::closed(5, true, 13, true), vec![5, 6, 9, 10, 11, 13]),
		(Range::closed(5, false, 13, false), vec![6, 9, 10, 11]),
		(Range::from_bounds(..=13), vec![1, 2, 3, 4, 5, 6, 9, 10, 11, 13]),
		(Range::from_bounds(..13), vec![1, 2, 3, 4, 5, 6, 9, 10, 11]),
		(Range::from_bounds(5..), vec![5, 6, 9, 10, 11, 13, 15, 16]),
		(Range::new(Bound::Excluded(5), Bound::Unbounded), vec![6, 9, 10, 11, 13, 15, 16]),
	];
	for (range, keys) in cases {
		assert_eq!(collect(&Recursive, &tree, Order::InOrder, range), keys, "{}", range);
		assert_eq!(collect(&Iterative, &tree, Order::InOrder, range), keys, "{}", range);
		assert_eq!(collect(&Stepping, &tree, Order::InOrder, range), keys, "{}", range);
	}
}

#[test]
fn stop_is_honoured_by_every_engine() {
	let tree = sample();
	for order in ORDERS {
		let mut expected = collect(&Recursive, &tree, order, Range::OPEN);
		expected.truncate(4);
		for engine in 0..3 {
			let mut ctx = TraversalContext::new(Range::OPEN, Vec::new());
			let visitor = |ctx: &mut TraversalContext<Vec<i64>>, node: ordtree::NodeRef<'_, ordtree::PlainNode>| {
				ctx.result_mut().push(node.key());
				if ctx.result().len() == 4 {
					ctx.stop();
				}
			};
			match engine {
				0 => tree.traverse(&Recursive, order, &mut ctx, visitor),
				1 => tree.traverse(&Iterative, order, &mut ctx, visitor),
				_ => tree.traverse(&Stepping, order, &mut ctx, visitor),
			}
			assert_eq!(ctx.into_result(), expected, "engine {} {:?}", engine, order);
		}
	}
}

// ===========================================================================
// Stepping Tests
// ===========================================================================

#[test]
fn abandoned_stepping_does_not_affect_another() {
	let tree = sample();
	let mut abandoned = tree.stepping(Order::InOrder, Range::OPEN);
	for _ in 0..5 {
		abandoned.advance(tree.arena());
	}
	assert!(!abandoned.is_finished());
	drop(abandoned);

	let eager = collect(&Iterative, &tree, Order::InOrder, Range::OPEN);
	assert_eq!(step_all(&tree, Order::InOrder, Range::OPEN), eager);
}

#[test]
fn interleaved_stepping_contexts() {
	let tree = sample();
	let mut forward = tree.stepping(Order::InOrder, Range::OPEN);
	let mut backward = tree.stepping(Order::ReverseInOrder, Range::OPEN);
	let mut pairs = Vec::new();
	while let (Some(a), Some(b)) = (forward.advance(tree.arena()), backward.advance(tree.arena())) {
		pairs.push((tree.arena().key(a), tree.arena().key(b)));
	}
	assert_eq!(pairs.len(), 12);
	assert_eq!(pairs[0], (1, 16));
	assert_eq!(pairs[11], (16, 1));
}

#[test]
fn random_trees_agree_element_by_element() {
	let mut rng = rand::rng();
	for _ in 0..20 {
		let mut keys: Vec<i64> = (0..200).map(|k| k * 3).collect();
		keys.shuffle(&mut rng);
		keys.truncate(rng.random_range(0..200));
		let tree = Tree::from_keys(keys).unwrap();

		let lo = rng.random_range(-10..600);
		let hi = rng.random_range(-10..600);
		let range = Range::closed(lo, rng.random_bool(0.5), hi, rng.random_bool(0.5));

		for order in ORDERS {
			let eager = collect(&Iterative, &tree, order, range);
			let mut stepping = tree.stepping(order, range);
			for (i, key) in eager.iter().enumerate() {
				let id = stepping.advance(tree.arena()).expect("stepping ended early");
				assert_eq!(tree.arena().key(id), *key, "{:?} {} at {}", order, range, i);
			}
			assert_eq!(stepping.advance(tree.arena()), None);
			assert_eq!(collect(&Recursive, &tree, order, range), eager);
		}
	}
}

// ===========================================================================
// Property Tests
// ===========================================================================

proptest! {
	#[test]
	fn engines_agree(
		keys in prop::collection::btree_set(-500i64..500, 0..200),
		lo in -600i64..600,
		hi in -600i64..600,
		lo_inclusive in any::<bool>(),
		hi_inclusive in any::<bool>(),
		open_start in any::<bool>(),
	) {
		let tree = Tree::from_keys(keys.iter().copied()).unwrap();
		let start = match (open_start, lo_inclusive) {
			(true, _) => Bound::Unbounded,
			(false, true) => Bound::Included(lo),
			(false, false) => Bound::Excluded(lo),
		};
		let end = if hi_inclusive { Bound::Included(hi) } else { Bound::Excluded(hi) };
		let range = Range::new(start, end);

		let in_range: Vec<i64> = keys.iter().copied().filter(|k| range.contains(*k)).collect();
		for order in ORDERS {
			let recursive = collect(&Recursive, &tree, order, range);
			prop_assert_eq!(&collect(&Iterative, &tree, order, range), &recursive);
			prop_assert_eq!(&collect(&Stepping, &tree, order, range), &recursive);
			let mut sorted = recursive.clone();
			sorted.sort_unstable();
			prop_assert_eq!(&sorted, &in_range);
		}
	}
}
