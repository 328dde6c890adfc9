//! The affected path of a mutation.
//!
//! Insert and delete record every node they touch on the way down, together
//! with the side of its parent it hangs from. Once the structural edit is
//! done the balancer consumes the path deepest-first to recompute heights and
//! rotate, rewiring each parent slot through the recorded side.

use smallvec::SmallVec;

use crate::node::NodeId;

/// Inline capacity of a path. An AVL tree of a billion nodes is at most ~43
/// levels deep, so paths stay inline well below 64 levels.
const PATH_CAPACITY: usize = 64;

/// Which child slot of its parent a node occupies.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Side {
	Left,
	Right,
}

impl Side {
	#[inline]
	pub fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

/// One step of a path: a node and the side of its parent it sits on.
///
/// The side of the first element (the root position) is never read.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct PathElement {
	pub side: Side,
	pub node: NodeId,
}

/// Ordered list of the nodes touched by a mutation, root first.
#[derive(Debug, Default, Clone)]
pub struct Path {
	elements: SmallVec<[PathElement; PATH_CAPACITY]>,
}

impl Path {
	pub fn new() -> Path {
		Path::default()
	}

	#[inline]
	pub fn push(&mut self, side: Side, node: NodeId) {
		self.elements.push(PathElement {
			side,
			node,
		});
	}

	pub fn extend<I: IntoIterator<Item = PathElement>>(&mut self, elements: I) {
		self.elements.extend(elements);
	}

	/// Elements from the root downwards.
	pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
		self.elements.iter()
	}

	/// The deepest recorded element.
	pub fn last(&self) -> Option<&PathElement> {
		self.elements.last()
	}
}

impl<'a> IntoIterator for &'a Path {
	type Item = &'a PathElement;
	type IntoIter = std::slice::Iter<'a, PathElement>;

	fn into_iter(self) -> Self::IntoIter {
		self.elements.iter()
	}
}
