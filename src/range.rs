//! Key ranges and the per-node traversal decisions derived from them.
//!
//! A [`Range`] is an optional lower and an optional upper bound, each
//! inclusive or exclusive. During traversal the range answers three
//! questions for every node it meets:
//!
//! - **descend left**: can the left subtree still hold a key in range?
//! - **descend right**: can the right subtree still hold a key in range?
//! - **visit**: is this node's own key in range?
//!
//! Keys are integers, so an exclusive bound is equivalent to an inclusive
//! bound one step inwards. The range converts both bounds once, at
//! construction, into fixed thresholds:
//!
//! ```text
//!              visit threshold     descend threshold
//! start ≥ b    b                   b + 1   (left subtree keys < node key)
//! start > b    b + 1               b + 2
//! end   ≤ b    b                   b - 1   (right subtree keys > node key)
//! end   < b    b - 1               b - 2
//! ```
//!
//! so each decision is a single comparison. Thresholds are kept as `i128`
//! so that bounds at `i64::MIN` / `i64::MAX` never wrap.

use std::fmt;
use std::ops::{Bound, RangeBounds};

/// The precomputed shape of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
	Open,
	OpenStart {
		visit_upper: i128,
		descend_upper: i128,
	},
	OpenEnd {
		visit_lower: i128,
		descend_lower: i128,
	},
	Closed {
		visit_lower: i128,
		descend_lower: i128,
		visit_upper: i128,
		descend_upper: i128,
	},
}

/// An immutable range of `i64` keys.
///
/// ```
/// use std::ops::Bound;
/// use ordtree::Range;
///
/// let range = Range::new(Bound::Included(5), Bound::Excluded(13));
/// assert!(range.contains(5));
/// assert!(!range.contains(13));
///
/// // Narrowing never widens
/// let narrowed = range.narrow(&Range::from_bounds(..=20));
/// assert_eq!(narrowed, range);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Range {
	start: Bound<i64>,
	end: Bound<i64>,
	decision: Decision,
}

impl Default for Range {
	fn default() -> Self {
		Range::OPEN
	}
}

const fn lower_thresholds(start: Bound<i64>) -> Option<(i128, i128)> {
	match start {
		Bound::Included(key) => Some((key as i128, key as i128 + 1)),
		Bound::Excluded(key) => Some((key as i128 + 1, key as i128 + 2)),
		Bound::Unbounded => None,
	}
}

const fn upper_thresholds(end: Bound<i64>) -> Option<(i128, i128)> {
	match end {
		Bound::Included(key) => Some((key as i128, key as i128 - 1)),
		Bound::Excluded(key) => Some((key as i128 - 1, key as i128 - 2)),
		Bound::Unbounded => None,
	}
}

impl Range {
	/// The unbounded range.
	pub const OPEN: Range = Range::new(Bound::Unbounded, Bound::Unbounded);

	pub const fn new(start: Bound<i64>, end: Bound<i64>) -> Range {
		let decision = match (lower_thresholds(start), upper_thresholds(end)) {
			(None, None) => Decision::Open,
			(None, Some((visit_upper, descend_upper))) => Decision::OpenStart {
				visit_upper,
				descend_upper,
			},
			(Some((visit_lower, descend_lower)), None) => Decision::OpenEnd {
				visit_lower,
				descend_lower,
			},
			(Some((visit_lower, descend_lower)), Some((visit_upper, descend_upper))) => {
				Decision::Closed {
					visit_lower,
					descend_lower,
					visit_upper,
					descend_upper,
				}
			}
		};
		Range {
			start,
			end,
			decision,
		}
	}

	/// Builds a range from any standard range expression: `5..13`, `..=7`,
	/// `(Bound::Excluded(2), Bound::Unbounded)`, ...
	pub fn from_bounds<R: RangeBounds<i64>>(bounds: R) -> Range {
		Range::new(bounds.start_bound().cloned(), bounds.end_bound().cloned())
	}

	/// `[start, end]` or `(start, end)` etc., with explicit inclusivity flags.
	pub fn closed(start: i64, start_inclusive: bool, end: i64, end_inclusive: bool) -> Range {
		Range::new(bound(start, start_inclusive), bound(end, end_inclusive))
	}

	#[inline]
	pub fn start(&self) -> Bound<i64> {
		self.start
	}

	#[inline]
	pub fn end(&self) -> Bound<i64> {
		self.end
	}

	#[inline]
	pub fn is_open(&self) -> bool {
		matches!(self.decision, Decision::Open)
	}

	/// Whether the left subtree of a node with `key` may contain keys in range.
	#[inline]
	pub fn descend_left(&self, key: i64) -> bool {
		match self.decision {
			Decision::Open | Decision::OpenStart {
				..
			} => true,
			Decision::OpenEnd {
				descend_lower,
				..
			}
			| Decision::Closed {
				descend_lower,
				..
			} => descend_lower <= key as i128,
		}
	}

	/// Whether the right subtree of a node with `key` may contain keys in range.
	#[inline]
	pub fn descend_right(&self, key: i64) -> bool {
		match self.decision {
			Decision::Open | Decision::OpenEnd {
				..
			} => true,
			Decision::OpenStart {
				descend_upper,
				..
			}
			| Decision::Closed {
				descend_upper,
				..
			} => key as i128 <= descend_upper,
		}
	}

	/// Whether `key` itself lies in the range (the visit decision).
	#[inline]
	pub fn contains(&self, key: i64) -> bool {
		let key = key as i128;
		match self.decision {
			Decision::Open => true,
			Decision::OpenStart {
				visit_upper,
				..
			} => key <= visit_upper,
			Decision::OpenEnd {
				visit_lower,
				..
			} => visit_lower <= key,
			Decision::Closed {
				visit_lower,
				visit_upper,
				..
			} => visit_lower <= key && key <= visit_upper,
		}
	}

	/// Intersects this range with `sub`, giving the tightest range that
	/// satisfies both.
	///
	/// Each side is resolved independently: an unbounded side yields the
	/// other range's bound, otherwise the numerically tighter bound wins and,
	/// at equal keys, the exclusive one.
	pub fn narrow(&self, sub: &Range) -> Range {
		Range::new(tighter(self.start, sub.start, true), tighter(self.end, sub.end, false))
	}

	/// Shorthand for `self.narrow(&Range::from_bounds(bounds))`.
	pub fn narrow_to<R: RangeBounds<i64>>(&self, bounds: R) -> Range {
		self.narrow(&Range::from_bounds(bounds))
	}
}

#[inline]
fn bound(key: i64, inclusive: bool) -> Bound<i64> {
	if inclusive {
		Bound::Included(key)
	} else {
		Bound::Excluded(key)
	}
}

/// Picks the tighter of two bounds on the same side.
fn tighter(ours: Bound<i64>, theirs: Bound<i64>, lower: bool) -> Bound<i64> {
	let (ours_key, ours_exclusive) = match ours {
		Bound::Unbounded => return theirs,
		Bound::Included(key) => (key, false),
		Bound::Excluded(key) => (key, true),
	};
	let (theirs_key, theirs_exclusive) = match theirs {
		Bound::Unbounded => return ours,
		Bound::Included(key) => (key, false),
		Bound::Excluded(key) => (key, true),
	};

	if ours_key == theirs_key {
		return bound(ours_key, !(ours_exclusive || theirs_exclusive));
	}
	let ours_wins = if lower {
		ours_key > theirs_key
	} else {
		ours_key < theirs_key
	};
	if ours_wins {
		ours
	} else {
		theirs
	}
}

impl RangeBounds<i64> for Range {
	fn start_bound(&self) -> Bound<&i64> {
		self.start.as_ref()
	}

	fn end_bound(&self) -> Bound<&i64> {
		self.end.as_ref()
	}
}

impl fmt::Debug for Range {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl fmt::Display for Range {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.start {
			Bound::Included(key) => write!(f, "[{}", key)?,
			Bound::Excluded(key) => write!(f, "({}", key)?,
			Bound::Unbounded => f.write_str("(-inf")?,
		}
		f.write_str(", ")?;
		match self.end {
			Bound::Included(key) => write!(f, "{}]", key),
			Bound::Excluded(key) => write!(f, "{})", key),
			Bound::Unbounded => f.write_str("+inf)"),
		}
	}
}
