//! Edge identity and per-edge matching state
//!
//! An [`Edge`] is an unordered pair of distinct vertices, stored in
//! ascending order so that `(a, b)` and `(b, a)` are the same value.
//! [`EdgeState`] is the two-state machine every edge moves through, and
//! [`LineStyle`] is how a renderer draws each state.

use std::fmt;

use serde::Serialize;

/// An undirected edge, normalized so that `lo() <= hi()`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge<V> {
    lo: V,
    hi: V,
}

impl<V: Ord> Edge<V> {
    /// Build the canonical edge between `u` and `v`, in either order
    pub fn new(u: V, v: V) -> Self {
        if u <= v {
            Self { lo: u, hi: v }
        } else {
            Self { lo: v, hi: u }
        }
    }

    /// Smaller endpoint
    pub fn lo(&self) -> &V {
        &self.lo
    }

    /// Larger endpoint
    pub fn hi(&self) -> &V {
        &self.hi
    }

    /// Whether `v` is one of the two endpoints
    pub fn touches(&self, v: &V) -> bool {
        &self.lo == v || &self.hi == v
    }

    /// Both endpoints, smaller first
    pub fn endpoints(&self) -> (&V, &V) {
        (&self.lo, &self.hi)
    }

    /// Whether both endpoints are the same vertex
    pub fn is_loop(&self) -> bool {
        self.lo == self.hi
    }
}

impl<V: fmt::Display> fmt::Display for Edge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Matching membership of a single edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    /// Not part of the matching (every edge starts here)
    #[default]
    Unmatched,
    /// Part of the matching
    Matched,
}

impl EdgeState {
    /// The other state
    pub fn flipped(self) -> Self {
        match self {
            EdgeState::Unmatched => EdgeState::Matched,
            EdgeState::Matched => EdgeState::Unmatched,
        }
    }

    /// How an edge in this state is drawn
    pub fn line_style(self) -> LineStyle {
        match self {
            EdgeState::Unmatched => LineStyle::Dashed,
            EdgeState::Matched => LineStyle::Solid,
        }
    }

    pub fn from_matched(matched: bool) -> Self {
        if matched {
            EdgeState::Matched
        } else {
            EdgeState::Unmatched
        }
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeState::Unmatched => write!(f, "unmatched"),
            EdgeState::Matched => write!(f, "matched"),
        }
    }
}

/// Line style used to draw an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Unmatched edge
    Dashed,
    /// Matched edge
    Solid,
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStyle::Dashed => write!(f, "dashed"),
            LineStyle::Solid => write!(f, "solid"),
        }
    }
}

/// A change of drawn style that a renderer has to animate
///
/// `Dashed -> Solid` grows a solid line from the edge's center;
/// `Solid -> Dashed` shrinks the solid line away over a dashed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleTransition<V> {
    pub edge: Edge<V>,
    pub from: LineStyle,
    pub to: LineStyle,
}

impl<V: fmt::Display> fmt::Display for StyleTransition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.edge, self.from, self.to)
    }
}
