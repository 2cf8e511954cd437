//! Matching-state graph model
//!
//! [`MatchingGraph`] tracks a vertex set, an edge set over it, and the subset
//! of edges that currently form the matching. It is the state a lecture
//! scene mutates between animated transitions:
//!
//! - `add_edge` grows the edge set (duplicates are ignored)
//! - `set_matched` / `set_unmatched` move one edge between the two states
//! - `toggle_path` flips every edge along a path, which is how an augmenting
//!   path is applied
//! - `sync_styles` reports which edges changed drawn style since the last
//!   call, so a renderer knows what to animate
//!
//! The graph-theoretic matching invariant (every vertex covered at most once)
//! is not enforced. Slides routinely show edge sets that are not matchings;
//! use [`MatchingGraph::matching_conflicts`] to find out.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::edge::{Edge, EdgeState, LineStyle, StyleTransition};
use crate::layout::{Position, Vertex};

/// Errors raised by graph mutations
///
/// All of these are scripting mistakes in the caller, never runtime
/// conditions; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("Self-loop on vertex {0} is not an edge")]
    SelfLoop(String),

    #[error("Not an edge: {0}")]
    NotAnEdge(String),

    #[error("Edge {0} is already matched")]
    AlreadyMatched(String),

    #[error("Edge {0} is not matched")]
    NotMatched(String),
}

/// A graph whose edges are each either matched or unmatched
#[derive(Debug, Clone)]
pub struct MatchingGraph<V> {
    pub(crate) vertices: BTreeMap<V, Vertex>,
    edges: BTreeSet<Edge<V>>,
    matching: BTreeSet<Edge<V>>,
    /// Style each edge was last reported with by `sync_styles`
    rendered: BTreeMap<Edge<V>, LineStyle>,
}

impl<V> Default for MatchingGraph<V> {
    fn default() -> Self {
        Self {
            vertices: BTreeMap::new(),
            edges: BTreeSet::new(),
            matching: BTreeSet::new(),
            rendered: BTreeMap::new(),
        }
    }
}

impl<V: Ord + Clone + fmt::Display> MatchingGraph<V> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph over a fixed set of positioned vertices
    pub fn with_vertices<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (V, Position)>,
    {
        let mut graph = Self::new();
        for (label, position) in points {
            graph.add_vertex(label, position);
        }
        graph
    }

    // ------------------------------------------------------------------
    // Vertices
    // ------------------------------------------------------------------

    /// Add a visible vertex, replacing the position of an existing label
    pub fn add_vertex(&mut self, label: V, position: Position) {
        self.vertices.insert(label, Vertex::visible(position));
    }

    /// Add a vertex that takes part in edges but is drawn with zero radius
    pub fn add_hidden_vertex(&mut self, label: V, position: Position) {
        self.vertices.insert(label, Vertex::hidden(position));
    }

    pub fn contains_vertex(&self, label: &V) -> bool {
        self.vertices.contains_key(label)
    }

    /// Vertex labels in ascending order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn require_vertex(&self, label: &V) -> Result<(), GraphError> {
        if self.vertices.contains_key(label) {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex(label.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Insert the edge between `u` and `v`
    ///
    /// Returns `Ok(false)` when the edge was already present. A new edge is
    /// unmatched and counts as already drawn dashed.
    pub fn add_edge(&mut self, u: V, v: V) -> Result<bool, GraphError> {
        self.require_vertex(&u)?;
        self.require_vertex(&v)?;
        let edge = Edge::new(u, v);
        if edge.is_loop() {
            return Err(GraphError::SelfLoop(edge.lo().to_string()));
        }

        if !self.edges.insert(edge.clone()) {
            trace!(edge = %edge, "edge already present");
            return Ok(false);
        }

        debug!(edge = %edge, "edge added");
        self.rendered.insert(edge, EdgeState::Unmatched.line_style());
        Ok(true)
    }

    /// Remove an edge, dropping it from the matching as well
    pub fn remove_edge(&mut self, u: V, v: V) -> Result<(), GraphError> {
        let edge = self.require_edge(u, v)?;
        self.edges.remove(&edge);
        self.matching.remove(&edge);
        self.rendered.remove(&edge);
        debug!(edge = %edge, "edge removed");
        Ok(())
    }

    pub fn has_edge(&self, u: V, v: V) -> bool {
        self.edges.contains(&Edge::new(u, v))
    }

    /// All edges in canonical order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<V>> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn require_edge(&self, u: V, v: V) -> Result<Edge<V>, GraphError> {
        let edge = Edge::new(u, v);
        if self.edges.contains(&edge) {
            Ok(edge)
        } else {
            Err(GraphError::NotAnEdge(edge.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Matching state
    // ------------------------------------------------------------------

    /// Put the edge between `u` and `v` into the matching
    pub fn set_matched(&mut self, u: V, v: V) -> Result<(), GraphError> {
        let edge = self.require_edge(u, v)?;
        if self.matching.contains(&edge) {
            return Err(GraphError::AlreadyMatched(edge.to_string()));
        }
        debug!(edge = %edge, "edge matched");
        self.matching.insert(edge);
        Ok(())
    }

    /// Take the edge between `u` and `v` out of the matching
    pub fn set_unmatched(&mut self, u: V, v: V) -> Result<(), GraphError> {
        let edge = self.require_edge(u, v)?;
        if !self.matching.remove(&edge) {
            return Err(GraphError::NotMatched(edge.to_string()));
        }
        debug!(edge = %edge, "edge unmatched");
        Ok(())
    }

    /// Whether the edge between `u` and `v` is matched
    ///
    /// Pairs that are not edges at all report `false`; use
    /// [`edge_state`](Self::edge_state) to tell the two apart.
    pub fn is_matched(&self, u: V, v: V) -> bool {
        self.matching.contains(&Edge::new(u, v))
    }

    /// State of the edge between `u` and `v`, or `None` if it is not an edge
    pub fn edge_state(&self, u: V, v: V) -> Option<EdgeState> {
        let edge = Edge::new(u, v);
        self.edges
            .contains(&edge)
            .then(|| EdgeState::from_matched(self.matching.contains(&edge)))
    }

    /// Flip the matching state of every consecutive pair along `path`
    ///
    /// Every pair must already be an edge. The whole path is checked before
    /// anything is flipped, so an error leaves the matching untouched.
    /// Paths with fewer than two vertices do nothing.
    pub fn toggle_path(&mut self, path: &[V]) -> Result<(), GraphError> {
        let edges = path
            .windows(2)
            .map(|pair| self.require_edge(pair[0].clone(), pair[1].clone()))
            .collect::<Result<Vec<_>, _>>()?;

        for edge in edges {
            if self.matching.remove(&edge) {
                trace!(edge = %edge, "toggle: matched -> unmatched");
            } else {
                trace!(edge = %edge, "toggle: unmatched -> matched");
                self.matching.insert(edge);
            }
        }
        debug!(
            path_len = path.len(),
            matching_size = self.matching.len(),
            "path toggled"
        );
        Ok(())
    }

    /// Unmatch every edge
    pub fn clear_matching(&mut self) {
        debug!(cleared = self.matching.len(), "matching cleared");
        self.matching.clear();
    }

    /// Matched edges in canonical order
    pub fn matched_edges(&self) -> impl Iterator<Item = &Edge<V>> {
        self.matching.iter()
    }

    pub fn matching_size(&self) -> usize {
        self.matching.len()
    }

    // ------------------------------------------------------------------
    // Matching analysis
    // ------------------------------------------------------------------

    /// Vertices covered by more than one matched edge
    pub fn matching_conflicts(&self) -> Vec<V> {
        let mut degree: BTreeMap<&V, usize> = BTreeMap::new();
        for edge in &self.matching {
            *degree.entry(edge.lo()).or_insert(0) += 1;
            *degree.entry(edge.hi()).or_insert(0) += 1;
        }
        degree
            .into_iter()
            .filter(|(_, d)| *d > 1)
            .map(|(v, _)| v.clone())
            .collect()
    }

    /// Whether the matched edges form a matching in the graph-theoretic sense
    pub fn is_valid_matching(&self) -> bool {
        self.matching_conflicts().is_empty()
    }

    /// Vertices not covered by any matched edge
    pub fn exposed_vertices(&self) -> Vec<V> {
        self.vertices
            .keys()
            .filter(|v| !self.is_covered(v))
            .cloned()
            .collect()
    }

    fn is_covered(&self, v: &V) -> bool {
        self.matching.iter().any(|e| e.touches(v))
    }

    /// Whether `path` is an augmenting path for the current matching
    ///
    /// That is: a simple path over existing edges whose edges alternate
    /// unmatched, matched, ..., unmatched, with both endpoints exposed.
    pub fn is_augmenting_path(&self, path: &[V]) -> bool {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return false;
        };
        if path.len() < 2 {
            return false;
        }

        let distinct: BTreeSet<&V> = path.iter().collect();
        if distinct.len() != path.len() {
            return false;
        }

        for (i, pair) in path.windows(2).enumerate() {
            let expected = if i % 2 == 0 {
                EdgeState::Unmatched
            } else {
                EdgeState::Matched
            };
            if self.edge_state(pair[0].clone(), pair[1].clone()) != Some(expected) {
                return false;
            }
        }

        // Even vertex count means an odd number of edges, so the last edge
        // is unmatched like the first.
        path.len() % 2 == 0 && !self.is_covered(first) && !self.is_covered(last)
    }

    // ------------------------------------------------------------------
    // Style synchronisation
    // ------------------------------------------------------------------

    /// Style changes since the last `sync_styles`, without recording them
    pub fn pending_transitions(&self) -> Vec<StyleTransition<V>> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let to = EdgeState::from_matched(self.matching.contains(edge)).line_style();
                let from = self
                    .rendered
                    .get(edge)
                    .copied()
                    .unwrap_or(LineStyle::Dashed);
                (from != to).then(|| StyleTransition {
                    edge: edge.clone(),
                    from,
                    to,
                })
            })
            .collect()
    }

    /// Record every edge's current style and return the ones that changed
    pub fn sync_styles(&mut self) -> Vec<StyleTransition<V>> {
        let transitions = self.pending_transitions();
        for t in &transitions {
            trace!(transition = %t, "style changed");
            self.rendered.insert(t.edge.clone(), t.to);
        }
        transitions
    }

    /// Style an edge was last reported with
    pub fn rendered_style(&self, u: V, v: V) -> Option<LineStyle> {
        self.rendered.get(&Edge::new(u, v)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_cycle() -> MatchingGraph<&'static str> {
        let mut graph = MatchingGraph::with_vertices(
            ["A", "B", "C", "D", "E", "F"]
                .into_iter()
                .map(|v| (v, Position::default())),
        );
        for (u, v) in [
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "C"),
        ] {
            graph.add_edge(u, v).unwrap();
        }
        graph
    }

    #[test]
    fn test_new_edge_is_unmatched() {
        let graph = even_cycle();
        for edge in graph.edges() {
            assert!(!graph.is_matched(*edge.lo(), *edge.hi()));
        }
        assert_eq!(graph.matching_size(), 0);
    }

    #[test]
    fn test_duplicate_edge_is_noop() {
        let mut graph = even_cycle();
        assert_eq!(graph.add_edge("B", "A"), Ok(false));
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_add_edge_unknown_vertex() {
        let mut graph = even_cycle();
        assert_eq!(
            graph.add_edge("A", "Z"),
            Err(GraphError::UnknownVertex("Z".to_string()))
        );
    }

    #[test]
    fn test_add_edge_self_loop() {
        let mut graph = even_cycle();
        assert_eq!(
            graph.add_edge("A", "A"),
            Err(GraphError::SelfLoop("A".to_string()))
        );
    }

    #[test]
    fn test_canonical_pairs() {
        let mut graph = even_cycle();
        graph.set_matched("C", "B").unwrap();
        assert!(graph.is_matched("B", "C"));
        assert!(graph.is_matched("C", "B"));
    }

    #[test]
    fn test_set_matched_twice() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        assert_eq!(
            graph.set_matched("B", "C"),
            Err(GraphError::AlreadyMatched("B-C".to_string()))
        );
    }

    #[test]
    fn test_set_unmatched_on_unmatched() {
        let mut graph = even_cycle();
        assert_eq!(
            graph.set_unmatched("B", "C"),
            Err(GraphError::NotMatched("B-C".to_string()))
        );
    }

    #[test]
    fn test_match_non_edge() {
        let mut graph = even_cycle();
        assert_eq!(
            graph.set_matched("A", "F"),
            Err(GraphError::NotAnEdge("A-F".to_string()))
        );
        assert!(!graph.is_matched("A", "F"));
        assert_eq!(graph.edge_state("A", "F"), None);
        assert_eq!(graph.edge_state("A", "B"), Some(EdgeState::Unmatched));
    }

    #[test]
    fn test_match_round_trip() {
        let mut graph = even_cycle();
        graph.set_matched("D", "E").unwrap();
        graph.set_unmatched("E", "D").unwrap();
        assert!(!graph.is_matched("D", "E"));
    }

    #[test]
    fn test_toggle_augmenting_path() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        assert!(graph.is_augmenting_path(&["A", "B", "C", "F"]));

        graph.toggle_path(&["A", "B", "C", "F"]).unwrap();

        assert!(graph.is_matched("A", "B"));
        assert!(!graph.is_matched("B", "C"));
        assert!(graph.is_matched("C", "F"));
        assert_eq!(graph.matching_size(), 2);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        graph.set_matched("D", "E").unwrap();
        let before: Vec<_> = graph.matched_edges().cloned().collect();

        let path = ["A", "B", "C", "D", "E", "F"];
        graph.toggle_path(&path).unwrap();
        graph.toggle_path(&path).unwrap();

        let after: Vec<_> = graph.matched_edges().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_invalid_path_is_atomic() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        let err = graph.toggle_path(&["A", "B", "C", "E"]).unwrap_err();
        assert_eq!(err, GraphError::NotAnEdge("C-E".to_string()));
        assert!(!graph.is_matched("A", "B"));
        assert!(graph.is_matched("B", "C"));
    }

    #[test]
    fn test_toggle_short_path() {
        let mut graph = even_cycle();
        graph.toggle_path(&["A"]).unwrap();
        graph.toggle_path(&[]).unwrap();
        assert_eq!(graph.matching_size(), 0);
    }

    #[test]
    fn test_remove_edge_drops_matching() {
        let mut graph = even_cycle();
        graph.set_matched("E", "F").unwrap();
        graph.remove_edge("F", "E").unwrap();
        assert!(!graph.has_edge("E", "F"));
        assert_eq!(graph.matching_size(), 0);
        assert_eq!(
            graph.remove_edge("E", "F"),
            Err(GraphError::NotAnEdge("E-F".to_string()))
        );
    }

    #[test]
    fn test_conflicts_and_exposed() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        graph.set_matched("C", "D").unwrap();
        assert_eq!(graph.matching_conflicts(), vec!["C"]);
        assert!(!graph.is_valid_matching());
        assert_eq!(graph.exposed_vertices(), vec!["A", "E", "F"]);

        graph.clear_matching();
        assert!(graph.is_valid_matching());
        assert_eq!(graph.exposed_vertices().len(), 6);
    }

    #[test]
    fn test_not_augmenting() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        graph.set_matched("D", "E").unwrap();
        // Endpoint B is covered
        assert!(!graph.is_augmenting_path(&["B", "A"]));
        // Two unmatched edges in a row
        assert!(!graph.is_augmenting_path(&["A", "B", "C", "F", "E"]));
        // Even number of edges
        assert!(!graph.is_augmenting_path(&["A", "B", "C"]));
        assert!(!graph.is_augmenting_path(&["A"]));
    }

    #[test]
    fn test_sync_styles() {
        let mut graph = even_cycle();
        assert!(graph.sync_styles().is_empty());

        graph.set_matched("B", "C").unwrap();
        let transitions = graph.sync_styles();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].edge, Edge::new("B", "C"));
        assert_eq!(transitions[0].from, LineStyle::Dashed);
        assert_eq!(transitions[0].to, LineStyle::Solid);
        assert_eq!(graph.rendered_style("C", "B"), Some(LineStyle::Solid));

        assert!(graph.sync_styles().is_empty());
    }

    #[test]
    fn test_sync_ignores_net_unchanged() {
        let mut graph = even_cycle();
        graph.set_matched("B", "C").unwrap();
        graph.set_unmatched("B", "C").unwrap();
        assert!(graph.pending_transitions().is_empty());
    }
}
