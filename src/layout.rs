//! Vertex positions and geometric helpers
//!
//! Positions only matter to whoever draws the graph; nothing in the matching
//! logic reads them. These helpers cover what lecture scenes do with a graph
//! besides matching: move it around, draw part of it, and trace a path.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edge::Edge;
use crate::graph::{GraphError, MatchingGraph};

/// A point on the slide, written `[x, y]` in scene files
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A vertex as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub position: Position,
    /// Hidden vertices are drawn with zero radius but still anchor edges
    pub hidden: bool,
}

impl Vertex {
    pub fn visible(position: Position) -> Self {
        Self {
            position,
            hidden: false,
        }
    }

    pub fn hidden(position: Position) -> Self {
        Self {
            position,
            hidden: true,
        }
    }
}

/// Part of a graph selected for drawing: some vertices and the edges between them
#[derive(Debug, Clone, PartialEq)]
pub struct SubGroup<V> {
    pub vertices: Vec<V>,
    pub edges: Vec<Edge<V>>,
}

impl<V: Ord + Clone + fmt::Display> MatchingGraph<V> {
    pub fn vertex(&self, label: &V) -> Option<&Vertex> {
        self.vertices.get(label)
    }

    pub fn position(&self, label: &V) -> Option<Position> {
        self.vertices.get(label).map(|v| v.position)
    }

    fn position_or_err(&self, label: &V) -> Result<Position, GraphError> {
        self.position(label)
            .ok_or_else(|| GraphError::UnknownVertex(label.to_string()))
    }

    /// Translate every vertex by `delta`
    pub fn shift(&mut self, delta: Position) {
        for vertex in self.vertices.values_mut() {
            vertex.position = vertex.position + delta;
        }
        debug!(delta = %delta, "graph shifted");
    }

    /// Multiply every coordinate by `factor`
    pub fn scale_positions(&mut self, factor: f64) {
        for vertex in self.vertices.values_mut() {
            vertex.position = vertex.position * factor;
        }
    }

    /// Move the listed vertices to new positions
    ///
    /// Fails without moving anything if a label is not a vertex.
    pub fn rearrange(&mut self, positions: &BTreeMap<V, Position>) -> Result<(), GraphError> {
        if let Some(unknown) = positions.keys().find(|v| !self.vertices.contains_key(*v)) {
            return Err(GraphError::UnknownVertex(unknown.to_string()));
        }
        for (label, position) in positions {
            if let Some(vertex) = self.vertices.get_mut(label) {
                vertex.position = *position;
            }
        }
        debug!(moved = positions.len(), "graph rearranged");
        Ok(())
    }

    /// Start and end points of the line for edge `u`-`v`
    pub fn edge_segment(&self, u: V, v: V) -> Result<(Position, Position), GraphError> {
        let edge = Edge::new(u, v);
        if !self.has_edge(edge.lo().clone(), edge.hi().clone()) {
            return Err(GraphError::NotAnEdge(edge.to_string()));
        }
        Ok((
            self.position_or_err(edge.lo())?,
            self.position_or_err(edge.hi())?,
        ))
    }

    /// The listed vertices plus every edge with both endpoints among them
    pub fn sub_group(&self, vertices: &[V]) -> SubGroup<V> {
        let selected: BTreeSet<&V> = vertices
            .iter()
            .filter(|v| self.vertices.contains_key(*v))
            .collect();
        SubGroup {
            vertices: selected.iter().map(|v| (*v).clone()).collect(),
            edges: self
                .edges()
                .filter(|e| selected.contains(e.lo()) && selected.contains(e.hi()))
                .cloned()
                .collect(),
        }
    }

    /// Polyline through the positions of `path`, for drawing a highlight
    pub fn highlight_path(&self, path: &[V]) -> Result<Vec<Position>, GraphError> {
        path.iter().map(|v| self.position_or_err(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> MatchingGraph<&'static str> {
        let mut graph = MatchingGraph::with_vertices([
            ("A", Position::new(0.0, 0.0)),
            ("B", Position::new(1.0, 0.0)),
            ("C", Position::new(1.0, 1.0)),
            ("D", Position::new(0.0, 1.0)),
        ]);
        graph.add_edge("A", "B").unwrap();
        graph.add_edge("B", "C").unwrap();
        graph.add_edge("C", "D").unwrap();
        graph.add_edge("D", "A").unwrap();
        graph
    }

    #[test]
    fn test_position_serde_as_array() {
        let p: Position = serde_json::from_str("[1.5, -2.0]").unwrap();
        assert_eq!(p, Position::new(1.5, -2.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.0]");
    }

    #[test]
    fn test_shift() {
        let mut graph = square();
        graph.shift(Position::new(-3.0, 0.0));
        assert_eq!(graph.position(&"C"), Some(Position::new(-2.0, 1.0)));
        assert_eq!(
            graph.edge_segment("B", "A").unwrap(),
            (Position::new(-3.0, 0.0), Position::new(-2.0, 0.0))
        );
    }

    #[test]
    fn test_scale_positions() {
        let mut graph = square();
        graph.scale_positions(0.5);
        assert_eq!(graph.position(&"C"), Some(Position::new(0.5, 0.5)));
    }

    #[test]
    fn test_rearrange_unknown_is_atomic() {
        let mut graph = square();
        let moves = BTreeMap::from([("A", Position::new(5.0, 5.0)), ("Q", Position::default())]);
        assert_eq!(
            graph.rearrange(&moves),
            Err(GraphError::UnknownVertex("Q".to_string()))
        );
        assert_eq!(graph.position(&"A"), Some(Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_sub_group_keeps_induced_edges() {
        let graph = square();
        let group = graph.sub_group(&["A", "B", "C"]);
        assert_eq!(group.vertices, vec!["A", "B", "C"]);
        assert_eq!(group.edges, vec![Edge::new("A", "B"), Edge::new("B", "C")]);
    }

    #[test]
    fn test_highlight_path() {
        let graph = square();
        let line = graph.highlight_path(&["A", "B", "C"]).unwrap();
        assert_eq!(line.len(), 3);
        assert_eq!(line[2], Position::new(1.0, 1.0));
        assert!(graph.highlight_path(&["A", "X"]).is_err());
    }

    #[test]
    fn test_hidden_vertex() {
        let mut graph = square();
        graph.add_hidden_vertex("H", Position::new(2.0, 2.0));
        assert!(graph.vertex(&"H").unwrap().hidden);
        assert!(graph.add_edge("H", "C").unwrap());
    }
}
