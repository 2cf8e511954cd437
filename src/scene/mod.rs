//! Scene scripts
//!
//! A scene is a graph plus an ordered list of steps. Running it threads one
//! [`MatchingGraph`] through the steps and records a [`Frame`] after each,
//! listing the edges whose drawn style changed along with any edges or
//! vertices that appeared, disappeared or moved. Together with the initial
//! drawing in [`Timeline`] that is everything a renderer needs to animate
//! the slide.
//!
//! ## Scene File Format
//!
//! ```toml
//! name = "augmenting-path"
//! edges = [["A", "B"], ["B", "C"], ["C", "F"]]
//! matched = [["B", "C"]]
//!
//! [vertices]
//! A = [-2.0, 1.0]
//! B = [-2.0, -1.0]
//! C = [0.0, -1.0]
//! F = [2.0, -1.0]
//!
//! [[steps]]
//! action = "highlight"
//! path = ["A", "B", "C", "F"]
//!
//! [[steps]]
//! action = "toggle"
//! path = ["A", "B", "C", "F"]
//! ```

pub mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::edge::{Edge, LineStyle, StyleTransition};
use crate::graph::{GraphError, MatchingGraph};
use crate::layout::{Position, Vertex};

/// Errors that can occur when loading or running a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scene file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown built-in scene: {0}")]
    UnknownScene(String),

    #[error("Invalid scene setup: {0}")]
    Setup(#[from] GraphError),

    #[error("Vertex {0} is listed as both visible and hidden")]
    DuplicateVertex(String),

    #[error("Step {number} ({action}) failed: {source}")]
    Step {
        /// 1-based step number as written in the file
        number: usize,
        action: String,
        #[source]
        source: GraphError,
    },
}

/// One scripted change to the graph
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    AddVertex {
        label: String,
        position: Position,
        #[serde(default)]
        hidden: bool,
    },
    AddEdge {
        edge: [String; 2],
    },
    RemoveEdge {
        edge: [String; 2],
    },
    Match {
        edge: [String; 2],
    },
    Unmatch {
        edge: [String; 2],
    },
    /// Flip every edge along the path (apply an augmenting path)
    Toggle {
        path: Vec<String>,
    },
    /// Unmatch everything
    Clear,
    Shift {
        delta: Position,
    },
    Rearrange {
        positions: BTreeMap<String, Position>,
    },
    /// Draw a highlight along a path without changing any state
    Highlight {
        path: Vec<String>,
    },
    /// Slide break
    Pause {
        #[serde(default)]
        note: Option<String>,
    },
}

impl Step {
    /// Apply this step to `graph`
    ///
    /// Returns the highlight polyline for `Highlight` steps.
    pub fn apply(
        &self,
        graph: &mut MatchingGraph<String>,
    ) -> Result<Option<Vec<Position>>, GraphError> {
        match self {
            Step::AddVertex {
                label,
                position,
                hidden,
            } => {
                if *hidden {
                    graph.add_hidden_vertex(label.clone(), *position);
                } else {
                    graph.add_vertex(label.clone(), *position);
                }
            }
            Step::AddEdge { edge: [u, v] } => {
                graph.add_edge(u.clone(), v.clone())?;
            }
            Step::RemoveEdge { edge: [u, v] } => graph.remove_edge(u.clone(), v.clone())?,
            Step::Match { edge: [u, v] } => graph.set_matched(u.clone(), v.clone())?,
            Step::Unmatch { edge: [u, v] } => graph.set_unmatched(u.clone(), v.clone())?,
            Step::Toggle { path } => graph.toggle_path(path)?,
            Step::Clear => graph.clear_matching(),
            Step::Shift { delta } => graph.shift(*delta),
            Step::Rearrange { positions } => graph.rearrange(positions)?,
            Step::Highlight { path } => return graph.highlight_path(path).map(Some),
            Step::Pause { .. } => {}
        }
        Ok(None)
    }

    /// Short action name, as written in scene files
    pub fn name(&self) -> &'static str {
        match self {
            Step::AddVertex { .. } => "add_vertex",
            Step::AddEdge { .. } => "add_edge",
            Step::RemoveEdge { .. } => "remove_edge",
            Step::Match { .. } => "match",
            Step::Unmatch { .. } => "unmatch",
            Step::Toggle { .. } => "toggle",
            Step::Clear => "clear",
            Step::Shift { .. } => "shift",
            Step::Rearrange { .. } => "rearrange",
            Step::Highlight { .. } => "highlight",
            Step::Pause { .. } => "pause",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::AddVertex {
                label,
                position,
                hidden,
            } => {
                write!(f, "add_vertex {} at {}", label, position)?;
                if *hidden {
                    write!(f, " (hidden)")?;
                }
                Ok(())
            }
            Step::AddEdge { edge: [u, v] }
            | Step::RemoveEdge { edge: [u, v] }
            | Step::Match { edge: [u, v] }
            | Step::Unmatch { edge: [u, v] } => {
                write!(f, "{} {}", self.name(), Edge::new(u, v))
            }
            Step::Toggle { path } | Step::Highlight { path } => {
                write!(f, "{} {}", self.name(), path.join("-"))
            }
            Step::Clear => write!(f, "clear"),
            Step::Shift { delta } => write!(f, "shift by {}", delta),
            Step::Rearrange { positions } => write!(f, "rearrange {} vertices", positions.len()),
            Step::Pause { note: Some(note) } => write!(f, "pause: {}", note),
            Step::Pause { note: None } => write!(f, "pause"),
        }
    }
}

/// A graph and the steps played on it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneScript {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Positioned vertices present from the start
    pub vertices: BTreeMap<String, Position>,

    /// Vertices present from the start but drawn with zero radius
    #[serde(default)]
    pub hidden: BTreeMap<String, Position>,

    #[serde(default)]
    pub edges: Vec<[String; 2]>,

    /// Edges already matched when the scene is first drawn
    #[serde(default)]
    pub matched: Vec<[String; 2]>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl SceneScript {
    /// Parse a scene from TOML
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a scene file
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Build the graph as it looks before the first step
    pub fn build_graph(&self) -> Result<MatchingGraph<String>, SceneError> {
        if let Some(label) = self.hidden.keys().find(|l| self.vertices.contains_key(*l)) {
            return Err(SceneError::DuplicateVertex(label.clone()));
        }
        let mut graph = MatchingGraph::with_vertices(
            self.vertices.iter().map(|(label, p)| (label.clone(), *p)),
        );
        for (label, position) in &self.hidden {
            graph.add_hidden_vertex(label.clone(), *position);
        }
        for [u, v] in &self.edges {
            graph.add_edge(u.clone(), v.clone())?;
        }
        for [u, v] in &self.matched {
            graph.set_matched(u.clone(), v.clone())?;
        }
        Ok(graph)
    }

    /// Play the scene and record a frame per step
    pub fn run(&self) -> Result<Timeline, SceneError> {
        let mut graph = self.build_graph()?;
        info!(
            scene = %self.name,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            steps = self.steps.len(),
            "running scene"
        );

        // Initial edges are drawn in their current style, nothing animates.
        graph.sync_styles();
        let initial = Drawing::of(&graph);
        let mut frames = vec![Frame::capture(
            &graph,
            &initial,
            &initial,
            None,
            "initial".to_string(),
            Vec::new(),
            None,
        )];

        let mut drawn = initial.clone();
        for (i, step) in self.steps.iter().enumerate() {
            let highlight = step.apply(&mut graph).map_err(|source| SceneError::Step {
                number: i + 1,
                action: step.to_string(),
                source,
            })?;
            let transitions = graph.sync_styles();
            debug!(step = %step, changed = transitions.len(), "step applied");
            let now = Drawing::of(&graph);
            frames.push(Frame::capture(
                &graph,
                &drawn,
                &now,
                Some(i + 1),
                step.to_string(),
                transitions,
                highlight,
            ));
            drawn = now;
        }

        Ok(Timeline {
            scene: self.name.clone(),
            description: self.description.clone(),
            vertices: initial.vertices,
            edges: initial.edges.into_keys().collect(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            final_positions: graph
                .vertices()
                .filter_map(|v| graph.position(v).map(|p| (v.clone(), p)))
                .collect(),
            frames,
        })
    }
}

/// Vertices and edges as they are on screen, with each edge's drawn style
#[derive(Debug, Clone, PartialEq)]
struct Drawing {
    vertices: BTreeMap<String, Vertex>,
    edges: BTreeMap<Edge<String>, LineStyle>,
}

impl Drawing {
    /// Taken right after `sync_styles`, so rendered styles are current
    fn of(graph: &MatchingGraph<String>) -> Self {
        Self {
            vertices: graph.vertices.clone(),
            edges: graph
                .edges()
                .map(|e| {
                    let style = graph
                        .rendered_style(e.lo().clone(), e.hi().clone())
                        .unwrap_or(LineStyle::Dashed);
                    (e.clone(), style)
                })
                .collect(),
        }
    }
}

/// An edge taken off the slide, with the style it was last drawn in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedEdge {
    pub edge: Edge<String>,
    pub style: LineStyle,
}

/// Graph state after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// 1-based step number; `None` for the initial frame
    pub step: Option<usize>,
    pub action: String,
    /// Edges whose drawn style changed in this step
    pub transitions: Vec<StyleTransition<String>>,
    /// New edges; they appear dashed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_edges: Vec<Edge<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_edges: Vec<RemovedEdge>,
    /// Vertices that appeared, moved or changed visibility
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vertex_updates: BTreeMap<String, Vertex>,
    /// Matched edges after the step
    pub matching: Vec<Edge<String>>,
    pub matching_size: usize,
    pub valid_matching: bool,
    /// Vertices covered by more than one matched edge
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Vec<Position>>,
}

impl Frame {
    fn capture(
        graph: &MatchingGraph<String>,
        before: &Drawing,
        after: &Drawing,
        step: Option<usize>,
        action: String,
        transitions: Vec<StyleTransition<String>>,
        highlight: Option<Vec<Position>>,
    ) -> Self {
        let conflicts = graph.matching_conflicts();
        Self {
            step,
            action,
            transitions,
            added_edges: after
                .edges
                .keys()
                .filter(|e| !before.edges.contains_key(*e))
                .cloned()
                .collect(),
            removed_edges: before
                .edges
                .iter()
                .filter(|(e, _)| !after.edges.contains_key(*e))
                .map(|(e, style)| RemovedEdge {
                    edge: e.clone(),
                    style: *style,
                })
                .collect(),
            vertex_updates: after
                .vertices
                .iter()
                .filter(|(label, vertex)| before.vertices.get(*label) != Some(*vertex))
                .map(|(label, vertex)| (label.clone(), *vertex))
                .collect(),
            matching: graph.matched_edges().cloned().collect(),
            matching_size: graph.matching_size(),
            valid_matching: conflicts.is_empty(),
            conflicts,
            highlight,
        }
    }
}

/// Every frame of a played scene
///
/// `vertices` and `edges` are the drawing before the first step; each frame
/// then lists what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub scene: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub vertices: BTreeMap<String, Vertex>,
    pub edges: Vec<Edge<String>>,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub final_positions: BTreeMap<String, Position>,
    pub frames: Vec<Frame>,
}

impl Timeline {
    /// Total number of style transitions across all frames
    pub fn transition_count(&self) -> usize {
        self.frames.iter().map(|f| f.transitions.len()).sum()
    }

    pub fn final_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}
