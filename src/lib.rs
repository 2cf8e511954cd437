//! # matching-scenes - Matching-State Graphs for Lecture Animations
//!
//! A small model of a graph whose edges are either *matched* or
//! *unmatched*, plus scene scripts that replay the steps of a graph
//! matching lecture against it.
//!
//! ## Overview
//!
//! - [`MatchingGraph`] holds vertices, edges and the matching subset, and
//!   supports toggling every edge along a path (applying an augmenting path)
//! - [`EdgeState`] and [`LineStyle`] say how each edge is drawn: dashed when
//!   unmatched, solid when matched
//! - [`SceneScript`] is a TOML scene: a graph plus steps; running it yields a
//!   [`Timeline`] of frames listing which edges change style
//!
//! ## Usage
//!
//! ```bash
//! # Play a scene file and print every frame
//! matching-scenes run scenes/augmenting-path.toml
//!
//! # Play a built-in scene and emit JSON for a renderer
//! matching-scenes builtin maximum-implies-no-ap --json
//! ```
//!
//! ## Example
//!
//! ```
//! use matching_scenes::{MatchingGraph, Position};
//!
//! let mut graph = MatchingGraph::with_vertices(
//!     ["A", "B", "C", "F"].map(|v| (v, Position::default())),
//! );
//! graph.add_edge("A", "B").unwrap();
//! graph.add_edge("B", "C").unwrap();
//! graph.add_edge("C", "F").unwrap();
//! graph.set_matched("B", "C").unwrap();
//!
//! graph.toggle_path(&["A", "B", "C", "F"]).unwrap();
//! assert!(graph.is_matched("A", "B"));
//! assert!(!graph.is_matched("C", "B"));
//! assert_eq!(graph.matching_size(), 2);
//! ```

pub mod config;
pub mod edge;
pub mod graph;
pub mod layout;
pub mod report;
pub mod scene;

pub use config::{
    ConfigError, ReportConfig, SceneConfig, StyleConfig, find_config_file, load_config,
    load_config_file,
};
pub use edge::{Edge, EdgeState, LineStyle, StyleTransition};
pub use graph::{GraphError, MatchingGraph};
pub use layout::{Position, SubGroup, Vertex};
pub use report::{generate_json, generate_report};
pub use scene::builtin::{builtin_names, builtin_scene, even_cycle};
pub use scene::{Frame, RemovedEdge, SceneError, SceneScript, Step, Timeline};
