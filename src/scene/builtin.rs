//! Built-in scenes from the matching lecture
//!
//! The scene files live in `scenes/` and are compiled into the binary.

use super::{SceneError, SceneScript};

/// (name, TOML source) for every built-in scene
const BUILTIN_SCENES: &[(&str, &str)] = &[
    ("even-cycle", include_str!("../../scenes/even-cycle.toml")),
    (
        "augmenting-path",
        include_str!("../../scenes/augmenting-path.toml"),
    ),
    (
        "maximum-implies-no-ap",
        include_str!("../../scenes/maximum-implies-no-ap.toml"),
    ),
    (
        "no-ap-implies-maximum",
        include_str!("../../scenes/no-ap-implies-maximum.toml"),
    ),
    (
        "augment-algorithm-example",
        include_str!("../../scenes/augment-algorithm-example.toml"),
    ),
    (
        "augment-algorithm-counterexample",
        include_str!("../../scenes/augment-algorithm-counterexample.toml"),
    ),
    (
        "bipartite-animation",
        include_str!("../../scenes/bipartite-animation.toml"),
    ),
    ("general-graph", include_str!("../../scenes/general-graph.toml")),
    (
        "bipartite-graph",
        include_str!("../../scenes/bipartite-graph.toml"),
    ),
    (
        "blossom-definition",
        include_str!("../../scenes/blossom-definition.toml"),
    ),
    (
        "blossom-shrinking-proof",
        include_str!("../../scenes/blossom-shrinking-proof.toml"),
    ),
];

/// Names of all built-in scenes, in lecture order
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_SCENES.iter().map(|(name, _)| *name)
}

/// Load a built-in scene by name
pub fn builtin_scene(name: &str) -> Result<SceneScript, SceneError> {
    let (_, source) = BUILTIN_SCENES
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
    SceneScript::from_toml(source)
}

/// The six-vertex graph most slides start from, with nothing matched
///
/// Edges: A-B, B-C, C-D, D-E, E-F, F-C.
pub fn even_cycle() -> Result<SceneScript, SceneError> {
    builtin_scene("even-cycle")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::LineStyle;
    use crate::layout::Position;

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_all_builtins_run() {
        assert_eq!(builtin_names().count(), 11);
        for name in builtin_names() {
            let scene = builtin_scene(name).unwrap();
            assert_eq!(scene.name, name);
            scene
                .run()
                .unwrap_or_else(|e| panic!("scene {} failed: {}", name, e));
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            builtin_scene("stable-matching"),
            Err(SceneError::UnknownScene(_))
        ));
    }

    #[test]
    fn test_even_cycle_shape() {
        let graph = even_cycle().unwrap().build_graph().unwrap();
        assert_eq!(graph.vertex_count(), 6);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.has_edge("C".to_string(), "F".to_string()));
        assert_eq!(graph.matching_size(), 0);
    }

    #[test]
    fn test_maximum_implies_no_ap_ends_augmented() {
        let timeline = builtin_scene("maximum-implies-no-ap")
            .unwrap()
            .run()
            .unwrap();
        // Seven flips of the same path leave it applied once
        let last = timeline.final_frame().unwrap();
        assert_eq!(last.matching_size, 3);
        assert!(last.valid_matching);
    }

    #[test]
    fn test_augment_example_reaches_perfect_matching() {
        let timeline = builtin_scene("augment-algorithm-example")
            .unwrap()
            .run()
            .unwrap();
        let after_toggle = &timeline.frames[3];
        assert_eq!(after_toggle.matching_size, 3);
        assert!(after_toggle.valid_matching);
        assert_eq!(timeline.final_frame().unwrap().matching_size, 0);
    }

    #[test]
    fn test_four_problems_graphs_are_not_matchings() {
        for name in ["general-graph", "bipartite-graph"] {
            let timeline = builtin_scene(name).unwrap().run().unwrap();
            let initial = &timeline.frames[0];
            assert!(!initial.valid_matching);
            assert_eq!(initial.conflicts.len(), 6);
        }
    }

    #[test]
    fn test_odd_cycle_component_conflicts() {
        let timeline = builtin_scene("no-ap-implies-maximum")
            .unwrap()
            .run()
            .unwrap();
        assert!(timeline.frames[0].valid_matching);
        assert_eq!(timeline.frames[0].matching_size, 9);

        let conflicted: Vec<_> = timeline
            .frames
            .iter()
            .filter(|f| !f.valid_matching)
            .collect();
        // E-A is matched twice during the flip sequence
        assert_eq!(conflicted.len(), 2);
        for frame in conflicted {
            assert_eq!(frame.conflicts, vec![s("c5.A")]);
            assert_eq!(frame.action, "match c5.A-c5.E");
        }

        let removed: Vec<_> = timeline
            .frames
            .iter()
            .flat_map(|f| &f.removed_edges)
            .collect();
        assert_eq!(removed.len(), 5);
        assert_eq!(
            removed
                .iter()
                .filter(|r| r.style == LineStyle::Solid)
                .count(),
            2
        );

        let last = timeline.final_frame().unwrap();
        // Removing the cycle takes its matched edges with it
        assert_eq!(last.matching_size, 9);
        assert!(last.valid_matching);
        assert_eq!(last.highlight.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn test_counterexample_path_is_augmenting() {
        let scene = builtin_scene("augment-algorithm-counterexample").unwrap();
        let graph = scene.build_graph().unwrap();
        let full = ["A", "B", "C", "D", "E", "F"].map(s);
        assert!(graph.is_augmenting_path(&full));
        // Leaving A through E uses two unmatched edges in a row
        assert!(!graph.is_augmenting_path(&["A", "E", "F"].map(s)));
        assert_eq!(graph.exposed_vertices(), vec![s("A"), s("F")]);

        let timeline = scene.run().unwrap();
        assert_eq!(timeline.transition_count(), 0);
        let highlights = timeline
            .frames
            .iter()
            .filter(|f| f.highlight.is_some())
            .count();
        assert_eq!(highlights, 9);
    }

    #[test]
    fn test_bipartite_animation_rearranges() {
        let timeline = builtin_scene("bipartite-animation")
            .unwrap()
            .run()
            .unwrap();
        let split = &timeline.frames[1];
        assert_eq!(split.vertex_updates.len(), 6);
        assert_eq!(split.vertex_updates["A"].position, Position::new(0.8, 2.0));
        assert!(timeline.frames[2].vertex_updates.is_empty());
        assert!(
            timeline
                .final_positions
                .values()
                .all(|p| *p == Position::new(0.0, 0.0))
        );
        assert_eq!(timeline.transition_count(), 0);
    }

    #[test]
    fn test_blossom_has_one_exposed_root() {
        let graph = builtin_scene("blossom-shrinking-proof")
            .unwrap()
            .build_graph()
            .unwrap();
        assert_eq!(graph.exposed_vertices(), vec![s("A")]);
        assert!(graph.is_valid_matching());
        assert_eq!(graph.edge_count(), 5);
    }
}
