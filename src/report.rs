//! Report generation for played scenes
//!
//! Turns a [`Timeline`] into either a readable frame-by-frame listing or a
//! JSON document a renderer can consume.

use std::io::{self, Write};

use serde::Serialize;

use crate::config::{SceneConfig, StyleConfig};
use crate::edge::{Edge, LineStyle};
use crate::scene::{Frame, Timeline};

/// Write a frame-by-frame text report
pub fn generate_report<W: Write>(
    timeline: &Timeline,
    config: &SceneConfig,
    writer: &mut W,
) -> io::Result<()> {
    let style = &config.style;

    writeln!(writer, "Scene: {}", timeline.scene)?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    if let Some(description) = &timeline.description {
        writeln!(writer, "{}", description)?;
    }
    writeln!(
        writer,
        "Vertices: {} | Edges: {} | Frames: {} | Transitions: {}",
        timeline.vertex_count,
        timeline.edge_count,
        timeline.frames.len(),
        timeline.transition_count()
    )?;
    writeln!(
        writer,
        "Style: scale {:.2} | solid {} | dashed {}",
        style.scale, style.solid_color, style.dashed_color
    )?;
    writeln!(
        writer,
        "       dot radius {:.3} | stroke {:.1} | dash {:.3}",
        style.dot_radius(),
        style.stroke_width(),
        style.dash_length()
    )?;
    writeln!(writer)?;

    for frame in &timeline.frames {
        write_frame(frame, config.report.list_matching, writer)?;
    }

    Ok(())
}

fn write_frame<W: Write>(frame: &Frame, list_matching: bool, writer: &mut W) -> io::Result<()> {
    match frame.step {
        Some(n) => writeln!(writer, "[{:>3}] {}", n, frame.action)?,
        None => writeln!(writer, "[  0] {}", frame.action)?,
    }

    for edge in &frame.added_edges {
        writeln!(writer, "      add    {}", edge)?;
    }
    for removed in &frame.removed_edges {
        writeln!(writer, "      remove {} ({})", removed.edge, removed.style)?;
    }
    for (label, vertex) in &frame.vertex_updates {
        let hidden = if vertex.hidden { " hidden" } else { "" };
        writeln!(writer, "      place  {} at {}{}", label, vertex.position, hidden)?;
    }

    for t in &frame.transitions {
        let verb = match t.to {
            LineStyle::Solid => "grow",
            LineStyle::Dashed => "shrink",
        };
        writeln!(writer, "      {:<6} {}", verb, t)?;
    }

    if let Some(line) = &frame.highlight {
        let points: Vec<String> = line.iter().map(|p| p.to_string()).collect();
        writeln!(writer, "      highlight {}", points.join(" -> "))?;
    }

    // The initial frame has no transitions, so always show what is matched
    if list_matching || frame.step.is_none() {
        writeln!(writer, "      matching: {}", format_edges(&frame.matching))?;
    }

    writeln!(writer, "      |M| = {}", frame.matching_size)?;

    if !frame.valid_matching {
        writeln!(
            writer,
            "      ⚠️ not a matching: {} covered more than once",
            frame.conflicts.join(", ")
        )?;
    }

    Ok(())
}

fn format_edges(edges: &[Edge<String>]) -> String {
    if edges.is_empty() {
        return "(none)".to_string();
    }
    edges
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Style settings plus the sizes they work out to
#[derive(Serialize)]
struct JsonStyle<'a> {
    #[serde(flatten)]
    config: &'a StyleConfig,
    dot_radius: f64,
    stroke_width: f64,
    dash_length: f64,
}

/// JSON document: the timeline plus the style it should be drawn with
#[derive(Serialize)]
struct JsonReport<'a> {
    style: JsonStyle<'a>,
    #[serde(flatten)]
    timeline: &'a Timeline,
}

/// Write the timeline as pretty-printed JSON
pub fn generate_json<W: Write>(
    timeline: &Timeline,
    config: &SceneConfig,
    writer: &mut W,
) -> io::Result<()> {
    let style = &config.style;
    let output = JsonReport {
        style: JsonStyle {
            config: style,
            dot_radius: style.dot_radius(),
            stroke_width: style.stroke_width(),
            dash_length: style.dash_length(),
        },
        timeline,
    };
    let json = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
    writeln!(writer, "{}", json)?;
    Ok(())
}
