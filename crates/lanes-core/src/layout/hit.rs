//! Pointer → node resolution.
//!
//! A query hits the nearest node whose centre lies within
//! `node_radius + hit_slack` (inclusive). When two nodes are equally near,
//! the one in the earlier row wins.
//!
//! Rows are evenly spaced, so only rows whose centre falls inside the
//! vertical threshold band around the query need to be checked.

use tracing::trace;

use crate::layout::build::{GraphNode, Layout, row_ceil, row_floor};
use crate::layout::edge::Point;

/// Nearest node to `(x, y)` within the configured hit radius.
#[must_use]
pub fn hit_test(layout: &Layout, x: f64, y: f64) -> Option<&GraphNode> {
    if x.is_nan() || y.is_nan() {
        return None;
    }
    let query = Point::new(x, y);
    let threshold = layout.config().hit_radius();

    let mut best: Option<(f64, &GraphNode)> = None;
    for node in &layout.nodes()[candidate_rows(layout, y, threshold)] {
        let dist = node.position().distance(query);
        if dist > threshold {
            continue;
        }
        // strict `<` keeps the earlier row on ties
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, node));
        }
    }

    let hit = best.map(|(_, node)| node);
    trace!(x, y, hit = hit.map(GraphNode::id), "hit test");
    hit
}

/// Rows whose centre can be within `threshold` of `y`.
fn candidate_rows(layout: &Layout, y: f64, threshold: f64) -> std::ops::Range<usize> {
    let rows = layout.len();
    let h = layout.config().row_height;
    if h <= 0.0 {
        return 0..rows;
    }
    // centre of row r is (r + 0.5) * h
    let lo = row_floor((y - threshold) / h - 0.5).min(rows);
    let hi = row_ceil((y + threshold) / h - 0.5)
        .saturating_add(1)
        .min(rows);
    lo..hi.max(lo)
}
