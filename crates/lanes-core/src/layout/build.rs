//! Positioned layout construction.
//!
//! [`build_layout`] runs the lane allocator over the commit sequence and
//! turns each placement into a [`GraphNode`] with canvas coordinates and a
//! lane color. Edges are not stored: [`Layout::edges`] resolves parent ids
//! through the id→row index built once per pass.
//!
//! ## Coordinates
//!
//! ```text
//! x = margin + lane * column_width
//! y = row * row_height + row_height / 2
//! ```
//!
//! ## Change Detection
//!
//! [`Layout::content_hash`] is a BLAKE3 hash of the commit sequence
//! (ids, parents and metadata). Compare it against a previous value to tell
//! whether a new input would produce a different layout.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use tracing::{debug, instrument};

use crate::config::LayoutConfig;
use crate::layout::alloc::LaneAllocator;
use crate::layout::edge::{EdgeKind, EdgePath, Point};
use crate::model::Commit;

/// A commit positioned on the canvas.
///
/// Serializes as `{id, row, lane, x, y, color, commit}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub commit: Commit,
    /// Position in the input sequence.
    pub row: usize,
    pub lane: usize,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

impl GraphNode {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.commit.id
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Serialize for GraphNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("GraphNode", 7)?;
        node.serialize_field("id", self.id())?;
        node.serialize_field("row", &self.row)?;
        node.serialize_field("lane", &self.lane)?;
        node.serialize_field("x", &self.x)?;
        node.serialize_field("y", &self.y)?;
        node.serialize_field("color", &self.color)?;
        node.serialize_field("commit", &self.commit)?;
        node.end()
    }
}

/// A resolved child→parent connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<'a> {
    pub child: &'a str,
    pub parent: &'a str,
    /// Index of `parent` within the child's parent list (0 = primary).
    pub parent_index: usize,
    pub kind: EdgeKind,
    /// Color of the lane the connector leaves from.
    pub color: &'a str,
    pub path: EdgePath,
}

/// A parent reference that does not resolve to any node in the layout,
/// typically because the history was truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedParent<'a> {
    pub child: &'a str,
    pub parent: &'a str,
    pub parent_index: usize,
}

/// Canvas extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Immutable output of one layout pass.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    nodes: Vec<GraphNode>,
    /// Pass-through lanes per row; see [`Layout::through_lanes`].
    through: Vec<Vec<usize>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    lane_count: usize,
    size: CanvasSize,
    content_hash: String,
    #[serde(skip)]
    config: LayoutConfig,
}

impl Layout {
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of lanes used (`max(lane) + 1`, or 0 for an empty layout).
    #[must_use]
    pub const fn lane_count(&self) -> usize {
        self.lane_count
    }

    #[must_use]
    pub const fn size(&self) -> CanvasSize {
        self.size
    }

    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The (sanitized) configuration this layout was computed with.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Node for `id`. With duplicate ids, the later occurrence wins.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&row| &self.nodes[row])
    }

    #[must_use]
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Lanes that carry a pending line past `row` without a node on it.
    #[must_use]
    pub fn through_lanes(&self, row: usize) -> &[usize] {
        self.through.get(row).map(Vec::as_slice).unwrap_or_default()
    }

    /// Connectors from the node at `row` to each of its resolved parents.
    pub fn edges_from(&self, row: usize) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.nodes.get(row).into_iter().flat_map(move |child| {
            child
                .commit
                .parent_ids
                .iter()
                .enumerate()
                .filter_map(move |(parent_index, parent_id)| {
                    let parent = self.node(parent_id)?;
                    let kind = EdgeKind::classify(child.lane, parent.lane);
                    Some(Edge {
                        child: child.id(),
                        parent: parent.id(),
                        parent_index,
                        kind,
                        color: &child.color,
                        path: EdgePath::between(kind, child.position(), parent.position()),
                    })
                })
        })
    }

    /// All resolved connectors, in row order then parent order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        (0..self.nodes.len()).flat_map(move |row| self.edges_from(row))
    }

    /// Parent references that point outside this layout.
    pub fn unresolved_parents(&self) -> impl Iterator<Item = UnresolvedParent<'_>> + '_ {
        self.nodes.iter().flat_map(move |child| {
            child
                .commit
                .parent_ids
                .iter()
                .enumerate()
                .filter(move |(_, parent)| !self.index.contains_key(parent.as_str()))
                .map(move |(parent_index, parent)| UnresolvedParent {
                    child: child.id(),
                    parent,
                    parent_index,
                })
        })
    }

    /// Rows whose band `[row * h, (row + 1) * h)` intersects `[top, bottom)`.
    #[must_use]
    pub fn visible_rows(&self, top: f64, bottom: f64) -> Range<usize> {
        let h = self.config.row_height;
        let rows = self.nodes.len();
        if rows == 0 || h <= 0.0 || top.is_nan() || bottom.is_nan() || bottom <= top {
            return 0..0;
        }
        let start = row_floor(top / h).min(rows);
        let end = row_ceil(bottom / h).min(rows);
        start..end.max(start)
    }
}

/// Non-negative floor of a row coordinate, saturating at `usize::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn row_floor(value: f64) -> usize {
    if value <= 0.0 { 0 } else { value.floor() as usize }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn row_ceil(value: f64) -> usize {
    if value <= 0.0 { 0 } else { value.ceil() as usize }
}

/// Compute the positioned layout for an ordered commit sequence.
///
/// Total over any input: dangling and duplicate ids are absorbed, and
/// pathological config values are clamped (see [`LayoutConfig::sanitized`]).
#[instrument(skip(commits, config), fields(count = commits.len()))]
#[must_use]
pub fn build_layout(commits: &[Commit], config: &LayoutConfig) -> Layout {
    let content_hash = compute_content_hash(commits);
    place_commits(commits.iter().cloned(), commits.len(), config, content_hash)
}

/// Lay out an owned commit sequence whose content hash is already known,
/// moving each commit into its node.
pub(crate) fn build_layout_owned(
    commits: Vec<Commit>,
    config: &LayoutConfig,
    content_hash: String,
) -> Layout {
    let len = commits.len();
    place_commits(commits.into_iter(), len, config, content_hash)
}

#[allow(clippy::cast_precision_loss)]
fn place_commits(
    commits: impl Iterator<Item = Commit>,
    len: usize,
    config: &LayoutConfig,
    content_hash: String,
) -> Layout {
    let config = config.sanitized();
    let mut allocator = LaneAllocator::new();
    let mut nodes = Vec::with_capacity(len);
    let mut through = Vec::with_capacity(len);
    let mut index = HashMap::with_capacity(len);
    let mut max_lane: Option<usize> = None;

    for (row, commit) in commits.enumerate() {
        let placement = allocator.place(&commit);
        let lane = placement.lane;
        max_lane = Some(max_lane.map_or(lane, |m| m.max(lane)));

        index.insert(commit.id.clone(), row);
        through.push(placement.through);
        nodes.push(GraphNode {
            commit,
            row,
            lane,
            x: (lane as f64).mul_add(config.column_width, config.margin),
            y: (row as f64).mul_add(config.row_height, config.row_height / 2.0),
            color: config.palette.color(lane).to_string(),
        });
    }

    let lane_count = max_lane.map_or(0, |m| m + 1);
    let size = canvas_size(lane_count, nodes.len(), &config);

    debug!(
        rows = nodes.len(),
        lanes = lane_count,
        width = size.width,
        height = size.height,
        "layout computed"
    );

    Layout {
        nodes,
        through,
        index,
        lane_count,
        size,
        content_hash,
        config,
    }
}

/// `width = max(1, lanes) * column_width + 2 * margin`,
/// `height = rows * row_height + row_height`, both floored at 1.
#[allow(clippy::cast_precision_loss)]
fn canvas_size(lane_count: usize, rows: usize, config: &LayoutConfig) -> CanvasSize {
    let width = (lane_count.max(1) as f64).mul_add(config.column_width, 2.0 * config.margin);
    let height = (rows as f64).mul_add(config.row_height, config.row_height);
    CanvasSize {
        width: width.max(1.0),
        height: height.max(1.0),
    }
}

/// BLAKE3 hash over every field of every commit, in order.
pub(crate) fn compute_content_hash(commits: &[Commit]) -> String {
    let mut hasher = blake3::Hasher::new();
    for commit in commits {
        hasher.update(commit.id.as_bytes());
        hasher.update(b"\x00");
        for parent in &commit.parent_ids {
            hasher.update(parent.as_bytes());
            hasher.update(b"\x01");
        }
        hasher.update(b"\x00");
        hasher.update(commit.author.as_bytes());
        hasher.update(b"\x00");
        hasher.update(commit.message.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&commit.timestamp.to_le_bytes());
        hasher.update(commit.email.as_deref().unwrap_or_default().as_bytes());
        hasher.update(b"\x00");
        hasher.update(commit.date.as_deref().unwrap_or_default().as_bytes());
        hasher.update(b"\x02");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(id: &str, parents: &[&str]) -> Commit {
        Commit::new(id, parents.iter().copied())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_input_has_minimal_canvas() {
        let layout = build_layout(&[], &LayoutConfig::default());
        assert!(layout.is_empty());
        assert_eq!(layout.lane_count(), 0);
        let size = layout.size();
        // one column of width plus both margins; one spare row
        assert!(approx(size.width, 16.0 + 24.0));
        assert!(approx(size.height, 24.0));
        assert_eq!(layout.edges().count(), 0);
    }

    #[test]
    fn coordinates_follow_lane_and_row() {
        let commits = [c("m", &["a", "b"]), c("a", &[]), c("b", &[])];
        let layout = build_layout(&commits, &LayoutConfig::default());
        let b = layout.node("b").expect("b laid out");
        assert_eq!(b.row, 2);
        assert_eq!(b.lane, 1);
        assert!(approx(b.x, 12.0 + 16.0));
        assert!(approx(b.y, 2.0 * 24.0 + 12.0));
        assert_eq!(layout.lane_count(), 2);
        assert!(approx(layout.size().width, 2.0 * 16.0 + 24.0));
        assert!(approx(layout.size().height, 3.0 * 24.0 + 24.0));
    }

    #[test]
    fn color_follows_lane() {
        let commits = [c("m", &["a", "b"]), c("a", &[]), c("b", &[])];
        let cfg = LayoutConfig::default();
        let layout = build_layout(&commits, &cfg);
        for node in layout.nodes() {
            assert_eq!(node.color, cfg.palette.color(node.lane));
        }
    }

    #[test]
    fn edges_are_classified_by_lane() {
        let commits = [c("m", &["a", "b"]), c("a", &[]), c("b", &[])];
        let layout = build_layout(&commits, &LayoutConfig::default());
        let edges: Vec<_> = layout.edges().collect();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].parent, edges[0].kind), ("a", EdgeKind::Straight));
        assert_eq!((edges[1].parent, edges[1].kind), ("b", EdgeKind::Curved));
        assert_eq!(edges[1].parent_index, 1);
        assert!(matches!(edges[1].path, EdgePath::Cubic { .. }));
    }

    #[test]
    fn unresolved_parents_are_reported_not_drawn() {
        let commits = [c("a", &["b", "gone"]), c("b", &["older"])];
        let layout = build_layout(&commits, &LayoutConfig::default());
        assert_eq!(layout.edges().count(), 1);
        let missing: Vec<_> = layout.unresolved_parents().map(|u| u.parent).collect();
        assert_eq!(missing, ["gone", "older"]);
    }

    #[test]
    fn duplicate_id_index_points_at_later_row() {
        let commits = [c("x", &[]), c("x", &[])];
        let layout = build_layout(&commits, &LayoutConfig::default());
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.row_of("x"), Some(1));
    }

    #[test]
    fn through_lanes_record_pending_lines() {
        let commits = [c("m", &["a", "b"]), c("a", &["b"]), c("b", &[])];
        let layout = build_layout(&commits, &LayoutConfig::default());
        assert!(layout.through_lanes(0).is_empty());
        assert_eq!(layout.through_lanes(1), [1]);
        assert!(layout.through_lanes(2).is_empty());
        assert!(layout.through_lanes(99).is_empty());
    }

    #[test]
    fn negative_dimensions_degrade() {
        let cfg = LayoutConfig {
            row_height: -10.0,
            column_width: -3.0,
            margin: -1.0,
            ..LayoutConfig::default()
        };
        let layout = build_layout(&[c("a", &[])], &cfg);
        let node = &layout.nodes()[0];
        assert!(approx(node.x, 0.0));
        assert!(approx(node.y, 0.0));
        assert!(approx(layout.size().width, 1.0));
        assert!(approx(layout.size().height, 1.0));
    }

    #[test]
    fn content_hash_tracks_input() {
        let cfg = LayoutConfig::default();
        let a = build_layout(&[c("a", &["b"]), c("b", &[])], &cfg);
        let b = build_layout(&[c("a", &["b"]), c("b", &[])], &cfg);
        let other = build_layout(&[c("a", &[]), c("b", &[])], &cfg);
        let renamed = build_layout(
            &[c("a", &["b"]).with_author("someone"), c("b", &[])],
            &cfg,
        );
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), other.content_hash());
        assert_ne!(a.content_hash(), renamed.content_hash());
        assert!(a.content_hash().starts_with("blake3:"));
    }

    #[test]
    fn visible_rows_cover_viewport_band() {
        let commits: Vec<_> = (0..10).map(|i| c(&format!("c{i}"), &[])).collect();
        let layout = build_layout(&commits, &LayoutConfig::default());
        assert_eq!(layout.visible_rows(0.0, 24.0), 0..1);
        assert_eq!(layout.visible_rows(30.0, 70.0), 1..3);
        assert_eq!(layout.visible_rows(-50.0, 1000.0), 0..10);
        assert_eq!(layout.visible_rows(500.0, 600.0), 10..10);
        assert_eq!(layout.visible_rows(50.0, 10.0), 0..0);
    }

    #[test]
    fn layout_serializes_nodes_and_size() {
        let layout = build_layout(&[c("a", &[])], &LayoutConfig::default());
        let json = serde_json::to_value(&layout).expect("serialize");
        assert_eq!(json["nodes"][0]["id"], "a");
        assert_eq!(json["nodes"][0]["commit"]["id"], "a");
        assert_eq!(json["nodes"][0]["lane"], 0);
        assert_eq!(json["nodes"][0]["row"], 0);
        assert_eq!(json["nodes"][0]["color"], "#4f8ff7");
        assert_eq!(json["lane_count"], 1);
        assert!(json.get("index").is_none());
    }
}
