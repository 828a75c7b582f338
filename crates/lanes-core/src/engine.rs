//! Single-owner engine instance.
//!
//! [`CommitGraph`] holds the current configuration, the most recent
//! [`Layout`], and a long-lived [`SelectionState`]. The layout's nodes are
//! the only copy of the commit sequence. Every input change recomputes the
//! layout from scratch unless its content hash matches the current one;
//! selection is never touched by a re-layout. The engine does no locking: a
//! multi-threaded host must serialize access to one instance itself.

use tracing::{debug, info, instrument};

use crate::config::LayoutConfig;
use crate::layout::build::{
    Edge, GraphNode, Layout, build_layout, build_layout_owned, compute_content_hash,
};
use crate::layout::hit::hit_test;
use crate::model::Commit;
use crate::selection::SelectionState;

#[derive(Debug, Clone)]
pub struct CommitGraph {
    config: LayoutConfig,
    layout: Layout,
    selection: SelectionState,
    /// Number of layout passes run since construction.
    generation: u64,
}

impl Default for CommitGraph {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl CommitGraph {
    /// An engine with no commits.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        let layout = build_layout(&[], &config);
        Self {
            config,
            layout,
            selection: SelectionState::new(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_commits(config: LayoutConfig, commits: Vec<Commit>) -> Self {
        let mut graph = Self::new(config);
        graph.set_commits(commits);
        graph
    }

    /// Replace the commit sequence and re-layout.
    ///
    /// Returns `false` when the new sequence is identical to the current one
    /// and the layout was kept.
    #[instrument(skip(self, commits), fields(count = commits.len()))]
    pub fn set_commits(&mut self, commits: Vec<Commit>) -> bool {
        let content_hash = compute_content_hash(&commits);
        if content_hash == self.layout.content_hash() {
            debug!("commit sequence unchanged, keeping layout");
            return false;
        }
        self.layout = build_layout_owned(commits, &self.config, content_hash);
        self.generation += 1;
        info!(
            rows = self.layout.len(),
            lanes = self.layout.lane_count(),
            generation = self.generation,
            "commit graph relaid out"
        );
        true
    }

    /// Replace the configuration and re-layout the current commits.
    pub fn set_config(&mut self, config: LayoutConfig) {
        if config == self.config {
            return;
        }
        self.config = config;
        let commits: Vec<Commit> = self.commits().cloned().collect();
        self.layout = build_layout(&commits, &self.config);
        self.generation += 1;
        debug!(generation = self.generation, "config changed, layout recomputed");
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The current commit sequence, in row order.
    pub fn commits(&self) -> impl Iterator<Item = &Commit> + '_ {
        self.layout.nodes().iter().map(|node| &node.commit)
    }

    /// Number of layout passes run so far; unchanged input leaves it as is.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.layout.edges()
    }

    /// Id of the node at `(x, y)`, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        hit_test(&self.layout, x, y).map(GraphNode::id)
    }

    /// Select whatever is at `(x, y)`; a miss leaves the selection alone.
    pub fn click(&mut self, x: f64, y: f64) -> Option<&str> {
        self.selection.select_at(&self.layout, x, y).map(GraphNode::id)
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selection.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    /// The selected node, when it is part of the current layout.
    #[must_use]
    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selection.selected_node(&self.layout)
    }

    /// Jump the selection to the selected commit's primary parent.
    pub fn select_primary_parent(&mut self) -> Option<&str> {
        self.selection.select_primary_parent(&self.layout)
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }
}
