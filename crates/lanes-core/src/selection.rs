//! Selected-commit state.
//!
//! Selection lives outside any layout pass: re-laying out never touches it,
//! and it accepts ids that are not (yet) in the current layout so that
//! "jump to parent" can target a commit before it scrolls into view.

use serde::Serialize;
use tracing::debug;

use crate::layout::build::{GraphNode, Layout};
use crate::layout::hit::hit_test;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Selection::NoSelection,
        }
    }

    #[must_use]
    pub const fn current(&self) -> &Selection {
        &self.current
    }

    /// The selected id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.current {
            Selection::NoSelection => None,
            Selection::Selected(id) => Some(id),
        }
    }

    /// Select `id` unconditionally.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(%id, "select");
        self.current = Selection::Selected(id);
    }

    pub fn clear(&mut self) {
        debug!("clear selection");
        self.current = Selection::NoSelection;
    }

    /// Hit-test `(x, y)` and select the node found.
    ///
    /// A miss leaves the selection unchanged and returns `None`.
    pub fn select_at<'a>(&mut self, layout: &'a Layout, x: f64, y: f64) -> Option<&'a GraphNode> {
        let node = hit_test(layout, x, y)?;
        self.select(node.id());
        Some(node)
    }

    /// Move the selection to the primary parent of the selected commit.
    ///
    /// The parent does not need to be part of `layout`. Returns the newly
    /// selected id, or `None` (selection unchanged) when nothing is selected,
    /// the selected commit is not in `layout`, or it has no parents.
    pub fn select_primary_parent(&mut self, layout: &Layout) -> Option<&str> {
        let parent = layout
            .node(self.selected()?)?
            .commit
            .primary_parent()?
            .to_string();
        self.select(parent);
        self.selected()
    }

    /// The selected node, if the selected id is present in `layout`.
    #[must_use]
    pub fn selected_node<'a>(&self, layout: &'a Layout) -> Option<&'a GraphNode> {
        layout.node(self.selected()?)
    }
}
