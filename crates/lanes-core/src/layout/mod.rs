//! Commit-graph layout.
//!
//! # Overview
//!
//! This module turns an ordered commit sequence (children before parents)
//! into positioned nodes ready for a renderer, and resolves pointer queries
//! against the result.
//!
//! ## Pipeline
//!
//! ```text
//! &[Commit]  (topologically ordered, newest first)
//!        ↓  alloc::LaneAllocator::place()   one forward pass
//! Placement per row (lane, pass-through lanes)
//!        ↓  color::Palette::color(lane)
//!        ↓  build::build_layout()
//! Layout
//!   ├─ nodes: GraphNode { commit, row, lane, x, y, color }
//!   ├─ edges(): derived on demand via the id→row index
//!   └─ size(): canvas extent
//!        ↓  hit::hit_test(x, y)
//! Option<&GraphNode>
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use lanes_core::config::LayoutConfig;
//! use lanes_core::layout::{build_layout, hit_test, EdgeKind};
//! use lanes_core::model::Commit;
//!
//! let commits = vec![
//!     Commit::new("c3", ["c2", "c1"]),
//!     Commit::new("c2", Vec::<String>::new()),
//!     Commit::new("c1", Vec::<String>::new()),
//! ];
//! let layout = build_layout(&commits, &LayoutConfig::default());
//!
//! let kinds: Vec<_> = layout.edges().map(|e| e.kind).collect();
//! assert_eq!(kinds, [EdgeKind::Straight, EdgeKind::Curved]);
//!
//! let c1 = layout.node("c1").unwrap();
//! assert_eq!(hit_test(&layout, c1.x, c1.y).map(|n| n.id()), Some("c1"));
//! ```

pub mod alloc;
pub mod build;
pub mod color;
pub mod edge;
pub mod hit;

// Re-export primary types at module level for convenience.
pub use alloc::{LaneAllocator, Placement, allocate_lanes};
pub use build::{CanvasSize, Edge, GraphNode, Layout, UnresolvedParent, build_layout};
pub use color::{MIN_PALETTE_LEN, Palette};
pub use edge::{EdgeKind, EdgePath, Point};
pub use hit::hit_test;
