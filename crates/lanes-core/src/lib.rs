#![forbid(unsafe_code)]
//! lanes-core library.
//!
//! Lays out a topologically ordered commit history as lanes and rows for a
//! DAG renderer, and tracks which commit the user has selected.
//!
//! # Conventions
//!
//! - **Errors**: Fallible boundaries return [`error::LayoutError`]; layout
//!   itself is total.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod selection;

pub use config::LayoutConfig;
pub use engine::CommitGraph;
pub use error::{ErrorCode, LayoutError};
pub use layout::{Layout, build_layout};
pub use model::{Commit, parse_commits};
pub use selection::{Selection, SelectionState};
