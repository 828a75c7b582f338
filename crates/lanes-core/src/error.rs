use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Machine-readable error codes for tooling that consumes layout failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInput,
    InvalidPalette,
    ConfigParseError,
    ConfigReadFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "E1001",
            Self::InvalidPalette => "E2001",
            Self::ConfigParseError => "E2002",
            Self::ConfigReadFailed => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid commit record",
            Self::InvalidPalette => "Invalid color palette",
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigReadFailed => "Config file could not be read",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidInput => Some(
                "Check the history producer: every record needs an `id` and well-formed `parent_ids`.",
            ),
            Self::InvalidPalette => Some("Configure at least 8 distinct, non-empty colors."),
            Self::ConfigParseError => Some("Fix syntax in .lanes.toml and retry."),
            Self::ConfigReadFailed => Some("Check that the config path exists and is readable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures reported by the layout engine.
///
/// Layout itself is total; these only arise at the input and configuration
/// boundaries.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A commit record is structurally invalid.
    ///
    /// `index` is the record's position in the input sequence when known.
    #[error("invalid commit record{}: {reason}", fmt_index(.index.as_ref()))]
    InvalidInput { index: Option<usize>, reason: String },

    #[error("palette needs at least {min} distinct colors, got {got}")]
    InvalidPalette { min: usize, got: usize },

    #[error("failed to parse config {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn fmt_index(index: Option<&usize>) -> String {
    index.map_or_else(String::new, |i| format!(" at index {i}"))
}

impl LayoutError {
    pub(crate) fn invalid_input(index: Option<usize>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            index,
            reason: reason.into(),
        }
    }

    /// The stable error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::InvalidPalette { .. } => ErrorCode::InvalidPalette,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::ConfigRead { .. } => ErrorCode::ConfigReadFailed,
        }
    }

    /// Human-readable remediation for this failure.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or_else(|| self.error_code().message())
            .to_string()
    }
}
