//! Commit records and the input boundary.
//!
//! The layout engine trusts its input to be topologically ordered (children
//! before parents) and does no DAG validation. The only checks performed here
//! are structural: every record must carry a usable `id`, and every parent
//! reference must be a well-formed commit reference. Anything else (dangling
//! parents, duplicate ids) is absorbed later by the layout pass.
//!
//! Records are decoded through `RawCommit`, whose `id` is optional, so that
//! a missing id surfaces as [`LayoutError::InvalidInput`] with the record
//! index rather than as an opaque deserialization failure.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::LayoutError;

/// Length of the abbreviated id shown by renderers.
pub const SHORT_ID_LEN: usize = 7;

/// A single commit from the history being laid out.
///
/// Only `id` and `parent_ids` drive the layout. The remaining fields are
/// carried through to the rendering consumer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    /// Parent ids; the first entry is the primary parent.
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub message: String,
    /// Unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Preformatted date string from the history producer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Commit {
    /// Create a commit with the given id and parents and empty metadata.
    pub fn new<I, S>(id: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            parent_ids: parents.into_iter().map(Into::into).collect(),
            author: String::new(),
            message: String::new(),
            timestamp: 0,
            email: None,
            date: None,
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The primary parent, i.e. the branch this commit continues.
    #[must_use]
    pub fn primary_parent(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }

    /// Parents beyond the first (joined branches).
    #[must_use]
    pub fn merge_parents(&self) -> &[String] {
        self.parent_ids.get(1..).unwrap_or_default()
    }

    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Abbreviated id for display (first [`SHORT_ID_LEN`] characters).
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.id.as_str(), |(end, _)| &self.id[..end])
    }

    /// First line of the commit message.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim_end()
    }

    /// Check that this record is structurally usable.
    ///
    /// `index` is the record's position in its input sequence and is only
    /// used to annotate the error.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidInput`] if the id is not a valid commit
    /// reference or any parent reference is empty or malformed.
    pub fn validate(&self, index: Option<usize>) -> Result<(), LayoutError> {
        if !is_valid_ref(&self.id) {
            return Err(LayoutError::invalid_input(
                index,
                format!("malformed commit id {:?}", self.id),
            ));
        }
        for (pos, parent) in self.parent_ids.iter().enumerate() {
            if !is_valid_ref(parent) {
                return Err(LayoutError::invalid_input(
                    index,
                    format!("commit {} has malformed parent #{pos}: {parent:?}", self.id),
                ));
            }
        }
        Ok(())
    }
}

/// A commit reference is any non-empty string without whitespace or control
/// characters. Hex is not required so that synthetic ids stay usable.
fn is_valid_ref(reference: &str) -> bool {
    !reference.is_empty()
        && !reference
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
}

/// Wire shape of an input record, before validation.
#[derive(Debug, Deserialize)]
struct RawCommit {
    #[serde(default, alias = "sha")]
    id: Option<String>,
    #[serde(default)]
    parent_ids: Vec<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl RawCommit {
    fn into_commit(self, index: usize) -> Result<Commit, LayoutError> {
        let Some(id) = self.id else {
            return Err(LayoutError::invalid_input(Some(index), "missing id"));
        };
        let commit = Commit {
            id,
            parent_ids: self.parent_ids,
            author: self.author,
            message: self.message,
            timestamp: self.timestamp,
            email: self.email.filter(|e| !e.is_empty()),
            date: self.date,
        };
        commit.validate(Some(index))?;
        Ok(commit)
    }
}

/// Parse and validate a JSON array of commit records.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidInput`] if the document is not an array of
/// records, or if any record fails [`Commit::validate`].
#[instrument(skip(json), fields(bytes = json.len()))]
pub fn parse_commits(json: &str) -> Result<Vec<Commit>, LayoutError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| LayoutError::invalid_input(None, format!("expected a JSON array: {e}")))?;
    decode_records(values)
}

/// Read, parse and validate a JSON array of commit records.
///
/// # Errors
///
/// Same as [`parse_commits`]; I/O failures are reported as invalid input.
pub fn read_commits(reader: impl Read) -> Result<Vec<Commit>, LayoutError> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)
        .map_err(|e| LayoutError::invalid_input(None, format!("expected a JSON array: {e}")))?;
    decode_records(values)
}

fn decode_records(values: Vec<serde_json::Value>) -> Result<Vec<Commit>, LayoutError> {
    let commits = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let raw: RawCommit = serde_json::from_value(value)
                .map_err(|e| LayoutError::invalid_input(Some(index), e.to_string()))?;
            raw.into_commit(index)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = commits.len(), "decoded commit records");
    Ok(commits)
}
