//! Revision list parsing and bounded batching for content search.
//!
//! `git grep` receives one argument per revision. Searching the whole
//! history in one invocation risks argument-list limits, so revisions are
//! always handed over in bounded, order-preserving batches.

use std::num::NonZeroUsize;
use std::ops::Deref;

use thiserror::Error;

/// Default number of revisions passed to one content-search invocation.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Errors raised when configuring revision batching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// A batch size of zero cannot partition anything.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
}

/// Validates a user-supplied batch size.
pub fn batch_size(value: usize) -> Result<NonZeroUsize, BatchError> {
    NonZeroUsize::new(value).ok_or(BatchError::ZeroBatchSize)
}

/// A non-empty, ordered slice of the revision list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionBatch(Vec<String>);

impl RevisionBatch {
    /// The revision ids in this batch.
    #[must_use]
    pub fn revisions(&self) -> &[String] {
        &self.0
    }
}

impl Deref for RevisionBatch {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Splits `git rev-list` output into revision ids.
///
/// Blank lines, including the element produced by a trailing newline, are
/// dropped so they never reach the oracle as empty arguments.
#[must_use]
pub fn parse_revision_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partitions `revisions` into consecutive batches of at most `size`.
///
/// The last batch may be smaller. Concatenating the batches reproduces the
/// input exactly.
#[must_use]
pub fn batch_revisions(revisions: &[String], size: NonZeroUsize) -> Vec<RevisionBatch> {
    revisions
        .chunks(size.get())
        .map(|chunk| RevisionBatch(chunk.to_vec()))
        .collect()
}
