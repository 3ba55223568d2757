//! Seams to the external processes that supply history and search content.
//!
//! The core never runs git itself. Callers implement these traits (the CLI
//! shells out to the git binary; tests use in-memory fakes).

mod grep;

use thiserror::Error;

pub use self::grep::{GrepLine, parse_grep_line};
use crate::batch::RevisionBatch;
use crate::signature::GrepPattern;

/// Failures of an external history or content-search process.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran but reported failure.
    #[error("{operation} failed ({status}): {stderr}")]
    Failed {
        /// What the process was asked to do (e.g. `"git grep"`).
        operation: String,
        /// How the process ended, as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

/// Supplies the raw history text and revision list for a repository.
pub trait HistoryOracle {
    /// Full `git log --pretty=fuller --name-only --all` output.
    fn history(&self) -> Result<String, OracleError>;

    /// Full `git rev-list --all` output, one id per line.
    fn revisions(&self) -> Result<String, OracleError>;
}

/// Searches historical file content across a bounded set of revisions.
///
/// Implementations must treat "no matches" as success with empty output.
pub trait ContentSearch: Send + Sync {
    /// Returns zero or more `<commit-id>:<path>:<matched-text>` lines.
    fn search(&self, pattern: &GrepPattern, batch: &RevisionBatch) -> Result<String, OracleError>;
}
