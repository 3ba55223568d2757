//! Core engine for git-hunter.
//!
//! Builds an in-memory corpus of commits from repository history and hunts
//! through it for signs of leaked secrets: suspicious commit messages,
//! sensitive file names and, optionally, matching historical file content.
//!
//! # Main Types
//!
//! - [`HistoryParser`] - Turns `git log` output into [`Commit`] records
//! - [`CommitIndex`] - Commits keyed by id, iterated in discovery order
//! - [`SignatureSet`] - Comment and file signatures loaded from a [`SignatureFile`]
//! - [`SearchOrchestrator`] - Runs the concurrent search over a [`ScanSession`]
//! - [`HitSink`] - The single consumer that writes [`Hit`]s to the output
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors:
//!
//! - [`SignatureError`] - Signature compilation failures
//! - [`ConfigError`] - Signature file loading/parsing failures
//! - [`OracleError`] - Failures of the external git processes
//! - [`ScanError`] - Failures during the search phase
//! - [`HunterError`] - Top-level error enum combining the above
//!
//! The CLI crate (`hunter_cli`) uses `anyhow` for error propagation.

/// Revision list parsing and batching for content search.
pub mod batch;
/// Commit and touched-file records.
pub mod commit;
/// Signature files loaded from JSON or TOML.
pub mod config;
/// Numbered commit listing.
pub mod dump;
/// Error types for signatures and the scan pipeline.
pub mod error;
/// Parser for `git log --pretty=fuller --name-only` output.
pub mod history;
/// Match events produced by a scan.
pub mod hit;
/// Commit index keyed by object id.
pub mod index;
/// Traits for the external history and content-search processes.
pub mod oracle;
/// Concurrent search over a scan session.
pub mod orchestrator;
/// Common re-exports for internal use.
pub mod prelude;
/// Comment and file signatures.
pub mod signature;
/// Single-consumer hit output.
pub mod sink;
#[cfg(test)]
pub(crate) mod test_utils;

pub use batch::{BatchError, DEFAULT_BATCH_SIZE, RevisionBatch, batch_revisions, batch_size, parse_revision_list};
pub use commit::{Commit, MatchFile, Timestamp};
pub use config::{CommentSignatureDef, ConfigError, FileSignatureDef, ScanSettings, SignatureFile, SignatureFormat};
pub use dump::write_dump;
pub use error::{HunterError, SignatureError};
pub use history::{
    DateField, DiagnosticKind, HistoryParser, ParseDiagnostic, ParsedHistory, parse_git_date, parse_history,
    parse_history_reader,
};
pub use hit::{Hit, HitKind};
pub use index::CommitIndex;
pub use oracle::{ContentSearch, GrepLine, HistoryOracle, OracleError, parse_grep_line};
pub use orchestrator::{ScanError, ScanOutcome, ScanSession, SearchOrchestrator};
pub use signature::{
    CommentSignature, FileSignature, GrepPattern, PathPart, PathSignature, PatternSignature, SignatureSet,
    SimpleSignature, builtin_file_signatures,
};
pub use sink::{DEFAULT_CHANNEL_CAPACITY, HitRenderer, HitSink, PlainRenderer, SinkReport};

/// Default signature file name.
pub const DEFAULT_PATTERNS_FILE: &str = "patterns.json";
