//! Commit records built from repository history.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Timestamp as recorded by git, keeping the original UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A file path touched by a commit, pre-split into the parts file
/// signatures match against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchFile {
    /// Repository-relative path exactly as reported by git.
    pub path: String,
    /// Final path component.
    pub filename: String,
    /// Extension of the final component without the leading dot, or empty.
    pub extension: String,
}

impl MatchFile {
    /// Wraps a repository-relative path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let as_path = Path::new(&path);

        let filename = as_path
            .file_name()
            .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());
        let extension = as_path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            filename,
            extension,
        }
    }
}

/// A single commit with its metadata, message and touched paths.
///
/// Commits are only created by the history parser and are never mutated
/// once the parser has moved past their terminating boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full object id as printed by git.
    pub id: String,
    /// Author identity (`Name <email>`).
    pub author: String,
    /// Author timestamp, `None` when the date line could not be parsed.
    pub author_date: Option<Timestamp>,
    /// Committer identity (`Name <email>`).
    pub committer: String,
    /// Committer timestamp, `None` when the date line could not be parsed.
    pub commit_date: Option<Timestamp>,
    /// Parent ids listed on a `Merge:` line. Empty for ordinary commits.
    pub parents: Vec<String>,
    /// Commit message with each line trimmed and joined by newlines.
    pub comment: String,
    /// Paths touched by the commit, in the order git listed them.
    pub files: Vec<MatchFile>,
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commit ID: {}", self.id)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Author Date: {}", DisplayDate(self.author_date.as_ref()))?;
        writeln!(f, "Commit: {}", self.committer)?;
        writeln!(f, "Commit Date: {}", DisplayDate(self.commit_date.as_ref()))?;
        writeln!(f, "Comments: {}", self.comment)?;
        writeln!(f, "Files:")?;
        for file in &self.files {
            writeln!(f, "  * {}", file.path)?;
        }
        Ok(())
    }
}

struct DisplayDate<'a>(Option<&'a Timestamp>);

impl fmt::Display for DisplayDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => write!(f, "{}", ts.format(DISPLAY_DATE_FORMAT)),
            None => f.write_str("unknown"),
        }
    }
}
