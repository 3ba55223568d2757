//! Line-driven parser for `git log --pretty=fuller --name-only` output.
//!
//! Each commit block looks like this:
//!
//! ```text
//! commit 3f2a9c...
//! Merge: 1a2b3c4 5d6e7f8
//! Author:     Jane Doe <jane@example.com>
//! AuthorDate: Mon Jan 2 15:04:05 2006 -0700
//! Commit:     Jane Doe <jane@example.com>
//! CommitDate: Mon Jan 2 15:04:05 2006 -0700
//!
//!     Indented commit message
//!
//! path/to/touched/file
//! ```
//!
//! A header line closes the previous block. Only `commit` followed by a full
//! object id counts as a header, since touched paths are printed at column 0
//! too. Paths git C-quoted are unquoted. Malformed dates are recorded as
//! diagnostics and never abort parsing.

use std::borrow::Cow;
use std::fmt;
use std::io::BufRead;

use chrono::DateTime;
use tracing::{debug, trace};

use crate::commit::{Commit, MatchFile, Timestamp};

const COMMIT_HEADER: &str = "commit ";
const MERGE_PREFIX: &str = "Merge:";
const AUTHOR_PREFIX: &str = "Author:";
const AUTHOR_DATE_PREFIX: &str = "AuthorDate:";
const COMMITTER_PREFIX: &str = "Commit:";
const COMMIT_DATE_PREFIX: &str = "CommitDate:";

/// `<weekday> <month> <day> <HH:MM:SS> <year> <±HHMM>`, as printed by git.
const GIT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Which timestamp a date line was meant to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// The `AuthorDate:` line.
    Author,
    /// The `CommitDate:` line.
    Committer,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author => f.write_str("author date"),
            Self::Committer => f.write_str("commit date"),
        }
    }
}

/// A non-fatal anomaly encountered while parsing history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A date line did not match the expected git format.
    InvalidDate {
        /// The field that was left unset.
        field: DateField,
        /// The raw value that failed to parse.
        value: String,
    },
    /// A non-empty line appeared before the first commit header.
    OrphanLine(String),
}

/// A diagnostic tied to the one-based line it was raised on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// One-based line number in the history stream.
    pub line: usize,
    /// What went wrong.
    pub kind: DiagnosticKind,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::InvalidDate { field, value } => {
                write!(f, "line {}: cannot parse {field} from '{value}'", self.line)
            }
            DiagnosticKind::OrphanLine(text) => {
                write!(f, "line {}: '{text}' appears before any commit header", self.line)
            }
        }
    }
}

/// Commits and diagnostics produced from a complete history stream.
#[derive(Debug, Default)]
pub struct ParsedHistory {
    /// Finalized commits in stream order.
    pub commits: Vec<Commit>,
    /// Non-fatal anomalies, in the order they were found.
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[derive(Debug)]
struct PendingCommit {
    commit: Commit,
    comment: String,
}

impl PendingCommit {
    fn start(id: &str) -> Self {
        Self {
            commit: Commit {
                id: id.to_string(),
                author: String::new(),
                author_date: None,
                committer: String::new(),
                commit_date: None,
                parents: Vec::new(),
                comment: String::new(),
                files: Vec::new(),
            },
            comment: String::new(),
        }
    }

    fn finalize(mut self) -> Commit {
        self.commit.comment = self.comment.trim().to_string();
        self.commit
    }
}

/// Streaming history parser.
///
/// Feed lines with [`push_line`](Self::push_line); each call returns the
/// previous commit once a new header closes it. Call
/// [`finish`](Self::finish) at end of stream to flush the last commit.
#[derive(Debug, Default)]
pub struct HistoryParser {
    pending: Option<PendingCommit>,
    line_number: usize,
    diagnostics: Vec<ParseDiagnostic>,
}

impl HistoryParser {
    /// Creates a parser that has not yet seen any commit header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line (without its trailing newline).
    ///
    /// Returns the previous commit when `line` is a header that closes it.
    pub fn push_line(&mut self, line: &str) -> Option<Commit> {
        self.line_number += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(id) = header_id(line) {
            return self.start_commit(id);
        }

        let Some(pending) = self.pending.as_mut() else {
            if !line.trim().is_empty() {
                self.record(DiagnosticKind::OrphanLine(line.to_string()));
            }
            return None;
        };

        if let Some(rest) = line.strip_prefix(AUTHOR_DATE_PREFIX) {
            let parsed = parse_git_date(rest);
            pending.commit.author_date = parsed;
            if parsed.is_none() {
                self.record_invalid_date(DateField::Author, rest);
            }
        } else if let Some(rest) = line.strip_prefix(COMMIT_DATE_PREFIX) {
            let parsed = parse_git_date(rest);
            pending.commit.commit_date = parsed;
            if parsed.is_none() {
                self.record_invalid_date(DateField::Committer, rest);
            }
        } else if let Some(rest) = line.strip_prefix(AUTHOR_PREFIX) {
            pending.commit.author = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(COMMITTER_PREFIX) {
            pending.commit.committer = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(MERGE_PREFIX) {
            pending.commit.parents = rest.split_whitespace().map(str::to_string).collect();
        } else if line.starts_with(char::is_whitespace) {
            pending.comment.push_str(line.trim());
            pending.comment.push('\n');
        } else if !line.is_empty() {
            pending.commit.files.push(MatchFile::new(unquote_path(line)));
        }

        None
    }

    /// Flushes the in-progress commit at end of stream.
    ///
    /// Returns `None` if no commit header was ever seen.
    pub fn finish(&mut self) -> Option<Commit> {
        self.pending.take().map(PendingCommit::finalize)
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// Consumes the parser and returns its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<ParseDiagnostic> {
        self.diagnostics
    }

    fn start_commit(&mut self, id: &str) -> Option<Commit> {
        trace!(line = self.line_number, id, "commit header");

        self.pending
            .replace(PendingCommit::start(id))
            .map(PendingCommit::finalize)
    }

    fn record_invalid_date(&mut self, field: DateField, value: &str) {
        self.record(DiagnosticKind::InvalidDate {
            field,
            value: value.trim().to_string(),
        });
    }

    fn record(&mut self, kind: DiagnosticKind) {
        let diagnostic = ParseDiagnostic {
            line: self.line_number,
            kind,
        };
        debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// Returns the object id if `line` is a commit header.
///
/// The id must be a full SHA-1 or SHA-256 hex id, optionally followed by a
/// ` (decorations)` suffix.
fn header_id(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(COMMIT_HEADER)?;
    let (id, tail) = rest.split_once(' ').unwrap_or((rest, ""));

    let is_object_id =
        matches!(id.len(), 40 | 64) && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    let tail_ok = tail.is_empty() || tail.starts_with('(');

    (is_object_id && tail_ok).then_some(id)
}

/// Undoes git's C-style quoting of a path line such as `"cl\303\251.pem"`.
///
/// Unquoted lines are returned as they are. Octal escapes are raw bytes, so
/// multi-byte UTF-8 sequences are reassembled before decoding.
fn unquote_path(line: &str) -> Cow<'_, str> {
    let Some(inner) = line.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        return Cow::Borrowed(line);
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.as_bytes();

    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }

        let Some((&escape, tail)) = rest.split_first() else {
            bytes.push(b'\\');
            break;
        };
        rest = tail;

        match escape {
            b'a' => bytes.push(0x07),
            b'b' => bytes.push(0x08),
            b't' => bytes.push(b'\t'),
            b'n' => bytes.push(b'\n'),
            b'v' => bytes.push(0x0b),
            b'f' => bytes.push(0x0c),
            b'r' => bytes.push(b'\r'),
            b'0'..=b'3' if rest.len() >= 2 && rest[..2].iter().all(|b| matches!(b, b'0'..=b'7')) => {
                let value = (escape - b'0') * 64 + (rest[0] - b'0') * 8 + (rest[1] - b'0');
                bytes.push(value);
                rest = &rest[2..];
            }
            other => bytes.push(other),
        }
    }

    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses a complete history text into commits.
#[must_use]
pub fn parse_history(text: &str) -> ParsedHistory {
    let mut parser = HistoryParser::new();
    let mut commits: Vec<Commit> = text.lines().filter_map(|line| parser.push_line(line)).collect();
    commits.extend(parser.finish());

    ParsedHistory {
        commits,
        diagnostics: parser.into_diagnostics(),
    }
}

/// Parses history from a buffered reader, line by line.
pub fn parse_history_reader<R: BufRead>(reader: R) -> std::io::Result<ParsedHistory> {
    let mut parser = HistoryParser::new();
    let mut commits = Vec::new();

    for line in reader.lines() {
        commits.extend(parser.push_line(&line?));
    }
    commits.extend(parser.finish());

    Ok(ParsedHistory {
        commits,
        diagnostics: parser.into_diagnostics(),
    })
}

/// Parses a git `fuller` date value such as `Mon Jan 2 15:04:05 2006 -0700`.
#[must_use]
pub fn parse_git_date(value: &str) -> Option<Timestamp> {
    let normalised = value.split_whitespace().collect::<Vec<_>>().join(" ");
    DateTime::parse_from_str(&normalised, GIT_DATE_FORMAT).ok()
}
