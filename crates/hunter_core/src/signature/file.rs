//! Signatures matched against touched file paths.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::commit::MatchFile;
use crate::error::SignatureError;

/// A predicate over touched files, with the text reported on a match.
pub trait FileSignature: fmt::Debug + Send + Sync {
    /// Returns `true` if `file` should be reported.
    fn is_match(&self, file: &MatchFile) -> bool;

    /// Human-readable description shown with every hit.
    fn description(&self) -> &str;

    /// Optional extra note shown with every hit.
    fn remark(&self) -> Option<&str>;
}

/// Which part of a path a [`PathSignature`] inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPart {
    /// The full repository-relative path.
    Path,
    /// The final path component.
    Filename,
    /// The extension of the final component, without the dot.
    Extension,
}

impl PathPart {
    fn select<'a>(self, file: &'a MatchFile) -> &'a str {
        match self {
            Self::Path => &file.path,
            Self::Filename => &file.filename,
            Self::Extension => &file.extension,
        }
    }
}

#[derive(Debug, Clone)]
enum PathMatcher {
    /// ASCII case-insensitive equality.
    Exact(String),
    Regex(Regex),
}

/// File signature matching one part of a path exactly or by regex.
#[derive(Debug, Clone)]
pub struct PathSignature {
    part: PathPart,
    matcher: PathMatcher,
    description: String,
    remark: Option<String>,
}

impl PathSignature {
    /// Matches `part` against `value` exactly, ignoring ASCII case.
    pub fn exact(
        part: PathPart,
        value: impl Into<String>,
        description: impl Into<String>,
        remark: Option<String>,
    ) -> Result<Self, SignatureError> {
        let value = value.into();
        let description = description.into();

        if value.is_empty() {
            return Err(SignatureError::EmptyPattern { description });
        }

        Ok(Self {
            part,
            matcher: PathMatcher::Exact(value),
            description,
            remark: remark.filter(|r| !r.is_empty()),
        })
    }

    /// Matches `part` against a regular expression.
    pub fn regex(
        part: PathPart,
        pattern: &str,
        description: impl Into<String>,
        remark: Option<String>,
    ) -> Result<Self, SignatureError> {
        let description = description.into();
        let regex = Regex::new(pattern).map_err(|source| SignatureError::InvalidRegex {
            description: description.clone(),
            source,
        })?;

        Ok(Self {
            part,
            matcher: PathMatcher::Regex(regex),
            description,
            remark: remark.filter(|r| !r.is_empty()),
        })
    }

    /// The path part this signature inspects.
    #[must_use]
    pub const fn part(&self) -> PathPart {
        self.part
    }
}

impl FileSignature for PathSignature {
    fn is_match(&self, file: &MatchFile) -> bool {
        let haystack = self.part.select(file);
        match &self.matcher {
            PathMatcher::Exact(value) => haystack.eq_ignore_ascii_case(value),
            PathMatcher::Regex(regex) => regex.is_match(haystack),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}
