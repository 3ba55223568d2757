//! Signatures matched against commit messages.

use regex::Regex;

use super::dialect::GrepPattern;
use crate::error::SignatureError;

/// Case-insensitive substring signature.
#[derive(Debug, Clone)]
pub struct SimpleSignature {
    needle: String,
    folded: String,
    description: String,
    remark: Option<String>,
}

impl SimpleSignature {
    /// Creates a simple signature. Empty needles are rejected.
    pub fn new(
        needle: impl Into<String>,
        description: impl Into<String>,
        remark: Option<String>,
    ) -> Result<Self, SignatureError> {
        let needle = needle.into();
        let description = description.into();

        if needle.is_empty() {
            return Err(SignatureError::EmptyPattern { description });
        }

        Ok(Self {
            folded: needle.to_lowercase(),
            needle,
            description,
            remark: remark.filter(|r| !r.is_empty()),
        })
    }

    /// Returns `true` if `text` contains the needle, ignoring case.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }
}

/// Regular-expression signature, compiled once at construction.
#[derive(Debug, Clone)]
pub struct PatternSignature {
    source: String,
    regex: Regex,
    description: String,
    remark: Option<String>,
}

impl PatternSignature {
    /// Compiles a pattern signature.
    ///
    /// A pattern that is empty once its leading flag group is removed is
    /// rejected, since it would match every line of every revision.
    pub fn new(
        source: impl Into<String>,
        description: impl Into<String>,
        remark: Option<String>,
    ) -> Result<Self, SignatureError> {
        let source = source.into();
        let description = description.into();

        if GrepPattern::from_dialect(&source).pattern.is_empty() {
            return Err(SignatureError::EmptyPattern { description });
        }

        let regex = Regex::new(&source).map_err(|source| SignatureError::InvalidRegex {
            description: description.clone(),
            source,
        })?;

        Ok(Self {
            source,
            regex,
            description,
            remark: remark.filter(|r| !r.is_empty()),
        })
    }

    /// Returns `true` if the regex matches anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A signature flagging suspicious commit messages and file content.
#[derive(Debug, Clone)]
pub enum CommentSignature {
    /// Case-insensitive substring.
    Simple(SimpleSignature),
    /// Unanchored regular expression.
    Pattern(PatternSignature),
}

impl CommentSignature {
    /// Tests the signature against a commit message.
    #[must_use]
    pub fn is_match(&self, comment: &str) -> bool {
        match self {
            Self::Simple(s) => s.is_match(comment),
            Self::Pattern(p) => p.is_match(comment),
        }
    }

    /// Human-readable description shown with every hit.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Simple(s) => &s.description,
            Self::Pattern(p) => &p.description,
        }
    }

    /// Optional extra note shown with every hit.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        match self {
            Self::Simple(s) => s.remark.as_deref(),
            Self::Pattern(p) => p.remark.as_deref(),
        }
    }

    /// The pattern text exactly as it was configured.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Simple(s) => &s.needle,
            Self::Pattern(p) => &p.source,
        }
    }

    /// The equivalent pattern for the content-search oracle.
    #[must_use]
    pub fn grep_pattern(&self) -> GrepPattern {
        match self {
            Self::Simple(s) => GrepPattern::literal(&s.needle),
            Self::Pattern(p) => GrepPattern::from_dialect(&p.source),
        }
    }
}

impl From<SimpleSignature> for CommentSignature {
    fn from(signature: SimpleSignature) -> Self {
        Self::Simple(signature)
    }
}

impl From<PatternSignature> for CommentSignature {
    fn from(signature: PatternSignature) -> Self {
        Self::Pattern(signature)
    }
}
