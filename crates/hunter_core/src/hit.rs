//! Rendered match events.

use std::fmt::Write as _;

use serde::Serialize;

use crate::commit::{Commit, MatchFile};
use crate::oracle::GrepLine;
use crate::signature::{CommentSignature, FileSignature};

/// Which surface produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    /// A comment signature matched a commit message.
    Comment,
    /// A file signature matched a touched path.
    File,
    /// A comment signature matched historical file content.
    Content,
}

impl HitKind {
    /// Heading printed above the hit.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Comment => "Commit Match",
            Self::File => "File Match",
            Self::Content => "Content Match",
        }
    }
}

/// A single match event, rendered once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Hit {
    kind: HitKind,
    commit: String,
    text: String,
}

impl Hit {
    /// A commit message matched `signature`.
    #[must_use]
    pub fn comment(signature: &CommentSignature, commit: &Commit) -> Self {
        let mut text = describe(signature.description(), signature.remark());
        let _ = write!(text, "{commit}");
        Self::new(HitKind::Comment, commit, text)
    }

    /// A touched path matched `signature`.
    #[must_use]
    pub fn file(signature: &dyn FileSignature, file: &MatchFile, commit: &Commit) -> Self {
        let mut text = describe(signature.description(), signature.remark());
        let _ = writeln!(text, "Matched File: {}", file.path);
        let _ = write!(text, "{commit}");
        Self::new(HitKind::File, commit, text)
    }

    /// Historical content in `commit` matched `signature`.
    #[must_use]
    pub fn content(signature: &CommentSignature, line: &GrepLine<'_>, commit: &Commit) -> Self {
        let mut text = describe(signature.description(), signature.remark());
        let _ = writeln!(text, "Matched File: {}", line.path);
        let _ = writeln!(text, "Matched Line: {}", line.text.trim());
        let _ = write!(text, "{commit}");
        Self::new(HitKind::Content, commit, text)
    }

    fn new(kind: HitKind, commit: &Commit, text: String) -> Self {
        Self {
            kind,
            commit: commit.id.clone(),
            text,
        }
    }

    /// The surface that produced this hit.
    #[must_use]
    pub const fn kind(&self) -> HitKind {
        self.kind
    }

    /// Id of the commit the hit refers to.
    #[must_use]
    pub fn commit_id(&self) -> &str {
        &self.commit
    }

    /// Rendered, human-readable body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn describe(description: &str, remark: Option<&str>) -> String {
    let mut text = format!("Description: {description}\n");
    if let Some(remark) = remark {
        let _ = writeln!(text, "Comment: {remark}");
    }
    text
}
