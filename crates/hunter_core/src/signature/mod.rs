//! Comment and file signatures and the set that holds them.

mod builtin;
mod comment;
mod dialect;
mod file;

pub use self::builtin::builtin_file_signatures;
pub use self::comment::{CommentSignature, PatternSignature, SimpleSignature};
pub use self::dialect::GrepPattern;
pub use self::file::{FileSignature, PathPart, PathSignature};

/// Every signature used by a scan. Populated once, read-only afterwards.
#[derive(Debug, Default)]
pub struct SignatureSet {
    comment: Vec<CommentSignature>,
    files: Vec<Box<dyn FileSignature>>,
}

impl SignatureSet {
    /// Creates a set from already-compiled signatures.
    #[must_use]
    pub fn new(comment: Vec<CommentSignature>, files: Vec<Box<dyn FileSignature>>) -> Self {
        Self { comment, files }
    }

    /// Comment signatures in declaration order.
    #[must_use]
    pub fn comment_signatures(&self) -> &[CommentSignature] {
        &self.comment
    }

    /// File signatures in declaration order.
    #[must_use]
    pub fn file_signatures(&self) -> &[Box<dyn FileSignature>] {
        &self.files
    }

    /// Returns every comment signature that matches `text`.
    #[must_use]
    pub fn match_comment(&self, text: &str) -> Vec<&CommentSignature> {
        self.comment.iter().filter(|s| s.is_match(text)).collect()
    }

    /// Returns every file signature that matches `file`.
    #[must_use]
    pub fn match_file(&self, file: &crate::commit::MatchFile) -> Vec<&dyn FileSignature> {
        self.files
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| s.is_match(file))
            .collect()
    }

    /// Returns `true` if the set holds no signatures at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comment.is_empty() && self.files.is_empty()
    }
}
