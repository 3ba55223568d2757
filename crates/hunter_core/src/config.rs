//! Signature files and scan tuning loaded from disk.
//!
//! Two formats are accepted, chosen by extension:
//!
//! - JSON (`patterns.json`), the long-standing layout with `Simples` and
//!   `Patterns` arrays of `{ "Pattern", "Description", "Comment" }` objects;
//! - TOML (`*.toml`), the same fields in lowercase plus optional custom
//!   file signatures and a `[scan]` table.
//!
//! ```toml
//! builtin_file_signatures = true
//!
//! [[simples]]
//! pattern = "oops"
//! description = "Accidental commit"
//!
//! [[patterns]]
//! pattern = "(?i)[vw]ulnerability"
//! description = "Vulnerability mention"
//!
//! [[files]]
//! part = "extension"
//! pattern = "kdbx"
//! description = "KeePass database"
//!
//! [scan]
//! batch_size = 256
//! content_jobs = 2
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SignatureError;
use crate::signature::{
    CommentSignature, FileSignature, PathPart, PathSignature, PatternSignature, SignatureSet, SimpleSignature,
    builtin_file_signatures,
};

/// A comment signature as written in a signature file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSignatureDef {
    /// Substring needle for simples, regular expression for patterns.
    #[serde(alias = "Pattern")]
    pub pattern: String,
    /// Text shown with every hit.
    #[serde(alias = "Description")]
    pub description: String,
    /// Optional extra note shown with every hit.
    #[serde(default, alias = "Comment")]
    pub comment: Option<String>,
}

/// A custom file signature as written in a signature file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignatureDef {
    /// Which part of the touched path is inspected.
    #[serde(alias = "Part")]
    pub part: PathPart,
    /// Exact value, or a regular expression when `regex` is set.
    #[serde(alias = "Pattern")]
    pub pattern: String,
    /// Treat `pattern` as a regular expression.
    #[serde(default, alias = "Regex")]
    pub regex: bool,
    /// Text shown with every hit.
    #[serde(alias = "Description")]
    pub description: String,
    /// Optional extra note shown with every hit.
    #[serde(default, alias = "Comment")]
    pub comment: Option<String>,
}

impl FileSignatureDef {
    /// Compiles this definition into a [`PathSignature`].
    pub fn compile(&self) -> Result<PathSignature, SignatureError> {
        if self.regex {
            PathSignature::regex(self.part, &self.pattern, &self.description, self.comment.clone())
        } else {
            PathSignature::exact(self.part, &self.pattern, &self.description, self.comment.clone())
        }
    }
}

/// Tuning for the search phase. Unset values fall back to the defaults,
/// and command-line flags override anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Revisions per content-search invocation.
    #[serde(default)]
    pub batch_size: Option<usize>,
    /// Concurrent content-search invocations.
    #[serde(default)]
    pub content_jobs: Option<usize>,
    /// Hits buffered between producers and the output writer.
    #[serde(default)]
    pub channel_capacity: Option<usize>,
}

/// Contents of a signature file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureFile {
    /// Case-insensitive substring signatures.
    #[serde(default, alias = "Simples")]
    pub simples: Vec<CommentSignatureDef>,

    /// Regular-expression signatures.
    #[serde(default, alias = "Patterns")]
    pub patterns: Vec<CommentSignatureDef>,

    /// Custom file signatures, applied after the built-in ones.
    #[serde(default, alias = "Files")]
    pub files: Vec<FileSignatureDef>,

    /// Whether the built-in sensitive-file signatures are used.
    #[serde(default = "default_true", alias = "BuiltinFileSignatures")]
    pub builtin_file_signatures: bool,

    /// Search-phase tuning.
    #[serde(default, alias = "Scan")]
    pub scan: ScanSettings,
}

const fn default_true() -> bool {
    true
}

impl Default for SignatureFile {
    fn default() -> Self {
        Self {
            simples: Vec::new(),
            patterns: Vec::new(),
            files: Vec::new(),
            builtin_file_signatures: true,
            scan: ScanSettings::default(),
        }
    }
}

/// Format of a signature file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    /// `patterns.json` layout. Used for every extension except `.toml`.
    Json,
    /// TOML layout.
    Toml,
}

impl SignatureFormat {
    /// Picks the format for `path`.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl SignatureFile {
    /// Reads and parses a signature file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file = match SignatureFormat::for_path(path) {
            SignatureFormat::Json => serde_json::from_str(&content).map_err(|source| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            }),
            SignatureFormat::Toml => toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            }),
        }?;

        debug!(path = %path.display(), "loaded signature file");
        Ok(file)
    }

    /// Parses the JSON layout from a string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::ParseJson {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Parses the TOML layout from a string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ParseToml {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Compiles every definition into a [`SignatureSet`].
    ///
    /// Comment signatures are ordered simples first, then patterns. File
    /// signatures are the built-ins (when enabled) followed by custom ones.
    /// Fails on the first invalid definition.
    pub fn compile(&self) -> Result<SignatureSet, SignatureError> {
        let mut comment = Vec::with_capacity(self.simples.len() + self.patterns.len());
        for def in &self.simples {
            let signature = SimpleSignature::new(&def.pattern, &def.description, def.comment.clone())?;
            comment.push(CommentSignature::from(signature));
        }
        for def in &self.patterns {
            let signature = PatternSignature::new(&def.pattern, &def.description, def.comment.clone())?;
            comment.push(CommentSignature::from(signature));
        }

        let mut files: Vec<Box<dyn FileSignature>> = Vec::new();
        if self.builtin_file_signatures {
            files.extend(
                builtin_file_signatures()?
                    .into_iter()
                    .map(|s| Box::new(s) as Box<dyn FileSignature>),
            );
        }
        for def in &self.files {
            files.push(Box::new(def.compile()?));
        }

        debug!(
            comment_signatures = comment.len(),
            file_signatures = files.len(),
            "compiled signatures"
        );
        Ok(SignatureSet::new(comment, files))
    }
}

/// Errors that can occur when reading or parsing a signature file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read from disk.
    #[error("failed to read signature file '{path}': {source}")]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contained invalid JSON or unexpected values.
    #[error("failed to parse signature file '{path}': {source}")]
    ParseJson {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The file contained invalid TOML or unexpected values.
    #[error("failed to parse signature file '{path}': {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Returns the file path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::ParseJson { path, .. } | Self::ParseToml { path, .. } => path,
        }
    }
}
