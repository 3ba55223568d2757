use thiserror::Error;

/// Errors that can occur when building a comment or file signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature's regular expression failed to compile.
    #[error("invalid regex in signature '{description}': {source}")]
    InvalidRegex {
        /// Description of the signature that failed.
        description: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A signature was declared with an empty needle, or a pattern that is
    /// empty once its flag group is removed.
    #[error("signature '{description}' has an empty pattern")]
    EmptyPattern {
        /// Description of the offending signature.
        description: String,
    },
}

/// Top-level error type for the git-hunter pipeline.
///
/// Unifies configuration, signature, batching, oracle and orchestration
/// errors for callers that drive the whole scan.
#[derive(Debug, Error)]
pub enum HunterError {
    /// A signature failed to compile.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The signature file could not be read or parsed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Revision batching was configured with an invalid size.
    #[error(transparent)]
    Batch(#[from] crate::batch::BatchError),

    /// An external history or content-search process failed.
    #[error(transparent)]
    Oracle(#[from] crate::oracle::OracleError),

    /// The search phase failed.
    #[error(transparent)]
    Scan(#[from] crate::orchestrator::ScanError),
}
