//! Effective scan tuning: command-line flags over the signature file over
//! built-in defaults.

use std::num::NonZeroUsize;

use anyhow::Context as _;
use hunter_core::{DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_CAPACITY, ScanSettings, batch_size};

/// Tuning values resolved for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    /// Revisions per `git grep` invocation.
    pub batch_size: NonZeroUsize,
    /// Concurrent `git grep` invocations.
    pub content_jobs: NonZeroUsize,
    /// Hits buffered before producers block.
    pub channel_capacity: usize,
}

/// Tuning values given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// `--batch-size`.
    pub batch_size: Option<usize>,
    /// `--content-jobs`.
    pub content_jobs: Option<usize>,
}

impl Tuning {
    /// Merges command-line overrides with the signature file's `[scan]` table.
    pub fn resolve(overrides: Overrides, file: &ScanSettings) -> anyhow::Result<Self> {
        let batch_size = match overrides.batch_size.or(file.batch_size) {
            Some(value) => batch_size(value).context("invalid batch size")?,
            None => DEFAULT_BATCH_SIZE,
        };

        let content_jobs = match overrides.content_jobs.or(file.content_jobs) {
            Some(value) => NonZeroUsize::new(value).context("content jobs must be at least 1")?,
            None => NonZeroUsize::MIN,
        };

        Ok(Self {
            batch_size,
            content_jobs,
            channel_capacity: file.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY),
        })
    }
}
