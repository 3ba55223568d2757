//! CLI command handlers.

/// Numbered listing of every commit.
pub mod dump;
/// Signature search over commit messages, paths and content.
pub mod scan;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;
use hunter_core::{CommitIndex, HistoryOracle, parse_history};
use tracing::{debug, info};

use crate::git::GitRepo;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;

/// Reads the full history of `repo` into a commit index.
pub fn load_index(repo: &GitRepo) -> Result<CommitIndex> {
    let text = repo.history().context("reading repository history")?;
    let parsed = parse_history(&text);

    if !parsed.diagnostics.is_empty() {
        debug!(count = parsed.diagnostics.len(), "history parsed with diagnostics");
    }
    info!(commits = parsed.commits.len(), "history loaded");

    Ok(parsed.commits.into_iter().collect())
}

/// Opens `path` for writing, or locks stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}
