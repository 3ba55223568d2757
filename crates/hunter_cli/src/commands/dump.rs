//! Dump command - lists every commit with its number.

use anyhow::Context as _;
use hunter_core::write_dump;

use super::{load_index, open_output};
use crate::Cli;
use crate::git::GitRepo;

/// Executes `git-hunter --dump`.
pub fn run(cli: &Cli) -> super::Result {
    let repo = GitRepo::discover(&cli.gitdir)?;
    let index = load_index(&repo)?;

    let mut out = open_output(cli.output.as_deref())?;
    write_dump(&index, &mut out).context("writing commit listing")?;

    Ok(())
}
