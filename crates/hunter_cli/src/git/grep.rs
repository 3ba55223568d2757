use std::ffi::OsString;
use std::fmt;

use hunter_core::{ContentSearch, GrepPattern, OracleError, RevisionBatch};
use indicatif::ProgressBar;
use tracing::debug;

use super::{GitRepo, failed, spawn};

/// `git grep` exits with 1 when nothing matched.
const NO_MATCH_STATUS: i32 = 1;

/// Content search over historical revisions using `git grep`.
pub struct GitGrep<'a> {
    repo: &'a GitRepo,
    progress: Option<ProgressBar>,
}

impl fmt::Debug for GitGrep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitGrep")
            .field("repo", &self.repo)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl<'a> GitGrep<'a> {
    /// Creates a searcher for `repo`.
    #[must_use]
    pub const fn new(repo: &'a GitRepo) -> Self {
        Self { repo, progress: None }
    }

    /// Advances `progress` once per completed search.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl ContentSearch for GitGrep<'_> {
    fn search(&self, pattern: &GrepPattern, batch: &RevisionBatch) -> Result<String, OracleError> {
        let mut cmd = self.repo.command();
        cmd.args(grep_args(pattern, batch));
        debug!(pattern = %pattern.pattern, revisions = batch.len(), "running git grep");

        let output = spawn(&mut cmd)?;
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }

        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Some(NO_MATCH_STATUS) => Ok(String::new()),
            _ => Err(failed("git grep", &output)),
        }
    }
}

/// Arguments after `--git-dir`: options, the pattern, then every revision.
///
/// The pattern goes through `-e` so one starting with `-` is never read as
/// an option, and the trailing `--` stops revisions being taken for paths.
fn grep_args(pattern: &GrepPattern, batch: &RevisionBatch) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["grep".into(), "--no-color".into(), "-I".into()];

    if pattern.case_insensitive {
        args.push("-i".into());
    }
    let syntax = if pattern.fixed_string { "-F" } else { "-E" };
    args.push(syntax.into());
    args.push("-e".into());
    args.push(pattern.pattern.as_str().into());
    args.extend(batch.iter().map(OsString::from));
    args.push("--".into());

    args
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use hunter_core::batch_revisions;

    use super::*;

    fn batch(ids: &[&str]) -> RevisionBatch {
        let revisions: Vec<String> = ids.iter().map(ToString::to_string).collect();
        batch_revisions(&revisions, NonZeroUsize::new(ids.len()).unwrap())
            .into_iter()
            .next()
            .unwrap()
    }

    fn args(pattern: &GrepPattern, ids: &[&str]) -> Vec<String> {
        grep_args(pattern, &batch(ids))
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn inline_case_flag_becomes_dash_i() {
        let pattern = GrepPattern::from_dialect("(?i)[vw]ulnerability");
        assert_eq!(
            args(&pattern, &["aaa", "bbb"]),
            ["grep", "--no-color", "-I", "-i", "-E", "-e", "[vw]ulnerability", "aaa", "bbb", "--"]
        );
    }

    #[test]
    fn case_sensitive_regex_has_no_dash_i() {
        let pattern = GrepPattern::from_dialect("AKIA[0-9A-Z]{16}");
        assert_eq!(
            args(&pattern, &["aaa"]),
            ["grep", "--no-color", "-I", "-E", "-e", "AKIA[0-9A-Z]{16}", "aaa", "--"]
        );
    }

    #[test]
    fn literal_needle_uses_fixed_strings() {
        let pattern = GrepPattern::literal("-----BEGIN");
        assert_eq!(
            args(&pattern, &["aaa"]),
            ["grep", "--no-color", "-I", "-i", "-F", "-e", "-----BEGIN", "aaa", "--"]
        );
    }
}
