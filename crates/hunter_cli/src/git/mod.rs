//! Git repository access through the `git` binary.

mod grep;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Context as _;
use hunter_core::{HistoryOracle, OracleError};
use tracing::{debug, warn};

pub use self::grep::GitGrep;

const GIT: &str = "git";

/// A discovered repository, addressed by its git directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    git_dir: PathBuf,
}

impl GitRepo {
    /// Finds the repository at or above `path`.
    pub fn discover(path: &Path) -> anyhow::Result<Self> {
        let repo = gix::discover(path)
            .with_context(|| format!("no git repository found at '{}'", path.display()))?;

        if repo.is_shallow() {
            warn!("shallow clone detected, history is truncated");
            crate::ui::print_warning("shallow clone detected; commits before the shallow boundary will not be scanned");
        }

        let git_dir = repo.git_dir().to_path_buf();
        debug!(git_dir = %git_dir.display(), "repository discovered");
        Ok(Self { git_dir })
    }

    /// The repository's git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Builds a `git --git-dir=<dir>` command.
    ///
    /// Non-ASCII paths are printed verbatim; paths with control characters
    /// or quotes are still C-quoted and unquoted by the history parser.
    fn command(&self) -> Command {
        let mut flag = OsString::from("--git-dir=");
        flag.push(&self.git_dir);

        let mut cmd = Command::new(GIT);
        cmd.args(["-c", "core.quotePath=false"]).arg(flag);
        cmd
    }

    fn run(&self, operation: &str, args: &[&str]) -> Result<String, OracleError> {
        let mut cmd = self.command();
        cmd.args(args);
        debug!(?args, "running git {operation}");

        let output = spawn(&mut cmd)?;
        if !output.status.success() {
            return Err(failed(&format!("git {operation}"), &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistoryOracle for GitRepo {
    fn history(&self) -> Result<String, OracleError> {
        self.run("log", &["log", "--pretty=fuller", "--name-only", "--all"])
    }

    fn revisions(&self) -> Result<String, OracleError> {
        self.run("rev-list", &["rev-list", "--all"])
    }
}

fn spawn(cmd: &mut Command) -> Result<Output, OracleError> {
    cmd.output().map_err(|source| OracleError::Spawn {
        program: GIT.to_string(),
        source,
    })
}

fn failed(operation: &str, output: &Output) -> OracleError {
    OracleError::Failed {
        operation: operation.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
