//! # Usage
//!
//! - `git-hunter` - Scan commit messages and touched files for signs of leaked secrets
//! - `git-hunter --grep` - Also search historical file content
//! - `git-hunter --dump` - List every commit with its metadata

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod git;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};
use console::style;
use hunter_core::DEFAULT_PATTERNS_FILE;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/digininja/git-hunter";

#[derive(Debug, Parser)]
#[command(name = "git-hunter", version, styles = ui::clap_styles())]
struct Cli {
    /// Directory containing the repository.
    #[arg(long, value_name = "DIR", default_value = ".")]
    gitdir: PathBuf,

    /// Signature file (JSON, or TOML with a `.toml` extension).
    #[arg(long, value_name = "FILE", default_value = DEFAULT_PATTERNS_FILE)]
    patterns: PathBuf,

    /// List every commit with its metadata instead of scanning.
    #[arg(long)]
    dump: bool,

    /// Also search historical file content with `git grep`.
    #[arg(long)]
    grep: bool,

    /// Disable coloured output.
    #[arg(long = "no-colour", visible_alias = "nocolours")]
    no_colour: bool,

    /// Log verbosity: I for info, D for full debug.
    #[arg(long, visible_alias = "debugLevel", value_enum, ignore_case = true)]
    debug_level: Option<DebugLevel>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Revisions passed to each `git grep` invocation.
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Number of `git grep` processes allowed to run at once.
    #[arg(long, value_name = "N")]
    content_jobs: Option<usize>,

    /// Number of parallel matching threads.
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Always exit with code 0, even when something is found.
    #[arg(long)]
    exit_zero: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// One JSON object per hit.
    Json,
}

/// Log verbosity selected with `--debug-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum DebugLevel {
    /// Progress and summary information.
    #[value(name = "I", alias = "info")]
    Info,
    /// Everything, including parser diagnostics and git invocations.
    #[value(name = "D", alias = "debug")]
    Debug,
}

impl DebugLevel {
    const fn directive(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

fn main() {
    let cli = parse_cli();
    init_tracing(cli.debug_level);

    if cli.no_colour {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if let Err(e) = run(&cli) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn init_tracing(level: Option<DebugLevel>) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match level {
        Some(level) => EnvFilter::new(level.directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.dump {
        commands::dump::run(cli)
    } else {
        commands::scan::run(cli)
    }
}

fn build_about() -> String {
    format!(
        r"
  {} hunts through a repository's history for signs of leaked secrets.

  Flags suspicious commit messages, sensitive file names and,
  with --grep, matching content in any historical revision.",
        colors::accent().apply_to("git-hunter").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    git-hunter                              Scan the repository in the current directory
    git-hunter --gitdir ../app              Scan another repository
    git-hunter --grep                       Also search file content in every revision
    git-hunter --patterns hunter.toml       Use a TOML signature file
    git-hunter --format json -o hits.json   Write hits as JSON lines
    git-hunter --dump                       List every commit

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_long_standing_flags() {
        let cli = Cli::try_parse_from(["git-hunter"]).unwrap();
        assert_eq!(cli.gitdir, PathBuf::from("."));
        assert_eq!(cli.patterns, PathBuf::from("patterns.json"));
        assert!(!cli.dump && !cli.grep && !cli.no_colour);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn legacy_spellings_are_accepted() {
        let cli = Cli::try_parse_from(["git-hunter", "--nocolours", "--debugLevel", "d"]).unwrap();
        assert!(cli.no_colour);
        assert_eq!(cli.debug_level, Some(DebugLevel::Debug));
    }

    #[test]
    fn debug_level_accepts_long_names() {
        let cli = Cli::try_parse_from(["git-hunter", "--debug-level", "info"]).unwrap();
        assert_eq!(cli.debug_level, Some(DebugLevel::Info));
    }

    #[test]
    fn unknown_debug_level_is_rejected() {
        assert!(Cli::try_parse_from(["git-hunter", "--debug-level", "X"]).is_err());
    }
}
