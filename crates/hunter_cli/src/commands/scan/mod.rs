//! Scan command - hunts through commit history for signs of leaked secrets.

mod output;
mod settings;

use std::io::IsTerminal as _;
use std::time::Instant;

use anyhow::Context as _;
use hunter_core::{
    HistoryOracle, HitSink, RevisionBatch, ScanOutcome, ScanSession, SearchOrchestrator, SignatureFile,
    batch_revisions, parse_revision_list,
};
use tracing::info;

use self::settings::{Overrides, Tuning};
use super::load_index;
use crate::git::{GitGrep, GitRepo};
use crate::ui::{self, exit, format_duration, pluralise_word};
use crate::{Cli, OutputFormat};

const NOTHING_FOUND: &str = "Sorry, no interesting information found";

/// Executes the default scan.
pub fn run(cli: &Cli) -> super::Result {
    configure_thread_pool(cli.concurrency)?;
    let start = Instant::now();

    let repo = GitRepo::discover(&cli.gitdir)?;

    let signature_file = SignatureFile::load(&cli.patterns).context("loading signatures")?;
    let signatures = signature_file.compile().context("compiling signatures")?;
    let tuning = Tuning::resolve(
        Overrides {
            batch_size: cli.batch_size,
            content_jobs: cli.content_jobs,
        },
        &signature_file.scan,
    )?;

    let index = load_index(&repo)?;
    let batches = if cli.grep { revision_batches(&repo, &tuning)? } else { Vec::new() };

    let session = ScanSession::new(index, signatures);
    let to_terminal = cli.output.is_none() && std::io::stdout().is_terminal();
    let show_progress = cli.grep && to_terminal && matches!(cli.format, OutputFormat::Text);

    let progress = show_progress.then(|| {
        let searches = session.signatures().comment_signatures().len() * batches.len();
        ui::create_search_progress(searches)
    });

    let grep = GitGrep::new(&repo);
    let grep = match &progress {
        Some(bar) => grep.with_progress(bar.clone()),
        None => grep,
    };

    let mut orchestrator = SearchOrchestrator::new(&session)
        .with_content_jobs(tuning.content_jobs)
        .with_channel_capacity(tuning.channel_capacity);
    if cli.grep {
        orchestrator = orchestrator.with_content_search(&grep, &batches);
    }

    let writer = super::open_output(cli.output.as_deref())?;
    let mut sink = HitSink::new(writer, output::renderer(cli.format, to_terminal, progress.clone()));
    let outcome = orchestrator.run(&mut sink).context("scanning history")?;

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    report(cli, &outcome, start);

    if outcome.found() && !cli.exit_zero {
        std::process::exit(exit::FINDINGS);
    }

    Ok(())
}

fn revision_batches(repo: &GitRepo, tuning: &Tuning) -> anyhow::Result<Vec<RevisionBatch>> {
    let revisions = parse_revision_list(&repo.revisions().context("listing revisions")?);
    let batches = batch_revisions(&revisions, tuning.batch_size);
    info!(
        revisions = revisions.len(),
        batches = batches.len(),
        batch_size = tuning.batch_size.get(),
        "revisions batched for content search"
    );
    Ok(batches)
}

fn report(cli: &Cli, outcome: &ScanOutcome, start: Instant) {
    if !outcome.found() && cli.format == OutputFormat::Text {
        println!("{NOTHING_FOUND}");
    }

    if cli.debug_level.is_some() || (cli.output.is_some() && outcome.found()) {
        let hits = outcome.hits_delivered;
        ui::print_info(&format!(
            "{} {} in {} {} ({})",
            hits,
            pluralise_word(hits, "hit", "hits"),
            outcome.commits_scanned,
            pluralise_word(outcome.commits_scanned, "commit", "commits"),
            format_duration(start.elapsed()),
        ));
    }
}

/// Configures the global rayon thread pool with the requested number of
/// threads, if specified.
fn configure_thread_pool(concurrency: Option<usize>) -> anyhow::Result<()> {
    if let Some(n) = concurrency {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("failed to configure thread pool")?;
    }
    Ok(())
}
