//! Concurrent search over a scan session.
//!
//! Two stages run side by side:
//!
//! - the match stage tests every commit message against every comment
//!   signature and every touched path against every file signature, on the
//!   global rayon pool;
//! - the content stage (optional) asks a [`ContentSearch`] oracle once per
//!   `(comment signature, revision batch)` pair, on a dedicated pool sized
//!   by [`SearchOrchestrator::with_content_jobs`].
//!
//! Both feed a bounded channel read by a single [`HitSink`] running on its
//! own thread. [`SearchOrchestrator::run`] returns only after both stages
//! have finished, the last sender has been dropped and the sink has drained.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::batch::RevisionBatch;
use crate::commit::Commit;
use crate::hit::{Hit, HitKind};
use crate::index::CommitIndex;
use crate::oracle::{ContentSearch, OracleError, parse_grep_line};
use crate::signature::{CommentSignature, GrepPattern, SignatureSet};
use crate::sink::{DEFAULT_CHANNEL_CAPACITY, HitCounters, HitSender, HitSink};

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A content-search invocation failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The sink could not write a hit.
    #[error("failed to write results: {0}")]
    Sink(#[from] std::io::Error),

    /// The dedicated content-search pool could not be created.
    #[error("failed to start content search workers: {0}")]
    ContentPool(#[from] rayon::ThreadPoolBuildError),

    /// The sink thread panicked before draining the channel.
    #[error("result writer stopped unexpectedly")]
    SinkPanicked,
}

/// Everything one scan reads, plus the flag it raises.
///
/// The index and signatures are never mutated once the session exists.
/// Sessions are independent, so several can live in one process.
#[derive(Debug)]
pub struct ScanSession {
    index: CommitIndex,
    signatures: SignatureSet,
    found: AtomicBool,
}

impl ScanSession {
    /// Creates a session with the found flag cleared.
    #[must_use]
    pub fn new(index: CommitIndex, signatures: SignatureSet) -> Self {
        Self {
            index,
            signatures,
            found: AtomicBool::new(false),
        }
    }

    /// The commits being scanned.
    #[must_use]
    pub const fn index(&self) -> &CommitIndex {
        &self.index
    }

    /// The signatures being applied.
    #[must_use]
    pub const fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// Returns `true` once any hit has been produced.
    #[must_use]
    pub fn found(&self) -> bool {
        self.found.load(Ordering::Relaxed)
    }
}

/// Totals for a completed scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Hits written by the sink.
    pub hits_delivered: usize,
    /// Commit-message hits.
    pub comment_hits: usize,
    /// Touched-path hits.
    pub file_hits: usize,
    /// Historical-content hits.
    pub content_hits: usize,
    /// Content-search oracle invocations.
    pub content_searches: usize,
    /// Oracle output lines that were malformed or named an unknown commit.
    pub dropped_lines: usize,
    /// Commits tested in the match stage.
    pub commits_scanned: usize,
}

impl ScanOutcome {
    /// Returns `true` if any stage produced a hit.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.comment_hits + self.file_hits + self.content_hits > 0
    }
}

#[derive(Clone, Copy)]
struct ContentStage<'a> {
    search: &'a dyn ContentSearch,
    batches: &'a [RevisionBatch],
}

#[derive(Default)]
struct ContentStats {
    searches: AtomicUsize,
    dropped: AtomicUsize,
}

/// Drives one scan of a [`ScanSession`].
pub struct SearchOrchestrator<'a> {
    session: &'a ScanSession,
    content: Option<ContentStage<'a>>,
    content_jobs: NonZeroUsize,
    channel_capacity: usize,
}

impl std::fmt::Debug for SearchOrchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("content_search", &self.content.is_some())
            .field("content_jobs", &self.content_jobs)
            .field("channel_capacity", &self.channel_capacity)
            .finish_non_exhaustive()
    }
}

impl<'a> SearchOrchestrator<'a> {
    /// Creates an orchestrator with content search disabled.
    #[must_use]
    pub const fn new(session: &'a ScanSession) -> Self {
        Self {
            session,
            content: None,
            content_jobs: NonZeroUsize::MIN,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Enables content search over `batches`.
    #[must_use]
    pub fn with_content_search(mut self, search: &'a dyn ContentSearch, batches: &'a [RevisionBatch]) -> Self {
        self.content = Some(ContentStage { search, batches });
        self
    }

    /// Caps concurrent content-search invocations. Defaults to one.
    #[must_use]
    pub const fn with_content_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.content_jobs = jobs;
        self
    }

    /// Sets how many hits may queue before producers block.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Runs both stages to completion and drains every hit into `sink`.
    ///
    /// The sink is drained even when the content stage fails; the oracle
    /// error is returned afterwards.
    pub fn run<W: Write + Send>(&self, sink: &mut HitSink<W>) -> Result<ScanOutcome, ScanError> {
        let index = self.session.index();
        let signatures = self.session.signatures();
        info!(
            commits = index.len(),
            comment_signatures = signatures.comment_signatures().len(),
            file_signatures = signatures.file_signatures().len(),
            content_search = self.content.is_some(),
            "starting scan"
        );

        let (tx, rx) = crossbeam_channel::bounded(self.channel_capacity);
        let counters = HitCounters::default();
        let stats = ContentStats::default();
        let sender = HitSender::new(tx, &self.session.found, &counters);

        let (content_result, sink_result) = thread::scope(|scope| {
            let consumer = thread::Builder::new()
                .name("hit-sink".into())
                .spawn_scoped(scope, move || sink.drain(rx));

            let consumer = match consumer {
                Ok(handle) => handle,
                Err(e) => return (Ok(()), Err(ScanError::Sink(e))),
            };

            let content_result = {
                let sender = sender;
                let ((), content) = rayon::join(
                    || self.match_stage(&sender),
                    || self.content_stage(&sender, &stats),
                );
                content
            };

            let sink_result = match consumer.join() {
                Ok(report) => report.map_err(ScanError::Sink),
                Err(_) => Err(ScanError::SinkPanicked),
            };
            (content_result, sink_result)
        });

        content_result?;
        let report = sink_result?;

        let outcome = ScanOutcome {
            hits_delivered: report.delivered,
            comment_hits: counters.get(HitKind::Comment),
            file_hits: counters.get(HitKind::File),
            content_hits: counters.get(HitKind::Content),
            content_searches: stats.searches.load(Ordering::Relaxed),
            dropped_lines: stats.dropped.load(Ordering::Relaxed),
            commits_scanned: index.len(),
        };
        info!(?outcome, "scan complete");

        Ok(outcome)
    }

    fn match_stage(&self, sender: &HitSender<'_>) {
        let signatures = self.session.signatures();

        self.session.index().ordered().par_iter().for_each(|commit| {
            rayon::join(
                || {
                    signatures
                        .comment_signatures()
                        .par_iter()
                        .filter(|signature| signature.is_match(&commit.comment))
                        .for_each(|signature| sender.send(Hit::comment(signature, commit)));
                },
                || match_files(signatures, commit, sender),
            );
        });
    }

    fn content_stage(&self, sender: &HitSender<'_>, stats: &ContentStats) -> Result<(), ScanError> {
        let Some(stage) = self.content else {
            return Ok(());
        };

        let patterns: Vec<(&CommentSignature, GrepPattern)> = self
            .session
            .signatures()
            .comment_signatures()
            .iter()
            .map(|signature| (signature, signature.grep_pattern()))
            .collect();

        let jobs: Vec<_> = patterns
            .iter()
            .flat_map(|(signature, pattern)| stage.batches.iter().map(move |batch| (*signature, pattern, batch)))
            .collect();

        if jobs.is_empty() {
            return Ok(());
        }

        debug!(jobs = jobs.len(), workers = self.content_jobs.get(), "starting content search");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.content_jobs.get())
            .thread_name(|i| format!("content-search-{i}"))
            .build()?;

        pool.install(|| {
            jobs.par_iter().try_for_each(|&(signature, pattern, batch)| {
                let output = stage.search.search(pattern, batch)?;
                stats.searches.fetch_add(1, Ordering::Relaxed);
                self.deliver_content(signature, &output, sender, stats);
                Ok::<_, OracleError>(())
            })
        })?;

        Ok(())
    }

    fn deliver_content(&self, signature: &CommentSignature, output: &str, sender: &HitSender<'_>, stats: &ContentStats) {
        let index = self.session.index();

        for raw in output.lines().filter(|line| !line.trim().is_empty()) {
            let Some(line) = parse_grep_line(raw) else {
                debug!(line = raw, "ignoring malformed content-search line");
                stats.dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            };

            let Some(commit) = index.get(line.commit) else {
                debug!(commit = line.commit, "content match names an unknown commit");
                stats.dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            };

            sender.send(Hit::content(signature, &line, commit));
        }
    }
}

fn match_files(signatures: &SignatureSet, commit: &Commit, sender: &HitSender<'_>) {
    for file in &commit.files {
        for signature in signatures.match_file(file) {
            sender.send(Hit::file(signature, file, commit));
        }
    }
}
