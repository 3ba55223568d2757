//! Single-consumer conduit that serializes hits to an output writer.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace};

use crate::hit::{Hit, HitKind};

/// Default number of hits buffered between producers and the sink.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Formats one hit onto the output writer.
pub trait HitRenderer: Send {
    /// Writes `hit` to `out`.
    fn render(&mut self, hit: &Hit, out: &mut dyn Write) -> io::Result<()>;

    /// Called once after the last hit has been rendered.
    fn finish(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// Unstyled text: the kind heading, the hit body, then a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl HitRenderer for PlainRenderer {
    fn render(&mut self, hit: &Hit, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", hit.kind().title())?;
        writeln!(out, "{}", hit.text())
    }
}

/// Summary returned once the sink has drained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkReport {
    /// Hits written, in receipt order.
    pub delivered: usize,
}

/// The one consumer of the hit channel.
///
/// Producers never touch the writer. The sink writes hits in the order it
/// receives them and stops only after every sender has been dropped and the
/// channel is empty.
pub struct HitSink<W> {
    writer: W,
    renderer: Box<dyn HitRenderer>,
}

impl<W> fmt::Debug for HitSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> HitSink<W> {
    /// Creates a sink writing through `renderer`.
    pub fn new(writer: W, renderer: Box<dyn HitRenderer>) -> Self {
        Self { writer, renderer }
    }

    /// Creates a sink with the [`PlainRenderer`].
    pub fn plain(writer: W) -> Self {
        Self::new(writer, Box::new(PlainRenderer))
    }

    /// Receives until the channel is closed and empty.
    ///
    /// A write failure stops the loop and drops the receiver, so producers
    /// still blocked on a full channel are released.
    pub fn drain(&mut self, receiver: Receiver<Hit>) -> io::Result<SinkReport> {
        let mut report = SinkReport::default();

        for hit in receiver {
            trace!(kind = ?hit.kind(), commit = hit.commit_id(), "writing hit");
            self.renderer.render(&hit, &mut self.writer)?;
            report.delivered += 1;
        }

        self.renderer.finish(&mut self.writer)?;
        self.writer.flush()?;
        debug!(delivered = report.delivered, "hit sink drained");

        Ok(report)
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Per-kind counts of hits handed to the sink.
#[derive(Debug, Default)]
pub(crate) struct HitCounters {
    comment: AtomicUsize,
    file: AtomicUsize,
    content: AtomicUsize,
}

impl HitCounters {
    fn record(&self, kind: HitKind) {
        let counter = match kind {
            HitKind::Comment => &self.comment,
            HitKind::File => &self.file,
            HitKind::Content => &self.content,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get(&self, kind: HitKind) -> usize {
        match kind {
            HitKind::Comment => self.comment.load(Ordering::Relaxed),
            HitKind::File => self.file.load(Ordering::Relaxed),
            HitKind::Content => self.content.load(Ordering::Relaxed),
        }
    }
}

/// Producer handle shared by every matching job.
#[derive(Debug, Clone)]
pub(crate) struct HitSender<'a> {
    tx: Sender<Hit>,
    found: &'a AtomicBool,
    counters: &'a HitCounters,
}

impl<'a> HitSender<'a> {
    pub(crate) fn new(tx: Sender<Hit>, found: &'a AtomicBool, counters: &'a HitCounters) -> Self {
        Self { tx, found, counters }
    }

    /// Hands a hit to the sink, blocking while the channel is full.
    pub(crate) fn send(&self, hit: Hit) {
        let kind = hit.kind();
        self.found.store(true, Ordering::Relaxed);

        if self.tx.send(hit).is_err() {
            debug!(?kind, "hit sink has stopped, dropping hit");
            return;
        }
        self.counters.record(kind);
    }
}
