//! Hit renderers for terminal, plain-text and JSON-lines output.

use std::fmt;
use std::io::{self, Write};

use hunter_core::{Hit, HitRenderer, PlainRenderer};
use indicatif::ProgressBar;

use crate::OutputFormat;
use crate::ui::colors;

/// Picks the renderer for `format`.
///
/// Styled text is only used for the terminal; text written to a file is
/// always plain.
pub fn renderer(format: OutputFormat, to_terminal: bool, progress: Option<ProgressBar>) -> Box<dyn HitRenderer> {
    match format {
        OutputFormat::Json => Box::new(JsonLinesRenderer),
        OutputFormat::Text if to_terminal => Box::new(StyledRenderer { progress }),
        OutputFormat::Text => Box::new(PlainRenderer),
    }
}

/// Coloured headings, drawn around any active progress bar.
struct StyledRenderer {
    progress: Option<ProgressBar>,
}

impl fmt::Debug for StyledRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledRenderer")
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl StyledRenderer {
    fn write_hit(hit: &Hit, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", colors::hit().apply_to(hit.kind().title()))?;
        writeln!(out, "{}", hit.text())?;
        out.flush()
    }
}

impl HitRenderer for StyledRenderer {
    fn render(&mut self, hit: &Hit, out: &mut dyn Write) -> io::Result<()> {
        match &self.progress {
            Some(progress) => progress.suspend(|| Self::write_hit(hit, out)),
            None => Self::write_hit(hit, out),
        }
    }
}

/// One JSON object per line: `{"kind", "commit", "text"}`.
#[derive(Debug, Clone, Copy)]
struct JsonLinesRenderer;

impl HitRenderer for JsonLinesRenderer {
    fn render(&mut self, hit: &Hit, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *out, hit).map_err(io::Error::from)?;
        writeln!(out)
    }
}
