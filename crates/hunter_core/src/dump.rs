//! Numbered listing of every indexed commit.

use std::io::{self, Write};

use crate::index::CommitIndex;

/// Writes every commit with its number, newest (highest) first.
///
/// Numbers count down from the number of commits to 1 over discovery order,
/// so the listing is reproducible for the same history.
pub fn write_dump(index: &CommitIndex, out: &mut dyn Write) -> io::Result<()> {
    for (number, commit) in index.numbered() {
        writeln!(out, "Commit Number: {number}")?;
        writeln!(out, "{commit}")?;
    }
    out.flush()
}
