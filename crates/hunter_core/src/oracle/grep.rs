/// One line of content-search output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrepLine<'a> {
    /// Revision the match was found in.
    pub commit: &'a str,
    /// Path of the matching file within that revision.
    pub path: &'a str,
    /// The matching line. May itself contain colons.
    pub text: &'a str,
}

/// Splits a `<commit-id>:<path>:<matched-text>` line.
///
/// Returns `None` for lines with fewer than three fields or an empty id or
/// path. Everything after the second colon belongs to the matched text.
#[must_use]
pub fn parse_grep_line(line: &str) -> Option<GrepLine<'_>> {
    let mut fields = line.splitn(3, ':');
    let commit = fields.next()?.trim();
    let path = fields.next()?;
    let text = fields.next()?;

    if commit.is_empty() || path.is_empty() {
        return None;
    }

    Some(GrepLine { commit, path, text })
}
