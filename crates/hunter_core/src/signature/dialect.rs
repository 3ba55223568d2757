//! Translation from the signature regex dialect to `git grep` arguments.
//!
//! Signatures are written for the `regex` crate, where case folding is
//! requested with a leading inline flag group such as `(?i)`. POSIX extended
//! regular expressions have no inline flags, so the group is stripped and
//! surfaced as an explicit `-i` instead.

use tracing::debug;

/// A pattern ready to hand to the content-search oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepPattern {
    /// Pattern text without any inline flag group.
    pub pattern: String,
    /// Pass `-i` to the oracle.
    pub case_insensitive: bool,
    /// Treat `pattern` as a literal string (`-F`) rather than an ERE (`-E`).
    pub fixed_string: bool,
}

impl GrepPattern {
    /// Builds an extended-regex pattern from signature dialect source text.
    #[must_use]
    pub fn from_dialect(source: &str) -> Self {
        let (flags, rest) = split_leading_flags(source);
        let case_insensitive = flags.is_some_and(|f| f.enables('i'));

        if let Some(flags) = flags {
            let dropped: String = flags.enabled.chars().filter(|&c| c != 'i').collect();
            if !dropped.is_empty() || !flags.disabled.is_empty() {
                debug!(pattern = source, dropped = %dropped, "inline flags not supported by git grep were ignored");
            }
        }

        Self {
            pattern: rest.to_string(),
            case_insensitive,
            fixed_string: false,
        }
    }

    /// Builds a case-insensitive literal pattern.
    #[must_use]
    pub fn literal(needle: &str) -> Self {
        Self {
            pattern: needle.to_string(),
            case_insensitive: true,
            fixed_string: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InlineFlags<'a> {
    enabled: &'a str,
    disabled: &'a str,
}

impl InlineFlags<'_> {
    fn enables(&self, flag: char) -> bool {
        self.enabled.contains(flag)
    }
}

/// Splits a leading `(?flags)` group from the rest of the pattern.
///
/// Only a pure flag group qualifies: `(?i:...)`, `(?:...)` and `(?P<..>)`
/// are left untouched.
fn split_leading_flags(source: &str) -> (Option<InlineFlags<'_>>, &str) {
    let Some(after_open) = source.strip_prefix("(?") else {
        return (None, source);
    };
    let Some(close) = after_open.find(')') else {
        return (None, source);
    };

    let group = &after_open[..close];
    if group.is_empty() || !group.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
        return (None, source);
    }

    let (enabled, disabled) = group.split_once('-').unwrap_or((group, ""));
    if disabled.contains('-') {
        return (None, source);
    }

    (Some(InlineFlags { enabled, disabled }), &after_open[close + 1..])
}
