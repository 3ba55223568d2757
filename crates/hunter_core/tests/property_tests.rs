//! Property-based tests for `hunter_core`.
//!
//! These tests verify invariants that should hold for all inputs,
//! catching edge cases that hand-written tests might miss.

#![expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]

use std::fmt::Write as _;
use std::num::NonZeroUsize;

use hunter_core::prelude::*;
use hunter_core::{SimpleSignature, parse_grep_line};
use proptest::prelude::*;

fn commit_block(id: &str, message: &str, files: &[String]) -> String {
    let mut block = format!(
        "commit {id}\nAuthor:     Test <test@example.com>\nAuthorDate: Mon Jan 2 15:04:05 2006 -0700\n\
         Commit:     Test <test@example.com>\nCommitDate: Mon Jan 2 15:04:05 2006 -0700\n\n"
    );
    for line in message.lines() {
        let _ = writeln!(block, "    {line}");
    }
    block.push('\n');
    for file in files {
        let _ = writeln!(block, "{file}");
    }
    block.push('\n');
    block
}

proptest! {
    /// Batching covers the whole list in `ceil(L / B)` order-preserving batches.
    #[test]
    fn batches_concatenate_to_input(len in 0usize..600, size in 1usize..300) {
        let revisions: Vec<String> = (0..len).map(|i| format!("{i:040x}")).collect();
        let size = NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN);
        let batches = batch_revisions(&revisions, size);

        prop_assert_eq!(batches.len(), len.div_ceil(size.get()));
        prop_assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= size.get()));

        let rejoined: Vec<String> = batches.iter().flat_map(|b| b.revisions().iter().cloned()).collect();
        prop_assert_eq!(rejoined, revisions);
    }

    /// A trailing newline never produces an empty revision.
    #[test]
    fn revision_list_has_no_blank_entries(ids in prop::collection::vec("[0-9a-f]{7,40}", 0..50)) {
        let text = ids.iter().fold(String::new(), |mut acc, id| {
            acc.push_str(id);
            acc.push('\n');
            acc
        });
        let parsed = parse_revision_list(&text);

        prop_assert_eq!(parsed, ids);
    }

    /// N well-formed blocks give N commits, with no field bleed between them.
    #[test]
    fn parser_yields_one_commit_per_block(
        blocks in prop::collection::vec(
            ("[a-z ]{1,30}", prop::collection::vec("[a-z]{1,8}/[a-z]{1,8}\\.[a-z]{1,3}", 0..4)),
            0..20,
        )
    ) {
        let history: String = blocks
            .iter()
            .enumerate()
            .map(|(i, (message, files))| commit_block(&format!("{i:040x}"), message, files))
            .collect();

        let parsed = parse_history(&history);
        prop_assert_eq!(parsed.commits.len(), blocks.len());
        prop_assert!(parsed.diagnostics.is_empty());

        for (i, (commit, (message, files))) in parsed.commits.iter().zip(&blocks).enumerate() {
            prop_assert_eq!(&commit.id, &format!("{i:040x}"));
            prop_assert_eq!(&commit.comment, message.trim());
            let paths: Vec<&str> = commit.files.iter().map(|f| f.path.as_str()).collect();
            prop_assert_eq!(paths, files.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    /// Touched paths that begin with `commit ` never open a new commit.
    #[test]
    fn commit_prefixed_paths_stay_with_their_commit(
        blocks in prop::collection::vec(
            prop::collection::vec("commit [a-z0-9 ]{0,12}\\.[a-z]{1,3}", 1..4),
            1..10,
        )
    ) {
        let history: String = blocks
            .iter()
            .enumerate()
            .map(|(i, files)| commit_block(&format!("{i:040x}"), "add files", files))
            .collect();

        let parsed = parse_history(&history);
        prop_assert_eq!(parsed.commits.len(), blocks.len());

        for (commit, files) in parsed.commits.iter().zip(&blocks) {
            let paths: Vec<&str> = commit.files.iter().map(|f| f.path.as_str()).collect();
            prop_assert_eq!(paths, files.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    /// Arbitrary input never panics the parser.
    #[test]
    fn parser_never_panics(text in "\\PC*") {
        let _ = parse_history(&text);
    }

    /// Simple signatures match regardless of case.
    #[test]
    fn simple_signature_ignores_case(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
        let signature = SimpleSignature::new("oops", "Oops", None).unwrap();
        let upper = format!("{prefix}OOPS{suffix}");
        let mixed = format!("{prefix}oOpS{suffix}");

        prop_assert!(signature.is_match(&upper));
        prop_assert!(signature.is_match(&mixed));
    }

    /// Matched text keeps every colon after the path.
    #[test]
    fn grep_line_keeps_text_intact(
        id in "[0-9a-f]{40}",
        path in "[a-z/]{1,20}\\.[a-z]{1,4}",
        text in "[a-z: =]{0,40}",
    ) {
        let raw = format!("{id}:{path}:{text}");
        let line = parse_grep_line(&raw).unwrap();

        prop_assert_eq!(line.commit, id.as_str());
        prop_assert_eq!(line.path, path.as_str());
        prop_assert_eq!(line.text, text.as_str());
    }
}
