//! Test utilities for `hunter_core` (compiled only during testing).

use crate::commit::{Commit, MatchFile};
use crate::history::parse_git_date;

/// Id of the newest commit in [`SAMPLE_HISTORY`].
pub const C3: &str = "c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3";
/// Id of the merge commit in [`SAMPLE_HISTORY`].
pub const C2: &str = "c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2";
/// Id of the oldest commit in [`SAMPLE_HISTORY`].
pub const C1: &str = "c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1";

/// Three commits in `git log` order (newest first), including a merge.
pub const SAMPLE_HISTORY: &str = "\
commit c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3
Author:     Alice Example <alice@example.com>
AuthorDate: Thu Oct 19 10:00:00 2023 +0100
Commit:     Alice Example <alice@example.com>
CommitDate: Thu Oct 19 10:00:00 2023 +0100

    Remove the password
\x20   
    It was a mistake

config/settings.yml

commit c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2c2
Merge: aaaaaaa bbbbbbb
Author:     Bob Example <bob@example.com>
AuthorDate: Wed Oct 18 09:30:00 2023 +0000
Commit:     Bob Example <bob@example.com>
CommitDate: Wed Oct 18 09:30:00 2023 +0000

    Merge branch 'feature'

commit c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1
Author:     Alice Example <alice@example.com>
AuthorDate: Mon Jan 2 15:04:05 2006 -0700
Commit:     Bob Example <bob@example.com>
CommitDate: Mon Jan 2 15:04:05 2006 -0700

    Initial commit, oops

README.md
.ssh/id_rsa
";

pub fn commit_block(id: &str, message: &str, files: &[&str]) -> String {
    let mut block = format!(
        "commit {id}\nAuthor:     Test User <test@example.com>\nAuthorDate: Mon Jan 2 15:04:05 2006 -0700\n\
         Commit:     Test User <test@example.com>\nCommitDate: Mon Jan 2 15:04:05 2006 -0700\n\n"
    );
    for line in message.lines() {
        block.push_str("    ");
        block.push_str(line);
        block.push('\n');
    }
    block.push('\n');
    for file in files {
        block.push_str(file);
        block.push('\n');
    }
    block.push('\n');
    block
}

pub fn make_commit(id: &str, comment: &str, files: &[&str]) -> Commit {
    let date = parse_git_date("Mon Jan 2 15:04:05 2006 -0700");
    Commit {
        id: id.into(),
        author: "Test User <test@example.com>".into(),
        author_date: date,
        committer: "Test User <test@example.com>".into(),
        commit_date: date,
        parents: Vec::new(),
        comment: comment.into(),
        files: files.iter().map(|&f| MatchFile::new(f)).collect(),
    }
}
