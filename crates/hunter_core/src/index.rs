//! Commit index keyed by object id.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::commit::Commit;

/// Finalized commits, addressable by id and iterable in discovery order.
///
/// Lookups go through a hash map. Anything user-facing iterates the
/// explicit `order` list instead, so numbering never depends on hash order.
#[derive(Debug, Default, Clone)]
pub struct CommitIndex {
    by_id: HashMap<Arc<str>, Commit>,
    order: Vec<Arc<str>>,
}

impl CommitIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a commit, returning the commit it replaced if the id was
    /// already present.
    ///
    /// Git never reports the same id twice in one log, so a replacement is an
    /// invariant violation: it is logged and the newer commit wins. The id
    /// keeps its original discovery position.
    pub fn put(&mut self, commit: Commit) -> Option<Commit> {
        let id: Arc<str> = Arc::from(commit.id.as_str());
        let replaced = self.by_id.insert(Arc::clone(&id), commit);

        if replaced.is_some() {
            warn!(id = %id, "duplicate commit id in history, keeping the last one seen");
        } else {
            self.order.push(id);
        }

        replaced
    }

    /// Looks up a commit by its full id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.by_id.get(id)
    }

    /// Returns `true` if a commit with this id was indexed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of distinct commits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no commits were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates commits in the order they were first inserted.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Materializes the commits in discovery order, for parallel iteration.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Commit> {
        self.iter().collect()
    }

    /// Pairs every commit with a number counting down from `len()` to 1.
    ///
    /// With `git log` order (newest first) the newest commit carries the
    /// highest number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Commit)> {
        let total = self.len();
        self.iter().enumerate().map(move |(i, commit)| (total - i, commit))
    }
}

impl FromIterator<Commit> for CommitIndex {
    fn from_iter<I: IntoIterator<Item = Commit>>(iter: I) -> Self {
        let mut index = Self::new();
        for commit in iter {
            index.put(commit);
        }
        index
    }
}
