//! Convenience re-exports of the most commonly used types.

pub use crate::batch::{RevisionBatch, batch_revisions, parse_revision_list};
pub use crate::commit::{Commit, MatchFile};
pub use crate::config::{ConfigError, SignatureFile};
pub use crate::error::{HunterError, SignatureError};
pub use crate::history::{ParsedHistory, parse_history};
pub use crate::hit::{Hit, HitKind};
pub use crate::index::CommitIndex;
pub use crate::oracle::{ContentSearch, HistoryOracle, OracleError};
pub use crate::orchestrator::{ScanError, ScanOutcome, ScanSession, SearchOrchestrator};
pub use crate::signature::SignatureSet;
pub use crate::sink::{HitRenderer, HitSink};
