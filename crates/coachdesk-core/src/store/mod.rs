// ── List state ──
//
// One synchronizer per collection. The server is the source of truth:
// every successful write is followed by a full refetch.

mod source;
mod sync;

pub use source::{CustomerSource, ListSource, TrainingSource};
pub use sync::{ListSynchronizer, SyncState};
