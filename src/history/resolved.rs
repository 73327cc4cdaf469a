//! Resolved entries and animation batches.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::instruction::{Instruction, Stage};
use super::intent::{IntentOrigin, ResolvedIntent};
use crate::core::ReplayError;
use crate::snapshot::{BattleSnapshot, SnapshotPatch};

/// Stable batch identity, monotonic within a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(pub u64);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Batch({})", self.0)
    }
}

/// A group of instructions and the snapshot they lead to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationBatch {
    /// Identity.
    pub id: BatchId,
    /// Full battle state once the instructions have played.
    pub snapshot: BattleSnapshot,
    /// Fields changed since the previous batch.
    pub patch: SnapshotPatch,
    /// Instructions, in order.
    pub instructions: Vec<Instruction>,
}

impl AnimationBatch {
    /// Check if any instruction carries the stage.
    #[must_use]
    pub fn has_stage(&self, stage: Stage) -> bool {
        self.instructions.iter().any(|i| i.stage() == stage)
    }
}

/// An intent after resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    /// Index in the intent log.
    pub index: usize,
    /// Who issued the intent.
    pub origin: IntentOrigin,
    /// Frozen intent.
    pub intent: ResolvedIntent,
    /// Batches, in presentation order.
    pub batches: Vec<AnimationBatch>,
}

impl ResolvedEntry {
    /// Snapshot after the last batch.
    #[must_use]
    pub fn final_snapshot(&self) -> Option<&BattleSnapshot> {
        self.batches.last().map(|batch| &batch.snapshot)
    }

    /// Every instruction, across batches.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.batches.iter().flat_map(|batch| batch.instructions.iter())
    }

    /// First batch carrying an instruction of `stage`.
    #[must_use]
    pub fn batch_with(&self, stage: Stage) -> Option<&AnimationBatch> {
        self.batches.iter().find(|batch| batch.has_stage(stage))
    }

    /// Stable hash of the whole entry, for divergence reports.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = bincode::serialize(self).expect("resolved entries always encode");
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        hasher.finish()
    }
}

/// Append-only sequence of resolved entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLog {
    entries: Vec<ResolvedEntry>,
}

impl ResolvedLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from recomputed entries.
    #[must_use]
    pub fn from_entries(entries: Vec<ResolvedEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry.
    ///
    /// Panics if the entry index is not the next one.
    pub fn push(&mut self, entry: ResolvedEntry) {
        assert_eq!(
            entry.index,
            self.entries.len(),
            "resolved entries must be appended in index order"
        );
        self.entries.push(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResolvedEntry> {
        self.entries.get(index)
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    /// Most recent snapshot in the log.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&BattleSnapshot> {
        self.entries.iter().rev().find_map(ResolvedEntry::final_snapshot)
    }

    /// Check that `replayed` reproduces the first `replayed.len()` entries.
    pub fn verify_prefix(&self, replayed: &[ResolvedEntry]) -> Result<(), ReplayError> {
        if replayed.len() > self.entries.len() {
            return Err(ReplayError::LengthMismatch {
                recorded: self.entries.len(),
                replayed: replayed.len(),
            });
        }

        for (recorded, replayed) in self.entries.iter().zip(replayed) {
            if recorded != replayed {
                return Err(ReplayError::Diverged {
                    index: recorded.index,
                    recorded: recorded.fingerprint(),
                    replayed: replayed.fingerprint(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Intent, IntentLog, IntentOrigin};
    use crate::history::Replayer;
    use crate::scenarios::TrainingScenario;

    fn recorded() -> Vec<ResolvedEntry> {
        let mut log = IntentLog::new();
        log.push(Intent::BattleStart, IntentOrigin::System);
        log.push(Intent::StartTurn { draw: 5 }, IntentOrigin::System);
        Replayer::new(TrainingScenario::factory(3))
            .replay(&log, 2)
            .unwrap()
            .entries
    }

    #[test]
    fn test_verify_prefix_accepts_identical() {
        let entries = recorded();
        let log = ResolvedLog::from_entries(entries.clone());

        assert_eq!(log.verify_prefix(&entries), Ok(()));
        assert_eq!(log.verify_prefix(&entries[..1]), Ok(()));
    }

    #[test]
    fn test_verify_prefix_reports_divergence() {
        let entries = recorded();
        let log = ResolvedLog::from_entries(entries.clone());
        let mut tampered = entries.clone();
        tampered[1].batches.pop();

        let err = log.verify_prefix(&tampered).unwrap_err();

        assert!(matches!(err, ReplayError::Diverged { index: 1, .. }));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = recorded();
        let b = recorded();

        assert_eq!(a[1].fingerprint(), b[1].fingerprint());
        assert_ne!(a[0].fingerprint(), a[1].fingerprint());
    }

    #[test]
    #[should_panic(expected = "index order")]
    fn test_push_out_of_order() {
        let entries = recorded();
        let mut log = ResolvedLog::new();
        log.push(entries[1].clone());
    }
}
