//! Groups emitted instructions into animation batches.

use tracing::trace;

use crate::history::{AnimationBatch, BatchId, Instruction};
use crate::snapshot::{BattleSnapshot, SnapshotPatch};

/// Collects instructions and seals them into batches.
///
/// The last sealed snapshot carries over between entries, so the first
/// batch of an entry is diffed against the last batch of the previous one.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pending: Vec<Instruction>,
    batches: Vec<AnimationBatch>,
    previous: Option<BattleSnapshot>,
    next_id: u64,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an instruction for the next batch.
    pub fn push(&mut self, instruction: Instruction) {
        self.pending.push(instruction);
    }

    /// Seal pending instructions with the snapshot they lead to.
    ///
    /// Does nothing when no instructions are pending and the state has not
    /// changed since the last batch. A state change without instructions
    /// still gets a batch, so the last batch of an entry always shows the
    /// state the entry ends in.
    pub fn seal(&mut self, snapshot: BattleSnapshot) -> Option<BatchId> {
        if self.pending.is_empty() && self.previous.as_ref() == Some(&snapshot) {
            return None;
        }

        let patch = match &self.previous {
            Some(prev) => SnapshotPatch::between(prev, &snapshot),
            None => SnapshotPatch::full(&snapshot),
        };
        let id = BatchId(self.next_id);
        self.next_id += 1;

        let instructions = std::mem::take(&mut self.pending);
        trace!(batch = id.0, instructions = instructions.len(), "sealed batch");

        self.previous = Some(snapshot.clone());
        self.batches.push(AnimationBatch {
            id,
            snapshot,
            patch,
            instructions,
        });
        Some(id)
    }

    /// Hand over every sealed batch.
    pub fn take_batches(&mut self) -> Vec<AnimationBatch> {
        debug_assert!(self.pending.is_empty(), "unsealed instructions at entry end");
        std::mem::take(&mut self.batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Instruction, Presentation};
    use crate::scenarios::TrainingScenario;

    fn instruction() -> Instruction {
        Instruction {
            wait_ms: 0,
            detail: Presentation::Victory,
        }
    }

    #[test]
    fn test_first_batch_has_full_patch() {
        let snapshot = TrainingScenario::new(1).build().snapshot();
        let mut recorder = Recorder::new();

        recorder.push(instruction());
        let id = recorder.seal(snapshot.clone());
        let batches = recorder.take_batches();

        assert_eq!(id, Some(BatchId(0)));
        assert_eq!(batches[0].patch, SnapshotPatch::full(&snapshot));
    }

    #[test]
    fn test_unchanged_state_without_instructions_is_skipped() {
        let snapshot = TrainingScenario::new(1).build().snapshot();
        let mut recorder = Recorder::new();
        recorder.push(instruction());
        recorder.seal(snapshot.clone());

        assert_eq!(recorder.seal(snapshot.clone()), None);

        let mut changed = snapshot;
        changed.turn = 4;
        assert_eq!(recorder.seal(changed), Some(BatchId(1)));
        assert!(recorder.take_batches()[1].instructions.is_empty());
    }
}
