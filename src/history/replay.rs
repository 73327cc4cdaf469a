//! Replay: rebuilding battle state purely from the intent log.
//!
//! There is no incremental or inverse path. Every reconstruction builds a
//! fresh battle from the factory and folds the requested prefix of the log
//! through `Battle::resolve`.

use tracing::debug;

use super::log::IntentLog;
use super::resolved::{ResolvedEntry, ResolvedLog};
use crate::battle::Battle;
use crate::core::ReplayError;
use crate::snapshot::BattleSnapshot;

/// Produces a fresh battle in its initial state.
pub trait BattleFactory {
    /// Build the battle.
    fn build(&self) -> Battle;
}

impl<F> BattleFactory for F
where
    F: Fn() -> Battle,
{
    fn build(&self) -> Battle {
        self()
    }
}

/// Result of replaying a prefix.
#[derive(Clone, Debug)]
pub struct Replay {
    /// Battle after the prefix.
    pub battle: Battle,
    /// Snapshot of `battle`.
    pub snapshot: BattleSnapshot,
    /// One entry per replayed intent.
    pub entries: Vec<ResolvedEntry>,
}

/// Replays intent logs against a factory.
#[derive(Clone, Debug)]
pub struct Replayer<F> {
    factory: F,
}

impl<F: BattleFactory> Replayer<F> {
    /// Create a replayer.
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// A fresh battle from the factory.
    pub fn fresh(&self) -> Battle {
        self.factory.build()
    }

    /// Replay the first `len` intents of `log`.
    ///
    /// A logged intent that no longer resolves is reported as
    /// `ReplayError::Rejected`.
    pub fn replay(&self, log: &IntentLog, len: usize) -> Result<Replay, ReplayError> {
        let len = len.min(log.len());
        let mut battle = self.factory.build();
        let mut entries = Vec::with_capacity(len);

        for (index, logged) in log.entries().iter().take(len).enumerate() {
            let entry = battle
                .resolve(index, logged.origin, &logged.intent, &log.scope(index))
                .map_err(|source| ReplayError::Rejected { index, source })?;
            entries.push(entry);
        }

        debug!(len, "replayed intent log");
        let snapshot = battle.snapshot();
        Ok(Replay {
            battle,
            snapshot,
            entries,
        })
    }

    /// Battle state as of intent `index` (exclusive).
    pub fn reconstruct_at(&self, log: &IntentLog, index: usize) -> Result<Replay, ReplayError> {
        self.replay(log, index)
    }

    /// Replay `recorded.len()` intents and check them against `recorded`.
    pub fn verify(&self, log: &IntentLog, recorded: &ResolvedLog) -> Result<Replay, ReplayError> {
        let replay = self.replay(log, recorded.len())?;
        if replay.entries.len() != recorded.len() {
            return Err(ReplayError::LengthMismatch {
                recorded: recorded.len(),
                replayed: replay.entries.len(),
            });
        }
        recorded.verify_prefix(&replay.entries)?;
        Ok(replay)
    }
}
