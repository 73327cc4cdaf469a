//! Battle phases and overall status.

use serde::{Deserialize, Serialize};

/// Where the battle is in its turn cycle.
///
/// `Setup → TurnPending → PlayerAct → EnemyTurn → TurnPending → …`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Built, not started.
    Setup,
    /// Waiting for the next `StartTurn`.
    TurnPending,
    /// The player may play cards or end the turn.
    PlayerAct,
    /// Enemies are acting (only observed inside an `EndTurn` entry).
    EnemyTurn,
}

/// Whether the battle is still being fought.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStatus {
    InProgress,
    Victory,
    Defeat,
}

impl BattleStatus {
    /// Check if the battle has ended.
    #[must_use]
    pub fn is_finished(self) -> bool {
        self != BattleStatus::InProgress
    }
}
