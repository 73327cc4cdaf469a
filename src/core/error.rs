//! Error taxonomy.
//!
//! - `IntentError`: an intent that is not legal in the current battle state.
//!   Rejected before any mutation; the battle is unchanged.
//! - `ReplayError`: a recomputed replay disagrees with what was recorded, or
//!   a logged intent no longer resolves. Sessions treat this as an assertion
//!   failure.
//! - `SessionError`: orchestration-level refusals (input lock, nothing to
//!   undo, no pending interaction) plus wrapped intent errors.
//!
//! Resolution invariant violations (a resolver producing a negative id) are
//! not represented here: they panic at the point of evaluation.

use crate::battle::Phase;
use crate::cards::{CardId, DefinitionId};
use crate::core::config::BattleConfig;
use crate::core::entity::EnemyId;

/// Errors for intents that are illegal in the current battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// The battle already ended in victory or defeat.
    #[error("battle is already finished")]
    BattleFinished,

    /// The intent is not valid in the current phase.
    #[error("{intent} is not allowed during {phase:?}")]
    WrongPhase {
        /// Intent discriminant name.
        intent: &'static str,
        /// Phase at the time of resolution.
        phase: Phase,
    },

    /// A resolver produced an id outside the id space.
    #[error("resolver produced id {0}, which names nothing")]
    InvalidId(i64),

    /// No card with this id exists in the repository.
    #[error("unknown card {0}")]
    UnknownCard(CardId),

    /// The card exists but is not in the hand.
    #[error("{0} is not in hand")]
    CardNotInHand(CardId),

    /// The player cannot pay the card's current cost.
    #[error("{card} costs {cost} but only {available} energy is available")]
    NotAffordable {
        /// Card being played.
        card: CardId,
        /// Runtime cost.
        cost: u32,
        /// Player energy.
        available: u32,
    },

    /// The card needs an enemy target and none was supplied.
    #[error("{0} requires an enemy target")]
    MissingTarget(CardId),

    /// The supplied target is not an active enemy.
    #[error("{0} is not a legal target")]
    IllegalTarget(EnemyId),

    /// The card needs a selected card and none was supplied.
    #[error("{0} requires a card selection")]
    MissingSelection(CardId),

    /// The selected card is not in the zone the effect selects from.
    #[error("{0} is not a legal selection")]
    IllegalSelection(CardId),

    /// A sub-operation was supplied that the card does not use.
    #[error("{card} does not accept {operation}")]
    UnexpectedOperation {
        /// Card being played.
        card: CardId,
        /// Sub-operation name.
        operation: &'static str,
    },

    /// A required move into the hand would exceed its capacity.
    #[error("hand is full ({capacity} cards)")]
    HandFull {
        /// Configured capacity.
        capacity: usize,
    },

    /// A custom intent referenced an unknown card definition.
    #[error("unknown card definition {0}")]
    UnknownDefinition(DefinitionId),
}

impl IntentError {
    /// Build a `HandFull` error from the battle configuration.
    #[must_use]
    pub fn hand_full(config: &BattleConfig) -> Self {
        IntentError::HandFull {
            capacity: config.hand_capacity,
        }
    }
}

/// Mismatch between a recorded history and its recomputation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// A logged intent was rejected when replayed.
    #[error("intent {index} no longer resolves: {source}")]
    Rejected {
        /// Intent index.
        index: usize,
        /// Underlying rejection.
        source: IntentError,
    },

    /// A recomputed entry differs from the recorded one.
    #[error("entry {index} diverged (recorded {recorded:#018x}, replayed {replayed:#018x})")]
    Diverged {
        /// Entry index.
        index: usize,
        /// Fingerprint of the recorded entry.
        recorded: u64,
        /// Fingerprint of the replayed entry.
        replayed: u64,
    },

    /// Replay produced a different number of entries than recorded.
    #[error("replay produced {replayed} entries, {recorded} were recorded")]
    LengthMismatch {
        /// Recorded entries.
        recorded: usize,
        /// Replayed entries.
        replayed: usize,
    },
}

/// Errors surfaced by the orchestration layer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The previous entry has not been acknowledged by the presentation
    /// layer yet.
    #[error("input is locked until entry {0} is acknowledged")]
    InputLocked(usize),

    /// No player-issued intent after the loaded prefix.
    #[error("nothing to undo")]
    NothingToUndo,

    /// No interaction request is outstanding.
    #[error("no pending interaction request")]
    NoPendingRequest,

    /// A request is already outstanding.
    #[error("interaction request {0} is still pending")]
    RequestPending(u64),

    /// The answer is not among the request's options.
    #[error("{0} is not one of the offered options")]
    InvalidChoice(i64),

    /// The intent was rejected by the battle.
    #[error(transparent)]
    Intent(#[from] IntentError),
}
