//! Enemy actions.

use serde::{Deserialize, Serialize};

use crate::cards::DefinitionId;
use crate::damage::DamageBase;
use crate::modifiers::ModifierKind;

/// Why an enemy does nothing on a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Planned as a rest turn.
    Idle,
    /// Replaced by a stun.
    Stunned,
}

/// What an enemy does on one turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyAction {
    /// Attack the player.
    Attack {
        /// Base damage numbers.
        base: DamageBase,
        /// Definition of a memory card created in the player's hand when
        /// the attack deals damage.
        memory: Option<DefinitionId>,
    },

    /// Apply a modifier to itself.
    Buff {
        /// Kind.
        kind: ModifierKind,
        /// Stacks.
        magnitude: u32,
    },

    /// Apply a modifier to the player.
    Debuff {
        /// Kind.
        kind: ModifierKind,
        /// Stacks.
        magnitude: u32,
    },

    /// Leave the battle.
    Escape,

    /// Do nothing.
    Skip {
        /// Why.
        reason: SkipReason,
    },
}

impl EnemyAction {
    /// Plain attack.
    #[must_use]
    pub fn attack(base: DamageBase) -> Self {
        EnemyAction::Attack { base, memory: None }
    }

    /// Attack that leaves a memory card behind.
    #[must_use]
    pub fn memory_attack(base: DamageBase, memory: DefinitionId) -> Self {
        EnemyAction::Attack {
            base,
            memory: Some(memory),
        }
    }

    /// Rest turn.
    #[must_use]
    pub const fn idle() -> Self {
        EnemyAction::Skip {
            reason: SkipReason::Idle,
        }
    }

    /// Skip caused by a stun.
    #[must_use]
    pub const fn stunned() -> Self {
        EnemyAction::Skip {
            reason: SkipReason::Stunned,
        }
    }

    /// Check if this is any kind of skip.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, EnemyAction::Skip { .. })
    }
}

/// An action planned for a specific turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Turn number the action executes on.
    pub turn: u32,
    /// The action.
    pub action: EnemyAction,
}
