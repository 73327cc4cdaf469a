//! Intents and deferred values.
//!
//! An `Intent` is recorded before it is resolved. Card references and
//! sub-operation payloads are `Deferred`: either a concrete id or a handle
//! into the intent log's resolver table. Handles keep the intent data plain
//! and serializable; the closures they name live beside the log.
//!
//! Resolution freezes an intent into a `ResolvedIntent` with the same shape
//! and concrete values only.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, DefinitionId};
use crate::core::{CombatantId, EnemyId};
use crate::modifiers::ModifierKind;

/// Reference into an intent log's resolver table.
///
/// Encodes the index of the intent that owns it and a slot within that
/// intent, so truncating the log drops exactly the resolvers of removed
/// intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolverHandle {
    /// Owning intent index.
    pub intent: usize,
    /// Slot within the intent.
    pub slot: u32,
}

/// A value known now or computed from the live battle at resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deferred<T> {
    /// Concrete value.
    Value(T),
    /// Computed by a resolver when the owning intent resolves.
    Resolver(ResolverHandle),
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Deferred::Value(value)
    }
}

/// Conversion from a resolver's raw output.
pub trait FromResolved: Sized {
    /// `None` when `raw` is outside the id space. Never called with a
    /// negative value.
    fn from_resolved(raw: i64) -> Option<Self>;
}

impl FromResolved for CardId {
    fn from_resolved(raw: i64) -> Option<Self> {
        CardId::from_raw(raw)
    }
}

impl FromResolved for EnemyId {
    fn from_resolved(raw: i64) -> Option<Self> {
        EnemyId::from_raw(raw)
    }
}

/// Who issued an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentOrigin {
    /// The player; undo stops here.
    Player,
    /// The orchestration layer (battle start, turn start).
    System,
}

/// A choice made while playing a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubOperation {
    /// Choose the enemy a targeted effect hits.
    TargetEnemy(Deferred<EnemyId>),
    /// Choose a card in hand.
    SelectHandCard(Deferred<CardId>),
    /// Choose a card in the discard pile.
    SelectDiscardCard(Deferred<CardId>),
}

impl SubOperation {
    /// Operation name for error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SubOperation::TargetEnemy(_) => "target-enemy",
            SubOperation::SelectHandCard(_) => "select-hand-card",
            SubOperation::SelectDiscardCard(_) => "select-discard-card",
        }
    }
}

/// One scripted step of a custom intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomEffect {
    /// Add modifier stacks to a combatant.
    ApplyModifier {
        /// Holder.
        target: CombatantId,
        /// Kind.
        kind: ModifierKind,
        /// Stacks.
        magnitude: u32,
    },

    /// Create cards in the player's hand.
    GenerateCard {
        /// Definition.
        definition: DefinitionId,
        /// How many.
        count: u32,
    },

    /// Remove HP from an enemy, bypassing modifiers.
    DamageEnemy {
        /// Enemy.
        enemy: EnemyId,
        /// HP removed.
        amount: u32,
    },

    /// Stun an enemy at the start of a later turn.
    ScheduleStun {
        /// Enemy.
        enemy: EnemyId,
        /// Stun stacks.
        magnitude: u32,
        /// Turns from now.
        delay: u32,
    },
}

/// Scripted intent for tutorials and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomIntent {
    /// Author label, copied into the `custom` instruction.
    pub label: String,
    /// Steps, in order.
    pub effects: Vec<CustomEffect>,
}

impl CustomIntent {
    /// Create an empty custom intent.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            effects: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with(mut self, effect: CustomEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// A request to change battle state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Shuffle, plan, and open the battle.
    BattleStart,
    /// Begin the next player turn.
    StartTurn {
        /// Cards to draw.
        draw: u32,
    },
    /// Play a card from hand.
    PlayCard {
        /// Card to play.
        card: Deferred<CardId>,
        /// Choices, resolved in order after the card leaves the hand.
        operations: Vec<SubOperation>,
    },
    /// End the player turn and run the enemy turn.
    EndTurn,
    /// Scripted effects.
    Custom(CustomIntent),
}

impl Intent {
    /// Play a card with concrete choices.
    #[must_use]
    pub fn play(card: CardId, operations: Vec<SubOperation>) -> Self {
        Intent::PlayCard {
            card: Deferred::Value(card),
            operations,
        }
    }

    /// Play a card against one enemy.
    #[must_use]
    pub fn play_targeted(card: CardId, target: EnemyId) -> Self {
        Self::play(card, vec![SubOperation::TargetEnemy(Deferred::Value(target))])
    }

    /// Intent name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Intent::BattleStart => "battle-start",
            Intent::StartTurn { .. } => "start-turn",
            Intent::PlayCard { .. } => "play-card",
            Intent::EndTurn => "end-turn",
            Intent::Custom(_) => "custom",
        }
    }
}

/// A sub-operation with its value frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedOperation {
    /// Chosen enemy.
    TargetEnemy(EnemyId),
    /// Chosen hand card.
    SelectHandCard(CardId),
    /// Chosen discard card.
    SelectDiscardCard(CardId),
}

/// An intent with every deferred value frozen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedIntent {
    /// See `Intent::BattleStart`.
    BattleStart,
    /// See `Intent::StartTurn`.
    StartTurn {
        /// Cards requested.
        draw: u32,
    },
    /// See `Intent::PlayCard`.
    PlayCard {
        /// Card played.
        card: CardId,
        /// Choices made.
        operations: Vec<ResolvedOperation>,
    },
    /// See `Intent::EndTurn`.
    EndTurn,
    /// See `Intent::Custom`.
    Custom(CustomIntent),
}

impl From<ResolvedOperation> for SubOperation {
    fn from(op: ResolvedOperation) -> Self {
        match op {
            ResolvedOperation::TargetEnemy(id) => SubOperation::TargetEnemy(Deferred::Value(id)),
            ResolvedOperation::SelectHandCard(id) => {
                SubOperation::SelectHandCard(Deferred::Value(id))
            }
            ResolvedOperation::SelectDiscardCard(id) => {
                SubOperation::SelectDiscardCard(Deferred::Value(id))
            }
        }
    }
}

/// A frozen intent re-issued with concrete values.
impl From<ResolvedIntent> for Intent {
    fn from(resolved: ResolvedIntent) -> Self {
        match resolved {
            ResolvedIntent::BattleStart => Intent::BattleStart,
            ResolvedIntent::StartTurn { draw } => Intent::StartTurn { draw },
            ResolvedIntent::PlayCard { card, operations } => Intent::PlayCard {
                card: Deferred::Value(card),
                operations: operations.into_iter().map(SubOperation::from).collect(),
            },
            ResolvedIntent::EndTurn => Intent::EndTurn,
            ResolvedIntent::Custom(custom) => Intent::Custom(custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_resolved() {
        assert_eq!(CardId::from_resolved(3), Some(CardId::new(3)));
        assert_eq!(EnemyId::from_resolved(1), Some(EnemyId::new(1)));
        assert_eq!(CardId::from_resolved(i64::from(u32::MAX) + 1), None);
    }

    #[test]
    fn test_resolved_round_trip_into_intent() {
        let resolved = ResolvedIntent::PlayCard {
            card: CardId::new(4),
            operations: vec![ResolvedOperation::TargetEnemy(EnemyId::new(0))],
        };

        let intent = Intent::from(resolved);

        assert_eq!(intent, Intent::play_targeted(CardId::new(4), EnemyId::new(0)));
        assert_eq!(intent.name(), "play-card");
    }

    #[test]
    fn test_intent_json_has_no_closures() {
        let intent = Intent::PlayCard {
            card: Deferred::Resolver(ResolverHandle { intent: 3, slot: 0 }),
            operations: vec![SubOperation::SelectHandCard(CardId::new(2).into())],
        };

        let json = serde_json::to_string(&intent).unwrap();
        let back: Intent = serde_json::from_str(&json).unwrap();

        assert_eq!(intent, back);
    }
}
