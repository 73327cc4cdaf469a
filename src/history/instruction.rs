//! Presentation instructions.
//!
//! Every state change the battle makes is announced with an `Instruction`:
//! a typed `Presentation` detail plus a wait hint. The engine never
//! interprets the wait; it only copies it from the pacing table (or the
//! playing card's override) so the presentation layer can schedule its
//! animations.

use serde::{Deserialize, Serialize};

use crate::battle::ScheduledEvent;
use crate::cards::CardId;
use crate::core::{CombatantId, EnemyId};
use crate::damage::DamageDescriptor;
use crate::enemies::{EnemyAction, PlannedAction};
use crate::modifiers::ModifierChange;
use crate::zones::ZoneKind;

/// Stage tag of an instruction.
///
/// Serialized in kebab-case (`card-move`, `enemy-highlight`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// The battle opened.
    BattleStart,
    /// A player turn began.
    TurnStart,
    /// Cards were drawn.
    Draw,
    /// The discard pile was shuffled into the deck.
    Reshuffle,
    /// A card changed zone.
    CardMove,
    /// Player energy changed.
    Energy,
    /// An attack landed.
    Damage,
    /// A modifier was applied, changed, or removed.
    Modifier,
    /// An enemy was stunned.
    Stun,
    /// An enemy was defeated.
    Defeat,
    /// An enemy is about to act.
    EnemyHighlight,
    /// An enemy revealed its next actions.
    EnemyPlan,
    /// An enemy added a memory card.
    MemoryCard,
    /// A card could not fit in the hand.
    HandOverflow,
    /// An enemy left the battle.
    Escape,
    /// A delayed event was queued, fired, or fizzled.
    Scheduled,
    /// The player turn ended.
    TurnEnd,
    /// Every enemy is gone.
    Victory,
    /// The player was defeated.
    #[serde(rename = "defeat-player")]
    PlayerDefeat,
    /// Emitted by a custom intent.
    Custom,
}

impl Stage {
    /// Tag as presented to consumers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::BattleStart => "battle-start",
            Stage::TurnStart => "turn-start",
            Stage::Draw => "draw",
            Stage::Reshuffle => "reshuffle",
            Stage::CardMove => "card-move",
            Stage::Energy => "energy",
            Stage::Damage => "damage",
            Stage::Modifier => "modifier",
            Stage::Stun => "stun",
            Stage::Defeat => "defeat",
            Stage::EnemyHighlight => "enemy-highlight",
            Stage::EnemyPlan => "enemy-plan",
            Stage::MemoryCard => "memory-card",
            Stage::HandOverflow => "hand-overflow",
            Stage::Escape => "escape",
            Stage::Scheduled => "scheduled",
            Stage::TurnEnd => "turn-end",
            Stage::Victory => "victory",
            Stage::PlayerDefeat => "defeat-player",
            Stage::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a scheduled event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    /// Queued for a later turn.
    Queued,
    /// Resolved at its due turn.
    Fired,
    /// Due, but its target or selection was gone.
    Fizzled,
}

/// Typed detail of an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presentation {
    /// Battle opened.
    BattleStart {
        /// Cards in the deck.
        deck: usize,
        /// Enemies in the team.
        enemies: usize,
    },

    /// A player turn began.
    TurnStart {
        /// Turn number.
        turn: u32,
    },

    /// Cards moved from the deck to the hand.
    Draw {
        /// Cards drawn, in order.
        cards: Vec<CardId>,
    },

    /// The discard was shuffled into the deck.
    Reshuffle {
        /// Cards drawn before the reshuffle.
        after: usize,
        /// Cards now in the deck.
        cards: usize,
    },

    /// A card changed zones. `from` is `None` for newly created cards.
    CardMove {
        /// Card.
        card: CardId,
        /// Source zone.
        from: Option<ZoneKind>,
        /// Destination zone.
        to: ZoneKind,
    },

    /// Player energy changed.
    Energy {
        /// Before.
        before: u32,
        /// After.
        after: u32,
    },

    /// An attack resolved.
    Damage {
        /// Attacker.
        source: CombatantId,
        /// Defender.
        target: CombatantId,
        /// Resolved numbers and contributing modifiers.
        descriptor: DamageDescriptor,
        /// Hits that landed before the defender went down.
        hits: u32,
        /// HP actually lost.
        hp_lost: u32,
    },

    /// A modifier's magnitude changed.
    Modifier {
        /// Holder.
        holder: CombatantId,
        /// Change.
        change: ModifierChange,
    },

    /// A stun reached its threshold and replaced a planned action.
    Stun {
        /// Stunned enemy.
        enemy: EnemyId,
        /// Turn whose action became a skip.
        turn: Option<u32>,
    },

    /// An enemy was reduced to 0 HP.
    Defeat {
        /// Enemy.
        enemy: EnemyId,
    },

    /// An enemy is about to act.
    EnemyHighlight {
        /// Enemy.
        enemy: EnemyId,
        /// Action it is about to take.
        action: EnemyAction,
    },

    /// An enemy's upcoming plan changed.
    EnemyPlan {
        /// Enemy.
        enemy: EnemyId,
        /// Newly planned slots.
        planned: Vec<PlannedAction>,
    },

    /// A memory attack left a card in the player's hand.
    MemoryCard {
        /// Attacker.
        enemy: EnemyId,
        /// Generated card.
        card: CardId,
    },

    /// The hand is over capacity (placed anyway) or draws were skipped.
    HandOverflow {
        /// Card placed over capacity, if any.
        card: Option<CardId>,
        /// Draws skipped because the hand was full.
        blocked: u32,
        /// Hand size after the move.
        hand: usize,
        /// Configured capacity.
        capacity: usize,
    },

    /// An enemy left the battle.
    Escape {
        /// Enemy.
        enemy: EnemyId,
    },

    /// A scheduled event was queued, fired or fizzled.
    Scheduled {
        /// Event.
        event: ScheduledEvent,
        /// What happened.
        outcome: ScheduleOutcome,
    },

    /// The player turn ended.
    TurnEnd {
        /// Turn number.
        turn: u32,
        /// Cards discarded from hand.
        discarded: Vec<CardId>,
        /// Cards kept by `Retain`.
        retained: Vec<CardId>,
    },

    /// Every enemy is defeated or gone.
    Victory,

    /// The player was reduced to 0 HP.
    PlayerDefeat,

    /// A scripted intent ran.
    Custom {
        /// Author label.
        label: String,
    },
}

impl Presentation {
    /// Stage tag of this detail.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Presentation::BattleStart { .. } => Stage::BattleStart,
            Presentation::TurnStart { .. } => Stage::TurnStart,
            Presentation::Draw { .. } => Stage::Draw,
            Presentation::Reshuffle { .. } => Stage::Reshuffle,
            Presentation::CardMove { .. } => Stage::CardMove,
            Presentation::Energy { .. } => Stage::Energy,
            Presentation::Damage { .. } => Stage::Damage,
            Presentation::Modifier { .. } => Stage::Modifier,
            Presentation::Stun { .. } => Stage::Stun,
            Presentation::Defeat { .. } => Stage::Defeat,
            Presentation::EnemyHighlight { .. } => Stage::EnemyHighlight,
            Presentation::EnemyPlan { .. } => Stage::EnemyPlan,
            Presentation::MemoryCard { .. } => Stage::MemoryCard,
            Presentation::HandOverflow { .. } => Stage::HandOverflow,
            Presentation::Escape { .. } => Stage::Escape,
            Presentation::Scheduled { .. } => Stage::Scheduled,
            Presentation::TurnEnd { .. } => Stage::TurnEnd,
            Presentation::Victory => Stage::Victory,
            Presentation::PlayerDefeat => Stage::PlayerDefeat,
            Presentation::Custom { .. } => Stage::Custom,
        }
    }
}

/// One presentation step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Wait hint in milliseconds.
    pub wait_ms: u32,
    /// What to present.
    pub detail: Presentation,
}

impl Instruction {
    /// Stage tag.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.detail.stage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags_match_serde() {
        for (stage, tag) in [
            (Stage::CardMove, "card-move"),
            (Stage::EnemyHighlight, "enemy-highlight"),
            (Stage::PlayerDefeat, "defeat-player"),
            (Stage::BattleStart, "battle-start"),
        ] {
            assert_eq!(stage.as_str(), tag);
            assert_eq!(serde_json::to_string(&stage).unwrap(), format!("\"{tag}\""));
        }
    }

    #[test]
    fn test_presentation_stage() {
        let instruction = Instruction {
            wait_ms: 200,
            detail: Presentation::CardMove {
                card: CardId::new(1),
                from: Some(ZoneKind::Hand),
                to: ZoneKind::Discard,
            },
        };

        assert_eq!(instruction.stage(), Stage::CardMove);
        assert_eq!(Presentation::PlayerDefeat.stage().to_string(), "defeat-player");
    }
}
