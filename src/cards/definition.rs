//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: cost,
//! category, tags, and the ordered effects it resolves when played. The
//! target shape and any card selection the card needs are derived from its
//! effects, so a definition can never ask for a target it does not use.
//!
//! Instance-specific data (identity, runtime cost, playability) lives in
//! `Card`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::damage::{AttackCategory, DamageBase};
use crate::modifiers::ModifierKind;

/// Identifier of a card definition.
///
/// This identifies the "type" of card (e.g. "Strike"), not a specific
/// instance in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefinitionId(pub u32);

impl DefinitionId {
    /// Create a new definition ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Definition({})", self.0)
    }
}

/// Broad card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Deals damage.
    Attack,
    /// Utility: modifiers, draw, energy.
    Skill,
    /// Generated during battle by enemy attacks.
    Memory,
}

/// Markers read by modifier and zone rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTag {
    /// Attack card.
    Attack,
    /// Skill card; runtime cost is reduced by `Focus`.
    Skill,
    /// Generated from an enemy's memory attack.
    Memory,
    /// Exiled instead of discarded when played.
    Fleeting,
    /// Stays in hand at turn end.
    Retain,
}

/// Who an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The player playing the card.
    Player,
    /// The enemy chosen with a `TargetEnemy` sub-operation.
    Target,
    /// Every active enemy, in team order.
    AllEnemies,
}

/// Which zone a card selection is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionZone {
    /// A card in hand (other than the one being played).
    Hand,
    /// A card in the discard pile.
    Discard,
}

/// Targeting requirement of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetShape {
    /// No enemy target.
    None,
    /// Exactly one active enemy.
    SingleEnemy,
    /// Hits every active enemy; no choice needed.
    AllEnemies,
}

/// One step of a card's resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Deal damage, resolved through the modifier pipeline.
    Damage {
        /// Who is hit.
        target: EffectTarget,
        /// Unmodified amount, hit count and category.
        base: DamageBase,
    },

    /// Add stacks of a modifier.
    ApplyModifier {
        /// Who receives it.
        target: EffectTarget,
        /// Modifier kind.
        kind: ModifierKind,
        /// Stacks added.
        magnitude: u32,
    },

    /// Draw cards from the deck.
    Draw(u32),

    /// Gain energy this turn.
    GainEnergy(u32),

    /// Exile the selected hand card.
    ExileSelected,

    /// Discard the selected hand card.
    DiscardSelected,

    /// Return the selected discard card to hand. Requires hand room.
    RecallSelected,

    /// Create new cards in hand.
    Generate {
        /// Definition of the generated cards.
        definition: DefinitionId,
        /// How many.
        count: u32,
    },

    /// Resolve `effect` at the start of a later turn.
    Schedule {
        /// Turns from now (1 = next turn start).
        delay: u32,
        /// Deferred effect.
        effect: Box<CardEffect>,
    },
}

impl CardEffect {
    /// Single-hit attack against the chosen target.
    #[must_use]
    pub fn strike(amount: u32) -> Self {
        CardEffect::Damage {
            target: EffectTarget::Target,
            base: DamageBase::single(amount),
        }
    }

    /// Multi-hit attack against the chosen target.
    #[must_use]
    pub fn flurry(amount: u32, hits: u32) -> Self {
        CardEffect::Damage {
            target: EffectTarget::Target,
            base: DamageBase::multi(amount, hits),
        }
    }

    /// Modifier applied to the chosen target.
    #[must_use]
    pub fn afflict(kind: ModifierKind, magnitude: u32) -> Self {
        CardEffect::ApplyModifier {
            target: EffectTarget::Target,
            kind,
            magnitude,
        }
    }

    /// Modifier applied to the player.
    #[must_use]
    pub fn empower(kind: ModifierKind, magnitude: u32) -> Self {
        CardEffect::ApplyModifier {
            target: EffectTarget::Player,
            kind,
            magnitude,
        }
    }

    /// Delay an effect by `delay` turns.
    #[must_use]
    pub fn scheduled(delay: u32, effect: CardEffect) -> Self {
        assert!(delay > 0, "Scheduled effects need a delay of at least 1 turn");
        CardEffect::Schedule {
            delay,
            effect: Box::new(effect),
        }
    }

    /// Enemy target this effect addresses, looking through schedules.
    #[must_use]
    pub fn effect_target(&self) -> Option<EffectTarget> {
        match self {
            CardEffect::Damage { target, .. } | CardEffect::ApplyModifier { target, .. } => {
                Some(*target)
            }
            CardEffect::Schedule { effect, .. } => effect.effect_target(),
            _ => None,
        }
    }

    /// Selection zone this effect reads, looking through schedules.
    #[must_use]
    pub fn selection(&self) -> Option<SelectionZone> {
        match self {
            CardEffect::ExileSelected | CardEffect::DiscardSelected => Some(SelectionZone::Hand),
            CardEffect::RecallSelected => Some(SelectionZone::Discard),
            CardEffect::Schedule { effect, .. } => effect.selection(),
            _ => None,
        }
    }

    /// Attack category if this effect deals damage.
    #[must_use]
    pub fn attack_category(&self) -> Option<AttackCategory> {
        match self {
            CardEffect::Damage { base, .. } => Some(base.category),
            CardEffect::Schedule { effect, .. } => effect.attack_category(),
            _ => None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_battle::cards::{CardCategory, CardDefinition, CardEffect, DefinitionId, TargetShape};
///
/// let strike = CardDefinition::new(DefinitionId::new(1), "Strike", CardCategory::Attack, 1)
///     .with_effect(CardEffect::strike(6));
///
/// assert_eq!(strike.target_shape(), TargetShape::SingleEnemy);
/// assert!(strike.selection().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this definition.
    pub id: DefinitionId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Card category.
    pub category: CardCategory,

    /// Base energy cost.
    pub cost: u32,

    /// Tags copied onto every instance.
    pub tags: SmallVec<[CardTag; 4]>,

    /// Effects resolved in order when played.
    pub effects: Vec<CardEffect>,

    /// Wait hint overriding the pacing table for this card's effects.
    pub wait_ms: Option<u32>,
}

impl CardDefinition {
    /// Create a definition with no effects.
    ///
    /// The category's own tag (`Attack`, `Skill`, `Memory`) is added
    /// automatically.
    #[must_use]
    pub fn new(id: DefinitionId, name: impl Into<String>, category: CardCategory, cost: u32) -> Self {
        let tag = match category {
            CardCategory::Attack => CardTag::Attack,
            CardCategory::Skill => CardTag::Skill,
            CardCategory::Memory => CardTag::Memory,
        };
        let mut tags = SmallVec::new();
        tags.push(tag);

        Self {
            id,
            name: name.into(),
            category,
            cost,
            tags,
            effects: Vec::new(),
            wait_ms: None,
        }
    }

    /// Append an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: CardTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Override the wait hint for this card's effects.
    #[must_use]
    pub fn with_wait(mut self, wait_ms: u32) -> Self {
        self.wait_ms = Some(wait_ms);
        self
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: CardTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Targeting requirement derived from the effects.
    ///
    /// Any effect addressing the chosen target makes the card single-target;
    /// otherwise any all-enemies effect makes it area; otherwise none.
    #[must_use]
    pub fn target_shape(&self) -> TargetShape {
        let targets: SmallVec<[EffectTarget; 4]> =
            self.effects.iter().filter_map(CardEffect::effect_target).collect();

        if targets.contains(&EffectTarget::Target) {
            TargetShape::SingleEnemy
        } else if targets.contains(&EffectTarget::AllEnemies) {
            TargetShape::AllEnemies
        } else {
            TargetShape::None
        }
    }

    /// Zone a card selection is taken from, if any effect needs one.
    ///
    /// Panics if effects disagree on the zone; definitions like that are an
    /// authoring error.
    #[must_use]
    pub fn selection(&self) -> Option<SelectionZone> {
        let mut found = None;
        for zone in self.effects.iter().filter_map(CardEffect::selection) {
            match found {
                None => found = Some(zone),
                Some(existing) if existing == zone => {}
                Some(existing) => panic!(
                    "Card {} selects from both {:?} and {:?}",
                    self.name, existing, zone
                ),
            }
        }
        found
    }
}
