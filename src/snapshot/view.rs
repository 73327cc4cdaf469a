//! Snapshot projection.

use std::hash::Hasher;

use im::Vector;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::battle::{Battle, BattleStatus, Phase, Player, ScheduledEvent};
use crate::cards::{CardId, CardTag, DefinitionId};
use crate::core::EnemyId;
use crate::enemies::{Enemy, EnemyAction, EnemyStatus, PlannedAction};
use crate::modifiers::ModifierSet;
use crate::zones::ZoneKind;

/// A card as presented.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardView {
    /// Identity.
    pub id: CardId,
    /// Definition.
    pub definition: DefinitionId,
    /// Runtime cost.
    pub cost: u32,
    /// Playable right now.
    pub active: bool,
    /// Instance tags.
    pub tags: SmallVec<[CardTag; 4]>,
}

/// An enemy as presented.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyView {
    /// Identity.
    pub id: EnemyId,
    /// Display name.
    pub name: String,
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Held modifiers.
    pub modifiers: ModifierSet,
    /// Upcoming actions, front first.
    pub plan: Vector<PlannedAction>,
    /// Acted this turn.
    pub acted: bool,
    /// Stun threshold.
    pub stun_threshold: u32,
    /// Still fighting, defeated, or gone.
    pub status: EnemyStatus,
}

impl EnemyView {
    fn capture(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            name: enemy.name.clone(),
            hp: enemy.hp,
            max_hp: enemy.max_hp,
            modifiers: enemy.modifiers.clone(),
            plan: enemy.plan.view(),
            acted: enemy.acted,
            stun_threshold: enemy.stun_threshold,
            status: enemy.status,
        }
    }

    /// Action planned for `turn`.
    #[must_use]
    pub fn planned(&self, turn: u32) -> Option<&EnemyAction> {
        self.plan
            .iter()
            .find(|slot| slot.turn == turn)
            .map(|slot| &slot.action)
    }
}

/// Complete read-only battle state at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Turn number (0 before the first turn).
    pub turn: u32,
    /// Phase.
    pub phase: Phase,
    /// Overall status.
    pub status: BattleStatus,
    /// Player.
    pub player: Player,
    /// Enemies in team order.
    pub enemies: Vector<EnemyView>,
    /// Draw pile, next card first.
    pub deck: Vector<CardView>,
    /// Hand.
    pub hand: Vector<CardView>,
    /// Discard pile.
    pub discard: Vector<CardView>,
    /// Exiled cards.
    pub exile: Vector<CardView>,
    /// Pending scheduled events, in firing order.
    pub scheduled: Vector<ScheduledEvent>,
}

impl BattleSnapshot {
    /// Project a battle.
    #[must_use]
    pub fn capture(battle: &Battle) -> Self {
        let zone = |kind: ZoneKind| -> Vector<CardView> {
            battle
                .zones()
                .iter(kind)
                .map(|id| {
                    let card = battle.repository().get_unchecked(id);
                    CardView {
                        id,
                        definition: card.definition,
                        cost: card.cost,
                        active: card.active,
                        tags: card.tags.clone(),
                    }
                })
                .collect()
        };

        Self {
            turn: battle.turn(),
            phase: battle.phase(),
            status: battle.status(),
            player: battle.player().clone(),
            enemies: battle.enemies().iter().map(EnemyView::capture).collect(),
            deck: zone(ZoneKind::Deck),
            hand: zone(ZoneKind::Hand),
            discard: zone(ZoneKind::Discard),
            exile: zone(ZoneKind::Exile),
            scheduled: battle.scheduled().view(),
        }
    }

    /// Cards in a zone.
    #[must_use]
    pub fn zone(&self, kind: ZoneKind) -> &Vector<CardView> {
        match kind {
            ZoneKind::Deck => &self.deck,
            ZoneKind::Hand => &self.hand,
            ZoneKind::Discard => &self.discard,
            ZoneKind::Exile => &self.exile,
        }
    }

    /// Card ids in a zone, in order.
    #[must_use]
    pub fn card_ids(&self, kind: ZoneKind) -> Vec<CardId> {
        self.zone(kind).iter().map(|card| card.id).collect()
    }

    /// Zone holding a card.
    #[must_use]
    pub fn locate(&self, card: CardId) -> Option<ZoneKind> {
        ZoneKind::ALL
            .into_iter()
            .find(|&kind| self.zone(kind).iter().any(|view| view.id == card))
    }

    /// Cards across every zone.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        ZoneKind::ALL.iter().map(|&kind| self.zone(kind).len()).sum()
    }

    /// Enemy by id.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&EnemyView> {
        self.enemies.get(id.index())
    }

    /// Stable hash of the encoded snapshot, for divergence reports.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = bincode::serialize(self).expect("snapshots always encode");
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        hasher.finish()
    }
}
