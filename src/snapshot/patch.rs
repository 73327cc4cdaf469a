//! Snapshot diffs for incremental consumers.
//!
//! A patch carries each top-level field that changed between two
//! snapshots; enemies are diffed individually. Applying the patch to the
//! older snapshot yields the newer one.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::view::{BattleSnapshot, CardView, EnemyView};
use crate::battle::{BattleStatus, Phase, Player, ScheduledEvent};
use crate::zones::ZoneKind;

/// Fields changed since the previous batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPatch {
    /// New turn number.
    pub turn: Option<u32>,
    /// New phase.
    pub phase: Option<Phase>,
    /// New battle status.
    pub status: Option<BattleStatus>,
    /// Player state, if any field of it changed.
    pub player: Option<Player>,
    /// Changed enemies only.
    pub enemies: Vec<EnemyView>,
    /// Whole deck, if its contents or order changed.
    pub deck: Option<Vector<CardView>>,
    /// Whole hand, if it changed.
    pub hand: Option<Vector<CardView>>,
    /// Whole discard pile, if it changed.
    pub discard: Option<Vector<CardView>>,
    /// Whole exile zone, if it changed.
    pub exile: Option<Vector<CardView>>,
    /// Scheduled events, if the queue changed.
    pub scheduled: Option<Vector<ScheduledEvent>>,
}

fn changed<T: Clone + PartialEq>(prev: &T, next: &T) -> Option<T> {
    (prev != next).then(|| next.clone())
}

impl SnapshotPatch {
    /// Diff two snapshots of the same battle.
    #[must_use]
    pub fn between(prev: &BattleSnapshot, next: &BattleSnapshot) -> Self {
        let enemies = next
            .enemies
            .iter()
            .filter(|&enemy| prev.enemy(enemy.id) != Some(enemy))
            .cloned()
            .collect();

        Self {
            turn: changed(&prev.turn, &next.turn),
            phase: changed(&prev.phase, &next.phase),
            status: changed(&prev.status, &next.status),
            player: changed(&prev.player, &next.player),
            enemies,
            deck: changed(&prev.deck, &next.deck),
            hand: changed(&prev.hand, &next.hand),
            discard: changed(&prev.discard, &next.discard),
            exile: changed(&prev.exile, &next.exile),
            scheduled: changed(&prev.scheduled, &next.scheduled),
        }
    }

    /// Patch carrying every field, for the first batch of a battle.
    #[must_use]
    pub fn full(next: &BattleSnapshot) -> Self {
        Self {
            turn: Some(next.turn),
            phase: Some(next.phase),
            status: Some(next.status),
            player: Some(next.player.clone()),
            enemies: next.enemies.iter().cloned().collect(),
            deck: Some(next.deck.clone()),
            hand: Some(next.hand.clone()),
            discard: Some(next.discard.clone()),
            exile: Some(next.exile.clone()),
            scheduled: Some(next.scheduled.clone()),
        }
    }

    /// Check if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Zones this patch replaces.
    #[must_use]
    pub fn zones(&self) -> Vec<ZoneKind> {
        ZoneKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ZoneKind::Deck => self.deck.is_some(),
                ZoneKind::Hand => self.hand.is_some(),
                ZoneKind::Discard => self.discard.is_some(),
                ZoneKind::Exile => self.exile.is_some(),
            })
            .collect()
    }

    /// Apply to the snapshot this patch was computed from.
    #[must_use]
    pub fn apply(&self, base: &BattleSnapshot) -> BattleSnapshot {
        let mut next = base.clone();

        if let Some(turn) = self.turn {
            next.turn = turn;
        }
        if let Some(phase) = self.phase {
            next.phase = phase;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(player) = &self.player {
            next.player = player.clone();
        }
        for enemy in &self.enemies {
            let idx = enemy.id.index();
            if idx < next.enemies.len() {
                next.enemies.set(idx, enemy.clone());
            } else {
                next.enemies.push_back(enemy.clone());
            }
        }
        if let Some(deck) = &self.deck {
            next.deck = deck.clone();
        }
        if let Some(hand) = &self.hand {
            next.hand = hand.clone();
        }
        if let Some(discard) = &self.discard {
            next.discard = discard.clone();
        }
        if let Some(exile) = &self.exile {
            next.exile = exile.clone();
        }
        if let Some(scheduled) = &self.scheduled {
            next.scheduled = scheduled.clone();
        }

        next
    }
}
