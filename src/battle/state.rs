//! Battle state and queries.
//!
//! `Battle` owns every piece of mutable state: the card arena, the zones,
//! the combatants, the scheduled events, and the recorder that turns state
//! changes into animation batches. It changes only through
//! `Battle::resolve`; everything here is read-only apart from the small
//! helpers resolution uses to emit instructions.

use std::sync::Arc;

use super::phase::{BattleStatus, Phase};
use super::player::Player;
use super::recorder::Recorder;
use super::scheduled::ScheduledQueue;
use crate::cards::{CardId, CardRepository, CardTag, SelectionZone, TargetShape};
use crate::core::{BattleConfig, BattleRng, CombatantId, EnemyId};
use crate::enemies::Enemy;
use crate::history::{Instruction, Presentation};
use crate::modifiers::{ModifierIds, ModifierKind, ModifierSet};
use crate::snapshot::BattleSnapshot;
use crate::zones::{ZoneKind, Zones};

/// A single battle.
///
/// Cloning is cheap apart from the card arena; resolution clones the
/// battle, works on the clone, and commits it only on success.
#[derive(Clone, Debug)]
pub struct Battle {
    pub(super) config: Arc<BattleConfig>,
    pub(super) repository: CardRepository,
    pub(super) zones: Zones,
    pub(super) player: Player,
    pub(super) enemies: Vec<Enemy>,
    pub(super) turn: u32,
    pub(super) phase: Phase,
    pub(super) status: BattleStatus,
    pub(super) rng: BattleRng,
    pub(super) modifier_ids: ModifierIds,
    pub(super) scheduled: ScheduledQueue,
    pub(super) recorder: Recorder,
    pub(super) wait_override: Option<u32>,
}

impl Battle {
    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Card arena.
    #[must_use]
    pub fn repository(&self) -> &CardRepository {
        &self.repository
    }

    /// Zones.
    #[must_use]
    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    /// Cards in hand, in order.
    pub fn hand(&self) -> impl Iterator<Item = CardId> + '_ {
        self.zones.iter(ZoneKind::Hand)
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Enemies in team order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Enemy by id.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id.index())
    }

    /// Current turn (0 before the first `StartTurn`).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Overall status.
    #[must_use]
    pub fn status(&self) -> BattleStatus {
        self.status
    }

    /// Check if the battle has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Pending scheduled events.
    #[must_use]
    pub fn scheduled(&self) -> &ScheduledQueue {
        &self.scheduled
    }

    /// Project the current state.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(self)
    }

    /// Modifiers held by a combatant.
    ///
    /// Panics on an enemy id outside the team.
    #[must_use]
    pub fn modifiers_of(&self, who: CombatantId) -> &ModifierSet {
        match who {
            CombatantId::Player => &self.player.modifiers,
            CombatantId::Enemy(id) => &self.enemies[id.index()].modifiers,
        }
    }

    /// Card cost after `Focus`.
    #[must_use]
    pub fn runtime_cost(&self, card: CardId) -> u32 {
        let instance = self.repository.get_unchecked(card);
        let base = self.repository.definition_of(card).cost;
        if instance.has_tag(CardTag::Skill) {
            base.saturating_sub(self.player.modifiers.magnitude(ModifierKind::Focus))
        } else {
            base
        }
    }

    /// Check if a hand card can be played now.
    #[must_use]
    pub fn is_playable(&self, card: CardId) -> bool {
        if self.is_finished()
            || self.phase != Phase::PlayerAct
            || !self.zones.contains(ZoneKind::Hand, card)
            || self.runtime_cost(card) > self.player.energy
        {
            return false;
        }

        let definition = self.repository.definition_of(card);
        let has_target = match definition.target_shape() {
            TargetShape::SingleEnemy | TargetShape::AllEnemies => {
                !self.legal_targets().is_empty()
            }
            TargetShape::None => true,
        };
        let has_selection = match definition.selection() {
            Some(SelectionZone::Hand) => self.zones.len(ZoneKind::Hand) > 1,
            Some(SelectionZone::Discard) => {
                !self.zones.is_empty(ZoneKind::Discard)
                    && self.zones.len(ZoneKind::Hand) <= self.config.hand_capacity
            }
            None => true,
        };
        has_target && has_selection
    }

    /// Hand cards that can be played now.
    #[must_use]
    pub fn playable_cards(&self) -> Vec<CardId> {
        self.hand().filter(|&card| self.is_playable(card)).collect()
    }

    /// Enemies that can be targeted.
    #[must_use]
    pub fn legal_targets(&self) -> Vec<EnemyId> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_active())
            .map(|enemy| enemy.id)
            .collect()
    }

    /// Hand cards that may be selected while `playing` resolves.
    #[must_use]
    pub fn legal_hand_selections(&self, playing: CardId) -> Vec<CardId> {
        self.hand().filter(|&card| card != playing).collect()
    }

    /// Discard cards that may be selected while `playing` resolves.
    #[must_use]
    pub fn legal_discard_selections(&self, playing: CardId) -> Vec<CardId> {
        self.zones
            .iter(ZoneKind::Discard)
            .filter(|&card| card != playing)
            .collect()
    }

    /// Queue an instruction with the pacing wait for its stage.
    pub(super) fn emit(&mut self, detail: Presentation) {
        let wait_ms = self
            .wait_override
            .unwrap_or_else(|| self.config.pacing.wait_for(detail.stage()));
        self.recorder.push(Instruction { wait_ms, detail });
    }

    /// Seal queued instructions into a batch with the current snapshot.
    pub(super) fn flush(&mut self) {
        self.refresh_cards();
        let snapshot = self.snapshot();
        self.recorder.seal(snapshot);
    }

    /// Recompute runtime cost and playability of every card.
    fn refresh_cards(&mut self) {
        let updates: Vec<(CardId, u32, bool)> = ZoneKind::ALL
            .iter()
            .flat_map(|&kind| self.zones.iter(kind))
            .map(|card| (card, self.runtime_cost(card), self.is_playable(card)))
            .collect();

        for (card, cost, active) in updates {
            if let Some(instance) = self.repository.get_mut(card) {
                instance.cost = cost;
                instance.active = active;
            }
        }
    }
}
