//! End of the player turn and the enemy turn that follows.

use tracing::{debug, info};

use super::phase::Phase;
use super::state::Battle;
use crate::cards::{CardId, CardTag};
use crate::core::CombatantId;
use crate::enemies::{EnemyAction, PlannedAction};
use crate::history::Presentation;
use crate::modifiers::ModifierChange;

impl Battle {
    pub(super) fn end_turn(&mut self) {
        let (retained, discarded): (Vec<CardId>, Vec<CardId>) = self
            .hand()
            .partition(|&card| self.repository.get_unchecked(card).has_tag(CardTag::Retain));
        for &card in &discarded {
            self.zones.discard(card);
        }
        self.emit(Presentation::TurnEnd {
            turn: self.turn,
            discarded,
            retained,
        });
        self.phase = Phase::EnemyTurn;
        self.flush();

        for idx in 0..self.enemies.len() {
            if !self.enemies[idx].is_active() {
                continue;
            }
            self.enemy_act(idx);
            if self.is_finished() {
                return;
            }
        }

        self.end_round();
    }

    fn enemy_act(&mut self, idx: usize) {
        let id = self.enemies[idx].id;
        let turn = self.turn;

        let upcoming = self.enemies[idx]
            .plan
            .front()
            .map_or_else(EnemyAction::idle, |slot: &PlannedAction| slot.action.clone());
        self.emit(Presentation::EnemyHighlight {
            enemy: id,
            action: upcoming,
        });
        self.flush();

        let action = self.enemies[idx].take_action(turn);
        debug!(enemy = %id, turn, ?action, "enemy acts");

        match action {
            EnemyAction::Attack { base, memory } => {
                let lost = self.attack(CombatantId::Enemy(id), CombatantId::Player, base);
                if let Some(definition) = memory.filter(|_| lost > 0 && !self.is_finished()) {
                    self.generate_card(definition, &[CardTag::Memory], Some(id));
                }
            }
            EnemyAction::Buff { kind, magnitude } => {
                self.apply_modifier(CombatantId::Enemy(id), kind, magnitude);
            }
            EnemyAction::Debuff { kind, magnitude } => {
                self.apply_modifier(CombatantId::Player, kind, magnitude);
            }
            EnemyAction::Escape => {
                self.enemies[idx].escape();
                info!(enemy = %id, "enemy escaped");
                self.emit(Presentation::Escape { enemy: id });
                self.flush();
                self.check_victory();
            }
            EnemyAction::Skip { .. } => {}
        }
        self.flush();

        if self.is_finished() || !self.enemies[idx].is_active() {
            return;
        }
        let planned = self.enemies[idx].plan_ahead(turn + 1, self.config.plan_horizon);
        if !planned.is_empty() {
            self.emit(Presentation::EnemyPlan { enemy: id, planned });
            self.flush();
        }
    }

    fn end_round(&mut self) {
        let player: Vec<ModifierChange> = self.player.modifiers.decay();
        for change in player {
            self.emit(Presentation::Modifier {
                holder: CombatantId::Player,
                change,
            });
        }

        for idx in 0..self.enemies.len() {
            if !self.enemies[idx].is_active() {
                continue;
            }
            let holder = CombatantId::Enemy(self.enemies[idx].id);
            for change in self.enemies[idx].modifiers.decay() {
                self.emit(Presentation::Modifier { holder, change });
            }
        }

        self.phase = Phase::TurnPending;
        self.flush();
    }
}
