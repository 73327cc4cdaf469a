//! Intent dispatch and the state changes shared by every intent.

use tracing::{debug, info, warn};

use super::phase::{BattleStatus, Phase};
use super::state::Battle;
use super::play::Choices;
use crate::cards::{CardEffect, CardId, CardTag, DefinitionId, EffectTarget};
use crate::core::{CombatantId, EnemyId, IntentError};
use crate::damage::{resolve_damage, DamageBase, DamageDescriptor};
use crate::history::{
    CustomEffect, CustomIntent, Intent, IntentOrigin, Presentation, ResolvedEntry, ResolvedIntent,
    ResolverScope, ScheduleOutcome,
};
use crate::modifiers::{ModifierKind, ModifierSet};
use crate::zones::{ZoneKind, ZonePosition};

impl Battle {
    /// Resolve one intent.
    ///
    /// Resolution runs on a scratch copy of the battle. On success the copy
    /// replaces `self` and the entry describing it is returned; on failure
    /// `self` is untouched.
    ///
    /// Panics if a deferred resolver returns a negative id.
    pub fn resolve(
        &mut self,
        index: usize,
        origin: IntentOrigin,
        intent: &Intent,
        resolvers: &ResolverScope<'_>,
    ) -> Result<ResolvedEntry, IntentError> {
        let mut scratch = self.clone();

        let resolved = match scratch.execute(intent, resolvers) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(index, intent = intent.name(), %err, "intent rejected");
                return Err(err);
            }
        };
        scratch.flush();

        let batches = scratch.recorder.take_batches();
        debug!(
            index,
            intent = intent.name(),
            batches = batches.len(),
            turn = scratch.turn,
            "intent resolved"
        );

        *self = scratch;
        Ok(ResolvedEntry {
            index,
            origin,
            intent: resolved,
            batches,
        })
    }

    fn execute(
        &mut self,
        intent: &Intent,
        resolvers: &ResolverScope<'_>,
    ) -> Result<ResolvedIntent, IntentError> {
        if self.is_finished() {
            return Err(IntentError::BattleFinished);
        }

        match intent {
            Intent::BattleStart => {
                self.require_phase(intent, Phase::Setup)?;
                self.start_battle();
                Ok(ResolvedIntent::BattleStart)
            }
            Intent::StartTurn { draw } => {
                self.require_phase(intent, Phase::TurnPending)?;
                self.start_turn(*draw);
                Ok(ResolvedIntent::StartTurn { draw: *draw })
            }
            Intent::PlayCard { card, operations } => {
                self.require_phase(intent, Phase::PlayerAct)?;
                self.play_card(card, operations, resolvers)
            }
            Intent::EndTurn => {
                self.require_phase(intent, Phase::PlayerAct)?;
                self.end_turn();
                Ok(ResolvedIntent::EndTurn)
            }
            Intent::Custom(custom) => {
                self.run_custom(custom)?;
                Ok(ResolvedIntent::Custom(custom.clone()))
            }
        }
    }

    fn require_phase(&self, intent: &Intent, phase: Phase) -> Result<(), IntentError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(IntentError::WrongPhase {
                intent: intent.name(),
                phase: self.phase,
            })
        }
    }

    fn start_battle(&mut self) {
        self.zones.shuffle_deck(&mut self.rng);
        self.emit(Presentation::BattleStart {
            deck: self.zones.len(ZoneKind::Deck),
            enemies: self.enemies.len(),
        });

        let horizon = self.config.plan_horizon;
        for idx in 0..self.enemies.len() {
            let planned = self.enemies[idx].plan_ahead(1, horizon);
            if !planned.is_empty() {
                let enemy = self.enemies[idx].id;
                self.emit(Presentation::EnemyPlan { enemy, planned });
            }
        }

        self.phase = Phase::TurnPending;
        self.flush();
    }

    fn start_turn(&mut self, draw: u32) {
        self.turn += 1;
        let max_energy = self.player.max_energy;
        let before = self.player.set_energy(max_energy);
        for enemy in &mut self.enemies {
            enemy.acted = false;
        }

        self.emit(Presentation::TurnStart { turn: self.turn });
        self.emit(Presentation::Energy {
            before,
            after: max_energy,
        });
        self.flush();

        self.fire_scheduled();
        if self.is_finished() {
            return;
        }

        self.phase = Phase::PlayerAct;
        self.draw_cards(draw);
        self.flush();
    }

    fn fire_scheduled(&mut self) {
        for event in self.scheduled.take_due(self.turn) {
            if self.is_finished() {
                break;
            }

            let choices = Choices {
                source: event.source,
                target: event.target,
                selection: event.selection,
            };
            let target_gone = event.effect.effect_target() == Some(EffectTarget::Target)
                && !event.target.is_some_and(|id| self.is_active_enemy(id));
            let fizzled = target_gone || self.check_effect(&event.effect, &choices).is_err();

            let outcome = if fizzled {
                ScheduleOutcome::Fizzled
            } else {
                ScheduleOutcome::Fired
            };
            debug!(event = event.id, turn = self.turn, ?outcome, "scheduled event due");
            self.emit(Presentation::Scheduled {
                event: event.clone(),
                outcome,
            });
            self.flush();

            if !fizzled {
                self.apply_effect(&event.effect, &choices);
            }
        }
    }

    /// Draw from the deck, announcing reshuffles and skipped draws.
    pub(super) fn draw_cards(&mut self, count: u32) {
        let capacity = self.config.hand_capacity;
        let outcome = self.zones.draw(count, capacity, &mut self.rng);

        let split = outcome.reshuffled_after.unwrap_or(outcome.drawn.len());
        let (before, after) = outcome.drawn.split_at(split);
        if !before.is_empty() {
            self.emit(Presentation::Draw {
                cards: before.to_vec(),
            });
        }
        if let Some(drawn_before) = outcome.reshuffled_after {
            self.emit(Presentation::Reshuffle {
                after: drawn_before,
                cards: after.len() + self.zones.len(ZoneKind::Deck),
            });
        }
        if !after.is_empty() {
            self.emit(Presentation::Draw {
                cards: after.to_vec(),
            });
        }

        if outcome.blocked_by_capacity > 0 {
            let hand = self.zones.len(ZoneKind::Hand);
            warn!(blocked = outcome.blocked_by_capacity, hand, capacity, "draws blocked by full hand");
            self.emit(Presentation::HandOverflow {
                card: None,
                blocked: outcome.blocked_by_capacity,
                hand,
                capacity,
            });
        }
    }

    pub(super) fn is_active_enemy(&self, id: EnemyId) -> bool {
        self.enemy(id).is_some_and(|enemy| enemy.is_active())
    }

    fn is_down(&self, who: CombatantId) -> bool {
        match who {
            CombatantId::Player => self.player.is_defeated(),
            CombatantId::Enemy(id) => !self.is_active_enemy(id),
        }
    }

    /// Resolve an attack hit by hit, stopping when the defender goes down.
    ///
    /// Returns the HP the defender lost.
    pub(super) fn attack(&mut self, source: CombatantId, target: CombatantId, base: DamageBase) -> u32 {
        let descriptor = resolve_damage(base, self.modifiers_of(source), self.modifiers_of(target));
        self.land_hits(source, target, descriptor)
    }

    fn land_hits(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        descriptor: DamageDescriptor,
    ) -> u32 {
        let was_up = !self.is_down(target);
        let mut hits = 0;
        let mut hp_lost = 0;
        for _ in 0..descriptor.count {
            if self.is_down(target) {
                break;
            }
            hp_lost += match target {
                CombatantId::Player => self.player.take_damage(descriptor.amount),
                CombatantId::Enemy(id) => self.enemies[id.index()].take_damage(descriptor.amount),
            };
            hits += 1;
        }

        debug!(%source, %target, amount = descriptor.amount, hits, hp_lost, "damage dealt");
        self.emit(Presentation::Damage {
            source,
            target,
            descriptor,
            hits,
            hp_lost,
        });
        self.flush();

        if was_up && self.is_down(target) {
            self.settle_defeat(target);
        }
        hp_lost
    }

    fn settle_defeat(&mut self, target: CombatantId) {
        match target {
            CombatantId::Player => {
                self.status = BattleStatus::Defeat;
                info!(turn = self.turn, "player defeated");
                self.emit(Presentation::PlayerDefeat);
                self.flush();
            }
            CombatantId::Enemy(id) => {
                debug!(enemy = %id, "enemy defeated");
                self.emit(Presentation::Defeat { enemy: id });
                self.flush();
                self.check_victory();
            }
        }
    }

    /// Win once no enemy is left fighting.
    pub(super) fn check_victory(&mut self) {
        if self.is_finished() || self.enemies.iter().any(|enemy| enemy.is_active()) {
            return;
        }
        self.status = BattleStatus::Victory;
        info!(turn = self.turn, "victory");
        self.emit(Presentation::Victory);
        self.flush();
    }

    /// Add modifier stacks, triggering a stun skip when the threshold is hit.
    pub(super) fn apply_modifier(&mut self, holder: CombatantId, kind: ModifierKind, magnitude: u32) {
        if self.is_down(holder) {
            return;
        }

        let change = match holder {
            CombatantId::Player => {
                self.player
                    .modifiers
                    .apply(kind, magnitude, &mut self.modifier_ids)
            }
            CombatantId::Enemy(id) => self.enemies[id.index()]
                .modifiers
                .apply(kind, magnitude, &mut self.modifier_ids),
        };
        if let Some(change) = change {
            self.emit(Presentation::Modifier { holder, change });
        }

        if let (ModifierKind::Stun, CombatantId::Enemy(id)) = (kind, holder) {
            if let Some(trigger) = self.enemies[id.index()].check_stun() {
                let turn = trigger.replaced.as_ref().map(|slot| slot.turn);
                debug!(enemy = %id, ?turn, "stun replaced planned action");
                self.emit(Presentation::Modifier {
                    holder,
                    change: trigger.consumed,
                });
                self.emit(Presentation::Stun { enemy: id, turn });
            }
        }
    }

    /// Create a card in hand. Over capacity, the card is placed anyway and a
    /// `hand-overflow` notice follows.
    pub(super) fn generate_card(
        &mut self,
        definition: DefinitionId,
        tags: &[CardTag],
        from_enemy: Option<EnemyId>,
    ) -> CardId {
        let capacity = self.config.hand_capacity;
        let full = self.zones.len(ZoneKind::Hand) >= capacity;

        let card = self.repository.create_tagged(definition, tags);
        self.zones.insert(card, ZoneKind::Hand, ZonePosition::Back);
        match from_enemy {
            Some(enemy) => self.emit(Presentation::MemoryCard { enemy, card }),
            None => self.emit(Presentation::CardMove {
                card,
                from: None,
                to: ZoneKind::Hand,
            }),
        }

        if full {
            let hand = self.zones.len(ZoneKind::Hand);
            warn!(%card, hand, capacity, "generated card placed over hand capacity");
            self.emit(Presentation::HandOverflow {
                card: Some(card),
                blocked: 0,
                hand,
                capacity,
            });
        }
        card
    }

    fn run_custom(&mut self, custom: &CustomIntent) -> Result<(), IntentError> {
        for effect in &custom.effects {
            match effect {
                CustomEffect::ApplyModifier {
                    target: CombatantId::Enemy(enemy),
                    ..
                }
                | CustomEffect::DamageEnemy { enemy, .. }
                | CustomEffect::ScheduleStun { enemy, .. } => {
                    if !self.is_active_enemy(*enemy) {
                        return Err(IntentError::IllegalTarget(*enemy));
                    }
                }
                CustomEffect::GenerateCard { definition, .. } => {
                    if !self.repository.library().contains(*definition) {
                        return Err(IntentError::UnknownDefinition(*definition));
                    }
                }
                CustomEffect::ApplyModifier { .. } => {}
            }
        }

        self.emit(Presentation::Custom {
            label: custom.label.clone(),
        });
        self.flush();

        for effect in &custom.effects {
            if self.is_finished() {
                break;
            }
            match effect {
                CustomEffect::ApplyModifier {
                    target,
                    kind,
                    magnitude,
                } => self.apply_modifier(*target, *kind, *magnitude),
                CustomEffect::GenerateCard { definition, count } => {
                    for _ in 0..*count {
                        self.generate_card(*definition, &[], None);
                    }
                }
                CustomEffect::DamageEnemy { enemy, amount } => {
                    let empty = ModifierSet::new();
                    let descriptor = resolve_damage(DamageBase::single(*amount), &empty, &empty);
                    self.land_hits(CombatantId::Player, CombatantId::Enemy(*enemy), descriptor);
                }
                CustomEffect::ScheduleStun {
                    enemy,
                    magnitude,
                    delay,
                } => {
                    let event = self.scheduled.schedule(
                        self.turn.saturating_add(*delay),
                        CardEffect::afflict(ModifierKind::Stun, *magnitude),
                        Some(*enemy),
                        None,
                        None,
                    );
                    self.emit(Presentation::Scheduled {
                        event,
                        outcome: ScheduleOutcome::Queued,
                    });
                }
            }
            self.flush();
        }
        Ok(())
    }
}
