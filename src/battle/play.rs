//! Card play and card effects.

use tracing::debug;

use super::state::Battle;
use crate::cards::{CardDefinition, CardEffect, CardId, CardTag, EffectTarget, SelectionZone, TargetShape};
use crate::core::{CombatantId, EnemyId, IntentError};
use crate::history::{
    Deferred, Presentation, ResolvedIntent, ResolvedOperation, ResolverScope, ScheduleOutcome,
    SubOperation,
};
use crate::zones::ZoneKind;

/// Choices a card's effects read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct Choices {
    /// Card being played (or that queued a scheduled event).
    pub source: Option<CardId>,
    /// Chosen enemy.
    pub target: Option<EnemyId>,
    /// Chosen card.
    pub selection: Option<CardId>,
}

impl Battle {
    pub(super) fn play_card(
        &mut self,
        card: &Deferred<CardId>,
        operations: &[SubOperation],
        resolvers: &ResolverScope<'_>,
    ) -> Result<ResolvedIntent, IntentError> {
        let card = resolvers.evaluate(card, self)?;
        if !self.repository.contains(card) {
            return Err(IntentError::UnknownCard(card));
        }
        if !self.zones.contains(ZoneKind::Hand, card) {
            return Err(IntentError::CardNotInHand(card));
        }

        let definition = self.repository.definition_of(card).clone();
        let cost = self.runtime_cost(card);
        let available = self.player.energy;
        if cost > available {
            return Err(IntentError::NotAffordable {
                card,
                cost,
                available,
            });
        }

        self.player.set_energy(available - cost);
        let destination = if self.repository.get_unchecked(card).has_tag(CardTag::Fleeting) {
            ZoneKind::Exile
        } else {
            ZoneKind::Discard
        };
        self.zones.move_card(card, ZoneKind::Hand, destination);
        self.emit(Presentation::CardMove {
            card,
            from: Some(ZoneKind::Hand),
            to: destination,
        });
        if cost > 0 {
            self.emit(Presentation::Energy {
                before: available,
                after: available - cost,
            });
        }
        self.flush();

        // Resolvers for sub-operations see the card already out of the hand.
        let (choices, resolved) = self.resolve_operations(card, &definition, operations, resolvers)?;

        self.wait_override = definition.wait_ms;
        for effect in &definition.effects {
            if self.is_finished() {
                break;
            }
            self.check_effect(effect, &choices)?;
            self.apply_effect(effect, &choices);
        }
        self.wait_override = None;

        debug!(%card, name = %definition.name, cost, "card played");
        Ok(ResolvedIntent::PlayCard {
            card,
            operations: resolved,
        })
    }

    fn resolve_operations(
        &self,
        card: CardId,
        definition: &CardDefinition,
        operations: &[SubOperation],
        resolvers: &ResolverScope<'_>,
    ) -> Result<(Choices, Vec<ResolvedOperation>), IntentError> {
        let shape = definition.target_shape();
        let selects = definition.selection();
        let mut choices = Choices {
            source: Some(card),
            ..Choices::default()
        };
        let mut resolved = Vec::with_capacity(operations.len());

        for operation in operations {
            let unexpected = IntentError::UnexpectedOperation {
                card,
                operation: operation.name(),
            };
            match operation {
                SubOperation::TargetEnemy(value) => {
                    if shape != TargetShape::SingleEnemy || choices.target.is_some() {
                        return Err(unexpected);
                    }
                    let enemy = resolvers.evaluate(value, self)?;
                    if !self.is_active_enemy(enemy) {
                        return Err(IntentError::IllegalTarget(enemy));
                    }
                    choices.target = Some(enemy);
                    resolved.push(ResolvedOperation::TargetEnemy(enemy));
                }
                SubOperation::SelectHandCard(value) => {
                    if selects != Some(SelectionZone::Hand) || choices.selection.is_some() {
                        return Err(unexpected);
                    }
                    let selected = resolvers.evaluate(value, self)?;
                    if !self.zones.contains(ZoneKind::Hand, selected) {
                        return Err(IntentError::IllegalSelection(selected));
                    }
                    choices.selection = Some(selected);
                    resolved.push(ResolvedOperation::SelectHandCard(selected));
                }
                SubOperation::SelectDiscardCard(value) => {
                    if selects != Some(SelectionZone::Discard) || choices.selection.is_some() {
                        return Err(unexpected);
                    }
                    let selected = resolvers.evaluate(value, self)?;
                    if selected == card || !self.zones.contains(ZoneKind::Discard, selected) {
                        return Err(IntentError::IllegalSelection(selected));
                    }
                    choices.selection = Some(selected);
                    resolved.push(ResolvedOperation::SelectDiscardCard(selected));
                }
            }
        }

        if shape == TargetShape::SingleEnemy && choices.target.is_none() {
            return Err(IntentError::MissingTarget(card));
        }
        if selects.is_some() && choices.selection.is_none() {
            return Err(IntentError::MissingSelection(card));
        }
        Ok((choices, resolved))
    }

    /// Check that an effect can resolve against the current state.
    pub(super) fn check_effect(&self, effect: &CardEffect, choices: &Choices) -> Result<(), IntentError> {
        match effect {
            CardEffect::ExileSelected | CardEffect::DiscardSelected => {
                let selected = selected(choices);
                if !self.zones.contains(ZoneKind::Hand, selected) {
                    return Err(IntentError::IllegalSelection(selected));
                }
            }
            CardEffect::RecallSelected => {
                let selected = selected(choices);
                if !self.zones.contains(ZoneKind::Discard, selected) {
                    return Err(IntentError::IllegalSelection(selected));
                }
                if self.zones.len(ZoneKind::Hand) >= self.config.hand_capacity {
                    return Err(IntentError::hand_full(&self.config));
                }
            }
            CardEffect::Generate { definition, .. } => {
                if !self.repository.library().contains(*definition) {
                    return Err(IntentError::UnknownDefinition(*definition));
                }
            }
            CardEffect::Damage { .. }
            | CardEffect::ApplyModifier { .. }
            | CardEffect::Draw(_)
            | CardEffect::GainEnergy(_)
            | CardEffect::Schedule { .. } => {}
        }
        Ok(())
    }

    /// Resolve one checked effect.
    pub(super) fn apply_effect(&mut self, effect: &CardEffect, choices: &Choices) {
        match effect {
            CardEffect::Damage { target, base } => {
                for defender in self.effect_targets(*target, choices.target) {
                    if self.is_finished() {
                        break;
                    }
                    self.attack(CombatantId::Player, defender, *base);
                }
            }
            CardEffect::ApplyModifier {
                target,
                kind,
                magnitude,
            } => {
                for holder in self.effect_targets(*target, choices.target) {
                    self.apply_modifier(holder, *kind, *magnitude);
                }
            }
            CardEffect::Draw(count) => self.draw_cards(*count),
            CardEffect::GainEnergy(amount) => {
                let before = self.player.energy;
                let after = before.saturating_add(*amount);
                self.player.set_energy(after);
                self.emit(Presentation::Energy { before, after });
            }
            CardEffect::ExileSelected => self.move_selected(choices, ZoneKind::Hand, ZoneKind::Exile),
            CardEffect::DiscardSelected => {
                self.move_selected(choices, ZoneKind::Hand, ZoneKind::Discard)
            }
            CardEffect::RecallSelected => {
                self.move_selected(choices, ZoneKind::Discard, ZoneKind::Hand)
            }
            CardEffect::Generate { definition, count } => {
                for _ in 0..*count {
                    self.generate_card(*definition, &[], None);
                }
            }
            CardEffect::Schedule { delay, effect } => {
                let event = self.scheduled.schedule(
                    self.turn.saturating_add(*delay),
                    (**effect).clone(),
                    choices.target,
                    choices.selection,
                    choices.source,
                );
                self.emit(Presentation::Scheduled {
                    event,
                    outcome: ScheduleOutcome::Queued,
                });
            }
        }
        self.flush();
    }

    fn effect_targets(&self, target: EffectTarget, chosen: Option<EnemyId>) -> Vec<CombatantId> {
        match target {
            EffectTarget::Player => vec![CombatantId::Player],
            EffectTarget::Target => chosen
                .filter(|&id| self.is_active_enemy(id))
                .map(CombatantId::Enemy)
                .into_iter()
                .collect(),
            EffectTarget::AllEnemies => self
                .legal_targets()
                .into_iter()
                .map(CombatantId::Enemy)
                .collect(),
        }
    }

    fn move_selected(&mut self, choices: &Choices, from: ZoneKind, to: ZoneKind) {
        let card = selected(choices);
        self.zones.move_card(card, from, to);
        self.emit(Presentation::CardMove {
            card,
            from: Some(from),
            to,
        });
    }
}

/// Selection of an effect that needs one; checked before effects run.
fn selected(choices: &Choices) -> CardId {
    match choices.selection {
        Some(card) => card,
        None => panic!("selection effect resolved without a selection"),
    }
}
