//! Runtime enemy state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::{EnemyAction, PlannedAction};
use super::plan::ActionPlan;
use super::policy::EnemyPolicy;
use crate::core::{BattleConfig, BattleRng, EnemyId};
use crate::modifiers::{ModifierChange, ModifierIds, ModifierKind, ModifierSet};

/// Whether an enemy is still in the fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyStatus {
    /// Acts and can be targeted.
    Active,
    /// Reduced to 0 HP.
    Defeated,
    /// Left the battle.
    Escaped,
}

/// Blueprint an enemy is built from.
///
/// ```
/// use ccg_battle::damage::DamageBase;
/// use ccg_battle::enemies::{EnemyAction, EnemyPolicy, EnemyTemplate};
///
/// let slime = EnemyTemplate::new("Slime", 12, EnemyPolicy::Cycle(vec![
///     EnemyAction::attack(DamageBase::single(4)),
/// ]))
/// .with_stun_threshold(2);
///
/// assert_eq!(slime.stun_threshold, Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Display name.
    pub name: String,
    /// Starting and maximum HP.
    pub max_hp: u32,
    /// Action policy.
    pub policy: EnemyPolicy,
    /// Stun stacks needed to skip an action; `None` uses the battle default.
    pub stun_threshold: Option<u32>,
    /// Modifiers held from the start, in application order.
    pub modifiers: Vec<(ModifierKind, u32)>,
}

impl EnemyTemplate {
    /// Create a template.
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: u32, policy: EnemyPolicy) -> Self {
        assert!(max_hp > 0, "Enemies need at least 1 HP");
        Self {
            name: name.into(),
            max_hp,
            policy,
            stun_threshold: None,
            modifiers: Vec::new(),
        }
    }

    /// Override the stun threshold.
    #[must_use]
    pub fn with_stun_threshold(mut self, stacks: u32) -> Self {
        assert!(stacks > 0, "Stun threshold must be at least 1");
        self.stun_threshold = Some(stacks);
        self
    }

    /// Start with a modifier.
    #[must_use]
    pub fn with_modifier(mut self, kind: ModifierKind, magnitude: u32) -> Self {
        self.modifiers.push((kind, magnitude));
        self
    }
}

/// Result of a stun reaching its threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StunTrigger {
    /// The consumed stun modifier.
    pub consumed: ModifierChange,
    /// The slot that was overwritten with a skip.
    pub replaced: Option<PlannedAction>,
}

/// An enemy in a battle.
#[derive(Clone, Debug)]
pub struct Enemy {
    /// Position in the team.
    pub id: EnemyId,
    /// Display name.
    pub name: String,
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Held modifiers.
    pub modifiers: ModifierSet,
    /// Upcoming actions.
    pub plan: ActionPlan,
    /// Whether the enemy has acted this turn.
    pub acted: bool,
    /// Stun stacks needed to skip an action.
    pub stun_threshold: u32,
    /// Whether the enemy is still fighting.
    pub status: EnemyStatus,
    policy: Arc<EnemyPolicy>,
    rng: BattleRng,
}

impl Enemy {
    /// Build an enemy from its template.
    ///
    /// Each enemy plans from its own RNG stream so adding or removing
    /// another enemy never changes its choices.
    #[must_use]
    pub fn from_template(
        id: EnemyId,
        template: &EnemyTemplate,
        config: &BattleConfig,
        ids: &mut ModifierIds,
    ) -> Self {
        let mut modifiers = ModifierSet::new();
        for &(kind, magnitude) in &template.modifiers {
            modifiers.apply(kind, magnitude, ids);
        }

        Self {
            id,
            name: template.name.clone(),
            hp: template.max_hp,
            max_hp: template.max_hp,
            modifiers,
            plan: ActionPlan::new(),
            acted: false,
            stun_threshold: template.stun_threshold.unwrap_or(config.stun_threshold),
            status: EnemyStatus::Active,
            policy: Arc::new(template.policy.clone()),
            rng: BattleRng::new(config.seed).for_context(&format!("enemy:{}", id.raw())),
        }
    }

    /// Check if the enemy is still fighting.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EnemyStatus::Active
    }

    /// Plan every missing turn from `next_turn` through `next_turn + horizon - 1`.
    pub fn plan_ahead(&mut self, next_turn: u32, horizon: u32) -> Vec<PlannedAction> {
        if !self.is_active() {
            return Vec::new();
        }
        let through = next_turn.saturating_add(horizon.saturating_sub(1));
        self.plan.fill(next_turn, through, &self.policy, &mut self.rng)
    }

    /// Pop this turn's action and mark the enemy as having acted.
    pub fn take_action(&mut self, turn: u32) -> EnemyAction {
        self.acted = true;
        self.plan.take(turn)
    }

    /// Lose HP, returning how much was actually lost.
    ///
    /// Reaching 0 marks the enemy defeated and clears its plan.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 && self.is_active() {
            self.status = EnemyStatus::Defeated;
            self.plan.clear();
        }
        lost
    }

    /// Leave the battle.
    pub fn escape(&mut self) {
        self.status = EnemyStatus::Escaped;
        self.plan.clear();
    }

    /// Consume a stun that has reached the threshold.
    ///
    /// The front slot of the plan is the next action the enemy would take,
    /// which is the current turn's action during the player's turn. Only that
    /// slot becomes a skip.
    pub fn check_stun(&mut self) -> Option<StunTrigger> {
        if !self.is_active() || self.modifiers.magnitude(ModifierKind::Stun) < self.stun_threshold {
            return None;
        }

        let consumed = self.modifiers.remove(ModifierKind::Stun)?;
        let replaced = self.plan.replace_front(EnemyAction::stunned());
        Some(StunTrigger { consumed, replaced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamageBase;

    fn template() -> EnemyTemplate {
        EnemyTemplate::new(
            "Slime",
            10,
            EnemyPolicy::Cycle(vec![
                EnemyAction::attack(DamageBase::single(4)),
                EnemyAction::idle(),
            ]),
        )
    }

    fn enemy(id: u32) -> Enemy {
        let config = BattleConfig::new(7);
        let mut ids = ModifierIds::default();
        Enemy::from_template(EnemyId::new(id), &template(), &config, &mut ids)
    }

    #[test]
    fn test_from_template() {
        let config = BattleConfig::new(7).with_stun_threshold(4);
        let mut ids = ModifierIds::default();
        let tmpl = template().with_modifier(ModifierKind::HardShell, 3);

        let enemy = Enemy::from_template(EnemyId::new(0), &tmpl, &config, &mut ids);

        assert_eq!(enemy.hp, 10);
        assert_eq!(enemy.stun_threshold, 4);
        assert_eq!(enemy.modifiers.magnitude(ModifierKind::HardShell), 3);
        assert!(enemy.is_active());
        assert!(enemy.plan.is_empty());
    }

    #[test]
    fn test_plan_ahead_and_take() {
        let mut enemy = enemy(0);

        assert_eq!(enemy.plan_ahead(1, 2).len(), 2);
        let action = enemy.take_action(1);
        enemy.plan_ahead(2, 2);

        assert!(enemy.acted);
        assert_eq!(action, EnemyAction::attack(DamageBase::single(4)));
        assert_eq!(enemy.plan.front().unwrap().turn, 2);
        assert_eq!(enemy.plan.last_turn(), Some(3));
    }

    #[test]
    fn test_damage_defeats() {
        let mut enemy = enemy(0);
        enemy.plan_ahead(1, 2);

        assert_eq!(enemy.take_damage(4), 4);
        assert!(enemy.is_active());
        assert_eq!(enemy.take_damage(30), 6);
        assert_eq!(enemy.hp, 0);
        assert_eq!(enemy.status, EnemyStatus::Defeated);
        assert!(enemy.plan.is_empty());
        assert!(enemy.plan_ahead(2, 2).is_empty());
    }

    #[test]
    fn test_stun_replaces_front_only() {
        let mut enemy = enemy(0);
        let mut ids = ModifierIds::default();
        enemy.plan_ahead(1, 2);
        let future = enemy.plan.get(2).cloned();

        enemy.modifiers.apply(ModifierKind::Stun, 2, &mut ids);
        assert!(enemy.check_stun().is_none());

        enemy.modifiers.apply(ModifierKind::Stun, 1, &mut ids);
        let trigger = enemy.check_stun().unwrap();

        assert_eq!(trigger.consumed.after, 0);
        assert_eq!(trigger.replaced.unwrap().turn, 1);
        assert_eq!(enemy.plan.get(1).unwrap().action, EnemyAction::stunned());
        assert_eq!(enemy.plan.get(2).cloned(), future);
        assert_eq!(enemy.modifiers.magnitude(ModifierKind::Stun), 0);
    }

    #[test]
    fn test_escape_clears_plan() {
        let mut enemy = enemy(1);
        enemy.plan_ahead(1, 2);

        enemy.escape();

        assert_eq!(enemy.status, EnemyStatus::Escaped);
        assert!(enemy.plan.is_empty());
    }
}
