//! Enemy behavior policies.
//!
//! A policy picks the action for one upcoming turn. Randomized policies draw
//! from the enemy's own RNG stream (derived from the battle seed and the
//! enemy id), so planning is reproducible and independent of other enemies.

use serde::{Deserialize, Serialize};

use super::action::EnemyAction;
use crate::core::BattleRng;

/// How an enemy picks its actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPolicy {
    /// Repeat a fixed sequence; turn `t` uses entry `(t - 1) % len`.
    Cycle(Vec<EnemyAction>),

    /// Pick by weight each turn.
    Weighted(Vec<(EnemyAction, u32)>),

    /// Play a fixed opening, then defer to another policy.
    Opening {
        /// Actions for turns 1..=len.
        opening: Vec<EnemyAction>,
        /// Policy for every later turn.
        then: Box<EnemyPolicy>,
    },
}

impl EnemyPolicy {
    /// Pick the action for `turn` (1-based).
    ///
    /// Empty policies and all-zero weights rest.
    pub fn plan(&self, turn: u32, rng: &mut BattleRng) -> EnemyAction {
        match self {
            EnemyPolicy::Cycle(actions) => {
                if actions.is_empty() {
                    return EnemyAction::idle();
                }
                let idx = (turn.saturating_sub(1) as usize) % actions.len();
                actions[idx].clone()
            }
            EnemyPolicy::Weighted(entries) => {
                let weights: Vec<u32> = entries.iter().map(|(_, w)| *w).collect();
                match rng.choose_weighted(&weights) {
                    Some(idx) => entries[idx].0.clone(),
                    None => EnemyAction::idle(),
                }
            }
            EnemyPolicy::Opening { opening, then } => {
                let idx = turn.saturating_sub(1) as usize;
                match opening.get(idx) {
                    Some(action) => action.clone(),
                    None => then.plan(turn, rng),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamageBase;
    use crate::modifiers::ModifierKind;

    fn buff() -> EnemyAction {
        EnemyAction::Buff {
            kind: ModifierKind::Strength,
            magnitude: 2,
        }
    }

    #[test]
    fn test_cycle_by_turn() {
        let policy = EnemyPolicy::Cycle(vec![EnemyAction::attack(DamageBase::single(5)), buff()]);
        let mut rng = BattleRng::new(1);

        assert_eq!(policy.plan(1, &mut rng), EnemyAction::attack(DamageBase::single(5)));
        assert_eq!(policy.plan(2, &mut rng), buff());
        assert_eq!(policy.plan(3, &mut rng), EnemyAction::attack(DamageBase::single(5)));
    }

    #[test]
    fn test_empty_policies_rest() {
        let mut rng = BattleRng::new(1);

        assert_eq!(EnemyPolicy::Cycle(vec![]).plan(1, &mut rng), EnemyAction::idle());
        assert_eq!(
            EnemyPolicy::Weighted(vec![(buff(), 0)]).plan(1, &mut rng),
            EnemyAction::idle()
        );
    }

    #[test]
    fn test_weighted_is_seeded() {
        let policy = EnemyPolicy::Weighted(vec![
            (EnemyAction::attack(DamageBase::single(5)), 1),
            (buff(), 1),
            (EnemyAction::Escape, 1),
        ]);

        let run = |seed| {
            let mut rng = BattleRng::new(seed);
            (1..=10).map(|t| policy.plan(t, &mut rng)).collect::<Vec<_>>()
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_opening_then_fallback() {
        let policy = EnemyPolicy::Opening {
            opening: vec![EnemyAction::idle()],
            then: Box::new(EnemyPolicy::Cycle(vec![buff()])),
        };
        let mut rng = BattleRng::new(1);

        assert_eq!(policy.plan(1, &mut rng), EnemyAction::idle());
        assert_eq!(policy.plan(2, &mut rng), buff());
    }
}
