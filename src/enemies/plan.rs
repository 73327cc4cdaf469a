//! Per-enemy action scheduler.
//!
//! An `ActionPlan` holds one slot per upcoming turn, in turn order, with no
//! gaps. The front slot is always the next action the enemy will execute:
//! slots are popped as they run and refilled at the back from the policy.
//! State effects can overwrite the front slot (a stun turns it into a skip)
//! without touching later slots.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{EnemyAction, PlannedAction};
use super::policy::EnemyPolicy;
use crate::core::BattleRng;

/// Planned actions, one per upcoming turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionPlan {
    slots: Vector<PlannedAction>,
}

impl ActionPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Planned slots, front first.
    pub fn iter(&self) -> impl Iterator<Item = &PlannedAction> {
        self.slots.iter()
    }

    /// Persistent copy of the slots for snapshotting.
    #[must_use]
    pub fn view(&self) -> Vector<PlannedAction> {
        self.slots.clone()
    }

    /// Number of planned turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Next action to execute.
    #[must_use]
    pub fn front(&self) -> Option<&PlannedAction> {
        self.slots.front()
    }

    /// Action planned for a specific turn.
    #[must_use]
    pub fn get(&self, turn: u32) -> Option<&PlannedAction> {
        self.slots.iter().find(|slot| slot.turn == turn)
    }

    /// Last turn with a slot, or `None` if empty.
    #[must_use]
    pub fn last_turn(&self) -> Option<u32> {
        self.slots.back().map(|slot| slot.turn)
    }

    /// Plan every turn after the last planned one up to `through_turn`.
    ///
    /// An empty plan starts at `first_turn`. Returns the newly planned slots.
    pub fn fill(
        &mut self,
        first_turn: u32,
        through_turn: u32,
        policy: &EnemyPolicy,
        rng: &mut BattleRng,
    ) -> Vec<PlannedAction> {
        let start = self.last_turn().map_or(first_turn, |last| last + 1);
        let mut added = Vec::new();

        for turn in start..=through_turn {
            let slot = PlannedAction {
                turn,
                action: policy.plan(turn, rng),
            };
            self.slots.push_back(slot.clone());
            added.push(slot);
        }

        added
    }

    /// Pop the slot for `turn`.
    ///
    /// Panics if the front slot is for a different turn: the battle executes
    /// every enemy exactly once per turn, so the plan can never fall behind.
    pub fn take(&mut self, turn: u32) -> EnemyAction {
        match self.slots.pop_front() {
            Some(slot) if slot.turn == turn => slot.action,
            Some(slot) => panic!("plan front is turn {} but turn {turn} is executing", slot.turn),
            None => panic!("no action planned for turn {turn}"),
        }
    }

    /// Overwrite the front slot, returning what it held.
    pub fn replace_front(&mut self, action: EnemyAction) -> Option<PlannedAction> {
        let front = self.slots.front()?.clone();
        self.slots.set(
            0,
            PlannedAction {
                turn: front.turn,
                action,
            },
        );
        Some(front)
    }

    /// Drop every slot (defeated or escaped enemies plan nothing).
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
