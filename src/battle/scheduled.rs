//! Delayed player effects.
//!
//! A card's `Schedule` effect queues its inner effect, together with the
//! target and selection chosen when the card was played, to resolve at the
//! start of a later turn. Events fire in the order they were queued.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardEffect, CardId};
use crate::core::EnemyId;

/// An effect waiting for its turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Battle-unique id.
    pub id: u32,
    /// Turn whose start fires the event.
    pub due_turn: u32,
    /// Effect to resolve.
    pub effect: CardEffect,
    /// Enemy chosen when queued.
    pub target: Option<EnemyId>,
    /// Card selected when queued.
    pub selection: Option<CardId>,
    /// Card that queued the event, if any.
    pub source: Option<CardId>,
}

/// Pending scheduled events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduledQueue {
    events: Vector<ScheduledEvent>,
    next_id: u32,
}

impl ScheduledQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an effect.
    pub fn schedule(
        &mut self,
        due_turn: u32,
        effect: CardEffect,
        target: Option<EnemyId>,
        selection: Option<CardId>,
        source: Option<CardId>,
    ) -> ScheduledEvent {
        self.next_id += 1;
        let event = ScheduledEvent {
            id: self.next_id,
            due_turn,
            effect,
            target,
            selection,
            source,
        };
        self.events.push_back(event.clone());
        event
    }

    /// Remove and return every event due at or before `turn`, oldest first.
    pub fn take_due(&mut self, turn: u32) -> Vec<ScheduledEvent> {
        let (due, rest): (Vector<_>, Vector<_>) =
            self.events.iter().cloned().partition(|e| e.due_turn <= turn);
        self.events = rest;
        due.into_iter().collect()
    }

    /// Persistent copy for snapshots.
    #[must_use]
    pub fn view(&self) -> Vector<ScheduledEvent> {
        self.events.clone()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_in_order() {
        let mut queue = ScheduledQueue::new();
        queue.schedule(3, CardEffect::Draw(1), None, None, None);
        queue.schedule(2, CardEffect::Draw(2), None, None, None);
        queue.schedule(2, CardEffect::GainEnergy(1), None, None, None);

        let due = queue.take_due(2);

        assert_eq!(due.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(queue.len(), 1);
        assert!(queue.take_due(2).is_empty());
        assert_eq!(queue.take_due(3)[0].effect, CardEffect::Draw(1));
        assert!(queue.is_empty());
    }
}
