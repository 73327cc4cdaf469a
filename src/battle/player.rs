//! The player combatant.

use serde::{Deserialize, Serialize};

use crate::modifiers::ModifierSet;

/// Player HP, energy and modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Energy left this turn.
    pub energy: u32,
    /// Energy restored each turn.
    pub max_energy: u32,
    /// Held modifiers.
    pub modifiers: ModifierSet,
}

impl Player {
    /// Create a player at full HP with no energy until the first turn.
    #[must_use]
    pub fn new(max_hp: u32, max_energy: u32) -> Self {
        assert!(max_hp > 0, "Player needs at least 1 HP");
        Self {
            hp: max_hp,
            max_hp,
            energy: 0,
            max_energy,
            modifiers: ModifierSet::new(),
        }
    }

    /// Check if the player is at 0 HP.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Lose HP, returning how much was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Set energy, returning the previous value.
    pub fn set_energy(&mut self, energy: u32) -> u32 {
        std::mem::replace(&mut self.energy, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps() {
        let mut player = Player::new(10, 3);

        assert_eq!(player.take_damage(4), 4);
        assert_eq!(player.take_damage(40), 6);
        assert!(player.is_defeated());
    }

    #[test]
    fn test_set_energy() {
        let mut player = Player::new(10, 3);

        assert_eq!(player.set_energy(3), 0);
        assert_eq!(player.energy, 3);
    }
}
