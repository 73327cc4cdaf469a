//! Combatant and modifier identification.
//!
//! Every combatant in a battle is addressed by a `CombatantId`: the single
//! player, or one enemy by its `EnemyId`. Enemy ids are assigned in team
//! order when the battle is built and double as the enemy's index.
//!
//! Resolvers in the intent log return opaque `i64` values; `EnemyId` and
//! `ModifierId` convert from those raw values the same way `CardId` does.
//!
//! ```
//! use ccg_battle::core::{CombatantId, EnemyId};
//!
//! let target = CombatantId::Enemy(EnemyId::new(1));
//! assert!(target.is_enemy());
//! assert_eq!(target.as_enemy(), Some(EnemyId::new(1)));
//! assert_eq!(CombatantId::Player.as_enemy(), None);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of an enemy within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl EnemyId {
    /// Create an enemy ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the battle's enemy team.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert an opaque resolver value.
    ///
    /// Returns `None` for values that cannot name an enemy at all
    /// (too large for the id space). Negative values are rejected by the
    /// caller before conversion.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy({})", self.0)
    }
}

/// Identifier of a modifier instance.
///
/// Allocated monotonically by the battle; never reused, so a damage
/// descriptor can name the exact instances it read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifierId(pub u32);

impl ModifierId {
    /// Create a modifier ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ModifierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Modifier({})", self.0)
    }
}

/// Any participant that can hold modifiers and take damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantId {
    /// The player.
    Player,
    /// One enemy of the team.
    Enemy(EnemyId),
}

impl CombatantId {
    /// Check if this is the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, CombatantId::Player)
    }

    /// Check if this is an enemy.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, CombatantId::Enemy(_))
    }

    /// Get the enemy id, if this is an enemy.
    #[must_use]
    pub const fn as_enemy(self) -> Option<EnemyId> {
        match self {
            CombatantId::Enemy(id) => Some(id),
            CombatantId::Player => None,
        }
    }
}

impl From<EnemyId> for CombatantId {
    fn from(id: EnemyId) -> Self {
        CombatantId::Enemy(id)
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatantId::Player => write!(f, "Player"),
            CombatantId::Enemy(id) => write!(f, "{id}"),
        }
    }
}
