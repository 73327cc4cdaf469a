//! Card instances - runtime card state.
//!
//! `Card` represents one specific card in a battle. Its identity is
//! assigned once by the `CardRepository` and never reused. Zones hold
//! `CardId`s only; the repository is the single owner of the instance.
//!
//! The runtime `cost`/`active` pair is derived data: the battle recomputes
//! it whenever cards are checked for playability or projected into a
//! snapshot.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardTag, DefinitionId};

/// Identity of a card instance within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Convert an opaque resolver value.
    ///
    /// Returns `None` when the value is outside the id space. Negative
    /// values are rejected by the caller before conversion.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A card instance in a battle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Stable identity.
    pub id: CardId,

    /// Definition this card was created from.
    pub definition: DefinitionId,

    /// Instance tags (definition tags plus any added at creation).
    pub tags: SmallVec<[CardTag; 4]>,

    /// Runtime cost, recomputed on every check.
    pub cost: u32,

    /// Whether the card can be played right now, recomputed on every check.
    pub active: bool,
}

impl Card {
    /// Create an instance from a definition.
    #[must_use]
    pub fn new(id: CardId, definition: &CardDefinition) -> Self {
        Self {
            id,
            definition: definition.id,
            tags: definition.tags.clone(),
            cost: definition.cost,
            active: false,
        }
    }

    /// Add a tag to this instance only.
    pub fn add_tag(&mut self, tag: CardTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: CardTag) -> bool {
        self.tags.contains(&tag)
    }
}
