//! A combatant's modifiers.
//!
//! Modifiers are kept in insertion order because damage resolution reads
//! them in that order. At most one modifier of each kind is held: applying a
//! kind that is already present stacks onto it (or replaces its magnitude,
//! for non-stackable kinds) and keeps its original position and id.
//!
//! Invariant: every held modifier has a magnitude above zero. Anything that
//! would leave a zero magnitude removes the modifier instead.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::kind::{ModifierKind, ModifierSide, ModifierTarget};
use crate::core::ModifierId;

/// One modifier instance held by a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    /// Battle-unique identity.
    pub id: ModifierId,
    /// Kind.
    pub kind: ModifierKind,
    /// Stacks; always above zero while held.
    pub magnitude: u32,
}

impl Modifier {
    /// Side of the calculation this modifier applies to.
    #[must_use]
    pub fn side(&self) -> ModifierSide {
        self.kind.side()
    }

    /// Whether reapplying stacks.
    #[must_use]
    pub fn stackable(&self) -> bool {
        self.kind.stackable()
    }

    /// Signed contribution to the damage quantity this modifier targets.
    #[must_use]
    pub fn signed_magnitude(&self) -> i64 {
        self.kind.sign() * i64::from(self.magnitude)
    }
}

/// Record of a magnitude change, for presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierChange {
    /// Instance affected.
    pub id: ModifierId,
    /// Kind affected.
    pub kind: ModifierKind,
    /// Magnitude before (0 if newly added).
    pub before: u32,
    /// Magnitude after (0 if removed).
    pub after: u32,
}

impl ModifierChange {
    /// Whether the modifier was removed by this change.
    #[must_use]
    pub fn removed(&self) -> bool {
        self.after == 0
    }
}

/// Allocator for battle-unique modifier ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModifierIds(u32);

impl ModifierIds {
    /// Allocate the next id.
    pub fn allocate(&mut self) -> ModifierId {
        self.0 += 1;
        ModifierId::new(self.0)
    }
}

/// Ordered collection of modifiers.
///
/// ```
/// use ccg_battle::modifiers::{ModifierIds, ModifierKind, ModifierSet};
///
/// let mut ids = ModifierIds::default();
/// let mut set = ModifierSet::new();
///
/// set.apply(ModifierKind::Strength, 2, &mut ids);
/// set.apply(ModifierKind::Strength, 3, &mut ids);
/// assert_eq!(set.magnitude(ModifierKind::Strength), 5);
///
/// set.reduce(ModifierKind::Strength, 9);
/// assert!(set.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSet {
    modifiers: Vector<Modifier>,
}

impl ModifierSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of held modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Check if no modifier is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter()
    }

    /// Modifiers on one side that change one damage quantity, in insertion
    /// order.
    pub fn affecting(
        &self,
        side: ModifierSide,
        target: ModifierTarget,
    ) -> impl Iterator<Item = &Modifier> {
        self.modifiers
            .iter()
            .filter(move |m| m.kind.side() == side && m.kind.target() == target)
    }

    /// Get the modifier of a kind.
    #[must_use]
    pub fn get(&self, kind: ModifierKind) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.kind == kind)
    }

    /// Magnitude of a kind, 0 if absent.
    #[must_use]
    pub fn magnitude(&self, kind: ModifierKind) -> u32 {
        self.get(kind).map_or(0, |m| m.magnitude)
    }

    fn position(&self, kind: ModifierKind) -> Option<usize> {
        self.modifiers.iter().position(|m| m.kind == kind)
    }

    /// Apply stacks of a kind.
    ///
    /// Stackable kinds add to the held magnitude; non-stackable kinds
    /// replace it. Applying zero stacks of an absent kind changes nothing
    /// and returns `None`.
    pub fn apply(
        &mut self,
        kind: ModifierKind,
        magnitude: u32,
        ids: &mut ModifierIds,
    ) -> Option<ModifierChange> {
        match self.position(kind) {
            Some(idx) => {
                let held = &self.modifiers[idx];
                let before = held.magnitude;
                let after = if kind.stackable() {
                    before.saturating_add(magnitude)
                } else {
                    magnitude
                };
                Some(self.set_at(idx, after))
                    .filter(|change| change.before != change.after)
            }
            None if magnitude == 0 => None,
            None => {
                let id = ids.allocate();
                self.modifiers.push_back(Modifier {
                    id,
                    kind,
                    magnitude,
                });
                Some(ModifierChange {
                    id,
                    kind,
                    before: 0,
                    after: magnitude,
                })
            }
        }
    }

    /// Remove up to `amount` stacks of a kind, clamping at zero.
    pub fn reduce(&mut self, kind: ModifierKind, amount: u32) -> Option<ModifierChange> {
        let idx = self.position(kind)?;
        if amount == 0 {
            return None;
        }
        let after = self.modifiers[idx].magnitude.saturating_sub(amount);
        Some(self.set_at(idx, after))
    }

    /// Remove a kind entirely.
    pub fn remove(&mut self, kind: ModifierKind) -> Option<ModifierChange> {
        let idx = self.position(kind)?;
        Some(self.set_at(idx, 0))
    }

    /// Apply end-of-round decay to every decaying modifier.
    pub fn decay(&mut self) -> Vec<ModifierChange> {
        let kinds: Vec<ModifierKind> = self
            .modifiers
            .iter()
            .map(|m| m.kind)
            .filter(|kind| kind.decay_per_round() > 0)
            .collect();

        kinds
            .into_iter()
            .filter_map(|kind| self.reduce(kind, kind.decay_per_round()))
            .collect()
    }

    fn set_at(&mut self, idx: usize, after: u32) -> ModifierChange {
        let held = self.modifiers[idx].clone();
        if after == 0 {
            self.modifiers.remove(idx);
        } else {
            self.modifiers.set(
                idx,
                Modifier {
                    magnitude: after,
                    ..held.clone()
                },
            );
        }
        ModifierChange {
            id: held.id,
            kind: held.kind,
            before: held.magnitude,
            after,
        }
    }
}
