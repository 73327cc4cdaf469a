//! Order-sensitive damage calculation.
//!
//! Modifiers are applied in four passes, always in this order:
//!
//! 1. attacker amount modifiers (insertion order), the running amount
//!    clamped at zero once the pass ends
//! 2. attacker count modifiers, multi-hit attacks only
//! 3. defender amount modifiers (insertion order), the running amount
//!    clamped at zero after each one
//! 4. defender count modifiers, multi-hit attacks only
//!
//! Amount and count are integers throughout and both end clamped at zero.
//! Reordering the passes changes results (a shell applied before strength
//! clamps differently), so the order is pinned by tests.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ModifierId;
use crate::modifiers::{Modifier, ModifierKind, ModifierSet, ModifierSide, ModifierTarget};

/// Single- or multi-hit attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackCategory {
    /// One hit; immune to count modifiers.
    Single,
    /// Several hits; count modifiers apply.
    Multi,
}

/// Unmodified attack numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageBase {
    /// Damage per hit.
    pub amount: u32,
    /// Number of hits (at least 1).
    pub count: u32,
    /// Category.
    pub category: AttackCategory,
}

impl DamageBase {
    /// A single-hit attack.
    #[must_use]
    pub const fn single(amount: u32) -> Self {
        Self {
            amount,
            count: 1,
            category: AttackCategory::Single,
        }
    }

    /// A multi-hit attack.
    #[must_use]
    pub fn multi(amount: u32, count: u32) -> Self {
        assert!(count >= 1, "Multi-hit attacks need at least one hit");
        Self {
            amount,
            count,
            category: AttackCategory::Multi,
        }
    }
}

/// Which side of the attack a contributing modifier was held by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageRole {
    /// Held by the attacker.
    Attacker,
    /// Held by the defender.
    Defender,
}

/// One modifier read during resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
    /// Modifier instance.
    pub modifier: ModifierId,
    /// Its kind.
    pub kind: ModifierKind,
    /// Who held it.
    pub role: DamageRole,
    /// Signed change it requested (before any clamping).
    pub delta: i64,
}

impl Contribution {
    fn read(modifier: &Modifier, role: DamageRole) -> Self {
        Self {
            modifier: modifier.id,
            kind: modifier.kind,
            role,
            delta: modifier.signed_magnitude(),
        }
    }
}

/// Final damage of one attack. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageDescriptor {
    /// Base numbers.
    pub base: DamageBase,
    /// Damage per hit after modifiers.
    pub amount: u32,
    /// Hits after modifiers.
    pub count: u32,
    /// Modifiers read, in the order they were applied.
    pub contributions: SmallVec<[Contribution; 4]>,
}

impl DamageDescriptor {
    /// Category of the attack.
    #[must_use]
    pub fn category(&self) -> AttackCategory {
        self.base.category
    }

    /// Damage if every hit lands.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.amount.saturating_mul(self.count)
    }

    /// Any modifier increased amount or count.
    #[must_use]
    pub fn boosted(&self) -> bool {
        self.contributions.iter().any(|c| c.delta > 0)
    }

    /// Any modifier decreased amount or count.
    #[must_use]
    pub fn reduced(&self) -> bool {
        self.contributions.iter().any(|c| c.delta < 0)
    }
}

/// Resolve an attack.
///
/// ```
/// use ccg_battle::damage::{resolve_damage, DamageBase};
/// use ccg_battle::modifiers::{ModifierIds, ModifierKind, ModifierSet};
///
/// let mut ids = ModifierIds::default();
/// let mut attacker = ModifierSet::new();
/// attacker.apply(ModifierKind::Strength, 10, &mut ids);
///
/// let damage = resolve_damage(DamageBase::multi(10, 3), &attacker, &ModifierSet::new());
/// assert_eq!((damage.amount, damage.count), (20, 3));
/// ```
#[must_use]
pub fn resolve_damage(
    base: DamageBase,
    attacker: &ModifierSet,
    defender: &ModifierSet,
) -> DamageDescriptor {
    let multi = base.category == AttackCategory::Multi;
    let mut contributions = SmallVec::new();
    let mut amount = i64::from(base.amount);
    let mut count = i64::from(base.count);

    for modifier in attacker.affecting(ModifierSide::Outgoing, ModifierTarget::Amount) {
        amount += modifier.signed_magnitude();
        contributions.push(Contribution::read(modifier, DamageRole::Attacker));
    }
    // Attacker debt never carries into the defender pass.
    amount = amount.max(0);

    if multi {
        for modifier in attacker.affecting(ModifierSide::Outgoing, ModifierTarget::Count) {
            count += modifier.signed_magnitude();
            contributions.push(Contribution::read(modifier, DamageRole::Attacker));
        }
    }

    for modifier in defender.affecting(ModifierSide::Incoming, ModifierTarget::Amount) {
        amount = (amount + modifier.signed_magnitude()).max(0);
        contributions.push(Contribution::read(modifier, DamageRole::Defender));
    }

    if multi {
        for modifier in defender.affecting(ModifierSide::Incoming, ModifierTarget::Count) {
            count += modifier.signed_magnitude();
            contributions.push(Contribution::read(modifier, DamageRole::Defender));
        }
    }

    DamageDescriptor {
        base,
        amount: clamp_u32(amount),
        count: clamp_u32(count),
        contributions,
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::ModifierIds;

    fn set(mods: &[(ModifierKind, u32)], ids: &mut ModifierIds) -> ModifierSet {
        let mut set = ModifierSet::new();
        for &(kind, magnitude) in mods {
            set.apply(kind, magnitude, ids);
        }
        set
    }

    #[test]
    fn test_no_modifiers() {
        let damage = resolve_damage(DamageBase::single(7), &ModifierSet::new(), &ModifierSet::new());

        assert_eq!(damage.amount, 7);
        assert_eq!(damage.count, 1);
        assert!(damage.contributions.is_empty());
        assert!(!damage.boosted());
    }

    #[test]
    fn test_weakness_clamps_at_zero() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Weakness, 10)], &mut ids);

        let damage = resolve_damage(DamageBase::single(4), &attacker, &ModifierSet::new());

        assert_eq!(damage.amount, 0);
        assert!(damage.reduced());
    }

    #[test]
    fn test_weakness_debt_does_not_cancel_corrosion() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Weakness, 5)], &mut ids);
        let defender = set(&[(ModifierKind::Corrosion, 4)], &mut ids);

        // 2 - 5 clamps to 0 before the defender pass, then + 4.
        let damage = resolve_damage(DamageBase::single(2), &attacker, &defender);

        assert_eq!(damage.amount, 4);
    }

    #[test]
    fn test_defender_clamp_is_per_step() {
        let mut ids = ModifierIds::default();
        // Shell first, corrosion second: 5 - 10 clamps to 0, then + 3.
        let defender = set(
            &[(ModifierKind::HardShell, 10), (ModifierKind::Corrosion, 3)],
            &mut ids,
        );

        let damage = resolve_damage(DamageBase::single(5), &ModifierSet::new(), &defender);

        assert_eq!(damage.amount, 3);
    }

    #[test]
    fn test_attacker_applies_before_defender() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Strength, 6)], &mut ids);
        let defender = set(&[(ModifierKind::HardShell, 8)], &mut ids);

        // (2 + 6) - 8 = 0, not max(2 - 8, 0) + 6 = 6.
        let damage = resolve_damage(DamageBase::single(2), &attacker, &defender);

        assert_eq!(damage.amount, 0);
        let roles: Vec<_> = damage.contributions.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![DamageRole::Attacker, DamageRole::Defender]);
    }

    #[test]
    fn test_single_ignores_count_modifiers() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Acceleration, 2)], &mut ids);
        let defender = set(&[(ModifierKind::Sticky, 3)], &mut ids);

        let damage = resolve_damage(DamageBase::single(5), &attacker, &defender);

        assert_eq!(damage.count, 1);
        assert!(damage.contributions.is_empty());
    }

    #[test]
    fn test_multi_reads_count_modifiers() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Acceleration, 2)], &mut ids);
        let defender = set(&[(ModifierKind::Sticky, 3)], &mut ids);

        let damage = resolve_damage(DamageBase::multi(5, 2), &attacker, &defender);

        assert_eq!(damage.count, 7);
        assert_eq!(damage.total(), 35);
    }

    #[test]
    fn test_behavior_modifiers_are_not_read() {
        let mut ids = ModifierIds::default();
        let attacker = set(&[(ModifierKind::Focus, 2)], &mut ids);
        let defender = set(&[(ModifierKind::Stun, 2)], &mut ids);

        let damage = resolve_damage(DamageBase::multi(3, 2), &attacker, &defender);

        assert_eq!((damage.amount, damage.count), (3, 2));
        assert!(damage.contributions.is_empty());
    }

    #[test]
    #[should_panic(expected = "at least one hit")]
    fn test_multi_needs_hits() {
        let _ = DamageBase::multi(3, 0);
    }
}
