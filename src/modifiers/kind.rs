//! Modifier kinds and their fixed rules.
//!
//! Each kind declares which side of a damage calculation it applies to,
//! what it changes, with which sign, whether applying it again stacks, and
//! how much it decays at the end of a round. Adding a kind forces every
//! `match` below to be extended.

use serde::{Deserialize, Serialize};

/// Which calculations a modifier takes part in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierSide {
    /// The holder's outgoing attacks.
    Outgoing,
    /// Attacks against the holder.
    Incoming,
    /// Not part of damage; read by battle rules.
    Behavior,
}

/// What a damage modifier changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierTarget {
    /// Per-hit amount.
    Amount,
    /// Hit count; multi-hit attacks only.
    Count,
    /// Behavior flag or counter.
    Behavior,
}

/// Kind of a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// +N damage per hit dealt.
    Strength,
    /// -N damage per hit dealt.
    Weakness,
    /// +N hits on multi-hit attacks dealt.
    Acceleration,
    /// +N damage per hit taken.
    Corrosion,
    /// -N damage per hit taken. Reapplying replaces the magnitude.
    HardShell,
    /// +N hits on multi-hit attacks taken.
    Sticky,
    /// Stun counter; at the holder's threshold its current action is skipped.
    Stun,
    /// Reduces the runtime cost of skill cards by N.
    Focus,
}

impl ModifierKind {
    /// Every kind, in declaration order.
    pub const ALL: [ModifierKind; 8] = [
        ModifierKind::Strength,
        ModifierKind::Weakness,
        ModifierKind::Acceleration,
        ModifierKind::Corrosion,
        ModifierKind::HardShell,
        ModifierKind::Sticky,
        ModifierKind::Stun,
        ModifierKind::Focus,
    ];

    /// Side of the calculation this kind applies to.
    #[must_use]
    pub const fn side(self) -> ModifierSide {
        match self {
            ModifierKind::Strength | ModifierKind::Weakness | ModifierKind::Acceleration => {
                ModifierSide::Outgoing
            }
            ModifierKind::Corrosion | ModifierKind::HardShell | ModifierKind::Sticky => {
                ModifierSide::Incoming
            }
            ModifierKind::Stun | ModifierKind::Focus => ModifierSide::Behavior,
        }
    }

    /// What this kind changes.
    #[must_use]
    pub const fn target(self) -> ModifierTarget {
        match self {
            ModifierKind::Strength
            | ModifierKind::Weakness
            | ModifierKind::Corrosion
            | ModifierKind::HardShell => ModifierTarget::Amount,
            ModifierKind::Acceleration | ModifierKind::Sticky => ModifierTarget::Count,
            ModifierKind::Stun | ModifierKind::Focus => ModifierTarget::Behavior,
        }
    }

    /// Sign of the contribution to amount or count.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            ModifierKind::Weakness | ModifierKind::HardShell => -1,
            _ => 1,
        }
    }

    /// Whether applying the kind again adds to the existing magnitude.
    ///
    /// Non-stackable kinds replace the magnitude instead.
    #[must_use]
    pub const fn stackable(self) -> bool {
        !matches!(self, ModifierKind::HardShell)
    }

    /// Magnitude lost at the end of each round.
    #[must_use]
    pub const fn decay_per_round(self) -> u32 {
        match self {
            ModifierKind::Weakness | ModifierKind::Corrosion | ModifierKind::Sticky => 1,
            _ => 0,
        }
    }

    /// Stable kebab-case name for presentation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ModifierKind::Strength => "strength",
            ModifierKind::Weakness => "weakness",
            ModifierKind::Acceleration => "acceleration",
            ModifierKind::Corrosion => "corrosion",
            ModifierKind::HardShell => "hard-shell",
            ModifierKind::Sticky => "sticky",
            ModifierKind::Stun => "stun",
            ModifierKind::Focus => "focus",
        }
    }
}

impl std::fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
