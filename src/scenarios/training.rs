//! Training battle: a small card pool against three scripted enemies.
//!
//! Used by tests, benches and documentation. The deck holds twelve cards;
//! the team is a Slime that alternates attacks and buffs, a Wraith whose
//! attacks leave Echo memory cards behind, and a Thief that escapes on its
//! third turn.

use std::sync::Arc;

use crate::battle::{Battle, BattleBuilder};
use crate::cards::{CardCategory, CardDefinition, CardEffect, CardLibrary, CardTag, DefinitionId};
use crate::core::{BattleConfig, EnemyId, Pacing};
use crate::damage::DamageBase;
use crate::enemies::{EnemyAction, EnemyPolicy, EnemyTemplate};
use crate::modifiers::ModifierKind;

/// Builder for the training battle.
///
/// ```
/// use ccg_battle::scenarios::TrainingScenario;
///
/// let battle = TrainingScenario::new(42).build();
/// assert_eq!(battle.enemies().len(), 3);
/// assert_eq!(battle.zones().total(), TrainingScenario::DECK_SIZE);
/// ```
#[derive(Clone, Debug)]
pub struct TrainingScenario {
    builder: BattleBuilder,
}

impl TrainingScenario {
    /// 6 damage, cost 1.
    pub const STRIKE: DefinitionId = DefinitionId::new(1);
    /// 20 damage, cost 2.
    pub const HEAVY_STRIKE: DefinitionId = DefinitionId::new(2);
    /// 3 × 3 damage, cost 1.
    pub const FLURRY: DefinitionId = DefinitionId::new(3);
    /// +2 Strength, cost 1.
    pub const FLEX: DefinitionId = DefinitionId::new(4);
    /// 4 damage and 3 Stun, cost 2.
    pub const BASH: DefinitionId = DefinitionId::new(5);
    /// Exile a hand card, cost 0, fleeting.
    pub const PURGE: DefinitionId = DefinitionId::new(6);
    /// Return a discard card to hand, cost 1.
    pub const RECALL: DefinitionId = DefinitionId::new(7);
    /// 12 damage at the start of next turn, cost 1.
    pub const FUSE: DefinitionId = DefinitionId::new(8);
    /// +1 Focus and draw 1, cost 1, retained.
    pub const MEDITATE: DefinitionId = DefinitionId::new(9);
    /// Memory card left by the Wraith: 3 damage, cost 0, fleeting.
    pub const ECHO: DefinitionId = DefinitionId::new(10);

    /// Cards in the starting deck.
    pub const DECK_SIZE: usize = 12;

    /// The Slime (10 HP).
    pub const SLIME: EnemyId = EnemyId::new(0);
    /// The Wraith (24 HP).
    pub const WRAITH: EnemyId = EnemyId::new(1);
    /// The Thief (16 HP).
    pub const THIEF: EnemyId = EnemyId::new(2);

    /// Training battle with default rules and no waits.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(BattleConfig::new(seed).with_pacing(Pacing::instant()))
    }

    /// Training battle with a custom configuration.
    #[must_use]
    pub fn with_config(config: BattleConfig) -> Self {
        let builder = BattleBuilder::new(config, Arc::new(Self::library()))
            .player_hp(40)
            .card(Self::STRIKE, 4)
            .card(Self::HEAVY_STRIKE, 1)
            .card(Self::FLURRY, 1)
            .card(Self::FLEX, 1)
            .card(Self::BASH, 1)
            .card(Self::PURGE, 1)
            .card(Self::RECALL, 1)
            .card(Self::FUSE, 1)
            .card(Self::MEDITATE, 1)
            .enemy(Self::slime())
            .enemy(Self::wraith())
            .enemy(Self::thief());
        Self { builder }
    }

    /// Build a fresh battle.
    #[must_use]
    pub fn build(&self) -> Battle {
        self.builder.build()
    }

    /// A battle factory for replay.
    #[must_use]
    pub fn factory(seed: u64) -> impl Fn() -> Battle + Clone {
        let scenario = Self::new(seed);
        move || scenario.build()
    }

    /// The training card pool.
    #[must_use]
    pub fn library() -> CardLibrary {
        let mut library = CardLibrary::new();
        library.register(
            CardDefinition::new(Self::STRIKE, "Strike", CardCategory::Attack, 1)
                .with_effect(CardEffect::strike(6)),
        );
        library.register(
            CardDefinition::new(Self::HEAVY_STRIKE, "Heavy Strike", CardCategory::Attack, 2)
                .with_effect(CardEffect::strike(20))
                .with_wait(650),
        );
        library.register(
            CardDefinition::new(Self::FLURRY, "Flurry", CardCategory::Attack, 1)
                .with_effect(CardEffect::flurry(3, 3)),
        );
        library.register(
            CardDefinition::new(Self::FLEX, "Flex", CardCategory::Skill, 1)
                .with_effect(CardEffect::empower(ModifierKind::Strength, 2)),
        );
        library.register(
            CardDefinition::new(Self::BASH, "Bash", CardCategory::Attack, 2)
                .with_effect(CardEffect::strike(4))
                .with_effect(CardEffect::afflict(ModifierKind::Stun, 3)),
        );
        library.register(
            CardDefinition::new(Self::PURGE, "Purge", CardCategory::Skill, 0)
                .with_effect(CardEffect::ExileSelected)
                .with_tag(CardTag::Fleeting),
        );
        library.register(
            CardDefinition::new(Self::RECALL, "Recall", CardCategory::Skill, 1)
                .with_effect(CardEffect::RecallSelected),
        );
        library.register(
            CardDefinition::new(Self::FUSE, "Fuse", CardCategory::Skill, 1)
                .with_effect(CardEffect::scheduled(1, CardEffect::strike(12))),
        );
        library.register(
            CardDefinition::new(Self::MEDITATE, "Meditate", CardCategory::Skill, 1)
                .with_effect(CardEffect::empower(ModifierKind::Focus, 1))
                .with_effect(CardEffect::Draw(1))
                .with_tag(CardTag::Retain),
        );
        library.register(
            CardDefinition::new(Self::ECHO, "Echo", CardCategory::Memory, 0)
                .with_effect(CardEffect::strike(3))
                .with_tag(CardTag::Fleeting),
        );
        library
    }

    fn slime() -> EnemyTemplate {
        EnemyTemplate::new(
            "Slime",
            10,
            EnemyPolicy::Cycle(vec![
                EnemyAction::attack(DamageBase::single(5)),
                EnemyAction::Buff {
                    kind: ModifierKind::Strength,
                    magnitude: 1,
                },
            ]),
        )
    }

    fn wraith() -> EnemyTemplate {
        EnemyTemplate::new(
            "Wraith",
            24,
            EnemyPolicy::Cycle(vec![
                EnemyAction::memory_attack(DamageBase::single(4), Self::ECHO),
                EnemyAction::Debuff {
                    kind: ModifierKind::Weakness,
                    magnitude: 1,
                },
            ]),
        )
        .with_modifier(ModifierKind::HardShell, 1)
    }

    fn thief() -> EnemyTemplate {
        EnemyTemplate::new(
            "Thief",
            16,
            EnemyPolicy::Opening {
                opening: vec![
                    EnemyAction::attack(DamageBase::multi(2, 2)),
                    EnemyAction::idle(),
                    EnemyAction::Escape,
                ],
                then: Box::new(EnemyPolicy::Cycle(vec![EnemyAction::idle()])),
            },
        )
        .with_stun_threshold(2)
    }
}
