//! Card library for definition lookup.
//!
//! The `CardLibrary` stores every card definition a battle can reference,
//! including definitions that only appear through generation (memory cards).
//! It is built once by the battle factory and shared between battles.

use rustc_hash::FxHashMap;

use super::definition::{CardCategory, CardDefinition, DefinitionId};

/// Library of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_battle::cards::{CardCategory, CardDefinition, CardEffect, CardLibrary, DefinitionId};
///
/// let mut library = CardLibrary::new();
/// library.register(
///     CardDefinition::new(DefinitionId::new(1), "Strike", CardCategory::Attack, 1)
///         .with_effect(CardEffect::strike(6)),
/// );
///
/// let found = library.get(DefinitionId::new(1)).unwrap();
/// assert_eq!(found.name, "Strike");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardLibrary {
    definitions: FxHashMap<DefinitionId, CardDefinition>,
}

impl CardLibrary {
    /// Create a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a definition with the same ID already exists.
    pub fn register(&mut self, definition: CardDefinition) {
        if self.definitions.contains_key(&definition.id) {
            panic!("Definition {:?} already registered", definition.id);
        }
        self.definitions.insert(definition.id, definition);
    }

    /// Get a definition by ID.
    #[must_use]
    pub fn get(&self, id: DefinitionId) -> Option<&CardDefinition> {
        self.definitions.get(&id)
    }

    /// Get a definition by ID, panicking if not found.
    ///
    /// Every card instance is created from a registered definition, so a miss
    /// here means the library and repository were built inconsistently.
    #[must_use]
    pub fn get_unchecked(&self, id: DefinitionId) -> &CardDefinition {
        match self.definitions.get(&id) {
            Some(definition) => definition,
            None => panic!("Definition {id} not found in library"),
        }
    }

    /// Check if a definition is registered.
    #[must_use]
    pub fn contains(&self, id: DefinitionId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Find definitions by category.
    pub fn find_by_category(
        &self,
        category: CardCategory,
    ) -> impl Iterator<Item = &CardDefinition> {
        self.definitions.values().filter(move |d| d.category == category)
    }
}
