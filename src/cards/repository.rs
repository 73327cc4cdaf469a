//! Card repository: the single owner of card identity.
//!
//! The repository is an arena mapping `CardId -> Card`. Ids are allocated
//! monotonically and never reused within one battle, so an opaque numeric id
//! produced by a resolver during replay always names the same card it named
//! in the original run.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardTag, DefinitionId};
use super::instance::{Card, CardId};
use super::library::CardLibrary;

/// Arena of card instances plus the shared definition library.
#[derive(Clone, Debug)]
pub struct CardRepository {
    library: Arc<CardLibrary>,
    cards: FxHashMap<CardId, Card>,
    next_id: u32,
}

impl CardRepository {
    /// Create an empty repository over a library.
    #[must_use]
    pub fn new(library: Arc<CardLibrary>) -> Self {
        Self {
            library,
            cards: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// The definition library.
    #[must_use]
    pub fn library(&self) -> &CardLibrary {
        &self.library
    }

    /// Create a new instance of a definition.
    ///
    /// Panics if the definition is not registered; callers validate
    /// user-supplied definitions first.
    pub fn create(&mut self, definition: DefinitionId) -> CardId {
        self.create_tagged(definition, &[])
    }

    /// Create a new instance with extra instance tags.
    pub fn create_tagged(&mut self, definition: DefinitionId, extra: &[CardTag]) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;

        let mut card = Card::new(id, self.library.get_unchecked(definition));
        for &tag in extra {
            card.add_tag(tag);
        }
        self.cards.insert(id, card);
        id
    }

    /// Get a card instance.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a card instance, panicking if it was never created.
    #[must_use]
    pub fn get_unchecked(&self, id: CardId) -> &Card {
        match self.cards.get(&id) {
            Some(card) => card,
            None => panic!("{id} not found in repository"),
        }
    }

    /// Get a mutable card instance.
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Definition of a card instance.
    #[must_use]
    pub fn definition_of(&self, id: CardId) -> &CardDefinition {
        self.library.get_unchecked(self.get_unchecked(id).definition)
    }

    /// Check if an id was allocated.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Number of instances created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if no instance was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Id the next created card will receive.
    #[must_use]
    pub fn next_id(&self) -> CardId {
        CardId::new(self.next_id)
    }
}
