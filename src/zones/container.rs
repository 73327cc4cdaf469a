//! Deck, hand, discard and exile containers.
//!
//! Every zone is an ordered `im::Vector`, so projecting zones into a
//! snapshot is an O(1) clone that later mutation cannot reach.
//!
//! All operations are total: asking to remove a card that is not in the
//! named zone is a programming error and panics. Legality checks (is the
//! card in hand, is there room) belong to the battle, before mutation.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::BattleRng;

/// One of the player's zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Draw pile; the front is drawn first.
    Deck,
    /// Cards available to play.
    Hand,
    /// Played and discarded cards; reshuffled into the deck when it runs out.
    Discard,
    /// Removed from the battle.
    Exile,
}

impl ZoneKind {
    /// All zones, in snapshot order.
    pub const ALL: [ZoneKind; 4] = [ZoneKind::Deck, ZoneKind::Hand, ZoneKind::Discard, ZoneKind::Exile];
}

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Insert at the front (next to be drawn, for the deck).
    Front,
    /// Append at the back.
    Back,
    /// Insert at a specific index, clamped to the zone length.
    Index(usize),
}

/// Result of a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Cards moved to the hand, in draw order.
    pub drawn: Vec<CardId>,

    /// Number of cards drawn before the discard was reshuffled into the
    /// deck, if a reshuffle happened.
    pub reshuffled_after: Option<usize>,

    /// Draws not performed because the hand was full.
    pub blocked_by_capacity: u32,
}

/// The player's four zones.
///
/// ```
/// use ccg_battle::cards::CardId;
/// use ccg_battle::core::BattleRng;
/// use ccg_battle::zones::{ZoneKind, Zones};
///
/// let mut zones = Zones::with_deck([CardId::new(1), CardId::new(2), CardId::new(3)]);
/// let mut rng = BattleRng::new(1);
///
/// let outcome = zones.draw(2, 10, &mut rng);
/// assert_eq!(outcome.drawn, vec![CardId::new(1), CardId::new(2)]);
///
/// zones.discard(CardId::new(1));
/// assert_eq!(zones.locate(CardId::new(1)), Some(ZoneKind::Discard));
/// assert_eq!(zones.total(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Zones {
    deck: Vector<CardId>,
    hand: Vector<CardId>,
    discard: Vector<CardId>,
    exile: Vector<CardId>,
}

impl Zones {
    /// Create empty zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create zones with the given deck order (front first).
    #[must_use]
    pub fn with_deck(deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            ..Self::default()
        }
    }

    fn zone(&self, kind: ZoneKind) -> &Vector<CardId> {
        match kind {
            ZoneKind::Deck => &self.deck,
            ZoneKind::Hand => &self.hand,
            ZoneKind::Discard => &self.discard,
            ZoneKind::Exile => &self.exile,
        }
    }

    fn zone_mut(&mut self, kind: ZoneKind) -> &mut Vector<CardId> {
        match kind {
            ZoneKind::Deck => &mut self.deck,
            ZoneKind::Hand => &mut self.hand,
            ZoneKind::Discard => &mut self.discard,
            ZoneKind::Exile => &mut self.exile,
        }
    }

    /// Cards in a zone, front first.
    pub fn iter(&self, kind: ZoneKind) -> impl Iterator<Item = CardId> + '_ {
        self.zone(kind).iter().copied()
    }

    /// Persistent copy of a zone for snapshotting.
    #[must_use]
    pub fn view(&self, kind: ZoneKind) -> Vector<CardId> {
        self.zone(kind).clone()
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn len(&self, kind: ZoneKind) -> usize {
        self.zone(kind).len()
    }

    /// Check if a zone is empty.
    #[must_use]
    pub fn is_empty(&self, kind: ZoneKind) -> bool {
        self.zone(kind).is_empty()
    }

    /// Total cards across all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        ZoneKind::ALL.iter().map(|&kind| self.len(kind)).sum()
    }

    /// Check if a card is in a specific zone.
    #[must_use]
    pub fn contains(&self, kind: ZoneKind, card: CardId) -> bool {
        self.zone(kind).iter().any(|&c| c == card)
    }

    /// Find the zone holding a card.
    #[must_use]
    pub fn locate(&self, card: CardId) -> Option<ZoneKind> {
        ZoneKind::ALL.into_iter().find(|&kind| self.contains(kind, card))
    }

    /// Add a card that is not yet in any zone.
    ///
    /// Panics if the card is already held somewhere.
    pub fn insert(&mut self, card: CardId, kind: ZoneKind, position: ZonePosition) {
        if let Some(existing) = self.locate(card) {
            panic!("{card} is already in {existing:?}");
        }

        let zone = self.zone_mut(kind);
        match position {
            ZonePosition::Front => zone.push_front(card),
            ZonePosition::Back => zone.push_back(card),
            ZonePosition::Index(i) => {
                let idx = i.min(zone.len());
                zone.insert(idx, card);
            }
        }
    }

    /// Remove a card from a zone.
    ///
    /// Panics if the card is not in that zone.
    pub fn take(&mut self, card: CardId, kind: ZoneKind) -> CardId {
        let zone = self.zone_mut(kind);
        match zone.index_of(&card) {
            Some(idx) => zone.remove(idx),
            None => panic!("{card} is not in {kind:?}"),
        }
    }

    /// Move a card between zones, appending it at the back of `to`.
    ///
    /// Panics if the card is not in `from`.
    pub fn move_card(&mut self, card: CardId, from: ZoneKind, to: ZoneKind) {
        let card = self.take(card, from);
        self.zone_mut(to).push_back(card);
    }

    /// Move a card from the hand to the discard pile.
    pub fn discard(&mut self, card: CardId) {
        self.move_card(card, ZoneKind::Hand, ZoneKind::Discard);
    }

    /// Move a card from wherever it is to the exile.
    ///
    /// Panics if the card is not in any zone.
    pub fn exile(&mut self, card: CardId) {
        match self.locate(card) {
            Some(ZoneKind::Exile) => {}
            Some(from) => self.move_card(card, from, ZoneKind::Exile),
            None => panic!("{card} is not in any zone"),
        }
    }

    /// Shuffle the discard pile into the deck.
    ///
    /// The reshuffled cards go behind anything still in the deck.
    pub fn reshuffle_discard(&mut self, rng: &mut BattleRng) {
        let mut cards: Vec<CardId> = self.discard.iter().copied().collect();
        self.discard.clear();
        rng.shuffle(&mut cards);
        self.deck.extend(cards);
    }

    /// Shuffle the deck in place.
    pub fn shuffle_deck(&mut self, rng: &mut BattleRng) {
        let mut cards: Vec<CardId> = self.deck.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();
    }

    /// Draw up to `count` cards from the deck front to the hand back.
    ///
    /// When the deck runs out mid-draw the discard is reshuffled into it
    /// (at most once per draw). Draws stop at `capacity` cards in hand; the
    /// remainder is reported in `blocked_by_capacity`.
    pub fn draw(&mut self, count: u32, capacity: usize, rng: &mut BattleRng) -> DrawOutcome {
        let mut outcome = DrawOutcome::default();

        for remaining in (1..=count).rev() {
            if self.hand.len() >= capacity {
                outcome.blocked_by_capacity = remaining;
                break;
            }

            if self.deck.is_empty() {
                if self.discard.is_empty() || outcome.reshuffled_after.is_some() {
                    break;
                }
                self.reshuffle_discard(rng);
                outcome.reshuffled_after = Some(outcome.drawn.len());
            }

            let Some(card) = self.deck.pop_front() else {
                break;
            };
            self.hand.push_back(card);
            outcome.drawn.push(card);
        }

        outcome
    }
}
