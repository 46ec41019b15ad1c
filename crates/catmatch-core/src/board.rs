//! The 20-slot board and its repacking algorithms.
//!
//! Cards are stored ordered by `position`, so the index a client clicks is
//! the index in [`Board::cards`]. Every operation that moves cards re-sorts.

use crate::cards::{standard_deck, Card, CardType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Total number of board slots
pub const BOARD_SLOTS: usize = 20;

/// The cards currently in play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deal the standard deck in a uniformly random order
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut cards = standard_deck();
        cards.shuffle(rng);
        for (position, card) in cards.iter_mut().enumerate() {
            card.position = position;
        }
        Self { cards }
    }

    /// Build a board from explicit cards (sorted by position on the way in)
    pub fn from_cards(mut cards: Vec<Card>) -> Self {
        cards.sort_by_key(|c| c.position);
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at a click index
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Click index of the card with this id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Cards of a type, in board order
    pub fn cards_of(&self, card_type: CardType) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.card_type == card_type)
    }

    pub fn set_flipped(&mut self, id: &str, flipped: bool) {
        if let Some(card) = self.card_mut(id) {
            card.flipped = flipped;
        }
    }

    /// Mark every card of a type as matched
    pub fn mark_matched(&mut self, card_type: CardType) {
        for card in self.cards.iter_mut().filter(|c| c.card_type == card_type) {
            card.matched = true;
        }
    }

    /// Check that every remaining card of a type is matched
    pub fn is_type_matched(&self, card_type: CardType) -> bool {
        let mut cards = self.cards_of(card_type).peekable();
        cards.peek().is_some() && cards.all(|c| c.matched)
    }

    /// Permute the slots held by unmatched cards among those cards.
    ///
    /// Matched cards keep their slots.
    pub fn shuffle_unmatched<R: Rng>(&mut self, rng: &mut R) {
        let mut slots: Vec<usize> = self
            .cards
            .iter()
            .filter(|c| !c.matched)
            .map(|c| c.position)
            .collect();
        slots.shuffle(rng);

        for (card, slot) in self.cards.iter_mut().filter(|c| !c.matched).zip(slots) {
            card.position = slot;
        }
        self.sort();
    }

    /// Put a matched pair back into play face down, at random free slots.
    ///
    /// Free slots are the slots of `[0, BOARD_SLOTS)` not held by any card of
    /// another type. Returns how many cards were returned.
    pub fn return_pair<R: Rng>(&mut self, card_type: CardType, rng: &mut R) -> usize {
        let occupied: HashSet<usize> = self
            .cards
            .iter()
            .filter(|c| c.card_type != card_type)
            .map(|c| c.position)
            .collect();
        let mut free: Vec<usize> = (0..BOARD_SLOTS).filter(|p| !occupied.contains(p)).collect();
        free.shuffle(rng);

        let mut returned = 0;
        for (card, slot) in self
            .cards
            .iter_mut()
            .filter(|c| c.card_type == card_type)
            .zip(free)
        {
            card.matched = false;
            card.flipped = false;
            card.position = slot;
            returned += 1;
        }
        self.sort();
        returned
    }

    /// Remove every card of a type from the board. Returns the removed cards.
    pub fn remove_type(&mut self, card_type: CardType) -> Vec<Card> {
        let (removed, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.cards)
            .into_iter()
            .partition(|c| c.card_type == card_type);
        self.cards = kept;
        removed
    }

    /// Check that no two cards share a slot and all slots are in range
    pub fn positions_are_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.cards
            .iter()
            .all(|c| c.position < BOARD_SLOTS && seen.insert(c.position))
    }

    fn sort(&mut self) {
        self.cards.sort_by_key(|c| c.position);
    }
}
