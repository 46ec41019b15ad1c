//! Per-card gates: sleeping lazy cards and baking oven cards.
//!
//! Both maps are keyed by card id and kept apart from the card records so the
//! flip controller can ask "is this card gated" without touching the board.

use crate::cards::CardId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of clicking a card tracked as sleeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepGate {
    /// Not tracked - no gate applies
    Untracked,
    /// Still asleep after this attempt
    Sleeping { attempt: u32 },
    /// Woke up and was removed from the map
    WokeUp,
}

/// Result of clicking a card tracked in the oven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvenGate {
    Untracked,
    StillBaking { turns_left: u32 },
    /// Finished baking and was removed from the map
    Ready,
}

/// Timer maps attached to individual cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTimers {
    /// Card id -> wake attempts so far
    pub lazy_cards: HashMap<CardId, u32>,
    /// Card id -> turns remaining
    pub oven_cards: HashMap<CardId, u32>,
}

impl CardTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sleeping(&self, id: &str) -> bool {
        self.lazy_cards.contains_key(id)
    }

    pub fn is_baking(&self, id: &str) -> bool {
        self.oven_cards.contains_key(id)
    }

    /// Start tracking a lazy card after its first failed click
    pub fn put_to_sleep(&mut self, id: &str) {
        self.lazy_cards.insert(id.to_string(), 1);
    }

    /// Register another click on a tracked lazy card
    pub fn wake_attempt(&mut self, id: &str, max_attempts: u32) -> SleepGate {
        let Some(attempts) = self.lazy_cards.get_mut(id) else {
            return SleepGate::Untracked;
        };

        if *attempts < max_attempts {
            *attempts += 1;
            SleepGate::Sleeping { attempt: *attempts }
        } else {
            self.lazy_cards.remove(id);
            SleepGate::WokeUp
        }
    }

    pub fn send_to_oven(&mut self, id: &str, turns: u32) {
        self.oven_cards.insert(id.to_string(), turns);
    }

    /// Check a click on a card that may be in the oven
    pub fn oven_check(&mut self, id: &str) -> OvenGate {
        match self.oven_cards.get(id) {
            None => OvenGate::Untracked,
            Some(&turns_left) if turns_left > 0 => OvenGate::StillBaking { turns_left },
            Some(_) => {
                self.oven_cards.remove(id);
                OvenGate::Ready
            }
        }
    }

    /// Count every baking card down by one turn, stopping at zero
    pub fn advance_turn(&mut self) {
        for turns in self.oven_cards.values_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    /// Drop every timer for a card that left the board
    pub fn forget(&mut self, id: &str) {
        self.lazy_cards.remove(id);
        self.oven_cards.remove(id);
    }
}
