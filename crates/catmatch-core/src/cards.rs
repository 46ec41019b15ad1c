//! Card types, card instances and the visual lookup table.
//!
//! This module contains:
//! - The ten cat types and which of them carry a power
//! - The `Card` record that lives on the board
//! - Construction of the standard 20-card deck
//! - `CatVisuals`, the presentation lookup keyed by card type

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable card identifier (`"<type>_<n>"`)
pub type CardId = String;

/// Number of cards dealt for each type
pub const CARDS_PER_TYPE: u8 = 2;

/// Cat types - every type appears exactly twice in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Purr-plexer: reshuffles the unmatched cards
    Cucumber,
    /// Cat-atonic: needs repeated clicks before it reveals
    Lazy,
    /// Whisk-ers: sends the next clicked card to the oven
    Baker,
    /// Paws-sible: returns a matched pair to the board
    Laser,
    /// Mew-two: copies the other card of a failed flip
    Copy,
    /// Cat-astrophe: +7 extra moves
    Death,
    /// Purr-omeo: leaves the board if not matched in time
    Romeo,
    /// Lucky-paws: +1 extra move
    Maneki,
    /// Paw-some: no power
    Normal,
    /// Re-paws: re-arms a power that already fired
    Gentle,
}

impl CardType {
    /// All card types in deck order
    pub const ALL: [CardType; 10] = [
        CardType::Cucumber,
        CardType::Lazy,
        CardType::Baker,
        CardType::Laser,
        CardType::Copy,
        CardType::Death,
        CardType::Romeo,
        CardType::Maneki,
        CardType::Normal,
        CardType::Gentle,
    ];

    /// Identifier used in card ids and log values
    pub fn key(&self) -> &'static str {
        match self {
            CardType::Cucumber => "cucumber",
            CardType::Lazy => "lazy",
            CardType::Baker => "baker",
            CardType::Laser => "laser",
            CardType::Copy => "copy",
            CardType::Death => "death",
            CardType::Romeo => "romeo",
            CardType::Maneki => "maneki",
            CardType::Normal => "normal",
            CardType::Gentle => "gentle",
        }
    }

    /// Whether matching this type dispatches an effect through the power engine
    pub fn has_triggered_power(&self) -> bool {
        !matches!(self, CardType::Lazy | CardType::Romeo | CardType::Normal)
    }

    /// Whether a `copy` card may mirror this type
    pub fn is_copyable(&self) -> bool {
        !matches!(self, CardType::Copy | CardType::Normal)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string does not name a card type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card type: {0}")]
pub struct ParseCardTypeError(pub String);

impl FromStr for CardType {
    type Err = ParseCardTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| ParseCardTypeError(s.to_string()))
    }
}

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique for the lifetime of a game
    pub id: CardId,
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Face up
    pub flipped: bool,
    /// Part of a found pair
    pub matched: bool,
    /// Board slot in `[0, 20)`
    pub position: usize,
}

impl Card {
    /// Create the `copy`-th card (1-based) of a type, face down at `position`
    pub fn new(card_type: CardType, copy: u8, position: usize) -> Self {
        Self {
            id: format!("{}_{}", card_type.key(), copy),
            card_type,
            flipped: false,
            matched: false,
            position,
        }
    }

    /// Check if the card can still be clicked at all
    pub fn is_face_down(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Build the unshuffled deck: two cards of every type, positions in deck order
pub fn standard_deck() -> Vec<Card> {
    CardType::ALL
        .iter()
        .flat_map(|&t| (1..=CARDS_PER_TYPE).map(move |n| (t, n)))
        .enumerate()
        .map(|(position, (t, n))| Card::new(t, n, position))
        .collect()
}

/// Presentation metadata for one card type.
///
/// The engine only ever emits `CardType` identifiers; this table is carried so
/// that hosts can resolve them without a second source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatVisual {
    /// Translation key of the display name
    pub name_key: String,
    pub icon: String,
    /// Opaque style token (CSS classes for the web client)
    pub style: String,
}

impl CatVisual {
    fn new(name_key: &str, icon: &str, style: &str) -> Self {
        Self {
            name_key: name_key.to_string(),
            icon: icon.to_string(),
            style: style.to_string(),
        }
    }
}

/// Lookup table from card type to visual metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatVisuals(HashMap<CardType, CatVisual>);

impl CatVisuals {
    /// The built-in table used by the reference clients
    pub fn standard() -> Self {
        let entries = [
            (
                CardType::Cucumber,
                CatVisual::new(
                    "purr-plexer",
                    "🥒",
                    "border-green-200 bg-green-50 hover:border-green-400",
                ),
            ),
            (
                CardType::Lazy,
                CatVisual::new(
                    "cat-atonic",
                    "😴",
                    "border-blue-200 bg-blue-50 hover:border-blue-400",
                ),
            ),
            (
                CardType::Baker,
                CatVisual::new(
                    "whisk-ers",
                    "👨‍🍳",
                    "border-orange-200 bg-orange-50 hover:border-orange-400",
                ),
            ),
            (
                CardType::Laser,
                CatVisual::new(
                    "paws-sible",
                    "🔴",
                    "border-red-200 bg-red-50 hover:border-red-400",
                ),
            ),
            (
                CardType::Copy,
                CatVisual::new(
                    "mew-two",
                    "📋",
                    "border-purple-200 bg-purple-50 hover:border-purple-400",
                ),
            ),
            (
                CardType::Death,
                CatVisual::new(
                    "cat-astrophe",
                    "💀",
                    "border-slate-200 bg-slate-50 hover:border-slate-400",
                ),
            ),
            (
                CardType::Romeo,
                CatVisual::new(
                    "purr-omeo",
                    "💕",
                    "border-pink-200 bg-pink-100 hover:border-pink-400",
                ),
            ),
            (
                CardType::Maneki,
                CatVisual::new(
                    "lucky-paws",
                    "🐱",
                    "border-yellow-200 bg-yellow-100 hover:border-yellow-400",
                ),
            ),
            (
                CardType::Normal,
                CatVisual::new(
                    "paw-some",
                    "😸",
                    "border-indigo-200 bg-indigo-100 hover:border-indigo-400",
                ),
            ),
            (
                CardType::Gentle,
                CatVisual::new(
                    "re-paws",
                    "🐾",
                    "border-teal-200 bg-teal-100 hover:border-teal-400",
                ),
            ),
        ];
        Self(entries.into_iter().collect())
    }

    pub fn get(&self, card_type: CardType) -> Option<&CatVisual> {
        self.0.get(&card_type)
    }

    /// Icon for a type, or `?` when the table has no entry
    pub fn icon(&self, card_type: CardType) -> &str {
        self.get(card_type).map(|v| v.icon.as_str()).unwrap_or("?")
    }
}
