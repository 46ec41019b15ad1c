//! Commands the presentation layer can issue, and the pending-resolution
//! handle it receives back.

use crate::cards::CardType;
use serde::{Deserialize, Serialize};

/// All commands a player (or host) can issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCommand {
    /// Throw away the current board and deal a new one
    NewGame,
    /// Click the card at this index (cards ordered by board position)
    ClickCard(usize),
    /// Resolve the pending two-card flip now
    ResolvePendingFlip,

    // ==================== Power Selection ====================
    /// Laser selection: return this matched pair to the board
    ReturnPair(CardType),
    /// Gentle selection: fire this already-used power again
    ReactivatePower(CardType),
    /// Dismiss whichever selection is open
    ClosePowerSelection,
}

/// Which secondary choice is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSelection {
    /// Pick a matched pair to return
    Laser,
    /// Pick a used power to re-arm
    Gentle,
}

/// Identifies one scheduled resolution.
///
/// A ticket from an earlier game (or an already-resolved flip) never matches
/// the pending one, so resolving it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionTicket {
    /// Game generation the flip belongs to
    pub game: u64,
    /// Sequence number within that game
    pub seq: u64,
}

/// A two-card flip waiting for its delayed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub ticket: ResolutionTicket,
    pub delay_ms: u64,
}
