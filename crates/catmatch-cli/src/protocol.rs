//! JSON-lines protocol between the host and its client.

use catmatch_core::{CardType, CatVisuals, LogEntry, PowerSelection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Deal a new board
    NewGame,

    /// Click the card at a board index
    Click { index: usize },

    /// Laser selection: return a matched pair
    ReturnPair { pair: CardType },

    /// Gentle selection: re-arm a used power
    ReactivatePower { power: CardType },

    /// Dismiss the open selection
    ClosePowerSelection,

    /// Request a full state snapshot
    GetState,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from host to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Sent once per session, with the visual table for rendering
    Welcome { session_id: Uuid, visuals: CatVisuals },

    /// Full game state snapshot
    GameState { state: serde_json::Value },

    /// Log entries produced by the last command or resolution
    Logs { entries: Vec<LogEntry> },

    /// A two-card flip will resolve after this delay
    ResolutionScheduled { delay_ms: u64 },

    /// A secondary choice is open
    PowerSelection {
        kind: PowerSelection,
        options: Vec<CardType>,
    },

    /// Game finished
    GameOver { win: bool },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}
