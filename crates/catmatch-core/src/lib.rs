//! Catmatch - a memory-matching card game engine with cat powers
//!
//! This crate provides the rules engine for Catmatch, including:
//! - The 20-card board and its shuffling / pair-return algorithms
//! - The flip controller with its sleep and oven gates
//! - Delayed two-card resolution with stale-ticket protection
//! - The power engine, including the laser and gentle selections
//! - An append-only game log of message keys for the presentation layer
//!
//! # Architecture
//!
//! The engine is platform-agnostic and performs no I/O. It can be compiled to:
//! - Native Rust, driven by the `catmatch` command-line host
//! - WebAssembly for a browser client (`wasm` feature)
//!
//! # Modules
//!
//! - [`cards`]: Card types, card records and visual metadata
//! - [`board`]: Board slots and repacking
//! - [`timers`]: Sleep and oven gates
//! - [`log`]: Game log and message keys
//! - [`game`]: Game state machine
//! - [`powers`]: Power effects

pub mod actions;
pub mod board;
pub mod cards;
pub mod config;
pub mod game;
pub mod log;
pub mod powers;
pub mod timers;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameCommand, PendingResolution, PowerSelection, ResolutionTicket};
pub use board::{Board, BOARD_SLOTS};
pub use cards::{Card, CardId, CardType, CatVisual, CatVisuals, ParseCardTypeError};
pub use config::{ConfigError, RulesConfig};
pub use game::{GameState, TOTAL_PAIRS};
pub use log::{keys, GameLog, LogEntry, Message, MessageValue};
pub use timers::{CardTimers, OvenGate, SleepGate};
