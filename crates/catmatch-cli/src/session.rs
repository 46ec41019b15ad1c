//! Single-player game session.
//!
//! The session owns the engine and turns client messages into the server
//! messages a client needs to redraw. It performs no I/O; the runner owns
//! stdin, stdout and the resolution timer.

use catmatch_core::{
    GameCommand, GameState, LogEntry, PendingResolution, PowerSelection, ResolutionTicket,
};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error("No card at index {0}")]
    NoSuchCard(usize),
}

/// One player's game
pub struct Session {
    pub id: Uuid,
    game: GameState,
}

impl Session {
    pub fn new(game: GameState) -> Self {
        Self {
            id: Uuid::new_v4(),
            game,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Flip waiting on the timer, if any
    pub fn pending(&self) -> Option<PendingResolution> {
        self.game.pending_resolution()
    }

    pub fn parse(line: &str) -> Result<ClientMessage, SessionError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Apply a client message
    pub fn handle(&mut self, msg: ClientMessage) -> Result<Vec<ServerMessage>, SessionError> {
        let command = match msg {
            ClientMessage::NewGame => {
                info!(session = %self.id, "new game");
                GameCommand::NewGame
            }
            ClientMessage::Click { index } => {
                if index >= self.game.board.len() {
                    return Err(SessionError::NoSuchCard(index));
                }
                GameCommand::ClickCard(index)
            }
            ClientMessage::ReturnPair { pair } => GameCommand::ReturnPair(pair),
            ClientMessage::ReactivatePower { power } => GameCommand::ReactivatePower(power),
            ClientMessage::ClosePowerSelection => GameCommand::ClosePowerSelection,
            ClientMessage::GetState => return Ok(vec![self.snapshot()]),
            ClientMessage::Ping => return Ok(vec![ServerMessage::Pong]),
        };

        Ok(self.run(command))
    }

    /// Resolve a flip whose timer fired
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> Vec<ServerMessage> {
        let before = self.snapshot_markers();
        let mark = self.game.log.len();
        if !self.game.resolve(ticket) {
            debug!(session = %self.id, ?ticket, "timer fired for a stale flip");
            return Vec::new();
        }
        let entries = self.game.log.since(mark).to_vec();
        self.outcome(entries, before)
    }

    fn run(&mut self, command: GameCommand) -> Vec<ServerMessage> {
        let before = match command {
            GameCommand::NewGame => Markers::default(),
            _ => self.snapshot_markers(),
        };
        let entries = self.game.apply(command);
        self.outcome(entries, before)
    }

    /// Messages describing what changed since `before`
    fn outcome(&self, entries: Vec<LogEntry>, before: Markers) -> Vec<ServerMessage> {
        let mut messages = Vec::new();

        if !entries.is_empty() {
            messages.push(ServerMessage::Logs { entries });
        }

        if let Some(pending) = self.game.pending_resolution() {
            if before.pending != Some(pending.ticket) {
                messages.push(ServerMessage::ResolutionScheduled {
                    delay_ms: pending.delay_ms,
                });
            }
        }

        if let Some(kind) = self.game.power_selection {
            if before.selection != Some(kind) {
                let options = match kind {
                    PowerSelection::Laser => self.game.matched_pairs.clone(),
                    PowerSelection::Gentle => self.game.used_powers.clone(),
                };
                messages.push(ServerMessage::PowerSelection { kind, options });
            }
        }

        if self.game.game_over && !before.game_over {
            info!(session = %self.id, win = self.game.win, turn = self.game.turn, "game finished");
            messages.push(ServerMessage::GameOver { win: self.game.win });
        }

        messages.push(self.snapshot());
        messages
    }

    fn snapshot(&self) -> ServerMessage {
        ServerMessage::GameState {
            state: serde_json::to_value(&self.game).unwrap_or(serde_json::Value::Null),
        }
    }

    fn snapshot_markers(&self) -> Markers {
        Markers {
            pending: self.game.pending_resolution().map(|p| p.ticket),
            selection: self.game.power_selection,
            game_over: self.game.game_over,
        }
    }
}

/// Parts of the state whose change triggers a dedicated message
#[derive(Debug, Default)]
struct Markers {
    pending: Option<ResolutionTicket>,
    selection: Option<PowerSelection>,
    game_over: bool,
}
