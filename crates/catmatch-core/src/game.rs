//! Core game state machine.
//!
//! This module contains the `GameState` struct, the flip controller, the
//! resolution engine and the end-of-game check. Power effects are implemented
//! in [`crate::powers`].

use crate::actions::{GameCommand, PendingResolution, PowerSelection, ResolutionTicket};
use crate::board::Board;
use crate::cards::{CardId, CardType};
use crate::config::RulesConfig;
use crate::log::{keys, GameLog, LogEntry, Message};
use crate::timers::{CardTimers, OvenGate, SleepGate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, trace};

/// Matched types needed to win
pub const TOTAL_PAIRS: usize = CardType::ALL.len();

/// The complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Cards ordered by board position
    pub board: Board,
    /// Ids of face-up unresolved cards (0, 1 or 2)
    pub flipped_cards: Vec<CardId>,
    /// Types whose pair has been found, in the order found
    pub matched_pairs: Vec<CardType>,
    pub moves: i32,
    /// Bonus moves granted by powers
    pub extra_moves: i32,
    /// Turn number (starts at 1, one per resolved flip)
    pub turn: u32,
    pub game_over: bool,
    pub win: bool,
    /// The next eligible click sends its card to the oven
    pub next_card_to_oven: bool,
    pub timers: CardTimers,
    /// Turn on which a romeo card was first missed
    pub romeo_timer: Option<u32>,
    /// Powers that have fired, in firing order
    pub used_powers: Vec<CardType>,
    /// Secondary choice currently open
    pub power_selection: Option<PowerSelection>,
    /// Latest banner message
    pub game_message: Option<Message>,
    pub log: GameLog,
    pub rules: RulesConfig,
    pending: Option<PendingResolution>,
    generation: u64,
    next_seq: u64,
    #[serde(skip)]
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Create a new game with default rules and a random seed
    pub fn new() -> Self {
        Self::with_rules(RulesConfig::default(), rand::random())
    }

    /// Create a new game with default rules and a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rules(RulesConfig::default(), seed)
    }

    /// Create a new game; the board is dealt immediately
    pub fn with_rules(rules: RulesConfig, seed: u64) -> Self {
        let mut state = Self {
            board: Board::from_cards(Vec::new()),
            flipped_cards: Vec::new(),
            matched_pairs: Vec::new(),
            moves: rules.starting_moves,
            extra_moves: 0,
            turn: 1,
            game_over: false,
            win: false,
            next_card_to_oven: false,
            timers: CardTimers::new(),
            romeo_timer: None,
            used_powers: Vec::new(),
            power_selection: None,
            game_message: None,
            log: GameLog::new(),
            rules,
            pending: None,
            generation: 0,
            next_seq: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        state.initialize_game();
        state
    }

    // ==================== Read Surface ====================

    /// Flip waiting for its delayed resolution, if any
    pub fn pending_resolution(&self) -> Option<PendingResolution> {
        self.pending
    }

    pub fn show_power_selection(&self) -> bool {
        self.power_selection.is_some()
    }

    /// Regular plus extra moves left
    pub fn total_moves(&self) -> i32 {
        self.moves + self.extra_moves
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// Incremented on every new deal
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ==================== Commands ====================

    /// Apply a command, returning the log entries it produced
    pub fn apply(&mut self, command: GameCommand) -> Vec<LogEntry> {
        let mark = match command {
            GameCommand::NewGame => 0,
            _ => self.log.len(),
        };

        match command {
            GameCommand::NewGame => self.initialize_game(),
            GameCommand::ClickCard(index) => self.handle_card_click(index),
            GameCommand::ResolvePendingFlip => {
                self.resolve_pending_flip();
            }
            GameCommand::ReturnPair(pair) => self.execute_laser_power(pair),
            GameCommand::ReactivatePower(power) => self.execute_gentle_paw_power(power),
            GameCommand::ClosePowerSelection => self.close_power_selection(),
        }

        self.log.since(mark).to_vec()
    }

    /// Deal a fresh board and reset every counter.
    ///
    /// Any pending resolution belongs to the old board and is dropped.
    pub fn initialize_game(&mut self) {
        if let Some(stale) = self.pending.take() {
            debug!(ticket = ?stale.ticket, "dropping pending resolution on reset");
        }
        self.generation += 1;
        self.next_seq = 0;

        self.board = Board::shuffled(&mut self.rng);
        self.flipped_cards.clear();
        self.matched_pairs.clear();
        self.moves = self.rules.starting_moves;
        self.extra_moves = 0;
        self.turn = 1;
        self.game_over = false;
        self.win = false;
        self.next_card_to_oven = false;
        self.timers = CardTimers::new();
        self.romeo_timer = None;
        self.used_powers.clear();
        self.power_selection = None;
        self.game_message = Some(Message::new(keys::MSG_START));

        self.log = GameLog::new();
        self.log.push(0, keys::GAME_STARTED);

        debug!(generation = self.generation, "new board dealt");
    }

    /// Handle a click on the card at `index`.
    ///
    /// Clicks on gated cards advance the gate instead of revealing. Every
    /// rejected click is a no-op.
    pub fn handle_card_click(&mut self, index: usize) {
        if self.game_over || self.flipped_cards.len() >= 2 {
            trace!(index, "click ignored: board locked");
            return;
        }

        let (id, card_type) = match self.board.get(index) {
            Some(card) if card.is_face_down() => (card.id.clone(), card.card_type),
            _ => {
                trace!(index, "click ignored: no face-down card");
                return;
            }
        };

        let was_sleeping = self.timers.is_sleeping(&id);
        match self.timers.wake_attempt(&id, self.rules.lazy_wake_attempts) {
            SleepGate::Sleeping { attempt } => {
                self.add_log(
                    Message::new(keys::LAZY_SLEEPING_ATTEMPT)
                        .with("attempt", attempt)
                        .with("max", self.rules.lazy_wake_attempts),
                );
                return;
            }
            SleepGate::WokeUp => self.add_log(keys::LAZY_WOKE_UP),
            SleepGate::Untracked => {}
        }

        let was_baking = self.timers.is_baking(&id);
        match self.timers.oven_check(&id) {
            OvenGate::StillBaking { turns_left } => {
                self.add_log(Message::new(keys::OVEN_STILL_BAKING).with("turnsLeft", turns_left));
                return;
            }
            OvenGate::Ready => self.add_log(keys::OVEN_READY),
            OvenGate::Untracked => {}
        }

        if card_type == CardType::Lazy && !was_sleeping {
            self.timers.put_to_sleep(&id);
            self.add_log(keys::LAZY_NEEDS_ANOTHER_ATTEMPT);
            return;
        }

        if self.next_card_to_oven && !was_baking {
            self.timers.send_to_oven(&id, self.rules.oven_turns);
            self.next_card_to_oven = false;
            self.add_log(keys::OVEN_SENT);
            debug!(card = %id, "card sent to the oven");
            return;
        }

        self.board.set_flipped(&id, true);
        self.flipped_cards.push(id);
        self.add_log(Message::new(keys::REVEALED).with("catType", card_type));

        if self.flipped_cards.len() == 2 {
            self.schedule_resolution();
        }
    }

    /// Resolve the flip identified by `ticket`.
    ///
    /// Returns false (and changes nothing) when the ticket is not the pending
    /// one, e.g. it was issued before the last reset.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> bool {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                self.resolve_flip();
                true
            }
            _ => {
                debug!(?ticket, "ignoring stale resolution ticket");
                false
            }
        }
    }

    /// Resolve whatever flip is pending, without waiting for the delay
    pub fn resolve_pending_flip(&mut self) -> bool {
        match self.pending {
            Some(pending) => self.resolve(pending.ticket),
            None => false,
        }
    }

    /// Check for a win or a loss
    pub fn check_game_end(&mut self) {
        if self.game_over {
            return;
        }

        if self.matched_pairs.len() == TOTAL_PAIRS {
            self.win = true;
            self.game_over = true;
            self.power_selection = None;
            self.game_message = Some(Message::new(keys::MSG_VICTORY));
            self.add_log(keys::VICTORY);
            debug!(turn = self.turn, "game won");
            return;
        }

        if self.total_moves() <= 0 {
            self.game_over = true;
            self.power_selection = None;
            self.game_message = Some(Message::new(keys::MSG_GAME_OVER));
            self.add_log(keys::GAME_OVER);
            debug!(turn = self.turn, "out of moves");
        }
    }

    // ==================== Helper Methods ====================

    pub(crate) fn add_log(&mut self, message: impl Into<Message>) {
        self.log.push(self.turn, message);
    }

    fn schedule_resolution(&mut self) {
        self.next_seq += 1;
        let ticket = ResolutionTicket {
            game: self.generation,
            seq: self.next_seq,
        };
        self.pending = Some(PendingResolution {
            ticket,
            delay_ms: self.rules.resolution_delay_ms,
        });
        trace!(?ticket, "resolution scheduled");
    }

    fn resolve_flip(&mut self) {
        let pair = match self.flipped_cards.as_slice() {
            [a, b] => self
                .board
                .card(a)
                .zip(self.board.card(b))
                .map(|(a, b)| ((a.id.clone(), a.card_type), (b.id.clone(), b.card_type))),
            _ => None,
        };

        match pair {
            Some(((a_id, a_type), (_, b_type))) if a_type == b_type => {
                self.resolve_match(a_type, &a_id)
            }
            Some((a, b)) => self.resolve_mismatch(a, b),
            None => debug!(flipped = ?self.flipped_cards, "flipped cards left the board"),
        }

        self.flipped_cards.clear();
        self.moves -= 1;
        self.turn += 1;
        self.timers.advance_turn();
        self.check_game_end();
    }

    fn resolve_match(&mut self, card_type: CardType, card_id: &str) {
        self.board.mark_matched(card_type);
        if !self.matched_pairs.contains(&card_type) {
            self.matched_pairs.push(card_type);
        }
        self.add_log(Message::new(keys::FOUND_PAIR).with("catType", card_type));
        debug!(%card_type, turn = self.turn, "pair found");

        self.activate_power(card_type, card_id);

        if card_type == CardType::Romeo {
            self.romeo_timer = None;
            self.add_log(keys::ROMEO_PAIR_FOUND);
        }
    }

    fn resolve_mismatch(&mut self, a: (CardId, CardType), b: (CardId, CardType)) {
        let (a_id, a_type) = a;
        let (b_id, b_type) = b;

        self.board.set_flipped(&a_id, false);
        self.board.set_flipped(&b_id, false);
        self.add_log(
            Message::new(keys::MISMATCH)
                .with("catTypeA", a_type)
                .with("catTypeB", b_type),
        );

        if a_type == CardType::Copy {
            self.activate_power(CardType::Copy, &a_id);
        }
        if b_type == CardType::Copy {
            self.activate_power(CardType::Copy, &b_id);
        }

        if a_type == CardType::Romeo || b_type == CardType::Romeo {
            match self.romeo_timer {
                None => {
                    self.romeo_timer = Some(self.turn);
                    self.add_log(keys::ROMEO_REVEALED);
                }
                Some(since) => {
                    for card in self.board.remove_type(CardType::Romeo) {
                        self.timers.forget(&card.id);
                    }
                    self.romeo_timer = None;
                    self.add_log(keys::ROMEO_LEFT);
                    debug!(since, turn = self.turn, "romeo left the board");
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(game: &GameState, id: &str) -> usize {
        game.board.index_of(id).unwrap()
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::with_seed(1);
        assert_eq!(game.board.len(), 20);
        assert_eq!(game.moves, 35);
        assert_eq!(game.extra_moves, 0);
        assert_eq!(game.turn, 1);
        assert!(!game.game_over);
        assert!(game.pending_resolution().is_none());
        assert_eq!(game.log.len(), 1);
        assert_eq!(game.log.entries()[0].turn, 0);
        assert_eq!(game.log.entries()[0].message.key, keys::GAME_STARTED);
        assert_eq!(game.game_message, Some(Message::new(keys::MSG_START)));
    }

    #[test]
    fn test_same_seed_deals_same_board() {
        let a = GameState::with_seed(42);
        let b = GameState::with_seed(42);
        assert_eq!(a.board, b.board);
    }

    #[test]
    fn test_second_reveal_schedules_resolution() {
        let mut game = GameState::with_seed(3);
        game.handle_card_click(index_of(&game, "normal_1"));
        assert!(game.pending_resolution().is_none());

        game.handle_card_click(index_of(&game, "death_1"));
        let pending = game.pending_resolution().unwrap();
        assert_eq!(pending.delay_ms, 1200);
        assert_eq!(game.flipped_cards.len(), 2);

        // Board is locked until the flip resolves
        let log_len = game.log.len();
        game.handle_card_click(index_of(&game, "maneki_1"));
        assert_eq!(game.log.len(), log_len);
        assert_eq!(game.flipped_cards.len(), 2);
    }

    #[test]
    fn test_click_guards_are_no_ops() {
        let mut game = GameState::with_seed(3);
        let before = game.log.len();

        game.handle_card_click(99);
        assert_eq!(game.log.len(), before);

        let idx = index_of(&game, "normal_1");
        game.handle_card_click(idx);
        game.handle_card_click(idx);
        assert_eq!(game.flipped_cards, vec!["normal_1".to_string()]);

        game.game_over = true;
        game.handle_card_click(index_of(&game, "normal_2"));
        assert_eq!(game.flipped_cards.len(), 1);
    }

    #[test]
    fn test_stale_ticket_is_ignored_after_reset() {
        let mut game = GameState::with_seed(5);
        game.handle_card_click(index_of(&game, "normal_1"));
        game.handle_card_click(index_of(&game, "death_1"));
        let ticket = game.pending_resolution().unwrap().ticket;

        game.initialize_game();
        assert!(game.pending_resolution().is_none());
        assert!(!game.resolve(ticket));
        assert_eq!(game.turn, 1);
        assert_eq!(game.moves, 35);
    }

    #[test]
    fn test_ticket_only_resolves_once() {
        let mut game = GameState::with_seed(5);
        game.handle_card_click(index_of(&game, "normal_1"));
        game.handle_card_click(index_of(&game, "death_1"));
        let ticket = game.pending_resolution().unwrap().ticket;

        assert!(game.resolve(ticket));
        assert!(!game.resolve(ticket));
        assert_eq!(game.turn, 2);
        assert_eq!(game.moves, 34);
    }

    #[test]
    fn test_apply_returns_log_delta() {
        let mut game = GameState::with_seed(9);
        let idx = index_of(&game, "maneki_1");
        let delta = game.apply(GameCommand::ClickCard(idx));
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].message.key, keys::REVEALED);

        let delta = game.apply(GameCommand::NewGame);
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].message.key, keys::GAME_STARTED);
    }

    #[test]
    fn test_first_lazy_click_only_registers() {
        let mut game = GameState::with_seed(11);
        game.handle_card_click(index_of(&game, "lazy_1"));
        assert!(!game.board.card("lazy_1").unwrap().flipped);
        assert_eq!(game.timers.lazy_cards["lazy_1"], 1);
        assert_eq!(
            game.log.last().unwrap().message.key,
            keys::LAZY_NEEDS_ANOTHER_ATTEMPT
        );
    }

    #[test]
    fn test_loss_when_moves_run_out() {
        let mut game = GameState::with_seed(13);
        game.moves = 0;
        game.check_game_end();
        assert!(game.game_over);
        assert!(!game.win);
    }

    #[test]
    fn test_extra_moves_postpone_loss() {
        let mut game = GameState::with_seed(13);
        game.moves = 0;
        game.extra_moves = 1;
        game.check_game_end();
        assert!(!game.game_over);
    }
}
