//! Power engine.
//!
//! Each type fires at most once per game: the first activation records the
//! type in `used_powers` and later activations are ignored. `copy` keeps no
//! guard and mirrors the other card of the failed flip, one level deep.
//! The `laser` and `gentle` powers open a secondary selection that is
//! completed by [`GameState::execute_laser_power`] and
//! [`GameState::execute_gentle_paw_power`].

use crate::actions::PowerSelection;
use crate::cards::CardType;
use crate::game::GameState;
use crate::log::{keys, Message};
use tracing::{debug, trace};

/// Copy may mirror a power, never a copy of a power
const MAX_COPY_DEPTH: u8 = 1;

impl GameState {
    /// Fire the power of `card_type` on behalf of card `card_id`
    pub fn activate_power(&mut self, card_type: CardType, card_id: &str) {
        self.dispatch_power(card_type, card_id, 0);
    }

    fn dispatch_power(&mut self, card_type: CardType, card_id: &str, depth: u8) {
        if !card_type.has_triggered_power() {
            return;
        }
        if card_type != CardType::Copy && self.used_powers.contains(&card_type) {
            trace!(%card_type, "power already used");
            return;
        }

        match card_type {
            CardType::Cucumber => {
                self.shuffle_board();
                self.mark_power_used(card_type);
            }
            CardType::Baker => {
                self.next_card_to_oven = true;
                self.mark_power_used(card_type);
                self.add_log(keys::BAKER_NEXT_CARD_OVEN);
            }
            CardType::Laser => {
                // Nothing to return: the power stays available
                if self.handle_laser_power() {
                    self.mark_power_used(card_type);
                }
            }
            CardType::Death => {
                let bonus = self.rules.death_bonus_moves;
                self.extra_moves += bonus;
                self.mark_power_used(card_type);
                self.add_log(Message::new(keys::DEATH_EXTRA_MOVES).with("moves", bonus));
            }
            CardType::Maneki => {
                let bonus = self.rules.maneki_bonus_moves;
                self.extra_moves += bonus;
                self.mark_power_used(card_type);
                self.add_log(Message::new(keys::MANEKI_EXTRA_MOVE).with("moves", bonus));
            }
            CardType::Gentle => {
                self.handle_gentle_paw_power();
                self.mark_power_used(card_type);
            }
            CardType::Copy => self.copy_power(card_id, depth),
            CardType::Lazy | CardType::Romeo | CardType::Normal => {}
        }
    }

    fn copy_power(&mut self, card_id: &str, depth: u8) {
        if self.flipped_cards.len() != 2 || depth >= MAX_COPY_DEPTH {
            return;
        }

        let other = self
            .flipped_cards
            .iter()
            .find(|id| id.as_str() != card_id)
            .and_then(|id| self.board.card(id))
            .map(|card| (card.id.clone(), card.card_type));

        match other {
            Some((other_id, other_type)) if other_type.is_copyable() => {
                debug!(copied = %other_type, "copy mirrors a power");
                self.dispatch_power(other_type, &other_id, depth + 1);
                self.add_log(Message::new(keys::COPY_COPIED).with("catType", other_type));
            }
            _ => self.add_log(keys::COPY_NOTHING),
        }
    }

    fn mark_power_used(&mut self, card_type: CardType) {
        if !self.used_powers.contains(&card_type) {
            self.used_powers.push(card_type);
        }
    }

    /// Reshuffle the unmatched cards
    fn shuffle_board(&mut self) {
        self.board.shuffle_unmatched(&mut self.rng);
        self.add_log(keys::SHUFFLE_BOARD);
    }

    /// Open the laser selection. Returns false when nothing is matched.
    fn handle_laser_power(&mut self) -> bool {
        if self.matched_pairs.is_empty() {
            self.game_message = Some(Message::new(keys::MSG_NO_MATCHED_TO_RETURN));
            self.add_log(keys::LASER_NO_PAIRS);
            return false;
        }
        self.power_selection = Some(PowerSelection::Laser);
        true
    }

    /// Open the gentle selection. Returns false when no power has fired yet.
    fn handle_gentle_paw_power(&mut self) -> bool {
        if self.used_powers.is_empty() {
            self.game_message = Some(Message::new(keys::MSG_NO_POWERS_USED_YET));
            self.add_log(keys::GENTLE_NO_POWERS_YET);
            return false;
        }
        self.power_selection = Some(PowerSelection::Gentle);
        true
    }

    /// Return a matched pair to the board at random free slots.
    ///
    /// Ignored once the game is over, and unless the laser selection is open
    /// and `pair_type` is matched.
    pub fn execute_laser_power(&mut self, pair_type: CardType) {
        if self.game_over
            || self.power_selection != Some(PowerSelection::Laser)
            || !self.matched_pairs.contains(&pair_type)
        {
            trace!(%pair_type, "laser selection ignored");
            return;
        }

        self.board.return_pair(pair_type, &mut self.rng);
        self.matched_pairs.retain(|&p| p != pair_type);
        self.close_power_selection();
        self.add_log(Message::new(keys::LASER_RETURNED_PAIR).with("catType", pair_type));
    }

    /// Fire an already-used power again.
    ///
    /// Ignored once the game is over, and unless the gentle selection is open
    /// and `power_type` has been used. Types outside the re-armable set are
    /// rejected and the selection stays open.
    pub fn execute_gentle_paw_power(&mut self, power_type: CardType) {
        if self.game_over
            || self.power_selection != Some(PowerSelection::Gentle)
            || !self.used_powers.contains(&power_type)
        {
            trace!(%power_type, "gentle selection ignored");
            return;
        }

        match power_type {
            CardType::Cucumber => {
                self.shuffle_board();
                self.add_log(keys::GENTLE_REACTIVATED_CUCUMBER);
            }
            CardType::Death => {
                let bonus = self.rules.death_bonus_moves;
                self.extra_moves += bonus;
                self.add_log(Message::new(keys::GENTLE_REACTIVATED_DEATH).with("moves", bonus));
            }
            CardType::Maneki => {
                let bonus = self.rules.maneki_bonus_moves;
                self.extra_moves += bonus;
                self.add_log(Message::new(keys::GENTLE_REACTIVATED_MANEKI).with("moves", bonus));
            }
            CardType::Baker => {
                self.next_card_to_oven = true;
                self.add_log(keys::GENTLE_REACTIVATED_BAKER);
            }
            CardType::Laser => {
                // The laser selection replaces this one, if it opens at all
                self.close_power_selection();
                self.handle_laser_power();
                self.add_log(keys::GENTLE_REACTIVATED_LASER);
                return;
            }
            other => {
                self.game_message = Some(Message::new(keys::MSG_POWER_CANNOT_BE_REUSED));
                self.add_log(Message::new(keys::GENTLE_CANNOT_REACTIVATE).with("catType", other));
                return;
            }
        }

        self.close_power_selection();
    }

    pub fn close_power_selection(&mut self) {
        self.power_selection = None;
    }
}
