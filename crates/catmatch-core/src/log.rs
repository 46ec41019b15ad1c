//! The player-facing game log.
//!
//! Entries carry a dotted message key plus named values; formatting them for
//! display is left to the presentation layer.

use crate::cards::CardType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message keys emitted by the engine
pub mod keys {
    pub const GAME_STARTED: &str = "logs.gameStarted";
    pub const REVEALED: &str = "logs.revealed";
    pub const FOUND_PAIR: &str = "logs.foundPair";
    pub const MISMATCH: &str = "logs.mismatch";
    pub const VICTORY: &str = "logs.victory";
    pub const GAME_OVER: &str = "logs.gameOver";
    pub const SHUFFLE_BOARD: &str = "logs.shuffleBoard";

    pub const LAZY_NEEDS_ANOTHER_ATTEMPT: &str = "logs.lazy.needsAnotherAttempt";
    pub const LAZY_SLEEPING_ATTEMPT: &str = "logs.lazy.sleepingAttempt";
    pub const LAZY_WOKE_UP: &str = "logs.lazy.wokeUp";

    pub const OVEN_SENT: &str = "logs.oven.sent";
    pub const OVEN_STILL_BAKING: &str = "logs.oven.stillBaking";
    pub const OVEN_READY: &str = "logs.oven.ready";

    pub const ROMEO_REVEALED: &str = "logs.romeo.revealed";
    pub const ROMEO_PAIR_FOUND: &str = "logs.romeo.pairFound";
    pub const ROMEO_LEFT: &str = "logs.romeo.left";

    pub const BAKER_NEXT_CARD_OVEN: &str = "logs.whiskersNextCardOven";
    pub const DEATH_EXTRA_MOVES: &str = "logs.catastropheExtraMoves";
    pub const MANEKI_EXTRA_MOVE: &str = "logs.luckyPawsExtraMove";
    pub const LASER_NO_PAIRS: &str = "logs.laserNoPairs";
    pub const LASER_RETURNED_PAIR: &str = "logs.laserReturnedPair";
    pub const GENTLE_NO_POWERS_YET: &str = "logs.gentleNoPowersYet";
    pub const GENTLE_CANNOT_REACTIVATE: &str = "logs.gentleCannotReactivate";
    pub const COPY_COPIED: &str = "logs.copy.copied";
    pub const COPY_NOTHING: &str = "logs.copy.nothing";

    pub const GENTLE_REACTIVATED_CUCUMBER: &str = "logs.gentleReactivated.cucumber";
    pub const GENTLE_REACTIVATED_DEATH: &str = "logs.gentleReactivated.death";
    pub const GENTLE_REACTIVATED_MANEKI: &str = "logs.gentleReactivated.maneki";
    pub const GENTLE_REACTIVATED_LASER: &str = "logs.gentleReactivated.laser";
    pub const GENTLE_REACTIVATED_BAKER: &str = "logs.gentleReactivated.baker";

    // Banner messages
    pub const MSG_START: &str = "messages.start";
    pub const MSG_VICTORY: &str = "messages.victory";
    pub const MSG_GAME_OVER: &str = "messages.gameOver";
    pub const MSG_NO_MATCHED_TO_RETURN: &str = "messages.noMatchedToReturn";
    pub const MSG_NO_POWERS_USED_YET: &str = "messages.noPowersUsedYet";
    pub const MSG_POWER_CANNOT_BE_REUSED: &str = "messages.powerCannotBeReused";
}

/// A named value attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    Number(i64),
    Text(String),
}

impl From<i64> for MessageValue {
    fn from(n: i64) -> Self {
        MessageValue::Number(n)
    }
}

impl From<i32> for MessageValue {
    fn from(n: i32) -> Self {
        MessageValue::Number(n.into())
    }
}

impl From<u32> for MessageValue {
    fn from(n: u32) -> Self {
        MessageValue::Number(n.into())
    }
}

impl From<&str> for MessageValue {
    fn from(s: &str) -> Self {
        MessageValue::Text(s.to_string())
    }
}

impl From<CardType> for MessageValue {
    fn from(t: CardType) -> Self {
        MessageValue::Text(t.key().to_string())
    }
}

/// A message identifier plus its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, MessageValue>,
}

impl Message {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            values: BTreeMap::new(),
        }
    }

    /// Attach a named value
    pub fn with(mut self, name: &str, value: impl Into<MessageValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&MessageValue> {
        self.values.get(name)
    }
}

impl From<&str> for Message {
    fn from(key: &str) -> Self {
        Message::new(key)
    }
}

/// One log line, tagged with the turn it happened on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub message: Message,
}

/// Append-only sequence of log entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameLog {
    entries: Vec<LogEntry>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: u32, message: impl Into<Message>) {
        self.entries.push(LogEntry {
            turn,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Entries appended after the first `mark` entries
    pub fn since(&self, mark: usize) -> &[LogEntry] {
        self.entries.get(mark..).unwrap_or(&[])
    }

    /// Check whether any entry carries this key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.message.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_without_empty_values() {
        let json = serde_json::to_string(&Message::new(keys::VICTORY)).unwrap();
        assert_eq!(json, r#"{"key":"logs.victory"}"#);
    }

    #[test]
    fn test_message_values() {
        let msg = Message::new(keys::MISMATCH)
            .with("catTypeA", CardType::Lazy)
            .with("catTypeB", CardType::Romeo);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["values"]["catTypeA"], "lazy");
        assert_eq!(json["values"]["catTypeB"], "romeo");

        let attempt = Message::new(keys::LAZY_SLEEPING_ATTEMPT).with("attempt", 2u32);
        assert_eq!(attempt.value("attempt"), Some(&MessageValue::Number(2)));
    }

    #[test]
    fn test_since_returns_delta() {
        let mut log = GameLog::new();
        log.push(0, keys::GAME_STARTED);
        let mark = log.len();
        log.push(1, keys::REVEALED);
        log.push(1, keys::MISMATCH);

        let delta = log.since(mark);
        assert_eq!(delta.len(), 2);
        assert_eq!(delta[0].message.key, keys::REVEALED);
        assert!(log.since(10).is_empty());
    }
}
