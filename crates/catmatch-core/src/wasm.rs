//! WebAssembly bindings for the Catmatch engine.
//!
//! The browser owns the resolution timer: after a click it reads
//! `pendingDelayMs`, waits, and hands `pendingTicket` back to `resolve`.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::{GameCommand, ResolutionTicket};
#[cfg(feature = "wasm")]
use crate::cards::{CardType, CatVisuals};
#[cfg(feature = "wasm")]
use crate::config::RulesConfig;
#[cfg(feature = "wasm")]
use crate::game::GameState;
#[cfg(feature = "wasm")]
use crate::log::LogEntry;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a game from optional rules JSON and an optional seed
    #[wasm_bindgen(constructor)]
    pub fn new(rules_json: Option<String>, seed: Option<u64>) -> Result<WasmGame, JsValue> {
        let rules = match rules_json {
            Some(json) => RulesConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => RulesConfig::default(),
        };
        let seed = seed.unwrap_or_else(rand::random);

        Ok(WasmGame {
            state: GameState::with_rules(rules, seed),
        })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the full game log as JSON
    #[wasm_bindgen(js_name = getLog)]
    pub fn get_log(&self) -> String {
        serde_json::to_string(&self.state.log).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the standard visual table as JSON
    #[wasm_bindgen(js_name = getVisuals)]
    pub fn get_visuals(&self) -> String {
        serde_json::to_string(&CatVisuals::standard()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = initializeGame)]
    pub fn initialize_game(&mut self) -> String {
        self.run(GameCommand::NewGame)
    }

    /// Click a card; returns the new log entries as JSON
    #[wasm_bindgen(js_name = handleCardClick)]
    pub fn handle_card_click(&mut self, index: usize) -> String {
        self.run(GameCommand::ClickCard(index))
    }

    /// Delay before the pending flip should resolve, if one is pending
    #[wasm_bindgen(js_name = pendingDelayMs)]
    pub fn pending_delay_ms(&self) -> Option<u32> {
        self.state
            .pending_resolution()
            .map(|p| u32::try_from(p.delay_ms).unwrap_or(u32::MAX))
    }

    /// Ticket of the pending flip as JSON, or `null`
    #[wasm_bindgen(js_name = pendingTicket)]
    pub fn pending_ticket(&self) -> String {
        let ticket = self.state.pending_resolution().map(|p| p.ticket);
        serde_json::to_string(&ticket).unwrap_or_else(|_| "null".to_string())
    }

    /// Resolve a ticket from `pendingTicket`; stale tickets are ignored
    #[wasm_bindgen(js_name = resolve)]
    pub fn resolve(&mut self, ticket_json: &str) -> Result<String, JsValue> {
        let ticket: ResolutionTicket = serde_json::from_str(ticket_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid ticket JSON: {}", e)))?;

        let mark = self.state.log.len();
        self.state.resolve(ticket);
        Ok(Self::entries_json(self.state.log.since(mark)))
    }

    #[wasm_bindgen(js_name = executeLaserPower)]
    pub fn execute_laser_power(&mut self, pair_type: &str) -> Result<String, JsValue> {
        let pair = Self::parse_type(pair_type)?;
        Ok(self.run(GameCommand::ReturnPair(pair)))
    }

    #[wasm_bindgen(js_name = executeGentlePawPower)]
    pub fn execute_gentle_paw_power(&mut self, power_type: &str) -> Result<String, JsValue> {
        let power = Self::parse_type(power_type)?;
        Ok(self.run(GameCommand::ReactivatePower(power)))
    }

    #[wasm_bindgen(js_name = closePowerSelection)]
    pub fn close_power_selection(&mut self) -> String {
        self.run(GameCommand::ClosePowerSelection)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }
}

#[cfg(feature = "wasm")]
impl WasmGame {
    fn run(&mut self, command: GameCommand) -> String {
        let entries = self.state.apply(command);
        Self::entries_json(&entries)
    }

    fn parse_type(name: &str) -> Result<CardType, JsValue> {
        name.parse::<CardType>()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn entries_json(entries: &[LogEntry]) -> String {
        serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
    }
}
