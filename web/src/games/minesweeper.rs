use brainblast_core::{Cell, EngineState, GameConfig, MinesweeperEngine};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::SessionRecorder;
use crate::utils::{next_seed, to_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    state: EngineState,
    rows: Vec<Vec<Cell>>,
    mines_left: isize,
    triggered_mine: Option<(u8, u8)>,
    elapsed_secs: u64,
}

#[wasm_bindgen]
pub struct MinesweeperGame {
    engine: MinesweeperEngine,
    recorder: SessionRecorder,
}

#[wasm_bindgen]
impl MinesweeperGame {
    /// Classic 9x9 board with 10 mines.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(GameConfig::CLASSIC)
    }

    pub fn custom(side: u8, mines: u16) -> Result<MinesweeperGame, JsError> {
        Ok(Self::from_config(GameConfig::new(side, mines)?))
    }

    pub fn reveal(&mut self, row: u8, col: u8) -> bool {
        let starting = self.engine.state().is_setup();
        let outcome = self.engine.reveal((row, col));
        if starting && outcome.has_update() {
            self.recorder.start();
        }
        if self.engine.is_finished() {
            let engine = &self.engine;
            self.recorder.finish(|secs, now| engine.outcome(secs, now));
        }
        outcome.has_update()
    }

    #[wasm_bindgen(js_name = toggleFlag)]
    pub fn toggle_flag(&mut self, row: u8, col: u8) -> bool {
        self.engine.toggle_flag((row, col)).has_update()
    }

    pub fn restart(&mut self) {
        self.engine.restart(next_seed());
        self.recorder = SessionRecorder::default();
    }

    pub fn snapshot(&self) -> String {
        to_json(&Snapshot {
            state: self.engine.state(),
            rows: self.engine.field().rows().collect(),
            mines_left: self.engine.mines_left(),
            triggered_mine: self.engine.triggered_mine(),
            elapsed_secs: self.recorder.elapsed_secs(),
        })
    }
}

impl MinesweeperGame {
    fn from_config(config: GameConfig) -> Self {
        let seed = next_seed();
        log::debug!("new minesweeper {:?} with seed {}", config, seed);
        Self {
            engine: MinesweeperEngine::new(config, seed),
            recorder: SessionRecorder::default(),
        }
    }
}

impl Default for MinesweeperGame {
    fn default() -> Self {
        Self::new()
    }
}
