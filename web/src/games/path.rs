use brainblast_core::{PathCell, PathPuzzle, PathState, StepOutcome, builtin_path_levels};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::SessionRecorder;
use crate::utils::to_json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    state: PathState,
    level: usize,
    level_count: usize,
    level_name: &'a str,
    is_last_level: bool,
    rows: Vec<Vec<PathCell>>,
    elapsed_secs: u64,
}

#[wasm_bindgen]
pub struct PathPuzzleGame {
    puzzle: PathPuzzle,
    recorder: SessionRecorder,
}

#[wasm_bindgen]
impl PathPuzzleGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PathPuzzleGame, JsError> {
        Ok(Self {
            puzzle: PathPuzzle::new(&builtin_path_levels())?,
            recorder: SessionRecorder::default(),
        })
    }

    #[wasm_bindgen(js_name = startLevel)]
    pub fn start_level(&mut self) {
        self.puzzle.start_level();
        self.recorder.start();
    }

    #[wasm_bindgen(js_name = resetLevel)]
    pub fn reset_level(&mut self) {
        self.puzzle.reset_level();
        self.recorder.start();
    }

    /// `false` once the last level has been played.
    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) -> bool {
        let advanced = self.puzzle.next_level();
        if advanced {
            self.recorder.start();
        }
        advanced
    }

    #[wasm_bindgen(js_name = beginStroke)]
    pub fn begin_stroke(&mut self, row: u8, col: u8) -> bool {
        let outcome = self.puzzle.begin_stroke((row, col));
        self.after_step(outcome)
    }

    #[wasm_bindgen(js_name = extendStroke)]
    pub fn extend_stroke(&mut self, row: u8, col: u8) -> bool {
        let outcome = self.puzzle.extend_stroke((row, col));
        self.after_step(outcome)
    }

    #[wasm_bindgen(js_name = endStroke)]
    pub fn end_stroke(&mut self) {
        self.puzzle.end_stroke();
    }

    pub fn snapshot(&self) -> String {
        to_json(&Snapshot {
            state: self.puzzle.state(),
            level: self.puzzle.current_level(),
            level_count: self.puzzle.level_count(),
            level_name: self.puzzle.level_name(),
            is_last_level: self.puzzle.is_last_level(),
            rows: self.puzzle.grid().rows().collect(),
            elapsed_secs: self.recorder.elapsed_secs(),
        })
    }
}

impl PathPuzzleGame {
    fn after_step(&mut self, outcome: StepOutcome) -> bool {
        match outcome {
            StepOutcome::NoChange => false,
            StepOutcome::Drawn => true,
            StepOutcome::Trapped | StepOutcome::Won | StepOutcome::Disconnected => {
                let puzzle = &self.puzzle;
                self.recorder.finish(|secs, now| puzzle.outcome(secs, now));
                true
            }
        }
    }
}
