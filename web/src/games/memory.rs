use std::cell::RefCell;
use std::rc::Rc;

use brainblast_core::{AnswerOutcome, MemoryState, PictureMemory, builtin_memory_levels};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::SessionRecorder;
use crate::ticker::Ticker;
use crate::utils::to_json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    #[serde(flatten)]
    state: MemoryState,
    level: usize,
    total: u32,
    score: u32,
    remaining_secs: u32,
    is_blinking: bool,
    image_url: &'a str,
    question: &'a str,
    options: &'a [String],
    elapsed_secs: u64,
}

struct Shared {
    game: PictureMemory,
    recorder: SessionRecorder,
}

#[wasm_bindgen]
pub struct PictureMemoryGame {
    shared: Rc<RefCell<Shared>>,
    _ticker: Option<Ticker>,
}

#[wasm_bindgen]
impl PictureMemoryGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PictureMemoryGame, JsError> {
        let shared = Shared {
            game: PictureMemory::new(builtin_memory_levels())?,
            recorder: SessionRecorder::default(),
        };
        Ok(Self {
            shared: Rc::new(RefCell::new(shared)),
            _ticker: None,
        })
    }

    /// Starts from the first level; `on_tick` is called whenever a tick changed the view.
    pub fn start(&mut self, on_tick: js_sys::Function) {
        {
            let mut shared = self.shared.borrow_mut();
            shared.game.start();
            shared.recorder.start();
        }

        let shared = Rc::clone(&self.shared);
        self._ticker = Some(Ticker::every_second(move || {
            let changed = shared.borrow_mut().game.tick();
            if changed {
                if let Err(err) = on_tick.call0(&JsValue::NULL) {
                    log::error!("picture memory tick callback failed: {:?}", err);
                }
            }
        }));
    }

    /// Returns `true` for a correct answer.
    pub fn answer(&mut self, option: usize) -> Result<bool, JsError> {
        let outcome = self.shared.borrow_mut().game.answer(option)?;
        Ok(outcome == AnswerOutcome::Correct)
    }

    /// Shows the next image, or saves the session after the last one.
    pub fn advance(&mut self) -> bool {
        let mut shared = self.shared.borrow_mut();
        let Shared { game, recorder } = &mut *shared;
        let advanced = game.advance();
        if game.state() == MemoryState::Results {
            recorder.finish(|secs, now| game.outcome(secs, now));
            drop(shared);
            self._ticker = None;
        }
        advanced
    }

    pub fn snapshot(&self) -> String {
        let shared = self.shared.borrow();
        let game = &shared.game;
        let level = game.level();
        to_json(&Snapshot {
            state: game.state(),
            level: game.current_index(),
            total: game.total(),
            score: game.score(),
            remaining_secs: game.remaining_secs(),
            is_blinking: game.is_blinking(),
            image_url: &level.image_url,
            question: &level.question,
            options: &level.options,
            elapsed_secs: shared.recorder.elapsed_secs(),
        })
    }
}
