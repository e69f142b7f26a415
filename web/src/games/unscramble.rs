use brainblast_core::{LetterScramble, UnscrambleSession, UnscrambleState, builtin_word_puzzles};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::SessionRecorder;
use crate::utils::{next_seed, to_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    state: UnscrambleState,
    word_index: usize,
    total: u32,
    score: u32,
    category: &'a str,
    hint: Option<&'a str>,
    round: Option<&'a LetterScramble>,
    elapsed_secs: u64,
}

#[wasm_bindgen]
pub struct UnscrambleGame {
    session: UnscrambleSession,
    recorder: SessionRecorder,
}

#[wasm_bindgen]
impl UnscrambleGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<UnscrambleGame, JsError> {
        Ok(Self {
            session: UnscrambleSession::new(builtin_word_puzzles(), next_seed())?,
            recorder: SessionRecorder::default(),
        })
    }

    pub fn start(&mut self) -> Result<(), JsError> {
        self.session.start()?;
        self.recorder.start();
        Ok(())
    }

    /// Returns `true` if a letter moved; the round's verdict is in the snapshot.
    #[wasm_bindgen(js_name = placeLetter)]
    pub fn place_letter(&mut self, slot: usize) -> bool {
        self.session.place_letter(slot).has_update()
    }

    #[wasm_bindgen(js_name = removeLetter)]
    pub fn remove_letter(&mut self, index: usize) -> bool {
        self.session.remove_letter(index).has_update()
    }

    pub fn reshuffle(&mut self) -> bool {
        self.session.reshuffle().has_update()
    }

    #[wasm_bindgen(js_name = showHint)]
    pub fn show_hint(&mut self) {
        self.session.show_hint();
    }

    /// Moves to the next word; saves the session once the last word is done.
    pub fn advance(&mut self) -> Result<bool, JsError> {
        let advanced = self.session.advance()?;
        if self.session.state() == UnscrambleState::Results {
            let session = &self.session;
            self.recorder.finish(|secs, now| session.outcome(secs, now));
        }
        Ok(advanced)
    }

    pub fn snapshot(&self) -> String {
        to_json(&Snapshot {
            state: self.session.state(),
            word_index: self.session.current_index(),
            total: self.session.total(),
            score: self.session.score(),
            category: &self.session.puzzle().category,
            hint: self.session.hint(),
            round: self.session.round(),
            elapsed_secs: self.recorder.elapsed_secs(),
        })
    }
}
