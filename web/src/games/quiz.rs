use std::cell::RefCell;
use std::rc::Rc;

use brainblast_core::{Question, QuizCategory, QuizProgress, QuizResult, QuizSession};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::SessionRecorder;
use crate::ticker::Ticker;
use crate::utils::to_json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    category: &'a str,
    visual: bool,
    mode: String,
    index: usize,
    question_count: usize,
    question: &'a Question,
    selected: Option<usize>,
    remaining_secs: Option<u32>,
    result: Option<&'a QuizResult>,
    elapsed_secs: u64,
}

struct Shared {
    quiz: QuizSession,
    recorder: SessionRecorder,
}

impl Shared {
    fn save_if_finished(&mut self) {
        if self.quiz.is_finished() {
            let quiz = &self.quiz;
            self.recorder.finish(|secs, now| quiz.outcome(secs, now));
        }
    }

    /// Returns `true` when the countdown should stop.
    fn tick(&mut self) -> bool {
        if self.quiz.tick() == QuizProgress::Finished {
            self.save_if_finished();
        }
        self.quiz.is_finished()
    }
}

fn stop_ticker(slot: &RefCell<Option<Ticker>>) {
    let ticker = slot.borrow_mut().take();
    if let Some(ticker) = ticker {
        ticker.stop();
    }
}

#[wasm_bindgen]
pub struct QuizGame {
    shared: Rc<RefCell<Shared>>,
    ticker: Rc<RefCell<Option<Ticker>>>,
}

#[wasm_bindgen]
impl QuizGame {
    /// `questions` is a JSON array of question records for the category behind `slug`.
    #[wasm_bindgen(constructor)]
    pub fn new(slug: &str, questions: &str, timed: bool) -> Result<QuizGame, JsError> {
        let questions: Vec<Question> = serde_json::from_str(questions)?;
        let quiz = QuizSession::new(QuizCategory::from_slug(slug), questions, timed)?;
        Ok(Self {
            shared: Rc::new(RefCell::new(Shared {
                quiz,
                recorder: SessionRecorder::default(),
            })),
            ticker: Rc::default(),
        })
    }

    /// Starts the clock; timed quizzes also start counting down and call `on_tick` every second.
    pub fn start(&mut self, on_tick: Option<js_sys::Function>) {
        let timed = {
            let mut shared = self.shared.borrow_mut();
            shared.recorder.start();
            shared.quiz.remaining_secs().is_some()
        };
        if !timed {
            return;
        }

        let shared = Rc::clone(&self.shared);
        let slot = Rc::downgrade(&self.ticker);
        let ticker = Ticker::every_second(move || {
            let finished = shared.borrow_mut().tick();
            match slot.upgrade() {
                Some(slot) if finished => stop_ticker(&slot),
                _ => {}
            }
            let Some(on_tick) = &on_tick else {
                return;
            };
            if let Err(err) = on_tick.call0(&JsValue::NULL) {
                log::error!("quiz tick callback failed: {:?}", err);
            }
        });
        stop_ticker(&self.ticker);
        *self.ticker.borrow_mut() = Some(ticker);
    }

    pub fn select(&mut self, option: usize) -> Result<bool, JsError> {
        Ok(self.shared.borrow_mut().quiz.select(option)?)
    }

    /// Returns `true` once the quiz is over.
    pub fn next(&mut self) -> bool {
        let finished = {
            let mut shared = self.shared.borrow_mut();
            let progress = shared.quiz.next();
            shared.save_if_finished();
            progress == QuizProgress::Finished
        };
        if finished {
            stop_ticker(&self.ticker);
        }
        finished
    }

    pub fn snapshot(&self) -> String {
        let shared = self.shared.borrow();
        let quiz = &shared.quiz;
        to_json(&Snapshot {
            category: quiz.category().display_name(),
            visual: quiz.category().is_visual(),
            mode: quiz.mode().to_string(),
            index: quiz.current_index(),
            question_count: quiz.question_count(),
            question: quiz.question(),
            selected: quiz.selected(),
            remaining_secs: quiz.remaining_secs(),
            result: quiz.result(),
            elapsed_secs: shared.recorder.elapsed_secs(),
        })
    }
}
