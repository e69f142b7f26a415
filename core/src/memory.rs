//! Picture-memory game: look at an image for a few seconds, then answer a question about it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::MemoryLevel;
use crate::session::{SessionMode, SessionOutcome};
use crate::timer::{Countdown, TickOutcome};
use crate::*;

/// Seconds left at which the image starts blinking.
pub const BLINK_WARNING_SECS: u32 = 3;

/// Valid transitions:
/// - Setup -> Viewing
/// - Viewing -> Hidden (view countdown ran out)
/// - Hidden -> Question (one tick later)
/// - Question -> Answered
/// - Answered -> Viewing (next level) | Results
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MemoryState {
    #[default]
    Setup,
    Viewing,
    Hidden,
    Question,
    Answered { selected: usize, correct: bool },
    Results,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    NoChange,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PictureMemory {
    levels: Vec<MemoryLevel>,
    current: usize,
    countdown: Countdown,
    score: u32,
    state: MemoryState,
}

impl PictureMemory {
    pub const TOPIC: &'static str = "Picture Memory";

    pub fn new(levels: Vec<MemoryLevel>) -> Result<Self> {
        let first = levels.first().ok_or(GameError::NoContent)?;
        let countdown = Countdown::new(first.view_time_secs);
        Ok(Self {
            levels,
            current: 0,
            countdown,
            score: 0,
            state: MemoryState::Setup,
        })
    }

    pub fn state(&self) -> MemoryState {
        self.state
    }

    pub fn level(&self) -> &MemoryLevel {
        &self.levels[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_blinking(&self) -> bool {
        self.state == MemoryState::Viewing && self.countdown.remaining_secs() <= BLINK_WARNING_SECS
    }

    pub fn start(&mut self) {
        self.current = 0;
        self.score = 0;
        self.show_level();
    }

    /// One-second tick. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        match self.state {
            MemoryState::Viewing => {
                if let TickOutcome::Expired = self.countdown.tick() {
                    log::trace!("memory level {} hidden", self.current);
                    self.state = MemoryState::Hidden;
                }
                true
            }
            MemoryState::Hidden => {
                self.state = MemoryState::Question;
                true
            }
            MemoryState::Setup
            | MemoryState::Question
            | MemoryState::Answered { .. }
            | MemoryState::Results => false,
        }
    }

    pub fn answer(&mut self, selected: usize) -> Result<AnswerOutcome> {
        if self.state != MemoryState::Question {
            return Ok(AnswerOutcome::NoChange);
        }
        let level = self.level();
        if selected >= level.options.len() {
            return Err(GameError::InvalidAnswer {
                index: selected,
                options: level.options.len(),
            });
        }

        let correct = selected == level.correct_answer;
        if correct {
            self.score += 1;
        }
        self.state = MemoryState::Answered { selected, correct };
        Ok(if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        })
    }

    /// Leaves an answered level. Returns `true` if another level started.
    pub fn advance(&mut self) -> bool {
        if !matches!(self.state, MemoryState::Answered { .. }) {
            return false;
        }
        if self.current + 1 < self.levels.len() {
            self.current += 1;
            self.show_level();
            true
        } else {
            self.state = MemoryState::Results;
            log::debug!(
                "picture memory finished with {}/{}",
                self.score,
                self.total()
            );
            false
        }
    }

    pub fn outcome(
        &self,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        (self.state == MemoryState::Results).then(|| {
            SessionOutcome::new(
                Self::TOPIC,
                SessionMode::MiniGame,
                self.score,
                self.total(),
                time_spent_secs,
                timestamp,
            )
        })
    }

    fn show_level(&mut self) {
        self.countdown = Countdown::new(self.level().view_time_secs);
        self.state = MemoryState::Viewing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_memory_levels;

    fn level(view_time_secs: u32, correct_answer: usize) -> MemoryLevel {
        MemoryLevel {
            view_time_secs,
            ..MemoryLevel::new(
                "img.png",
                "What was shown?",
                &["A", "B", "C"],
                correct_answer,
            )
        }
    }

    fn reach_question(game: &mut PictureMemory) {
        while game.state() != MemoryState::Question {
            assert!(game.tick());
        }
    }

    #[test]
    fn viewing_blinks_near_the_end_then_hides() {
        let mut game = PictureMemory::new(builtin_memory_levels()).unwrap();
        game.start();
        assert_eq!(game.remaining_secs(), 10);

        for _ in 0..6 {
            game.tick();
        }
        assert!(!game.is_blinking());
        game.tick();
        assert_eq!(game.remaining_secs(), 3);
        assert!(game.is_blinking());

        for _ in 0..3 {
            game.tick();
        }
        assert_eq!(game.state(), MemoryState::Hidden);
        assert!(!game.is_blinking());

        game.tick();
        assert_eq!(game.state(), MemoryState::Question);
    }

    #[test]
    fn answers_are_only_taken_in_question_state() {
        let mut game = PictureMemory::new(vec![level(1, 0)]).unwrap();
        assert_eq!(game.answer(0), Ok(AnswerOutcome::NoChange));

        game.start();
        assert_eq!(game.answer(0), Ok(AnswerOutcome::NoChange));
        reach_question(&mut game);

        assert_eq!(
            game.answer(5),
            Err(GameError::InvalidAnswer {
                index: 5,
                options: 3
            })
        );
        assert_eq!(game.answer(0), Ok(AnswerOutcome::Correct));
        assert_eq!(game.answer(1), Ok(AnswerOutcome::NoChange));
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn full_game_reaches_results_and_yields_outcome() {
        let mut game = PictureMemory::new(vec![level(2, 0), level(1, 2)]).unwrap();
        game.start();
        assert!(!game.advance());

        reach_question(&mut game);
        assert_eq!(game.answer(1), Ok(AnswerOutcome::Incorrect));
        assert_eq!(
            game.state(),
            MemoryState::Answered {
                selected: 1,
                correct: false
            }
        );
        assert!(game.advance());
        assert_eq!(game.state(), MemoryState::Viewing);
        assert_eq!(game.remaining_secs(), 1);

        reach_question(&mut game);
        game.answer(2).unwrap();
        assert!(!game.advance());
        assert_eq!(game.state(), MemoryState::Results);
        assert!(!game.tick());

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let outcome = game.outcome(25, now).unwrap();
        assert_eq!(outcome.topic, "Picture Memory");
        assert_eq!((outcome.score, outcome.total), (1, 2));
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert_eq!(PictureMemory::new(Vec::new()), Err(GameError::NoContent));
    }
}
