//! Multiple-choice category quiz, optionally against the clock.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{Question, QuizCategory};
use crate::session::{SessionMode, SessionOutcome};
use crate::timer::{Countdown, TickOutcome};
use crate::*;

/// Time budget for a whole timed quiz.
pub const TIMED_QUIZ_SECS: u32 = 600;

/// Percentage the results screen counts as passed. Streaks use the stricter scorer threshold.
pub const RESULTS_PASS_PERCENT: u32 = 60;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    Excellent,
    Great,
    Good,
    NotBad,
    KeepTrying,
}

impl Performance {
    pub const fn from_percent(percent: u32) -> Self {
        match percent {
            90.. => Self::Excellent,
            80..=89 => Self::Great,
            70..=79 => Self::Good,
            60..=69 => Self::NotBad,
            _ => Self::KeepTrying,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::Great => "Great Job!",
            Self::Good => "Good Work!",
            Self::NotBad => "Not Bad!",
            Self::KeepTrying => "Keep Trying!",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub answers: Vec<Option<usize>>,
    /// Rounded half up
    pub percent: u32,
    pub performance: Performance,
    pub passed: bool,
}

impl QuizResult {
    pub fn new(score: u32, total: u32, answers: Vec<Option<usize>>) -> Self {
        let percent = rounded_percent(score, total);
        Self {
            score,
            total,
            answers,
            percent,
            performance: Performance::from_percent(percent),
            passed: percent >= RESULTS_PASS_PERCENT,
        }
    }
}

fn rounded_percent(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (u64::from(score), u64::from(total));
    ((score * 200 + total) / (total * 2)) as u32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuizProgress {
    NoChange,
    Advanced,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    category: QuizCategory,
    questions: Vec<Question>,
    current: usize,
    selected: Option<usize>,
    answers: Vec<Option<usize>>,
    countdown: Option<Countdown>,
    result: Option<QuizResult>,
}

impl QuizSession {
    pub fn new(category: QuizCategory, questions: Vec<Question>, timed: bool) -> Result<Self> {
        if questions.is_empty() {
            return Err(GameError::NoContent);
        }
        log::debug!(
            "{} quiz on {} with {} questions",
            if timed { "timed" } else { "untimed" },
            category,
            questions.len()
        );
        Ok(Self {
            category,
            answers: vec![None; questions.len()],
            questions,
            current: 0,
            selected: None,
            countdown: timed.then(|| Countdown::new(TIMED_QUIZ_SECS)),
            result: None,
        })
    }

    pub fn category(&self) -> QuizCategory {
        self.category
    }

    pub fn mode(&self) -> SessionMode {
        if self.countdown.is_some() {
            SessionMode::Timed
        } else {
            SessionMode::Untimed
        }
    }

    pub fn question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// `None` for untimed quizzes.
    pub fn remaining_secs(&self) -> Option<u32> {
        self.countdown.map(|countdown| countdown.remaining_secs())
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Selects an option for the current question, replacing any earlier pick.
    pub fn select(&mut self, index: usize) -> Result<bool> {
        if self.is_finished() {
            return Ok(false);
        }
        let options = self.question().options.len();
        if index >= options {
            return Err(GameError::InvalidAnswer { index, options });
        }
        let changed = self.selected != Some(index);
        self.selected = Some(index);
        Ok(changed)
    }

    /// Records the current pick, or leaves the question unanswered, then moves on.
    pub fn next(&mut self) -> QuizProgress {
        if self.is_finished() {
            return QuizProgress::NoChange;
        }
        self.answers[self.current] = self.selected.take();
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            QuizProgress::Advanced
        } else {
            self.finish();
            QuizProgress::Finished
        }
    }

    /// One-second tick of the timed mode; finishes the quiz when the budget runs out.
    pub fn tick(&mut self) -> QuizProgress {
        if self.is_finished() {
            return QuizProgress::NoChange;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return QuizProgress::NoChange;
        };
        match countdown.tick() {
            TickOutcome::Running(_) => QuizProgress::NoChange,
            TickOutcome::Expired => {
                log::debug!("quiz time is up on question {}", self.current + 1);
                self.answers[self.current] = self.selected.take();
                self.finish();
                QuizProgress::Finished
            }
        }
    }

    pub fn outcome(
        &self,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        let result = self.result.as_ref()?;
        Some(
            SessionOutcome::new(
                self.category.display_name(),
                self.mode(),
                result.score,
                result.total,
                time_spent_secs,
                timestamp,
            )
            .with_answers(result.answers.clone()),
        )
    }

    fn finish(&mut self) {
        let score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| **answer == Some(question.correct_answer))
            .count() as u32;
        let result = QuizResult::new(score, self.questions.len() as u32, self.answers.clone());
        log::debug!(
            "quiz on {} finished: {}/{} ({}%)",
            self.category,
            result.score,
            result.total,
            result.percent
        );
        self.result = Some(result);
    }
}
