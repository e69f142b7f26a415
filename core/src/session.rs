//! Session outcomes and the rolling statistics folded from them.
//!
//! Every quiz and mini game ends by producing one [`SessionOutcome`]. The [`SessionScorer`]
//! appends it to the user's [`History`] and derives fresh [`AggregateStats`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Percentage a session must reach to extend a streak, shared by every quiz and game.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

/// Points a mini game awards for a win; a loss scores zero out of the same total.
pub const MINI_GAME_TOTAL: u32 = 10;

/// How a session was played. Persisted as the plain label, unknown labels survive a round trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionMode {
    Timed,
    Untimed,
    MiniGame,
    Other(String),
}

impl SessionMode {
    pub fn label(&self) -> &str {
        match self {
            Self::Timed => "Timed",
            Self::Untimed => "Untimed",
            Self::MiniGame => "Mini Game",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for SessionMode {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Timed" => Self::Timed,
            "Untimed" => Self::Untimed,
            "Mini Game" => Self::MiniGame,
            _ => Self::Other(label),
        }
    }
}

impl From<SessionMode> for String {
    fn from(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub topic: String,
    pub mode: SessionMode,
    pub score: u32,
    pub total: u32,
    pub time_spent_secs: u64,
    pub timestamp: DateTime<Utc>,
    /// Chosen option per question, `None` when left unanswered. Empty for mini games.
    #[serde(default)]
    pub answers: Vec<Option<usize>>,
}

impl SessionOutcome {
    pub fn new(
        topic: impl Into<String>,
        mode: SessionMode,
        score: u32,
        total: u32,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            topic: topic.into(),
            mode,
            score,
            total,
            time_spent_secs,
            timestamp,
            answers: Vec::new(),
        }
    }

    /// Full marks for a win, nothing for a loss.
    pub fn mini_game(
        topic: impl Into<String>,
        won: bool,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let score = if won { MINI_GAME_TOTAL } else { 0 };
        Self::new(
            topic,
            SessionMode::MiniGame,
            score,
            MINI_GAME_TOTAL,
            time_spent_secs,
            timestamp,
        )
    }

    pub fn with_answers(mut self, answers: Vec<Option<usize>>) -> Self {
        self.answers = answers;
        self
    }

    /// `score / total` as a percentage; a session without questions counts as 0%.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total) * 100.0
    }

    /// Compared in integers so a 7/10 session sits exactly on a 70% threshold.
    pub fn passes(&self, threshold_percent: u32) -> bool {
        self.total > 0
            && u64::from(self.score) * 100 >= u64::from(threshold_percent) * u64::from(self.total)
    }
}

/// Append-only, chronologically ordered list of every finished session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<SessionOutcome>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: SessionOutcome) {
        self.0.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SessionOutcome> + ExactSizeIterator {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&SessionOutcome> {
        self.0.last()
    }

    pub fn as_slice(&self) -> &[SessionOutcome] {
        &self.0
    }

    pub fn average_score_percent(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().map(SessionOutcome::percent).sum::<f64>() / self.0.len() as f64
    }

    /// Longest run of passing sessions, scanning from the newest entry back to the oldest.
    pub fn longest_pass_streak(&self, threshold_percent: u32) -> u32 {
        let mut current = 0;
        let mut longest = 0;
        for outcome in self.0.iter().rev() {
            if outcome.passes(threshold_percent) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }
}

impl From<Vec<SessionOutcome>> for History {
    fn from(outcomes: Vec<SessionOutcome>) -> Self {
        Self(outcomes)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a SessionOutcome;
    type IntoIter = core::slice::Iter<'a, SessionOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateStats {
    pub total_sessions: u32,
    pub average_score_percent: f64,
    pub best_streak: u32,
    pub total_time_spent_secs: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionScorer {
    pass_threshold_percent: u32,
}

impl Default for SessionScorer {
    fn default() -> Self {
        Self {
            pass_threshold_percent: PASS_THRESHOLD_PERCENT,
        }
    }
}

impl SessionScorer {
    pub fn new(pass_threshold_percent: u32) -> Self {
        Self {
            pass_threshold_percent,
        }
    }

    pub fn pass_threshold_percent(&self) -> u32 {
        self.pass_threshold_percent
    }

    /// Appends `outcome` and derives the statistics that follow it.
    ///
    /// Session count and total time accumulate on top of `previous`; the average is rebuilt from
    /// the full history and the best streak never drops below the previous best.
    pub fn record(
        &self,
        mut history: History,
        previous: &AggregateStats,
        outcome: SessionOutcome,
    ) -> (History, AggregateStats) {
        let time_spent = outcome.time_spent_secs;
        history.push(outcome);

        let mut stats = self.recompute(&history, previous);
        stats.total_sessions = previous.total_sessions.saturating_add(1);
        stats.total_time_spent_secs = previous.total_time_spent_secs.saturating_add(time_spent);
        log::debug!(
            "recorded session #{}: average {:.1}%, best streak {}",
            stats.total_sessions,
            stats.average_score_percent,
            stats.best_streak
        );
        (history, stats)
    }

    /// Refreshes the history-derived fields without adding a session, safe to repeat.
    pub fn recompute(&self, history: &History, previous: &AggregateStats) -> AggregateStats {
        AggregateStats {
            total_sessions: previous.total_sessions,
            average_score_percent: history.average_score_percent(),
            best_streak: previous
                .best_streak
                .max(history.longest_pass_streak(self.pass_threshold_percent)),
            total_time_spent_secs: previous.total_time_spent_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn outcome(score: u32, total: u32, time: u64) -> SessionOutcome {
        SessionOutcome::new(
            "General Knowledge",
            SessionMode::Untimed,
            score,
            total,
            time,
            at(0),
        )
    }

    fn fold(outcomes: &[SessionOutcome]) -> (History, AggregateStats) {
        let scorer = SessionScorer::default();
        outcomes.iter().cloned().fold(
            (History::new(), AggregateStats::default()),
            |(history, stats), next| scorer.record(history, &stats, next),
        )
    }

    #[test]
    fn streak_and_average_over_mixed_history() {
        let (history, stats) = fold(&[
            outcome(10, 10, 30),
            outcome(5, 10, 40),
            outcome(8, 10, 50),
            outcome(9, 10, 60),
        ]);

        assert_eq!(history.len(), 4);
        assert_eq!(stats.best_streak, 2);
        assert!((stats.average_score_percent - 80.0).abs() < 1e-9);
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.total_time_spent_secs, 180);
    }

    #[test]
    fn best_streak_never_decreases() {
        let scorer = SessionScorer::default();
        let previous = AggregateStats {
            total_sessions: 7,
            average_score_percent: 90.0,
            best_streak: 5,
            total_time_spent_secs: 100,
        };

        let (_, stats) = scorer.record(History::new(), &previous, outcome(0, 10, 20));

        assert_eq!(stats.best_streak, 5);
        assert_eq!(stats.total_sessions, 8);
        assert_eq!(stats.total_time_spent_secs, 120);
        assert_eq!(stats.average_score_percent, 0.0);
    }

    #[test]
    fn recompute_without_new_outcome_is_idempotent() {
        let scorer = SessionScorer::default();
        let (history, stats) = fold(&[outcome(7, 10, 10), outcome(3, 4, 10), outcome(1, 10, 10)]);

        let once = scorer.recompute(&history, &stats);
        let twice = scorer.recompute(&history, &once);

        assert_eq!(once, stats);
        assert_eq!(twice, once);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(outcome(7, 10, 0).passes(PASS_THRESHOLD_PERCENT));
        assert!(!outcome(6, 10, 0).passes(PASS_THRESHOLD_PERCENT));
        assert!(!outcome(0, 0, 0).passes(PASS_THRESHOLD_PERCENT));
        assert_eq!(outcome(0, 0, 0).percent(), 0.0);
    }

    #[test]
    fn mini_game_outcomes_score_all_or_nothing() {
        let won = SessionOutcome::mini_game("Path Puzzle", true, 12, at(0));
        let lost = SessionOutcome::mini_game("Path Puzzle", false, 12, at(0));

        assert_eq!((won.score, won.total), (10, 10));
        assert_eq!((lost.score, lost.total), (0, 10));
        assert_eq!(won.mode, SessionMode::MiniGame);
    }

    #[test]
    fn mode_keeps_unknown_labels() {
        let json = serde_json::to_string(&SessionMode::MiniGame).unwrap();
        assert_eq!(json, r#""Mini Game""#);

        let mode: SessionMode = serde_json::from_str(r#""Speed Run""#).unwrap();
        assert_eq!(mode, SessionMode::Other("Speed Run".to_string()));
        assert_eq!(mode.to_string(), "Speed Run");
    }

    #[test]
    fn outcome_json_uses_camel_case_and_defaults_answers() {
        let json = r#"{
            "topic": "Technology",
            "mode": "Timed",
            "score": 8,
            "total": 10,
            "timeSpentSecs": 95,
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;

        let outcome: SessionOutcome = serde_json::from_str(json).unwrap();

        assert_eq!(outcome.mode, SessionMode::Timed);
        assert_eq!(outcome.time_spent_secs, 95);
        assert!(outcome.answers.is_empty());
    }
}
