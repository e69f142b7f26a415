use brainblast_core::{Repository, SessionClock, SessionOutcome};
use chrono::{DateTime, Utc};

use crate::storage::LocalStore;
use crate::utils::utc_now;

pub use memory::PictureMemoryGame;
pub use minesweeper::MinesweeperGame;
pub use path::PathPuzzleGame;
pub use quiz::QuizGame;
pub use unscramble::UnscrambleGame;

mod memory;
mod minesweeper;
mod path;
mod quiz;
mod unscramble;

/// Times one session and saves its outcome exactly once.
#[derive(Clone, Debug, Default)]
struct SessionRecorder {
    clock: SessionClock,
    recorded: bool,
}

impl SessionRecorder {
    fn start(&mut self) {
        self.clock.start(utc_now());
        self.recorded = false;
    }

    fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs(utc_now())
    }

    /// Saves the outcome if the game has one and it wasn't saved yet.
    fn finish(&mut self, outcome: impl FnOnce(u64, DateTime<Utc>) -> Option<SessionOutcome>) {
        if self.recorded {
            return;
        }
        let now = utc_now();
        let Some(outcome) = outcome(self.clock.elapsed_secs(now), now) else {
            return;
        };
        self.clock.stop(now);
        self.recorded = true;
        Repository::new(LocalStore).record_outcome(outcome);
    }
}
