use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::*;
use crate::session::SessionOutcome;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathState {
    #[default]
    Setup,
    Playing,
    Won,
    Lost,
}

impl PathState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    NoChange,
    Drawn,
    /// Stepped on a trap, the level is lost
    Trapped,
    /// Reached the end through a connected trail
    Won,
    /// Reached the end without a trail back to the start
    Disconnected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ParsedLevel {
    name: String,
    grid: PathGrid,
}

/// Path-drawing game over a fixed sequence of levels.
///
/// A stroke starts with [`PathPuzzle::begin_stroke`] and continues through
/// [`PathPuzzle::extend_stroke`] while the pointer is held down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPuzzle {
    levels: Vec<ParsedLevel>,
    current_level: usize,
    grid: PathGrid,
    state: PathState,
    drawing: bool,
}

impl PathPuzzle {
    pub const TOPIC: &'static str = "Path Puzzle";

    /// Parses every level up front, so a bad descriptor is reported before play starts.
    pub fn new(levels: &[PathLevel]) -> Result<Self> {
        let levels = levels
            .iter()
            .map(|level| {
                Ok(ParsedLevel {
                    name: level.name.clone(),
                    grid: PathGrid::from_level(level)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let grid = levels.first().ok_or(GameError::NoContent)?.grid.clone();

        Ok(Self {
            levels,
            current_level: 0,
            grid,
            state: PathState::Setup,
            drawing: false,
        })
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn grid(&self) -> &PathGrid {
        &self.grid
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_name(&self) -> &str {
        &self.levels[self.current_level].name
    }

    pub fn is_last_level(&self) -> bool {
        self.current_level + 1 >= self.levels.len()
    }

    /// Loads a clean copy of the current level and starts playing it.
    pub fn start_level(&mut self) {
        self.grid = self.levels[self.current_level].grid.clone();
        self.state = PathState::Playing;
        self.drawing = false;
        log::debug!("path puzzle level {} started", self.level_name());
    }

    pub fn reset_level(&mut self) {
        self.start_level();
    }

    /// Moves on to the following level. Returns `false` once every level has been played.
    pub fn next_level(&mut self) -> bool {
        if self.is_last_level() {
            return false;
        }
        self.current_level += 1;
        self.start_level();
        true
    }

    pub fn begin_stroke(&mut self, coords: Coord2) -> StepOutcome {
        if !self.accepts_step(coords) {
            return StepOutcome::NoChange;
        }
        self.drawing = true;
        self.step(coords)
    }

    pub fn extend_stroke(&mut self, coords: Coord2) -> StepOutcome {
        if !self.drawing || !self.accepts_step(coords) {
            return StepOutcome::NoChange;
        }
        self.step(coords)
    }

    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    pub fn outcome(
        &self,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        match self.state {
            PathState::Won | PathState::Lost => Some(SessionOutcome::mini_game(
                Self::TOPIC,
                matches!(self.state, PathState::Won),
                time_spent_secs,
                timestamp,
            )),
            PathState::Setup | PathState::Playing => None,
        }
    }

    fn accepts_step(&self, coords: Coord2) -> bool {
        matches!(self.state, PathState::Playing)
            && self
                .grid
                .get(coords)
                .is_some_and(|cell| cell.kind != PathCellKind::Wall)
    }

    fn step(&mut self, coords: Coord2) -> StepOutcome {
        match self.grid[coords].kind {
            PathCellKind::Trap => {
                self.finish(PathState::Lost);
                StepOutcome::Trapped
            }
            PathCellKind::End => {
                if self.grid.is_connected() {
                    self.finish(PathState::Won);
                    StepOutcome::Won
                } else {
                    self.finish(PathState::Lost);
                    StepOutcome::Disconnected
                }
            }
            PathCellKind::Empty | PathCellKind::Start | PathCellKind::Wall => {
                if self.grid.mark_path(coords) {
                    StepOutcome::Drawn
                } else {
                    StepOutcome::NoChange
                }
            }
        }
    }

    fn finish(&mut self, state: PathState) {
        self.state = state;
        self.drawing = false;
        log::debug!("path puzzle level {} ended: {:?}", self.level_name(), state);
    }
}
