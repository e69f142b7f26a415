use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::*;
use crate::session::SessionOutcome;

/// Valid transitions:
/// - Setup -> Playing (first reveal places the mines)
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Board shown, no mines placed yet
    #[default]
    Setup,
    Playing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_setup(self) -> bool {
        matches!(self, Self::Setup)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesweeperEngine {
    config: GameConfig,
    seed: u64,
    field: Minefield,
    state: EngineState,
    flags_used: CellCount,
    revealed_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl MinesweeperEngine {
    pub const TOPIC: &'static str = "Minesweeper";

    /// New game in [`EngineState::Setup`]; mines are placed by the first reveal using `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            field: Minefield::empty(config.side()),
            state: EngineState::Setup,
            flags_used: 0,
            revealed_count: 0,
            triggered_mine: None,
        }
    }

    /// Game over a board whose mines are already laid out, it starts out playing.
    pub fn from_minefield(field: Minefield) -> Result<Self> {
        let config = GameConfig::new(field.side(), field.mine_count())?;
        Ok(Self {
            config,
            seed: 0,
            revealed_count: field.revealed_safe_count(),
            field,
            state: EngineState::Playing,
            flags_used: 0,
            triggered_mine: None,
        })
    }

    /// Throws the current board away and goes back to setup.
    pub fn restart(&mut self, seed: u64) {
        log::debug!("restarting minesweeper with seed {}", seed);
        *self = Self::new(self.config, seed);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn field(&self) -> &Minefield {
        &self.field
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.field.get(coords)
    }

    pub fn flags_used(&self) -> CellCount {
        self.flags_used
    }

    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.flags_used as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use MarkOutcome::*;

        if !matches!(self.state, EngineState::Playing) {
            return NoChange;
        }
        let Some(cell) = self.field.get(coords) else {
            return NoChange;
        };
        if cell.is_revealed {
            return NoChange;
        }

        if cell.is_flagged {
            self.field.cell_mut(coords).is_flagged = false;
            self.flags_used -= 1;
            Changed
        } else if self.flags_used < self.config.mines() {
            self.field.cell_mut(coords).is_flagged = true;
            self.flags_used += 1;
            Changed
        } else {
            NoChange
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() {
            return NoChange;
        }
        let Some(cell) = self.field.get(coords) else {
            return NoChange;
        };
        if cell.is_revealed || cell.is_flagged {
            return NoChange;
        }

        if self.state.is_setup() {
            let generator = RandomMinefieldGenerator::new(self.seed, coords);
            self.field = generator.generate(self.config);
            self.state = EngineState::Playing;
            log::debug!("first reveal at {:?}, game started", coords);
        }

        if self.field[coords].is_mine {
            self.field.cell_mut(coords).is_revealed = true;
            self.triggered_mine = Some(coords);
            self.reveal_all_mines();
            self.end_game(false);
            return HitMine;
        }

        self.open_cell(coords);
        if self.field[coords].neighbor_mines == 0 {
            self.flood_fill(coords);
        }

        if self.revealed_count == self.field.safe_cell_count() {
            self.end_game(true);
            Won
        } else {
            Revealed
        }
    }

    /// Outcome to hand to the scorer once the game is over.
    pub fn outcome(
        &self,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        match self.state {
            EngineState::Won | EngineState::Lost => Some(SessionOutcome::mini_game(
                Self::TOPIC,
                matches!(self.state, EngineState::Won),
                time_spent_secs,
                timestamp,
            )),
            EngineState::Setup | EngineState::Playing => None,
        }
    }

    fn open_cell(&mut self, coords: Coord2) {
        self.field.cell_mut(coords).is_revealed = true;
        self.revealed_count += 1;
    }

    fn flood_fill(&mut self, origin: Coord2) {
        let mut visited = BTreeSet::new();
        let mut to_visit = VecDeque::from([origin]);

        while let Some(current) = to_visit.pop_front() {
            if !visited.insert(current) {
                continue;
            }

            for pos in self.field.iter_neighbors(current) {
                let neighbor = self.field[pos];
                if neighbor.is_revealed || neighbor.is_flagged || neighbor.is_mine {
                    continue;
                }

                self.open_cell(pos);
                log::trace!(
                    "flood opened cell at {:?}, mine count: {}",
                    pos,
                    neighbor.neighbor_mines
                );

                if neighbor.neighbor_mines == 0 {
                    to_visit.push_back(pos);
                }
            }
        }
    }

    fn reveal_all_mines(&mut self) {
        let mines: Vec<_> = self.field.iter_mines().collect();
        for coords in mines {
            self.field.cell_mut(coords).is_revealed = true;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::debug!("minesweeper ended: {:?}", self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(side: Coord, mines: &[Coord2]) -> MinesweeperEngine {
        MinesweeperEngine::from_minefield(Minefield::from_mine_coords(side, mines).unwrap())
            .unwrap()
    }

    #[test]
    fn reveal_hits_mine_and_shows_every_mine() {
        let mut engine = engine(3, &[(0, 0), (2, 2)]);

        let outcome = engine.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert!(engine.cell_at((2, 2)).unwrap().is_revealed);
        assert!(!engine.cell_at((1, 1)).unwrap().is_revealed);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut engine = engine(3, &[(2, 2)]);

        let outcome = engine.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(engine.cell_at((0, 0)).unwrap().is_revealed);
        assert_eq!(engine.cell_at((1, 1)).unwrap().neighbor_mines, 1);
        assert!(engine.cell_at((1, 1)).unwrap().is_revealed);
        assert!(!engine.cell_at((2, 2)).unwrap().is_revealed);
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        let mut engine = engine(4, &[(3, 3)]);

        engine.reveal((0, 0));

        assert!(engine.cell_at((2, 2)).unwrap().is_revealed);
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.field().revealed_safe_count(), 15);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut engine = engine(3, &[(2, 2)]);

        assert_eq!(engine.toggle_flag((0, 2)), MarkOutcome::Changed);
        let outcome = engine.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::Revealed);
        let flagged = engine.cell_at((0, 2)).unwrap();
        assert!(flagged.is_flagged);
        assert!(!flagged.is_revealed);
        assert_eq!(engine.field().revealed_safe_count(), 7);
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn reveal_is_noop_on_revealed_flagged_or_out_of_range() {
        let mut engine = engine(3, &[(0, 0)]);

        assert_eq!(engine.reveal((1, 1)), RevealOutcome::Revealed);
        assert_eq!(engine.reveal((1, 1)), RevealOutcome::NoChange);
        engine.toggle_flag((0, 1));
        assert_eq!(engine.reveal((0, 1)), RevealOutcome::NoChange);
        assert_eq!(engine.reveal((3, 0)), RevealOutcome::NoChange);
        assert_eq!(engine.reveal((0, 9)), RevealOutcome::NoChange);
    }

    #[test]
    fn flags_capped_at_mine_count() {
        let mut engine = engine(2, &[(0, 0)]);

        assert_eq!(engine.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert_eq!(engine.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert_eq!(engine.mines_left(), 0);
        assert_eq!(engine.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert_eq!(engine.flags_used(), 0);
        assert_eq!(engine.toggle_flag((1, 1)), MarkOutcome::Changed);
    }

    #[test]
    fn flagging_ignored_before_first_reveal_and_on_revealed_cells() {
        let mut engine = MinesweeperEngine::new(GameConfig::CLASSIC, 11);

        assert_eq!(engine.toggle_flag((0, 0)), MarkOutcome::NoChange);

        engine.reveal((4, 4));
        assert_eq!(engine.toggle_flag((4, 4)), MarkOutcome::NoChange);
    }

    #[test]
    fn first_reveal_is_always_safe() {
        for seed in 0..32 {
            let mut engine = MinesweeperEngine::new(GameConfig::CLASSIC, seed);
            assert!(engine.state().is_setup());

            let outcome = engine.reveal((0, 0));

            assert_ne!(outcome, RevealOutcome::HitMine);
            assert_eq!(engine.field().mine_count(), 10);
            assert!(!engine.cell_at((0, 0)).unwrap().is_mine);
        }
    }

    #[test]
    fn classic_board_wins_exactly_at_71_revealed_cells() {
        let mut engine = MinesweeperEngine::new(GameConfig::CLASSIC, 5);
        engine.reveal((4, 4));

        for row in 0..9 {
            for col in 0..9 {
                let cell = engine.cell_at((row, col)).unwrap();
                if cell.is_mine || cell.is_revealed {
                    continue;
                }
                assert_eq!(engine.state(), EngineState::Playing);
                assert!(engine.field().revealed_safe_count() < 71);
                engine.reveal((row, col));
            }
        }

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.field().revealed_safe_count(), 71);
    }

    #[test]
    fn finished_game_ignores_moves_and_yields_outcome() {
        let mut engine = engine(2, &[(0, 0)]);
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert!(engine.outcome(5, now).is_none());
        engine.reveal((0, 0));

        assert_eq!(engine.reveal((1, 1)), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((1, 1)), MarkOutcome::NoChange);
        let outcome = engine.outcome(5, now).unwrap();
        assert_eq!(outcome.topic, "Minesweeper");
        assert_eq!((outcome.score, outcome.total), (0, 10));
    }

    #[test]
    fn restored_engine_with_too_many_mines_is_rejected() {
        let engine = MinesweeperEngine::new(GameConfig::new(2, 3).unwrap(), 1);
        let mut saved = serde_json::to_value(&engine).unwrap();

        let restored: MinesweeperEngine = serde_json::from_value(saved.clone()).unwrap();
        assert_eq!(restored, engine);

        saved["config"]["mines"] = 4.into();
        assert!(serde_json::from_value::<MinesweeperEngine>(saved).is_err());
    }

    #[test]
    fn restart_returns_to_setup() {
        let mut engine = MinesweeperEngine::new(GameConfig::CLASSIC, 1);
        engine.reveal((0, 0));

        engine.restart(2);

        assert!(engine.state().is_setup());
        assert_eq!(engine.config(), GameConfig::CLASSIC);
        assert_eq!(engine.flags_used(), 0);
        assert_eq!(engine.field().revealed_safe_count(), 0);
    }
}
