use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub use engine::*;
pub use generator::*;

mod engine;
mod generator;

/// Validated shape of a square mine-field.
///
/// Construction rejects boards that could not fit their mines next to a safe first cell, so every
/// config handed to a generator is guaranteed to terminate. Deserialization goes through the
/// same check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    side: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    side: Coord,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.side, raw.mines)
    }
}

impl GameConfig {
    /// The 9x9 board with 10 mines every session uses.
    pub const CLASSIC: Self = Self::new_unchecked(9, 10);

    const fn new_unchecked(side: Coord, mines: CellCount) -> Self {
        Self { side, mines }
    }

    pub fn new(side: Coord, mines: CellCount) -> Result<Self> {
        if side == 0 {
            return Err(GameError::EmptyBoard);
        }
        let cells = mult(side, side);
        if mines >= cells {
            return Err(GameError::TooManyMines { mines, cells });
        }
        Ok(Self::new_unchecked(side, mines))
    }

    pub const fn side(&self) -> Coord {
        self.side
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.side, self.side)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub neighbor_mines: u8,
}

impl Cell {
    /// Revealed cell that does not hide a mine.
    pub const fn is_open_safe(self) -> bool {
        self.is_revealed && !self.is_mine
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Minefield {
    /// Board shown before the first reveal: no mines placed, nothing revealed.
    pub fn empty(side: Coord) -> Self {
        Self {
            cells: Array2::default((side, side).to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mut cells = mine_mask.map(|&is_mine| Cell {
            is_mine,
            ..Cell::default()
        });
        let mut mine_count = 0;
        for ((row, col), &is_mine) in mine_mask.indexed_iter() {
            let coords = (row as Coord, col as Coord);
            if is_mine {
                mine_count += 1;
                continue;
            }
            cells[coords.to_nd_index()].neighbor_mines = mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8;
        }

        Self { cells, mine_count }
    }

    pub fn from_mine_coords(side: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());

        for &coords in mine_coords {
            if !mine_mask.contains_coords(coords) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn side(&self) -> Coord {
        board_size(&self.cells).0
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains_coords(coords)
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    /// Number of revealed cells that are not mines, the quantity the win check compares.
    pub fn revealed_safe_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_open_safe()).count() as CellCount
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        self.cells.rows().into_iter().map(|row| row.to_vec())
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Minefield {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
