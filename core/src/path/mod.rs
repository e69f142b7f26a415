use std::collections::{BTreeSet, VecDeque};

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::content::PathLevel;
use crate::*;

pub use puzzle::*;

mod puzzle;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCellKind {
    #[default]
    Empty,
    Start,
    End,
    Wall,
    Trap,
}

impl PathCellKind {
    pub const fn from_char(c: char) -> Self {
        match c {
            'S' => Self::Start,
            'E' => Self::End,
            '#' => Self::Wall,
            'T' => Self::Trap,
            _ => Self::Empty,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathCell {
    pub kind: PathCellKind,
    pub is_path: bool,
    pub is_visited: bool,
}

impl PathCell {
    /// Whether the reachability search may step onto this cell.
    pub const fn is_traversable(self) -> bool {
        match self.kind {
            PathCellKind::Wall | PathCellKind::Trap => false,
            PathCellKind::Start | PathCellKind::End => true,
            PathCellKind::Empty => self.is_path,
        }
    }
}

/// Square maze grid parsed from a level descriptor, carrying the trail drawn so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathGrid {
    cells: Array2<PathCell>,
}

impl PathGrid {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let side = rows.len();
        if side == 0 {
            return Err(GameError::MalformedLevel("level has no rows".to_string()));
        }
        if side > usize::from(Coord::MAX) {
            return Err(GameError::MalformedLevel(format!(
                "level has {} rows, at most {} are supported",
                side,
                Coord::MAX
            )));
        }

        let mut cells: Array2<PathCell> = Array2::default([side, side]);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != side {
                return Err(GameError::MalformedLevel(format!(
                    "row {} has {} cells, expected {}",
                    row, width, side
                )));
            }
            for (col, c) in line.chars().enumerate() {
                cells[[row, col]].kind = PathCellKind::from_char(c);
            }
        }

        Ok(Self { cells })
    }

    pub fn from_level(level: &PathLevel) -> Result<Self> {
        Self::parse(&level.rows)
    }

    pub fn side(&self) -> Coord {
        board_size(&self.cells).0
    }

    pub fn get(&self, coords: Coord2) -> Option<PathCell> {
        self.cells
            .contains_coords(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    /// Marks `coords` as part of the drawn trail. Walls, traps and out-of-range cells are ignored.
    pub fn mark_path(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.get(coords) else {
            return false;
        };
        if matches!(cell.kind, PathCellKind::Wall | PathCellKind::Trap) || cell.is_path {
            return false;
        }
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.is_path = true;
        cell.is_visited = true;
        true
    }

    pub fn find(&self, kind: PathCellKind) -> Option<Coord2> {
        self.cells
            .indexed_iter()
            .find(|(_, cell)| cell.kind == kind)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn path_len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_path).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<PathCell>> + '_ {
        self.cells.rows().into_iter().map(|row| row.to_vec())
    }

    /// Whether the drawn trail links start to end through edge-sharing cells.
    ///
    /// Only the start, the end and cells explicitly marked as path are walkable; an open cell the
    /// player skipped breaks the connection even when nothing blocks it.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.find(PathCellKind::Start) else {
            return false;
        };

        let mut visited = BTreeSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(current) = to_visit.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if self[current].kind == PathCellKind::End {
                return true;
            }

            to_visit.extend(
                self.cells
                    .iter_orthogonal(current)
                    .filter(|pos| !visited.contains(pos))
                    .filter(|&pos| self[pos].is_traversable()),
            );
        }

        false
    }
}

impl Index<Coord2> for PathGrid {
    type Output = PathCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> PathGrid {
        PathGrid::parse(rows).unwrap()
    }

    #[test]
    fn parse_maps_descriptor_characters() {
        let grid = grid(&["S#", "TE"]);

        assert_eq!(grid.side(), 2);
        assert_eq!(grid[(0, 0)].kind, PathCellKind::Start);
        assert_eq!(grid[(0, 1)].kind, PathCellKind::Wall);
        assert_eq!(grid[(1, 0)].kind, PathCellKind::Trap);
        assert_eq!(grid[(1, 1)].kind, PathCellKind::End);
        assert_eq!(grid.find(PathCellKind::End), Some((1, 1)));
    }

    #[test]
    fn parse_rejects_ragged_or_empty_levels() {
        assert!(matches!(
            PathGrid::parse(&["S..", ".E"]),
            Err(GameError::MalformedLevel(_))
        ));
        assert!(matches!(
            PathGrid::parse::<&str>(&[]),
            Err(GameError::MalformedLevel(_))
        ));
    }

    #[test]
    fn start_and_end_alone_are_not_connected() {
        let grid = grid(&["S...", "....", "....", "...E"]);

        assert!(!grid.is_connected());
    }

    #[test]
    fn marked_route_connects() {
        let mut grid = grid(&["S...", "....", "....", "...E"]);

        for coords in [(0, 1), (0, 2), (0, 3), (1, 3), (2, 3)] {
            assert!(grid.mark_path(coords));
        }

        assert!(grid.is_connected());
    }

    #[test]
    fn adjacent_start_and_end_connect_without_trail() {
        assert!(grid(&["SE", ".."]).is_connected());
    }

    #[test]
    fn skipped_open_cell_breaks_the_route() {
        let rows = ["S#..", ".#..", "....", "...E"];

        let mut walked = grid(&rows);
        for coords in [(1, 0), (2, 0), (3, 0), (3, 1), (3, 2)] {
            walked.mark_path(coords);
        }
        assert!(walked.is_connected());

        let mut gapped = grid(&rows);
        for coords in [(1, 0), (2, 0), (3, 1), (3, 2)] {
            gapped.mark_path(coords);
        }
        assert!(!gapped.is_connected());
    }

    #[test]
    fn diagonal_steps_do_not_connect() {
        let mut grid = grid(&["S..", "...", "..E"]);

        grid.mark_path((1, 1));

        assert!(!grid.is_connected());
    }

    #[test]
    fn walls_and_traps_are_never_marked() {
        let mut grid = grid(&["S#", "TE"]);

        assert!(!grid.mark_path((0, 1)));
        assert!(!grid.mark_path((1, 0)));
        assert!(!grid.mark_path((5, 5)));
        assert_eq!(grid.path_len(), 0);
        assert!(!grid.is_connected());
    }

    #[test]
    fn missing_start_is_never_connected() {
        let mut grid = grid(&["..", ".E"]);
        grid.mark_path((1, 0));

        assert!(!grid.is_connected());
    }
}
