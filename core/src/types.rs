use ndarray::Array2;

/// Single coordinate axis used for board sides and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Returns the `(rows, cols)` of a board as [`Coord2`].
///
/// Boards are only ever built from `Coord`-sized sides, so the narrowing is lossless.
pub(crate) fn board_size<T>(board: &Array2<T>) -> Coord2 {
    let (rows, cols) = board.dim();
    (rows as Coord, cols as Coord)
}

pub trait NeighborIterExt {
    /// Up to eight surrounding cells, clipped at the board edges.
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;

    /// Up to four edge-sharing cells, clipped at the board edges.
    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter;

    fn contains_coords(&self, index: Coord2) -> bool;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, board_size(self), &DISPLACEMENTS)
    }

    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, board_size(self), &ORTHOGONAL_DISPLACEMENTS)
    }

    fn contains_coords(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = board_size(self);
        row < rows && col < cols
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL_DISPLACEMENTS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            let next_item = apply_delta(self.center, delta, self.bounds);
            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors_and_two_orthogonal() {
        let board: Array2<u8> = Array2::default([3, 3]);

        assert_eq!(board.iter_neighbors((0, 0)).count(), 3);
        assert_eq!(board.iter_orthogonal((0, 0)).count(), 2);
    }

    #[test]
    fn center_has_full_neighborhood() {
        let board: Array2<u8> = Array2::default([3, 3]);

        let mut around: Vec<_> = board.iter_neighbors((1, 1)).collect();
        around.sort();
        assert_eq!(
            around,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ]
        );
        assert_eq!(board.iter_orthogonal((1, 1)).count(), 4);
    }

    #[test]
    fn contains_coords_checks_both_axes() {
        let board: Array2<u8> = Array2::default([2, 3]);

        assert!(board.contains_coords((1, 2)));
        assert!(!board.contains_coords((2, 0)));
        assert!(!board.contains_coords((0, 3)));
    }
}
