use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield;
}

/// Purely random placement that never puts a mine on the safe cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    safe: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, safe: Coord2) -> Self {
        Self { seed, safe }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        generate_minefield(config, self.safe, &mut rng)
    }
}

/// Places `config.mines()` mines by rejection sampling, skipping the safe cell and cells that
/// already hold a mine, then fills in the neighbor counts.
///
/// A validated [`GameConfig`] always leaves at least one free cell besides `safe`, so the loop
/// terminates.
pub fn generate_minefield<R: Rng>(config: GameConfig, safe: Coord2, rng: &mut R) -> Minefield {
    let side = config.side();
    let mut mines: Array2<bool> = Array2::default((side, side).to_nd_index());
    let mut mines_placed: CellCount = 0;
    let mut attempts: u32 = 0;

    while mines_placed < config.mines() {
        attempts += 1;
        let coords = (rng.random_range(0..side), rng.random_range(0..side));
        if coords == safe || mines[coords.to_nd_index()] {
            continue;
        }
        mines[coords.to_nd_index()] = true;
        mines_placed += 1;
    }

    log::debug!(
        "Generated {}x{} minefield with {} mines in {} draws, safe cell {:?}",
        side,
        side,
        mines_placed,
        attempts,
        safe
    );
    Minefield::from_mine_mask(&mines)
}
