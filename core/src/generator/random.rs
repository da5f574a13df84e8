use ndarray::Array2;
use rand::rngs::{SmallRng, ThreadRng};
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::*;

/// Purely random placement: every subset of `mines` cells is equally likely.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator<R> {
    rng: R,
}

impl<R: Rng> RandomMineGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomMineGenerator<SmallRng> {
    /// Deterministic generator, same seed gives the same layout.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl Default for RandomMineGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> MineGenerator for RandomMineGenerator<R> {
    fn generate(mut self, config: GameConfig) -> MineLayout {
        let total_cells = config.total_cells();

        let mines = if config.mines > total_cells {
            log::warn!(
                "Minefield already full, requested {} but only fits {}",
                config.mines,
                total_cells
            );
            total_cells
        } else {
            config.mines
        };

        // optimize for full boards
        if mines == total_cells {
            let mine_mask = Array2::from_elem(config.size.to_nd_index(), true);
            return MineLayout::from_mine_mask(config.size, mine_mask);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let height = usize::from(config.size.1);
        for place in index::sample(&mut self.rng, total_cells as usize, mines as usize) {
            mine_mask[[place / height, place % height]] = true;
        }

        let layout = MineLayout::from_mine_mask(config.size, mine_mask);
        log::debug!(
            "Generated {}x{} minefield with {} mines",
            config.size.0,
            config.size.1,
            layout.mine_count()
        );
        layout
    }
}
