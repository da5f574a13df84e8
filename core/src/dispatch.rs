use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// A single player intent, as a front-end would queue it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    ResetGame(GameConfig),
    RevealLocation(Coord2),
    RevealNeighbors(Coord2),
    FlagLocation(Coord2),
}

/// Applies `action` to `prev`.
///
/// A reset always starts a new round from `rng`; every other action is
/// ignored once the game has finished.
pub fn reduce<R: Rng>(prev: &Game, action: &Action, rng: &mut R) -> Game {
    match *action {
        Action::ResetGame(config) => {
            Game::with_generator(config, RandomMineGenerator::new(rng))
        }
        _ if prev.is_finished() => {
            log::debug!("Ignoring {:?}, game already {:?}", action, prev.status());
            prev.clone()
        }
        Action::RevealLocation(coords) => prev.reveal(coords),
        Action::RevealNeighbors(coords) => prev.reveal_neighbors(coords),
        Action::FlagLocation(coords) => prev.flag(coords),
    }
}

/// Owns the current game for a single stream of actions.
#[derive(Clone, Debug)]
pub struct Session<R> {
    game: Game,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Starts from [`Game::default`] until the first reset.
    pub fn new(rng: R) -> Self {
        Self::with_game(Game::default(), rng)
    }

    pub fn with_game(game: Game, rng: R) -> Self {
        Self { game, rng }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    pub fn dispatch(&mut self, action: &Action) -> &Game {
        self.game = reduce(&self.game, action, &mut self.rng);
        &self.game
    }
}

impl Session<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}
