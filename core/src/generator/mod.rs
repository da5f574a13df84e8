use crate::*;
pub use random::*;

mod random;

/// Source of mine placements for a new round.
pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

impl MineGenerator for MineLayout {
    /// A prepared layout ignores the requested config and is used as-is.
    fn generate(self, config: GameConfig) -> MineLayout {
        if config != self.game_config() {
            log::debug!(
                "Fixed layout {:?} overrides requested config {:?}",
                self.game_config(),
                config
            );
        }
        self
    }
}
