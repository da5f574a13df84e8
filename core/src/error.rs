use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid coordinate key, expected \"x,y\"")]
    InvalidKey,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Saved game is inconsistent with its board")]
    InconsistentState,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
