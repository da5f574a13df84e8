use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// `Revealed` carries the number of mined neighbors. `Revealed` and `Exploded`
/// are terminal; the only way back out of `Flagged` is to `Unknown`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Unknown,
    Revealed(u8),
    Flagged,
    Exploded,
}

/// Payload-free view of [`Cell`], for callers that only care about the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellStatus {
    Unknown,
    Revealed,
    Flagged,
    Exploded,
}

impl Cell {
    pub const fn status(self) -> CellStatus {
        match self {
            Self::Unknown => CellStatus::Unknown,
            Self::Revealed(_) => CellStatus::Revealed,
            Self::Flagged => CellStatus::Flagged,
            Self::Exploded => CellStatus::Exploded,
        }
    }

    /// Adjacent mine count, only present once the cell is revealed.
    pub const fn revealed_count(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }

    /// Whether the cell still counts against the win condition.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Unknown | Self::Flagged)
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}
