use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// In-bounds neighbors of one cell, at most eight.
pub type Neighbors = SmallVec<[Coord2; 8]>;

/// Immutable half of a round: where the mines are and who neighbors whom.
///
/// Built once per game and shared by every state derived from it.
///
/// Only the size and mine mask are serialized; neighbors and the mine count are
/// rebuilt on load, and a mask that does not match the size is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct MineLayout {
    size: Coord2,
    mine_mask: Array2<bool>,
    #[serde(skip_serializing)]
    neighbors: Array2<Neighbors>,
    #[serde(skip_serializing)]
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct RawLayout {
    size: Coord2,
    mine_mask: Array2<bool>,
}

impl TryFrom<RawLayout> for MineLayout {
    type Error = GameError;

    fn try_from(raw: RawLayout) -> Result<Self> {
        if raw.mine_mask.dim() != (raw.size.0.into(), raw.size.1.into()) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self::from_mine_mask(raw.size, raw.mine_mask))
    }
}

impl MineLayout {
    /// Builds a layout from a mask already sized to `size`.
    pub(crate) fn from_mine_mask(size: Coord2, mine_mask: Array2<bool>) -> Self {
        debug_assert_eq!(mine_mask.dim(), (size.0.into(), size.1.into()));

        let neighbors = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            // both fit: the mask was allocated from `size`
            let coords = (x as Coord, y as Coord);
            NeighborIter::new(coords, size).collect()
        });
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;

        Self {
            size,
            mine_mask,
            neighbors,
            mine_count,
        }
    }

    /// Places mines at exactly the given coordinates; duplicates collapse.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(size, mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.mine_count)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        cell_area(self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// Out-of-range coordinates never hold a mine.
    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.contains(coords) && self.mine_mask[coords.to_nd_index()]
    }

    /// Precomputed neighbors of `coords`, empty when out of range.
    pub fn neighbors(&self, coords: Coord2) -> &[Coord2] {
        if self.contains(coords) {
            &self.neighbors[coords.to_nd_index()]
        } else {
            &[]
        }
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbors
        self.neighbors(coords)
            .iter()
            .filter(|&&pos| self.mine_mask[pos.to_nd_index()])
            .count() as u8
    }

    /// All mined coordinates, column by column.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }
}
