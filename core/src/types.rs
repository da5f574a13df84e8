use alloc::string::String;
use core::str::FromStr;

use crate::{GameError, Result};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Converts board coordinates into an `ndarray` index.
pub trait ToNdIndex {
    fn to_nd_index(self) -> [usize; 2];
}

impl ToNdIndex for Coord2 {
    fn to_nd_index(self) -> [usize; 2] {
        let (x, y) = self;
        [usize::from(x), usize::from(y)]
    }
}

/// Number of cells on a board of `size`; two `u16` sides always fit.
pub const fn cell_area(size: Coord2) -> CellCount {
    size.0 as CellCount * size.1 as CellCount
}

/// Stable `"x,y"` string keys, for front-ends that address cells through maps.
pub trait CoordKey: Sized {
    fn to_key(&self) -> String;
    fn from_key(key: &str) -> Result<Self>;
}

impl CoordKey for Coord2 {
    fn to_key(&self) -> String {
        alloc::format!("{},{}", self.0, self.1)
    }

    fn from_key(key: &str) -> Result<Self> {
        let (x, y) = key.split_once(',').ok_or(GameError::InvalidKey)?;
        let x = Coord::from_str(x.trim()).map_err(|_| GameError::InvalidKey)?;
        let y = Coord::from_str(y.trim()).map_err(|_| GameError::InvalidKey)?;
        Ok((x, y))
    }
}

/// Walks the in-bounds 8-neighborhood of `center`, top row first.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    /// Position in the 3x3 window around `center`, 4 is the center itself.
    slot: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            slot: 0,
        }
    }
}

/// `center + step - 1` on one axis, `None` past either edge.
fn shift(center: Coord, step: u8, bound: Coord) -> Option<Coord> {
    center
        .checked_add(step.into())?
        .checked_sub(1)
        .filter(|&pos| pos < bound)
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while self.slot < 9 {
            let slot = self.slot;
            self.slot += 1;
            if slot == 4 {
                continue;
            }

            let x = shift(self.center.0, slot % 3, self.bounds.0);
            let y = shift(self.center.1, slot / 3, self.bounds.1);
            if let (Some(x), Some(y)) = (x, y) {
                return Some((x, y));
            }
        }
        None
    }
}
