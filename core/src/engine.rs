use alloc::collections::VecDeque;
use alloc::sync::Arc;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Started -> Won
/// - Started -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Started,
    Won,
    Lost,
}

impl GameStatus {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One immutable snapshot of a round.
///
/// Every move borrows the current snapshot and returns a new one; the old value
/// is never touched, so callers may keep as many snapshots as they like. Cell
/// storage is copy-on-write, a move that changes nothing hands back a value
/// sharing all storage with its input.
///
/// The permissive moves ([`reveal`](Self::reveal), [`reveal_neighbors`](Self::reveal_neighbors),
/// [`flag`](Self::flag)) treat out-of-range coordinates and finished games as
/// no-ops. The `try_` variants report those as [`GameError`] instead.
///
/// A deserialized game is checked against its own layout: the cell grid must
/// match the board size and every cell, counter and status must agree with the
/// mines, otherwise loading fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGame")]
pub struct Game {
    layout: Arc<MineLayout>,
    cells: Arc<Array2<Cell>>,
    status: GameStatus,
    move_count: u32,
    flagged_count: CellCount,
    /// Cells still `Unknown` or `Flagged`.
    #[serde(skip_serializing)]
    hidden_count: CellCount,
}

#[derive(Deserialize)]
struct RawGame {
    layout: MineLayout,
    cells: Array2<Cell>,
    status: GameStatus,
    move_count: u32,
    flagged_count: CellCount,
}

impl TryFrom<RawGame> for Game {
    type Error = GameError;

    fn try_from(raw: RawGame) -> Result<Self> {
        let layout = raw.layout;
        let size = layout.size();
        if raw.cells.dim() != (size.0.into(), size.1.into()) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut flagged = 0;
        let mut hidden = 0;
        let mut exploded = false;
        for ((x, y), &cell) in raw.cells.indexed_iter() {
            let coords = (x as Coord, y as Coord);
            let consistent = match cell {
                Cell::Unknown => true,
                Cell::Flagged => {
                    flagged += 1;
                    true
                }
                Cell::Revealed(count) => {
                    !layout.contains_mine(coords) && count == layout.adjacent_mine_count(coords)
                }
                Cell::Exploded => {
                    exploded = true;
                    layout.contains_mine(coords)
                }
            };
            if !consistent {
                log::debug!("Saved cell {:?} at {:?} disagrees with the layout", cell, coords);
                return Err(GameError::InconsistentState);
            }
            if cell.is_hidden() {
                hidden += 1;
            }
        }

        let status_matches = match raw.status {
            GameStatus::Started => !exploded,
            GameStatus::Won => !exploded && hidden == layout.mine_count(),
            GameStatus::Lost => exploded,
        };
        if flagged != raw.flagged_count || !status_matches {
            return Err(GameError::InconsistentState);
        }

        Ok(Self {
            layout: Arc::new(layout),
            cells: Arc::new(raw.cells),
            status: raw.status,
            move_count: raw.move_count,
            flagged_count: raw.flagged_count,
            hidden_count: hidden,
        })
    }
}

impl Game {
    /// New round with randomly placed mines.
    pub fn create(config: GameConfig) -> Self {
        Self::with_generator(config, RandomMineGenerator::default())
    }

    pub fn with_generator<G: MineGenerator>(config: GameConfig, generator: G) -> Self {
        Self::from_layout(generator.generate(config))
    }

    pub fn from_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        let hidden_count = layout.total_cells();
        log::debug!(
            "New {}x{} game with {} mines",
            size.0,
            size.1,
            layout.mine_count()
        );
        Self {
            layout: Arc::new(layout),
            cells: Arc::new(Array2::default(size.to_nd_index())),
            status: GameStatus::Started,
            move_count: 0,
            flagged_count: 0,
            hidden_count,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.layout.game_config()
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Reveal-class actions that changed the board.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> i64 {
        i64::from(self.layout.mine_count()) - i64::from(self.flagged_count)
    }

    /// # Panics
    ///
    /// When `coords` is outside the board, use [`get`](Self::get) for a total lookup.
    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.layout.contains_mine(coords)
    }

    pub fn neighbors(&self, coords: Coord2) -> &[Coord2] {
        self.layout.neighbors(coords)
    }

    /// Every cell with its coordinates, column by column.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((x, y), &cell)| ((x as Coord, y as Coord), cell))
    }

    /// Whether both snapshots still point at the same cell storage.
    pub fn shares_cells_with(&self, other: &Game) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// True when the only cells left unknown or flagged are the mines.
    pub fn is_victorious(&self) -> bool {
        self.count_hidden() == self.layout.mine_count()
    }

    /// Whether flagging `coords` would chord: a revealed number with exactly
    /// that many flagged neighbors and something left to open.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.is_finished() {
            return false;
        }

        match self.get(coords) {
            Some(Cell::Revealed(count)) => {
                count == self.count_flagged_neighbors(coords)
                    && self.neighbors(coords).iter().any(|&pos| self.cell_at(pos).is_unknown())
            }
            _ => false,
        }
    }

    /// Reveal a cell, flood-filling from it when it has no mined neighbors.
    pub fn reveal(&self, coords: Coord2) -> Game {
        self.try_reveal(coords)
            .map(|(game, _)| game)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn try_reveal(&self, coords: Coord2) -> Result<(Game, RevealOutcome)> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_started()?;

        if !self.cell_at(coords).is_unknown() {
            return Ok((self.clone(), RevealOutcome::NoChange));
        }

        let mut next = self.clone();
        let outcome = next.test_locations(&[coords]);
        next.move_count += 1;
        Ok((next, outcome))
    }

    /// Chord: reveal every unknown neighbor of a revealed cell, no flag check.
    pub fn reveal_neighbors(&self, coords: Coord2) -> Game {
        self.try_reveal_neighbors(coords)
            .map(|(game, _)| game)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn try_reveal_neighbors(&self, coords: Coord2) -> Result<(Game, RevealOutcome)> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_started()?;

        Ok(match self.cell_at(coords) {
            Cell::Revealed(_) => self.chord(coords),
            _ => (self.clone(), RevealOutcome::NoChange),
        })
    }

    /// Toggle a flag, or chord when used on a satisfied number.
    pub fn flag(&self, coords: Coord2) -> Game {
        self.try_flag(coords)
            .map(|(game, _)| game)
            .unwrap_or_else(|_| self.clone())
    }

    pub fn try_flag(&self, coords: Coord2) -> Result<(Game, FlagOutcome)> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_started()?;

        Ok(match self.cell_at(coords) {
            Cell::Unknown => {
                let mut next = self.clone();
                next.set_cell(coords, Cell::Flagged);
                next.flagged_count += 1;
                (next, FlagOutcome::Flagged)
            }
            Cell::Flagged => {
                let mut next = self.clone();
                next.set_cell(coords, Cell::Unknown);
                next.flagged_count -= 1;
                (next, FlagOutcome::Unflagged)
            }
            Cell::Revealed(count) if count == self.count_flagged_neighbors(coords) => {
                match self.chord(coords) {
                    (game, RevealOutcome::NoChange) => (game, FlagOutcome::NoChange),
                    (game, outcome) => (game, FlagOutcome::Chorded(outcome)),
                }
            }
            Cell::Revealed(_) | Cell::Exploded => (self.clone(), FlagOutcome::NoChange),
        })
    }

    fn chord(&self, coords: Coord2) -> (Game, RevealOutcome) {
        let unknown: SmallVec<[Coord2; 8]> = self
            .neighbors(coords)
            .iter()
            .copied()
            .filter(|&pos| self.cell_at(pos).is_unknown())
            .collect();

        if unknown.is_empty() {
            return (self.clone(), RevealOutcome::NoChange);
        }

        log::debug!("Chord at {:?} over {:?}", coords, unknown);
        let mut next = self.clone();
        let outcome = next.test_locations(&unknown);
        next.move_count += 1;
        (next, outcome)
    }

    /// Opens every unknown cell in `starts`, flood-filling through zeros.
    ///
    /// Every start is tested even after a mine goes off, and a lost game is
    /// never promoted to won. Only ever called on a fresh clone, so the
    /// copy-on-write storage is detached from the caller's snapshot.
    fn test_locations(&mut self, starts: &[Coord2]) -> RevealOutcome {
        let layout = Arc::clone(&self.layout);
        let mut visited = HashSet::new();
        let mut to_visit: VecDeque<Coord2> = starts.iter().copied().collect();
        let mut outcome = RevealOutcome::NoChange;

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // skip flagged or already opened cells
            if !self.cell_at(coords).is_unknown() {
                log::trace!("Skipping cell at {:?}", coords);
                continue;
            }

            if layout.contains_mine(coords) {
                self.set_cell(coords, Cell::Exploded);
                self.hidden_count -= 1;
                self.status = GameStatus::Lost;
                log::debug!("Mine hit at {:?}, game lost", coords);
                outcome = outcome | RevealOutcome::HitMine;
                continue;
            }

            let count = layout.adjacent_mine_count(coords);
            self.set_cell(coords, Cell::Revealed(count));
            self.hidden_count -= 1;
            outcome = outcome | RevealOutcome::Revealed;
            log::trace!("Revealed cell at {:?}, mine count: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    layout
                        .neighbors(coords)
                        .iter()
                        .copied()
                        .filter(|pos| !visited.contains(pos))
                        .filter(|&pos| self.cell_at(pos).is_unknown()),
                );
            }
        }

        debug_assert_eq!(self.hidden_count, self.count_hidden());
        if self.status == GameStatus::Lost {
            outcome
        } else if outcome.has_update() && self.hidden_count == layout.mine_count() {
            self.status = GameStatus::Won;
            log::debug!("All safe cells revealed, game won");
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    fn set_cell(&mut self, coords: Coord2, cell: Cell) {
        Arc::make_mut(&mut self.cells)[coords.to_nd_index()] = cell;
    }

    fn count_hidden(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_hidden()).count() as CellCount
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .iter()
            .filter(|&&pos| self.cell_at(pos) == Cell::Flagged)
            .count() as u8
    }

    fn check_started(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl Default for Game {
    /// Explicit starting state for a dispatcher, a single mine-free cell.
    fn default() -> Self {
        let config = GameConfig::default();
        let mine_mask = Array2::default(config.size.to_nd_index());
        Self::from_layout(MineLayout::from_mine_mask(config.size, mine_mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn game(size: Coord2, mines: &[Coord2]) -> Game {
        Game::from_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn create_starts_with_every_cell_unknown() {
        let config = GameConfig::new((8, 5), 12);
        let game = Game::with_generator(config, RandomMineGenerator::from_seed(5));

        assert_eq!(game.status(), GameStatus::Started);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.flagged_count(), 0);
        assert_eq!(game.cells().count(), 40);
        assert!(game.cells().all(|(_, cell)| cell == Cell::Unknown));
        assert_eq!(game.total_mines(), 12);
        assert_eq!(game.layout().mines().count(), 12);
    }

    #[test]
    fn create_uses_fresh_randomness() {
        let config = GameConfig::new((30, 30), 100);
        let layouts: Vec<_> = (0..4).map(|_| Game::create(config).layout().clone()).collect();

        assert!(layouts.iter().all(|layout| layout.mine_count() == 100));
        assert!(layouts.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn reveal_hits_mine_and_only_changes_that_cell() {
        let before = game((3, 3), &[(1, 1)]);

        let (after, outcome) = before.try_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(after.status(), GameStatus::Lost);
        assert_eq!(after.cell_at((1, 1)), Cell::Exploded);
        for ((coords, old), (_, new)) in before.cells().zip(after.cells()) {
            if coords != (1, 1) {
                assert_eq!(old, new, "cell {:?} changed", coords);
            }
        }
    }

    #[test]
    fn reveal_flood_fills_mine_free_board() {
        let game = game((3, 3), &[]).reveal((0, 0));

        assert_eq!(game.status(), GameStatus::Won);
        assert!(game.cells().all(|(_, cell)| cell == Cell::Revealed(0)));
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn reveal_flood_fill_stops_at_numbers() {
        let game = game((3, 3), &[(2, 2)]);

        let (game, outcome) = game.try_reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((0, 0)), Cell::Revealed(0));
        assert_eq!(game.cell_at((1, 1)), Cell::Revealed(1));
        assert_eq!(game.cell_at((2, 2)), Cell::Unknown);
    }

    #[test]
    fn reveal_flood_fill_skips_flags() {
        let game = game((5, 1), &[(4, 0)]).flag((1, 0)).reveal((0, 0));

        assert_eq!(game.cell_at((0, 0)), Cell::Revealed(0));
        assert_eq!(game.cell_at((1, 0)), Cell::Flagged);
        assert_eq!(game.cell_at((2, 0)), Cell::Unknown);
        assert_eq!(game.status(), GameStatus::Started);
    }

    #[test]
    fn reveal_single_cell_board() {
        let game = game((1, 1), &[]).reveal((0, 0));

        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.cell_at((0, 0)).revealed_count(), Some(0));
    }

    #[test]
    fn reveal_next_to_last_mine_wins() {
        let game = game((2, 1), &[(1, 0)]);

        let (game, outcome) = game.try_reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((0, 0)), Cell::Revealed(1));
        assert_eq!(game.cell_at((1, 0)), Cell::Unknown);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn reveal_counts_one_move_per_action() {
        let wall: Vec<_> = (0..5).map(|y| (2, y)).collect();
        let game = game((5, 5), &wall);

        let game = game.reveal((0, 0));
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.status(), GameStatus::Started);
        assert_eq!(game.cells().filter(|(_, cell)| !cell.is_hidden()).count(), 10);

        let game = game.flag((4, 4));
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.flagged_count(), 1);
    }

    #[test]
    fn reveal_on_non_unknown_cells_is_no_op() {
        let game = game((3, 1), &[(2, 0)]).reveal((1, 0)).flag((2, 0));
        assert_eq!(game.status(), GameStatus::Started);

        let revealed_again = game.reveal((1, 0));
        assert_eq!(revealed_again, game);
        assert!(revealed_again.shares_cells_with(&game));

        let flagged_revealed = game.reveal((2, 0));
        assert_eq!(flagged_revealed.cell_at((2, 0)), Cell::Flagged);
        assert_eq!(flagged_revealed.move_count(), game.move_count());
    }

    #[test]
    fn out_of_range_coordinates_are_no_ops() {
        let game = game((2, 2), &[(0, 0)]);

        assert!(game.reveal((2, 0)).shares_cells_with(&game));
        assert!(game.flag((0, 9)).shares_cells_with(&game));
        assert!(game.reveal_neighbors((7, 7)).shares_cells_with(&game));
        assert_eq!(game.get((2, 0)), None);
        assert_eq!(game.try_reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.try_flag((0, 2)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn previous_snapshots_are_never_mutated() {
        let start = game((4, 4), &[(3, 3)]);
        let flagged = start.flag((3, 3));
        let opened = flagged.reveal((0, 0));

        assert!(start.cells().all(|(_, cell)| cell == Cell::Unknown));
        assert_eq!(flagged.cell_at((0, 0)), Cell::Unknown);
        assert_eq!(flagged.status(), GameStatus::Started);
        assert_eq!(opened.cell_at((0, 0)), Cell::Revealed(0));
        assert!(!opened.shares_cells_with(&flagged));
    }

    #[test]
    fn flag_round_trip_restores_state() {
        let game = game((3, 3), &[(1, 1)]);

        let (flagged, outcome) = game.try_flag((2, 2)).unwrap();
        assert_eq!(outcome, FlagOutcome::Flagged);
        assert_eq!(flagged.flagged_count(), 1);
        assert_eq!(flagged.cell_at((2, 2)), Cell::Flagged);

        let (unflagged, outcome) = flagged.try_flag((2, 2)).unwrap();
        assert_eq!(outcome, FlagOutcome::Unflagged);
        assert_eq!(unflagged, game);
    }

    #[test]
    fn mines_left_goes_negative_when_over_flagged() {
        let game = game((3, 1), &[(0, 0)]).flag((1, 0)).flag((2, 0));

        assert_eq!(game.mines_left(), -1);
    }

    #[test]
    fn reveal_neighbors_chords_without_checking_flags() {
        let game = game((3, 3), &[(0, 1), (2, 1)]).reveal((1, 1));

        let (game, outcome) = game.try_reveal_neighbors((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.cell_at((0, 0)), Cell::Revealed(1));
        assert_eq!(game.cell_at((1, 0)), Cell::Revealed(2));
        assert_eq!(game.cell_at((2, 0)), Cell::Revealed(1));
        assert_eq!(game.cell_at((0, 1)), Cell::Exploded);
        assert_eq!(game.cell_at((2, 1)), Cell::Exploded);
        assert_eq!(game.cell_at((0, 2)), Cell::Revealed(1));
        assert_eq!(game.cell_at((1, 2)), Cell::Revealed(2));
        assert_eq!(game.cell_at((2, 2)), Cell::Revealed(1));
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn reveal_neighbors_keeps_flooding_after_a_mine() {
        let game = game((5, 3), &[(0, 0)]).reveal((1, 1));
        assert_eq!(game.cell_at((1, 1)), Cell::Revealed(1));
        assert_eq!(game.cell_at((4, 2)), Cell::Unknown);

        let (game, outcome) = game.try_reveal_neighbors((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.cell_at((0, 0)), Cell::Exploded);
        assert_eq!(game.cell_at((2, 1)), Cell::Revealed(0));
        assert_eq!(game.cell_at((4, 2)), Cell::Revealed(0));
    }

    #[test]
    fn reveal_neighbors_around_flagged_mines_wins() {
        let game = game((3, 3), &[(0, 1), (2, 1)])
            .reveal((1, 1))
            .flag((0, 1))
            .flag((2, 1));

        let (game, outcome) = game.try_reveal_neighbors((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.cell_at((1, 0)), Cell::Revealed(2));
        assert_eq!(game.cell_at((1, 2)), Cell::Revealed(2));
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn reveal_neighbors_requires_revealed_cell() {
        let game = game((3, 3), &[(0, 0)]).flag((1, 1));

        let (same, outcome) = game.try_reveal_neighbors((1, 1)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(same.shares_cells_with(&game));

        let (same, outcome) = game.try_reveal_neighbors((2, 2)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(same.move_count(), 0);
    }

    #[test]
    fn flag_on_number_chords_only_when_flags_match() {
        let game = game((3, 3), &[(0, 1), (2, 1)]).reveal((1, 1)).flag((0, 1));
        assert!(!game.can_chord_at((1, 1)));

        let (same, outcome) = game.try_flag((1, 1)).unwrap();
        assert_eq!(outcome, FlagOutcome::NoChange);
        assert!(same.shares_cells_with(&game));

        let game = game.flag((2, 1));
        assert!(game.can_chord_at((1, 1)));

        let (game, outcome) = game.try_flag((1, 1)).unwrap();
        assert_eq!(outcome, FlagOutcome::Chorded(RevealOutcome::Won));
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.flagged_count(), 2);
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn chord_with_nothing_left_to_open_is_no_op() {
        let open = game((3, 1), &[]).flag((2, 0)).reveal((0, 0));
        assert_eq!(open.status(), GameStatus::Started);
        assert_eq!(open.cell_at((1, 0)), Cell::Revealed(0));
        let (same, outcome) = open.try_flag((0, 0)).unwrap();
        assert_eq!(outcome, FlagOutcome::NoChange);
        assert_eq!(same.move_count(), open.move_count());
    }

    #[test]
    fn finished_games_reject_every_move() {
        let lost = game((2, 2), &[(0, 0)]).reveal((0, 0));
        assert_eq!(lost.status(), GameStatus::Lost);

        for coords in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(lost.reveal(coords), lost);
            assert_eq!(lost.flag(coords), lost);
            assert_eq!(lost.reveal_neighbors(coords), lost);
            assert_eq!(lost.try_reveal(coords), Err(GameError::AlreadyEnded));
            assert_eq!(lost.try_flag(coords), Err(GameError::AlreadyEnded));
            assert_eq!(lost.try_reveal_neighbors(coords), Err(GameError::AlreadyEnded));
        }

        let won = game((2, 1), &[(1, 0)]).reveal((0, 0));
        assert_eq!(won.status(), GameStatus::Won);
        assert_eq!(won.flag((1, 0)), won);
        assert_eq!(won.reveal((1, 0)), won);
        assert!(!won.can_chord_at((0, 0)));
    }

    #[test]
    fn is_victorious_counts_unknown_and_flagged_cells() {
        let game = game((3, 1), &[(2, 0)]);
        assert!(!game.is_victorious());

        let blocked = game.flag((1, 0)).reveal((0, 0));
        assert_eq!(blocked.cell_at((0, 0)), Cell::Revealed(0));
        assert!(!blocked.is_victorious());
        assert_eq!(blocked.status(), GameStatus::Started);

        let cleared = blocked.flag((1, 0)).reveal((1, 0));
        assert!(cleared.is_victorious());
        assert_eq!(cleared.status(), GameStatus::Won);
    }

    #[test]
    fn default_game_is_single_safe_cell() {
        let game = Game::default();

        assert_eq!(game.config(), GameConfig::default());
        assert_eq!(game.status(), GameStatus::Started);
        assert_eq!(game.reveal((0, 0)).status(), GameStatus::Won);
    }

    #[test]
    fn game_round_trips_through_json() {
        let game = game((4, 3), &[(3, 2), (0, 2)]).reveal((0, 0)).flag((3, 2));

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, game);
    }

    #[test]
    fn game_with_cells_of_another_size_fails_to_load() {
        let mut json = serde_json::to_value(game((3, 3), &[(1, 1)])).unwrap();
        json["cells"] = serde_json::to_value(game((1, 1), &[]).reveal((0, 0)).cells).unwrap();

        let err = serde_json::from_value::<Game>(json).unwrap_err();
        assert!(err.to_string().contains("Board shape"));
    }

    #[test]
    fn game_with_counters_off_the_board_fails_to_load() {
        let game = game((3, 3), &[(1, 1)]).flag((0, 0)).reveal((2, 2));
        let json = serde_json::to_value(&game).unwrap();
        assert!(json.get("hidden_count").is_none());

        let mut wrong_flags = json.clone();
        wrong_flags["flagged_count"] = serde_json::to_value(0u32).unwrap();
        assert!(serde_json::from_value::<Game>(wrong_flags).is_err());

        let mut wrong_status = json.clone();
        wrong_status["status"] = serde_json::to_value(GameStatus::Lost).unwrap();
        assert!(serde_json::from_value::<Game>(wrong_status).is_err());

        let restored: Game = serde_json::from_value(json).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.reveal((0, 2)).status(), GameStatus::Started);
    }

    #[test]
    fn exploded_cell_in_a_started_game_is_left_alone() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.set_cell((0, 0), Cell::Exploded);
        game.hidden_count -= 1;
        assert_eq!(game.status(), GameStatus::Started);

        let (same, outcome) = game.try_flag((0, 0)).unwrap();
        assert_eq!(outcome, FlagOutcome::NoChange);
        assert!(same.shares_cells_with(&game));

        let (same, outcome) = game.try_reveal((0, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(same.shares_cells_with(&game));

        let (same, outcome) = game.try_reveal_neighbors((0, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(same.shares_cells_with(&game));
        assert_eq!(same.move_count(), 0);
    }
}
