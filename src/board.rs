pub mod cell;

use cell::Cell;
use log::debug;
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;

/// Everything that can go wrong when configuring or addressing a board.
///
/// Ordinary play never produces these: clicking a flagged cell, clicking after
/// the game has ended, or flagging a revealed cell are all well-defined no-ops
/// reported through return values, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The requested mine count does not fit the board: a playable board needs
    /// at least one cell in each dimension and at least one mine-free cell.
    #[error("a {rows}x{cols} board cannot hold {mines} mines")]
    InvalidConfiguration { rows: u8, cols: u8, mines: u16 },
    /// The coordinates point outside the grid. This is a caller bug, not a
    /// player action.
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: u8, col: u8 },
    /// Mines were already planted; a board is seeded exactly once.
    #[error("the board has already been seeded with mines")]
    AlreadySeeded,
}

/// What a single `reveal` call did to the game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// At least one cell was revealed and the game goes on.
    Continue,
    /// Every mine-free cell is now revealed.
    Win,
    /// The move hit a mine.
    Loss,
    /// Nothing changed: the target was flagged or already revealed.
    NoOp,
}

/// The mine-placement lifecycle. Mines are only planted on the first reveal,
/// which is what keeps the opening move safe.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Seeding {
    Unseeded,
    Seeded,
}

/// The minefield engine: one instance per game.
///
/// The board owns all game state and moves through it with three mutating
/// operations (`seed_mines`, `reveal`, `toggle_flag`). Consumers read state
/// through [`Board::snapshot`], which never exposes what a closed cell hides.
#[derive(PartialEq)]
pub struct Board {
    rows: u8,
    cols: u8,
    mine_count: u16,
    grid: Vec<Vec<Cell>>,
    seeding: Seeding,
    /// Mine coordinates, cached at seeding time so a loss can bare every mine
    /// without rescanning the grid.
    mine_positions: Vec<(u8, u8)>,
    game_over: bool,
    game_won: bool,
}

impl Board {
    /// Creates a board with all cells closed and no mines planted yet.
    ///
    /// The mine count is validated here, at configuration time, so that a bad
    /// setup surfaces before the player starts clicking: `mine_count` must
    /// leave at least one mine-free cell, and both dimensions must be at
    /// least 1.
    pub fn new(rows: u8, cols: u8, mine_count: u16) -> Result<Self, BoardError> {
        let cell_count = rows as u16 * cols as u16;

        // Covers zero-sized grids too: their cell count is 0, and no mine
        // count is valid against it.
        if mine_count >= cell_count {
            return Err(BoardError::InvalidConfiguration {
                rows,
                cols,
                mines: mine_count,
            });
        }

        let grid = vec![vec![Cell::default(); cols as usize]; rows as usize];

        Ok(Board {
            rows,
            cols,
            mine_count,
            grid,
            seeding: Seeding::Unseeded,
            mine_positions: Vec::new(),
            game_over: false,
            game_won: false,
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn mine_count(&self) -> u16 {
        self.mine_count
    }

    pub fn is_seeded(&self) -> bool {
        self.seeding == Seeding::Seeded
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn is_won(&self) -> bool {
        self.game_won
    }

    /// Plants exactly `mine_count` mines and computes every cell's
    /// adjacent-mine value.
    ///
    /// The cells around `safe` are kept mine-free so the opening reveal lands
    /// on a useful region: the whole 3x3 neighborhood is excluded from the
    /// candidate set when the board has room for that, otherwise only `safe`
    /// itself is spared.
    ///
    /// [`Board::reveal`] calls this with a thread-local RNG on the first
    /// open; tests and callers that need reproducible layouts can call it
    /// beforehand with a seeded RNG.
    pub fn seed_mines<R: Rng>(&mut self, rng: &mut R, safe: (u8, u8)) -> Result<(), BoardError> {
        self.ensure_in_bounds(safe)?;

        if self.seeding == Seeding::Seeded {
            return Err(BoardError::AlreadySeeded);
        }

        let mut spared = self.neighbor_positions(safe);
        spared.push(safe);

        let mut candidates = self.positions_excluding(&spared);

        // A dense board can leave fewer candidates than mines; fall back to
        // sparing the clicked cell only.
        if (candidates.len() as u16) < self.mine_count {
            candidates = self.positions_excluding(&[safe]);
        }

        candidates.shuffle(rng);
        candidates.truncate(self.mine_count as usize);

        for &(row, col) in &candidates {
            self.grid[row as usize][col as usize].plant_mine();
        }

        self.mine_positions = candidates;
        self.recount_adjacent_mines();
        self.seeding = Seeding::Seeded;

        debug!(
            "seeded {} mines on a {}x{} board around ({}, {})",
            self.mine_count, self.rows, self.cols, safe.0, safe.1
        );

        Ok(())
    }

    /// Reveals a cell and reports what the move did.
    ///
    /// The first reveal seeds the board (so it can never hit a mine), a
    /// flagged or already-revealed target is a [`RevealOutcome::NoOp`], a
    /// mined target ends the game baring every mine, and a blank target
    /// cascades through its connected blank region. After the game has ended
    /// the call changes nothing and hands back the standing terminal outcome;
    /// callers that must tell "already over" from "this move ended it" check
    /// [`Board::is_over`] first.
    pub fn reveal(&mut self, target: (u8, u8)) -> Result<RevealOutcome, BoardError> {
        self.ensure_in_bounds(target)?;

        if self.game_over {
            return Ok(if self.game_won {
                RevealOutcome::Win
            } else {
                RevealOutcome::Loss
            });
        }

        if self.seeding == Seeding::Unseeded {
            self.seed_mines(&mut thread_rng(), target)?;
        }

        let cell = &self.grid[target.0 as usize][target.1 as usize];

        if cell.is_flagged() || cell.is_revealed() {
            return Ok(RevealOutcome::NoOp);
        }

        if cell.is_mine() {
            self.bare_all_mines();
            self.game_over = true;
            return Ok(RevealOutcome::Loss);
        }

        self.flood_reveal(target);

        if self.all_safe_cells_revealed() {
            self.flag_all_mines();
            self.game_over = true;
            self.game_won = true;
            return Ok(RevealOutcome::Win);
        }

        Ok(RevealOutcome::Continue)
    }

    /// Flips the flag on a closed cell, reporting whether anything changed.
    ///
    /// Refused (returns `false`) once the game has ended or the cell is
    /// revealed. Flagging never ends the game: the win condition is only
    /// evaluated on reveals.
    pub fn toggle_flag(&mut self, target: (u8, u8)) -> Result<bool, BoardError> {
        self.ensure_in_bounds(target)?;

        if self.game_over {
            return Ok(false);
        }

        Ok(self.grid[target.0 as usize][target.1 as usize].toggle_flag())
    }

    /// The mine counter shown to the player: total mines minus flags placed.
    ///
    /// Goes negative when more flags are placed than there are mines; the raw
    /// signed value is surfaced so the player can see the over-flagging.
    pub fn remaining_mines(&self) -> i32 {
        self.mine_count as i32 - self.flagged_count() as i32
    }

    /// The number of currently flagged cells.
    pub fn flagged_count(&self) -> u16 {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| cell.is_flagged())
            .count() as u16
    }

    /// A read-only view of the board for consumers.
    ///
    /// Closed cells map to [`CellView::Hidden`]/[`CellView::Flagged`] only:
    /// what they hide stays inside the engine until revealed. The two terminal
    /// transitions are the deliberate exceptions — a loss reveals every mine
    /// and a win flags them.
    pub fn snapshot(&self) -> BoardView {
        let cells = self
            .grid
            .iter()
            .map(|row| row.iter().map(CellView::of).collect())
            .collect();

        BoardView {
            rows: self.rows,
            cols: self.cols,
            mine_count: self.mine_count,
            cells,
            game_over: self.game_over,
            game_won: self.game_won,
        }
    }

    /// The full grids for lossless persistence: cell values (-1 for mines,
    /// the adjacent-mine count otherwise), revealed flags and placed flags.
    ///
    /// Only available once the game is over, so live hidden state never
    /// leaves the engine.
    pub fn dump(&self) -> Option<BoardDump> {
        if !self.game_over {
            return None;
        }

        let mut values = Vec::with_capacity(self.rows as usize);
        let mut revealed = Vec::with_capacity(self.rows as usize);
        let mut flagged = Vec::with_capacity(self.rows as usize);

        for row in &self.grid {
            values.push(
                row.iter()
                    .map(|cell| {
                        if cell.is_mine() {
                            -1
                        } else {
                            cell.adjacent_mines() as i8
                        }
                    })
                    .collect(),
            );
            revealed.push(row.iter().map(Cell::is_revealed).collect());
            flagged.push(row.iter().map(Cell::is_flagged).collect());
        }

        Some(BoardDump {
            values,
            revealed,
            flagged,
        })
    }

    fn ensure_in_bounds(&self, (row, col): (u8, u8)) -> Result<(), BoardError> {
        if row >= self.rows || col >= self.cols {
            Err(BoardError::OutOfBounds { row, col })
        } else {
            Ok(())
        }
    }

    /// The in-bounds positions of the 8-neighborhood of a cell.
    fn neighbor_positions(&self, (row, col): (u8, u8)) -> Vec<(u8, u8)> {
        let mut positions = Vec::with_capacity(8);

        for row_delta in -1i16..=1 {
            for col_delta in -1i16..=1 {
                if row_delta == 0 && col_delta == 0 {
                    continue;
                }

                let neighbor_row = row as i16 + row_delta;
                let neighbor_col = col as i16 + col_delta;

                if (0..self.rows as i16).contains(&neighbor_row)
                    && (0..self.cols as i16).contains(&neighbor_col)
                {
                    positions.push((neighbor_row as u8, neighbor_col as u8));
                }
            }
        }

        positions
    }

    /// Every position on the board except the listed ones.
    fn positions_excluding(&self, excluded: &[(u8, u8)]) -> Vec<(u8, u8)> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .filter(|position| !excluded.contains(position))
            .collect()
    }

    /// Recomputes the adjacent-mine value of every mine-free cell against the
    /// current mine placement.
    fn recount_adjacent_mines(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.grid[row as usize][col as usize].is_mine() {
                    continue;
                }

                let amount = self
                    .neighbor_positions((row, col))
                    .into_iter()
                    .filter(|&(r, c)| self.grid[r as usize][c as usize].is_mine())
                    .count() as u8;

                self.grid[row as usize][col as usize].set_adjacent_mines(amount);
            }
        }
    }

    /// Reveals the target and cascades through connected blank regions.
    ///
    /// An explicit work list replaces recursion so a large all-blank board
    /// cannot exhaust the call stack. The `revealed` flag doubles as the
    /// visited marker, which bounds the fill at one visit per cell. Flags act
    /// as a stop barrier, and mined cells are never enqueued.
    fn flood_reveal(&mut self, start: (u8, u8)) {
        let mut pending = vec![start];

        while let Some((row, col)) = pending.pop() {
            let cell = &self.grid[row as usize][col as usize];

            if cell.is_revealed() || cell.is_flagged() || cell.is_mine() {
                continue;
            }

            self.grid[row as usize][col as usize].reveal();

            if self.grid[row as usize][col as usize].adjacent_mines() == 0 {
                for neighbor in self.neighbor_positions((row, col)) {
                    let neighbor_cell = &self.grid[neighbor.0 as usize][neighbor.1 as usize];

                    if !neighbor_cell.is_revealed() && !neighbor_cell.is_flagged() {
                        pending.push(neighbor);
                    }
                }
            }
        }
    }

    fn all_safe_cells_revealed(&self) -> bool {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| !cell.is_mine())
            .all(Cell::is_revealed)
    }

    /// Reveals every mine cell, clearing any flags they carried, so the board
    /// display can show the full layout after a loss. Wrongly flagged safe
    /// cells keep their flags.
    fn bare_all_mines(&mut self) {
        for &(row, col) in &self.mine_positions {
            self.grid[row as usize][col as usize].reveal();
        }
    }

    /// Flags every still-closed mine cell: the cosmetic finishing touch on a
    /// won board.
    fn flag_all_mines(&mut self) {
        for &(row, col) in &self.mine_positions {
            self.grid[row as usize][col as usize].flag();
        }
    }
}

/// What one cell looks like from outside the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    /// Closed and unmarked. Carries no information about the cell's contents.
    Hidden,
    /// Closed with a flag on it.
    Flagged,
    /// Revealed and mine-free; the value is the adjacent-mine count.
    Open(u8),
    /// A revealed mine. Only ever seen after a loss.
    Mine,
}

impl CellView {
    fn of(cell: &Cell) -> Self {
        match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
            (false, true, _) => CellView::Flagged,
            (false, false, _) => CellView::Hidden,
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Open(cell.adjacent_mines()),
        }
    }
}

/// A read-only state snapshot, re-read by consumers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: u8,
    pub cols: u8,
    pub mine_count: u16,
    pub cells: Vec<Vec<CellView>>,
    pub game_over: bool,
    pub game_won: bool,
}

/// The three grids of a finished game, serialized losslessly: -1 marks a mine
/// in the value grid, everything else is the adjacent-mine count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDump {
    pub values: Vec<Vec<i8>>,
    pub revealed: Vec<Vec<bool>>,
    pub flagged: Vec<Vec<bool>>,
}

/// The player view: closed cells render as `#`, flags as `F`, mines as `*`,
/// open cells as their count (blanks as `.`).
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.grid {
            for cell in row {
                let symbol = match CellView::of(cell) {
                    CellView::Hidden => '#',
                    CellView::Flagged => 'F',
                    CellView::Mine => '*',
                    CellView::Open(0) => '.',
                    CellView::Open(amount) => {
                        char::from_digit(amount as u32, 10).unwrap_or('?')
                    }
                };

                write!(f, "{} ", symbol)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// The cheat view: everything rendered as if revealed.
impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.grid {
            for cell in row {
                let symbol = if cell.is_mine() {
                    '*'
                } else if cell.adjacent_mines() == 0 {
                    '.'
                } else {
                    char::from_digit(cell.adjacent_mines() as u32, 10).unwrap_or('?')
                };

                write!(f, "{} ", symbol)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Board, BoardError, CellView, RevealOutcome, Seeding};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Builds an already-seeded board with mines exactly at the given
    /// positions, bypassing the RNG.
    fn seeded_board(rows: u8, cols: u8, mines: &[(u8, u8)]) -> Board {
        let mut board = Board::new(rows, cols, mines.len() as u16).unwrap();

        for &(row, col) in mines {
            board.grid[row as usize][col as usize].plant_mine();
        }

        board.mine_positions = mines.to_vec();
        board.recount_adjacent_mines();
        board.seeding = Seeding::Seeded;

        board
    }

    // The layout used by most scenarios below:
    //
    //   * * 2
    //   2 3 *
    //   . 1 1
    //   . . .
    fn stub_board() -> Board {
        seeded_board(4, 3, &[(0, 0), (0, 1), (1, 2)])
    }

    #[test]
    fn new_allocates_a_closed_unmined_grid() {
        let board = Board::new(3, 5, 4).unwrap();

        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.mine_count(), 4);
        assert!(!board.is_seeded());
        assert!(!board.is_over());
        assert!(board
            .grid
            .iter()
            .flatten()
            .all(|cell| !cell.is_mine() && !cell.is_revealed() && !cell.is_flagged()));
    }

    #[test]
    fn new_accepts_a_mine_free_board() {
        assert!(Board::new(1, 1, 0).is_ok());
    }

    #[test]
    fn new_rejects_too_many_mines() {
        assert_eq!(
            Board::new(3, 3, 9),
            Err(BoardError::InvalidConfiguration {
                rows: 3,
                cols: 3,
                mines: 9
            })
        );
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            Board::new(0, 5, 0),
            Err(BoardError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            Board::new(5, 0, 0),
            Err(BoardError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn seeding_places_the_exact_mine_count() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(8, 8, 10).unwrap();
            board.seed_mines(&mut rng, (4, 4)).unwrap();

            let mined = board.grid.iter().flatten().filter(|c| c.is_mine()).count();
            assert_eq!(mined, 10);
            assert_eq!(board.mine_positions.len(), 10);
        }
    }

    #[test]
    fn seeding_spares_the_whole_opening_neighborhood_when_possible() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(8, 8, 10).unwrap();
            board.seed_mines(&mut rng, (4, 4)).unwrap();

            for row in 3..=5u8 {
                for col in 3..=5u8 {
                    assert!(!board.grid[row as usize][col as usize].is_mine());
                }
            }
        }
    }

    #[test]
    fn seeding_falls_back_to_sparing_only_the_clicked_cell() {
        // 8 mines on a 3x3 board: the only legal layout mines everything but
        // the clicked cell.
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(3, 3, 8).unwrap();
            board.seed_mines(&mut rng, (1, 1)).unwrap();

            assert!(!board.grid[1][1].is_mine());
            let mined = board.grid.iter().flatten().filter(|c| c.is_mine()).count();
            assert_eq!(mined, 8);
        }
    }

    #[test]
    fn seeding_twice_is_refused() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(4, 4, 3).unwrap();

        board.seed_mines(&mut rng, (0, 0)).unwrap();

        assert_eq!(
            board.seed_mines(&mut rng, (0, 0)),
            Err(BoardError::AlreadySeeded)
        );
    }

    #[test]
    fn adjacent_counts_match_a_brute_force_recount() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(9, 7, 12).unwrap();
            board.seed_mines(&mut rng, (4, 3)).unwrap();

            for row in 0..9u8 {
                for col in 0..7u8 {
                    if board.grid[row as usize][col as usize].is_mine() {
                        continue;
                    }

                    let mut expected = 0;
                    for r in row.saturating_sub(1)..=(row + 1).min(8) {
                        for c in col.saturating_sub(1)..=(col + 1).min(6) {
                            if (r, c) != (row, col) && board.grid[r as usize][c as usize].is_mine()
                            {
                                expected += 1;
                            }
                        }
                    }

                    assert_eq!(
                        board.grid[row as usize][col as usize].adjacent_mines(),
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn the_first_reveal_is_never_a_mine() {
        for _ in 0..100 {
            let mut board = Board::new(8, 8, 10).unwrap();
            let outcome = board.reveal((0, 0)).unwrap();

            assert_ne!(outcome, RevealOutcome::Loss);
            assert!(!board.grid[0][0].is_mine());
            assert!(board.grid[0][0].is_revealed());
            assert_eq!(board.remaining_mines(), 10);
        }
    }

    #[test]
    fn reveal_rejects_out_of_bounds_coordinates() {
        let mut board = Board::new(3, 3, 2).unwrap();

        assert_eq!(
            board.reveal((3, 0)),
            Err(BoardError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            board.toggle_flag((0, 7)),
            Err(BoardError::OutOfBounds { row: 0, col: 7 })
        );
    }

    #[test]
    fn revealing_a_numbered_cell_opens_only_that_cell() {
        let mut board = stub_board();

        assert_eq!(board.reveal((1, 1)), Ok(RevealOutcome::Continue));

        let open: Vec<_> = board
            .grid
            .iter()
            .flatten()
            .filter(|cell| cell.is_revealed())
            .collect();
        assert_eq!(open.len(), 1);
        assert_eq!(board.grid[1][1].adjacent_mines(), 3);
    }

    #[test]
    fn revealing_a_blank_cascades_through_the_region_and_its_border() {
        let mut board = stub_board();

        // (3, 0) sits in the blank region at the bottom; the cascade opens it
        // and the numbered border above, stopping before the mines.
        assert_eq!(board.reveal((3, 0)), Ok(RevealOutcome::Continue));

        let expected_open = [
            (1, 0),
            (1, 1),
            (2, 0),
            (2, 1),
            (2, 2),
            (3, 0),
            (3, 1),
            (3, 2),
        ];
        for row in 0..4u8 {
            for col in 0..3u8 {
                let should_be_open = expected_open.contains(&(row, col));
                assert_eq!(
                    board.grid[row as usize][col as usize].is_revealed(),
                    should_be_open,
                    "cell ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn the_cascade_never_reveals_a_mine() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(12, 12, 14).unwrap();
            board.seed_mines(&mut rng, (6, 6)).unwrap();
            board.reveal((6, 6)).unwrap();

            // a cascade may win the game outright, but it must never open a
            // mine cell
            assert!(board
                .grid
                .iter()
                .flatten()
                .filter(|cell| cell.is_mine())
                .all(|cell| !cell.is_revealed()));
        }
    }

    #[test]
    fn a_flag_blocks_the_cascade() {
        let mut board = stub_board();

        board.toggle_flag((3, 1)).unwrap();
        board.reveal((3, 0)).unwrap();

        assert!(!board.grid[3][1].is_revealed());
        assert!(board.grid[3][1].is_flagged());
        // the flag splits the bottom region: the near side opens...
        assert!(board.grid[2][0].is_revealed());
        assert!(board.grid[2][1].is_revealed());
        // ...and the cells behind the flag stay closed
        assert!(!board.grid[3][2].is_revealed());
        assert!(!board.grid[2][2].is_revealed());
    }

    #[test]
    fn a_flag_blocks_a_direct_reveal() {
        let mut board = stub_board();

        board.toggle_flag((1, 1)).unwrap();

        assert_eq!(board.reveal((1, 1)), Ok(RevealOutcome::NoOp));
        assert!(!board.grid[1][1].is_revealed());
    }

    #[test]
    fn revealing_an_open_cell_again_is_a_noop() {
        let mut board = stub_board();

        assert_eq!(board.reveal((1, 1)), Ok(RevealOutcome::Continue));
        assert_eq!(board.reveal((1, 1)), Ok(RevealOutcome::NoOp));
    }

    #[test]
    fn revealing_a_mine_loses_and_bares_every_mine() {
        let mut board = stub_board();

        // flag one mine first; the loss reveal must clear it
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.reveal((0, 1)), Ok(RevealOutcome::Loss));
        assert!(board.is_over());
        assert!(!board.is_won());

        for &(row, col) in &[(0u8, 0u8), (0, 1), (1, 2)] {
            let cell = &board.grid[row as usize][col as usize];
            assert!(cell.is_revealed());
            assert!(!cell.is_flagged());
        }
    }

    #[test]
    fn a_wrong_flag_survives_the_loss_reveal() {
        let mut board = stub_board();

        board.toggle_flag((2, 0)).unwrap();
        board.reveal((0, 0)).unwrap();

        assert!(board.grid[2][0].is_flagged());
        assert!(!board.grid[2][0].is_revealed());
    }

    #[test]
    fn opening_every_safe_cell_wins_and_flags_the_mines() {
        let mut board = stub_board();

        // the cascade from (3, 0) opens everything but (0, 2)
        board.reveal((3, 0)).unwrap();

        assert_eq!(board.reveal((0, 2)), Ok(RevealOutcome::Win));
        assert!(board.is_over());
        assert!(board.is_won());

        for &(row, col) in &[(0u8, 0u8), (0, 1), (1, 2)] {
            let cell = &board.grid[row as usize][col as usize];
            assert!(cell.is_flagged());
            assert!(!cell.is_revealed());
        }
    }

    #[test]
    fn flagging_every_mine_does_not_win() {
        let mut board = stub_board();

        board.toggle_flag((0, 0)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((1, 2)).unwrap();

        assert!(!board.is_over());
        assert!(!board.is_won());
    }

    #[test]
    fn a_single_safe_cell_board_wins_on_the_first_reveal() {
        let mut board = Board::new(1, 1, 0).unwrap();

        assert_eq!(board.reveal((0, 0)), Ok(RevealOutcome::Win));
        assert!(board.is_over());
        assert!(board.is_won());
    }

    #[test]
    fn moves_after_the_game_ended_change_nothing() {
        let mut board = stub_board();
        board.reveal((0, 0)).unwrap();

        // the standing terminal outcome comes back
        assert_eq!(board.reveal((3, 0)), Ok(RevealOutcome::Loss));
        assert!(!board.grid[3][0].is_revealed());

        assert_eq!(board.toggle_flag((3, 0)), Ok(false));
        assert!(!board.grid[3][0].is_flagged());
    }

    #[test]
    fn remaining_mines_tracks_flags_and_goes_negative() {
        let mut board = stub_board();
        assert_eq!(board.remaining_mines(), 3);

        board.toggle_flag((0, 0)).unwrap();
        assert_eq!(board.remaining_mines(), 2);

        board.reveal((3, 0)).unwrap();
        // reveals leave the counter alone
        assert_eq!(board.remaining_mines(), 2);

        // flag every cell the cascade left closed
        for &position in &[(0u8, 1u8), (0, 2), (1, 2)] {
            board.toggle_flag(position).unwrap();
        }
        assert_eq!(board.remaining_mines(), -1);

        board.toggle_flag((0, 2)).unwrap();
        assert_eq!(board.remaining_mines(), 0);
    }

    #[test]
    fn the_snapshot_hides_closed_cells() {
        let mut board = stub_board();
        board.toggle_flag((0, 0)).unwrap();
        board.reveal((1, 1)).unwrap();

        let view = board.snapshot();

        assert_eq!(view.cells[0][0], CellView::Flagged);
        assert_eq!(view.cells[0][1], CellView::Hidden);
        assert_eq!(view.cells[1][1], CellView::Open(3));
        assert!(!view.game_over);
    }

    #[test]
    fn the_snapshot_shows_every_mine_after_a_loss() {
        let mut board = stub_board();
        board.reveal((0, 0)).unwrap();

        let view = board.snapshot();

        assert!(view.game_over);
        assert!(!view.game_won);
        for &(row, col) in &[(0u8, 0u8), (0, 1), (1, 2)] {
            assert_eq!(view.cells[row as usize][col as usize], CellView::Mine);
        }
    }

    #[test]
    fn the_dump_is_only_available_after_the_game_ends() {
        let mut board = stub_board();
        assert!(board.dump().is_none());

        board.reveal((0, 0)).unwrap();

        let dump = board.dump().unwrap();
        assert_eq!(dump.values[0][0], -1);
        assert_eq!(dump.values[1][1], 3);
        assert_eq!(dump.values[3][0], 0);
        assert!(dump.revealed[0][0]);
        assert!(!dump.revealed[3][2]);
    }
}
