pub mod account;
pub mod board;
pub mod difficulty;
pub mod stopwatch;
pub mod store;

pub use board::{Board, BoardDump, BoardError, BoardView, CellView, RevealOutcome};
pub use difficulty::Difficulty;

use stopwatch::Stopwatch;

/// One sitting at the board: the engine plus the session-level concerns the
/// engine deliberately knows nothing about — the clock, the pause and the
/// difficulty the board was built from.
///
/// A `Game` is created per game and discarded when a new one starts; durable
/// history lives in [`store::Store`].
#[derive(Debug)]
pub struct Game {
    board: Board,
    difficulty: Difficulty,
    stopwatch: Stopwatch,
    paused: bool,
}

impl Game {
    pub fn new(difficulty: Difficulty) -> Result<Self, BoardError> {
        let (rows, cols, mines) = difficulty.dimensions();

        Ok(Game {
            board: Board::new(rows, cols, mines)?,
            difficulty,
            stopwatch: Stopwatch::default(),
            paused: false,
        })
    }

    /// Reveals a cell, running the clock: the first reveal starts it and a
    /// terminal outcome stops it. Inert while paused.
    pub fn reveal(&mut self, target: (u8, u8)) -> Result<RevealOutcome, BoardError> {
        if self.paused {
            return Ok(RevealOutcome::NoOp);
        }

        if !self.board.is_seeded() {
            self.stopwatch.start();
        }

        let outcome = self.board.reveal(target)?;

        if self.board.is_over() {
            self.stopwatch.stop();
        }

        Ok(outcome)
    }

    /// Flags or unflags a cell. Inert while paused.
    pub fn toggle_flag(&mut self, target: (u8, u8)) -> Result<bool, BoardError> {
        if self.paused {
            return Ok(false);
        }

        self.board.toggle_flag(target)
    }

    /// Pauses or resumes the session. Only a started, unfinished game can
    /// pause; the frontend is expected to hide the board while paused.
    pub fn toggle_pause(&mut self) {
        if !self.board.is_seeded() || self.board.is_over() {
            return;
        }

        if self.paused {
            self.stopwatch.start();
        } else {
            self.stopwatch.stop();
        }

        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.board.is_over()
    }

    pub fn is_won(&self) -> bool {
        self.board.is_won()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The play time so far, in whole seconds. This is what gets forwarded to
    /// the statistics layer when the game ends.
    pub fn elapsed_seconds(&self) -> u64 {
        self.stopwatch.elapsed().as_secs()
    }

    pub fn view(&self) -> BoardView {
        self.board.snapshot()
    }

    pub fn remaining_mines(&self) -> i32 {
        self.board.remaining_mines()
    }

    pub fn flagged_count(&self) -> u16 {
        self.board.flagged_count()
    }

    /// The final grids for persistence; `None` until the game is over.
    pub fn dump(&self) -> Option<BoardDump> {
        self.board.dump()
    }

    /// Direct access to the board, for frontends that render its `Display`
    /// form.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod test {
    use super::{Difficulty, Game, RevealOutcome};

    fn tiny_game() -> Game {
        // a single safe cell: the first reveal wins immediately
        Game::new(Difficulty::Custom {
            rows: 1,
            cols: 1,
            mines: 0,
        })
        .unwrap()
    }

    #[test]
    fn a_game_is_built_from_its_difficulty() {
        let game = Game::new(Difficulty::Easy).unwrap();
        let view = game.view();

        assert_eq!((view.rows, view.cols, view.mine_count), (8, 8, 10));
        assert_eq!(game.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn an_impossible_custom_configuration_is_rejected() {
        assert!(Game::new(Difficulty::Custom {
            rows: 2,
            cols: 2,
            mines: 4
        })
        .is_err());
    }

    #[test]
    fn the_first_reveal_can_win_outright() {
        let mut game = tiny_game();

        assert_eq!(game.reveal((0, 0)), Ok(RevealOutcome::Win));
        assert!(game.is_over());
        assert!(game.is_won());
        assert!(game.dump().is_some());
    }

    #[test]
    fn an_unstarted_game_cannot_pause() {
        let mut game = Game::new(Difficulty::Easy).unwrap();

        game.toggle_pause();

        assert!(!game.is_paused());
    }

    #[test]
    fn a_finished_game_cannot_pause() {
        let mut game = tiny_game();
        game.reveal((0, 0)).unwrap();

        game.toggle_pause();

        assert!(!game.is_paused());
    }

    /// 2x2 with one mine: wherever the mine lands, the opening reveal shows a
    /// 1 and leaves two safe cells closed, so the game stays open.
    fn ongoing_game() -> Game {
        let mut game = Game::new(Difficulty::Custom {
            rows: 2,
            cols: 2,
            mines: 1,
        })
        .unwrap();

        assert_eq!(game.reveal((0, 0)), Ok(RevealOutcome::Continue));
        game
    }

    #[test]
    fn moves_are_inert_while_paused() {
        let mut game = ongoing_game();
        game.toggle_pause();
        assert!(game.is_paused());

        assert_eq!(game.reveal((1, 0)), Ok(RevealOutcome::NoOp));
        assert_eq!(game.toggle_flag((1, 0)), Ok(false));

        game.toggle_pause();
        assert!(!game.is_paused());
        assert_eq!(game.toggle_flag((1, 0)), Ok(true));
    }

    #[test]
    fn the_dump_is_withheld_while_the_game_runs() {
        let game = ongoing_game();

        assert!(!game.is_over());
        assert!(game.dump().is_none());
    }
}
