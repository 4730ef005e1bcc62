/// A single square of the minefield.
///
/// Every facet of a cell is its own fixed field: whether it hides a mine, how
/// many of its neighbors do, and whether the player has revealed or flagged
/// it. The `adjacent_mines` value is only meaningful while `mine` is false;
/// the board never reads it for mined cells.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    mine: bool,
    adjacent_mines: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    /// Checks whether the cell hides a mine.
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    /// Turns the cell into a mine. There is no way back: mine placement is
    /// fixed for the lifetime of the board.
    pub fn plant_mine(&mut self) {
        self.mine = true;
    }

    /// The number of mined cells in the 8-neighborhood.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn set_adjacent_mines(&mut self, amount: u8) {
        self.adjacent_mines = amount;
    }

    /// Checks whether the cell has been revealed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Marks the cell revealed. Revealing is monotonic and clears the flag,
    /// which keeps "revealed implies unflagged" true by construction.
    pub fn reveal(&mut self) {
        self.revealed = true;
        self.flagged = false;
    }

    /// Checks whether the cell carries a flag.
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Flips the flag and reports whether anything changed. Refused once the
    /// cell is revealed.
    pub fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }

        self.flagged = !self.flagged;
        true
    }

    /// Plants a flag unconditionally on a closed cell. Used by the board for
    /// the cosmetic auto-flagging of mines on a win.
    pub fn flag(&mut self) {
        if !self.revealed {
            self.flagged = true;
        }
    }
}
