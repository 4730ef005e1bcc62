//! The terminal application state.

use crate::game_ui::render_game;
use crate::login_ui::render_login;
use crate::menu_ui::render_menu;
use crate::stats_ui::render_stats;
use crate::tui::Render;
use color_eyre::Result;
use ratatui::Frame;
use sapper::account::{Accounts, StatsSummary};
use sapper::{Difficulty, Game, RevealOutcome};

pub const DEFAULT_CUSTOM: Difficulty = Difficulty::Custom {
    rows: 16,
    cols: 16,
    mines: 40,
};

/// How many leaderboard rows the statistics screen loads.
const LEADERBOARD_LIMIT: usize = 10;

/// The terminal application: one active screen plus the state every screen
/// needs (the accounts controller, which owns the store).
pub struct App {
    pub variant: AppVariant,
    pub accounts: Accounts,
    pub should_quit: bool,
}

/// The screen currently being displayed.
pub enum AppVariant {
    AtLogin(LoginScreen),
    AtMenu(MenuScreen),
    InGame(GameScreen),
    AtStats(StatsScreen),
}

/// A pending screen change, computed against the current screen's flags and
/// applied afterwards so the borrows stay untangled.
enum Transition {
    None,
    Quit,
    ToLogin,
    ToMenu(Difficulty),
    ToStats,
    ToGame(Difficulty),
}

impl App {
    /// Builds the initial screen: straight into a game when the caller
    /// supplied full board dimensions, the menu when they supplied some, the
    /// login screen otherwise.
    pub fn new(mut accounts: Accounts, custom: Option<Difficulty>, jump_in: bool) -> Result<App> {
        let variant = match custom {
            Some(difficulty) if jump_in => {
                AppVariant::InGame(GameScreen::start(&mut accounts, difficulty)?)
            }
            Some(difficulty) => AppVariant::AtMenu(MenuScreen::new(difficulty)),
            None => AppVariant::AtLogin(LoginScreen::default()),
        };

        Ok(App {
            variant,
            accounts,
            should_quit: false,
        })
    }

    /// Applies the screen transitions requested since the last tick.
    pub fn tick(&mut self) {
        let transition = match &mut self.variant {
            AppVariant::AtLogin(login) if login.should_proceed => {
                Transition::ToMenu(DEFAULT_CUSTOM)
            }
            AppVariant::AtMenu(menu) => {
                if menu.should_quit {
                    Transition::Quit
                } else if menu.should_sign_out {
                    Transition::ToLogin
                } else if menu.should_open_stats {
                    menu.should_open_stats = false;
                    Transition::ToStats
                } else if let Some(difficulty) = menu.start_requested.take() {
                    Transition::ToGame(difficulty)
                } else {
                    Transition::None
                }
            }
            AppVariant::InGame(game) => {
                if let Some(difficulty) = game.restart_requested.take() {
                    Transition::ToGame(difficulty)
                } else if game.should_leave {
                    Transition::ToMenu(game.game.difficulty())
                } else {
                    Transition::None
                }
            }
            AppVariant::AtStats(stats) if stats.should_leave => Transition::ToMenu(DEFAULT_CUSTOM),
            _ => Transition::None,
        };

        match transition {
            Transition::None => {}
            Transition::Quit => self.should_quit = true,
            Transition::ToLogin => {
                self.accounts.log_out();
                self.variant = AppVariant::AtLogin(LoginScreen::default());
            }
            Transition::ToMenu(difficulty) => {
                self.variant = AppVariant::AtMenu(MenuScreen::new(difficulty));
            }
            Transition::ToStats => {
                self.variant = AppVariant::AtStats(StatsScreen::load(&self.accounts));
            }
            Transition::ToGame(difficulty) => {
                match GameScreen::start(&mut self.accounts, difficulty) {
                    Ok(screen) => self.variant = AppVariant::InGame(screen),
                    Err(report) => {
                        self.variant =
                            AppVariant::AtMenu(MenuScreen::with_error(difficulty, report.to_string()));
                    }
                }
            }
        }
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        let player_name = self
            .accounts
            .current()
            .map(|player| player.username.clone());

        match &mut self.variant {
            AppVariant::AtLogin(login) => render_login(login, frame),
            AppVariant::AtMenu(menu) => render_menu(menu, player_name.as_deref(), frame),
            AppVariant::InGame(game) => render_game(game, player_name.as_deref(), frame),
            AppVariant::AtStats(stats) => render_stats(stats, frame),
        }
    }
}

/// Whether the login screen is signing an existing player in or registering
/// a new one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    Register,
}

/// The input field currently receiving keystrokes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Email,
}

/// The login screen: a username field, an email field (registration only)
/// and a mode toggle. Esc skips straight to guest play.
pub struct LoginScreen {
    pub mode: LoginMode,
    pub focus: LoginField,
    pub username: String,
    pub email: String,
    pub error: Option<String>,
    pub should_proceed: bool,
}

impl Default for LoginScreen {
    fn default() -> Self {
        LoginScreen {
            mode: LoginMode::SignIn,
            focus: LoginField::Username,
            username: String::new(),
            email: String::new(),
            error: None,
            should_proceed: false,
        }
    }
}

impl LoginScreen {
    const INPUT_LIMIT: usize = 24;

    pub fn type_char(&mut self, character: char) {
        if character.is_control() {
            return;
        }

        let field = self.focused_field();
        if field.len() < Self::INPUT_LIMIT {
            field.push(character);
        }
    }

    pub fn erase_char(&mut self) {
        self.focused_field().pop();
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::Register,
            LoginMode::Register => LoginMode::SignIn,
        };
        self.focus = LoginField::Username;
        self.error = None;
    }

    /// Moves the focus between the fields; sign-in mode only has the one.
    pub fn switch_field(&mut self) {
        self.focus = match (self.mode, self.focus) {
            (LoginMode::Register, LoginField::Username) => LoginField::Email,
            _ => LoginField::Username,
        };
    }

    /// Attempts the login or registration; on success the app proceeds to
    /// the menu, on failure the error is shown inline.
    pub fn submit(&mut self, accounts: &mut Accounts) {
        let result = match self.mode {
            LoginMode::SignIn => accounts.log_in(&self.username),
            LoginMode::Register => accounts.register(&self.username, Some(self.email.as_str())),
        };

        match result {
            Ok(_) => self.should_proceed = true,
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    /// Skips login; play proceeds as a guest.
    pub fn skip(&mut self) {
        self.should_proceed = true;
    }

    fn focused_field(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Email => &mut self.email,
        }
    }
}

/// The rows of the difficulty menu. The three size rows only respond while
/// the difficulty is `Custom`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Difficulty,
    Rows,
    Cols,
    Mines,
}

/// The difficulty menu.
pub struct MenuScreen {
    pub difficulty: Difficulty,
    /// The custom dimensions last used, remembered across the preset/custom
    /// cycle.
    pub custom: Difficulty,
    pub selected: MenuItem,
    pub error: Option<String>,
    pub start_requested: Option<Difficulty>,
    pub should_open_stats: bool,
    pub should_sign_out: bool,
    pub should_quit: bool,
}

impl MenuScreen {
    pub fn new(difficulty: Difficulty) -> Self {
        MenuScreen {
            difficulty,
            custom: match difficulty {
                custom @ Difficulty::Custom { .. } => custom,
                _ => DEFAULT_CUSTOM,
            },
            selected: MenuItem::Difficulty,
            error: None,
            start_requested: None,
            should_open_stats: false,
            should_sign_out: false,
            should_quit: false,
        }
    }

    pub fn with_error(difficulty: Difficulty, message: String) -> Self {
        let mut menu = MenuScreen::new(difficulty);
        menu.error = Some(message);
        menu
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            MenuItem::Difficulty | MenuItem::Rows => MenuItem::Difficulty,
            MenuItem::Cols => MenuItem::Rows,
            MenuItem::Mines => MenuItem::Cols,
        };
    }

    pub fn select_next(&mut self) {
        // the size rows are only reachable for custom boards
        if !matches!(self.difficulty, Difficulty::Custom { .. }) {
            return;
        }

        self.selected = match self.selected {
            MenuItem::Difficulty => MenuItem::Rows,
            MenuItem::Rows => MenuItem::Cols,
            MenuItem::Cols | MenuItem::Mines => MenuItem::Mines,
        };
    }

    /// Left/right on the selected row: cycles the difficulty or steps a
    /// custom dimension.
    pub fn adjust(&mut self, increase: bool) {
        self.error = None;

        if self.selected == MenuItem::Difficulty {
            self.difficulty = if increase {
                self.difficulty.cycled_forward(self.custom)
            } else {
                self.difficulty.cycled_backward(self.custom)
            };
            return;
        }

        let Difficulty::Custom {
            mut rows,
            mut cols,
            mut mines,
        } = self.difficulty
        else {
            return;
        };

        match self.selected {
            MenuItem::Rows => {
                rows = if increase {
                    rows.saturating_add(1)
                } else {
                    rows.saturating_sub(1).max(1)
                };
            }
            MenuItem::Cols => {
                cols = if increase {
                    cols.saturating_add(1)
                } else {
                    cols.saturating_sub(1).max(1)
                };
            }
            MenuItem::Mines => {
                mines = if increase {
                    mines.saturating_add(1)
                } else {
                    mines.saturating_sub(1)
                };
            }
            MenuItem::Difficulty => {}
        }

        self.difficulty = Difficulty::Custom { rows, cols, mines };
        self.custom = self.difficulty;
    }

    pub fn request_start(&mut self) {
        self.start_requested = Some(self.difficulty);
    }
}

/// The directions the cursor can move in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

/// The game screen: the running session plus everything the renderer and the
/// key handlers track around it.
pub struct GameScreen {
    pub game: Game,
    /// The open game row in the store.
    pub record_id: Option<u32>,
    /// The selected cell, in board coordinates.
    pub cursor: (u8, u8),
    /// The first visible row/column when the board outgrows the terminal.
    pub window_offset: (u8, u8),
    /// How much of the board the last frame could show; maintained by the
    /// renderer.
    pub visible_rows: u8,
    pub visible_cols: u8,
    pub awaiting_leave_confirmation: bool,
    pub should_leave: bool,
    pub restart_requested: Option<Difficulty>,
    /// A non-fatal problem worth showing (a failed store write, usually).
    pub error: Option<String>,
    result_recorded: bool,
}

impl GameScreen {
    /// Creates the session and opens its game row in the store.
    pub fn start(accounts: &mut Accounts, difficulty: Difficulty) -> Result<Self> {
        let game = Game::new(difficulty)?;
        let player_id = accounts.current().map(|player| player.id);
        let record_id = accounts.store().start_game(player_id, difficulty)?;

        Ok(GameScreen {
            game,
            record_id: Some(record_id),
            cursor: (0, 0),
            window_offset: (0, 0),
            visible_rows: 0,
            visible_cols: 0,
            awaiting_leave_confirmation: false,
            should_leave: false,
            restart_requested: None,
            error: None,
            result_recorded: false,
        })
    }

    pub fn move_cursor(&mut self, direction: MoveCursorDirection) {
        if self.game.is_paused() || self.game.is_over() {
            return;
        }

        let board = self.game.board();
        let (row, col) = self.cursor;

        self.cursor = match direction {
            MoveCursorDirection::Up => (row.saturating_sub(1), col),
            MoveCursorDirection::Left => (row, col.saturating_sub(1)),
            MoveCursorDirection::Down => ((row + 1).min(board.rows() - 1), col),
            MoveCursorDirection::Right => (row, (col + 1).min(board.cols() - 1)),
        };

        self.scroll_cursor_into_view();
    }

    /// Keeps the window over the cursor; the renderer clamps the offset
    /// against the actual terminal size afterwards.
    fn scroll_cursor_into_view(&mut self) {
        let (row, col) = self.cursor;
        let (mut offset_row, mut offset_col) = self.window_offset;

        if self.visible_rows > 0 {
            if row < offset_row {
                offset_row = row;
            } else if row >= offset_row + self.visible_rows {
                offset_row = row - self.visible_rows + 1;
            }
        }

        if self.visible_cols > 0 {
            if col < offset_col {
                offset_col = col;
            } else if col >= offset_col + self.visible_cols {
                offset_col = col - self.visible_cols + 1;
            }
        }

        self.window_offset = (offset_row, offset_col);
    }

    /// The main action: confirm a pending leave, restart a finished game, or
    /// reveal the selected cell.
    pub fn main_action(&mut self, accounts: &mut Accounts) {
        if self.awaiting_leave_confirmation {
            self.should_leave = true;
            return;
        }

        if self.game.is_over() {
            self.restart_requested = Some(self.game.difficulty());
            return;
        }

        // the cursor is clamped to the board, so the reveal cannot fail
        let Ok(outcome) = self.game.reveal(self.cursor) else {
            return;
        };

        if matches!(outcome, RevealOutcome::Win | RevealOutcome::Loss) {
            self.finalize(accounts);
        }
    }

    pub fn toggle_flag(&mut self) {
        if self.awaiting_leave_confirmation || self.game.is_over() {
            return;
        }

        let _ = self.game.toggle_flag(self.cursor);
    }

    pub fn toggle_pause(&mut self) {
        if !self.awaiting_leave_confirmation {
            self.game.toggle_pause();
        }
    }

    /// Esc/q: leave immediately once the game ended, otherwise toggle the
    /// confirmation popup.
    pub fn leave_or_confirm(&mut self) {
        if self.game.is_over() {
            self.should_leave = true;
        } else {
            self.awaiting_leave_confirmation = !self.awaiting_leave_confirmation;
        }
    }

    /// Writes the finished game to the store, exactly once.
    fn finalize(&mut self, accounts: &mut Accounts) {
        if self.result_recorded {
            return;
        }
        self.result_recorded = true;

        let won = self.game.is_won();
        let duration = self.game.elapsed_seconds();
        let difficulty = self.game.difficulty();

        if let Some(record_id) = self.record_id {
            if let Err(error) = accounts
                .store()
                .finish_game(record_id, won, duration, self.game.dump())
            {
                self.error = Some(error.to_string());
            }
        }

        if let Err(error) = accounts.record_result(won, duration, difficulty) {
            self.error = Some(error.to_string());
        }
    }
}

/// The statistics screen: the current player's summary plus one difficulty's
/// leaderboard.
pub struct StatsScreen {
    pub summary: Option<StatsSummary>,
    pub leaderboard_difficulty: Difficulty,
    pub leaderboard: Vec<(String, u64)>,
    pub error: Option<String>,
    pub should_leave: bool,
}

impl StatsScreen {
    pub fn load(accounts: &Accounts) -> Self {
        let mut screen = StatsScreen {
            summary: accounts.summary(),
            leaderboard_difficulty: Difficulty::Easy,
            leaderboard: Vec::new(),
            error: None,
            should_leave: false,
        };

        screen.reload_leaderboard(accounts);
        screen
    }

    /// Left/right: look at another difficulty's leaderboard.
    pub fn switch_difficulty(&mut self, accounts: &Accounts, forward: bool) {
        self.leaderboard_difficulty = match (self.leaderboard_difficulty, forward) {
            (Difficulty::Easy, true) => Difficulty::Medium,
            (Difficulty::Medium, true) => Difficulty::Hard,
            (Difficulty::Hard, true) => Difficulty::Easy,
            (Difficulty::Easy, false) => Difficulty::Hard,
            (Difficulty::Medium, false) => Difficulty::Easy,
            (Difficulty::Hard, false) => Difficulty::Medium,
            (custom, _) => custom,
        };

        self.reload_leaderboard(accounts);
    }

    fn reload_leaderboard(&mut self, accounts: &Accounts) {
        match accounts.leaderboard(self.leaderboard_difficulty, LEADERBOARD_LIMIT) {
            Ok(entries) => self.leaderboard = entries,
            Err(error) => self.error = Some(error.to_string()),
        }
    }
}
