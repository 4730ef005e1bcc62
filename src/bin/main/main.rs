pub mod app;
pub mod event;
pub mod game_ui;
pub mod login_ui;
pub mod menu_ui;
pub mod stats_ui;
pub mod tui;
pub mod update;

use app::{App, DEFAULT_CUSTOM};
use clap::Parser;
use color_eyre::Result;
use event::{Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use sapper::account::Accounts;
use sapper::store::Store;
use sapper::Difficulty;
use std::path::PathBuf;
use tui::Tui;
use update::update;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding players.json and games.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Sign in as this player on startup (skips the login screen)
    #[arg(short, long)]
    user: Option<String>,
    /// Board height; together with --width and --mines, jumps straight into
    /// a game
    #[arg(short = 'H', long)]
    height: Option<u8>,
    #[arg(short, long)]
    width: Option<u8>,
    #[arg(short, long)]
    mines: Option<u16>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let store = Store::open(&args.data_dir)?;
    let mut accounts = Accounts::new(store);
    if let Some(user) = &args.user {
        accounts.log_in(user)?;
    }

    // Create the terminal application.
    let (custom, jump_in) = requested_board(&args);
    let mut app = App::new(accounts, custom, jump_in)?;

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(250);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Start the main loop.
    while !app.should_quit {
        // Render the user interface.
        tui.draw(&mut app)?;
        // Handle events.
        match tui.events.next()? {
            Event::Tick => app.tick(),
            Event::Key(key_event) => update(&mut app, key_event),
            Event::Mouse(_) => {}
            Event::Resize(_, _) => {}
        };
    }

    // Exit the user interface.
    tui.exit()?;
    Ok(())
}

/// Board dimensions from the command line: any of the three flags prefills
/// the menu with a custom board; all three start a game immediately.
fn requested_board(args: &Args) -> (Option<Difficulty>, bool) {
    if args.height.is_none() && args.width.is_none() && args.mines.is_none() {
        return (None, false);
    }

    let (default_rows, default_cols, default_mines) = DEFAULT_CUSTOM.dimensions();
    let difficulty = Difficulty::Custom {
        rows: args.height.unwrap_or(default_rows),
        cols: args.width.unwrap_or(default_cols),
        mines: args.mines.unwrap_or(default_mines),
    };
    let jump_in = args.height.is_some() && args.width.is_some() && args.mines.is_some();

    (Some(difficulty), jump_in)
}
