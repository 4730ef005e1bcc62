//! Key routing: every screen interprets the keyboard its own way, so the
//! dispatch happens on the app variant first. The login screen consumes raw
//! characters for its input fields; the other screens map keys to actions.

use crate::app::{
    App, AppVariant, GameScreen, LoginScreen, MenuScreen, MoveCursorDirection, StatsScreen,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sapper::account::Accounts;

pub fn update(app: &mut App, key_event: KeyEvent) {
    // Ctrl+C bails out from anywhere
    if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
        app.quit();
        return;
    }

    let App {
        variant, accounts, ..
    } = app;

    match variant {
        AppVariant::AtLogin(login) => handle_login_key(login, accounts, key_event),
        AppVariant::AtMenu(menu) => handle_menu_key(menu, key_event),
        AppVariant::InGame(game) => handle_game_key(game, accounts, key_event),
        AppVariant::AtStats(stats) => handle_stats_key(stats, accounts, key_event),
    }
}

fn handle_login_key(login: &mut LoginScreen, accounts: &mut Accounts, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => login.skip(),
        KeyCode::Tab => login.toggle_mode(),
        KeyCode::Up | KeyCode::Down => login.switch_field(),
        KeyCode::Enter => login.submit(accounts),
        KeyCode::Backspace => login.erase_char(),
        KeyCode::Char(character) => login.type_char(character),
        _ => {}
    }
}

fn handle_menu_key(menu: &mut MenuScreen, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('w') => menu.select_previous(),
        KeyCode::Down | KeyCode::Char('s') => menu.select_next(),
        KeyCode::Left | KeyCode::Char('a') => menu.adjust(false),
        KeyCode::Right | KeyCode::Char('d') => menu.adjust(true),
        KeyCode::Enter | KeyCode::Char(' ') => menu.request_start(),
        KeyCode::Char('t') => menu.should_open_stats = true,
        KeyCode::Char('o') => menu.should_sign_out = true,
        KeyCode::Esc | KeyCode::Char('q') => menu.should_quit = true,
        _ => {}
    }
}

fn handle_game_key(game: &mut GameScreen, accounts: &mut Accounts, key_event: KeyEvent) {
    use MoveCursorDirection::{Down, Left, Right, Up};

    match key_event.code {
        KeyCode::Up | KeyCode::Char('w') => game.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('a') => game.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('s') => game.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('d') => game.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => game.main_action(accounts),
        KeyCode::Char('f') => game.toggle_flag(),
        KeyCode::Char('p') => game.toggle_pause(),
        KeyCode::Esc | KeyCode::Char('q') => game.leave_or_confirm(),
        _ => {}
    }
}

fn handle_stats_key(stats: &mut StatsScreen, accounts: &Accounts, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Left | KeyCode::Char('a') => stats.switch_difficulty(accounts, false),
        KeyCode::Right | KeyCode::Char('d') => stats.switch_difficulty(accounts, true),
        KeyCode::Esc | KeyCode::Char('q') => stats.should_leave = true,
        _ => {}
    }
}
