//! The game renderer.

use crate::app::GameScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table},
};
use sapper::{BoardView, CellView};
use std::cmp;

/// Terminal columns per cell: the symbol plus a spacer.
const CELL_WIDTH: u16 = 2;
/// Terminal rows per cell.
const CELL_HEIGHT: u16 = 1;

const CLOSED_SYMBOL: char = '#';
const FLAG_SYMBOL: char = 'F';
const MINE_SYMBOL: char = '*';
const WRONG_FLAG_SYMBOL: char = 'X';
const BLANK_SYMBOL: char = ' ';

const BOARD_BORDER_COLOR: Color = Color::Yellow;
const COUNTER_BORDER_COLOR: Color = Color::LightYellow;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;
const ERROR_TEXT_COLOR: Color = Color::Red;
const PAUSED_POPUP_BORDER_COLOR: Color = Color::LightYellow;
const VICTORY_POPUP_BORDER_COLOR: Color = Color::Green;
const LOSS_POPUP_BORDER_COLOR: Color = Color::Red;
const LEAVE_POPUP_BORDER_COLOR: Color = Color::Red;

const LEGEND_TEXT: [&str; 5] = [
    "[↑][←][↓][→] / [w][a][s][d]: move the cursor",
    "[SPACE] / [ENTER]: reveal the selected cell",
    "[f]: toggle flag for the selected cell",
    "[p]: pause the game",
    "[q] / [ESC]: leave",
];
const PAUSED_POPUP_TEXT: [&str; 3] = ["Paused", "", "(Press [p] to continue)"];
const VICTORY_LINE_TEXT: &str = "You won!";
const LOSS_LINE_TEXT: &str = "You stepped on a mine...";
const OUTCOME_POPUP_TEXT: [&str; 4] = [
    "",
    "Use:",
    "[SPACE] / [ENTER] to play again",
    "[q] / [ESC] to go back to the menu",
];
const LEAVE_CONFIRMATION_POPUP_TEXT: [&str; 6] = [
    "Abandon this game?",
    "It will not count towards your statistics.",
    "",
    "Use:",
    "[SPACE] / [ENTER] - CONFIRM",
    "[q] / [ESC] - CANCEL",
];

pub fn render_game(game: &mut GameScreen, player_name: Option<&str>, frame: &mut Frame) {
    let view = game.game.view();

    let (header_container, board_container, counters, legend_container, error_container) =
        create_screen_layout(&frame.size());

    // 1. The header: who is playing what.
    let header_text = format!(
        "{} — {} ({}x{}, {} mines)",
        player_name.unwrap_or("Guest"),
        game.game.difficulty(),
        view.rows,
        view.cols,
        view.mine_count,
    );
    frame.render_widget(
        Paragraph::new(header_text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("sapper"),
            ),
        header_container,
    );

    // 2. The board, unless the game is paused (a paused board is hidden so
    //    the clock can't be cheated).
    if game.game.is_paused() {
        render_popup(
            frame,
            PAUSED_POPUP_TEXT.map(str::to_string),
            PAUSED_POPUP_BORDER_COLOR,
        );
    } else {
        render_board(game, &view, board_container, frame);
    }

    // 3. The counters: flags placed, the (signed) mine counter and the clock.
    let (flags_container, mines_container, time_container) = counters;
    frame.render_widget(
        counter_widget("flags", game.game.flagged_count().to_string()),
        flags_container,
    );
    frame.render_widget(
        counter_widget("mines left", game.game.remaining_mines().to_string()),
        mines_container,
    );
    frame.render_widget(
        counter_widget("time", format_duration(game.game.elapsed_seconds())),
        time_container,
    );

    // 4. The legend.
    frame.render_widget(legend_widget(), legend_container);

    // 5. A store problem, if one came up while recording the game.
    if let Some(error) = &game.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(ERROR_TEXT_COLOR)),
            error_container,
        );
    }

    // 6. The outcome popup once the game has ended.
    if game.game.is_over() {
        let first_line = if game.game.is_won() {
            VICTORY_LINE_TEXT.to_string()
        } else {
            LOSS_LINE_TEXT.to_string()
        };
        let time_line = format!("Time: {}", format_duration(game.game.elapsed_seconds()));

        let mut lines = vec![first_line, time_line];
        lines.extend(OUTCOME_POPUP_TEXT.map(str::to_string));

        let border_color = if game.game.is_won() {
            VICTORY_POPUP_BORDER_COLOR
        } else {
            LOSS_POPUP_BORDER_COLOR
        };

        render_popup(frame, lines, border_color);
    }

    // 7. The leave confirmation popup, on top of everything else.
    if game.awaiting_leave_confirmation {
        render_popup(
            frame,
            LEAVE_CONFIRMATION_POPUP_TEXT.map(str::to_string),
            LEAVE_POPUP_BORDER_COLOR,
        );
    }
}

/// Vertically: header, board, counters, legend and an error line. The
/// counters row is split into three equal boxes.
fn create_screen_layout(container: &Rect) -> (Rect, Rect, (Rect, Rect, Rect), Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(LEGEND_TEXT.len() as u16),
            Constraint::Length(1),
        ])
        .split(*container)
        .to_vec();

    let counter_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([25, 17, 16, 17, 25]))
        .split(rows[2])
        .to_vec();

    (
        rows[0],
        rows[1],
        (
            counter_containers[1],
            counter_containers[2],
            counter_containers[3],
        ),
        rows[3],
        rows[4],
    )
}

/// Renders the visible part of the grid and keeps the screen's idea of the
/// window in sync with the space actually available.
fn render_board(game: &mut GameScreen, view: &BoardView, container: Rect, frame: &mut Frame) {
    // how much of the board fits inside the border
    let inner_height = container.height.saturating_sub(2);
    let inner_width = container.width.saturating_sub(2);
    let visible_rows = cmp::min(view.rows as u16, inner_height / CELL_HEIGHT) as u8;
    let visible_cols = cmp::min(view.cols as u16, inner_width / CELL_WIDTH) as u8;

    game.visible_rows = visible_rows;
    game.visible_cols = visible_cols;

    // the window may have shrunk; keep the offset legal and the cursor inside
    let max_row_offset = view.rows - visible_rows.min(view.rows);
    let max_col_offset = view.cols - visible_cols.min(view.cols);
    game.window_offset.0 = cmp::min(game.window_offset.0, max_row_offset);
    game.window_offset.1 = cmp::min(game.window_offset.1, max_col_offset);

    let (offset_row, offset_col) = game.window_offset;
    let game_lost = view.game_over && !view.game_won;

    let mut lines: Vec<Line> = Vec::with_capacity(visible_rows as usize);
    for row in offset_row..offset_row + visible_rows {
        let mut spans: Vec<Span> = Vec::with_capacity(visible_cols as usize);

        for col in offset_col..offset_col + visible_cols {
            let cell_view = view.cells[row as usize][col as usize];
            let (mut symbol, mut style) = cell_appearance(cell_view, game_lost);

            if game.cursor == (row, col) && !view.game_over {
                style = style.add_modifier(Modifier::REVERSED);
                if symbol == BLANK_SYMBOL {
                    symbol = '·';
                }
            }

            spans.push(Span::styled(format!("{} ", symbol), style));
        }

        lines.push(Line::from(spans));
    }

    // a windowed board names the visible range in the title
    let title = if visible_rows < view.rows || visible_cols < view.cols {
        format!(
            "rows {}-{}, cols {}-{}",
            offset_row,
            offset_row + visible_rows.saturating_sub(1),
            offset_col,
            offset_col + visible_cols.saturating_sub(1),
        )
    } else {
        String::new()
    };

    let board_area = centered_area(
        container,
        visible_cols as u16 * CELL_WIDTH + 2,
        visible_rows as u16 * CELL_HEIGHT + 2,
    );

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(BOARD_BORDER_COLOR)),
        ),
        board_area,
    );
}

/// What one cell looks like on screen.
fn cell_appearance(cell_view: CellView, game_lost: bool) -> (char, Style) {
    match cell_view {
        // a flag that survived the loss reveal marks a wrong guess
        CellView::Flagged if game_lost => (
            WRONG_FLAG_SYMBOL,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        CellView::Flagged => (FLAG_SYMBOL, Style::default().fg(Color::Yellow)),
        CellView::Hidden => (CLOSED_SYMBOL, Style::default().fg(Color::DarkGray)),
        CellView::Mine => (
            MINE_SYMBOL,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        CellView::Open(0) => (BLANK_SYMBOL, Style::default()),
        CellView::Open(amount) => (
            char::from_digit(amount as u32, 10).unwrap_or('?'),
            number_style(amount),
        ),
    }
}

fn number_style(amount: u8) -> Style {
    let color = match amount {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::Magenta,
        5 => Color::Yellow,
        6 => Color::Cyan,
        _ => Color::White,
    };

    Style::default().fg(color)
}

/// A rectangle of the given size centered inside the container, clipped to
/// it.
fn centered_area(container: Rect, width: u16, height: u16) -> Rect {
    let width = cmp::min(width, container.width);
    let height = cmp::min(height, container.height);

    Rect {
        x: container.x + (container.width - width) / 2,
        y: container.y + (container.height - height) / 2,
        width,
        height,
    }
}

fn counter_widget(title: &str, value: String) -> Paragraph<'_> {
    Paragraph::new(value).alignment(Alignment::Center).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(COUNTER_BORDER_COLOR)),
    )
}

/// Formats the play time as `MM:SS`.
fn format_duration(seconds: u64) -> String {
    format!("{:0>2}:{:0>2}", seconds / 60, seconds % 60)
}

fn legend_widget() -> Table<'static> {
    let rows = LEGEND_TEXT.map(|legend_row| {
        let cells = legend_row.split_at(
            legend_row
                .find(':')
                .expect("every legend row carries a `:` delimiter"),
        );

        Row::new([
            Line::from(cells.0).alignment(Alignment::Right),
            Line::from(cells.1).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50]))
        .style(Style::default().fg(LEGEND_TEXT_COLOR))
}

/// Builds a popup with the provided lines, sized to its contents, and renders
/// it in the center of the screen over whatever is already there.
fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();

    let longest_line = lines.iter().map(String::len).max().unwrap_or(0) as u16;
    let popup_width = cmp::min(longest_line + 4, frame.size().width);
    let popup_height = cmp::min(lines.len() as u16 + 2, frame.size().height);

    let container = centered_area(frame.size(), popup_width, popup_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Clear, container);
    frame.render_widget(
        Paragraph::new(lines.join("\n"))
            .alignment(Alignment::Center)
            .block(block),
        container,
    );
}
