//! The difficulty menu renderer.

use crate::app::{MenuItem, MenuScreen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};
use sapper::Difficulty;

const MENU_WIDTH: u16 = 44;
const ITEM_HEIGHT: u16 = 3;

const SELECTED_BG_COLOR: Color = Color::Yellow;
const SELECTED_FG_COLOR: Color = Color::Black;
const BORDER_COLOR: Color = Color::Yellow;
const ERROR_TEXT_COLOR: Color = Color::Red;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

const LEGEND_TEXT: [&str; 5] = [
    "[↑][↓] / [w][s]: select an option",
    "[←][→] / [a][d]: change the selected option",
    "[SPACE] / [ENTER]: start the game",
    "[t]: statistics  [o]: sign out",
    "[q] / [ESC]: quit",
];

pub fn render_menu(menu: &mut MenuScreen, player_name: Option<&str>, frame: &mut Frame) {
    let (title_container, menu_container, error_container, legend_container) =
        create_screen_layout(&frame.size());

    // 1. Who is about to play.
    frame.render_widget(
        Paragraph::new(format!("Playing as {}", player_name.unwrap_or("Guest")))
            .alignment(Alignment::Center),
        title_container,
    );

    // 2. The menu items. Preset difficulties collapse the three size rows.
    let items = menu_items(menu);
    let item_count = items.len() as u16;
    let (menu_block_container, item_containers) =
        create_menu_layout(&menu_container, item_count);

    for (index, (item, text)) in items.into_iter().enumerate() {
        let style = if menu.selected == item {
            Style::default().bg(SELECTED_BG_COLOR).fg(SELECTED_FG_COLOR)
        } else {
            Style::default()
        };

        frame.render_widget(
            Paragraph::new(format!("\n{}", text))
                .alignment(Alignment::Center)
                .style(style),
            item_containers[index],
        );
    }

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
        menu_block_container,
    );

    // 3. The error line (a board configuration the engine refused, usually).
    if let Some(error) = &menu.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(ERROR_TEXT_COLOR)),
            error_container,
        );
    }

    // 4. The legend.
    frame.render_widget(legend_widget(), legend_container);
}

/// The rows the menu currently shows: the difficulty selector always, the
/// size rows only for custom boards.
fn menu_items(menu: &MenuScreen) -> Vec<(MenuItem, String)> {
    let (rows, cols, mines) = menu.difficulty.dimensions();

    let mut items = vec![(
        MenuItem::Difficulty,
        format!("Difficulty: < {} >", menu.difficulty),
    )];

    if matches!(menu.difficulty, Difficulty::Custom { .. }) {
        items.push((MenuItem::Rows, format!("Height: < {} >", rows)));
        items.push((MenuItem::Cols, format!("Width: < {} >", cols)));
        items.push((MenuItem::Mines, format!("Mines: < {} >", mines)));
    } else {
        items.push((
            MenuItem::Rows,
            format!("{}x{}, {} mines", rows, cols, mines),
        ));
    }

    items
}

fn create_screen_layout(container: &Rect) -> (Rect, Rect, Rect, Rect) {
    let error_container_height = 3;
    let legend_container_height = LEGEND_TEXT.len() as u16;
    let title_container_height = 2;
    let menu_container_height = container
        .height
        .saturating_sub(error_container_height + legend_container_height + title_container_height);

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            title_container_height,
            menu_container_height,
            error_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(vertical_layout[3])[1];

    (
        vertical_layout[0],
        vertical_layout[1],
        vertical_layout[2],
        legend_container,
    )
}

/// Centers a fixed-size box for the menu and splits it into one container
/// per item.
fn create_menu_layout(container: &Rect, item_count: u16) -> (Rect, Vec<Rect>) {
    let box_height = ITEM_HEIGHT * item_count + 2;

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            container.height.saturating_sub(box_height) / 2,
            box_height,
            container.height.saturating_sub(box_height) / 2,
        ]))
        .split(*container);

    let menu_box = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            container.width.saturating_sub(MENU_WIDTH) / 2,
            MENU_WIDTH,
            container.width.saturating_sub(MENU_WIDTH) / 2,
        ]))
        .split(vertical_layout[1])[1];

    let item_containers = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..item_count).map(|_| Constraint::Length(ITEM_HEIGHT)))
        .margin(1)
        .split(menu_box)
        .to_vec();

    (menu_box, item_containers)
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
