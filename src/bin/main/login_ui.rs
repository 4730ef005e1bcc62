//! The login screen renderer.

use crate::app::{LoginField, LoginMode, LoginScreen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};

const BOX_WIDTH: u16 = 46;
const BOX_HEIGHT: u16 = 9;

const BORDER_COLOR: Color = Color::Yellow;
const FOCUSED_FIELD_COLOR: Color = Color::Yellow;
const DIMMED_FIELD_COLOR: Color = Color::DarkGray;
const ERROR_TEXT_COLOR: Color = Color::Red;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

const LEGEND_TEXT: [&str; 4] = [
    "[TAB]: switch between sign in and register",
    "[↑][↓]: switch field",
    "[ENTER]: submit",
    "[ESC]: play as a guest",
];

pub fn render_login(login: &mut LoginScreen, frame: &mut Frame) {
    let (box_container, error_container, legend_container) = create_screen_layout(&frame.size());

    let title = match login.mode {
        LoginMode::SignIn => "Sign in",
        LoginMode::Register => "Register",
    };

    // the input fields, with a caret on the focused one
    let username_focused = login.focus == LoginField::Username;
    let mut paragraph_lines = vec![
        Line::raw(""),
        field_line("Username", &login.username, username_focused),
    ];
    if login.mode == LoginMode::Register {
        paragraph_lines.push(Line::raw(""));
        paragraph_lines.push(field_line(
            "Email (optional)",
            &login.email,
            !username_focused,
        ));
    }

    frame.render_widget(
        Paragraph::new(paragraph_lines).alignment(Alignment::Left).block(
            Block::default()
                .title(title)
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .padding(ratatui::widgets::Padding::horizontal(2)),
        ),
        box_container,
    );

    if let Some(error) = &login.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(ERROR_TEXT_COLOR)),
            error_container,
        );
    }

    frame.render_widget(legend_widget(), legend_container);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let caret = if focused { "_" } else { "" };
    let color = if focused {
        FOCUSED_FIELD_COLOR
    } else {
        DIMMED_FIELD_COLOR
    };

    Line::styled(
        format!("{}: {}{}", label, value, caret),
        Style::default().fg(color),
    )
}

fn create_screen_layout(container: &Rect) -> (Rect, Rect, Rect) {
    let legend_container_height = LEGEND_TEXT.len() as u16;
    let error_container_height = 3;
    let box_area_height = container
        .height
        .saturating_sub(legend_container_height + error_container_height);

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            box_area_height,
            error_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    // center the fixed-size box inside the top area
    let box_vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            vertical_layout[0].height.saturating_sub(BOX_HEIGHT) / 2,
            BOX_HEIGHT,
            vertical_layout[0].height.saturating_sub(BOX_HEIGHT) / 2,
        ]))
        .split(vertical_layout[0]);

    let box_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            container.width.saturating_sub(BOX_WIDTH) / 2,
            BOX_WIDTH,
            container.width.saturating_sub(BOX_WIDTH) / 2,
        ]))
        .split(box_vertical[1])[1];

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(vertical_layout[2])[1];

    (box_container, vertical_layout[1], legend_container)
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
