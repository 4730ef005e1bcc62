//! The statistics screen renderer.

use crate::app::StatsScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};

const BORDER_COLOR: Color = Color::Yellow;
const ERROR_TEXT_COLOR: Color = Color::Red;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

const LEGEND_TEXT: [&str; 2] = [
    "[←][→] / [a][d]: switch the leaderboard difficulty",
    "[q] / [ESC]: back to the menu",
];

pub fn render_stats(stats: &mut StatsScreen, frame: &mut Frame) {
    let (summary_container, leaderboard_container, error_container, legend_container) =
        create_screen_layout(&frame.size());

    // 1. The player summary (guests have none).
    let summary_lines = match &stats.summary {
        Some(summary) => vec![
            format!("Player: {}", summary.username),
            String::new(),
            format!("Games played: {}", summary.total_games),
            format!("Games won: {}", summary.games_won),
            format!("Games lost: {}", summary.games_lost),
            format!("Win rate: {:.1}%", summary.win_rate),
            String::new(),
            format!("Best time (easy): {}", format_best_time(summary.best_time_easy)),
            format!(
                "Best time (medium): {}",
                format_best_time(summary.best_time_medium)
            ),
            format!("Best time (hard): {}", format_best_time(summary.best_time_hard)),
        ],
        None => vec![
            "Playing as a guest.".to_string(),
            String::new(),
            "Sign in to track games, win rate".to_string(),
            "and best times.".to_string(),
        ],
    };

    frame.render_widget(
        Paragraph::new(summary_lines.join("\n")).block(
            Block::default()
                .title("Statistics")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .padding(ratatui::widgets::Padding::horizontal(2)),
        ),
        summary_container,
    );

    // 2. The leaderboard for the selected difficulty.
    let leaderboard_rows: Vec<Row> = if stats.leaderboard.is_empty() {
        vec![Row::new(["".to_string(), "no wins recorded yet".to_string()])]
    } else {
        stats
            .leaderboard
            .iter()
            .enumerate()
            .map(|(index, (username, seconds))| {
                Row::new([
                    format!("{}.", index + 1),
                    username.clone(),
                    format!("{}s", seconds),
                ])
            })
            .collect()
    };

    frame.render_widget(
        Table::new(
            leaderboard_rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(70),
                Constraint::Percentage(30),
            ],
        )
        .block(
            Block::default()
                .title(format!(
                    "Best times — {}",
                    stats.leaderboard_difficulty
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .padding(ratatui::widgets::Padding::horizontal(2)),
        ),
        leaderboard_container,
    );

    // 3. A store problem, if loading hit one.
    if let Some(error) = &stats.error {
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

fn format_best_time(best: Option<u64>) -> String {
    match best {
        Some(seconds) => format!("{}s", seconds),
        None => "—".to_string(),
    }
}

fn create_screen_layout(container: &Rect) -> (Rect, Rect, Rect, Rect) {
    let legend_container_height = LEGEND_TEXT.len() as u16;
    let error_container_height = 1;

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(error_container_height),
            Constraint::Length(legend_container_height),
        ])
        .split(*container)
        .to_vec();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([50, 50]))
        .margin(1)
        .split(vertical_layout[0])
        .to_vec();

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(vertical_layout[2])[1];

    (halves[0], halves[1], vertical_layout[1], legend_container)
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
