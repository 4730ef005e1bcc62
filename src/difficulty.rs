//! The standard board configurations plus a free-form one.
//!
//! The presets are a convention shared by the menu, the store and the
//! statistics code; the board engine itself accepts arbitrary dimensions and
//! never checks against them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom { rows: u8, cols: u8, mines: u16 },
}

impl Difficulty {
    /// `(rows, cols, mines)` for the board engine.
    pub fn dimensions(self) -> (u8, u8, u16) {
        match self {
            Difficulty::Easy => (8, 8, 10),
            Difficulty::Medium => (12, 12, 30),
            Difficulty::Hard => (16, 16, 60),
            Difficulty::Custom { rows, cols, mines } => (rows, cols, mines),
        }
    }

    /// The label stored with finished games and used to bucket best times.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Custom { .. } => "custom",
        }
    }

    /// Only the presets track best times; custom boards are incomparable.
    pub fn tracks_best_time(self) -> bool {
        !matches!(self, Difficulty::Custom { .. })
    }

    /// The next difficulty in menu order, wrapping around. A `Custom` entry
    /// keeps the dimensions it was left with.
    pub fn cycled_forward(self, custom: Difficulty) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => custom,
            Difficulty::Custom { .. } => Difficulty::Easy,
        }
    }

    /// The previous difficulty in menu order, wrapping around.
    pub fn cycled_backward(self, custom: Difficulty) -> Difficulty {
        match self {
            Difficulty::Easy => custom,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Custom { .. } => Difficulty::Hard,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Custom { .. } => write!(f, "Custom"),
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Difficulty;

    #[test]
    fn presets_match_the_standard_table() {
        assert_eq!(Difficulty::Easy.dimensions(), (8, 8, 10));
        assert_eq!(Difficulty::Medium.dimensions(), (12, 12, 30));
        assert_eq!(Difficulty::Hard.dimensions(), (16, 16, 60));
    }

    #[test]
    fn custom_boards_do_not_track_best_times() {
        assert!(Difficulty::Easy.tracks_best_time());
        assert!(!Difficulty::Custom {
            rows: 5,
            cols: 5,
            mines: 5
        }
        .tracks_best_time());
    }

    #[test]
    fn cycling_walks_the_menu_order_both_ways() {
        let custom = Difficulty::Custom {
            rows: 10,
            cols: 10,
            mines: 12,
        };

        assert_eq!(Difficulty::Easy.cycled_forward(custom), Difficulty::Medium);
        assert_eq!(Difficulty::Hard.cycled_forward(custom), custom);
        // one full lap lands back at the start
        assert_eq!(
            Difficulty::Easy
                .cycled_forward(custom)
                .cycled_forward(custom)
                .cycled_forward(custom)
                .cycled_forward(custom),
            Difficulty::Easy
        );
        assert_eq!(Difficulty::Easy.cycled_backward(custom), custom);
        assert_eq!(custom.cycled_backward(custom), Difficulty::Hard);
    }
}
