//! Who is sitting at the keyboard.
//!
//! `Accounts` wraps the store with the current-player notion: logging in,
//! registering, guest play and folding finished games into the player's
//! statistics. The cached player is refreshed after every stats update so
//! the summary always reflects what the file says.

use log::info;
use thiserror::Error;

use crate::difficulty::Difficulty;
use crate::store::{Player, Store, StoreError};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("a username is required")]
    EmptyUsername,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Accounts {
    store: Store,
    current: Option<Player>,
}

impl Accounts {
    pub fn new(store: Store) -> Self {
        Accounts {
            store,
            current: None,
        }
    }

    /// The underlying store, for callers that also keep game rows.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The player currently logged in; `None` during guest play.
    pub fn current(&self) -> Option<&Player> {
        self.current.as_ref()
    }

    /// Logs an existing player in by name.
    pub fn log_in(&mut self, username: &str) -> Result<&Player, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }

        let player = self
            .store
            .player_by_name(username)?
            .ok_or_else(|| StoreError::UnknownPlayer(username.to_string()))?;

        info!("player {:?} logged in", player.username);
        Ok(self.current.insert(player))
    }

    /// Registers a new player and logs them in.
    pub fn register(
        &mut self,
        username: &str,
        email: Option<&str>,
    ) -> Result<&Player, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }

        let email = email.map(str::trim).filter(|email| !email.is_empty());
        let player = self.store.register_player(username, email)?;

        info!("player {:?} registered", player.username);
        Ok(self.current.insert(player))
    }

    pub fn log_out(&mut self) {
        self.current = None;
    }

    /// Folds a finished game into the current player's statistics. A no-op
    /// for guests — their games persist as anonymous rows, but there is no
    /// profile to update.
    pub fn record_result(
        &mut self,
        won: bool,
        duration_seconds: u64,
        difficulty: Difficulty,
    ) -> Result<(), AccountError> {
        let Some(player) = &self.current else {
            return Ok(());
        };

        let updated = self
            .store
            .record_result(player.id, won, duration_seconds, difficulty)?;
        self.current = Some(updated);

        Ok(())
    }

    /// The current player's statistics, shaped for display. `None` for
    /// guests.
    pub fn summary(&self) -> Option<StatsSummary> {
        self.current.as_ref().map(|player| {
            let lost = player.total_games - player.games_won;
            let win_rate = if player.total_games == 0 {
                0.0
            } else {
                player.games_won as f64 * 100.0 / player.total_games as f64
            };

            StatsSummary {
                username: player.username.clone(),
                total_games: player.total_games,
                games_won: player.games_won,
                games_lost: lost,
                win_rate,
                best_time_easy: player.best_time_easy,
                best_time_medium: player.best_time_medium,
                best_time_hard: player.best_time_hard,
            }
        })
    }

    pub fn leaderboard(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<(String, u64)>, AccountError> {
        Ok(self.store.leaderboard(difficulty, limit)?)
    }
}

/// A player's statistics, aggregated for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub username: String,
    pub total_games: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub best_time_easy: Option<u64>,
    pub best_time_medium: Option<u64>,
    pub best_time_hard: Option<u64>,
}

#[cfg(test)]
mod test {
    use super::{AccountError, Accounts};
    use crate::difficulty::Difficulty;
    use crate::store::{Store, StoreError};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_accounts(label: &str) -> Accounts {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let dir: PathBuf = std::env::temp_dir().join(format!(
            "sapper-accounts-{}-{}-{}",
            label,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_dir_all(&dir);

        Accounts::new(Store::open(dir).unwrap())
    }

    #[test]
    fn registering_logs_the_player_in() {
        let mut accounts = scratch_accounts("register");

        accounts.register("ada", None).unwrap();

        assert_eq!(accounts.current().unwrap().username, "ada");
    }

    #[test]
    fn blank_usernames_are_rejected() {
        let mut accounts = scratch_accounts("blank");

        assert!(matches!(
            accounts.register("   ", None),
            Err(AccountError::EmptyUsername)
        ));
        assert!(matches!(
            accounts.log_in(""),
            Err(AccountError::EmptyUsername)
        ));
    }

    #[test]
    fn logging_in_requires_a_registered_name() {
        let mut accounts = scratch_accounts("login");

        assert!(matches!(
            accounts.log_in("nobody"),
            Err(AccountError::Store(StoreError::UnknownPlayer(_)))
        ));

        accounts.register("ada", None).unwrap();
        accounts.log_out();
        assert!(accounts.current().is_none());

        accounts.log_in("ADA").unwrap();
        assert_eq!(accounts.current().unwrap().username, "ada");
    }

    #[test]
    fn whitespace_around_inputs_is_trimmed() {
        let mut accounts = scratch_accounts("trim");

        accounts.register("  ada ", Some("   ")).unwrap();

        let player = accounts.current().unwrap();
        assert_eq!(player.username, "ada");
        assert_eq!(player.email, None);
    }

    #[test]
    fn results_update_the_cached_player() {
        let mut accounts = scratch_accounts("results");
        accounts.register("ada", None).unwrap();

        accounts.record_result(true, 70, Difficulty::Easy).unwrap();
        accounts.record_result(false, 15, Difficulty::Easy).unwrap();

        let summary = accounts.summary().unwrap();
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.games_won, 1);
        assert_eq!(summary.games_lost, 1);
        assert!((summary.win_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(summary.best_time_easy, Some(70));
    }

    #[test]
    fn guests_have_no_summary_and_record_nothing() {
        let mut accounts = scratch_accounts("guest");

        assert!(accounts.summary().is_none());
        // silently skipped, not an error
        accounts.record_result(true, 10, Difficulty::Easy).unwrap();
    }

    #[test]
    fn the_leaderboard_is_visible_to_guests_too() {
        let mut accounts = scratch_accounts("leaderboard");
        accounts.register("ada", None).unwrap();
        accounts.record_result(true, 42, Difficulty::Hard).unwrap();
        accounts.log_out();

        let board = accounts.leaderboard(Difficulty::Hard, 10).unwrap();
        assert_eq!(board, vec![("ada".to_string(), 42)]);
    }
}
