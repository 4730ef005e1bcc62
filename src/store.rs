//! JSON-file persistence for players and finished games.
//!
//! Two files live under the data directory: `players.json` and `games.json`,
//! each a map keyed by a numeric id. Every operation reads the whole file and
//! rewrites it; the data involved is a handful of kilobytes, so simplicity
//! wins over cleverness here.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::board::BoardDump;
use crate::difficulty::Difficulty;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access the data files: {0}")]
    Io(#[from] io::Error),
    #[error("the data files hold invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("the username {0:?} is already taken")]
    UsernameTaken(String),
    #[error("no player named {0:?} is registered")]
    UnknownPlayer(String),
    #[error("no game with id {0} is recorded")]
    UnknownGame(u32),
}

/// A registered player and their accumulated statistics.
///
/// Best times are in whole seconds and only exist once the player has won at
/// that difficulty; custom boards never update them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub best_time_easy: Option<u64>,
    #[serde(default)]
    pub best_time_medium: Option<u64>,
    #[serde(default)]
    pub best_time_hard: Option<u64>,
}

impl Player {
    pub fn best_time(&self, difficulty: Difficulty) -> Option<u64> {
        match difficulty {
            Difficulty::Easy => self.best_time_easy,
            Difficulty::Medium => self.best_time_medium,
            Difficulty::Hard => self.best_time_hard,
            Difficulty::Custom { .. } => None,
        }
    }

    fn best_time_slot(&mut self, difficulty: Difficulty) -> Option<&mut Option<u64>> {
        match difficulty {
            Difficulty::Easy => Some(&mut self.best_time_easy),
            Difficulty::Medium => Some(&mut self.best_time_medium),
            Difficulty::Hard => Some(&mut self.best_time_hard),
            Difficulty::Custom { .. } => None,
        }
    }
}

/// One game row. Created when a game starts and completed when it ends; the
/// grids are only written at the end, from the engine's post-game dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u32,
    /// `None` for guest games.
    pub player_id: Option<u32>,
    pub difficulty: String,
    pub rows: u8,
    pub cols: u8,
    pub mines: u16,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub over: bool,
    #[serde(default)]
    pub final_board: Option<BoardDump>,
}

pub struct Store {
    players_path: PathBuf,
    games_path: PathBuf,
}

impl Store {
    /// Opens the store, creating the data directory and empty data files on
    /// first use.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let store = Store {
            players_path: dir.join("players.json"),
            games_path: dir.join("games.json"),
        };

        for path in [&store.players_path, &store.games_path] {
            if !path.exists() {
                fs::write(path, "{}")?;
            }
        }

        Ok(store)
    }

    /// Registers a new player. Usernames are unique, compared
    /// case-insensitively.
    pub fn register_player(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<Player, StoreError> {
        let mut players = self.read_players()?;

        if players
            .values()
            .any(|player| player.username.eq_ignore_ascii_case(username))
        {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let id = next_id(&players);
        let player = Player {
            id,
            username: username.to_string(),
            email: email.map(str::to_string),
            created_at: Utc::now(),
            total_games: 0,
            games_won: 0,
            best_time_easy: None,
            best_time_medium: None,
            best_time_hard: None,
        };

        players.insert(id, player.clone());
        self.write_players(&players)?;

        debug!("registered player {:?} with id {}", player.username, id);
        Ok(player)
    }

    pub fn player_by_id(&self, id: u32) -> Result<Option<Player>, StoreError> {
        Ok(self.read_players()?.remove(&id))
    }

    pub fn player_by_name(&self, username: &str) -> Result<Option<Player>, StoreError> {
        Ok(self
            .read_players()?
            .into_values()
            .find(|player| player.username.eq_ignore_ascii_case(username)))
    }

    /// Folds a finished game into a player's statistics: bumps the game
    /// counters and, for a won preset game, lowers the matching best time.
    /// Returns the updated player.
    pub fn record_result(
        &self,
        player_id: u32,
        won: bool,
        duration_seconds: u64,
        difficulty: Difficulty,
    ) -> Result<Player, StoreError> {
        let mut players = self.read_players()?;

        let player = players
            .get_mut(&player_id)
            .ok_or_else(|| StoreError::UnknownPlayer(format!("#{player_id}")))?;

        player.total_games += 1;
        if won {
            player.games_won += 1;

            if let Some(slot) = player.best_time_slot(difficulty) {
                if slot.map_or(true, |best| duration_seconds < best) {
                    *slot = Some(duration_seconds);
                }
            }
        }

        let updated = player.clone();
        self.write_players(&players)?;

        debug!(
            "recorded {} for player #{player_id} ({duration_seconds}s, {})",
            if won { "a win" } else { "a loss" },
            difficulty.label()
        );
        Ok(updated)
    }

    /// The best times at a difficulty, ascending, as `(username, seconds)`
    /// pairs. Players with no win at the difficulty don't appear.
    pub fn leaderboard(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<(String, u64)>, StoreError> {
        let mut entries: Vec<(String, u64)> = self
            .read_players()?
            .into_values()
            .filter_map(|player| {
                player
                    .best_time(difficulty)
                    .map(|best| (player.username, best))
            })
            .collect();

        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);

        Ok(entries)
    }

    /// Opens a game row when a game starts; the result fields stay empty
    /// until [`Store::finish_game`].
    pub fn start_game(
        &self,
        player_id: Option<u32>,
        difficulty: Difficulty,
    ) -> Result<u32, StoreError> {
        let mut games = self.read_games()?;

        let (rows, cols, mines) = difficulty.dimensions();
        let id = next_id(&games);

        games.insert(
            id,
            GameRecord {
                id,
                player_id,
                difficulty: difficulty.label().to_string(),
                rows,
                cols,
                mines,
                started_at: Utc::now(),
                finished_at: None,
                duration_seconds: None,
                won: false,
                over: false,
                final_board: None,
            },
        );
        self.write_games(&games)?;

        Ok(id)
    }

    /// Completes a game row with its outcome, duration and final grids.
    pub fn finish_game(
        &self,
        game_id: u32,
        won: bool,
        duration_seconds: u64,
        final_board: Option<BoardDump>,
    ) -> Result<(), StoreError> {
        let mut games = self.read_games()?;

        let record = games
            .get_mut(&game_id)
            .ok_or(StoreError::UnknownGame(game_id))?;

        record.finished_at = Some(Utc::now());
        record.duration_seconds = Some(duration_seconds);
        record.won = won;
        record.over = true;
        record.final_board = final_board;

        self.write_games(&games)?;

        debug!("closed game row #{game_id} (won: {won})");
        Ok(())
    }

    pub fn game_by_id(&self, game_id: u32) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.read_games()?.remove(&game_id))
    }

    fn read_players(&self) -> Result<BTreeMap<u32, Player>, StoreError> {
        read_map(&self.players_path)
    }

    fn write_players(&self, players: &BTreeMap<u32, Player>) -> Result<(), StoreError> {
        write_map(&self.players_path, players)
    }

    fn read_games(&self) -> Result<BTreeMap<u32, GameRecord>, StoreError> {
        read_map(&self.games_path)
    }

    fn write_games(&self, games: &BTreeMap<u32, GameRecord>) -> Result<(), StoreError> {
        write_map(&self.games_path, games)
    }
}

fn next_id<V>(map: &BTreeMap<u32, V>) -> u32 {
    map.keys().next_back().map_or(1, |max| max + 1)
}

fn read_map<V: for<'de> Deserialize<'de>>(path: &Path) -> Result<BTreeMap<u32, V>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        // a missing file is the same as an empty one
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(error) => Err(error.into()),
    }
}

fn write_map<V: Serialize>(path: &Path, map: &BTreeMap<u32, V>) -> Result<(), StoreError> {
    Ok(fs::write(path, serde_json::to_string_pretty(map)?)?)
}

#[cfg(test)]
mod test {
    use super::{Store, StoreError};
    use crate::board::BoardDump;
    use crate::difficulty::Difficulty;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A throwaway data directory under the system temp dir, unique per test
    /// within the process.
    fn scratch_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let dir = std::env::temp_dir().join(format!(
            "sapper-store-{}-{}-{}",
            label,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        // leftovers from a crashed run
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn opening_creates_the_data_files() {
        let dir = scratch_dir("open");
        let _store = Store::open(&dir).unwrap();

        assert!(dir.join("players.json").exists());
        assert!(dir.join("games.json").exists());
    }

    #[test]
    fn registration_round_trips_through_the_file() {
        let store = Store::open(scratch_dir("register")).unwrap();

        let registered = store.register_player("ada", Some("ada@example.com")).unwrap();
        assert_eq!(registered.id, 1);

        let loaded = store.player_by_name("ada").unwrap().unwrap();
        assert_eq!(loaded, registered);
        assert_eq!(store.player_by_id(1).unwrap().unwrap(), registered);
    }

    #[test]
    fn usernames_are_unique_ignoring_case() {
        let store = Store::open(scratch_dir("unique")).unwrap();
        store.register_player("ada", None).unwrap();

        assert!(matches!(
            store.register_player("ADA", None),
            Err(StoreError::UsernameTaken(_))
        ));
    }

    #[test]
    fn ids_keep_growing_across_registrations() {
        let store = Store::open(scratch_dir("ids")).unwrap();

        assert_eq!(store.register_player("one", None).unwrap().id, 1);
        assert_eq!(store.register_player("two", None).unwrap().id, 2);
        assert_eq!(store.register_player("three", None).unwrap().id, 3);
    }

    #[test]
    fn unknown_players_read_back_as_none() {
        let store = Store::open(scratch_dir("unknown")).unwrap();

        assert!(store.player_by_name("nobody").unwrap().is_none());
        assert!(store.player_by_id(42).unwrap().is_none());
    }

    #[test]
    fn a_won_game_bumps_both_counters_and_the_best_time() {
        let store = Store::open(scratch_dir("win")).unwrap();
        let player = store.register_player("ada", None).unwrap();

        let updated = store
            .record_result(player.id, true, 95, Difficulty::Easy)
            .unwrap();

        assert_eq!(updated.total_games, 1);
        assert_eq!(updated.games_won, 1);
        assert_eq!(updated.best_time_easy, Some(95));
        assert_eq!(updated.best_time_medium, None);
    }

    #[test]
    fn a_lost_game_bumps_only_the_total() {
        let store = Store::open(scratch_dir("loss")).unwrap();
        let player = store.register_player("ada", None).unwrap();

        let updated = store
            .record_result(player.id, false, 20, Difficulty::Easy)
            .unwrap();

        assert_eq!(updated.total_games, 1);
        assert_eq!(updated.games_won, 0);
        assert_eq!(updated.best_time_easy, None);
    }

    #[test]
    fn best_times_only_move_down() {
        let store = Store::open(scratch_dir("best")).unwrap();
        let player = store.register_player("ada", None).unwrap();

        store
            .record_result(player.id, true, 95, Difficulty::Easy)
            .unwrap();
        let slower = store
            .record_result(player.id, true, 140, Difficulty::Easy)
            .unwrap();
        assert_eq!(slower.best_time_easy, Some(95));

        let faster = store
            .record_result(player.id, true, 61, Difficulty::Easy)
            .unwrap();
        assert_eq!(faster.best_time_easy, Some(61));
    }

    #[test]
    fn custom_games_never_touch_best_times() {
        let store = Store::open(scratch_dir("custom")).unwrap();
        let player = store.register_player("ada", None).unwrap();

        let updated = store
            .record_result(
                player.id,
                true,
                5,
                Difficulty::Custom {
                    rows: 4,
                    cols: 4,
                    mines: 1,
                },
            )
            .unwrap();

        assert_eq!(updated.games_won, 1);
        assert_eq!(updated.best_time_easy, None);
        assert_eq!(updated.best_time_medium, None);
        assert_eq!(updated.best_time_hard, None);
    }

    #[test]
    fn the_leaderboard_sorts_ascending_and_truncates() {
        let store = Store::open(scratch_dir("leaderboard")).unwrap();

        for (name, seconds) in [("slow", 300), ("fast", 45), ("middle", 120), ("loser", 0)] {
            let player = store.register_player(name, None).unwrap();
            if name != "loser" {
                store
                    .record_result(player.id, true, seconds, Difficulty::Medium)
                    .unwrap();
            }
        }

        let top = store.leaderboard(Difficulty::Medium, 2).unwrap();
        assert_eq!(
            top,
            vec![("fast".to_string(), 45), ("middle".to_string(), 120)]
        );

        // nobody has a hard-mode time yet
        assert!(store.leaderboard(Difficulty::Hard, 10).unwrap().is_empty());
    }

    #[test]
    fn a_game_row_is_opened_and_then_completed() {
        let store = Store::open(scratch_dir("game-row")).unwrap();
        let player = store.register_player("ada", None).unwrap();

        let game_id = store
            .start_game(Some(player.id), Difficulty::Easy)
            .unwrap();

        let open_row = store.game_by_id(game_id).unwrap().unwrap();
        assert!(!open_row.over);
        assert!(open_row.finished_at.is_none());
        assert_eq!(open_row.difficulty, "easy");
        assert_eq!((open_row.rows, open_row.cols, open_row.mines), (8, 8, 10));

        let final_board = BoardDump {
            values: vec![vec![-1]],
            revealed: vec![vec![true]],
            flagged: vec![vec![false]],
        };
        store
            .finish_game(game_id, false, 33, Some(final_board.clone()))
            .unwrap();

        let closed_row = store.game_by_id(game_id).unwrap().unwrap();
        assert!(closed_row.over);
        assert!(!closed_row.won);
        assert_eq!(closed_row.duration_seconds, Some(33));
        assert_eq!(closed_row.final_board, Some(final_board));
    }

    #[test]
    fn guest_games_persist_without_a_player() {
        let store = Store::open(scratch_dir("guest")).unwrap();

        let game_id = store.start_game(None, Difficulty::Hard).unwrap();
        let row = store.game_by_id(game_id).unwrap().unwrap();

        assert_eq!(row.player_id, None);
    }

    #[test]
    fn finishing_an_unknown_game_errors() {
        let store = Store::open(scratch_dir("missing-game")).unwrap();

        assert!(matches!(
            store.finish_game(7, true, 1, None),
            Err(StoreError::UnknownGame(7))
        ));
    }

    #[test]
    fn recording_against_an_unknown_player_errors() {
        let store = Store::open(scratch_dir("missing-player")).unwrap();

        assert!(matches!(
            store.record_result(9, true, 1, Difficulty::Easy),
            Err(StoreError::UnknownPlayer(_))
        ));
    }
}
