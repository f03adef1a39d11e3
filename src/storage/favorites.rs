//! Favorite leagues.
//!
//! A single process-wide list persisted under the `favoriteLeagues` key.
//! Writers are serialized by a mutex; readers can `list` or `subscribe` to
//! a watch channel that always holds the current list.

use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, warn};

use super::{LocalStore, StorageConfig, StorageError};
use crate::models::{FavoriteLeague, LeagueId};

/// Storage key of the favorites array.
pub const FAVORITES_KEY: &str = "favoriteLeagues";

pub struct FavoritesStore {
    local: LocalStore,
    state: Mutex<State>,
    tx: watch::Sender<Vec<FavoriteLeague>>,
    /// Why the persisted list could not be read; such a store never writes.
    unreadable: Option<String>,
}

struct State {
    leagues: Vec<FavoriteLeague>,
    dirty: bool,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("path", &self.local.path())
            .field("unreadable", &self.unreadable)
            .finish()
    }
}

impl FavoritesStore {
    /// Load the persisted list. Entries that cannot be read are dropped,
    /// as are repeated league ids. An unreadable file or a non-array value
    /// opens an empty store that refuses to write, so the file survives.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let local = LocalStore::new(config.local_storage_path());
        let (leagues, unreadable) = match local.get_raw(FAVORITES_KEY) {
            Ok(Some(Value::Array(items))) => (
                dedup(
                    items
                        .into_iter()
                        .filter_map(|item| match serde_json::from_value(item) {
                            Ok(fav) => Some(fav),
                            Err(e) => {
                                warn!("Dropping unreadable favorite: {}", e);
                                None
                            }
                        })
                        .collect(),
                ),
                None,
            ),
            Ok(Some(_)) => (
                Vec::new(),
                Some(format!("{} does not hold an array", FAVORITES_KEY)),
            ),
            Ok(None) => (Vec::new(), None),
            Err(StorageError::Corrupt { reason, .. }) => (Vec::new(), Some(reason)),
            Err(e) => return Err(e),
        };
        match &unreadable {
            Some(reason) => warn!("Favorites are read-only: {}", reason),
            None => info!("Loaded {} favorite leagues", leagues.len()),
        }

        let (tx, _rx) = watch::channel(leagues.clone());
        Ok(Self {
            local,
            state: Mutex::new(State {
                leagues,
                dirty: false,
            }),
            tx,
            unreadable,
        })
    }

    pub fn list(&self) -> Vec<FavoriteLeague> {
        self.tx.borrow().clone()
    }

    pub fn contains(&self, league: LeagueId) -> bool {
        self.tx.borrow().iter().any(|f| f.league_id == league)
    }

    /// Remove `league` if present, add it otherwise; persist and return the
    /// new list. When the write fails the change stays in memory and
    /// `flush` retries it.
    pub fn toggle(&self, league: FavoriteLeague) -> Result<Vec<FavoriteLeague>, StorageError> {
        if let Some(reason) = &self.unreadable {
            return Err(StorageError::Corrupt {
                path: self.local.path().display().to_string(),
                reason: reason.clone(),
            });
        }
        let mut state = self.state.lock().map_err(|_| StorageError::Poisoned)?;

        match state.leagues.iter().position(|f| f.league_id == league.league_id) {
            Some(idx) => {
                state.leagues.remove(idx);
                info!("Removed league {} from favorites", league.league_id);
            }
            None => {
                info!("Added league {} to favorites", league.league_id);
                state.leagues.push(league);
            }
        }
        state.dirty = true;
        self.tx.send_replace(state.leagues.clone());

        self.persist(&mut state)?;
        Ok(state.leagues.clone())
    }

    /// Receiver that observes every change to the list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteLeague>> {
        self.tx.subscribe()
    }

    /// Write pending changes to disk; a no-op when nothing changed.
    pub fn flush(&self) -> Result<(), StorageError> {
        let mut state = self.state.lock().map_err(|_| StorageError::Poisoned)?;
        self.persist(&mut state)
    }

    fn persist(&self, state: &mut State) -> Result<(), StorageError> {
        if !state.dirty {
            return Ok(());
        }
        self.local.set(FAVORITES_KEY, &state.leagues)?;
        state.dirty = false;
        Ok(())
    }
}

impl Drop for FavoritesStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush favorites on shutdown: {}", e);
        }
    }
}

fn dedup(leagues: Vec<FavoriteLeague>) -> Vec<FavoriteLeague> {
    let mut out: Vec<FavoriteLeague> = Vec::with_capacity(leagues.len());
    for league in leagues {
        if !out.iter().any(|f| f.league_id == league.league_id) {
            out.push(league);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> FavoritesStore {
        FavoritesStore::open(&StorageConfig::new(temp_dir.path().to_path_buf())).unwrap()
    }

    fn premier_league() -> FavoriteLeague {
        FavoriteLeague::new(LeagueId::new(39), "Premier League")
    }

    #[test]
    fn test_toggle_twice_restores_list() {
        let temp_dir = TempDir::new().unwrap();
        let favorites = store(&temp_dir);
        favorites
            .toggle(FavoriteLeague::new(LeagueId::new(140), "La Liga"))
            .unwrap();
        let before = favorites.list();

        let added = favorites.toggle(premier_league()).unwrap();
        assert_eq!(added.len(), 2);
        assert!(favorites.contains(LeagueId::new(39)));

        let removed = favorites.toggle(premier_league()).unwrap();
        assert_eq!(removed, before);
        assert!(!favorites.contains(LeagueId::new(39)));
    }

    #[test]
    fn test_string_and_number_ids_are_the_same_favorite() {
        let temp_dir = TempDir::new().unwrap();
        let favorites = store(&temp_dir);

        let as_string: FavoriteLeague =
            serde_json::from_value(json!({"leagueId": "39", "name": "Premier League"})).unwrap();
        let as_number: FavoriteLeague =
            serde_json::from_value(json!({"leagueId": 39, "name": "Premier League"})).unwrap();

        assert_eq!(favorites.toggle(as_string).unwrap().len(), 1);
        assert!(favorites.toggle(as_number).unwrap().is_empty());
    }

    #[test]
    fn test_favorites_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let favorites = store(&temp_dir);
            favorites.toggle(premier_league()).unwrap();
        }

        let reopened = store(&temp_dir);
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.list()[0].name, "Premier League");

        let raw = std::fs::read_to_string(temp_dir.path().join("local_storage.json")).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc[FAVORITES_KEY][0]["leagueId"], 39);
    }

    #[test]
    fn test_open_drops_bad_and_duplicate_entries() {
        let temp_dir = TempDir::new().unwrap();
        let local = LocalStore::new(temp_dir.path().join("local_storage.json"));
        local
            .set(
                FAVORITES_KEY,
                &json!([
                    {"leagueId": 39, "name": "Premier League"},
                    {"leagueId": "39", "name": "Premier League"},
                    {"leagueId": "abc", "name": "Broken"},
                    {"leagueId": 78, "name": "Bundesliga"}
                ]),
            )
            .unwrap();

        let favorites = store(&temp_dir);
        let ids: Vec<u32> = favorites.list().iter().map(|f| f.league_id.get()).collect();
        assert_eq!(ids, vec![39, 78]);
    }

    #[test]
    fn test_read_only_use_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        {
            let favorites = store(&temp_dir);
            assert!(favorites.list().is_empty());
            favorites.flush().unwrap();
        }
        assert!(!temp_dir.path().join("local_storage.json").exists());
    }

    #[test]
    fn test_corrupt_file_survives_open_and_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");
        std::fs::write(&path, "{\"favoriteLeagues\": [{\"leagueId\": 39,").unwrap();

        {
            let favorites = store(&temp_dir);
            assert!(favorites.list().is_empty());
            assert!(matches!(
                favorites.toggle(premier_league()),
                Err(StorageError::Corrupt { .. })
            ));
            assert!(favorites.list().is_empty());
        }

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"favoriteLeagues\": [{\"leagueId\": 39,"
        );
    }

    #[test]
    fn test_non_array_value_and_other_keys_survive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");
        let original = r#"{"favoriteLeagues": {"39": true}, "theme": "dark"}"#;
        std::fs::write(&path, original).unwrap();

        {
            let favorites = store(&temp_dir);
            assert!(favorites.toggle(premier_league()).is_err());
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_toggle_keeps_unrelated_keys() {
        let temp_dir = TempDir::new().unwrap();
        let local = LocalStore::new(temp_dir.path().join("local_storage.json"));
        local.set("theme", &"dark").unwrap();

        let favorites = store(&temp_dir);
        favorites.toggle(premier_league()).unwrap();

        assert_eq!(local.get_raw("theme").unwrap(), Some(json!("dark")));
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let temp_dir = TempDir::new().unwrap();
        let favorites = store(&temp_dir);
        let mut rx = favorites.subscribe();
        assert!(rx.borrow().is_empty());

        favorites.toggle(premier_league()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
