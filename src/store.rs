//! Player store.
//!
//! A small key-value store of [`PlayerRecord`]s behind the [`PlayerStore`]
//! trait; the shipped implementation persists to a pretty-printed JSON file
//! under the app data directory, writing through on every mutation.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::zones::ZoneName;

/// One player's stored shooting record. Updates replace the per-zone maps
/// wholesale; a record is never left half-written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Shooting percentage per zone
    pub percentages: BTreeMap<ZoneName, f64>,
    /// Made shots per zone, scaled to `games_played`
    pub made_shots: BTreeMap<ZoneName, u32>,
    /// Attempts per zone, scaled to `games_played`
    pub attempts: BTreeMap<ZoneName, u32>,
    /// The standardized game count the stats are scaled to
    pub games_played: u32,
    /// The game count the raw data was collected over
    pub original_games: u32,
    pub updated_at: String,
}

impl PlayerRecord {
    pub fn new(
        percentages: BTreeMap<ZoneName, f64>,
        made_shots: BTreeMap<ZoneName, u32>,
        attempts: BTreeMap<ZoneName, u32>,
        games_played: u32,
        original_games: u32,
    ) -> Self {
        Self {
            percentages,
            made_shots,
            attempts,
            games_played,
            original_games,
            updated_at: timestamp(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = timestamp();
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// The externally-owned player store, seen by the core as a black box.
pub trait PlayerStore {
    fn get(&self, name: &str) -> Option<&PlayerRecord>;
    /// Name-ordered; this order also fixes similarity tie-breaks and
    /// matrix row order.
    fn get_all(&self) -> &BTreeMap<String, PlayerRecord>;
    fn put(&mut self, name: &str, record: PlayerRecord) -> Result<()>;
    fn remove(&mut self, name: &str) -> Result<bool>;
    fn count(&self) -> usize;
}

/// JSON-file-backed store. Loads once on open; saves on every mutation so
/// a crash never loses committed writes.
pub struct JsonPlayerStore {
    path: PathBuf,
    players: BTreeMap<String, PlayerRecord>,
}

impl JsonPlayerStore {
    pub fn open(path: &Path) -> Self {
        let players = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(players) => players,
                Err(e) => {
                    log::warn!(
                        "Player store {} is malformed ({}), starting empty",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            players,
        }
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.players)
            .context("Failed to serialize player store")?;
        fs::write(&self.path, json)
            .context(format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl PlayerStore for JsonPlayerStore {
    fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(name)
    }

    fn get_all(&self) -> &BTreeMap<String, PlayerRecord> {
        &self.players
    }

    fn put(&mut self, name: &str, record: PlayerRecord) -> Result<()> {
        self.players.insert(name.to_string(), record);
        self.save()
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        let removed = self.players.remove(name).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    fn count(&self) -> usize {
        self.players.len()
    }
}

/// Projects the store down to the percentage maps the similarity engine
/// consumes.
pub fn percentages_by_player(store: &dyn PlayerStore) -> BTreeMap<String, BTreeMap<ZoneName, f64>> {
    store
        .get_all()
        .iter()
        .map(|(name, record)| (name.clone(), record.percentages.clone()))
        .collect()
}
