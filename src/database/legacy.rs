use super::Database;
use crate::stats::{PlayCounts, RecentlyPlayed};
use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};
use tracing::{info, warn};

pub const LEGACY_PLAY_COUNTS: &str = "play_counts.json";
pub const LEGACY_HISTORY: &str = "history.json";

impl Database {
    /// One-time import of the JSON dumps older versions wrote into the
    /// data directory. Only runs while the store holds no play counts
    /// and no history;
    /// imported files are renamed with an `.imported` suffix.
    pub fn import_legacy_json(&mut self, data_dir: &Path) -> Result<bool> {
        if self.has_play_counts()? || self.has_history()? {
            return Ok(false);
        }

        let counts_path = data_dir.join(LEGACY_PLAY_COUNTS);
        let history_path = data_dir.join(LEGACY_HISTORY);
        if !counts_path.exists() && !history_path.exists() {
            return Ok(false);
        }

        let mut counts = PlayCounts::new();
        if counts_path.exists() {
            match read_json::<HashMap<String, u32>>(&counts_path) {
                Ok(map) => map
                    .iter()
                    .for_each(|(title, count)| counts.set(title, *count)),
                Err(e) => warn!("Ignoring unreadable {LEGACY_PLAY_COUNTS}: {e:#}"),
            }
        }

        let mut history = RecentlyPlayed::default();
        if history_path.exists() {
            match read_json::<Vec<String>>(&history_path) {
                // Dumped most recent first
                Ok(titles) => titles.iter().rev().for_each(|t| history.push(t)),
                Err(e) => warn!("Ignoring unreadable {LEGACY_HISTORY}: {e:#}"),
            }
        }

        self.save_stats(&counts, &history)?;

        for path in [&counts_path, &history_path] {
            if path.exists() {
                fs::rename(path, path.with_extension("json.imported"))?;
            }
        }

        info!(
            plays = counts.len(),
            history = history.len(),
            "Imported legacy JSON stats"
        );
        Ok(true)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}
