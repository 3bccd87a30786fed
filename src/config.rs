use crate::{
    expand_tilde,
    library::PLAYLIST_LIMIT,
    stats::{HISTORY_CAPACITY, QUEUE_CAPACITY},
};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIRECTORY: &str = "playdeck";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder scanned for songs, and where added songs are copied.
    pub songs_dir: PathBuf,
    /// Folder holding the stats database.
    pub data_dir: PathBuf,
    pub playlist_limit: usize,
    pub history_capacity: usize,
    pub queue_capacity: usize,
    pub volume: f32,
    pub top_n: usize,
    /// Continue with the next playlist song when a track ends
    /// and the upcoming queue is empty.
    pub autoplay: bool,
    pub seek_step_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(CONFIG_DIRECTORY))
            .unwrap_or_else(|| PathBuf::from("data"));

        Settings {
            songs_dir: data_dir.join("songs"),
            data_dir,
            playlist_limit: PLAYLIST_LIMIT,
            history_capacity: HISTORY_CAPACITY,
            queue_capacity: QUEUE_CAPACITY,
            volume: 1.0,
            top_n: 10,
            autoplay: true,
            seek_step_secs: 5,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(CONFIG_FILENAME))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Settings::default()
                }
            },
        };

        settings.resolved()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let settings = Self::from_toml_str(&file_str)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        debug!(path = %path.display(), "Loaded config");
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str::<Settings>(raw)?)
    }

    /// Expand `~` in paths and reject values that cannot work.
    pub fn resolved(mut self) -> Result<Self> {
        self.songs_dir = expand_tilde(&self.songs_dir)?;
        self.data_dir = expand_tilde(&self.data_dir)?;

        if self.playlist_limit == 0 {
            return Err(anyhow!("playlist_limit must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(anyhow!("volume must be between 0.0 and 1.0"));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            songs_dir = "/srv/music"
            autoplay = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.songs_dir, PathBuf::from("/srv/music"));
        assert!(!settings.autoplay);
        assert_eq!(settings.playlist_limit, 50);
        assert_eq!(settings.history_capacity, 500);
        assert_eq!(settings.queue_capacity, 10);
        assert_eq!(settings.top_n, 10);
    }

    #[test]
    fn rejects_bad_values() {
        let settings = Settings::from_toml_str("volume = 3.0").unwrap();
        assert!(settings.resolved().is_err());

        let settings = Settings::from_toml_str("playlist_limit = 0").unwrap();
        assert!(settings.resolved().is_err());

        assert!(Settings::from_toml_str("volume = \"loud\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn loads_and_expands_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "data_dir = \"/tmp/playdeck-data\"\ntop_n = 3\n").unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/playdeck-data"));
        assert_eq!(settings.top_n, 3);
    }

    #[test]
    fn serializes_back_to_toml() {
        let settings = Settings::default();
        let raw = toml::to_string(&settings).unwrap();
        assert_eq!(Settings::from_toml_str(&raw).unwrap(), settings);
    }
}
