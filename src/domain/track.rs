use super::{FileType, SongInfo};
use crate::{DurationStyle, ManagerError, get_readable_duration, normalize_title};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// A single audio file in the playlist. The title is the file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub(crate) title: String,
    pub(crate) path: PathBuf,
    pub(crate) format: FileType,
    pub(crate) duration: Option<Duration>,
}

impl Track {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, ManagerError> {
        let path = path.into();

        let format = FileType::from_path(&path)
            .ok_or_else(|| ManagerError::UnsupportedFile(path.clone()))?;

        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::trim)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ManagerError::UnsupportedFile(path.clone()))?
            .to_string();

        Ok(Track {
            title,
            path,
            format,
            duration: None,
        })
    }

    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileType {
        self.format
    }

    pub fn key(&self) -> String {
        normalize_title(&self.title)
    }
}

impl SongInfo for Track {
    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_duration(&self) -> Option<Duration> {
        self.duration
    }

    fn get_duration_str(&self) -> String {
        match self.duration {
            Some(d) => get_readable_duration(d, DurationStyle::Compact),
            None => String::from("--:--"),
        }
    }
}
