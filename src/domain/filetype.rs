use std::{fmt::Display, path::Path};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum FileType {
    MP3,
    M4A,
    OGG,
    WAV,
    FLAC,
}

impl TryFrom<&str> for FileType {
    type Error = ();

    fn try_from(ext: &str) -> Result<Self, Self::Error> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::MP3),
            "m4a" => Ok(Self::M4A),
            "ogg" => Ok(Self::OGG),
            "flac" => Ok(Self::FLAC),
            "wav" => Ok(Self::WAV),
            _ => Err(()),
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            FileType::MP3 => write!(f, "mp3"),
            FileType::M4A => write!(f, "m4a"),
            FileType::OGG => write!(f, "ogg"),
            FileType::WAV => write!(f, "wav"),
            FileType::FLAC => write!(f, "flac"),
        }
    }
}

impl FileType {
    /// Returns `None` for anything we refuse to hand to the audio backend.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| FileType::try_from(ext).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(FileType::from_path("a/B.MP3"), Some(FileType::MP3));
        assert_eq!(FileType::from_path("song.Flac"), Some(FileType::FLAC));
        assert_eq!(FileType::from_path("notes.txt"), None);
        assert_eq!(FileType::from_path("no_extension"), None);
    }
}
