use std::path::PathBuf;
use thiserror::Error;

/// Failures a user can cause and recover from. Everything else
/// (I/O, SQLite, channels) travels as `anyhow::Error`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Song not found: {0}")]
    NotFound(String),

    #[error("A song titled \"{0}\" is already in the playlist")]
    DuplicateTitle(String),

    #[error("Playlist is full ({0} songs)")]
    PlaylistFull(usize),

    #[error("No song is currently loaded")]
    NothingLoaded,

    #[error("This is the last song in the playlist")]
    EndOfPlaylist,

    #[error("This is the first song in the playlist")]
    StartOfPlaylist,

    #[error("Upcoming queue is empty")]
    QueueEmpty,

    #[error("Index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error("Unsupported file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
