mod playlist;
mod scan;

pub use playlist::Playlist;

/// Default upper bound on the number of songs in the playlist.
pub const PLAYLIST_LIMIT: usize = 50;

pub(crate) use scan::probe_duration;
