mod backend_rodio;
mod core;
mod handle;
mod metrics;

pub use backend_rodio::RodioBackend;
pub use handle::PlayerHandle;
pub use metrics::PlaybackMetrics;

use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// The audio device seam. Implementations live on the player
/// worker thread and are never shared.
pub trait AudioBackend {
    /// Replace whatever is loaded with `path` and start at `start`.
    fn play(&mut self, path: &Path, start: Duration) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn position(&self) -> Duration;
    fn is_paused(&self) -> bool;
    /// True once nothing is left to play.
    fn is_stopped(&self) -> bool;
}

pub enum PlayerCommand {
    Play { path: PathBuf, start: Duration },
    Pause,
    Resume,
    TogglePlayback,
    Stop,
    SetVolume(f32),
    SeekForward(u64),
    SeekBack(u64),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TrackStarted(PathBuf),
    TrackEnded(PathBuf),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaybackState {
    Stopped = 0,
    Playing = 1,
    Paused = 2,
}

impl From<PlaybackState> for u8 {
    fn from(state: PlaybackState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for PlaybackState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlaybackState::Stopped),
            1 => Ok(PlaybackState::Playing),
            2 => Ok(PlaybackState::Paused),
            _ => Err(()),
        }
    }
}
