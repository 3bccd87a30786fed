use super::{
    AudioBackend, PlaybackMetrics, PlaybackState, PlayerCommand, PlayerEvent, RodioBackend,
    core::PlayerCore,
};
use crate::ManagerError;
use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::{
    path::Path,
    sync::Arc,
    thread::JoinHandle,
    time::Duration,
};
use tracing::warn;

/// Caller-side end of the playback worker.
pub struct PlayerHandle {
    commands: Sender<PlayerCommand>,
    events: Receiver<PlayerEvent>,
    metrics: Arc<PlaybackMetrics>,
    worker: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    /// Spawn the worker thread around the backend built by `init`.
    pub fn spawn<F, B>(init: F) -> Result<Self>
    where
        F: FnOnce() -> Result<B> + Send + 'static,
        B: AudioBackend + 'static,
    {
        let (cmd_tx, cmd_rx) = unbounded();
        let (evt_tx, evt_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);
        let metrics = PlaybackMetrics::new();

        let worker = PlayerCore::spawn(init, cmd_rx, evt_tx, ready_tx, Arc::clone(&metrics));

        match ready_rx.recv() {
            Ok(Ok(())) => (),
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e.context("Failed to initialize audio backend"));
            }
            Err(_) => return Err(anyhow!("Player worker exited during startup")),
        }

        Ok(Self {
            commands: cmd_tx,
            events: evt_rx,
            metrics,
            worker: Some(worker),
        })
    }

    /// Spawn with the default output device.
    pub fn spawn_default() -> Result<Self> {
        Self::spawn(RodioBackend::new)
    }

    fn send(&self, cmd: PlayerCommand) -> Result<()> {
        self.commands.send(cmd)?;
        Ok(())
    }

    /// Stop whatever is playing and start `path` at `start`.
    pub fn play(&self, path: &Path, start: Duration) -> Result<()> {
        if !path.exists() {
            return Err(ManagerError::FileNotFound(path.to_path_buf()).into());
        }

        self.send(PlayerCommand::Play {
            path: path.to_path_buf(),
            start,
        })
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(PlayerCommand::Resume)
    }

    pub fn toggle_playback(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlayback)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(PlayerCommand::Stop)
    }

    /// Clamped to `0.0..=1.0`.
    pub fn set_volume(&self, volume: f32) -> Result<f32> {
        let volume = match volume.is_nan() {
            true => 0.0,
            false => volume.clamp(0.0, 1.0),
        };
        self.metrics.set_volume(volume);
        self.send(PlayerCommand::SetVolume(volume))?;
        Ok(volume)
    }

    pub fn seek_forward(&self, secs: u64) -> Result<()> {
        self.send(PlayerCommand::SeekForward(secs))
    }

    pub fn seek_back(&self, secs: u64) -> Result<()> {
        self.send(PlayerCommand::SeekBack(secs))
    }

    /// Stop playback and wait for the worker to exit.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.commands.send(PlayerCommand::Shutdown);
            if worker.join().is_err() {
                warn!("Player worker panicked");
            }
        }
    }
}

// ===============
//    ACCESSORS
// ===============

impl PlayerHandle {
    pub fn metrics(&self) -> Arc<PlaybackMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn elapsed(&self) -> Duration {
        self.metrics.get_elapsed()
    }

    pub fn volume(&self) -> f32 {
        self.metrics.get_volume()
    }

    pub fn get_playback_state(&self) -> PlaybackState {
        self.metrics.get_state()
    }

    pub fn is_playing(&self) -> bool {
        self.get_playback_state() == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.get_playback_state() == PlaybackState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.get_playback_state() == PlaybackState::Stopped
    }

    pub fn poll_events(&self) -> Vec<PlayerEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
