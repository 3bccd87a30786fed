use super::{AudioBackend, PlaybackMetrics, PlaybackState, PlayerCommand, PlayerEvent};
use crate::REFRESH_RATE;
use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::{
    path::PathBuf,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, warn};

pub(super) struct PlayerCore {
    backend: Box<dyn AudioBackend>,
    commands: Receiver<PlayerCommand>,
    events: Sender<PlayerEvent>,
    metrics: Arc<PlaybackMetrics>,

    current: Option<PathBuf>,
    volume: f32,
}

impl PlayerCore {
    /// Start the worker. The backend is built on the worker thread and
    /// the outcome is reported through `ready` before any command is read.
    pub(super) fn spawn<F, B>(
        init: F,
        commands: Receiver<PlayerCommand>,
        events: Sender<PlayerEvent>,
        ready: Sender<Result<()>>,
        metrics: Arc<PlaybackMetrics>,
    ) -> JoinHandle<()>
    where
        F: FnOnce() -> Result<B> + Send + 'static,
        B: AudioBackend + 'static,
    {
        thread::spawn(move || {
            let backend = match init() {
                Ok(backend) => backend,
                Err(e) => {
                    let _ = ready.send(Err(e));
                    return;
                }
            };
            let _ = ready.send(Ok(()));

            let volume = metrics.get_volume();
            let mut core = PlayerCore {
                backend: Box::new(backend),
                commands,
                events,
                metrics,

                current: None,
                volume,
            };

            core.run();
        })
    }

    fn run(&mut self) {
        loop {
            match self.commands.recv_timeout(REFRESH_RATE) {
                Ok(PlayerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    self.stop();
                    debug!("Player worker shutting down");
                    break;
                }
                Ok(cmd) => self.process_command(cmd),
                Err(RecvTimeoutError::Timeout) => (),
            }

            self.check_track_end();
            self.update_metrics();
        }
    }

    fn process_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Play { path, start } => self.play_song(path, start),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::TogglePlayback => self.toggle_playback(),
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::SetVolume(v) => self.set_volume(v),
            PlayerCommand::SeekForward(secs) => self.seek_forward(secs),
            PlayerCommand::SeekBack(secs) => self.seek_back(secs),
            PlayerCommand::Shutdown => self.stop(),
        }
    }

    fn check_track_end(&mut self) {
        // Checking `current` ensures the end event is sent once
        if self.current.is_some()
            && self.metrics.get_state() != PlaybackState::Paused
            && self.backend.is_stopped()
        {
            if let Some(path) = self.current.take() {
                self.metrics.reset();
                debug!(path = %path.display(), "Track ended");
                self.emit(PlayerEvent::TrackEnded(path));
            }
        }
    }

    fn update_metrics(&mut self) {
        if self.current.is_some() {
            self.metrics.set_elapsed(self.backend.position())
        }
    }

    fn play_song(&mut self, path: PathBuf, start: Duration) {
        self.current = None;
        self.backend.set_volume(self.volume);

        if let Err(e) = self.backend.play(&path, start) {
            warn!(path = %path.display(), "Playback failed: {e}");
            self.metrics.reset();
            self.emit(PlayerEvent::Error(format!(
                "Could not play {}: {e}",
                path.display()
            )));
            return;
        }

        self.current = Some(path.clone());
        self.metrics.set_elapsed(start);
        self.metrics.set_playback_state(PlaybackState::Playing);
        self.emit(PlayerEvent::TrackStarted(path));
    }

    fn pause(&mut self) {
        if self.current.is_some() {
            self.backend.pause();
            self.metrics.set_playback_state(PlaybackState::Paused);
        }
    }

    fn resume(&mut self) {
        if self.current.is_some() {
            self.backend.resume();
            self.metrics.set_playback_state(PlaybackState::Playing);
        }
    }

    fn toggle_playback(&mut self) {
        match self.metrics.get_state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => (),
        }
    }

    fn stop(&mut self) {
        self.backend.stop();
        self.current = None;
        self.metrics.reset();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.backend.set_volume(volume);
    }

    fn seek_forward(&mut self, secs: u64) {
        if self.current.is_some() {
            let target = self.backend.position() + Duration::from_secs(secs);
            self.seek_to(target);
        }
    }

    fn seek_back(&mut self, secs: u64) {
        if self.current.is_some() {
            let target = self
                .backend
                .position()
                .saturating_sub(Duration::from_secs(secs));
            self.seek_to(target);
        }
    }

    fn seek_to(&mut self, target: Duration) {
        match self.backend.seek(target) {
            Ok(()) => self.metrics.set_elapsed(self.backend.position()),
            Err(e) => self.emit(PlayerEvent::Error(format!("Seek failed: {e}"))),
        }
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }
}
