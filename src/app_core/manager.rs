use super::events::{LibraryEvent, Subscriber};
use crate::{
    Database, ManagerError, Playlist, Settings,
    database::DATABASE_FILENAME,
    domain::{FileType, Track},
    library::probe_duration,
    player::{PlaybackState, PlayerEvent, PlayerHandle},
    stats::{PlayCounts, RecentlyPlayed, UpcomingSongs},
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::Path,
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info, warn};

/// Snapshot of what the player is doing, for display.
pub struct Status {
    pub current: Option<Arc<Track>>,
    pub state: PlaybackState,
    pub elapsed: Duration,
    pub volume: f32,
}

/// The single owner of application state. Front-ends call its
/// operations and listen for `LibraryEvent`s.
pub struct MusicManager {
    settings: Settings,
    db: Database,
    player: PlayerHandle,

    playlist: Playlist,
    counts: PlayCounts,
    history: RecentlyPlayed,
    upcoming: UpcomingSongs,

    /// Playlist cursor used by next/prev.
    current: Option<Arc<Track>>,
    /// Song loaded in the player. Differs from `current` after a shuffle.
    playing: Option<Arc<Track>>,
    subscribers: Vec<Subscriber>,
}

impl MusicManager {
    /// Open the stats database in the data directory and start
    /// playback on the default output device.
    pub fn open(settings: Settings) -> Result<Self> {
        fs::create_dir_all(&settings.data_dir).with_context(|| {
            format!("Could not create data directory {}", settings.data_dir.display())
        })?;

        let db = Database::open(settings.data_dir.join(DATABASE_FILENAME))?;
        let player = PlayerHandle::spawn_default()?;

        Self::new(settings, db, player)
    }

    pub fn new(settings: Settings, mut db: Database, player: PlayerHandle) -> Result<Self> {
        if db.import_legacy_json(&settings.data_dir)? {
            info!("Migrated play counts from JSON");
        }

        let counts = db.load_play_counts()?;
        let history = db.load_history(settings.history_capacity)?;
        player.set_volume(settings.volume)?;

        Ok(MusicManager {
            upcoming: UpcomingSongs::with_capacity(settings.queue_capacity),
            settings,
            db,
            player,

            playlist: Playlist::new(),
            counts,
            history,

            current: None,
            playing: None,
            subscribers: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&LibraryEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn emit(&mut self, event: LibraryEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    pub fn load_songs(&mut self) -> Result<usize> {
        let added = self
            .playlist
            .load_from_dir(&self.settings.songs_dir, self.settings.playlist_limit)?;

        if added > 0 {
            self.emit(LibraryEvent::PlaylistChanged);
        }
        Ok(added)
    }
}

// ==============
//    PLAYBACK
// ==============

impl MusicManager {
    fn lookup(&self, title: &str) -> Result<Arc<Track>> {
        self.playlist
            .find(title)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound(title.to_string()).into())
    }

    fn play_track(&mut self, track: Arc<Track>) -> Result<()> {
        self.player.play(track.path(), Duration::ZERO)?;

        self.history.push(track.title());
        let plays = self.counts.add_play(track.title());
        debug!(title = track.title(), plays, "Now playing");

        self.current = Some(Arc::clone(&track));
        self.playing = Some(Arc::clone(&track));
        self.emit(LibraryEvent::NowPlaying(track.title().to_string()));
        self.emit(LibraryEvent::HistoryChanged);
        Ok(())
    }

    /// Play the song at a 1-based playlist position.
    pub fn play_index(&mut self, number: usize) -> Result<()> {
        let track = number
            .checked_sub(1)
            .and_then(|idx| self.playlist.get(idx))
            .cloned()
            .ok_or(ManagerError::IndexOutOfRange(number))?;

        self.play_track(track)
    }

    pub fn play_title(&mut self, title: &str) -> Result<()> {
        let track = self.lookup(title)?;
        self.play_track(track)
    }

    fn require_loaded(&self) -> Result<()> {
        match self.current.is_some() {
            true => Ok(()),
            false => Err(ManagerError::NothingLoaded.into()),
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.player.pause()?;
        self.emit(LibraryEvent::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.player.resume()?;
        self.emit(LibraryEvent::Resumed);
        Ok(())
    }

    /// The worker decides between pause and resume.
    pub fn toggle_pause(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.player.toggle_playback()?;
        self.emit(LibraryEvent::PlaybackToggled);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.player.stop()?;
        self.playing = None;
        self.emit(LibraryEvent::Stopped);
        Ok(())
    }

    pub fn next(&mut self) -> Result<()> {
        let current = self.current.clone().ok_or(ManagerError::NothingLoaded)?;
        let next = self
            .playlist
            .next_of(current.title())
            .cloned()
            .ok_or(ManagerError::EndOfPlaylist)?;

        self.play_track(next)
    }

    pub fn prev(&mut self) -> Result<()> {
        let current = self.current.clone().ok_or(ManagerError::NothingLoaded)?;
        let prev = self
            .playlist
            .prev_of(current.title())
            .cloned()
            .ok_or(ManagerError::StartOfPlaylist)?;

        self.play_track(prev)
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<f32> {
        let volume = self.player.set_volume(volume)?;
        self.emit(LibraryEvent::VolumeChanged(volume));
        Ok(volume)
    }

    pub fn seek_forward(&mut self, secs: Option<u64>) -> Result<()> {
        self.require_loaded()?;
        self.player
            .seek_forward(secs.unwrap_or(self.settings.seek_step_secs))
    }

    pub fn seek_back(&mut self, secs: Option<u64>) -> Result<()> {
        self.require_loaded()?;
        self.player
            .seek_back(secs.unwrap_or(self.settings.seek_step_secs))
    }

    /// Drain worker events, advancing to the next song when one ends.
    pub fn handle_player_events(&mut self) -> Result<()> {
        for event in self.player.poll_events() {
            match event {
                PlayerEvent::TrackStarted(_) => (),
                PlayerEvent::TrackEnded(path) => {
                    // Ignore end events for a song we already moved away from
                    let is_playing = self
                        .playing
                        .as_ref()
                        .is_some_and(|track| track.path() == path.as_path());

                    if is_playing {
                        self.advance_after_end()?;
                    }
                }
                PlayerEvent::Error(e) => {
                    warn!("Player error: {e}");
                    self.emit(LibraryEvent::Error(e));
                }
            }
        }
        Ok(())
    }

    fn advance_after_end(&mut self) -> Result<()> {
        self.playing = None;
        if !self.upcoming.is_empty() {
            return self.play_next_upcoming();
        }

        if self.settings.autoplay {
            let next = self
                .current
                .as_ref()
                .and_then(|track| self.playlist.next_of(track.title()))
                .cloned();

            if let Some(next) = next {
                return self.play_track(next);
            }
        }

        self.emit(LibraryEvent::Stopped);
        Ok(())
    }
}

// ====================
//    QUEUE & HISTORY
// ====================

impl MusicManager {
    /// Queue a playlist song. Returns the title as spelled in the playlist.
    pub fn enqueue(&mut self, title: &str) -> Result<String> {
        let track = self.lookup(title)?;
        self.upcoming.enqueue(track.title());
        self.emit(LibraryEvent::QueueChanged);
        Ok(track.title().to_string())
    }

    /// Play the next queued song. The entry is consumed even if the
    /// song has since been deleted from the playlist.
    pub fn play_next_upcoming(&mut self) -> Result<()> {
        let title = self.upcoming.dequeue().ok_or(ManagerError::QueueEmpty)?;
        self.emit(LibraryEvent::QueueChanged);

        let track = self.lookup(&title)?;
        self.play_track(track)
    }

    pub fn remove_upcoming(&mut self, number: usize) -> Result<String> {
        let removed = number
            .checked_sub(1)
            .and_then(|idx| self.upcoming.remove(idx))
            .ok_or(ManagerError::IndexOutOfRange(number))?;

        self.emit(LibraryEvent::QueueChanged);
        Ok(removed)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.emit(LibraryEvent::HistoryChanged);
    }
}

// ==============
//    PLAYLIST
// ==============

impl MusicManager {
    /// Shuffle and put the cursor back on the first song.
    pub fn shuffle(&mut self) {
        self.playlist.shuffle();
        self.current = self.playlist.first().cloned();
        self.emit(LibraryEvent::PlaylistChanged);
    }

    /// Remove a song. Deleting the song being played stops playback.
    pub fn delete(&mut self, title: &str) -> Result<Arc<Track>> {
        let removed = self.playlist.delete(title)?;

        let is_removed = |track: &Option<Arc<Track>>| {
            track.as_ref().is_some_and(|t| t.key() == removed.key())
        };

        if is_removed(&self.current) {
            self.current = None;
        }
        if is_removed(&self.playing) {
            self.player.stop()?;
            self.playing = None;
            self.emit(LibraryEvent::Stopped);
        }

        info!(title = removed.title(), "Deleted from playlist");
        self.emit(LibraryEvent::PlaylistChanged);
        Ok(removed)
    }

    /// Copy an audio file into the songs directory and append it.
    pub fn add_song(&mut self, source: impl AsRef<Path>) -> Result<Arc<Track>> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(ManagerError::FileNotFound(source.to_path_buf()).into());
        }
        if FileType::from_path(source).is_none() {
            return Err(ManagerError::UnsupportedFile(source.to_path_buf()).into());
        }
        if self.playlist.len() >= self.settings.playlist_limit {
            return Err(ManagerError::PlaylistFull(self.settings.playlist_limit).into());
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| ManagerError::UnsupportedFile(source.to_path_buf()))?;
        let destination = self.settings.songs_dir.join(file_name);

        // Validate before touching the filesystem
        let track = Track::from_path(&destination)?;
        if self.playlist.find(track.title()).is_some() {
            return Err(ManagerError::DuplicateTitle(track.title).into());
        }

        fs::create_dir_all(&self.settings.songs_dir)?;
        if !same_file(source, &destination) {
            fs::copy(source, &destination).with_context(|| {
                format!("Could not copy {} into the songs folder", source.display())
            })?;
        }

        let duration = probe_duration(&destination);
        let added = self.playlist.append(track.with_duration(duration))?;

        info!(title = added.title(), "Added to playlist");
        self.emit(LibraryEvent::PlaylistChanged);
        Ok(added)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ===============
//    ACCESSORS
// ===============

impl MusicManager {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current(&self) -> Option<&Arc<Track>> {
        self.current.as_ref()
    }

    pub fn status(&self) -> Status {
        Status {
            current: self.playing.clone().or_else(|| self.current.clone()),
            state: self.player.get_playback_state(),
            elapsed: self.player.elapsed(),
            volume: self.player.volume(),
        }
    }

    pub fn search(&self, query: &str) -> Vec<Arc<Track>> {
        self.playlist.search(query)
    }

    pub fn fuzzy_search(&self, query: &str) -> Vec<Arc<Track>> {
        self.playlist.fuzzy_search(query)
    }

    pub fn sorted(&self) -> Vec<Arc<Track>> {
        self.playlist.sorted()
    }

    pub fn sorted_titles(&self) -> Vec<String> {
        self.playlist
            .sorted()
            .iter()
            .map(|track| track.title().to_string())
            .collect()
    }

    /// Title of the current song while it is playing or paused.
    pub fn now_playing(&self) -> Option<&str> {
        match self.player.is_stopped() {
            true => None,
            false => self.playing.as_ref().map(|track| track.title()),
        }
    }

    pub fn upcoming(&self) -> Vec<&str> {
        self.upcoming.iter().collect()
    }

    /// Most recent first.
    pub fn history(&self) -> Vec<&str> {
        self.history.get_all()
    }

    pub fn play_count(&self, title: &str) -> u32 {
        self.counts.count(title)
    }

    pub fn top_played(&self, n: usize) -> Vec<(String, u32)> {
        self.counts.top_n(n)
    }

    pub fn songs_dir(&self) -> &Path {
        &self.settings.songs_dir
    }
}

// =================
//    PERSISTENCE
// =================

impl MusicManager {
    pub fn save(&mut self) -> Result<()> {
        self.db.save_stats(&self.counts, &self.history)
    }

    /// Persist stats and stop the playback worker.
    pub fn shutdown(&mut self) -> Result<()> {
        let saved = self.save();
        self.player.shutdown();
        saved
    }
}
