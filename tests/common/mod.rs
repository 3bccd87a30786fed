//! Shared fixtures: a scripted audio backend and a manager wired
//! to temp directories and an in-memory stats store.
#![allow(dead_code)]

use anyhow::Result;
use playdeck::{
    Database, MusicManager, PlayerHandle, Settings,
    player::AudioBackend,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tempfile::TempDir;

#[derive(Default)]
pub struct Deck {
    pub loaded: Option<PathBuf>,
    pub paused: bool,
    pub volume: f32,
    pub position: Duration,
    pub plays: Vec<PathBuf>,
}

pub struct FakeBackend(pub Arc<Mutex<Deck>>);

impl AudioBackend for FakeBackend {
    fn play(&mut self, path: &Path, start: Duration) -> Result<()> {
        let mut deck = self.0.lock().unwrap();
        deck.loaded = Some(path.to_path_buf());
        deck.plays.push(path.to_path_buf());
        deck.paused = false;
        deck.position = start;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.lock().unwrap().paused = true;
    }

    fn resume(&mut self) {
        self.0.lock().unwrap().paused = false;
    }

    fn stop(&mut self) {
        self.0.lock().unwrap().loaded = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.lock().unwrap().volume = volume;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.0.lock().unwrap().position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.0.lock().unwrap().position
    }

    fn is_paused(&self) -> bool {
        self.0.lock().unwrap().paused
    }

    fn is_stopped(&self) -> bool {
        self.0.lock().unwrap().loaded.is_none()
    }
}

pub struct Fixture {
    pub manager: MusicManager,
    pub deck: Arc<Mutex<Deck>>,
    pub root: TempDir,
}

impl Fixture {
    pub fn songs_dir(&self) -> PathBuf {
        self.root.path().join("songs")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    /// Simulate the current song running out.
    pub fn finish_track(&self) {
        self.deck.lock().unwrap().loaded = None;
    }

    pub fn loaded(&self) -> Option<PathBuf> {
        self.deck.lock().unwrap().loaded.clone()
    }

    pub fn play_log(&self) -> Vec<PathBuf> {
        self.deck.lock().unwrap().plays.clone()
    }

    /// Block until the worker has loaded `file` from the songs folder.
    pub fn wait_loaded(&self, file: &str) -> bool {
        let expected = self.songs_dir().join(file);
        wait_until(|| self.loaded().as_deref() == Some(expected.as_path()))
    }

    /// Pump player events until the manager reports `title` as current.
    pub fn wait_current(&mut self, title: &str) -> bool {
        let manager = &mut self.manager;
        wait_until(|| {
            manager.handle_player_events().unwrap();
            manager.current().is_some_and(|t| t.title() == title)
        })
    }
}

pub fn settings_in(root: &Path) -> Settings {
    Settings {
        songs_dir: root.join("songs"),
        data_dir: root.join("data"),
        ..Settings::default()
    }
}

pub fn spawn_player() -> (PlayerHandle, Arc<Mutex<Deck>>) {
    let deck = Arc::new(Mutex::new(Deck::default()));
    let shared = Arc::clone(&deck);
    let player = PlayerHandle::spawn(move || Ok(FakeBackend(shared))).unwrap();
    (player, deck)
}

/// Write placeholder audio files. The fake backend never decodes them.
pub fn write_songs(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"fake audio").unwrap();
    }
}

pub fn fixture_with(names: &[&str], tweak: impl FnOnce(&mut Settings)) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let mut settings = settings_in(root.path());
    tweak(&mut settings);
    write_songs(&settings.songs_dir, names);
    fs::create_dir_all(&settings.data_dir).unwrap();

    let (player, deck) = spawn_player();
    let db = Database::open_in_memory().unwrap();
    let mut manager = MusicManager::new(settings, db, player).unwrap();
    manager.load_songs().unwrap();

    Fixture {
        manager,
        deck,
        root,
    }
}

pub fn fixture(names: &[&str]) -> Fixture {
    fixture_with(names, |_| ())
}

/// Poll `cond` for up to two seconds.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}
