use super::scan;
use crate::{ManagerError, domain::Track, normalize_title};
use anyhow::Result;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use std::{fs, path::Path, sync::Arc};
use tracing::{info, warn};

const MATCH_THRESHOLD: i64 = 50;

/// Ordered collection of tracks.
///
/// Entries are keyed by normalized title, so one structure serves the
/// playback order, case-insensitive lookup and the alphabetical view.
/// Removing a track removes it from all three at once.
#[derive(Default)]
pub struct Playlist {
    tracks: IndexMap<String, Arc<Track>>,
}

impl Playlist {
    pub fn new() -> Self {
        Playlist::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Track>> {
        self.tracks.values()
    }

    pub fn append(&mut self, track: Track) -> Result<Arc<Track>, ManagerError> {
        let key = track.key();
        if self.tracks.contains_key(&key) {
            return Err(ManagerError::DuplicateTitle(track.title));
        }

        let track = Arc::new(track);
        self.tracks.insert(key, Arc::clone(&track));
        Ok(track)
    }

    /// Remove a track, keeping the relative order of the others.
    pub fn delete(&mut self, title: &str) -> Result<Arc<Track>, ManagerError> {
        self.tracks
            .shift_remove(&normalize_title(title))
            .ok_or_else(|| ManagerError::NotFound(title.to_string()))
    }

    pub fn find(&self, title: &str) -> Option<&Arc<Track>> {
        self.tracks.get(&normalize_title(title))
    }

    /// Zero-based position of a title in playback order.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.tracks.get_index_of(&normalize_title(title))
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Track>> {
        self.tracks.get_index(index).map(|(_, track)| track)
    }

    pub fn first(&self) -> Option<&Arc<Track>> {
        self.get(0)
    }

    pub fn next_of(&self, title: &str) -> Option<&Arc<Track>> {
        self.position(title).and_then(|idx| self.get(idx + 1))
    }

    pub fn prev_of(&self, title: &str) -> Option<&Arc<Track>> {
        self.position(title)
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| self.get(idx))
    }

    pub fn shuffle(&mut self) {
        let mut entries: Vec<(String, Arc<Track>)> = self.tracks.drain(..).collect();
        entries.shuffle(&mut rand::rng());
        self.tracks = entries.into_iter().collect();
    }

    /// Tracks in case-insensitive alphabetical order.
    pub fn sorted(&self) -> Vec<Arc<Track>> {
        let mut entries: Vec<(&String, &Arc<Track>)> = self.tracks.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(_, track)| Arc::clone(track))
            .collect()
    }

    /// Case-insensitive substring search in playback order.
    pub fn search(&self, query: &str) -> Vec<Arc<Track>> {
        let query = normalize_title(query);
        self.tracks
            .iter()
            .filter(|(key, _)| key.contains(query.as_str()))
            .map(|(_, track)| Arc::clone(track))
            .collect()
    }

    /// Fuzzy search, best match first.
    pub fn fuzzy_search(&self, query: &str) -> Vec<Arc<Track>> {
        let query = normalize_title(query);
        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<(Arc<Track>, i64)> = self
            .tracks
            .iter()
            .filter_map(|(key, track)| {
                matcher
                    .fuzzy_match(key, &query)
                    .filter(|&score| score > MATCH_THRESHOLD)
                    .map(|score| (Arc::clone(track), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(track, _)| track).collect()
    }

    /// Append the playable files found in `dir`, never growing past
    /// `limit` songs. A missing directory is created and yields nothing.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>, limit: usize) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            info!(dir = %dir.display(), "Created songs directory");
            return Ok(0);
        }

        let room = limit.saturating_sub(self.len());
        let paths = scan::collect_valid_files(dir, room);

        let mut added = 0;
        for track in scan::process_tracks(paths) {
            match self.append(track) {
                Ok(_) => added += 1,
                Err(e) => warn!("Skipping file: {e}"),
            }
        }

        info!(dir = %dir.display(), added, "Loaded songs");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist_of(titles: &[&str]) -> Playlist {
        let mut playlist = Playlist::new();
        for title in titles {
            playlist
                .append(Track::from_path(format!("/songs/{title}.mp3")).unwrap())
                .unwrap();
        }
        playlist
    }

    fn titles(tracks: &[Arc<Track>]) -> Vec<&str> {
        tracks.iter().map(|t| t.title()).collect()
    }

    #[test]
    fn append_keeps_order_and_rejects_duplicates() {
        let mut playlist = playlist_of(&["Yellow", "Clocks", "Fix You"]);
        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist.get(1).unwrap().title(), "Clocks");

        let dup = playlist.append(Track::from_path("/other/CLOCKS.wav").unwrap());
        assert_eq!(dup, Err(ManagerError::DuplicateTitle("CLOCKS".into())));
        assert_eq!(playlist.len(), 3);
    }

    #[test]
    fn lookup_ignores_case() {
        let playlist = playlist_of(&["Bohemian Rhapsody"]);
        assert!(playlist.find("bohemian rhapsody").is_some());
        assert!(playlist.find("BOHEMIAN RHAPSODY ").is_some());
        assert!(playlist.find("Bohemian").is_none());
    }

    #[test]
    fn delete_updates_every_view() {
        let mut playlist = playlist_of(&["c", "a", "b"]);
        let removed = playlist.delete("A").unwrap();
        assert_eq!(removed.title(), "a");

        assert!(playlist.find("a").is_none());
        assert_eq!(titles(&playlist.sorted()), vec!["b", "c"]);
        assert_eq!(playlist.iter().map(|t| t.title()).collect::<Vec<_>>(), vec!["c", "b"]);
        assert_eq!(playlist.delete("a"), Err(ManagerError::NotFound("a".into())));
    }

    #[test]
    fn neighbours_follow_playback_order() {
        let playlist = playlist_of(&["one", "two", "three"]);
        assert_eq!(playlist.next_of("one").unwrap().title(), "two");
        assert_eq!(playlist.prev_of("three").unwrap().title(), "two");
        assert!(playlist.next_of("three").is_none());
        assert!(playlist.prev_of("one").is_none());
        assert!(playlist.next_of("missing").is_none());
    }

    #[test]
    fn sorted_is_case_insensitive() {
        let playlist = playlist_of(&["banana", "Apple", "cherry"]);
        assert_eq!(titles(&playlist.sorted()), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn shuffle_keeps_every_track_findable() {
        let names: Vec<String> = (0..20).map(|i| format!("track {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut playlist = playlist_of(&refs);

        playlist.shuffle();

        assert_eq!(playlist.len(), 20);
        for name in &names {
            let pos = playlist.position(name).unwrap();
            assert_eq!(playlist.get(pos).unwrap().title(), name);
        }
    }

    #[test]
    fn substring_search() {
        let playlist = playlist_of(&["Love Me Do", "Help", "All You Need Is Love"]);
        assert_eq!(
            titles(&playlist.search("love")),
            vec!["Love Me Do", "All You Need Is Love"]
        );
        assert!(playlist.search("zzz").is_empty());
        assert_eq!(playlist.search("").len(), 3);
    }

    #[test]
    fn fuzzy_search_ranks_best_first() {
        let playlist = playlist_of(&["Under Pressure", "Bohemian Rhapsody", "Radio Ga Ga"]);
        let results = playlist.fuzzy_search("bohemian");
        assert_eq!(results[0].title(), "Bohemian Rhapsody");
        assert!(playlist.fuzzy_search("qqqq").is_empty());
    }

    #[test]
    fn load_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("songs");

        let mut playlist = Playlist::new();
        assert_eq!(playlist.load_from_dir(&dir, 50).unwrap(), 0);
        assert!(dir.is_dir());
    }

    #[test]
    fn load_caps_playlist_size() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            fs::write(dir.path().join(format!("song {i:02}.mp3")), b"x").unwrap();
        }

        let mut playlist = playlist_of(&["already here"]);
        assert_eq!(playlist.load_from_dir(dir.path(), 4).unwrap(), 3);
        assert_eq!(playlist.len(), 4);
        assert_eq!(playlist.get(1).unwrap().title(), "song 00");
    }
}
