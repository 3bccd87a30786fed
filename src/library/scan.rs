use crate::domain::{FileType, Track};
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use walkdir::WalkDir;

/// Collect playable files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into, and at most `limit`
/// paths are returned.
pub(super) fn collect_valid_files(dir: impl AsRef<Path>, limit: usize) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| FileType::from_path(path).is_some())
        .take(limit)
        .collect()
}

/// Build tracks for the given paths, reading durations in parallel.
/// Output order matches input order.
pub(super) fn process_tracks(paths: Vec<PathBuf>) -> Vec<Track> {
    paths
        .into_par_iter()
        .filter_map(|path| Track::from_path(path).ok())
        .map(|track| {
            let duration = probe_duration(&track.path);
            track.with_duration(duration)
        })
        .collect()
}

pub(crate) fn probe_duration(path: &Path) -> Option<Duration> {
    use lofty::file::AudioFile;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            (!duration.is_zero()).then_some(duration)
        }
        Err(e) => {
            debug!(path = %path.display(), "Could not read tags: {e}");
            None
        }
    }
}
