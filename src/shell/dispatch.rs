use super::action::{Action, HELP, Target};
use crate::{
    DurationStyle, MusicManager,
    domain::{SongInfo, Track},
    get_readable_duration,
    player::PlaybackState,
};
use anyhow::Result;
use std::sync::Arc;

/// Run one action against the manager and render its output lines.
/// "Now playing" notices arrive through the manager's subscribers.
#[rustfmt::skip]
pub fn execute(manager: &mut MusicManager, action: Action) -> Result<Vec<String>> {
    let lines = match action {
        // Playlist
        Action::List            => list_playlist(manager),
        Action::Sorted          => numbered(&manager.sorted(), "No songs to show."),
        Action::Search(q)       => numbered(&manager.search(&q), "No matches"),
        Action::FuzzySearch(q)  => numbered(&manager.fuzzy_search(&q), "No matches"),
        Action::Shuffle         => { manager.shuffle(); vec!["Playlist shuffled. Reset to first track.".into()] }
        Action::Delete(t)       => { let gone = manager.delete(&t)?; vec![format!("Deleted {}", gone.title())] }
        Action::Add(path)       => { let added = manager.add_song(&path)?; vec![format!("Copied and added {}", added.title())] }

        // Player
        Action::Play(Target::Index(n)) => { manager.play_index(n)?; vec![] }
        Action::Play(Target::Title(t)) => { manager.play_title(&t)?; vec![] }
        Action::Pause           => { manager.pause()?; vec!["Paused".into()] }
        Action::Resume          => { manager.resume()?; vec!["Resumed".into()] }
        Action::TogglePause     => { manager.toggle_pause()?; vec![] }
        Action::Stop            => { manager.stop()?; vec!["Stopped".into()] }
        Action::PlayNext        => { manager.next()?; vec![] }
        Action::PlayPrev        => { manager.prev()?; vec![] }
        Action::Volume(v)       => { let v = manager.set_volume(v)?; vec![format!("Volume {:.0}%", v * 100.0)] }
        Action::SeekForward(s)  => { manager.seek_forward(s)?; vec![] }
        Action::SeekBack(s)     => { manager.seek_back(s)?; vec![] }
        Action::Status          => status(manager),

        // Queue & stats
        Action::Enqueue(t)      => { let t = manager.enqueue(&t)?; vec![format!("Enqueued {t} to upcoming")] }
        Action::ShowUpcoming    => numbered_titles(&manager.upcoming(), "No upcoming songs."),
        Action::PlayUpcoming    => { manager.play_next_upcoming()?; vec![] }
        Action::Unqueue(n)      => { let t = manager.remove_upcoming(n)?; vec![format!("Removed {t} from upcoming")] }
        Action::History         => numbered_titles(&manager.history(), "No songs played yet."),
        Action::ClearHistory    => { manager.clear_history(); vec!["History cleared".into()] }
        Action::Top(n)          => top_played(manager, n),

        // Ops
        Action::Save            => { manager.save()?; vec!["Saved".into()] }
        Action::Help            => HELP.lines().map(String::from).collect(),
        Action::Quit            => vec![],
    };

    Ok(lines)
}

fn list_playlist(manager: &MusicManager) -> Vec<String> {
    let playlist = manager.playlist();
    if playlist.is_empty() {
        return vec![format!(
            "No songs in playlist. Add audio files to {}",
            manager.songs_dir().display()
        )];
    }

    let current = manager.current().map(|t| t.key());
    playlist
        .iter()
        .enumerate()
        .map(|(idx, track)| {
            let marker = match current.as_deref() == Some(track.key().as_str()) {
                true => '>',
                false => ' ',
            };
            format!(
                "{marker}{:>3}. {}  [{}]",
                idx + 1,
                track.get_title(),
                track.get_duration_str()
            )
        })
        .collect()
}

fn numbered(tracks: &[Arc<Track>], empty: &str) -> Vec<String> {
    let titles: Vec<&str> = tracks.iter().map(|t| t.get_title()).collect();
    numbered_titles(&titles, empty)
}

fn numbered_titles(titles: &[&str], empty: &str) -> Vec<String> {
    if titles.is_empty() {
        return vec![empty.to_string()];
    }

    titles
        .iter()
        .enumerate()
        .map(|(idx, title)| format!("{}. {title}", idx + 1))
        .collect()
}

fn top_played(manager: &MusicManager, n: Option<usize>) -> Vec<String> {
    let top = manager.top_played(n.unwrap_or(manager.settings().top_n));
    if top.is_empty() {
        return vec!["No play history yet.".into()];
    }

    top.iter()
        .enumerate()
        .map(|(idx, (title, count))| {
            let plural = if *count == 1 { "play" } else { "plays" };
            format!("{}. {title} ({count} {plural})", idx + 1)
        })
        .collect()
}

fn status(manager: &MusicManager) -> Vec<String> {
    let status = manager.status();
    let volume = format!("volume {:.0}%", status.volume * 100.0);

    let line = match (&status.current, status.state) {
        (Some(track), PlaybackState::Playing | PlaybackState::Paused) => {
            let label = match status.state {
                PlaybackState::Paused => "Paused",
                _ => "Playing",
            };
            format!(
                "{label}: {} [{} / {}], {volume}",
                track.get_title(),
                get_readable_duration(status.elapsed, DurationStyle::Compact),
                track.get_duration_str()
            )
        }
        (Some(track), PlaybackState::Stopped) => {
            format!("Stopped at: {}, {volume}", track.get_title())
        }
        (None, _) => format!("No song playing, {volume}"),
    };

    vec![line]
}
