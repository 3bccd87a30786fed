use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Index(usize),
    Title(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Playlist
    List,
    Sorted,
    Search(String),
    FuzzySearch(String),
    Shuffle,
    Delete(String),
    Add(PathBuf),

    // Player
    Play(Target),
    Pause,
    Resume,
    TogglePause,
    Stop,
    PlayNext,
    PlayPrev,
    Volume(f32),
    SeekForward(Option<u64>),
    SeekBack(Option<u64>),
    Status,

    // Queue & stats
    Enqueue(String),
    ShowUpcoming,
    PlayUpcoming,
    Unqueue(usize),
    History,
    ClearHistory,
    Top(Option<usize>),

    // Ops
    Save,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands (numbers from the classic menu work too):
  list | 1                 show the playlist
  play <n|title> | 2, 3    play by number or title
  pause | resume | toggle  4 p / 4 r
  stop                     4 s
  next | prev              5 n / 5 p
  queue <title> | 6        add to the upcoming queue
  upcoming | 7             show the upcoming queue
  playnext | 7.5           play the next queued song
  unqueue <n>              drop an entry from the queue
  search <text> | 8        substring search
  find <text>              fuzzy search
  shuffle | 9              shuffle the playlist
  delete <title> | 10      remove a song
  add <path> | 11          copy an audio file into the songs folder
  history | 12             recently played
  clear-history | 13       forget recently played
  top [n] | 14             most played
  sorted                   playlist in A-Z order
  volume <0-100>           set volume
  ff [secs] | rew [secs]   seek forward / back
  status                   what is playing
  save                     write stats to disk
  help                     this text
  quit | 15                save and exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse_action(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let action = match cmd.to_lowercase().as_str() {
        "list" | "ls" | "1" => Action::List,
        "sorted" => Action::Sorted,
        "search" | "8" => Action::Search(required(rest, "search text")?),
        "find" => Action::FuzzySearch(required(rest, "search text")?),
        "shuffle" | "9" => Action::Shuffle,
        "delete" | "rm" | "10" => Action::Delete(required(rest, "song title")?),
        "add" | "11" => Action::Add(PathBuf::from(required(rest, "file path")?)),

        "play" => Action::Play(target(&required(rest, "song number or title")?)),
        "2" => Action::Play(Target::Index(number(rest)?)),
        "3" => Action::Play(Target::Title(required(rest, "song title")?)),
        "pause" => Action::Pause,
        "resume" => Action::Resume,
        "toggle" => Action::TogglePause,
        "stop" => Action::Stop,
        "4" => match rest.to_lowercase().as_str() {
            "p" => Action::Pause,
            "r" => Action::Resume,
            "s" => Action::Stop,
            _ => bail!("Expected P=Pause, R=Resume or S=Stop"),
        },
        "next" | "n" => Action::PlayNext,
        "prev" | "p" => Action::PlayPrev,
        "5" => match rest.to_lowercase().as_str() {
            "n" => Action::PlayNext,
            "p" => Action::PlayPrev,
            _ => bail!("Expected N=Next or P=Previous"),
        },
        "volume" | "vol" => {
            let percent: f32 = required(rest, "volume (0-100)")?
                .parse()
                .map_err(|_| anyhow!("Volume must be a number between 0 and 100"))?;
            Action::Volume(percent / 100.0)
        }
        "ff" => Action::SeekForward(optional_number(rest)?),
        "rew" => Action::SeekBack(optional_number(rest)?),
        "status" => Action::Status,

        "queue" | "6" => Action::Enqueue(required(rest, "song title")?),
        "upcoming" | "7" => Action::ShowUpcoming,
        "playnext" | "7.5" => Action::PlayUpcoming,
        "unqueue" => Action::Unqueue(number(rest)?),
        "history" | "12" => Action::History,
        "clear-history" | "13" => Action::ClearHistory,
        "top" | "14" => Action::Top(optional_number(rest)?),

        "save" => Action::Save,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" | "15" => Action::Quit,

        other => bail!("Unknown command: {other} (type `help` for a list)"),
    };

    Ok(Some(action))
}

fn required(rest: &str, what: &str) -> Result<String> {
    match rest.is_empty() {
        true => Err(anyhow!("Missing {what}")),
        false => Ok(rest.to_string()),
    }
}

fn target(arg: &str) -> Target {
    match arg.parse::<usize>() {
        Ok(n) => Target::Index(n),
        Err(_) => Target::Title(arg.to_string()),
    }
}

fn number<T: std::str::FromStr>(rest: &str) -> Result<T> {
    rest.parse()
        .map_err(|_| anyhow!("Expected a number, got `{rest}`"))
}

fn optional_number<T: std::str::FromStr>(rest: &str) -> Result<Option<T>> {
    match rest.is_empty() {
        true => Ok(None),
        false => number(rest).map(Some),
    }
}
