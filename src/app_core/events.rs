/// Published to every subscriber after a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEvent {
    PlaylistChanged,
    NowPlaying(String),
    Paused,
    Resumed,
    PlaybackToggled,
    Stopped,
    QueueChanged,
    HistoryChanged,
    VolumeChanged(f32),
    Error(String),
}

pub(crate) type Subscriber = Box<dyn FnMut(&LibraryEvent)>;
