mod events;
mod manager;

pub use events::LibraryEvent;
pub use manager::{MusicManager, Status};
