mod history;
mod play_counts;
mod upcoming;

pub use history::RecentlyPlayed;
pub use play_counts::PlayCounts;
pub use upcoming::UpcomingSongs;

pub const HISTORY_CAPACITY: usize = 500;
pub const QUEUE_CAPACITY: usize = 10;
