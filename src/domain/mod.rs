mod filetype;
mod track;

pub use filetype::FileType;
pub use track::Track;

pub trait SongInfo {
    fn get_title(&self) -> &str;
    fn get_duration(&self) -> Option<std::time::Duration>;
    fn get_duration_str(&self) -> String;
}
