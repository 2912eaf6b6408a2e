mod entry;
mod playlist;
pub use entry::*;
pub use playlist::*;

pub mod directives {
    pub const EXTM3U: &str = "#EXTM3U";
    pub const EXTINF: &str = "#EXTINF";
    /// Every directive line starts with this
    pub const EXT_PREFIX: &str = "#EXT";
}
