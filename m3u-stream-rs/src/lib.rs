//! # m3u-stream-rs
//! A streaming parser for extended m3u (IPTV) playlists
//!
//! Entries are produced one line at a time, the whole document is never
//! held in memory.
//!
//! # Example
//! ```rust
//! use m3u_stream_rs::{Parser, format::PlaylistEntry};
//! use std::io::Cursor;
//!
//! let parser = Parser::new(Cursor::new(r#"#EXTM3U
//! #EXTINF:-1 tvg-id="a" tvg-name="A" tvg-logo="" group-title="News",A
//! http://example.com/A.m3u8"#));
//!
//! for entry in parser {
//!     match entry.unwrap() {
//!         PlaylistEntry::Media(media) => println!("{}: {}", media.metadata.name, media.url),
//!         PlaylistEntry::EndOfStream => break,
//!     }
//! }
//! ```

pub mod format;
mod parser;
mod source;
pub use parser::*;
pub use source::*;
