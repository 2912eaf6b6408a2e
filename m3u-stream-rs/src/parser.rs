use std::{
    error::Error,
    fmt::Display,
    io::{self, BufRead},
    iter::FusedIterator,
};

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use smol_str::SmolStr;

use crate::format::{MediaEntry, Metadata, Playlist, PlaylistEntry, directives};

#[derive(Debug)]
pub enum ParseError {
    /// The first non-empty line is not `#EXTM3U`, empty when the input had no line at all
    InvalidHeader(SmolStr),
    IoError(io::Error),
}

impl ParseError {
    /// The offending line, if the error was caused by one
    pub fn raw_line(&self) -> Option<&str> {
        match self {
            Self::InvalidHeader(line) => Some(line.as_str()),
            Self::IoError(_) => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::InvalidHeader(line) if line.is_empty() => {
                write!(f, "Missing header, expected {}", directives::EXTM3U)
            }
            Self::InvalidHeader(line) => write!(f, "Invalid header found: {}", line),
            Self::IoError(e) => e.fmt(f),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            Self::InvalidHeader(_) => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Resource lines without a directive of their own reuse the metadata of
    /// the last emitted entry. When off they get empty metadata.
    pub carry_metadata: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            carry_metadata: true,
        }
    }
}

lazy_static! {
    static ref EXTINF_REGEX: Regex = Regex::new(&format!(
        r#"^{}:-1 tvg-id="(?P<id>.*?)" tvg-name="(?P<name>.*?)" tvg-logo="(?P<logo>.*?)" group-title="(?P<group>.*?)",(?P<other_name>.*)"#,
        directives::EXTINF
    ))
    .expect("Regular expression error");
}

fn parse_metadata(line: &str) -> Option<Metadata> {
    let captures = EXTINF_REGEX.captures(line)?;
    let field = |name: &str| -> SmolStr {
        captures
            .name(name)
            .map(|x| x.as_str().into())
            .unwrap_or_default()
    };

    Some(Metadata {
        id: field("id"),
        name: field("name"),
        logo: field("logo"),
        group: field("group"),
        other_name: field("other_name"),
        raw_line: line.into(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectHeader,
    ExpectDirectiveOrResource,
    Finished,
}

/// Single pass parser over a line stream.
///
/// Every call to `next` reads lines until one record can be produced. The
/// sequence ends with either [`PlaylistEntry::EndOfStream`] or one error, and
/// the reader is dropped as soon as that last record is handed out.
pub struct Parser<R: BufRead> {
    reader: Option<R>,
    buffer: Vec<u8>,
    state: State,
    options: ParserOptions,
    line_number: usize,
    /// Metadata of a directive not yet attached to a resource line
    pending: Option<Metadata>,
    /// Metadata of the last emitted entry
    carried: Option<Metadata>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self {
            reader: Some(reader),
            buffer: Vec::new(),
            state: State::ExpectHeader,
            options,
            line_number: 0,
            pending: None,
            carried: None,
        }
    }

    /// Whether the underlying reader has been released
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Drain the remaining entries into a playlist
    pub fn collect_playlist(self) -> Result<Playlist, ParseError> {
        let mut playlist = Playlist::default();
        for entry in self {
            match entry? {
                PlaylistEntry::Media(media) => playlist.medias.push(media),
                PlaylistEntry::EndOfStream => break,
            }
        }

        Ok(playlist)
    }

    fn next_line(&mut self) -> Result<Option<String>, io::Error> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.buffer.clear();
        if reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        // non UTF-8 bytes (latin-1 names) are replaced, not fatal
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }

    fn finish(&mut self) {
        self.state = State::Finished;
        if self.reader.take().is_some() {
            debug!("Released playlist stream after {} lines", self.line_number);
        }
    }

    fn take_metadata(&mut self) -> Metadata {
        let metadata = match self.pending.take() {
            Some(metadata) => metadata,
            None if self.options.carry_metadata => self.carried.clone().unwrap_or_default(),
            None => Metadata::default(),
        };

        if self.options.carry_metadata {
            self.carried = Some(metadata.clone());
        }

        metadata
    }

    fn parse_header(&mut self, line: String) -> Option<Result<PlaylistEntry, ParseError>> {
        if line.is_empty() {
            return None;
        }

        if line != directives::EXTM3U {
            self.finish();
            return Some(Err(ParseError::InvalidHeader(line.into())));
        }

        self.state = State::ExpectDirectiveOrResource;
        None
    }

    fn parse_line(&mut self, line: String) -> Option<Result<PlaylistEntry, ParseError>> {
        if let Some(metadata) = parse_metadata(&line) {
            if let Some(previous) = self.pending.replace(metadata) {
                trace!(
                    "Line {}: directive without resource line superseded: {}",
                    self.line_number, previous.raw_line
                );
            }
            return None;
        }

        if line.is_empty() {
            return None;
        }

        if line.starts_with(directives::EXT_PREFIX) {
            trace!("Line {}: unrecognized directive: {}", self.line_number, line);
            return None;
        }

        let metadata = self.take_metadata();
        let line = SmolStr::new(line);
        Some(Ok(PlaylistEntry::Media(MediaEntry {
            metadata,
            url: line.clone(),
            raw_line: line,
        })))
    }

    fn end_of_input(&mut self) -> Result<PlaylistEntry, ParseError> {
        let state = self.state;
        self.finish();

        if state == State::ExpectHeader {
            return Err(ParseError::InvalidHeader(SmolStr::default()));
        }

        if let Some(pending) = self.pending.take() {
            debug!(
                "Dropped trailing directive without resource line: {}",
                pending.raw_line
            );
        }

        Ok(PlaylistEntry::EndOfStream)
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<PlaylistEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Finished {
                return None;
            }

            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Some(self.end_of_input()),
                Err(e) => {
                    self.finish();
                    return Some(Err(e.into()));
                }
            };

            let result = match self.state {
                State::ExpectHeader => self.parse_header(line),
                State::ExpectDirectiveOrResource => self.parse_line(line),
                State::Finished => None,
            };

            if result.is_some() {
                return result;
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Parser<R> {}
