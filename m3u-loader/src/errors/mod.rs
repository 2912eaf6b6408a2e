use std::{error::Error, fmt::Display};

use m3u_stream_rs::{OpenError, ParseError};
use tokio::task::JoinError;

#[derive(Debug)]
pub enum LoadError {
    OpenError(OpenError),
    ParseError(ParseError),
    JoinError(JoinError),
    /// The producer stopped without a terminal record
    Disconnected,
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenError(e) => e.fmt(f),
            Self::ParseError(e) => e.fmt(f),
            Self::JoinError(e) => e.fmt(f),
            Self::Disconnected => write!(f, "Parser stopped before the end of the playlist"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OpenError(e) => Some(e),
            Self::ParseError(e) => Some(e),
            Self::JoinError(e) => Some(e),
            Self::Disconnected => None,
        }
    }
}

impl From<OpenError> for LoadError {
    fn from(value: OpenError) -> Self {
        Self::OpenError(value)
    }
}

impl From<ParseError> for LoadError {
    fn from(value: ParseError) -> Self {
        Self::ParseError(value)
    }
}

impl From<JoinError> for LoadError {
    fn from(value: JoinError) -> Self {
        Self::JoinError(value)
    }
}
