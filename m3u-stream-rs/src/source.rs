use std::{
    error::Error,
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    str::FromStr,
};

use log::debug;
use smol_str::SmolStr;

/// An opened playlist, dropping it releases the file or connection behind it
pub type PlaylistStream = Box<dyn BufRead + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    NetworkUrl,
}

impl FromStr for ResourceKind {
    type Err = OpenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "url" | "network" | "http" => Ok(Self::NetworkUrl),
            _ => Err(OpenError::UnsupportedResourceKind(s.into())),
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::NetworkUrl => write!(f, "url"),
        }
    }
}

pub trait Source {
    fn open(&self) -> Result<PlaylistStream, OpenError>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn open(&self) -> Result<PlaylistStream, OpenError> {
        let file = File::open(&self.path).map_err(|e| OpenError::IoError {
            resource: self.path.to_string_lossy().into(),
            source: e,
        })?;
        debug!("Opened playlist file {}", self.path.display());

        Ok(Box::new(BufReader::new(file)))
    }
}

#[derive(Debug)]
pub enum OpenError {
    UnsupportedResourceKind(SmolStr),
    IoError {
        resource: SmolStr,
        source: io::Error,
    },
    /// DNS, connection or timeout failures of the HTTP client
    TransportError {
        resource: SmolStr,
        source: Box<dyn Error + Send + Sync>,
    },
    /// Server responded with a status code of 400 or above
    RequestNotSuccess {
        resource: SmolStr,
        status: u16,
    },
}

impl OpenError {
    pub fn is_unsupported_resource_kind(&self) -> bool {
        matches!(self, Self::UnsupportedResourceKind(_))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RequestNotSuccess { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedResourceKind(kind) => {
                write!(f, "Resource kind not supported: {}", kind)
            }
            Self::IoError { resource, source } => {
                write!(f, "Failed to open '{}': {}", resource, source)
            }
            Self::TransportError { resource, source } => {
                write!(f, "Failed to request '{}': {}", resource, source)
            }
            Self::RequestNotSuccess { resource, status } => write!(
                f,
                "Load URL '{}' failed due to HTTP status code: {}",
                resource, status
            ),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::TransportError { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
