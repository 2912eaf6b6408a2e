use smol_str::SmolStr;

/// Attributes of an `#EXTINF` directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Value of `tvg-id`
    pub id: SmolStr,
    /// Value of `tvg-name`
    pub name: SmolStr,
    /// Value of `tvg-logo`
    pub logo: SmolStr,
    /// Value of `group-title`
    pub group: SmolStr,
    /// Display name after the comma
    pub other_name: SmolStr,
    /// The directive line as it was read
    pub raw_line: SmolStr,
}

/// A resource line paired with the metadata of the directive before it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaEntry {
    /// Metadata of the directive before this line, see [`crate::ParserOptions`]
    /// for lines without one
    pub metadata: Metadata,
    /// File path or network URL
    pub url: SmolStr,
    /// The resource line as it was read, always equal to `url`
    pub raw_line: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEntry {
    Media(MediaEntry),
    /// Always the last record of a clean run
    EndOfStream,
}

impl PlaylistEntry {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    pub fn as_media(&self) -> Option<&MediaEntry> {
        match self {
            Self::Media(media) => Some(media),
            Self::EndOfStream => None,
        }
    }
}
