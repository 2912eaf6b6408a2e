use crate::format::MediaEntry;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Medias of this playlist, in document order
    pub medias: Vec<MediaEntry>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.medias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medias.is_empty()
    }

    /// Medias whose `group-title` equals `group`
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a MediaEntry> + 'a {
        self.medias
            .iter()
            .filter(move |x| x.metadata.group == group)
    }
}
