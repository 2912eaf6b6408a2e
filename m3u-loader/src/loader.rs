use std::time::Duration;

use log::{debug, info};
use m3u_stream_rs::{
    FileSource, ParserOptions, PlaylistStream, ResourceKind, Source,
    format::{Playlist, PlaylistEntry},
};
use reqwest::{Client, Proxy};
use tokio::runtime::Handle;

use crate::{
    Config,
    errors::LoadError,
    transfer::{EntryStream, HttpSource, parse_channel},
};

pub struct PlaylistLoader {
    config: Config,
    http_client: Client,
}

impl PlaylistLoader {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();

        if let Some(user_agent) = &config.http.user_agent {
            builder = builder.user_agent(user_agent)
        }

        if let Some(proxy) = &config.http.proxy {
            info!("With proxy: {}", proxy);
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        if let Some(timeout) = config.http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout.into()));
        }

        Ok(Self {
            config,
            http_client: builder.build()?,
        })
    }

    pub fn parser_options(&self) -> ParserOptions {
        self.config.parser_options()
    }

    pub fn source(&self, resource: impl AsRef<str>, kind: ResourceKind) -> Box<dyn Source + Send> {
        let resource = resource.as_ref();
        match kind {
            ResourceKind::File => Box::new(FileSource::new(resource)),
            ResourceKind::NetworkUrl => Box::new(HttpSource::new(
                self.http_client.clone(),
                resource,
                Handle::current(),
            )),
        }
    }

    /// Open `resource` on a blocking task
    pub async fn open(
        &self,
        resource: impl AsRef<str>,
        kind: ResourceKind,
    ) -> Result<PlaylistStream, LoadError> {
        debug!("Opening {} {}", kind, resource.as_ref());
        let source = self.source(resource, kind);
        Ok(tokio::task::spawn_blocking(move || source.open()).await??)
    }

    /// Open `resource` and start parsing it on a blocking task
    pub async fn parse(
        &self,
        resource: impl AsRef<str>,
        kind: ResourceKind,
    ) -> Result<EntryStream, LoadError> {
        let stream = self.open(resource, kind).await?;
        Ok(parse_channel(
            stream,
            self.parser_options(),
            self.config.channel_depth(),
        ))
    }

    pub async fn load_playlist(
        &self,
        resource: impl AsRef<str>,
        kind: ResourceKind,
    ) -> Result<Playlist, LoadError> {
        let mut entries = self.parse(resource, kind).await?;
        let mut playlist = Playlist::default();

        loop {
            match entries.next().await {
                Some(Ok(PlaylistEntry::Media(media))) => playlist.medias.push(media),
                Some(Ok(PlaylistEntry::EndOfStream)) => break,
                Some(Err(e)) => return Err(e.into()),
                None => {
                    entries.join().await?;
                    return Err(LoadError::Disconnected);
                }
            }
        }

        entries.join().await?;
        Ok(playlist)
    }
}
