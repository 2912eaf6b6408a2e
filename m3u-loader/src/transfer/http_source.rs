use std::io::{self, BufReader};

use futures::TryStreamExt;
use log::debug;
use m3u_stream_rs::{OpenError, PlaylistStream, Source};
use reqwest::{Client, Response};
use tokio::runtime::Handle;
use tokio_util::io::{StreamReader, SyncIoBridge};

/// Playlist behind an http(s) URL.
///
/// The body is not buffered: the returned stream pulls chunks from the
/// connection as lines are read. Both `open` and reads block on `runtime`, so
/// they must run on a blocking thread (see [`crate::transfer::parse_channel`]).
pub struct HttpSource {
    http_client: Client,
    url: String,
    runtime: Handle,
}

impl HttpSource {
    pub fn new(http_client: Client, url: impl Into<String>, runtime: Handle) -> Self {
        Self {
            http_client,
            url: url.into(),
            runtime,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self) -> Result<Response, OpenError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| OpenError::TransportError {
                resource: self.url.as_str().into(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(OpenError::RequestNotSuccess {
                resource: self.url.as_str().into(),
                status: status.as_u16(),
            });
        }
        debug!("Opened playlist {} ({})", self.url, status);

        Ok(response)
    }
}

impl Source for HttpSource {
    fn open(&self) -> Result<PlaylistStream, OpenError> {
        let response = self.runtime.block_on(self.send())?;

        let body = response.bytes_stream().map_err(io::Error::other);
        let reader = StreamReader::new(Box::pin(body));

        Ok(Box::new(BufReader::new(SyncIoBridge::new_with_handle(
            reader,
            self.runtime.clone(),
        ))))
    }
}

#[cfg(test)]
mod tests {
    use std::{io, net::SocketAddr};

    use axum::{Router, body::Body, routing::get};
    use bytes::Bytes;
    use m3u_stream_rs::{OpenError, ParserOptions, PlaylistStream, Source};
    use reqwest::Client;
    use tokio::{net::TcpListener, runtime::Handle};

    use crate::transfer::{HttpSource, parse_channel};

    const PLAYLIST: &str = r#"#EXTM3U
#EXTINF:-1 tvg-id="1" tvg-name="Chan" tvg-logo="http://x/logo.png" group-title="News",Chan Extra
http://stream/1
"#;

    async fn serve(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn router() -> Router {
        Router::new()
            .route("/list.m3u", get(|| async { PLAYLIST }))
            .route(
                "/chunked.m3u",
                get(|| async {
                    // split in the middle of lines
                    let chunks = [
                        "#EXT",
                        "M3U\n#EXTINF:-1 tvg-id=\"1\" tvg-",
                        "name=\"Chan\" tvg-logo=\"\" group-title=\"News\",Chan\nhttp://str",
                        "eam/1",
                    ]
                    .into_iter()
                    .map(|x| Ok::<_, io::Error>(Bytes::from_static(x.as_bytes())));
                    Body::from_stream(futures::stream::iter(chunks))
                }),
            )
    }

    fn source(url: impl Into<String>) -> HttpSource {
        HttpSource::new(client(), url, Handle::current())
    }

    async fn open(source: HttpSource) -> Result<PlaylistStream, OpenError> {
        tokio::task::spawn_blocking(move || source.open())
            .await
            .unwrap()
    }

    async fn collect_urls(source: HttpSource) -> Vec<String> {
        let stream = open(source).await.unwrap();
        let mut entries = parse_channel(stream, ParserOptions::default(), 1);
        let mut urls = Vec::new();
        while let Some(entry) = entries.next().await {
            match entry.unwrap().as_media() {
                Some(media) => urls.push(media.url.to_string()),
                None => break,
            }
        }
        entries.join().await.unwrap();
        urls
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_url() {
        let addr = serve(router()).await;
        let source = source(format!("http://{}/list.m3u", addr));
        assert_eq!(collect_urls(source).await, vec!["http://stream/1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_chunked_url() {
        let addr = serve(router()).await;
        let source = source(format!("http://{}/chunked.m3u", addr));
        assert_eq!(collect_urls(source).await, vec!["http://stream/1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_not_success() {
        let addr = serve(router()).await;
        let url = format!("http://{}/missing.m3u", addr);
        match open(source(&url)).await {
            Err(e) => {
                assert_eq!(e.status_code(), Some(404));
                assert_eq!(
                    e.to_string(),
                    format!("Load URL '{}' failed due to HTTP status code: 404", url)
                );
            }
            Ok(_) => panic!("opened a missing playlist"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_connection_refused() {
        // grab a free port and close it again
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = source(format!("http://{}/list.m3u", addr));
        let url = source.url().to_owned();
        match open(source).await {
            Err(OpenError::TransportError { resource, .. }) => {
                assert_eq!(resource, url);
            }
            Err(e) => panic!("unexpected {}", e),
            Ok(_) => panic!("connected to a closed port"),
        }
    }
}
