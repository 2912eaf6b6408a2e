use std::io::BufRead;

use log::debug;
use m3u_stream_rs::{ParseError, Parser, ParserOptions, format::PlaylistEntry};
use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle},
};

pub type EntryResult = Result<PlaylistEntry, ParseError>;

/// Upper bound of the handoff channel, larger depths are clamped
pub const MAX_CHANNEL_DEPTH: usize = 1024;

/// Receiving end of a parse running on a blocking task.
///
/// The producer is at most `depth` records ahead. Dropping this (or calling
/// [`EntryStream::join`]) before the end stops the producer, which then
/// releases the playlist stream.
pub struct EntryStream {
    receiver: mpsc::Receiver<EntryResult>,
    producer: JoinHandle<()>,
}

impl EntryStream {
    pub async fn next(&mut self) -> Option<EntryResult> {
        self.receiver.recv().await
    }

    /// Stop receiving and wait for the producer to exit
    pub async fn join(self) -> Result<(), JoinError> {
        drop(self.receiver);
        self.producer.await
    }
}

pub fn parse_channel(
    stream: impl BufRead + Send + 'static,
    options: ParserOptions,
    depth: usize,
) -> EntryStream {
    let (sender, receiver) = mpsc::channel(depth.clamp(1, MAX_CHANNEL_DEPTH));

    let producer = tokio::task::spawn_blocking(move || {
        let parser = Parser::with_options(stream, options);
        for entry in parser {
            if sender.blocking_send(entry).is_err() {
                debug!("Entry receiver dropped, stop parsing");
                break;
            }
        }
    });

    EntryStream { receiver, producer }
}
