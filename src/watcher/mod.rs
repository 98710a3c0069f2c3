//! Directory watcher feeding the dispatcher.
//!
//! Wraps a single `notify::RecommendedWatcher` and exposes what it sees as
//! two ordered, unbounded channels:
//!
//! ```text
//! notify callback
//!   - Ok(event)  -> file_events() -> events channel
//!   - Err(error) ->                  errors channel
//! ```
//!
//! The callback owns both senders, so dropping the [`DirectoryWatcher`]
//! closes both channels.

mod error;
mod event;

use std::path::{Path, PathBuf};

use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;

pub use error::WatchError;
pub use event::{FileEvent, FileEventKind, file_events};

/// Receiving side of a watch: file events and watcher-level errors.
#[derive(Debug)]
pub struct EventStreams {
    pub events: mpsc::UnboundedReceiver<FileEvent>,
    pub errors: mpsc::UnboundedReceiver<WatchError>,
}

impl EventStreams {
    /// Streams fed by the returned senders instead of a real watcher.
    pub fn channel() -> (
        mpsc::UnboundedSender<FileEvent>,
        mpsc::UnboundedSender<WatchError>,
        Self,
    ) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        (event_tx, error_tx, Self { events, errors })
    }
}

/// Handle to the OS watcher. Keep it alive for as long as events are wanted.
pub struct DirectoryWatcher {
    watcher: notify::RecommendedWatcher,
    watched: Option<PathBuf>,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// Create the OS watcher and the channels it delivers into.
    ///
    /// Nothing is delivered until [`subscribe`](Self::subscribe) succeeds.
    pub fn new() -> Result<(Self, EventStreams), WatchError> {
        let (event_tx, error_tx, streams) = EventStreams::channel();

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for file_event in file_events(event) {
                    // Receiver gone means the dispatcher stopped
                    let _ = event_tx.send(file_event);
                }
            }
            Err(e) => {
                let _ = error_tx.send(WatchError::Event(e));
            }
        })?;

        Ok((
            Self {
                watcher,
                watched: None,
            },
            streams,
        ))
    }

    /// Start watching `path`, non-recursively.
    pub fn subscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::PathWatchFailed {
                path: path.to_path_buf(),
                source,
            })?;
        crate::debug_event!("watcher", "watching", "{}", path.display());
        self.watched = Some(path.to_path_buf());
        Ok(())
    }

    /// The directory registered by the last successful subscription.
    pub fn watched(&self) -> Option<&Path> {
        self.watched.as_deref()
    }
}
