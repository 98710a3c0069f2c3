//! Error types for the directory watcher.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from watcher operations.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create the file system watcher: {0}")]
    InitFailed(#[from] notify::Error),

    #[error("Cannot watch {path}: {source}")]
    PathWatchFailed {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Reported by the OS watcher while running; watching continues.
    #[error("File system event error: {0}")]
    Event(#[source] notify::Error),

    #[error("Watcher channel closed")]
    ChannelClosed,
}
