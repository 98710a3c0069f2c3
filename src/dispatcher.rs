//! Event dispatcher: turns a stream of file events into launches.
//!
//! For each incoming [`FileEvent`], in arrival order:
//! 1. Only creations are considered.
//! 2. A path equal to the last launched path is a duplicate and skipped.
//!    Download tools often create the same final name more than once while
//!    materializing a file.
//! 3. Only files carrying the target extension (case-sensitive) qualify.
//! 4. The path is recorded as last launched, then the launcher runs to
//!    completion before the next event is read.
//!
//! The last launched path is never cleared, so the same path cannot be
//! launched twice in a row even when the repeat is a genuine new download.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::launcher::{LaunchError, Launcher};
use crate::watcher::{EventStreams, FileEvent, WatchError};

/// Result of handling one event.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Not a creation event.
    IgnoredKind,
    /// Same path as the last launch.
    Duplicate,
    /// Extension does not match the target.
    WrongExtension,
    Launched,
    LaunchFailed(LaunchError),
}

impl DispatchOutcome {
    pub fn is_launch_attempt(&self) -> bool {
        matches!(self, Self::Launched | Self::LaunchFailed(_))
    }
}

/// Why the consumption loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EventsClosed,
    ErrorsClosed,
}

#[derive(Debug)]
pub struct Dispatcher<L> {
    launcher: L,
    extension: String,
    last_dispatched: Option<PathBuf>,
}

impl<L: Launcher> Dispatcher<L> {
    /// `extension` is compared without its leading dot.
    pub fn new(launcher: L, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            launcher,
            extension: extension.trim_start_matches('.').to_string(),
            last_dispatched: None,
        }
    }

    /// Apply the filters to one event and launch the file if it qualifies.
    pub async fn handle(&mut self, event: FileEvent) -> DispatchOutcome {
        if !event.is_create() {
            return DispatchOutcome::IgnoredKind;
        }

        let path = event.path;
        if self.last_dispatched.as_deref().map(Path::as_os_str) == Some(path.as_os_str()) {
            return DispatchOutcome::Duplicate;
        }

        if !has_extension(&path, &self.extension) {
            return DispatchOutcome::WrongExtension;
        }

        // Recorded before launching so a failed launch is not retried by a
        // later duplicate event.
        self.last_dispatched = Some(path.clone());
        crate::log_event!("dispatcher", "new file created", "{}", path.display());

        match self.launcher.launch(&path).await {
            Ok(()) => {
                crate::log_event!("dispatcher", "ran file", "{}", path.display());
                DispatchOutcome::Launched
            }
            Err(e) => {
                tracing::error!("[dispatcher] failed to run file {}: {e}", path.display());
                DispatchOutcome::LaunchFailed(e)
            }
        }
    }

    /// Consume both streams until either closes.
    ///
    /// Watcher errors are logged and do not stop the loop.
    pub async fn run(mut self, mut streams: EventStreams) -> StopReason {
        crate::debug_event!("dispatcher", "started", "extension .{}", self.extension);

        loop {
            tokio::select! {
                // Events first, so a burst is handled before a pending error
                biased;

                event = streams.events.recv() => match event {
                    Some(event) => {
                        let path = event.path.clone();
                        let outcome = self.handle(event).await;
                        if !outcome.is_launch_attempt() {
                            crate::debug_event!("dispatcher", "ignored", "{outcome:?} {}", path.display());
                        }
                    }
                    None => {
                        tracing::error!("[dispatcher] {}: events channel closed", WatchError::ChannelClosed);
                        return StopReason::EventsClosed;
                    }
                },

                error = streams.errors.recv() => match error {
                    Some(e) => {
                        tracing::error!("[dispatcher] watcher error: {e}");
                    }
                    None => {
                        tracing::error!("[dispatcher] {}: errors channel closed", WatchError::ChannelClosed);
                        return StopReason::ErrorsClosed;
                    }
                },
            }
        }
    }
}

/// Whether `path`'s extension is exactly `extension` (case-sensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension() == Some(OsStr::new(extension))
}
