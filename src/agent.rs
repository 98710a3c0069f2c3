//! Startup wiring: resolve the directory, watch it, run the dispatcher.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::dispatcher::{Dispatcher, StopReason};
use crate::launcher::Launcher;
use crate::resolver::{ResolveError, resolve_with_override};
use crate::watcher::{DirectoryWatcher, WatchError};

/// Fatal errors that stop the agent before it starts dispatching.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to get the location of the downloads folder: {0}")]
    Resolve(#[from] ResolveError),

    #[error("failed to create the watcher: {0}")]
    Watcher(WatchError),

    #[error("failed to add the downloads folder to the watcher: {0}")]
    Subscribe(WatchError),
}

/// A running agent. Dropping it stops the watch.
#[derive(Debug)]
pub struct Agent {
    directory: PathBuf,
    watcher: DirectoryWatcher,
    dispatcher: JoinHandle<StopReason>,
}

impl Agent {
    /// Resolve the target directory, subscribe to it and start dispatching.
    ///
    /// The dispatcher task is only spawned once the subscription succeeded.
    pub fn start<L>(settings: &Settings, launcher: L) -> Result<Self, StartupError>
    where
        L: Launcher + 'static,
    {
        let directory = resolve_with_override(settings.watch.directory.as_deref())?;

        let (mut watcher, streams) = DirectoryWatcher::new().map_err(StartupError::Watcher)?;
        watcher
            .subscribe(&directory)
            .map_err(StartupError::Subscribe)?;

        let dispatcher = Dispatcher::new(launcher, settings.watch.target_extension());
        let dispatcher = tokio::spawn(dispatcher.run(streams));

        crate::log_event!("agent", "SUCCESS: watcher active", "{}", directory.display());

        Ok(Self {
            directory,
            watcher,
            dispatcher,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether the consumption loop is still running.
    pub fn is_dispatching(&self) -> bool {
        !self.dispatcher.is_finished()
    }

    /// Keep the watcher alive until the process exits.
    ///
    /// If the dispatcher stops, the agent stays resident but inert.
    pub async fn run_forever(self) {
        let Agent {
            directory,
            watcher,
            dispatcher,
        } = self;

        match dispatcher.await {
            Ok(reason) => {
                tracing::warn!(
                    "[agent] dispatcher stopped ({reason:?}), no longer watching {}",
                    directory.display()
                );
            }
            Err(e) => {
                tracing::error!("[agent] dispatcher task failed: {e}");
            }
        }

        let _watcher = watcher;
        std::future::pending::<()>().await;
    }
}
