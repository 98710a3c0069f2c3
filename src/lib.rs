//! Opens newly downloaded files with their default application.
//!
//! A single directory (by default `<home>/Downloads`) is watched for new
//! entries. Each creation whose extension matches the configured one is
//! handed to the platform's file-association handler, once per arrival.

pub mod agent;
pub mod config;
pub mod dispatcher;
pub mod launcher;
pub mod logging;
pub mod resolver;
pub mod watcher;

pub use agent::{Agent, StartupError};
pub use config::{ConfigError, LoggingConfig, Settings};
pub use dispatcher::{DispatchOutcome, Dispatcher, StopReason};
pub use launcher::{LaunchError, Launcher, SystemLauncher};
pub use resolver::{ResolveError, resolve_target_directory};
pub use watcher::{DirectoryWatcher, EventStreams, FileEvent, FileEventKind, WatchError};
