//! Logging to the append-only `logfile.log` sink.
//!
//! Every line carries a local timestamp and goes to a single plain-text file
//! that sits next to the running executable. Supports the `RUST_LOG`
//! environment variable for runtime overrides.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! file_name = "logfile.log"
//! default = "info"
//!
//! [logging.modules]
//! autolaunch = "debug"  # also show ignored events
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Date and time format: YYYY/MM/DD HH:MM:SS.mmm
struct LogTime;

impl FormatTime for LogTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y/%m/%d %H:%M:%S%.3f"))
    }
}

/// Location of the log file: `file_name` inside the executable's directory.
pub fn log_file_path(file_name: &str) -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable path {} has no parent directory", exe.display()),
        )
    })?;
    Ok(dir.join(file_name))
}

/// Open the log sink for appending, creating it if absent.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize logging into `sink`.
///
/// Call once at startup. Safe to call multiple times (only first call takes effect).
/// The `RUST_LOG` environment variable takes precedence over config settings.
pub fn init_with_config(config: &LoggingConfig, sink: File) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(config.filter_directive())
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(sink))
            .with_ansi(false)
            .with_target(false)
            .with_timer(LogTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event with component context.
///
/// # Examples
/// ```ignore
/// log_event!("dispatcher", "new file created", "{}", path.display());
/// log_event!("agent", "SUCCESS: watcher active");
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
///
/// # Examples
/// ```ignore
/// debug_event!("dispatcher", "ignored", "{}", path.display());
/// ```
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}
