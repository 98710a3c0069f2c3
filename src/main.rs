use std::path::PathBuf;

use autolaunch::{Agent, LoggingConfig, Settings, SystemLauncher, logging};
use clap::Parser;

#[derive(Parser)]
#[command(name = "autolaunch")]
#[command(version)]
#[command(about = "Opens newly downloaded files with their default application")]
struct Cli {
    /// Settings file (defaults to autolaunch.toml next to the executable)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            // Settings are unusable; report through the default sink
            eprintln!("Configuration error: {e}");
            if init_log_sink(&LoggingConfig::default()) {
                tracing::error!("[agent] Configuration error: {e}");
            }
            return;
        }
    };

    if cli.print_config {
        match settings.to_toml() {
            Ok(toml_str) => println!("{toml_str}"),
            Err(e) => eprintln!("Error displaying config: {e}"),
        }
        return;
    }

    if !init_log_sink(&settings.logging) {
        return;
    }

    let launcher = match SystemLauncher::from_config(settings.launch.command.as_deref()) {
        Ok(launcher) => launcher,
        Err(e) => {
            tracing::error!("[agent] failed to set up the launcher: {e}");
            return;
        }
    };

    let agent = match Agent::start(&settings, launcher) {
        Ok(agent) => agent,
        Err(e) => {
            tracing::error!("[agent] {e}");
            return;
        }
    };

    println!("SUCCESS: watcher active");
    agent.run_forever().await;
}

/// Open the log file next to the executable and route tracing into it.
///
/// Returns false after reporting to stderr when the sink cannot be opened.
fn init_log_sink(config: &LoggingConfig) -> bool {
    let log_path = match logging::log_file_path(&config.file_name) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error getting executable path: {e}");
            return false;
        }
    };
    let log_file = match logging::open_log_file(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to open logfile {}: {e}", log_path.display());
            return false;
        }
    };
    logging::init_with_config(config, log_file);
    true
}
