//! Opening files with their default application.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Launch command is empty")]
    EmptyCommand,

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
}

/// Opens a file. The dispatcher awaits each call before reading the next event.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Launches through the operating system's file-association handler, or
/// through a configured command.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    program: String,
    args: Vec<String>,
}

impl SystemLauncher {
    /// Launcher for the current platform's default-handler mechanism.
    pub fn platform_default() -> Self {
        let (program, args) = platform_command();
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Launcher that runs `command[0]` with the remaining elements followed
    /// by the file path.
    pub fn from_command(command: &[String]) -> Result<Self, LaunchError> {
        let (program, args) = command.split_first().ok_or(LaunchError::EmptyCommand)?;
        if program.is_empty() {
            return Err(LaunchError::EmptyCommand);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Configured command if present, otherwise the platform default.
    pub fn from_config(command: Option<&[String]>) -> Result<Self, LaunchError> {
        match command {
            Some(command) => Self::from_command(command),
            None => Ok(Self::platform_default()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[cfg(target_os = "windows")]
fn platform_command() -> (&'static str, &'static [&'static str]) {
    ("rundll32", &["url.dll,FileProtocolHandler"])
}

#[cfg(target_os = "macos")]
fn platform_command() -> (&'static str, &'static [&'static str]) {
    ("open", &[])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_command() -> (&'static str, &'static [&'static str]) {
    ("xdg-open", &[])
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::ExitStatus {
                program: self.program.clone(),
                status,
            })
        }
    }
}
