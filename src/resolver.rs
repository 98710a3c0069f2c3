//! Resolution of the directory the agent watches.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Folder name appended to the user's home directory.
pub const DOWNLOADS_DIR_NAME: &str = "Downloads";

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to determine the current user's home directory")]
    HomeDirUnavailable,
}

/// `<home>/Downloads` for the user running this process.
///
/// The path is returned whether or not it exists; the watch subscription is
/// what reports a missing directory.
pub fn resolve_target_directory() -> Result<PathBuf, ResolveError> {
    let home = dirs::home_dir().ok_or(ResolveError::HomeDirUnavailable)?;
    Ok(downloads_dir_in(&home))
}

/// Configured directory if present, otherwise the resolved Downloads folder.
pub fn resolve_with_override(directory: Option<&Path>) -> Result<PathBuf, ResolveError> {
    match directory {
        Some(dir) => Ok(dir.to_path_buf()),
        None => resolve_target_directory(),
    }
}

fn downloads_dir_in(home: &Path) -> PathBuf {
    home.join(DOWNLOADS_DIR_NAME)
}
