//! Translation of raw notify events into [`FileEvent`]s.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// What happened to a path, as far as the dispatcher cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    /// A new entry appeared, either created in place or moved in by rename.
    Create,
    /// Anything else (writes, removals, metadata, access).
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileEventKind::Create)
    }

    pub fn other(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileEventKind::Other)
    }

    pub fn is_create(&self) -> bool {
        self.kind == FileEventKind::Create
    }
}

/// Split a notify event into one [`FileEvent`] per path, in the order notify
/// reported them.
///
/// Download tools usually write to a temporary name and rename it into place,
/// so the destination side of a rename counts as a creation.
pub fn file_events(event: Event) -> Vec<FileEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.into_iter().map(FileEvent::create).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.into_iter().map(FileEvent::create).collect()
        }
        // paths = [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                if i == 1 {
                    FileEvent::create(path)
                } else {
                    FileEvent::other(path)
                }
            })
            .collect(),
        _ => event.paths.into_iter().map(FileEvent::other).collect(),
    }
}
