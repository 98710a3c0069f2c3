use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use autolaunch::{Agent, LaunchError, Launcher, Settings, StartupError, WatchError};
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
struct RecordingLauncher {
    launched: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingLauncher {
    fn launched(&self) -> Vec<PathBuf> {
        self.launched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        self.launched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn settings_for(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.watch.directory = Some(dir.to_path_buf());
    settings
}

async fn wait_for_launches(launcher: &RecordingLauncher, count: usize) -> Vec<PathBuf> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let launched = launcher.launched();
            if launched.len() >= count {
                return launched;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("timed out waiting for launches")
}

#[tokio::test]
async fn test_subscription_failure_does_not_start_dispatching() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("Downloads");
    let launcher = RecordingLauncher::default();

    let result = Agent::start(&settings_for(&missing), launcher.clone());

    match result {
        Err(StartupError::Subscribe(WatchError::PathWatchFailed { path, .. })) => {
            assert_eq!(path, missing);
        }
        other => panic!("expected subscribe failure, got {other:?}"),
    }
    assert!(launcher.launched().is_empty());
}

#[tokio::test]
async fn test_new_matching_file_is_launched_once() {
    let temp_dir = TempDir::new().unwrap();
    let launcher = RecordingLauncher::default();

    let agent = Agent::start(&settings_for(temp_dir.path()), launcher.clone()).unwrap();
    assert_eq!(agent.directory(), temp_dir.path());
    assert!(agent.is_dispatching());

    std::fs::write(temp_dir.path().join("notes.txt"), b"ignored").unwrap();
    std::fs::write(temp_dir.path().join("plan.nfp"), b"launch me").unwrap();

    let launched = wait_for_launches(&launcher, 1).await;
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].file_name().unwrap(), "plan.nfp");

    // Writes to the same file are not creations
    std::fs::write(temp_dir.path().join("plan.nfp"), b"more data").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(launcher.launched().len(), 1);
}

// inotify reports the rename destination; FSEvents only reports a generic rename
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_file_renamed_into_place_is_launched() {
    let temp_dir = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let launcher = RecordingLauncher::default();

    let _agent = Agent::start(&settings_for(temp_dir.path()), launcher.clone()).unwrap();

    // Download tools write a partial file, then rename it to its final name
    let partial = temp_dir.path().join("plan.nfp.part");
    std::fs::write(&partial, b"partial").unwrap();
    std::fs::rename(&partial, temp_dir.path().join("plan.nfp")).unwrap();

    // Moved in from elsewhere on the same filesystem
    let outside = staging.path().join("other.nfp");
    std::fs::write(&outside, b"other").unwrap();
    if std::fs::rename(&outside, temp_dir.path().join("other.nfp")).is_err() {
        // Different filesystems; copy instead
        std::fs::copy(&outside, temp_dir.path().join("other.nfp")).unwrap();
    }

    let launched = wait_for_launches(&launcher, 2).await;
    let names: Vec<_> = launched
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["plan.nfp", "other.nfp"]);
}
