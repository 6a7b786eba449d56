//! Build trigger.
//!
//! The archive is rebuilt from a cron job that runs far more often than
//! documents arrive. Whatever adds a document also drops a marker file
//! (`semaphore` by default) into the archive root; a run only builds while
//! the marker exists and removes it once the build succeeded. A failed build
//! leaves the marker in place, so the next run retries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Cannot check trigger {path}: {source}")]
    Check { path: PathBuf, source: io::Error },
    #[error("Cannot remove trigger {path}: {source}")]
    Clear { path: PathBuf, source: io::Error },
}

/// A present trigger marker.
#[derive(Debug)]
pub struct Trigger {
    path: PathBuf,
}

impl Trigger {
    /// Returns the trigger if the marker exists.
    pub fn find(path: &Path) -> Result<Option<Trigger>, TriggerError> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(Some(Trigger {
                path: path.to_path_buf(),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TriggerError::Check {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the marker after a successful build.
    pub fn clear(self) -> Result<(), TriggerError> {
        fs::remove_file(&self.path).map_err(|source| TriggerError::Clear {
            path: self.path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_marker() {
        let tmp = TempDir::new().unwrap();
        assert!(Trigger::find(&tmp.path().join("semaphore")).unwrap().is_none());
    }

    #[test]
    fn present_marker_is_cleared() {
        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("semaphore");
        fs::write(&marker, "").unwrap();

        let trigger = Trigger::find(&marker).unwrap().unwrap();
        assert_eq!(trigger.path(), marker);
        trigger.clear().unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn clearing_a_vanished_marker_is_error() {
        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("semaphore");
        fs::write(&marker, "").unwrap();

        let trigger = Trigger::find(&marker).unwrap().unwrap();
        fs::remove_file(&marker).unwrap();
        assert!(matches!(trigger.clear(), Err(TriggerError::Clear { .. })));
    }
}
