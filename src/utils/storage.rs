use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::to_string_pretty;

use super::error::Result;
use crate::models::Snapshot;

// Keeps the last snapshot in a JSON file between runs.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The previous snapshot, or `None` on the first run (missing or empty file).
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let file_exists_and_non_empty = self.path.exists()
            && fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false);
        if !file_exists_and_non_empty {
            info!("No previous snapshot at {}", self.path.display());
            return Ok(None);
        }
        // Baseline written by the previous run
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    // Overwrites the file with `snapshot`, which becomes the next run's baseline.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        fs::write(&self.path, to_string_pretty(snapshot)?)?;
        info!("Saved {} courses to {}", snapshot.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseSnapshot, Grade};
    use crate::utils::error::Error;

    fn temp_store(name: &str) -> SnapshotStore {
        let path = std::env::temp_dir().join(format!("gradewatch-{}-{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        SnapshotStore::new(path)
    }

    #[test]
    fn first_run_has_no_baseline() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), "").unwrap();
        assert!(store.load().unwrap().is_none());
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let store = temp_store("saved");
        let snapshot: Snapshot = vec![CourseSnapshot {
            class_name: "CS101".into(),
            grades: vec![Grade {
                title: "HW1".into(),
                score: "9".into(),
                max_score: "10".into(),
                comment: "ok".into(),
            }],
            final_letter: Some("A".into()),
            final_percent: None,
        }]
        .into_iter()
        .collect();

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(Error::Json(_))));
        fs::remove_file(store.path()).unwrap();
    }
}
