use crate::analysis::{AnalysisResult, ScenarioRecord};
use crate::error::HistoryError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded, most-recent-first list of completed scenarios.
///
/// Readers get an `Arc` snapshot; `record` builds the next list and swaps it
/// in whole, so a reader never sees a half-updated list.
pub struct HistoryStore {
    path: Option<PathBuf>,
    capacity: usize,
    entries: RwLock<Arc<Vec<ScenarioRecord>>>,
}

impl HistoryStore {
    /// Store that lives only as long as the process
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            capacity: capacity.max(1),
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Load history from `path`. A missing or unreadable file starts empty.
    pub fn load(path: &Path, capacity: usize) -> Self {
        let mut entries: Vec<ScenarioRecord> = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                    Vec::new()
                }),
                Err(e) => {
                    warn!("Failed to read history file {}: {}", path.display(), e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let capacity = capacity.max(1);
        entries.truncate(capacity);
        debug!("Loaded {} history entries", entries.len());

        Self {
            path: Some(path.to_path_buf()),
            capacity,
            entries: RwLock::new(Arc::new(entries)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current entries, most recent first
    pub async fn snapshot(&self) -> Arc<Vec<ScenarioRecord>> {
        self.entries.read().await.clone()
    }

    pub async fn find(&self, id: Uuid) -> Option<ScenarioRecord> {
        self.snapshot().await.iter().find(|r| r.id == id).cloned()
    }

    /// Prepend a record for `result`, drop the oldest beyond capacity and persist.
    ///
    /// The in-memory list is updated even if writing the file fails.
    pub async fn record(&self, result: &AnalysisResult) -> Result<ScenarioRecord, HistoryError> {
        let record = ScenarioRecord::from_result(result);

        // Held through the write so the file never lags behind memory
        let mut guard = self.entries.write().await;
        let mut next = Vec::with_capacity(self.capacity);
        next.push(record.clone());
        next.extend(guard.iter().take(self.capacity - 1).cloned());
        *guard = Arc::new(next);

        self.save(guard.as_slice())?;
        Ok(record)
    }

    fn save(&self, entries: &[ScenarioRecord]) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| HistoryError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(path, json).map_err(|e| HistoryError::Io {
            path: path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PriorityWeights;
    use crate::testing::{sample_perspectives, sample_synthesis};
    use tempfile::TempDir;

    fn result(problem: &str) -> AnalysisResult {
        AnalysisResult {
            problem: problem.to_string(),
            context: String::new(),
            perspectives: sample_perspectives(),
            synthesis: sample_synthesis(),
            weights: PriorityWeights::default(),
        }
    }

    #[tokio::test]
    async fn test_record_is_bounded_and_most_recent_first() {
        let store = HistoryStore::in_memory(3);
        for i in 0..5 {
            store.record(&result(&format!("problem {}", i))).await.unwrap();
        }

        let entries = store.snapshot().await;
        let problems: Vec<_> = entries.iter().map(|r| r.problem.as_str()).collect();
        assert_eq!(problems, ["problem 4", "problem 3", "problem 2"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_unaffected_by_later_records() {
        let store = HistoryStore::in_memory(DEFAULT_CAPACITY);
        store.record(&result("first")).await.unwrap();
        let before = store.snapshot().await;

        store.record(&result("second")).await.unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/history.json");

        let store = HistoryStore::load(&path, DEFAULT_CAPACITY);
        let recorded = store.record(&result("Should we migrate?")).await.unwrap();
        assert!(path.exists());

        let reloaded = HistoryStore::load(&path, DEFAULT_CAPACITY);
        let found = reloaded.find(recorded.id).await.unwrap();
        assert_eq!(found.problem, "Should we migrate?");
        assert_eq!(found.result.unwrap().synthesis, sample_synthesis());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_records_leave_file_matching_memory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let store = Arc::new(HistoryStore::load(&path, 5));

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.record(&result(&format!("problem {}", i))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let in_memory: Vec<Uuid> = store.snapshot().await.iter().map(|r| r.id).collect();
        let on_disk: Vec<Uuid> = HistoryStore::load(&path, 5)
            .snapshot()
            .await
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(in_memory.len(), 5);
        assert_eq!(on_disk, in_memory);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        let store = HistoryStore::load(&path, DEFAULT_CAPACITY);
        assert!(store.snapshot().await.is_empty());
    }
}
