use crate::{
    error::Result,
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-memory storage: the snapshot lives behind a lock and vanishes with
/// the process. Used in tests and by embedders that keep state elsewhere.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Snapshot>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.lock().await = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskId};

    #[tokio::test]
    async fn test_new_storage_is_empty() {
        let storage = MemoryStorage::new();
        let snapshot = storage.load().await.unwrap();
        assert!(snapshot.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let storage = MemoryStorage::new();

        let mut snapshot = Snapshot::default();
        snapshot
            .tasks
            .push(Task::new(TaskId::generate(), "Remembered".to_string()));
        storage.save(&snapshot).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].title, "Remembered");
    }

    #[tokio::test]
    async fn test_with_snapshot_seeds_state() {
        let mut snapshot = Snapshot::default();
        snapshot
            .tasks
            .push(Task::new(TaskId::generate(), "Seeded".to_string()));

        let storage = MemoryStorage::with_snapshot(snapshot);
        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.tasks[0].title, "Seeded");
    }
}
