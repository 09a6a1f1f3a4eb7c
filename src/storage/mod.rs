use crate::{
    domain::{BoardStatus, Deal, Folder, FolderId, Sprint, Task},
    error::Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

/// Everything the tracker persists. Collections are independent blobs so
/// a backend can store and recover them separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Board columns; empty means the defaults apply
    #[serde(default)]
    pub board_statuses: Vec<BoardStatus>,
    /// Folder collapse flags, true when folded shut
    #[serde(default)]
    pub folder_states: HashMap<FolderId, bool>,
    #[serde(default)]
    pub deals: Vec<Deal>,
}

/// Persistence port. The store writes the whole snapshot after every
/// mutation and reads it back once when it opens.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Loads the persisted snapshot. Absent state loads as empty
    /// collections, never an error.
    async fn load(&self) -> Result<Snapshot>;

    /// Replaces the persisted snapshot
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserializes_from_empty_object() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.sprints.is_empty());
        assert!(snapshot.folders.is_empty());
        assert!(snapshot.board_statuses.is_empty());
        assert!(snapshot.folder_states.is_empty());
        assert!(snapshot.deals.is_empty());
    }
}
