use crate::{
    error::Result,
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// File-based storage: one JSON file per persisted collection inside a
/// dot-directory at the project root.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const SPRINTDECK_DIR: &'static str = ".sprintdeck";
    const TASKS_FILE: &'static str = "tasks.json";
    const SPRINTS_FILE: &'static str = "sprints.json";
    const FOLDERS_FILE: &'static str = "folders.json";
    const BOARD_STATUSES_FILE: &'static str = "board_statuses.json";
    const FOLDER_STATES_FILE: &'static str = "folder_states.json";
    const DEALS_FILE: &'static str = "deals.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::SPRINTDECK_DIR),
        }
    }

    fn blob_file(&self, name: &str) -> PathBuf {
        self.root_path.join(name)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Reads one collection file. A missing file is an empty collection;
    /// an unreadable one is discarded with a warning so the other
    /// collections still load.
    async fn read_blob<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.blob_file(name);
        if !path.exists() {
            return Ok(T::default());
        }

        let contents = fs::read_to_string(&path).await?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(file = name, error = %err, "ignoring unreadable state file, starting empty");
                Ok(T::default())
            }
        }
    }

    async fn write_blob<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.blob_file(name), json).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load(&self) -> Result<Snapshot> {
        if !self.root_path.exists() {
            return Ok(Snapshot::default());
        }

        Ok(Snapshot {
            tasks: self.read_blob(Self::TASKS_FILE).await?,
            sprints: self.read_blob(Self::SPRINTS_FILE).await?,
            folders: self.read_blob(Self::FOLDERS_FILE).await?,
            board_statuses: self.read_blob(Self::BOARD_STATUSES_FILE).await?,
            folder_states: self.read_blob(Self::FOLDER_STATES_FILE).await?,
            deals: self.read_blob(Self::DEALS_FILE).await?,
        })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        self.write_blob(Self::TASKS_FILE, &snapshot.tasks).await?;
        self.write_blob(Self::SPRINTS_FILE, &snapshot.sprints).await?;
        self.write_blob(Self::FOLDERS_FILE, &snapshot.folders).await?;
        self.write_blob(Self::BOARD_STATUSES_FILE, &snapshot.board_statuses)
            .await?;
        self.write_blob(Self::FOLDER_STATES_FILE, &snapshot.folder_states)
            .await?;
        self.write_blob(Self::DEALS_FILE, &snapshot.deals).await?;

        Ok(())
    }
}
