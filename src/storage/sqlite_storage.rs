use crate::{
    error::{Result, SprintdeckError},
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use tracing::warn;

/// SQLite-backed storage: one row per persisted collection in a plain
/// key/value table. Calls are short and run on the caller's thread.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

const TASKS_KEY: &str = "tasks";
const SPRINTS_KEY: &str = "sprints";
const FOLDERS_KEY: &str = "folders";
const BOARD_STATUSES_KEY: &str = "board_statuses";
const FOLDER_STATES_KEY: &str = "folder_states";
const DEALS_KEY: &str = "deals";

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(database_path).map_err(sqlite_err)?;
        Self::from_connection(conn)
    }

    /// Opens a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .map_err(sqlite_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SprintdeckError::StorageError("storage lock poisoned".to_string()))
    }
}

/// Reads one collection row. A missing row is an empty collection; an
/// unreadable one is discarded with a warning so the other collections
/// still load.
fn read_blob<T>(conn: &Connection, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let row: Option<String> = conn
        .query_row("SELECT value FROM blobs WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(sqlite_err)?;

    match row {
        None => Ok(T::default()),
        Some(json) => match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable state row, starting empty");
                Ok(T::default())
            }
        },
    }
}

fn write_blob<T>(conn: &Connection, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO blobs (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, json],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

fn sqlite_err(err: rusqlite::Error) -> SprintdeckError {
    SprintdeckError::StorageError(err.to_string())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn load(&self) -> Result<Snapshot> {
        let conn = self.conn()?;
        Ok(Snapshot {
            tasks: read_blob(&conn, TASKS_KEY)?,
            sprints: read_blob(&conn, SPRINTS_KEY)?,
            folders: read_blob(&conn, FOLDERS_KEY)?,
            board_statuses: read_blob(&conn, BOARD_STATUSES_KEY)?,
            folder_states: read_blob(&conn, FOLDER_STATES_KEY)?,
            deals: read_blob(&conn, DEALS_KEY)?,
        })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqlite_err)?;

        write_blob(&tx, TASKS_KEY, &snapshot.tasks)?;
        write_blob(&tx, SPRINTS_KEY, &snapshot.sprints)?;
        write_blob(&tx, FOLDERS_KEY, &snapshot.folders)?;
        write_blob(&tx, BOARD_STATUSES_KEY, &snapshot.board_statuses)?;
        write_blob(&tx, FOLDER_STATES_KEY, &snapshot.folder_states)?;
        write_blob(&tx, DEALS_KEY, &snapshot.deals)?;

        tx.commit().map_err(sqlite_err)?;
        Ok(())
    }
}
