use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ulid::Ulid;

/// Unique identifier for a folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(String);

impl FolderId {
    /// Generates a fresh time-ordered id
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FolderId {
    type Err = crate::error::SprintdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Ulid::from_string(s).is_ok() {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::error::SprintdeckError::InvalidId(s.to_string()))
        }
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of backlog tasks. Collapse state is kept separately
/// so a folder record never changes when the user folds it shut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(id: FolderId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamps the last-modified time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a folder
#[derive(Debug, Clone, Default)]
pub struct FolderDraft {
    pub name: String,
    pub description: Option<String>,
}

impl FolderDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Field-level changes applied to an existing folder
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}
