use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ulid::Ulid;

/// Unique identifier for a pipeline deal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(String);

impl DealId {
    /// Generates a fresh time-ordered id
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DealId {
    type Err = crate::error::SprintdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Ulid::from_string(s).is_ok() {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::error::SprintdeckError::InvalidId(s.to_string()))
        }
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage of a deal in the sales pipeline, in board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStage {
    Lead,
    Contacted,
    Proposal,
    Won,
    Lost,
}

impl DealStage {
    /// All stages in display order
    pub fn all() -> [DealStage; 5] {
        [
            Self::Lead,
            Self::Contacted,
            Self::Proposal,
            Self::Won,
            Self::Lost,
        ]
    }

    /// Whether the deal has left the working pipeline
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lead => write!(f, "Lead"),
            Self::Contacted => write!(f, "Contacted"),
            Self::Proposal => write!(f, "Proposal"),
            Self::Won => write!(f, "Won"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// A sales deal. Deals live in their own collection, fully separate from
/// the task board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub title: String,
    pub contact: Option<String>,
    pub value_cents: Option<i64>,
    pub stage: DealStage,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn new(id: DealId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            contact: None,
            value_cents: None,
            stage: DealStage::Lead,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamps the last-modified time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a deal. Stage defaults to `Lead`.
#[derive(Debug, Clone, Default)]
pub struct DealDraft {
    pub title: String,
    pub contact: Option<String>,
    pub value_cents: Option<i64>,
    pub stage: Option<DealStage>,
    pub notes: Option<String>,
}

impl DealDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Field-level changes applied to an existing deal
#[derive(Debug, Clone, Default)]
pub struct DealPatch {
    pub title: Option<String>,
    pub contact: Option<Option<String>>,
    pub value_cents: Option<Option<i64>>,
    pub stage: Option<DealStage>,
    pub notes: Option<Option<String>>,
}
