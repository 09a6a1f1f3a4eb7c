use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ulid::Ulid;

/// Unique identifier for a sprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SprintId(String);

impl SprintId {
    /// Generates a fresh time-ordered id
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SprintId {
    type Err = crate::error::SprintdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Ulid::from_string(s).is_ok() {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::error::SprintdeckError::InvalidId(s.to_string()))
        }
    }
}

impl fmt::Display for SprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a sprint, derived purely from its date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    Upcoming,
    Active,
    Completed,
}

impl SprintStatus {
    /// Derives the status of a date range as seen on `today`.
    /// The start and end days themselves count as active.
    pub fn for_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            Self::Upcoming
        } else if today > end {
            Self::Completed
        } else {
            Self::Active
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upcoming => write!(f, "Upcoming"),
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A sprint: a named, dated iteration that tasks are assigned to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: SprintId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub status: SprintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sprint {
    /// Creates a sprint, validating that the range is not inverted.
    /// The initial status is derived from the dates.
    pub fn new(
        id: SprintId,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, crate::error::SprintdeckError> {
        if start_date > end_date {
            return Err(crate::error::SprintdeckError::InvalidDateRange);
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            start_date,
            end_date,
            duration_days: inclusive_days(start_date, end_date),
            status: SprintStatus::for_dates(start_date, end_date, now.date_naive()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Stamps the last-modified time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replaces both dates atomically with validation, recomputing the
    /// stored duration
    pub fn set_dates(
        &mut self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), crate::error::SprintdeckError> {
        if start_date > end_date {
            return Err(crate::error::SprintdeckError::InvalidDateRange);
        }
        self.start_date = start_date;
        self.end_date = end_date;
        self.duration_days = inclusive_days(start_date, end_date);
        self.touch();
        Ok(())
    }

    /// The status this sprint's dates imply on the given day
    pub fn status_on(&self, today: NaiveDate) -> SprintStatus {
        SprintStatus::for_dates(self.start_date, self.end_date, today)
    }

    pub fn is_active(&self) -> bool {
        self.status == SprintStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == SprintStatus::Completed
    }
}

/// Number of calendar days in a range, counting both endpoints
fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    (end - start).num_days() as u32 + 1
}

/// Input for creating a sprint
#[derive(Debug, Clone)]
pub struct SprintDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: Option<u32>,
}

impl SprintDraft {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            duration_days: None,
        }
    }
}

/// Field-level changes applied to an existing sprint. Status is never
/// patched directly; it always follows the dates.
#[derive(Debug, Clone, Default)]
pub struct SprintPatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<u32>,
}
