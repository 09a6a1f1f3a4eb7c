use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a board column, a slug derived from the column name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusId(String);

impl StatusId {
    /// Wraps an existing slug
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the slug for a column name: lowercased, whitespace removed.
    /// "In Progress" becomes "inprogress".
    pub fn from_name(name: &str) -> Self {
        Self(
            name.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase(),
        )
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A board column. Lower `order` values sort first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardStatus {
    pub id: StatusId,
    pub name: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BoardStatus {
    pub fn new(name: String, order: u32) -> Self {
        Self {
            id: StatusId::from_name(&name),
            name,
            order,
            color: None,
        }
    }

    /// The canonical column set used when no customizations exist
    pub fn defaults() -> Vec<BoardStatus> {
        vec![
            BoardStatus::new("To Do".to_string(), 1),
            BoardStatus::new("In Progress".to_string(), 2),
            BoardStatus::new("Review".to_string(), 3),
            BoardStatus::new("Done".to_string(), 4),
        ]
    }

    /// Id of the default terminal column
    pub fn done_id() -> StatusId {
        StatusId::new("done")
    }
}

/// Input for adding a board column. Id defaults to the name's slug,
/// order to the end of the board.
#[derive(Debug, Clone, Default)]
pub struct BoardStatusDraft {
    pub name: String,
    pub id: Option<StatusId>,
    pub order: Option<u32>,
    pub color: Option<String>,
}

impl BoardStatusDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Field-level changes applied to an existing board column
#[derive(Debug, Clone, Default)]
pub struct BoardStatusPatch {
    pub name: Option<String>,
    pub order: Option<u32>,
    pub color: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        assert_eq!(StatusId::from_name("To Do").as_str(), "todo");
        assert_eq!(StatusId::from_name("In Progress").as_str(), "inprogress");
        assert_eq!(StatusId::from_name("QA  Ready").as_str(), "qaready");
        assert_eq!(StatusId::from_name("Done").as_str(), "done");
    }

    #[test]
    fn test_default_columns() {
        let defaults = BoardStatus::defaults();
        assert_eq!(defaults.len(), 4);

        let ids: Vec<&str> = defaults.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "inprogress", "review", "done"]);

        let orders: Vec<u32> = defaults.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_done_id_matches_default_column() {
        let defaults = BoardStatus::defaults();
        assert!(defaults.iter().any(|s| s.id == BoardStatus::done_id()));
    }

    #[test]
    fn test_color_omitted_when_unset() {
        let status = BoardStatus::new("To Do".to_string(), 1);
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("color"));
    }
}
