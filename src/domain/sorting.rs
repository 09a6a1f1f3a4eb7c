use crate::domain::task::Task;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Manual,
    Title,
    Points,
    Priority,
    Due,
    Created,
    Updated,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(SortField::Manual),
            "title" => Ok(SortField::Title),
            "points" => Ok(SortField::Points),
            "priority" => Ok(SortField::Priority),
            "due" => Ok(SortField::Due),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: manual, title, points, priority, due, created, updated",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Main sorting function for tasks
///
/// Sorts a slice of tasks in-place based on the specified field and order.
///
/// # Examples
/// ```
/// use sprintdeck_core::domain::sorting::{sort_tasks, SortField, SortOrder};
/// use sprintdeck_core::domain::task::{Task, TaskId};
///
/// let mut tasks = vec![
///     Task::new(TaskId::generate(), "Charlie".to_string()),
///     Task::new(TaskId::generate(), "Alpha".to_string()),
///     Task::new(TaskId::generate(), "Bravo".to_string()),
/// ];
///
/// sort_tasks(&mut tasks, SortField::Title, SortOrder::Ascending);
/// assert_eq!(tasks[0].title, "Alpha");
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let cmp = match field {
            SortField::Manual => compare_manual_order(a, b),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Points => a.points.cmp(&b.points),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Due => compare_option_dates(a.due_date, b.due_date),
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare by explicit drag position
///
/// Tasks with a manual order come before tasks without one; two explicit
/// positions compare numerically; two unordered tasks fall back to
/// creation time, newest first.
pub fn compare_manual_order(a: &Task, b: &Task) -> Ordering {
    match (a.manual_order, b.manual_order) {
        (Some(a_pos), Some(b_pos)) => a_pos.cmp(&b_pos),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

/// Compare Option<NaiveDate> with None always sorting to the end
fn compare_option_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
