use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::{
    domain::{compare_manual_order, BoardStatus, FolderId, SprintId, Task, TaskId},
    storage::Storage,
};

use super::Store;

/// Burn-up series for one sprint: one sample per sprint day, with the
/// ideal line rising linearly from zero to the sprint's total points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintProgress {
    pub total_points: u32,
    pub completed_points: u32,
    pub days: Vec<NaiveDate>,
    pub ideal: Vec<f64>,
    pub actual: Vec<f64>,
}

impl<S: Storage> Store<S> {
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.state.tasks.iter().find(|t| &t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    /// Every task filed in the folder, subtasks included. `None` is the
    /// unfiled scope.
    pub fn tasks_by_folder(&self, folder_id: Option<&FolderId>) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.folder_id.as_ref() == folder_id)
            .collect()
    }

    /// Every task assigned to the sprint, subtasks included
    pub fn tasks_by_sprint(&self, sprint_id: &SprintId) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.sprint_id.as_ref() == Some(sprint_id))
            .collect()
    }

    /// Top-level, not-yet-done tasks in a folder, manual order first and
    /// newest-created first among the unordered
    pub fn parent_tasks_for_folder(&self, folder_id: Option<&FolderId>) -> Vec<&Task> {
        let done = BoardStatus::done_id();
        let mut tasks: Vec<&Task> = self
            .state
            .tasks
            .iter()
            .filter(|t| t.folder_id.as_ref() == folder_id)
            .filter(|t| !t.is_subtask() && t.status.column() != Some(&done))
            .collect();
        tasks.sort_by(|a, b| compare_manual_order(a, b));
        tasks
    }

    /// Resolves a task's subtask summaries to full records, in summary
    /// order, recursing depth-first when `include_nested` is set. An
    /// unknown parent yields an empty list.
    pub fn all_subtasks(&self, parent_id: &TaskId, include_nested: bool) -> Vec<&Task> {
        let mut out = Vec::new();
        if let Some(parent) = self.task(parent_id) {
            for summary in &parent.subtasks {
                if let Some(record) = self.task(&summary.id) {
                    out.push(record);
                    if include_nested {
                        out.extend(self.all_subtasks(&record.id, true));
                    }
                }
            }
        }
        out
    }

    /// The sprint board's flat task list: each top-level sprint task
    /// followed by its subtasks that are individually in the sprint.
    /// Sprint subtasks whose parent is off the board appear standalone;
    /// no task appears twice.
    pub fn flat_tasks_for_sprint_board(&self, sprint_id: &SprintId) -> Vec<&Task> {
        let mut flat: Vec<&Task> = Vec::new();
        let mut seen: HashSet<&TaskId> = HashSet::new();

        for task in self
            .state
            .tasks
            .iter()
            .filter(|t| !t.is_subtask() && t.sprint_id.as_ref() == Some(sprint_id))
        {
            flat.push(task);
            seen.insert(&task.id);
            for summary in &task.subtasks {
                if seen.contains(&summary.id) {
                    continue;
                }
                if let Some(record) = self.task(&summary.id) {
                    if record.sprint_id.as_ref() == Some(sprint_id) {
                        flat.push(record);
                        seen.insert(&record.id);
                    }
                }
            }
        }

        for task in self
            .state
            .tasks
            .iter()
            .filter(|t| t.is_subtask() && t.sprint_id.as_ref() == Some(sprint_id))
        {
            if !seen.contains(&task.id) {
                flat.push(task);
            }
        }
        flat
    }

    /// Burn-up data for a sprint, computed over its board task list
    pub fn sprint_progress(&self, sprint_id: &SprintId) -> Option<SprintProgress> {
        let sprint = self.sprint(sprint_id)?;
        let done = BoardStatus::done_id();
        let tasks = self.flat_tasks_for_sprint_board(sprint_id);

        let total_points: u32 = tasks.iter().map(|t| t.points).sum();
        let completed_points: u32 = tasks
            .iter()
            .filter(|t| t.status.column() == Some(&done))
            .map(|t| t.points)
            .sum();

        let span = (sprint.end_date - sprint.start_date).num_days().max(0) as usize;
        let samples = span + 1;
        let mut days = Vec::with_capacity(samples);
        let mut ideal = Vec::with_capacity(samples);
        let mut actual = Vec::with_capacity(samples);
        for i in 0..samples {
            days.push(sprint.start_date + Duration::days(i as i64));
            let target = if samples == 1 {
                total_points as f64
            } else {
                total_points as f64 * i as f64 / (samples - 1) as f64
            };
            ideal.push(target);
            actual.push((completed_points as f64).min(target));
        }

        Some(SprintProgress {
            total_points,
            completed_points,
            days,
            ideal,
            actual,
        })
    }

    /// Done points per completed sprint, for the `limit` most recently
    /// ended ones, oldest first
    pub fn sprint_velocity(&self, limit: usize) -> Vec<(SprintId, u32)> {
        let done = BoardStatus::done_id();
        let mut completed: Vec<_> = self
            .state
            .sprints
            .iter()
            .filter(|s| s.is_completed())
            .collect();
        completed.sort_by_key(|s| s.end_date);

        completed
            .iter()
            .rev()
            .take(limit)
            .rev()
            .map(|sprint| {
                let points = self
                    .state
                    .tasks
                    .iter()
                    .filter(|t| t.sprint_id.as_ref() == Some(&sprint.id))
                    .filter(|t| t.status.column() == Some(&done))
                    .map(|t| t.points)
                    .sum();
                (sprint.id.clone(), points)
            })
            .collect()
    }
}
