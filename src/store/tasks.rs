use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::{
    domain::{
        points_on_scale, BoardStatus, FolderId, SprintId, Task, TaskDraft, TaskId, TaskPatch,
        TaskStatus,
    },
    error::{Result, SprintdeckError},
    storage::Storage,
};

use super::Store;

impl<S: Storage> Store<S> {
    /// Validates a draft and builds the task record. Subtasks inherit the
    /// parent's folder unless the draft names one.
    fn build_task(&self, draft: TaskDraft, parent: Option<&Task>) -> Result<Task> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(SprintdeckError::EmptyTitle);
        }
        if let Some(points) = draft.points {
            if !points_on_scale(points) {
                return Err(SprintdeckError::InvalidPoints(points));
            }
        }

        let folder_id = draft
            .folder_id
            .or_else(|| parent.and_then(|p| p.folder_id.clone()));
        if self.state.tasks.iter().any(|t| {
            t.title == title && t.folder_id == folder_id && t.sprint_id == draft.sprint_id
        }) {
            warn!(title = %title, "refusing duplicate task");
            return Err(SprintdeckError::DuplicateTask { title });
        }

        let status = match draft.status {
            Some(status) => status,
            None if draft.sprint_id.is_some() => TaskStatus::Board(self.first_board_status().id),
            None => TaskStatus::Backlog,
        };

        let mut task = Task::new(TaskId::generate(), title);
        task.description = draft.description;
        if let Some(points) = draft.points {
            task.points = points;
        }
        if let Some(priority) = draft.priority {
            task.priority = priority;
        }
        task.due_date = draft.due_date;
        task.sprint_id = draft.sprint_id;
        task.folder_id = folder_id;
        task.status = status;
        task.recurrence = draft.recurrence;
        task.parent_task_id = parent.map(|p| p.id.clone());
        Ok(task)
    }

    pub(super) fn get_task_mut(&mut self, id: &TaskId) -> Result<&mut Task> {
        self.state
            .tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| SprintdeckError::TaskNotFound(id.to_string()))
    }

    /// Copies the child's summary back into its parent, if it has one
    fn sync_parent_summary(&mut self, child: &Task) {
        let Some(parent_id) = child.parent_task_id.clone() else {
            return;
        };
        let summary = child.summary();
        if let Some(parent) = self.state.tasks.iter_mut().find(|t| t.id == parent_id) {
            if let Some(entry) = parent.subtasks.iter_mut().find(|s| s.id == summary.id) {
                *entry = summary;
                parent.touch();
            }
        }
    }

    /// Creates a task. Tasks created into a sprint land in the board's
    /// first column; everything else starts in the backlog.
    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let task = self.build_task(draft, None)?;
        debug!(task = %task.id, title = %task.title, "created task");

        self.state.tasks.push(task.clone());
        self.persist().await?;
        Ok(task)
    }

    /// Creates a subtask under an existing task and records its summary on
    /// the parent.
    pub async fn create_subtask(&mut self, parent_id: &TaskId, draft: TaskDraft) -> Result<Task> {
        let parent = self
            .state
            .tasks
            .iter()
            .find(|t| &t.id == parent_id)
            .ok_or_else(|| SprintdeckError::TaskNotFound(parent_id.to_string()))?;
        let subtask = self.build_task(draft, Some(parent))?;
        let summary = subtask.summary();

        debug!(task = %subtask.id, parent = %parent_id, "created subtask");
        self.state.tasks.push(subtask.clone());

        let parent = self.get_task_mut(parent_id)?;
        parent.subtasks.push(summary);
        parent.touch();

        self.persist().await?;
        Ok(subtask)
    }

    /// Validates and applies a patch in memory, deriving the board status
    /// when sprint membership changes without an explicit status.
    fn apply_task_patch(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        if let Some(points) = patch.points {
            if !points_on_scale(points) {
                return Err(SprintdeckError::InvalidPoints(points));
            }
        }
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(SprintdeckError::EmptyTitle);
            }
        }

        let derived_status = match (&patch.sprint_id, &patch.status) {
            (Some(Some(_)), None) => Some(TaskStatus::Board(self.first_board_status().id)),
            (Some(None), None) => Some(TaskStatus::Backlog),
            _ => None,
        };

        let task = self.get_task_mut(id)?;
        task.apply_patch(patch);
        if let Some(status) = derived_status {
            task.status = status;
        }
        Ok(task.clone())
    }

    /// Merges a patch into a task. Patching a subtask keeps the parent's
    /// summary in sync.
    pub async fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        let task = self.apply_task_patch(id, patch)?;
        self.sync_parent_summary(&task);
        self.persist().await?;
        Ok(task)
    }

    /// Merges a patch into a subtask of the given parent. The parent must
    /// still exist; its summary entry and timestamp are refreshed.
    pub async fn update_subtask(
        &mut self,
        parent_id: &TaskId,
        subtask_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task> {
        if !self.state.tasks.iter().any(|t| &t.id == parent_id) {
            return Err(SprintdeckError::TaskNotFound(parent_id.to_string()));
        }

        let subtask = self.apply_task_patch(subtask_id, patch)?;
        self.sync_parent_summary(&subtask);
        self.persist().await?;
        Ok(subtask)
    }

    /// Flips a subtask's completion flag and returns the new value
    pub async fn toggle_subtask_complete(
        &mut self,
        parent_id: &TaskId,
        subtask_id: &TaskId,
    ) -> Result<bool> {
        let current = self
            .state
            .tasks
            .iter()
            .find(|t| &t.id == subtask_id)
            .map(|t| t.completed)
            .ok_or_else(|| SprintdeckError::TaskNotFound(subtask_id.to_string()))?;

        self.update_subtask(
            parent_id,
            subtask_id,
            TaskPatch {
                completed: Some(!current),
                ..TaskPatch::default()
            },
        )
        .await?;
        Ok(!current)
    }

    /// Deletes a task along with every nested subtask under it. A surviving
    /// parent loses its summary entry.
    pub async fn delete_task(&mut self, id: &TaskId) -> Result<()> {
        let task = self
            .state
            .tasks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| SprintdeckError::TaskNotFound(id.to_string()))?;
        let parent_id = task.parent_task_id.clone();

        let mut doomed = HashSet::new();
        self.collect_descendants(id, &mut doomed);
        self.state.tasks.retain(|t| !doomed.contains(&t.id));

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.state.tasks.iter_mut().find(|t| t.id == parent_id) {
                parent.subtasks.retain(|s| &s.id != id);
                parent.touch();
            }
        }

        debug!(task = %id, removed = doomed.len(), "deleted task");
        self.persist().await?;
        Ok(())
    }

    /// Walks `parent_task_id` links downward. The insert guard keeps a
    /// corrupted cyclic link from looping forever.
    fn collect_descendants(&self, id: &TaskId, doomed: &mut HashSet<TaskId>) {
        if !doomed.insert(id.clone()) {
            return;
        }
        let children: Vec<TaskId> = self
            .state
            .tasks
            .iter()
            .filter(|t| t.parent_task_id.as_ref() == Some(id))
            .map(|t| t.id.clone())
            .collect();
        for child in children {
            self.collect_descendants(&child, doomed);
        }
    }

    /// Deletes a subtask and drops it from the named parent's summary. The
    /// parent reference is allowed to be stale.
    pub async fn delete_subtask(&mut self, parent_id: &TaskId, subtask_id: &TaskId) -> Result<()> {
        if !self.state.tasks.iter().any(|t| &t.id == subtask_id) {
            return Err(SprintdeckError::TaskNotFound(subtask_id.to_string()));
        }

        if let Some(parent) = self.state.tasks.iter_mut().find(|t| &t.id == parent_id) {
            parent.subtasks.retain(|s| &s.id != subtask_id);
            parent.touch();
        }
        self.delete_task(subtask_id).await
    }

    /// Moves a task into a sprint, or back to the backlog with `None`.
    /// Entering a sprint puts the task in the board's first column.
    pub async fn assign_task_to_sprint(
        &mut self,
        id: &TaskId,
        sprint_id: Option<&SprintId>,
    ) -> Result<Task> {
        if let Some(sprint_id) = sprint_id {
            if !self.state.sprints.iter().any(|s| &s.id == sprint_id) {
                return Err(SprintdeckError::SprintNotFound(sprint_id.to_string()));
            }
        }
        let status = match sprint_id {
            Some(_) => TaskStatus::Board(self.first_board_status().id),
            None => TaskStatus::Backlog,
        };

        let task = self.get_task_mut(id)?;
        task.sprint_id = sprint_id.cloned();
        task.status = status;
        task.touch();
        let task = task.clone();

        debug!(task = %task.id, sprint = ?task.sprint_id, "assigned task to sprint");
        self.persist().await?;
        Ok(task)
    }

    /// Moves a task into a folder, or unfiles it with `None`. The task is
    /// ordered after the folder's existing members.
    pub async fn move_task_to_folder(
        &mut self,
        id: &TaskId,
        folder_id: Option<&FolderId>,
    ) -> Result<Task> {
        if let Some(folder_id) = folder_id {
            if !self.state.folders.iter().any(|f| &f.id == folder_id) {
                return Err(SprintdeckError::FolderNotFound(folder_id.to_string()));
            }
        }

        let next_order = self
            .state
            .tasks
            .iter()
            .filter(|t| &t.id != id && !t.is_subtask() && t.folder_id.as_ref() == folder_id)
            .filter_map(|t| t.manual_order)
            .max()
            .map(|order| order + 1)
            .unwrap_or(0);

        let task = self.get_task_mut(id)?;
        task.folder_id = folder_id.cloned();
        task.manual_order = Some(next_order);
        task.touch();
        let task = task.clone();

        debug!(task = %task.id, folder = ?task.folder_id, "moved task to folder");
        self.persist().await?;
        Ok(task)
    }

    /// Shows or hides a task's subtask list
    pub async fn set_task_expanded(&mut self, id: &TaskId, expanded: bool) -> Result<()> {
        let task = self.get_task_mut(id)?;
        task.expanded = Some(expanded);
        task.touch();
        self.persist().await?;
        Ok(())
    }

    /// Flips a task's subtask list visibility and returns the new value
    pub async fn toggle_task_expanded(&mut self, id: &TaskId) -> Result<bool> {
        let next = {
            let task = self
                .state
                .tasks
                .iter()
                .find(|t| &t.id == id)
                .ok_or_else(|| SprintdeckError::TaskNotFound(id.to_string()))?;
            !task.is_expanded()
        };
        self.set_task_expanded(id, next).await?;
        Ok(next)
    }

    /// Spawns the follow-up occurrences a completed recurring task calls
    /// for. Non-recurring tasks spawn nothing, and their subtasks are not
    /// considered.
    pub async fn spawn_recurring(&mut self, id: &TaskId) -> Result<Vec<Task>> {
        self.spawn_recurring_on(id, Utc::now().date_naive()).await
    }

    /// Same as [`spawn_recurring`](Self::spawn_recurring) with an explicit
    /// reference day for the follow-up due dates. Follow-ups are created as
    /// top-level backlog tasks; while an identical occurrence is still
    /// open, the spawn is skipped.
    pub async fn spawn_recurring_on(
        &mut self,
        id: &TaskId,
        today: NaiveDate,
    ) -> Result<Vec<Task>> {
        if !self.state.tasks.iter().any(|t| &t.id == id) {
            return Err(SprintdeckError::TaskNotFound(id.to_string()));
        }
        let done = BoardStatus::done_id();

        let mut spawned = Vec::new();
        let mut queue = vec![id.clone()];
        while let Some(next) = queue.pop() {
            let Some(task) = self.state.tasks.iter().find(|t| t.id == next).cloned() else {
                continue;
            };
            let Some(kind) = task.recurrence else {
                continue;
            };
            queue.extend(task.subtasks.iter().map(|s| s.id.clone()));

            let open_duplicate = self.state.tasks.iter().any(|t| {
                t.id != task.id
                    && !t.completed
                    && t.status.column() != Some(&done)
                    && t.sprint_id.is_none()
                    && t.folder_id == task.folder_id
                    && t.title == task.title
            });
            if open_duplicate {
                debug!(source = %task.id, "follow-up already open, skipping");
                continue;
            }

            let mut follow_up = Task::new(TaskId::generate(), task.title.clone());
            follow_up.description = task.description.clone();
            follow_up.points = task.points;
            follow_up.priority = task.priority;
            follow_up.due_date = kind.next_due(today);
            follow_up.folder_id = task.folder_id.clone();
            follow_up.recurrence = task.recurrence;

            debug!(source = %task.id, spawned = %follow_up.id, "spawned recurring follow-up");
            self.state.tasks.push(follow_up.clone());
            spawned.push(follow_up);
        }

        if !spawned.is_empty() {
            self.persist().await?;
        }
        Ok(spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BoardStatusDraft, FolderDraft, Priority, RecurrenceKind, SprintDraft, StatusId,
    };
    use crate::storage::memory_storage::MemoryStorage;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn store() -> Store<MemoryStorage> {
        Store::open(MemoryStorage::new()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let mut store = store().await;
        let task = store.create_task(TaskDraft::new("Write docs")).await.unwrap();

        assert_eq!(task.points, 1);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Backlog);
        assert!(task.sprint_id.is_none());
        assert!(!task.is_subtask());
        assert_eq!(store.snapshot().tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_create_task_rejects_blank_title() {
        let mut store = store().await;
        let result = store.create_task(TaskDraft::new("   ")).await;

        assert!(matches!(result, Err(SprintdeckError::EmptyTitle)));
        assert!(store.snapshot().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_create_task_rejects_off_scale_points() {
        let mut store = store().await;
        let mut draft = TaskDraft::new("Estimate");
        draft.points = Some(4);

        let result = store.create_task(draft).await;
        assert!(matches!(result, Err(SprintdeckError::InvalidPoints(4))));
    }

    #[tokio::test]
    async fn test_create_task_rejects_duplicate_in_same_scope() {
        let mut store = store().await;
        store.create_task(TaskDraft::new("Ship it")).await.unwrap();

        let result = store.create_task(TaskDraft::new("Ship it")).await;
        assert!(matches!(result, Err(SprintdeckError::DuplicateTask { .. })));

        // Same title in another folder is a different task
        let folder = store.create_folder(FolderDraft::new("Ops")).await.unwrap();
        let mut draft = TaskDraft::new("Ship it");
        draft.folder_id = Some(folder.id);
        assert!(store.create_task(draft).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_task_in_sprint_lands_in_first_column() {
        let mut store = store().await;
        let today = Utc::now().date_naive();
        let sprint = store
            .create_sprint(SprintDraft::new(
                "Sprint 1",
                today - Duration::days(1),
                today + Duration::days(5),
            ))
            .await
            .unwrap();

        let mut draft = TaskDraft::new("Sprint work");
        draft.sprint_id = Some(sprint.id);
        let task = store.create_task(draft).await.unwrap();

        assert_eq!(task.status, TaskStatus::Board(StatusId::new("todo")));
    }

    #[tokio::test]
    async fn test_subtask_creation_and_toggle() {
        let mut store = store().await;
        let folder = store.create_folder(FolderDraft::new("Release")).await.unwrap();

        let mut draft = TaskDraft::new("Cut release");
        draft.points = Some(3);
        draft.priority = Some(Priority::High);
        draft.folder_id = Some(folder.id.clone());
        let parent = store.create_task(draft).await.unwrap();

        let mut sub_draft = TaskDraft::new("Tag the build");
        sub_draft.points = Some(2);
        let subtask = store.create_subtask(&parent.id, sub_draft).await.unwrap();

        assert_eq!(subtask.folder_id, Some(folder.id));
        assert_eq!(subtask.parent_task_id, Some(parent.id.clone()));

        let parent = store.task(&parent.id).unwrap();
        assert_eq!(parent.subtasks.len(), 1);
        assert_eq!(parent.subtasks[0].id, subtask.id);
        assert_eq!(parent.subtasks[0].title, "Tag the build");
        assert!(!parent.subtasks[0].completed);

        let parent_id = parent.id.clone();
        let before = parent.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        let completed = store
            .toggle_subtask_complete(&parent_id, &subtask.id)
            .await
            .unwrap();
        assert!(completed);
        assert!(store.task(&subtask.id).unwrap().completed);

        let parent = store.task(&parent_id).unwrap();
        assert!(parent.subtasks[0].completed);
        assert!(parent.updated_at > before);
    }

    #[tokio::test]
    async fn test_update_task_on_subtask_syncs_summary() {
        let mut store = store().await;
        let parent = store.create_task(TaskDraft::new("Parent")).await.unwrap();
        let subtask = store
            .create_subtask(&parent.id, TaskDraft::new("Old title"))
            .await
            .unwrap();

        store
            .update_task(
                &subtask.id,
                TaskPatch {
                    title: Some("New title".to_string()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();

        let parent = store.task(&parent.id).unwrap();
        assert_eq!(parent.subtasks[0].title, "New title");
    }

    #[tokio::test]
    async fn test_update_subtask_requires_parent() {
        let mut store = store().await;
        let parent = store.create_task(TaskDraft::new("Parent")).await.unwrap();
        let subtask = store
            .create_subtask(&parent.id, TaskDraft::new("Child"))
            .await
            .unwrap();

        let result = store
            .update_subtask(
                &TaskId::generate(),
                &subtask.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SprintdeckError::TaskNotFound(_))));
        assert!(!store.task(&subtask.id).unwrap().completed);
    }

    #[tokio::test]
    async fn test_update_task_derives_status_from_sprint_change() {
        let mut store = store().await;
        let today = Utc::now().date_naive();
        let sprint = store
            .create_sprint(SprintDraft::new(
                "Sprint 1",
                today - Duration::days(1),
                today + Duration::days(5),
            ))
            .await
            .unwrap();
        let task = store.create_task(TaskDraft::new("Drifting")).await.unwrap();

        let task = store
            .update_task(
                &task.id,
                TaskPatch {
                    sprint_id: Some(Some(sprint.id.clone())),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Board(StatusId::new("todo")));

        let task = store
            .update_task(
                &task.id,
                TaskPatch {
                    sprint_id: Some(None),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Backlog);
    }

    #[tokio::test]
    async fn test_delete_task_cascades_through_nested_subtasks() {
        let mut store = store().await;
        let a = store.create_task(TaskDraft::new("A")).await.unwrap();
        let b = store.create_subtask(&a.id, TaskDraft::new("B")).await.unwrap();
        let c = store.create_subtask(&b.id, TaskDraft::new("C")).await.unwrap();
        let other = store.create_task(TaskDraft::new("Other")).await.unwrap();

        store.delete_task(&a.id).await.unwrap();

        assert!(store.task(&a.id).is_none());
        assert!(store.task(&b.id).is_none());
        assert!(store.task(&c.id).is_none());
        assert!(store.task(&other.id).is_some());
        assert_eq!(store.snapshot().tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_subtask_updates_parent() {
        let mut store = store().await;
        let parent = store.create_task(TaskDraft::new("Parent")).await.unwrap();
        let subtask = store
            .create_subtask(&parent.id, TaskDraft::new("Child"))
            .await
            .unwrap();

        store.delete_subtask(&parent.id, &subtask.id).await.unwrap();

        assert!(store.task(&subtask.id).is_none());
        let parent = store.task(&parent.id).unwrap();
        assert!(parent.subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_assign_task_to_sprint_and_back() {
        let mut store = store().await;
        let today = Utc::now().date_naive();
        let sprint = store
            .create_sprint(SprintDraft::new(
                "Sprint 1",
                today,
                today + Duration::days(13),
            ))
            .await
            .unwrap();
        let task = store.create_task(TaskDraft::new("Movable")).await.unwrap();

        let task = store
            .assign_task_to_sprint(&task.id, Some(&sprint.id))
            .await
            .unwrap();
        assert_eq!(task.sprint_id, Some(sprint.id.clone()));
        assert_eq!(task.status, TaskStatus::Board(StatusId::new("todo")));

        let task = store.assign_task_to_sprint(&task.id, None).await.unwrap();
        assert!(task.sprint_id.is_none());
        assert_eq!(task.status, TaskStatus::Backlog);
    }

    #[tokio::test]
    async fn test_assign_to_missing_sprint_is_refused() {
        let mut store = store().await;
        let task = store.create_task(TaskDraft::new("Stuck")).await.unwrap();

        let result = store
            .assign_task_to_sprint(&task.id, Some(&SprintId::generate()))
            .await;
        assert!(matches!(result, Err(SprintdeckError::SprintNotFound(_))));
        assert!(store.task(&task.id).unwrap().sprint_id.is_none());
    }

    #[tokio::test]
    async fn test_move_task_to_folder_appends_after_members() {
        let mut store = store().await;
        let folder = store.create_folder(FolderDraft::new("Ops")).await.unwrap();
        let first = store.create_task(TaskDraft::new("First")).await.unwrap();
        let second = store.create_task(TaskDraft::new("Second")).await.unwrap();

        let first = store
            .move_task_to_folder(&first.id, Some(&folder.id))
            .await
            .unwrap();
        assert_eq!(first.manual_order, Some(0));

        let second = store
            .move_task_to_folder(&second.id, Some(&folder.id))
            .await
            .unwrap();
        assert_eq!(second.manual_order, Some(1));
        assert_eq!(second.folder_id, Some(folder.id));
    }

    #[tokio::test]
    async fn test_toggle_task_expanded() {
        let mut store = store().await;
        let task = store.create_task(TaskDraft::new("Folded")).await.unwrap();
        assert!(task.is_expanded());

        let expanded = store.toggle_task_expanded(&task.id).await.unwrap();
        assert!(!expanded);
        assert!(!store.task(&task.id).unwrap().is_expanded());

        let expanded = store.toggle_task_expanded(&task.id).await.unwrap();
        assert!(expanded);
    }

    #[tokio::test]
    async fn test_spawn_recurring_weekly_schedules_follow_up() {
        let mut store = store().await;
        let mut draft = TaskDraft::new("Water plants");
        draft.points = Some(2);
        draft.recurrence = Some(RecurrenceKind::Weekly);
        let task = store.create_task(draft).await.unwrap();

        let spawned = store
            .spawn_recurring_on(&task.id, date(2024, 3, 1))
            .await
            .unwrap();
        assert_eq!(spawned.len(), 1);

        let follow_up = &spawned[0];
        assert_eq!(follow_up.title, "Water plants");
        assert_eq!(follow_up.points, 2);
        assert_eq!(follow_up.due_date, Some(date(2024, 3, 8)));
        assert_eq!(follow_up.status, TaskStatus::Backlog);
        assert!(follow_up.sprint_id.is_none());
        assert!(!follow_up.is_subtask());
        assert_eq!(follow_up.recurrence, Some(RecurrenceKind::Weekly));
    }

    #[tokio::test]
    async fn test_spawn_recurring_on_completion_has_no_due_date() {
        let mut store = store().await;
        let mut draft = TaskDraft::new("Inbox zero");
        draft.recurrence = Some(RecurrenceKind::Completion);
        let task = store.create_task(draft).await.unwrap();

        let spawned = store
            .spawn_recurring_on(&task.id, date(2024, 3, 1))
            .await
            .unwrap();
        assert_eq!(spawned.len(), 1);
        assert!(spawned[0].due_date.is_none());
    }

    #[tokio::test]
    async fn test_spawn_skips_non_recurring_task() {
        let mut store = store().await;
        let task = store.create_task(TaskDraft::new("One-off")).await.unwrap();

        let spawned = store
            .spawn_recurring_on(&task.id, date(2024, 3, 1))
            .await
            .unwrap();
        assert!(spawned.is_empty());
        assert_eq!(store.snapshot().tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_twice_skips_outstanding_follow_up() {
        let mut store = store().await;
        let mut draft = TaskDraft::new("Weekly report");
        draft.recurrence = Some(RecurrenceKind::Weekly);
        let task = store.create_task(draft).await.unwrap();

        let first = store
            .spawn_recurring_on(&task.id, date(2024, 3, 1))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = store
            .spawn_recurring_on(&task.id, date(2024, 3, 1))
            .await
            .unwrap();
        assert!(second.is_empty());
        assert_eq!(store.snapshot().tasks.len(), 2);
    }

    #[tokio::test]
    async fn test_spawn_visits_recurring_subtasks_as_top_level() {
        let mut store = store().await;
        let mut draft = TaskDraft::new("Monthly review");
        draft.recurrence = Some(RecurrenceKind::Monthly);
        let parent = store.create_task(draft).await.unwrap();

        let mut sub_draft = TaskDraft::new("Collect numbers");
        sub_draft.recurrence = Some(RecurrenceKind::Monthly);
        store.create_subtask(&parent.id, sub_draft).await.unwrap();

        let spawned = store
            .spawn_recurring_on(&parent.id, date(2024, 1, 15))
            .await
            .unwrap();
        assert_eq!(spawned.len(), 2);
        assert!(spawned.iter().all(|t| !t.is_subtask()));
        assert!(spawned
            .iter()
            .all(|t| t.due_date == Some(date(2024, 2, 15))));
    }

    #[tokio::test]
    async fn test_custom_first_column_receives_sprinted_tasks() {
        let mut store = store().await;
        let mut draft = BoardStatusDraft::new("Inbox");
        draft.order = Some(0);
        store.add_board_status(draft).await.unwrap();

        let today = Utc::now().date_naive();
        let sprint = store
            .create_sprint(SprintDraft::new(
                "Sprint 1",
                today,
                today + Duration::days(6),
            ))
            .await
            .unwrap();

        let mut task_draft = TaskDraft::new("Fresh");
        task_draft.sprint_id = Some(sprint.id);
        let task = store.create_task(task_draft).await.unwrap();

        assert_eq!(task.status, TaskStatus::Board(StatusId::new("inbox")));
    }
}
