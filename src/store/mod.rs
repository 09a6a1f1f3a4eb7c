use crate::{
    domain::{
        BoardStatus, BoardStatusDraft, BoardStatusPatch, Folder, FolderDraft, FolderId,
        FolderPatch, Sprint, SprintDraft, SprintId, SprintPatch, StatusId, TaskStatus,
    },
    error::{Result, SprintdeckError},
    storage::{Snapshot, Storage},
};
use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

mod ordering;
mod pipeline;
mod queries;
mod tasks;

pub use ordering::DropPosition;
pub use queries::SprintProgress;

/// The tracker's single owner of state. All reads and mutations go through
/// it; every mutation runs to completion in memory and is then written out
/// through the injected storage backend as one snapshot.
pub struct Store<S: Storage> {
    storage: S,
    state: Snapshot,
}

impl<S: Storage> Store<S> {
    /// Opens the store, loading persisted state through the backend
    pub async fn open(storage: S) -> Result<Self> {
        let state = storage.load().await?;
        debug!(
            tasks = state.tasks.len(),
            sprints = state.sprints.len(),
            folders = state.folders.len(),
            "opened store"
        );
        Ok(Self { storage, state })
    }

    /// The full in-memory state, as it would be persisted
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub(crate) async fn persist(&self) -> Result<()> {
        self.storage.save(&self.state).await
    }

    // ---- Sprints ----

    /// Creates a sprint. The initial status is derived from the dates.
    pub async fn create_sprint(&mut self, draft: SprintDraft) -> Result<Sprint> {
        let mut sprint = Sprint::new(
            SprintId::generate(),
            draft.name,
            draft.start_date,
            draft.end_date,
        )?;
        if let Some(days) = draft.duration_days {
            sprint.duration_days = days;
        }

        debug!(sprint = %sprint.id, name = %sprint.name, "created sprint");
        self.state.sprints.push(sprint.clone());
        self.persist().await?;
        Ok(sprint)
    }

    /// Merges a patch into a sprint. Date changes are validated before
    /// anything else is touched, and re-derive the status.
    pub async fn update_sprint(&mut self, id: &SprintId, patch: SprintPatch) -> Result<Sprint> {
        let today = Utc::now().date_naive();
        let sprint = self
            .state
            .sprints
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| SprintdeckError::SprintNotFound(id.to_string()))?;

        if patch.start_date.is_some() || patch.end_date.is_some() {
            let start = patch.start_date.unwrap_or(sprint.start_date);
            let end = patch.end_date.unwrap_or(sprint.end_date);
            sprint.set_dates(start, end)?;
            sprint.status = sprint.status_on(today);
        }
        if let Some(name) = patch.name {
            sprint.name = name;
        }
        if let Some(days) = patch.duration_days {
            sprint.duration_days = days;
        }
        sprint.touch();

        let sprint = sprint.clone();
        self.persist().await?;
        Ok(sprint)
    }

    /// Deletes a sprint. Member tasks drop back to the backlog first.
    pub async fn delete_sprint(&mut self, id: &SprintId) -> Result<()> {
        if !self.state.sprints.iter().any(|s| &s.id == id) {
            return Err(SprintdeckError::SprintNotFound(id.to_string()));
        }

        for task in self
            .state
            .tasks
            .iter_mut()
            .filter(|t| t.sprint_id.as_ref() == Some(id))
        {
            task.sprint_id = None;
            task.status = TaskStatus::Backlog;
            task.touch();
        }
        self.state.sprints.retain(|s| &s.id != id);

        debug!(sprint = %id, "deleted sprint");
        self.persist().await?;
        Ok(())
    }

    /// Recomputes every sprint's status from today's date. Returns the
    /// sprints whose status changed; persists only when something did.
    pub async fn refresh_sprint_statuses(&mut self) -> Result<Vec<SprintId>> {
        self.refresh_sprint_statuses_on(Utc::now().date_naive())
            .await
    }

    /// Same as [`refresh_sprint_statuses`](Self::refresh_sprint_statuses)
    /// with an explicit reference day. Statuses move backward too when a
    /// date correction calls for it.
    pub async fn refresh_sprint_statuses_on(&mut self, today: NaiveDate) -> Result<Vec<SprintId>> {
        let mut changed = Vec::new();
        for sprint in &mut self.state.sprints {
            let derived = sprint.status_on(today);
            if sprint.status != derived {
                sprint.status = derived;
                sprint.touch();
                changed.push(sprint.id.clone());
            }
        }

        if !changed.is_empty() {
            debug!(count = changed.len(), "sprint statuses rolled over");
            self.persist().await?;
        }
        Ok(changed)
    }

    pub fn sprint(&self, id: &SprintId) -> Option<&Sprint> {
        self.state.sprints.iter().find(|s| &s.id == id)
    }

    pub fn sprints(&self) -> &[Sprint] {
        &self.state.sprints
    }

    /// The first active sprint, if any
    pub fn current_sprint(&self) -> Option<&Sprint> {
        self.state.sprints.iter().find(|s| s.is_active())
    }

    // ---- Folders ----

    /// Creates a folder. New folders start expanded.
    pub async fn create_folder(&mut self, draft: FolderDraft) -> Result<Folder> {
        let mut folder = Folder::new(FolderId::generate(), draft.name);
        folder.description = draft.description;

        self.state.folder_states.insert(folder.id.clone(), false);
        self.state.folders.push(folder.clone());

        debug!(folder = %folder.id, name = %folder.name, "created folder");
        self.persist().await?;
        Ok(folder)
    }

    pub async fn update_folder(&mut self, id: &FolderId, patch: FolderPatch) -> Result<Folder> {
        let folder = self
            .state
            .folders
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| SprintdeckError::FolderNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            folder.name = name;
        }
        if let Some(description) = patch.description {
            folder.description = description;
        }
        folder.touch();

        let folder = folder.clone();
        self.persist().await?;
        Ok(folder)
    }

    /// Deletes a folder. Member tasks become unfiled; the folder's collapse
    /// state is forgotten.
    pub async fn delete_folder(&mut self, id: &FolderId) -> Result<()> {
        if !self.state.folders.iter().any(|f| &f.id == id) {
            return Err(SprintdeckError::FolderNotFound(id.to_string()));
        }

        for task in self
            .state
            .tasks
            .iter_mut()
            .filter(|t| t.folder_id.as_ref() == Some(id))
        {
            task.folder_id = None;
            task.touch();
        }
        self.state.folders.retain(|f| &f.id != id);
        self.state.folder_states.remove(id);

        debug!(folder = %id, "deleted folder");
        self.persist().await?;
        Ok(())
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.state.folders.iter().find(|f| &f.id == id)
    }

    pub fn folders(&self) -> &[Folder] {
        &self.state.folders
    }

    /// Whether the folder is folded shut. Unknown folders count as expanded.
    pub fn is_folder_collapsed(&self, id: &FolderId) -> bool {
        self.state.folder_states.get(id).copied().unwrap_or(false)
    }

    pub async fn set_folder_collapsed(&mut self, id: &FolderId, collapsed: bool) -> Result<()> {
        if !self.state.folders.iter().any(|f| &f.id == id) {
            return Err(SprintdeckError::FolderNotFound(id.to_string()));
        }
        self.state.folder_states.insert(id.clone(), collapsed);
        self.persist().await?;
        Ok(())
    }

    /// Flips the folder's collapse state and returns the new value
    pub async fn toggle_folder_collapsed(&mut self, id: &FolderId) -> Result<bool> {
        let next = !self.is_folder_collapsed(id);
        self.set_folder_collapsed(id, next).await?;
        Ok(next)
    }

    // ---- Board statuses ----

    /// Board columns in display order. An empty customized list means the
    /// defaults apply.
    pub fn board_statuses(&self) -> Vec<BoardStatus> {
        if self.state.board_statuses.is_empty() {
            BoardStatus::defaults()
        } else {
            self.state.board_statuses.clone()
        }
    }

    pub fn board_status(&self, id: &StatusId) -> Option<BoardStatus> {
        self.board_statuses().into_iter().find(|s| &s.id == id)
    }

    /// The lowest-order column, where newly sprinted tasks land
    pub fn first_board_status(&self) -> BoardStatus {
        self.state
            .board_statuses
            .first()
            .cloned()
            .unwrap_or_else(|| BoardStatus::new("To Do".to_string(), 1))
    }

    /// Adds a column. Customizing for the first time materializes the
    /// default columns so they stay on the board.
    pub async fn add_board_status(&mut self, draft: BoardStatusDraft) -> Result<BoardStatus> {
        if draft.name.trim().is_empty() {
            return Err(SprintdeckError::EmptyTitle);
        }

        let mut statuses = self.board_statuses();
        let id = draft
            .id
            .unwrap_or_else(|| StatusId::from_name(&draft.name));
        if statuses.iter().any(|s| s.id == id) {
            warn!(status = %id, "refusing duplicate board status");
            return Err(SprintdeckError::DuplicateStatus(id.to_string()));
        }

        let order = draft
            .order
            .unwrap_or_else(|| statuses.iter().map(|s| s.order).max().unwrap_or(0) + 1);
        let status = BoardStatus {
            id,
            name: draft.name,
            order,
            color: draft.color,
        };

        statuses.push(status.clone());
        statuses.sort_by_key(|s| s.order);
        self.state.board_statuses = statuses;

        debug!(status = %status.id, "added board status");
        self.persist().await?;
        Ok(status)
    }

    /// Merges a patch into a column and re-sorts the board. The column id
    /// never changes, so tasks keep pointing at it.
    pub async fn update_board_status(
        &mut self,
        id: &StatusId,
        patch: BoardStatusPatch,
    ) -> Result<BoardStatus> {
        let mut statuses = self.board_statuses();
        let status = statuses
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| SprintdeckError::StatusNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            status.name = name;
        }
        if let Some(order) = patch.order {
            status.order = order;
        }
        if let Some(color) = patch.color {
            status.color = color;
        }
        let updated = status.clone();

        statuses.sort_by_key(|s| s.order);
        self.state.board_statuses = statuses;
        self.persist().await?;
        Ok(updated)
    }

    /// Deletes a column. Refused while any task still sits in it; the
    /// board is left untouched in that case.
    pub async fn delete_board_status(&mut self, id: &StatusId) -> Result<()> {
        let statuses = self.board_statuses();
        if !statuses.iter().any(|s| &s.id == id) {
            return Err(SprintdeckError::StatusNotFound(id.to_string()));
        }

        let count = self
            .state
            .tasks
            .iter()
            .filter(|t| t.status.column() == Some(id))
            .count();
        if count > 0 {
            warn!(status = %id, count, "refusing to delete board status in use");
            return Err(SprintdeckError::StatusInUse {
                id: id.to_string(),
                count,
            });
        }

        self.state.board_statuses = statuses.into_iter().filter(|s| &s.id != id).collect();
        debug!(status = %id, "deleted board status");
        self.persist().await?;
        Ok(())
    }

    /// Drops all customizations so the default columns apply again
    pub async fn reset_board_statuses(&mut self) -> Result<()> {
        self.state.board_statuses.clear();
        debug!("board statuses reset to defaults");
        self.persist().await?;
        Ok(())
    }

    /// Swaps a column's order with its left neighbor. A no-op at the edge.
    pub async fn move_status_up(&mut self, id: &StatusId) -> Result<()> {
        self.swap_status_order(id, true).await
    }

    /// Swaps a column's order with its right neighbor. A no-op at the edge.
    pub async fn move_status_down(&mut self, id: &StatusId) -> Result<()> {
        self.swap_status_order(id, false).await
    }

    async fn swap_status_order(&mut self, id: &StatusId, toward_front: bool) -> Result<()> {
        let mut statuses = self.board_statuses();
        let index = statuses
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| SprintdeckError::StatusNotFound(id.to_string()))?;

        let neighbor = if toward_front {
            if index == 0 {
                return Ok(());
            }
            index - 1
        } else {
            if index + 1 == statuses.len() {
                return Ok(());
            }
            index + 1
        };

        let order = statuses[index].order;
        statuses[index].order = statuses[neighbor].order;
        statuses[neighbor].order = order;
        statuses.sort_by_key(|s| s.order);

        self.state.board_statuses = statuses;
        self.persist().await?;
        Ok(())
    }
}
