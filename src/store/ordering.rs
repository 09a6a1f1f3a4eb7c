use tracing::debug;

use crate::{
    domain::{FolderId, TaskId},
    error::{Result, SprintdeckError},
    storage::Storage,
};

use super::Store;

/// Whether a dragged task lands before or after its drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

impl<S: Storage> Store<S> {
    /// Drops a task next to another in the folder view and renumbers that
    /// folder's members densely from zero. Dropping onto a task in a
    /// different folder moves the dragged task there first.
    pub async fn reorder_task_in_folder(
        &mut self,
        dragged_id: &TaskId,
        target_id: &TaskId,
        position: DropPosition,
    ) -> Result<()> {
        if dragged_id == target_id {
            return Ok(());
        }
        if !self.state.tasks.iter().any(|t| &t.id == dragged_id) {
            return Err(SprintdeckError::TaskNotFound(dragged_id.to_string()));
        }
        let folder = self
            .state
            .tasks
            .iter()
            .find(|t| &t.id == target_id)
            .map(|t| t.folder_id.clone())
            .ok_or_else(|| SprintdeckError::TaskNotFound(target_id.to_string()))?;

        let dragged = self.get_task_mut(dragged_id)?;
        if dragged.folder_id != folder {
            dragged.folder_id = folder.clone();
            dragged.touch();
        }

        self.splice_tasks(dragged_id, target_id, position)?;
        self.renumber_folder(&folder);

        debug!(task = %dragged_id, target = %target_id, "reordered task in folder");
        self.persist().await?;
        Ok(())
    }

    /// Drops a task next to another on the sprint board and renumbers that
    /// column's members densely from zero. Dropping onto a task in a
    /// different column or sprint moves the dragged task there first.
    pub async fn reorder_task_in_column(
        &mut self,
        dragged_id: &TaskId,
        target_id: &TaskId,
        position: DropPosition,
    ) -> Result<()> {
        if dragged_id == target_id {
            return Ok(());
        }
        if !self.state.tasks.iter().any(|t| &t.id == dragged_id) {
            return Err(SprintdeckError::TaskNotFound(dragged_id.to_string()));
        }
        let (sprint, status) = self
            .state
            .tasks
            .iter()
            .find(|t| &t.id == target_id)
            .map(|t| (t.sprint_id.clone(), t.status.clone()))
            .ok_or_else(|| SprintdeckError::TaskNotFound(target_id.to_string()))?;

        let dragged = self.get_task_mut(dragged_id)?;
        if dragged.sprint_id != sprint || dragged.status != status {
            dragged.sprint_id = sprint.clone();
            dragged.status = status.clone();
            dragged.touch();
        }

        self.splice_tasks(dragged_id, target_id, position)?;

        let mut index = 0;
        for task in &mut self.state.tasks {
            if task.sprint_id == sprint && task.status == status {
                task.manual_order = Some(index);
                index += 1;
            }
        }

        debug!(task = %dragged_id, target = %target_id, "reordered task in column");
        self.persist().await?;
        Ok(())
    }

    /// Removes the dragged task and reinserts it relative to the target,
    /// adjusting for the slot freed by the removal.
    fn splice_tasks(
        &mut self,
        dragged_id: &TaskId,
        target_id: &TaskId,
        position: DropPosition,
    ) -> Result<()> {
        let dragged_index = self
            .state
            .tasks
            .iter()
            .position(|t| &t.id == dragged_id)
            .ok_or_else(|| SprintdeckError::TaskNotFound(dragged_id.to_string()))?;
        let target_index = self
            .state
            .tasks
            .iter()
            .position(|t| &t.id == target_id)
            .ok_or_else(|| SprintdeckError::TaskNotFound(target_id.to_string()))?;

        let task = self.state.tasks.remove(dragged_index);
        let adjusted = if dragged_index < target_index {
            target_index - 1
        } else {
            target_index
        };
        let insert_at = match position {
            DropPosition::Before => adjusted,
            DropPosition::After => adjusted + 1,
        };
        self.state.tasks.insert(insert_at, task);
        Ok(())
    }

    fn renumber_folder(&mut self, folder: &Option<FolderId>) {
        let mut index = 0;
        for task in &mut self.state.tasks {
            if &task.folder_id == folder {
                task.manual_order = Some(index);
                index += 1;
            }
        }
    }
}
