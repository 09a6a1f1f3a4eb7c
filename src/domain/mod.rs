pub mod board;
pub mod folder;
pub mod pipeline;
pub mod sorting;
pub mod sprint;
pub mod task;

pub use board::{BoardStatus, BoardStatusDraft, BoardStatusPatch, StatusId};
pub use folder::{Folder, FolderDraft, FolderId, FolderPatch};
pub use pipeline::{Deal, DealDraft, DealId, DealPatch, DealStage};
pub use sorting::{compare_manual_order, sort_tasks, SortField, SortOrder};
pub use sprint::{Sprint, SprintDraft, SprintId, SprintPatch, SprintStatus};
pub use task::{
    points_on_scale, ActivityEntry, Priority, RecurrenceKind, SubtaskRef, Task, TaskDraft,
    TaskId, TaskPatch, TaskStatus, POINT_SCALE,
};
