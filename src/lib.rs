//! # Sprintdeck Core
//!
//! Core business logic and domain models for Sprintdeck task and sprint
//! tracking.
//!
//! This crate provides the fundamental types and operations for managing
//! a backlog with folders, sprint boards with customizable columns,
//! recurring tasks, and a lightweight sales pipeline, without any
//! dependency on specific UI implementations. State lives in memory and
//! is written out as a full snapshot through a pluggable storage backend.

pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{BoardStatus, StatusId},
    sprint::{Sprint, SprintId, SprintStatus},
    task::{Task, TaskId, TaskStatus},
};
pub use error::{Result, SprintdeckError};
pub use storage::{file_storage::FileStorage, memory_storage::MemoryStorage, Snapshot, Storage};
pub use store::{DropPosition, Store};
