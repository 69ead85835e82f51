//! Data models for Taskdeck

mod filter;
mod page;
mod task;

pub use filter::TaskFilter;
pub use page::{page_count, Page, PagePayload};
pub use task::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
