//! taskdeck-core - Session and sync layer for Taskdeck
//!
//! This crate holds the credential store, the authenticated HTTP gateway,
//! typed task operations, the list controller and the form validators used
//! by every Taskdeck front end.

pub mod auth;
pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod session;
pub mod tasks;
pub mod util;
pub mod validation;

pub use auth::{AuthApi, CredentialStore, RegisterOutcome, Session};
pub use board::{SubmitOutcome, TaskBoard};
pub use config::ClientConfig;
pub use controller::{ListOutcome, ListSnapshot, TaskListController};
pub use error::{Error, Result};
pub use gateway::{HttpGateway, Reply};
pub use models::{Page, Task, TaskDraft, TaskFilter, TaskPatch, TaskPriority, TaskStatus};
pub use navigation::{Navigator, Notification, NotificationLevel, Notifier, Route};
pub use session::SessionContext;
pub use tasks::TaskQueryService;
pub use validation::{FieldErrors, FormError, FormMode, TaskEditForm, TaskForm};
