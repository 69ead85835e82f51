//! The task screen: form submissions, list navigation and user feedback.
//!
//! Every failed operation produces exactly one error notification. Callers
//! get `None` or [`SubmitOutcome::Failed`] back and must not notify again.

use std::sync::Arc;

use crate::controller::{ListOutcome, TaskListController};
use crate::error::{Error, Result};
use crate::models::{TaskFilter, TaskPatch};
use crate::navigation::{Notification, Notifier};
use crate::session::SessionContext;
use crate::tasks::TaskQueryService;
use crate::validation::{FieldErrors, FormError, FormMode, TaskEditForm, TaskForm};

const DEFAULT_CREATED: &str = "Task created";
const DEFAULT_UPDATED: &str = "Task updated";
const DEFAULT_DELETED: &str = "Task deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Validation failed; nothing was sent.
    Rejected(FieldErrors),
    /// The form was opened in view mode.
    ReadOnly,
    /// The request failed and the user has been notified.
    Failed,
}

impl SubmitOutcome {
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

pub struct TaskBoard {
    service: TaskQueryService,
    controller: TaskListController,
    notifier: Arc<dyn Notifier>,
}

impl TaskBoard {
    /// Open the board for the signed-in user.
    pub fn open_for(
        session: &SessionContext,
        service: TaskQueryService,
        page_size: u32,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let owner = session.require_session()?;
        Ok(Self {
            controller: TaskListController::new(service.clone(), owner.user_id, page_size),
            service,
            notifier,
        })
    }

    pub const fn controller(&self) -> &TaskListController {
        &self.controller
    }

    pub async fn load(&self) -> Option<ListOutcome> {
        let result = self.controller.refresh().await;
        self.settle(result)
    }

    pub async fn apply_filter(&self, filter: &TaskFilter) -> Option<ListOutcome> {
        let result = self.controller.apply_filter(filter).await;
        self.settle(result)
    }

    pub async fn change_page(&self, page_number: u32) -> Option<ListOutcome> {
        let result = self.controller.change_page(page_number).await;
        self.settle(result)
    }

    /// Fetch a task into a detail form.
    pub async fn open(&self, id: &str, mode: FormMode) -> Option<TaskEditForm> {
        let result = self.service.get_by_id(id).await;
        self.settle(result)
            .map(|task| TaskEditForm::from_task(task, mode))
    }

    pub async fn create(&self, form: &TaskForm) -> SubmitOutcome {
        let draft = match form.validate(self.controller.owner_id()) {
            Ok(draft) => draft,
            Err(errors) => return SubmitOutcome::Rejected(errors),
        };

        match self.service.create(&draft).await {
            Ok(reply) => {
                self.succeed(reply.message, DEFAULT_CREATED);
                let refreshed = self.controller.after_create().await;
                self.settle(refreshed);
                SubmitOutcome::Saved
            }
            Err(error) => {
                self.report(&error);
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn update(&self, form: &TaskEditForm) -> SubmitOutcome {
        let patch = match form.submit() {
            Ok(patch) => patch,
            Err(FormError::ReadOnly) => return SubmitOutcome::ReadOnly,
            Err(FormError::Invalid(errors)) => return SubmitOutcome::Rejected(errors),
        };
        self.send_update(form.task_id(), &patch).await
    }

    /// Flip the star flag with a partial update.
    pub async fn set_star(&self, id: &str, star: bool) -> SubmitOutcome {
        self.send_update(id, &TaskPatch::star(star)).await
    }

    pub async fn delete(&self, id: &str) -> Option<ListOutcome> {
        match self.service.delete(id).await {
            Ok(reply) => {
                self.succeed(reply.message, DEFAULT_DELETED);
                let result = self.controller.after_delete(id).await;
                self.settle(result)
            }
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    async fn send_update(&self, id: &str, patch: &TaskPatch) -> SubmitOutcome {
        match self.service.update(id, patch).await {
            Ok(reply) => {
                self.succeed(reply.message, DEFAULT_UPDATED);
                let refreshed = self.controller.after_update().await;
                self.settle(refreshed);
                SubmitOutcome::Saved
            }
            Err(error) => {
                self.report(&error);
                SubmitOutcome::Failed
            }
        }
    }

    fn settle<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    fn succeed(&self, message: Option<String>, fallback: &str) {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        self.notifier.notify(Notification::success(message));
    }

    fn report(&self, error: &Error) {
        tracing::debug!("Task operation failed: {error}");
        self.notifier
            .notify(Notification::error(error.user_message()));
    }
}
