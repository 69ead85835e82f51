//! Form validators for login, registration, and task create/edit.
//!
//! Every validator runs synchronously on submit and reports problems per
//! field. Nothing here touches the network, and invalid input never panics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Field name → message. Only the first problem per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("Invalid regex")
    })
}

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid regex"))
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    !value.contains("..") && email_pattern().is_match(value)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_valid_email(email) {
        errors.add("email", "Invalid email address");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of the authenticate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginCredentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result(LoginCredentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of the register call; the confirmation stays client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        let length = username.chars().count();
        if length < USERNAME_MIN_LEN {
            errors.add(
                "username",
                format!("Username must be at least {USERNAME_MIN_LEN} characters"),
            );
        } else if length > USERNAME_MAX_LEN {
            errors.add(
                "username",
                format!("Username must be no more than {USERNAME_MAX_LEN} characters"),
            );
        } else if !username_pattern().is_match(username) {
            errors.add(
                "username",
                "Username can only contain letters, numbers, and underscores",
            );
        }

        check_email(&mut errors, &self.email);

        if let Some(problem) = password_problem(&self.password) {
            errors.add("password", problem);
        }
        if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords don't match");
        }

        errors.into_result(Registration {
            username: username.to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

fn password_problem(password: &str) -> Option<String> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        Some(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        ))
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number".to_string())
    } else {
        None
    }
}

/// Create-task form. Everything except the title is optional and falls back
/// to a typed default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub star: Option<bool>,
    pub is_active: Option<bool>,
}

impl TaskForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self, owner_id: &str) -> Result<TaskDraft, FieldErrors> {
        self.validate_on(owner_id, today())
    }

    /// Validate with an explicit "today" used for defaulted dates.
    pub fn validate_on(&self, owner_id: &str, today: NaiveDate) -> Result<TaskDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        }

        let start_date = self.start_date.unwrap_or(today);
        let end_date = self.end_date.unwrap_or(today);
        check_date_order(&mut errors, start_date, end_date);

        errors.into_result(TaskDraft {
            title: title.to_string(),
            description: self.description.clone().unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            start_date,
            end_date,
            star: self.star.unwrap_or(false),
            is_active: self.is_active.unwrap_or(true),
            user_id: owner_id.to_string(),
        })
    }
}

fn check_date_order(errors: &mut FieldErrors, start_date: NaiveDate, end_date: NaiveDate) {
    if end_date < start_date {
        errors.add("end_date", "End date cannot be before start date");
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Whether a task form accepts edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    View,
    Edit,
}

impl FormMode {
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::View)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("This form is read-only")]
    ReadOnly,
    #[error("{0}")]
    Invalid(FieldErrors),
}

/// Detail/edit form for an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEditForm {
    mode: FormMode,
    values: Task,
}

impl TaskEditForm {
    pub fn from_task(task: Task, mode: FormMode) -> Self {
        Self { mode, values: task }
    }

    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn task_id(&self) -> &str {
        &self.values.id
    }

    pub const fn values(&self) -> &Task {
        &self.values
    }

    /// Overwrite the fields set in `edits`. Refused in view mode.
    pub fn apply(&mut self, edits: &TaskPatch) -> Result<(), FormError> {
        if self.mode.is_read_only() {
            return Err(FormError::ReadOnly);
        }
        let values = &mut self.values;
        if let Some(title) = &edits.title {
            values.title.clone_from(title);
        }
        if let Some(description) = &edits.description {
            values.description.clone_from(description);
        }
        if let Some(status) = edits.status {
            values.status = status;
        }
        if let Some(priority) = edits.priority {
            values.priority = priority;
        }
        if let Some(start_date) = edits.start_date {
            values.start_date = start_date;
        }
        if let Some(end_date) = edits.end_date {
            values.end_date = end_date;
        }
        if let Some(star) = edits.star {
            values.star = star;
        }
        if let Some(is_active) = edits.is_active {
            values.is_active = is_active;
        }
        Ok(())
    }

    /// Validate and produce a full replacement patch.
    pub fn submit(&self) -> Result<TaskPatch, FormError> {
        if self.mode.is_read_only() {
            return Err(FormError::ReadOnly);
        }
        let mut errors = FieldErrors::new();
        if self.values.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        check_date_order(&mut errors, self.values.start_date, self.values.end_date);
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }

        let mut patch = self.values.to_patch();
        patch.title = Some(self.values.title.trim().to_string());
        Ok(patch)
    }
}
