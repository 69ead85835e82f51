use std::sync::Arc;

use chrono::NaiveDate;
use taskdeck_core::{
    ClientConfig, Error, FormError, HttpGateway, ListSnapshot, SessionContext, SubmitOutcome, Task,
    TaskBoard, TaskFilter, TaskForm, TaskPatch, TaskQueryService,
};

use crate::auth::KeyringCredentialStore;
use crate::cli::{EditFields, ListArgs, TaskFields};
use crate::config_profiles::CliProfilesConfig;
use crate::console::{ConsoleNavigator, ConsoleNotifier};
use crate::error::CliError;

const TITLE_COLUMN_WIDTH: usize = 40;
const ID_COLUMN_WIDTH: usize = 8;

/// Everything a command needs to talk to the API for one profile.
pub struct CliContext {
    pub profile_name: String,
    pub config: ClientConfig,
    pub store: Arc<KeyringCredentialStore>,
    pub navigator: Arc<ConsoleNavigator>,
    pub gateway: HttpGateway,
}

impl CliContext {
    pub fn load(global_profile: Option<&str>) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = profiles.resolve_profile_name(global_profile);
        let config = profiles
            .profile(&profile_name)
            .cloned()
            .unwrap_or_default()
            .client_config()?;

        let store = Arc::new(KeyringCredentialStore::for_profile(&profile_name));
        let navigator = Arc::new(ConsoleNavigator::new(&profile_name));
        let gateway = HttpGateway::new(&config, store.clone(), navigator.clone())?;
        tracing::debug!(
            "Using profile '{}' against {}",
            profile_name,
            gateway.base_url()
        );

        Ok(Self {
            profile_name,
            config,
            store,
            navigator,
            gateway,
        })
    }

    pub fn session(&self) -> SessionContext {
        SessionContext::mount(self.store.clone(), self.navigator.clone())
    }

    /// Session for an explicit sign-out, which prints no sign-in hint.
    pub fn signing_out_session(&self) -> SessionContext {
        SessionContext::mount(
            self.store.clone(),
            Arc::new(ConsoleNavigator::quiet(&self.profile_name)),
        )
    }

    pub fn service(&self) -> TaskQueryService {
        TaskQueryService::new(self.gateway.clone())
    }

    pub fn board(&self) -> Result<TaskBoard, CliError> {
        TaskBoard::open_for(
            &self.session(),
            self.service(),
            self.config.page_size,
            Arc::new(ConsoleNotifier),
        )
        .map_err(|error| match error {
            Error::NotSignedIn => CliError::NotSignedIn(self.profile_name.clone()),
            other => CliError::Core(other),
        })
    }
}

/// Show `page_number` of the tasks matching `filter`. A fresh board starts
/// on page 1 whenever the filter is set, so later pages take a second call.
pub async fn open_page(
    board: &TaskBoard,
    filter: &TaskFilter,
    page_number: u32,
) -> Result<(), CliError> {
    if filter.is_empty() {
        board
            .change_page(page_number)
            .await
            .ok_or(CliError::Reported)?;
        return Ok(());
    }

    board.apply_filter(filter).await.ok_or(CliError::Reported)?;
    if page_number > 1 {
        board
            .change_page(page_number)
            .await
            .ok_or(CliError::Reported)?;
    }
    Ok(())
}

pub fn submit_result(outcome: SubmitOutcome) -> Result<(), CliError> {
    match outcome {
        SubmitOutcome::Saved => Ok(()),
        SubmitOutcome::Rejected(errors) => Err(CliError::Invalid(errors)),
        SubmitOutcome::ReadOnly => Err(CliError::Form(FormError::ReadOnly)),
        SubmitOutcome::Failed => Err(CliError::Reported),
    }
}

pub fn list_filter(args: &ListArgs) -> Result<TaskFilter, CliError> {
    Ok(TaskFilter {
        title: args.title.clone(),
        priority: args.priority,
        status: args.status,
        star: args.star,
        is_active: args.active,
        start_date: parse_optional_date(args.from.as_deref())?,
        end_date: parse_optional_date(args.to.as_deref())?,
        page_number: None,
        page_size: None,
    }
    .stripped())
}

pub fn task_form(fields: &TaskFields) -> Result<TaskForm, CliError> {
    Ok(TaskForm {
        title: fields.title.join(" "),
        description: fields.description.clone(),
        status: fields.status,
        priority: fields.priority,
        start_date: parse_optional_date(fields.start.as_deref())?,
        end_date: parse_optional_date(fields.end.as_deref())?,
        star: Some(fields.star),
        is_active: Some(!fields.inactive),
    })
}

pub fn edit_patch(fields: &EditFields) -> Result<TaskPatch, CliError> {
    let patch = TaskPatch {
        title: fields.title.clone(),
        description: fields.description.clone(),
        status: fields.status,
        priority: fields.priority,
        start_date: parse_optional_date(fields.start.as_deref())?,
        end_date: parse_optional_date(fields.end.as_deref())?,
        is_active: fields.active,
        ..TaskPatch::default()
    };
    if patch.is_empty() {
        return Err(CliError::NothingToUpdate);
    }
    Ok(patch)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(raw.to_string()))
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(parse_date)
        .transpose()
}

pub fn normalize_task_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTaskId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn format_task_lines(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| {
            let id = truncate_chars(&task.id, ID_COLUMN_WIDTH);
            let star = if task.star { '*' } else { ' ' };
            let title = truncate_chars(&collapse_whitespace(&task.title), TITLE_COLUMN_WIDTH);
            let status = task.status.label();
            let priority = task.priority.label();
            let dates = format_date_range(task.start_date, task.end_date);
            let line = format!(
                "{id:<8}  {star} {title:<40}  {status:<11}  {priority:<9}  {dates}"
            );
            if task.is_active {
                line
            } else {
                format!("{line}  (inactive)")
            }
        })
        .collect()
}

pub fn format_page_footer(snapshot: &ListSnapshot) -> String {
    if snapshot.page_count == 0 {
        return "No tasks found.".to_string();
    }
    let noun = if snapshot.total_count == 1 {
        "task"
    } else {
        "tasks"
    };
    format!(
        "Page {} of {} ({} {noun})",
        snapshot.page_number, snapshot.page_count, snapshot.total_count
    )
}

pub fn task_detail_lines(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("ID:          {}", task.id),
        format!("Title:       {}", task.title),
        format!("Status:      {}", task.status),
        format!("Priority:    {}", task.priority),
        format!(
            "Dates:       {}",
            format_date_range(task.start_date, task.end_date)
        ),
        format!("Starred:     {}", yes_no(task.star)),
        format!("Active:      {}", yes_no(task.is_active)),
    ];
    let description = task.description.trim();
    if !description.is_empty() {
        lines.push(String::new());
        lines.extend(description.lines().map(str::to_string));
    }
    lines
}

pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%Y-%m-%d").to_string()
    } else {
        format!("{} .. {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
    }
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
