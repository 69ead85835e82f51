use chrono::NaiveDate;
use clap::Parser;
use pretty_assertions::assert_eq;
use taskdeck_core::validation::FieldErrors;
use taskdeck_core::{
    ListSnapshot, Route, SubmitOutcome, Task, TaskFilter, TaskPriority, TaskStatus,
};

use crate::cli::{Cli, Commands, CompletionShell, EditFields, ListArgs, TaskFields};
use crate::commands::common::{
    edit_patch, format_page_footer, format_task_lines, list_filter, normalize_task_identifier,
    parse_date, parse_optional_date, submit_result, task_detail_lines, task_form, truncate_chars,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{apply_profile_update, ProfileUpdate};
use crate::config_profiles::CliProfile;
use crate::console::{route_hint, ConsoleNavigator};
use crate::error::CliError;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        start_date: date(2024, 3, 1),
        end_date: date(2024, 3, 4),
        star: true,
        is_active: true,
        user_id: "u1".to_string(),
    }
}

#[test]
fn parse_date_accepts_iso_dates_only() {
    assert_eq!(parse_date(" 2024-07-04 ").unwrap(), date(2024, 7, 4));
    assert!(matches!(
        parse_date("07/04/2024"),
        Err(CliError::InvalidDate(raw)) if raw == "07/04/2024"
    ));
    assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
    assert_eq!(parse_optional_date(None).unwrap(), None);
}

#[test]
fn list_filter_strips_blank_values() {
    let args = ListArgs {
        title: Some("   ".to_string()),
        priority: Some(TaskPriority::Urgent),
        star: Some(true),
        from: Some("2024-01-01".to_string()),
        ..ListArgs::default()
    };
    let filter = list_filter(&args).unwrap();
    assert_eq!(
        filter,
        TaskFilter {
            priority: Some(TaskPriority::Urgent),
            star: Some(true),
            start_date: Some(date(2024, 1, 1)),
            ..TaskFilter::default()
        }
    );
}

#[test]
fn task_form_joins_title_words_and_keeps_defaults_open() {
    let fields = TaskFields {
        title: vec!["Buy".to_string(), "milk".to_string()],
        inactive: true,
        ..TaskFields::default()
    };
    let form = task_form(&fields).unwrap();
    assert_eq!(form.title, "Buy milk");
    assert_eq!(form.priority, None);
    assert_eq!(form.star, Some(false));
    assert_eq!(form.is_active, Some(false));

    let draft = form.validate_on("u1", date(2024, 5, 5)).unwrap();
    assert_eq!(draft.status, TaskStatus::Draft);
    assert_eq!(draft.start_date, date(2024, 5, 5));
    assert_eq!(draft.user_id, "u1");
}

#[test]
fn edit_patch_requires_at_least_one_field() {
    assert!(matches!(
        edit_patch(&EditFields::default()),
        Err(CliError::NothingToUpdate)
    ));

    let patch = edit_patch(&EditFields {
        status: Some(TaskStatus::Done),
        ..EditFields::default()
    })
    .unwrap();
    assert_eq!(patch.status, Some(TaskStatus::Done));
    assert_eq!(patch.title, None);
}

#[test]
fn normalize_task_identifier_rejects_blank() {
    assert_eq!(normalize_task_identifier(" 42 ").unwrap(), "42");
    assert!(matches!(
        normalize_task_identifier("  "),
        Err(CliError::EmptyTaskId)
    ));
}

#[test]
fn submit_outcomes_map_to_cli_errors() {
    assert!(submit_result(SubmitOutcome::Saved).is_ok());
    assert!(matches!(
        submit_result(SubmitOutcome::Failed),
        Err(CliError::Reported)
    ));

    let mut errors = FieldErrors::new();
    errors.add("title", "Title is required");
    match submit_result(SubmitOutcome::Rejected(errors)) {
        Err(CliError::Invalid(errors)) => {
            assert_eq!(errors.get("title"), Some("Title is required"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn task_lines_show_star_status_and_dates() {
    let mut inactive = task("2", "Old");
    inactive.is_active = false;
    inactive.star = false;

    let lines = format_task_lines(&[task("1", "Ship   release"), inactive]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1         * Ship release"));
    assert!(lines[0].contains("In Progress"));
    assert!(lines[0].contains("High"));
    assert!(lines[0].ends_with("2024-03-01 .. 2024-03-04"));
    assert!(lines[1].ends_with("(inactive)"));
}

#[test]
fn page_footer_reports_position() {
    let snapshot = ListSnapshot {
        page_number: 2,
        page_size: 10,
        total_count: 25,
        page_count: 3,
        ..ListSnapshot::default()
    };
    assert_eq!(format_page_footer(&snapshot), "Page 2 of 3 (25 tasks)");
    assert_eq!(
        format_page_footer(&ListSnapshot::default()),
        "No tasks found."
    );
}

#[test]
fn detail_lines_include_description_when_present() {
    let mut detailed = task("7", "Write report");
    assert_eq!(task_detail_lines(&detailed).len(), 7);

    detailed.description = "First line\nSecond line".to_string();
    let lines = task_detail_lines(&detailed);
    assert_eq!(lines.last().map(String::as_str), Some("Second line"));
    assert!(lines.contains(&"Starred:     yes".to_string()));
}

#[test]
fn truncate_chars_adds_ellipsis() {
    assert_eq!(truncate_chars("short", 10), "short");
    assert_eq!(
        truncate_chars("This is a very long task title", 12),
        "This is a..."
    );
}

#[test]
fn login_hint_names_the_profile() {
    let hint = route_hint(Route::Login, "work");
    assert!(hint.contains("--profile work auth login"));
    assert_eq!(ConsoleNavigator::new("work").hint(Route::Login), Some(hint));
}

#[test]
fn explicit_sign_out_prints_no_login_hint() {
    assert_eq!(ConsoleNavigator::quiet("work").hint(Route::Login), None);
}

#[test]
fn profile_update_validates_values() {
    let mut profile = CliProfile::default();
    apply_profile_update(
        &mut profile,
        ProfileUpdate {
            api_base_url: Some("https://tasks.example.com/api/".to_string()),
            page_size: Some(20),
            request_timeout_secs: Some(0),
        },
    )
    .unwrap();
    assert_eq!(
        profile.api_base_url.as_deref(),
        Some("https://tasks.example.com/api")
    );
    assert_eq!(profile.page_size, Some(20));
    assert_eq!(profile.request_timeout_secs, None);

    let rejected = apply_profile_update(
        &mut profile,
        ProfileUpdate {
            api_base_url: Some("tasks.example.com".to_string()),
            ..ProfileUpdate::default()
        },
    );
    assert!(matches!(rejected, Err(CliError::Config(_))));

    let rejected = apply_profile_update(
        &mut profile,
        ProfileUpdate {
            page_size: Some(0),
            ..ProfileUpdate::default()
        },
    );
    assert!(matches!(rejected, Err(CliError::Config(_))));
}

#[test]
fn completions_use_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("taskdeck"));
}

#[test]
fn cli_parses_list_filters_and_enum_names() {
    let cli = Cli::try_parse_from([
        "taskdeck",
        "--profile",
        "work",
        "list",
        "--priority",
        "urgent",
        "--status",
        "in progress",
        "--star",
        "true",
        "--page",
        "2",
    ])
    .unwrap();
    assert_eq!(cli.profile.as_deref(), Some("work"));
    match cli.command {
        Commands::List(args) => {
            assert_eq!(args.priority, Some(TaskPriority::Urgent));
            assert_eq!(args.status, Some(TaskStatus::InProgress));
            assert_eq!(args.star, Some(true));
            assert_eq!(args.page, 2);
            assert!(!args.all);
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn cli_parses_edit_and_delete() {
    let cli = Cli::try_parse_from(["taskdeck", "edit", "9", "--title", "New", "--priority", "3"])
        .unwrap();
    match cli.command {
        Commands::Edit { id, fields } => {
            assert_eq!(id, "9");
            assert_eq!(fields.title.as_deref(), Some("New"));
            assert_eq!(fields.priority, Some(TaskPriority::Urgent));
        }
        _ => panic!("expected edit command"),
    }

    let cli = Cli::try_parse_from(["taskdeck", "delete", "9"]).unwrap();
    assert!(matches!(cli.command, Commands::Delete { page: 1, .. }));
}

#[test]
fn cli_rejects_unknown_priority() {
    assert!(Cli::try_parse_from(["taskdeck", "list", "--priority", "whenever"]).is_err());
}
