use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use taskdeck_core::{TaskPriority, TaskStatus};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Manage your Taskdeck tasks from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (API endpoint and stored session)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, register, or inspect the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// List your tasks
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show a single task (read-only)
    Show {
        /// Task ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new task
    #[command(alias = "new")]
    Add(TaskFields),
    /// Edit an existing task
    Edit {
        /// Task ID
        id: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// List page the task is shown on
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Star a task
    Star {
        /// Task ID
        id: String,
    },
    /// Remove the star from a task
    Unstar {
        /// Task ID
        id: String,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Title contains
    #[arg(long)]
    pub title: Option<String>,
    /// Priority (name or index)
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Status (name or index)
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Only starred (true) or unstarred (false) tasks
    #[arg(long, value_name = "BOOL")]
    pub star: Option<bool>,
    /// Only active (true) or inactive (false) tasks
    #[arg(long, value_name = "BOOL")]
    pub active: Option<bool>,
    /// Starting on or after (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,
    /// Ending on or before (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
    /// Page number
    #[arg(short, long, default_value = "1")]
    pub page: u32,
    /// Use the generic task listing instead of the per-user one
    #[arg(long)]
    pub all: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct TaskFields {
    /// Task title
    pub title: Vec<String>,
    /// Description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Priority (name or index, default Low)
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Status (name or index, default Draft)
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Start date (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,
    /// Star the new task
    #[arg(long)]
    pub star: bool,
    /// Create the task as inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug, Default)]
pub struct EditFields {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// New start date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,
    /// New end date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,
    #[arg(long, value_name = "BOOL")]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Task API base URL (e.g. <http://localhost:5081/api>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Tasks per list page
        #[arg(long, value_name = "N")]
        page_size: Option<u32>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        request_timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved settings for a profile
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password and store the session in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Repeat the password
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
    },
    /// Show auth status for profile
    Status,
    /// Clear the stored session
    Logout,
}
