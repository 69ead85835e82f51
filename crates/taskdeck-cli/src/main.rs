//! Taskdeck CLI - Command-line client for the Taskdeck task API
//!
//! Sign in once per profile, then list, create, edit and delete tasks from
//! the terminal.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod console;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::{add, delete, edit, list, show, star};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(CliError::Reported) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "taskdeck=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Config { command } => run_config(command, profile),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        command => {
            let context = CliContext::load(profile)?;
            match command {
                Commands::Auth { command } => run_auth(command, &context).await,
                Commands::List(args) => list::run_list(&args, &context).await,
                Commands::Show { id, json } => show::run_show(&id, json, &context).await,
                Commands::Add(fields) => add::run_add(&fields, &context).await,
                Commands::Edit { id, fields } => edit::run_edit(&id, &fields, &context).await,
                Commands::Delete { id, page } => delete::run_delete(&id, page, &context).await,
                Commands::Star { id } => star::run_star(&id, true, &context).await,
                Commands::Unstar { id } => star::run_star(&id, false, &context).await,
                Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
            }
        }
    }
}
