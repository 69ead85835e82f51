use taskdeck_core::FormMode;

use crate::commands::common::{normalize_task_identifier, task_detail_lines, CliContext};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let id = normalize_task_identifier(id)?;
    let board = context.board()?;
    let form = board
        .open(&id, FormMode::View)
        .await
        .ok_or(CliError::Reported)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(form.values())?);
    } else {
        for line in task_detail_lines(form.values()) {
            println!("{line}");
        }
    }
    Ok(())
}
