use taskdeck_core::FormMode;

use crate::cli::EditFields;
use crate::commands::common::{edit_patch, normalize_task_identifier, submit_result, CliContext};
use crate::error::CliError;

pub async fn run_edit(id: &str, fields: &EditFields, context: &CliContext) -> Result<(), CliError> {
    let id = normalize_task_identifier(id)?;
    let patch = edit_patch(fields)?;

    let board = context.board()?;
    let mut form = board
        .open(&id, FormMode::Edit)
        .await
        .ok_or(CliError::Reported)?;
    form.apply(&patch)?;
    submit_result(board.update(&form).await)
}
