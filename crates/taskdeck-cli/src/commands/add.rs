use crate::cli::TaskFields;
use crate::commands::common::{submit_result, task_form, CliContext};
use crate::error::CliError;

pub async fn run_add(fields: &TaskFields, context: &CliContext) -> Result<(), CliError> {
    let form = task_form(fields)?;
    let board = context.board()?;
    submit_result(board.create(&form).await)
}
