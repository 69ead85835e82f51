use crate::commands::common::{normalize_task_identifier, submit_result, CliContext};
use crate::error::CliError;

pub async fn run_star(id: &str, star: bool, context: &CliContext) -> Result<(), CliError> {
    let id = normalize_task_identifier(id)?;
    let board = context.board()?;
    submit_result(board.set_star(&id, star).await)
}
