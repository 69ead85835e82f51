use taskdeck_core::{ListOutcome, TaskFilter};

use crate::commands::common::{
    format_page_footer, format_task_lines, normalize_task_identifier, open_page, CliContext,
};
use crate::error::CliError;

/// Delete `id` as seen on list page `page`, then show what that page holds
/// afterwards.
pub async fn run_delete(id: &str, page: u32, context: &CliContext) -> Result<(), CliError> {
    let id = normalize_task_identifier(id)?;
    let board = context.board()?;
    open_page(&board, &TaskFilter::default(), page.max(1)).await?;

    let outcome = board.delete(&id).await.ok_or(CliError::Reported)?;
    let snapshot = board.controller().snapshot();
    if outcome == ListOutcome::Applied {
        tracing::debug!("Moved to page {} after delete", snapshot.page_number);
    }

    for line in format_task_lines(&snapshot.tasks) {
        println!("{line}");
    }
    println!("{}", format_page_footer(&snapshot));
    Ok(())
}
