use crate::cli::ListArgs;
use crate::commands::common::{
    format_page_footer, format_task_lines, list_filter, open_page, CliContext,
};
use crate::error::CliError;

pub async fn run_list(args: &ListArgs, context: &CliContext) -> Result<(), CliError> {
    let filter = list_filter(args)?;

    if args.all {
        return run_list_all(args, &filter, context).await;
    }

    let board = context.board()?;
    open_page(&board, &filter, args.page.max(1)).await?;
    let snapshot = board.controller().snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        for line in format_task_lines(&snapshot.tasks) {
            println!("{line}");
        }
        println!("{}", format_page_footer(&snapshot));
    }
    Ok(())
}

async fn run_list_all(
    args: &ListArgs,
    filter: &taskdeck_core::TaskFilter,
    context: &CliContext,
) -> Result<(), CliError> {
    let query = filter
        .clone()
        .with_page(args.page.max(1), context.config.page_size);
    let page = context.service().list_all(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        for line in format_task_lines(&page.items) {
            println!("{line}");
        }
        println!("{} tasks", page.total_count);
    }
    Ok(())
}
