use anyhow::bail;
use ts_contracts::Actor;
use ts_core::Email;
use ts_models::TimesheetSummary;
use ts_queries::SearchQueryBuilder;
use ts_services::TimesheetWorkflow;

use crate::cli::{Commands, FilterArgs, OutputFormat};
use crate::output;

/// Run one command and render its result
pub async fn dispatch(
    workflow: &TimesheetWorkflow,
    command: Commands,
    format: OutputFormat,
) -> anyhow::Result<String> {
    // Local snapshot access is trusted
    let actor = Actor::system();

    match command {
        Commands::Summary { id: Some(id), .. } => {
            let summary = workflow.summary(&actor, id).await?;
            output::summaries(&[summary], format)
        }
        Commands::Summary { employee: Some(employee), .. } => {
            let summaries = workflow
                .timesheets_for(&actor, employee)
                .await?
                .iter()
                .map(TimesheetSummary::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            output::summaries(&summaries, format)
        }
        Commands::Summary { .. } => bail!("summary needs --id or --employee"),
        Commands::Search { employee, status, filter } => {
            let mut builder = apply_filter(workflow.employee_query(), filter);
            if let Some(status) = status {
                builder = builder.status(status);
            }
            let page = workflow
                .search_timesheets(&actor, employee, &builder.build())
                .await?;
            output::summary_page(&page, format)
        }
        Commands::Approvals { approver, tab, filter } => {
            let approver = Email::parse(&approver)?;
            let query = apply_filter(workflow.approver_query(tab), filter).build();
            let page = workflow.approvals_for(&actor, &approver, &query).await?;
            output::approval_page(&page, format)
        }
        Commands::Export { id } => {
            let rows = workflow.export_rows(&actor, id).await?;
            output::task_rows(&rows, format)
        }
    }
}

fn apply_filter<S: Copy + PartialEq>(
    mut builder: SearchQueryBuilder<S>,
    filter: FilterArgs,
) -> SearchQueryBuilder<S> {
    if let Some(text) = filter.text {
        builder = builder.text(text);
    }
    if let Some(date) = filter.on {
        builder = builder.on(date);
    }
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        builder = builder.between(from, to);
    }
    if filter.desc {
        builder = builder.descending();
    }
    if let Some(per_page) = filter.per_page {
        builder = builder.per_page(per_page);
    }
    builder.page(filter.page)
}
