use serde::Serialize;
use ts_core::Page;
use ts_models::{ApprovalView, TaskRow, TimesheetSummary};

use crate::cli::OutputFormat;

const SUMMARY_HEADERS: [&str; 6] = ["ID", "Employee", "Date", "Status", "Hours", "Tasks"];
const APPROVAL_HEADERS: [&str; 6] = ["ID", "Employee", "Date", "Decision", "Hours", "Reason"];

pub fn summaries(items: &[TimesheetSummary], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => json(&items),
        OutputFormat::Table => Ok(table(&SUMMARY_HEADERS, items.iter().map(summary_cells))),
    }
}

pub fn summary_page(page: &Page<TimesheetSummary>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => json(page),
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            table(&SUMMARY_HEADERS, page.items.iter().map(summary_cells)),
            footer(page)
        )),
    }
}

pub fn approval_page(page: &Page<ApprovalView>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => json(page),
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            table(&APPROVAL_HEADERS, page.items.iter().map(approval_cells)),
            footer(page)
        )),
    }
}

pub fn task_rows(rows: &[TaskRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => json(&rows),
        OutputFormat::Table => Ok(table(&TaskRow::HEADERS, rows.iter().map(|row| row.cells().to_vec()))),
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn summary_cells(summary: &TimesheetSummary) -> Vec<String> {
    vec![
        summary.id.to_string(),
        summary.employee_email.to_string(),
        summary.scope.to_string(),
        summary.status_label.to_string(),
        summary.total_duration.to_string(),
        summary.task_count.to_string(),
    ]
}

fn approval_cells(view: &ApprovalView) -> Vec<String> {
    vec![
        view.timesheet_id.to_string(),
        view.employee_email.to_string(),
        view.scope.to_string(),
        view.decision.to_string(),
        view.total_duration.to_string(),
        view.reason.clone().unwrap_or_default(),
    ]
}

fn footer<T>(page: &Page<T>) -> String {
    format!(
        "page {} of {} ({} total)",
        page.page,
        page.total_pages().max(1),
        page.total
    )
}

/// Left-aligned columns padded to the widest cell
fn table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(headers.iter().map(|h| h.to_string()).collect())];
    lines.extend(rows.into_iter().map(render));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pads_columns() {
        let rendered = table(
            &["ID", "Name"],
            vec![
                vec!["1".to_string(), "Coding".to_string()],
                vec!["12".to_string(), "QA".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "1   Coding");
        assert_eq!(lines[2], "12  QA");
    }

    #[test]
    fn test_footer_on_empty_page() {
        let page: Page<u32> = Page {
            items: vec![],
            total: 0,
            page: 1,
            per_page: 5,
        };
        assert_eq!(footer(&page), "page 1 of 1 (0 total)");
    }
}
