//! Plain-text rendering for one-shot commands.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use repograph_core::{Pagination, ResultPage};

const MAX_CELL_WIDTH: usize = 60;

/// Runs `fut` behind a spinner on stderr.
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}

/// Left-aligned table with a header rule. Long cells are cut at
/// `MAX_CELL_WIDTH` characters and newlines are flattened.
pub fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(columns, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        out.push('\n');
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = *w)
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn clip(cell: &str) -> String {
    let flat = cell.replace(['\n', '\r'], " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut clipped: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

/// Header and cells for a result page, whatever its shape.
pub fn page_table(page: &ResultPage) -> (Vec<String>, Vec<Vec<String>>) {
    match page {
        ResultPage::Tabular { columns, rows, .. } => {
            (columns.clone(), rows.iter().map(|r| r.cells()).collect())
        }
        ResultPage::Scored { results, .. } => {
            let columns = ["Score", "Function", "Repository", "Summary"]
                .iter()
                .map(|c| c.to_string())
                .collect();
            let rows = results
                .iter()
                .map(|r| {
                    vec![
                        format!("{:.3}", r.score),
                        r.function.display_name().to_string(),
                        r.repository
                            .clone()
                            .unwrap_or_else(|| r.function.repository_name.clone()),
                        r.summarization.clone(),
                    ]
                })
                .collect();
            (columns, rows)
        }
    }
}

pub fn format_page(page: &ResultPage) -> String {
    if page.is_empty() {
        return "No results".to_string();
    }
    let (columns, rows) = page_table(page);
    format_table(&columns, &rows)
}

/// "Showing 1 to 10 of 25 results" plus the offsets to pass for the
/// neighbouring pages.
pub fn format_pagination(pagination: &Pagination) -> String {
    let mut line = pagination.summary();
    if pagination.has_previous() {
        let previous = pagination.offset().saturating_sub(pagination.limit());
        line.push_str(&format!("  (previous: --offset {})", previous));
    }
    if pagination.has_next() {
        let next = pagination.offset() + pagination.limit();
        line.push_str(&format!("  (next: --offset {})", next));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_alignment() {
        let table = format_table(
            &strings(&["name", "calls"]),
            &[strings(&["main", "4"]), strings(&["helper_function", "12"])],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "name             calls");
        assert_eq!(lines[1], "---------------  -----");
        assert_eq!(lines[2], "main             4");
        assert_eq!(lines[3], "helper_function  12");
    }

    #[test]
    fn test_long_cells_are_clipped() {
        let long = "x".repeat(100);
        let table = format_table(&strings(&["body"]), &[vec![long]]);
        let last = table.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with("..."));
    }

    #[test]
    fn test_pagination_hints() {
        let mut page = Pagination::with_total(10, 25);
        assert_eq!(
            format_pagination(&page),
            "Showing 1 to 10 of 25 results  (next: --offset 10)"
        );
        page.next();
        page.next();
        assert_eq!(
            format_pagination(&page),
            "Showing 21 to 25 of 25 results  (previous: --offset 10)"
        );
    }

    #[test]
    fn test_empty_page() {
        let page = ResultPage::Tabular {
            columns: strings(&["a"]),
            rows: vec![],
            total: 0,
        };
        assert_eq!(format_page(&page), "No results");
    }
}
