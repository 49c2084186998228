pub mod sink;

use crate::runner::session::{parameters_tested, ResultRow};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Rows shown in the console preview
const PREVIEW_ROWS: usize = 10;

/// Write the rows of a run and print a summary
///
/// Write failures are reported and swallowed: the rows are not kept anywhere
/// else.
pub fn save_results(rows: &[ResultRow], directory: &Path) -> Option<PathBuf> {
    match sink::write(rows, directory) {
        Ok(Some(path)) => {
            println!(
                "\n{} Data saved to: {}",
                "✓".green(),
                path.display().to_string().cyan()
            );
            println!("{} Total rows in CSV: {}", "✓".green(), rows.len());
            println!(
                "{} Parameters tested: {}",
                "✓".green(),
                parameters_tested(rows)
            );
            println!("\nData preview:");
            print!("{}", render_preview(rows, PREVIEW_ROWS));
            Some(path)
        }
        Ok(None) => {
            println!("{} No data to save!", "⚠".yellow());
            None
        }
        Err(e) => {
            println!("{} Error saving CSV: {:#}", "❌".red(), e);
            None
        }
    }
}

/// Fixed-width table of the first `limit` rows
pub fn render_preview(rows: &[ResultRow], limit: usize) -> String {
    let header = ["test_parameter", "row_number", "column_1", "column_2"];
    let body: Vec<[String; 4]> = rows
        .iter()
        .take(limit)
        .map(|row| {
            [
                row.test_parameter.to_string(),
                row.row_number.to_string(),
                row.column_1.clone(),
                row.column_2.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells = header.map(String::from);
    for line in std::iter::once(&header_cells).chain(body.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
