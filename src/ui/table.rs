// LogDeck - ui/table.rs
//
// Text grid for one page of the view, with the sort arrow on the sorted
// column and the pager footer underneath.

use crate::core::paginate::PageWindow;
use crate::core::sort::SortKey;
use crate::core::table::{truncate_cell, TableView};
use crate::util::constants::MAX_CELL_WIDTH;
use std::fmt::Write;

/// Message shown in place of the grid when the page has no rows.
pub const NO_RESULTS: &str = "No results found.";

/// Render the grid. Row numbers in the first column are 1-based within
/// the page, matching `--detail ROW`.
pub fn render(table: &TableView, sort: &SortKey) -> String {
    if table.is_empty() {
        return format!("{NO_RESULTS}\n");
    }

    let headers: Vec<String> = table
        .fields
        .iter()
        .zip(&table.headers)
        .map(|(field, header)| {
            if *field == sort.field {
                format!("{header} {}", sort.direction.arrow())
            } else {
                (*header).to_string()
            }
        })
        .collect();

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| truncate_cell(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let number_width = rows.len().to_string().len().max(1);
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:>number_width$}", "#");
    for (header, &width) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {header:<width$}");
    }
    end_line(&mut out);

    let rule_len = number_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        let _ = write!(out, "{:>number_width$}", i + 1);
        for (cell, &width) in row.iter().zip(&widths) {
            let _ = write!(out, "  {cell:<width$}");
        }
        end_line(&mut out);
    }
    out
}

/// Drop the last column's padding and terminate the line.
fn end_line(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

/// Pager footer: caption plus "Page n of m".
pub fn render_footer(window: &PageWindow) -> String {
    format!(
        "{}\nPage {} of {}\n",
        window.caption(),
        window.page,
        window.total_pages()
    )
}
