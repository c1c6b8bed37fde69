//! Plain-text tables for `get` and `list` output.
//!
//! Columns are padded to the widest cell and separated with `|`, with a dashed
//! rule under the header:
//!
//! ```text
//! | ID | CALL SIGN |
//! |----|-----------|
//! | 1  | KYYZZ     |
//! ```

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::entry::Entry;

/// Format for the `Date` column, rendered in local time.
///
/// `Local` carries no zone names, so the zone is shown as a UTC offset such
/// as `-05:00`.
pub const DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S %:z";

/// A header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column headers.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty, extra cells are dropped.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table, one line per row, each ending in a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        render_line(&mut out, &headers, &widths);

        out.push('|');
        for width in &widths {
            out.push_str(&"-".repeat(width + 2));
            out.push('|');
        }
        out.push('\n');

        for row in &self.rows {
            render_line(&mut out, row, &widths);
        }
        out
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map_or("", String::as_str);
        let _ = write!(out, " {cell:<width$} |");
    }
    out.push('\n');
}

/// Render a timestamp in the local time zone for display.
#[must_use]
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Local)
        .format(DATE_FORMAT)
        .to_string()
}

/// Table showing full details of the given entries (`get` output).
#[must_use]
pub fn entry_detail_table(entries: &[Entry]) -> Table {
    let mut table = Table::new(["Date", "Call Sign", "Name", "ID"]);
    for entry in entries {
        table.push_row(vec![
            format_created_at(&entry.created_at),
            entry.call_sign.clone(),
            entry.name.clone(),
            entry.id.to_string(),
        ]);
    }
    table
}

/// Table with one summary line per entry (`list` output).
#[must_use]
pub fn entry_summary_table(entries: &[Entry]) -> Table {
    let mut table = Table::new(["ID", "Call Sign"]);
    for entry in entries {
        table.push_row(vec![entry.id.to_string(), entry.call_sign.clone()]);
    }
    table
}
