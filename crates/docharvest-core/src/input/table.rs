//! Delimited-text tables (TSV/CSV exported from a spreadsheet) and the choice
//! between tabular and free-form input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column '{column}' not found; available columns: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("input has no header row")]
    Empty,
}

/// A header row plus data rows. Cells are trimmed and unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses `text` using tab as delimiter if the header line has one,
    /// comma otherwise. Returns `None` when there is no non-empty line.
    pub fn parse(text: &str) -> Option<Table> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header_line = lines.next()?;
        let delim = if header_line.contains('\t') { '\t' } else { ',' };
        let headers = split_row(header_line, delim);
        let rows = lines.map(|l| split_row(l, delim)).collect();
        Some(Table { headers, rows })
    }

    /// Index of the header equal to `name` (trimmed, ASCII case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Non-empty cell values of column `idx`, in row order.
    pub fn column_values(&self, idx: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|cell| !cell.is_empty())
            .cloned()
            .collect()
    }
}

/// Raw strings handed to the normalizer, and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInputs {
    /// Values of a named table column.
    Column { name: String, values: Vec<String> },
    /// One raw string per line of free-form text.
    Lines(Vec<String>),
}

impl RawInputs {
    pub fn values(&self) -> &[String] {
        match self {
            RawInputs::Column { values, .. } => values,
            RawInputs::Lines(lines) => lines,
        }
    }
}

/// Decides how to read `text`.
///
/// With `forced_column`, the text must be a table containing that column.
/// Otherwise the first of `candidates` found in the header row selects
/// tabular mode, and anything else is treated as free-form lines.
pub fn extract_raw_inputs(
    text: &str,
    candidates: &[String],
    forced_column: Option<&str>,
) -> Result<RawInputs, TableError> {
    let table = Table::parse(text);

    if let Some(column) = forced_column {
        let table = table.ok_or(TableError::Empty)?;
        let idx = table
            .column_index(column)
            .ok_or_else(|| TableError::MissingColumn {
                column: column.to_string(),
                available: table.headers.clone(),
            })?;
        return Ok(RawInputs::Column {
            name: table.headers[idx].clone(),
            values: table.column_values(idx),
        });
    }

    if let Some(table) = table {
        for candidate in candidates {
            if let Some(idx) = table.column_index(candidate) {
                return Ok(RawInputs::Column {
                    name: table.headers[idx].clone(),
                    values: table.column_values(idx),
                });
            }
        }
    }

    Ok(RawInputs::Lines(text.lines().map(str::to_string).collect()))
}

/// Splits one line on `delim`, honoring double-quoted cells and `""` escapes.
fn split_row(line: &str, delim: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
        } else if c == '"' && cell.trim().is_empty() {
            cell.clear();
            in_quotes = true;
        } else if c == delim {
            cells.push(cell.trim().to_string());
            cell.clear();
        } else {
            cell.push(c);
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
