//! Minimal CSV parsing for the fantasy-cost feed.
//!
//! The feed is a small semicolon-separated table, so a dependency-free
//! parser is enough: quote-aware, tolerant of CRLF line endings and of a
//! trailing newline.

use crate::error::AppError;

/// Parses delimited text into rows of fields.
///
/// Handles double-quoted fields with `""` escapes. Empty lines are skipped.
pub fn parse_rows(text: &str, separator: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // escaped quote
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == separator && !in_quotes => {
                row.push(std::mem::take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush the trailing row when the text does not end in a newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Finds the index of a named column in a header row (case-insensitive).
pub fn column_index(header: &[String], name: &str) -> Result<usize, AppError> {
    header
        .iter()
        .position(|cell| cell.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::csv_shape(format!("missing column '{name}'")))
}
