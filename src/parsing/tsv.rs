use std::path::Path;
use thiserror::Error;

use crate::core::table::FeatureTable;
use crate::utils::validation::{check_row_limit, MAX_TABLE_ROWS};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Too many rows: {0} exceeds maximum allowed ({MAX_TABLE_ROWS})")]
    TooManyRows(usize),
}

/// Delimiter implied by a file extension: `,` for `.csv`, tab otherwise
#[must_use]
pub fn delimiter_for_path(path: &Path) -> char {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("csv") => ',',
        _ => '\t',
    }
}

/// Parse a delimited table file, choosing the delimiter from the extension
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_table_file(path: &Path) -> Result<FeatureTable, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_table_text(&content, delimiter_for_path(path))
}

/// Parse delimited text whose first non-comment line is the header
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if there is no header, the header has
/// duplicate or empty column names, or a row has the wrong number of fields;
/// `ParseError::TooManyRows` if the limit is exceeded.
pub fn parse_table_text(text: &str, delimiter: char) -> Result<FeatureTable, ParseError> {
    // Line numbers in errors are 1-based for user friendliness
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

    let (header_num, header) = lines
        .next()
        .ok_or_else(|| ParseError::InvalidFormat("No header line found".to_string()))?;
    let header_fields: Vec<&str> = header.split(delimiter).map(str::trim).collect();
    let mut table = parse_header(&header_fields, header_num)?;

    for (line_num, line) in lines {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        if fields.len() != table.columns().len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields, expected {}",
                fields.len(),
                table.columns().len()
            )));
        }

        if check_row_limit(table.len()).is_some() {
            return Err(ParseError::TooManyRows(table.len()));
        }

        table.push_row(fields);
    }

    Ok(table)
}

fn parse_header(fields: &[&str], line_num: usize) -> Result<FeatureTable, ParseError> {
    for (i, name) in fields.iter().enumerate() {
        if name.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Empty column name in header on line {line_num}"
            )));
        }
        if fields[..i].contains(name) {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate column '{name}' in header on line {line_num}"
            )));
        }
    }
    Ok(FeatureTable::new(fields.iter().copied()))
}
