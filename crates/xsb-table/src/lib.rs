//! # xsb-table
//!
//! Loader for whitespace-delimited numeric text tables (theory `.dat`
//! files). The whole file is read into memory at once; inputs are tens to
//! low hundreds of rows.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::path::Path;

use xsb_core::{Error, Result};

/// Strip a trailing comment from a line.
///
/// Numeric tables conventionally use `#`; some generators emit `//`.
fn strip_comment(line: &str) -> &str {
    if let Some(idx) = line.find('#') {
        return &line[..idx];
    }
    if let Some(idx) = line.find("//") {
        return &line[..idx];
    }
    line
}

/// Read selected columns of a whitespace-delimited numeric table.
///
/// Returns one row per data line, with the requested column indices in the
/// requested order. Blank lines and comments are skipped. Fails if a data
/// line has fewer fields than the highest requested index needs, or if a
/// requested field does not parse as a float.
pub fn read_table(path: impl AsRef<Path>, usecols: &[usize]) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_table(&text, usecols, path)
}

fn parse_table(text: &str, usecols: &[usize], path: &Path) -> Result<Vec<Vec<f64>>> {
    let Some(&max_col) = usecols.iter().max() else {
        return Err(Error::Validation("no columns requested".to_string()));
    };

    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() <= max_col {
            return Err(Error::Format {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!(
                    "row has {} columns, need at least {}",
                    fields.len(),
                    max_col + 1
                ),
            });
        }
        let mut row = Vec::with_capacity(usecols.len());
        for &col in usecols {
            let field = fields[col];
            let v: f64 = field.parse().map_err(|_| Error::Format {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("column {col} value '{field}' is not a number"),
            })?;
            row.push(v);
        }
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}
