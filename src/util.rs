//! Utilities shared by the problem writer and the solver output parsers
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};

/// Backends identify columns by this name prefix followed by the column index.
pub const COLUMN_NAME_PREFIX: char = 'x';

/// Name under which backends report the column with the given index
///
/// ```
/// use lp_bridge::util::variable_name_by_column_idx;
///
/// assert_eq!(variable_name_by_column_idx(0), "x0");
/// assert_eq!(variable_name_by_column_idx(17), "x17");
/// ```
pub fn variable_name_by_column_idx(idx: u32) -> String {
    format!("{}{}", COLUMN_NAME_PREFIX, idx)
}

/// Inverse of [variable_name_by_column_idx]
///
/// ```
/// use lp_bridge::util::column_idx_by_variable_name;
///
/// assert_eq!(column_idx_by_variable_name("x17").unwrap(), 17);
/// assert!(column_idx_by_variable_name("y17").is_err());
/// assert!(column_idx_by_variable_name("x").is_err());
/// ```
pub fn column_idx_by_variable_name(name: &str) -> Result<u32> {
    let digits = name
        .strip_prefix(COLUMN_NAME_PREFIX)
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            Error::parse(
                "column name",
                0,
                name,
                format!("expected '{}' followed by a column index", COLUMN_NAME_PREFIX),
            )
        })?;
    digits
        .parse()
        .map_err(|e: std::num::ParseIntError| Error::parse("column name", 0, name, e.to_string()))
}

/// Whitespace separated fields of a report line, adjacent separators merged
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse field `idx` of a report line. The offending line is logged before the error is returned.
pub(crate) fn parse_field<T>(
    solver: &str,
    line_number: usize,
    line: &str,
    fields: &[&str],
    idx: usize,
) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let parsed = match fields.get(idx) {
        Some(field) => field
            .parse::<T>()
            .map_err(|e| format!("field {} '{}': {}", idx, field, e)),
        None => Err(format!("missing field {}", idx)),
    };
    parsed.map_err(|reason| {
        warn!(
            "{}: failed to extract value from line {} '{}': {}",
            solver, line_number, line, reason
        );
        Error::parse(solver, line_number, line, reason)
    })
}

/// Error for a report that ended before the parser saw what it needs
pub(crate) fn truncated_report(solver: &str, line_number: usize, reason: &str) -> Error {
    warn!(
        "{}: solution report ends after line {}: {}",
        solver, line_number, reason
    );
    Error::parse(solver, line_number, "", format!("truncated report: {}", reason))
}
