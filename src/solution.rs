//! The backend independent result of a solver run
use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use log::debug;

use crate::error::Result;
use crate::solvers::Status;
use crate::util::{parse_field, split_fields, truncated_report};

const REPORT: &str = "solution report";

/// Canonical solution built by the backend parsers.
///
/// Columns missing from a solver report take the value 0.0:
/// several solvers only list the variables that differ from zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    column_values: BTreeMap<String, f64>,
    objective_value: f64,
    status: Status,
    row_count: usize,
    column_count: usize,
    nonzero_count: usize,
}

impl Solution {
    /// Value of a column, 0.0 when the solver did not report it
    pub fn column_value(&self, column_name: &str) -> f64 {
        match self.column_values.get(column_name) {
            Some(value) => *value,
            None => {
                debug!(
                    "no value reported for column '{}', defaulting to 0.0",
                    column_name
                );
                0.0
            }
        }
    }

    /// All values reported by the solver, by column name
    pub fn column_values(&self) -> &BTreeMap<String, f64> {
        &self.column_values
    }

    /// Objective value of the solution
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Outcome of the solver run
    pub fn status(&self) -> Status {
        self.status
    }

    /// number of rows reported by the solver
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// number of columns reported by the solver
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// number of non-zero matrix coefficients reported by the solver
    pub fn nonzero_count(&self) -> usize {
        self.nonzero_count
    }

    pub(crate) fn set_column_value(&mut self, column_name: impl Into<String>, value: f64) {
        self.column_values.insert(column_name.into(), value);
    }

    pub(crate) fn set_objective_value(&mut self, value: f64) {
        self.objective_value = value;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn set_row_count(&mut self, n: usize) {
        self.row_count = n;
    }

    pub(crate) fn set_column_count(&mut self, n: usize) {
        self.column_count = n;
    }

    pub(crate) fn set_nonzero_count(&mut self, n: usize) {
        self.nonzero_count = n;
    }

    /// Read back a report written by the `Display` implementation
    pub fn read_report<R: BufRead>(reader: R) -> Result<Solution> {
        let mut solution = Solution::default();
        let mut seen_status = false;
        let mut parse_columns = false;
        let mut line_number = 0;
        for line in reader.lines() {
            let line = line?;
            line_number += 1;
            let fields = split_fields(&line);
            let keyword = match fields.first() {
                Some(keyword) => *keyword,
                None => continue,
            };
            if parse_columns {
                let value = parse_field(REPORT, line_number, &line, &fields, 1)?;
                solution.set_column_value(keyword, value);
                continue;
            }
            match keyword {
                "Rows:" => solution.row_count = parse_field(REPORT, line_number, &line, &fields, 1)?,
                "Columns:" => {
                    solution.column_count = parse_field(REPORT, line_number, &line, &fields, 1)?
                }
                "Non-zeros:" => {
                    solution.nonzero_count = parse_field(REPORT, line_number, &line, &fields, 1)?
                }
                "Status:" => {
                    solution.status = parse_field(REPORT, line_number, &line, &fields, 1)?;
                    seen_status = true;
                }
                "Objective:" => {
                    solution.objective_value = parse_field(REPORT, line_number, &line, &fields, 1)?
                }
                "Column" => parse_columns = true,
                _ => {}
            }
        }
        if !seen_status || !parse_columns {
            return Err(truncated_report(
                REPORT,
                line_number,
                "missing status or column table",
            ));
        }
        Ok(solution)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows:       {}", self.row_count)?;
        writeln!(f, "Columns:    {}", self.column_count)?;
        writeln!(f, "Non-zeros:  {}", self.nonzero_count)?;
        writeln!(f, "Status:     {}", self.status)?;
        writeln!(f, "Objective:  {}", self.objective_value)?;
        writeln!(f)?;
        writeln!(f, "Column      Activity")?;
        for (name, value) in &self.column_values {
            writeln!(f, "{:>10} {:>10}", name, value)?;
        }
        Ok(())
    }
}
