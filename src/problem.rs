//! The linear problem model: columns (variables), rows (constraints) and the objective
use std::io::prelude::*;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::lp_format::{Bounds, DisplayedLp, LpObjective};
use crate::solvers::ProblemFormat;

/// Value domain of a column
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum ValueKind {
    /// general integer
    #[default]
    Integer,
    /// no integrality restriction
    Continuous,
    /// additionally listed in the `Binaries` section
    Binary,
}

/// One coefficient of a row
#[derive(Clone, PartialEq, Debug)]
pub struct MatrixEntry {
    /// name of the column the coefficient applies to
    pub name: String,
    /// defaults to 1.0
    pub coefficient: f64,
}

impl Default for MatrixEntry {
    fn default() -> Self {
        MatrixEntry {
            name: String::new(),
            coefficient: 1.0,
        }
    }
}

impl MatrixEntry {
    /// coefficient of column `name`
    pub fn new(name: impl Into<String>, coefficient: f64) -> MatrixEntry {
        MatrixEntry {
            name: name.into(),
            coefficient,
        }
    }
}

/// A decision variable. Its coefficient is the one used in the objective.
#[derive(Clone, PartialEq, Debug)]
pub struct Column {
    /// unique name; backends report columns as `x<index>`, see [crate::util]
    pub name: String,
    /// objective coefficient
    pub coefficient: f64,
    /// allowed values
    pub bounds: Bounds,
    /// integrality of the variable
    pub value_kind: ValueKind,
}

impl Column {
    /// An integer column
    pub fn new(name: impl Into<String>, bounds: Bounds, coefficient: f64) -> Column {
        Column {
            name: name.into(),
            coefficient,
            bounds,
            value_kind: ValueKind::Integer,
        }
    }

    /// Change the value domain of the column
    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Column {
        self.value_kind = value_kind;
        self
    }
}

/// A constraint on a weighted sum of columns
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Row {
    /// unique name within the problem
    pub name: String,
    /// allowed values of the weighted sum
    pub bounds: Bounds,
    /// coefficients, rendered in this order
    pub entries: Vec<MatrixEntry>,
}

impl Row {
    /// A row without entries
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Row {
        Row {
            name: name.into(),
            bounds,
            entries: vec![],
        }
    }

    /// Append the coefficient of a column
    pub fn with_entry(mut self, name: impl Into<String>, coefficient: f64) -> Row {
        self.entries.push(MatrixEntry::new(name, coefficient));
        self
    }
}

/// A linear (integer) problem, built incrementally and then written in the .lp format
#[derive(Clone, PartialEq, Debug)]
pub struct Problem {
    name: String,
    direction: LpObjective,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Problem {
    /// An empty problem
    pub fn new(name: impl Into<String>, direction: LpObjective) -> Problem {
        Problem {
            name: name.into(),
            direction,
            columns: vec![],
            rows: vec![],
        }
    }

    /// problem name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether to maximize or minimize the objective
    pub fn direction(&self) -> LpObjective {
        self.direction
    }

    /// Columns in index order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Add a row. Row names have to be unique.
    pub fn add_row(&mut self, row: Row) -> Result<()> {
        debug!(
            "{}: adding row '{}' to existing {}",
            self.name,
            row.name,
            self.rows.len()
        );
        if self.rows.iter().any(|other| other.name == row.name) {
            return Err(Error::DuplicateName {
                kind: "row",
                name: row.name,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Add a column. Duplicate names are only rejected when `strict` is set.
    pub fn add_column(&mut self, column: Column, strict: bool) -> Result<()> {
        if strict && self.columns.iter().any(|other| other.name == column.name) {
            return Err(Error::DuplicateName {
                kind: "column",
                name: column.name,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Row with the given name
    pub fn row_by_name(&self, name: &str) -> Result<&Row> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .ok_or_else(|| not_found("row", name))
    }

    /// Mutable access to the row with the given name
    pub fn row_by_name_mut(&mut self, name: &str) -> Result<&mut Row> {
        self.rows
            .iter_mut()
            .find(|row| row.name == name)
            .ok_or_else(|| not_found("row", name))
    }

    /// Row at `idx + offset`. Use an offset of -1 for 1-based backend numbering.
    pub fn row_by_idx(&self, idx: usize, offset: isize) -> Result<&Row> {
        idx.checked_add_signed(offset)
            .and_then(|i| self.rows.get(i))
            .ok_or_else(|| not_found("row", &format!("#{} (offset {})", idx, offset)))
    }

    /// First column with the given name
    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| not_found("column", name))
    }

    /// Column at `idx + offset`. Use an offset of -1 for 1-based backend numbering.
    pub fn column_by_idx(&self, idx: usize, offset: isize) -> Result<&Column> {
        idx.checked_add_signed(offset)
            .and_then(|i| self.columns.get(i))
            .ok_or_else(|| not_found("column", &format!("#{} (offset {})", idx, offset)))
    }

    /// Replace the bounds of a row; the bound kind follows from which ends are finite
    pub fn set_row_bounds(&mut self, row: &str, min: f64, max: f64) -> Result<()> {
        self.row_by_name_mut(row)?.bounds = Bounds::from_range(min, max);
        Ok(())
    }

    /// Force the weighted sum of a row to a value
    pub fn set_row_bounds_exact(&mut self, row: &str, exact: f64) -> Result<()> {
        self.row_by_name_mut(row)?.bounds = Bounds::exact(exact);
        Ok(())
    }

    /// Replace the bounds of a column
    pub fn set_column_bounds(&mut self, column: &str, min: f64, max: f64) -> Result<()> {
        self.column_by_name_mut(column)?.bounds = Bounds::from_range(min, max);
        Ok(())
    }

    /// Fix a column to a value
    pub fn set_column_bounds_exact(&mut self, column: &str, exact: f64) -> Result<()> {
        self.column_by_name_mut(column)?.bounds = Bounds::exact(exact);
        Ok(())
    }

    fn column_by_name_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|column| column.name == name)
            .ok_or_else(|| not_found("column", name))
    }

    /// Return an object whose [std::fmt::Display] implementation is the problem in the .lp format.
    /// Fails when a row or a column has exact bounds that cannot be written.
    pub fn display_lp(&self, indent: usize) -> Result<DisplayedLp<'_>> {
        for row in &self.rows {
            row.bounds.check_exact(&row.name)?;
        }
        for column in &self.columns {
            column.bounds.check_exact(&column.name)?;
        }
        Ok(DisplayedLp {
            problem: self,
            indent,
        })
    }

    /// The problem in the .lp format, section contents prefixed by `indent` spaces
    pub fn to_lp_string(&self, indent: usize) -> Result<String> {
        Ok(self.display_lp(indent)?.to_string())
    }

    /// Write the problem to a uniquely named temporary file.
    /// Only [ProblemFormat::Cplex] can be written.
    pub fn save_problem_to_tempfile(&self, format: ProblemFormat) -> Result<NamedTempFile> {
        if format != ProblemFormat::Cplex {
            return Err(Error::unsupported_format(&self.name, format));
        }
        let displayed = self.display_lp(0)?;
        // the name is not a path component
        let prefix = self.name.replace(['/', '\\'], "_");
        let mut f = tempfile::Builder::new()
            .prefix(&format!("{}-", prefix))
            .suffix(".lp")
            .tempfile()?;
        write!(f, "{}", displayed)?;
        f.flush()?;
        debug!("{}: problem written to {}", self.name, f.path().display());
        Ok(f)
    }
}

fn not_found(kind: &'static str, name: &str) -> Error {
    Error::NotFound {
        kind,
        name: name.to_string(),
    }
}
