//! Bounds and the writer producing the CPLEX .lp file format
//!
//! The writer follows the layout the command-line solvers expect:
//! objective, `Subject To`, `Bounds`, `Generals`, optionally `Binaries`, and `End`.
//! Rows with free or lower-upper bounds are expressed through a synthetic
//! slack variable `~r_N` which carries the row bounds in the `Bounds` section.
//!
//! Numbers are rendered as truncated integers; values below `i32::MIN` or above
//! `i32::MAX` become `- inf` and `+ inf`.
use std::fmt;
use std::fmt::Formatter;

use log::warn;

use crate::error::{Error, Result};
use crate::problem::{Problem, ValueKind};

/// A line break is inserted before every n-th term of an expression
pub const TERMS_PER_LINE: usize = 12;

/// Optimization sense
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum LpObjective {
    /// min
    #[default]
    Minimize,
    /// max
    Maximize,
}

impl fmt::Display for LpObjective {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LpObjective::Minimize => "Minimize",
            LpObjective::Maximize => "Maximize",
        })
    }
}

/// How the `min` and `max` of [Bounds] are interpreted
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum BoundKind {
    /// no bound at all
    Free,
    /// only `min` applies
    Lower,
    /// only `max` applies
    Upper,
    /// `min <= value <= max`
    LowerUpper,
    /// `value == min == max`
    Exact,
}

/// Bounds of a row or a column
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    /// lower bound, -INFINITY if there is none
    pub min: f64,
    /// upper bound, INFINITY if there is none
    pub max: f64,
    /// interpretation of the bounds
    pub kind: BoundKind,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::free()
    }
}

impl Bounds {
    /// Bounds with an explicit kind
    pub fn new(min: f64, max: f64, kind: BoundKind) -> Bounds {
        Bounds { min, max, kind }
    }

    /// Unbounded in both directions
    pub fn free() -> Bounds {
        Bounds::new(f64::NEG_INFINITY, f64::INFINITY, BoundKind::Free)
    }

    /// `value >= min`
    pub fn lower(min: f64) -> Bounds {
        Bounds::new(min, f64::INFINITY, BoundKind::Lower)
    }

    /// `value <= max`
    pub fn upper(max: f64) -> Bounds {
        Bounds::new(f64::NEG_INFINITY, max, BoundKind::Upper)
    }

    /// `min <= value <= max`
    pub fn lower_upper(min: f64, max: f64) -> Bounds {
        Bounds::new(min, max, BoundKind::LowerUpper)
    }

    /// `value == exact`
    pub fn exact(exact: f64) -> Bounds {
        Bounds::new(exact, exact, BoundKind::Exact)
    }

    /// Bounds whose kind is inferred from which ends are finite
    ///
    /// ```
    /// use lp_bridge::lp_format::{BoundKind, Bounds};
    ///
    /// assert_eq!(Bounds::from_range(f64::NEG_INFINITY, f64::INFINITY).kind, BoundKind::Free);
    /// assert_eq!(Bounds::from_range(2., f64::INFINITY).kind, BoundKind::Lower);
    /// assert_eq!(Bounds::from_range(f64::NEG_INFINITY, 2.).kind, BoundKind::Upper);
    /// assert_eq!(Bounds::from_range(0., 2.).kind, BoundKind::LowerUpper);
    /// assert_eq!(Bounds::from_range(2., 2.).kind, BoundKind::Exact);
    /// ```
    pub fn from_range(min: f64, max: f64) -> Bounds {
        let kind = match (min.is_finite(), max.is_finite()) {
            (false, false) => BoundKind::Free,
            (true, false) => BoundKind::Lower,
            (false, true) => BoundKind::Upper,
            (true, true) if min == max => BoundKind::Exact,
            (true, true) => BoundKind::LowerUpper,
        };
        Bounds::new(min, max, kind)
    }

    /// Render a lower bound: `- inf` below the `i32` range, the truncated value otherwise
    ///
    /// ```
    /// use lp_bridge::lp_format::Bounds;
    ///
    /// assert_eq!(Bounds::min_bound(f64::NEG_INFINITY), "- inf");
    /// assert_eq!(Bounds::min_bound(-3.7), "-3");
    /// ```
    pub fn min_bound(min: f64) -> String {
        if min < f64::from(i32::MIN) {
            "- inf".to_string()
        } else {
            truncate_bound(min).to_string()
        }
    }

    /// Render an upper bound: `+ inf` above the `i32` range, the truncated value otherwise
    ///
    /// ```
    /// use lp_bridge::lp_format::Bounds;
    ///
    /// assert_eq!(Bounds::max_bound(f64::INFINITY), "+ inf");
    /// assert_eq!(Bounds::max_bound(10.), "10");
    /// ```
    pub fn max_bound(max: f64) -> String {
        if max > f64::from(i32::MAX) {
            "+ inf".to_string()
        } else {
            truncate_bound(max).to_string()
        }
    }

    /// `min <= variable <= max`
    pub fn to_lower_upper_string(&self, variable: &str) -> String {
        format!(
            "{} <= {} <= {}",
            Bounds::min_bound(self.min),
            variable,
            Bounds::max_bound(self.max)
        )
    }

    /// Exact bounds must be finite, within the `i32` range, and satisfy `min == max`
    pub(crate) fn check_exact(&self, name: &str) -> Result<()> {
        if self.kind != BoundKind::Exact {
            return Ok(());
        }
        let in_range = |v: f64| v > f64::from(i32::MIN) && v < f64::from(i32::MAX);
        if !in_range(self.min) {
            return Err(Error::InvalidBounds {
                name: name.to_string(),
                reason: format!("exact bound {} is +/- infinity", self.min),
            });
        }
        if self.min != self.max {
            return Err(Error::InvalidBounds {
                name: name.to_string(),
                reason: format!("exact bound with min {} != max {}", self.min, self.max),
            });
        }
        Ok(())
    }
}

fn truncate_bound(value: f64) -> i32 {
    let truncated = value as i32;
    if f64::from(truncated) != value {
        warn!("lp_format: bound {} rendered as {}", value, truncated);
    }
    truncated
}

fn truncate_coefficient(name: &str, magnitude: f64) -> u64 {
    let truncated = magnitude as u64;
    if truncated as f64 != magnitude {
        warn!(
            "lp_format: coefficient {} of '{}' rendered as {}",
            magnitude, name, truncated
        );
    }
    truncated
}

/// A problem whose `Display` implementation outputs valid .lp syntax.
/// Obtained through [Problem::display_lp], which validates the exact bounds first.
pub struct DisplayedLp<'a> {
    pub(crate) problem: &'a Problem,
    pub(crate) indent: usize,
}

impl<'a> fmt::Display for DisplayedLp<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let hspace = " ".repeat(self.indent);
        writeln!(f, "\\* Problem: {} *\\", self.problem.name())?;
        objective_lp_file_block(self.problem, &hspace, f)?;
        write_constraints_lp_file_block(self.problem, &hspace, f)?;
        write_bounds_lp_file_block(self.problem, &hspace, f)?;
        write_integers_lp_file_block(self.problem, &hspace, f)?;
        writeln!(f, "End")
    }
}

fn write_terms<'a>(
    terms: impl Iterator<Item = (&'a str, f64)>,
    hspace: &str,
    f: &mut Formatter,
) -> fmt::Result {
    let mut line_break_counter = 0;
    for (name, coefficient) in terms {
        if coefficient == 0.0 {
            continue;
        }
        line_break_counter += 1;
        if line_break_counter % TERMS_PER_LINE == 0 {
            write!(f, "\n{}", hspace)?;
        }
        f.write_str(if coefficient >= 0.0 { " +" } else { " -" })?;
        let magnitude = coefficient.abs();
        if magnitude != 1.0 {
            write!(f, " {}", truncate_coefficient(name, magnitude))?;
        }
        write!(f, " {}", name)?;
    }
    Ok(())
}

fn objective_lp_file_block(prob: &Problem, hspace: &str, f: &mut Formatter) -> fmt::Result {
    writeln!(f, "{}{}", hspace, prob.direction())?;
    write!(f, "{} obj:", hspace)?;
    write_terms(
        prob.columns()
            .iter()
            .map(|c| (c.name.as_str(), c.coefficient)),
        hspace,
        f,
    )?;
    write!(f, "\n\n")
}

fn write_constraints_lp_file_block(
    prob: &Problem,
    hspace: &str,
    f: &mut Formatter,
) -> fmt::Result {
    writeln!(f, "{}Subject To", hspace)?;
    let mut slack_counter = 1;
    for row in prob.rows() {
        write!(f, "{} {}:", hspace, row.name)?;
        write_terms(
            row.entries.iter().map(|e| (e.name.as_str(), e.coefficient)),
            hspace,
            f,
        )?;
        match row.bounds.kind {
            BoundKind::Free | BoundKind::LowerUpper => {
                writeln!(f, " - ~r_{} = 0", slack_counter)?;
                slack_counter += 1;
            }
            BoundKind::Lower => writeln!(f, " >= {}", Bounds::min_bound(row.bounds.min))?,
            BoundKind::Upper => writeln!(f, " <= {}", Bounds::max_bound(row.bounds.max))?,
            BoundKind::Exact => writeln!(f, " = {}", row.bounds.min)?,
        }
    }
    writeln!(f)
}

fn write_bounds_lp_file_block(prob: &Problem, hspace: &str, f: &mut Formatter) -> fmt::Result {
    writeln!(f, "{}Bounds", hspace)?;
    let slack_rows = prob
        .rows()
        .iter()
        .filter(|row| matches!(row.bounds.kind, BoundKind::Free | BoundKind::LowerUpper));
    for (idx, row) in slack_rows.enumerate() {
        let slack = format!("~r_{}", idx + 1);
        writeln!(f, "{} {}", hspace, row.bounds.to_lower_upper_string(&slack))?;
    }
    for column in prob.columns() {
        writeln!(
            f,
            "{} {}",
            hspace,
            column.bounds.to_lower_upper_string(&column.name)
        )?;
    }
    writeln!(f)
}

fn write_integers_lp_file_block(prob: &Problem, hspace: &str, f: &mut Formatter) -> fmt::Result {
    writeln!(f, "{}Generals", hspace)?;
    for column in prob.columns() {
        writeln!(f, "{} {}", hspace, column.name)?;
    }
    writeln!(f)?;
    let mut binaries = prob
        .columns()
        .iter()
        .filter(|c| c.value_kind == ValueKind::Binary)
        .peekable();
    if binaries.peek().is_some() {
        writeln!(f, "{}Binaries", hspace)?;
        for column in binaries {
            writeln!(f, "{} {}", hspace, column.name)?;
        }
        writeln!(f)?;
    }
    Ok(())
}
