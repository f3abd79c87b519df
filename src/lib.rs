#![deny(missing_docs)]
//! A library to write problems in the .lp file format,
//! solve them with external or embedded solvers,
//! and remember the solutions of problems already solved.
//!
//! ```no_run
//! use lp_bridge::cache::SolutionCache;
//! use lp_bridge::lp_format::{Bounds, LpObjective};
//! use lp_bridge::problem::{Column, Problem, Row};
//! use lp_bridge::solvers::{get_instance, ProblemFormat, SolverType};
//!
//! # fn main() -> lp_bridge::Result<()> {
//! let mut problem = Problem::new("p", LpObjective::Minimize);
//! problem.add_column(Column::new("x0", Bounds::lower_upper(0., 10.), 1.), true)?;
//! problem.add_row(Row::new("r0", Bounds::lower(2.)).with_entry("x0", 1.))?;
//! let file = problem.save_problem_to_tempfile(ProblemFormat::Cplex)?;
//!
//! let mut cache = SolutionCache::new();
//! let mut solver = get_instance(SolverType::Glpk)?;
//! let status = solver.run(file.path(), ProblemFormat::Cplex, Some(&mut cache))?;
//! println!("{}: x0 = {}", status, solver.variable_value_by_column_idx(0)?);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod lp_format;
pub mod problem;
pub mod solution;
pub mod solvers;
pub mod util;

pub use error::{Error, Result};
