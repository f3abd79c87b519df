//! This module provides the interface to the different solvers.
//!
//! The command-line solvers (`glpsol`, `cbc`, `clp` and `scip`) need to be
//! installed on your system. Each of them is described by a type implementing
//! [SolverProgram] and [SolverWithSolutionParsing], and driven by
//! [CommandlineSolver].
//!
//! The embedded [HiGHS](https://highs.dev) backend is available as the cargo
//! feature `highs-solver`; it links the solver library into the process:
//! ```toml
//! [dependencies.lp-bridge]
//! version = "0.1"
//! features = ["highs-solver"]
//! ```
//!
//! Use [get_instance] to obtain a backend by [SolverType].
use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info, warn};
use tempfile::TempPath;

use crate::cache::{ProblemDigest, SolutionCache};
use crate::error::{Error, Result};
use crate::solution::Solution;
use crate::util::variable_name_by_column_idx;

pub use self::cbc::*;
pub use self::clp::*;
pub use self::commandline::*;
pub use self::glpk::*;
pub use self::scip::*;

pub mod cbc;
pub mod clp;
pub mod commandline;
pub mod embedded;
pub mod glpk;
pub mod scip;

/// Outcome of a solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// no information, or the run has not happened yet
    #[default]
    Unknown,
    /// an optimal solution was found
    Optimal,
    /// the problem has no feasible solution
    Infeasible,
    /// the objective is unbounded
    Unbounded,
    /// the solver rejected the problem
    InvalidProblemDefinition,
    /// the solver terminated without a solution
    NoSolutionFound,
    /// the solver terminated successfully, optimality is not guaranteed
    SolutionFound,
}

impl Status {
    /// Every status, in declaration order
    pub const ALL: [Status; 7] = [
        Status::Unknown,
        Status::Optimal,
        Status::Infeasible,
        Status::Unbounded,
        Status::InvalidProblemDefinition,
        Status::NoSolutionFound,
        Status::SolutionFound,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "UNKNOWN",
            Status::Optimal => "OPTIMAL",
            Status::Infeasible => "INFEASIBLE",
            Status::Unbounded => "UNBOUNDED",
            Status::InvalidProblemDefinition => "INVALID_PROBLEM_DEFINITION",
            Status::NoSolutionFound => "NO_SOLUTION_FOUND",
            Status::SolutionFound => "SOLUTION_FOUND",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::NotFound {
                kind: "status",
                name: s.to_string(),
            })
    }
}

/// File format of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProblemFormat {
    /// CPLEX LP text format, written by [crate::problem::Problem]
    #[default]
    Cplex,
    /// GLPK native format
    Glpk,
    /// fixed MPS format
    Mps,
}

impl fmt::Display for ProblemFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProblemFormat::Cplex => "CPLEX",
            ProblemFormat::Glpk => "GLPK",
            ProblemFormat::Mps => "MPS",
        })
    }
}

/// Kind of solution stored in a solution file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolutionType {
    /// simplex (vertex) solution
    #[default]
    Basic,
    /// interior point solution
    InteriorPoint,
    /// mixed integer solution
    MixedInteger,
}

impl fmt::Display for SolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolutionType::Basic => "BASIC_SOLUTION",
            SolutionType::InteriorPoint => "IPT_SOLUTION",
            SolutionType::MixedInteger => "MIP_SOLUTION",
        })
    }
}

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverType {
    /// `glpsol` command-line solver
    Glpk,
    /// `cbc` command-line solver
    Cbc,
    /// `clp` command-line solver
    Clp,
    /// `scip` command-line solver
    Scip,
    /// HiGHS linked into the process, requires the `highs-solver` feature
    Highs,
}

impl SolverType {
    /// Every backend this crate knows about, compiled in or not
    pub const ALL: [SolverType; 5] = [
        SolverType::Glpk,
        SolverType::Cbc,
        SolverType::Clp,
        SolverType::Scip,
        SolverType::Highs,
    ];

    /// Whether the backend runs inside this process
    pub fn is_embedded(&self) -> bool {
        matches!(self, SolverType::Highs)
    }

    fn as_str(&self) -> &'static str {
        match self {
            SolverType::Glpk => "glpk",
            SolverType::Cbc => "cbc",
            SolverType::Clp => "clp",
            SolverType::Scip => "scip",
            SolverType::Highs => "highs",
        }
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a solver type (case-insensitive)
impl FromStr for SolverType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SolverType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedSolver(s.to_string()))
    }
}

/// Create a solver instance based on the specified type
pub fn get_instance(solver_type: SolverType) -> Result<Box<dyn LpSolver>> {
    debug!("creating solver instance for '{}'", solver_type);
    match solver_type {
        SolverType::Glpk => Ok(Box::new(CommandlineSolver::new(GlpkSolver::from_env()))),
        SolverType::Cbc => Ok(Box::new(CommandlineSolver::new(CbcSolver::from_env()))),
        SolverType::Clp => Ok(Box::new(CommandlineSolver::new(ClpSolver::from_env()))),
        SolverType::Scip => Ok(Box::new(CommandlineSolver::new(ScipSolver::from_env()))),
        #[cfg(feature = "highs-solver")]
        SolverType::Highs => Ok(Box::new(embedded::HighsSolver::new()?)),
        #[cfg(not(feature = "highs-solver"))]
        SolverType::Highs => Err(Error::UnsupportedSolver(format!(
            "{} (compile with the 'highs-solver' feature)",
            solver_type
        ))),
    }
}

/// Common interface of all solver backends
pub trait LpSolver {
    /// backend tag
    fn solver_type(&self) -> SolverType;

    /// solver name for logging
    fn name(&self) -> &str;

    /// Hand a problem file to the backend
    fn do_load_problem(&mut self, filename: &Path, format: ProblemFormat) -> Result<()>;

    /// Save the loaded problem to a file
    fn save_problem(&self, filename: &Path, format: ProblemFormat) -> Result<()>;

    /// Load a solution file of the given kind
    fn load_solution(&mut self, filename: &Path, format: SolutionType) -> Result<()>;

    /// Save the current solution to a file
    fn save_solution(&self, filename: &Path, format: SolutionType) -> Result<()>;

    /// Solve the loaded problem
    fn solve(&mut self) -> Result<Status>;

    /// Canonical form of the current solution
    fn solution(&self) -> &Solution;

    /// File of the loaded problem
    fn problem_file(&self) -> Option<&Path>;

    /// Format of the loaded problem
    fn problem_format(&self) -> Option<ProblemFormat>;

    /// File holding the current solution, if the backend keeps one
    fn solution_file(&self) -> Option<&Path>;

    /// Kind of solution produced by [LpSolver::solve]
    fn solution_type(&self) -> SolutionType {
        SolutionType::Basic
    }

    /// Objective value of the current solution
    fn objective_value(&self) -> f64 {
        self.solution().objective_value()
    }

    /// Value of a variable in the current solution
    fn variable_value(&self, _name: &str) -> Result<f64> {
        Err(Error::NotImplemented {
            solver: self.name().to_string(),
            operation: "variable_value",
        })
    }

    /// Value of the variable of column `idx`, resolved through its name `x<idx>`
    fn variable_value_by_column_idx(&self, idx: u32) -> Result<f64> {
        self.variable_value(&variable_name_by_column_idx(idx))
    }

    /// Load a problem file. Returns whether the cache already knows a solution for it.
    fn load_problem(
        &mut self,
        filename: &Path,
        format: ProblemFormat,
        cache: &SolutionCache,
    ) -> Result<bool> {
        let digest =
            ProblemDigest::of_file(filename).map_err(|e| Error::problem_load(filename, e))?;
        let known = cache.contains(&digest);
        self.do_load_problem(filename, format)
            .map_err(|e| Error::problem_load(filename, e))?;
        Ok(known)
    }

    /// Load the cached solution of a problem file, returning the status recorded with it
    fn load_known_solution(&mut self, filename: &Path, cache: &SolutionCache) -> Result<Status> {
        let digest = ProblemDigest::of_file(filename)?;
        let known = cache.get(&digest).ok_or_else(|| Error::NotFound {
            kind: "known solution",
            name: digest.to_string(),
        })?;
        self.load_solution(known.solution_file(), known.solution_type())?;
        Ok(known.status())
    }

    /// Copy the current solution to a uniquely named temporary file
    fn save_solution_to_tempfile(&self, format: SolutionType) -> Result<TempPath> {
        let path = tempfile::Builder::new()
            .prefix(&format!("{}-", self.name()))
            .suffix("-solution.lp")
            .tempfile()?
            .into_temp_path();
        self.save_solution(&path, format)?;
        Ok(path)
    }

    /// Record the current solution as the solution of `problem_file`
    fn register_solution(
        &self,
        cache: &mut SolutionCache,
        problem_file: &Path,
        status: Status,
    ) -> Result<()> {
        let format = self.solution_type();
        let solution_file = self.save_solution_to_tempfile(format)?;
        cache.register(problem_file, solution_file, status, format)
    }

    /// Solve a problem file. With a cache, a problem whose file content has been
    /// solved before is answered from the cache without running the backend,
    /// and new solutions are registered.
    fn run(
        &mut self,
        problem_file: &Path,
        format: ProblemFormat,
        cache: Option<&mut SolutionCache>,
    ) -> Result<Status> {
        let cache = match cache {
            Some(cache) => cache,
            None => {
                self.do_load_problem(problem_file, format)
                    .map_err(|e| Error::problem_load(problem_file, e))?;
                return self.solve();
            }
        };

        let mut status = Status::Unknown;
        if self.load_problem(problem_file, format, cache)? {
            match self.load_known_solution(problem_file, cache) {
                Ok(known) => status = known,
                Err(e) => warn!("{}: error loading known solution: {}", self.name(), e),
            }
        }
        if status != Status::Unknown {
            info!(
                "{}: reusing known solution for '{}': {}",
                self.name(),
                problem_file.display(),
                status
            );
            return Ok(status);
        }

        let status = self.solve()?;
        self.register_solution(cache, problem_file, status)?;
        Ok(status)
    }
}

/// Description of a command-line solver program
pub trait SolverProgram {
    /// backend tag
    fn solver_type(&self) -> SolverType;

    /// solver name for logging
    fn name(&self) -> &str;

    /// Name or path of the executable
    fn command_name(&self) -> &str;

    /// Arguments that make the solver read `lp_file` and write its report to `solution_file`
    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString>;

    /// Suffix of the temporary solution file
    fn solution_suffix(&self) -> &str {
        "-solution.lp"
    }
}

/// Parsing of the report a solver program writes
pub trait SolverWithSolutionParsing {
    /// Parse the report stored in a file
    fn read_solution(&self, solution_file: &Path) -> Result<Solution> {
        let f = File::open(solution_file)?;
        self.read_specific_solution(BufReader::new(f))
    }

    /// Parse a report in the solver's own format
    fn read_specific_solution<R: BufRead>(&self, reader: R) -> Result<Solution>;
}

/// Solvers accepting a time limit
pub trait WithMaxSeconds<T> {
    /// configured time limit
    fn max_seconds(&self) -> Option<u32>;
    /// a copy with the given time limit
    fn with_max_seconds(&self, seconds: u32) -> T;
}

/// Solvers accepting a number of threads
pub trait WithNbThreads<T> {
    /// configured number of threads
    fn nb_threads(&self) -> Option<u32>;
    /// a copy with the given number of threads
    fn with_nb_threads(&self, threads: u32) -> T;
}

/// Executable name taken from the environment variable `var`, `default` when unset
pub(crate) fn command_from_env(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(command) if !command.is_empty() => command,
        _ => default.to_string(),
    }
}

/// Copy a file, used to hand out problem and solution files.
/// Copying a file onto itself leaves it untouched.
pub(crate) fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let (Ok(from), Ok(to)) = (from.canonicalize(), to.canonicalize()) {
        if from == to {
            return Ok(());
        }
    }
    std::fs::copy(from, to)?;
    Ok(())
}
