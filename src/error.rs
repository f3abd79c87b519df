//! Errors raised while building problems, running solvers and reading their output
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::solvers::ProblemFormat;

/// Every failure this crate reports to its caller
#[derive(Error, Debug)]
pub enum Error {
    /// The requested backend is unknown or was not compiled in
    #[error("solver '{0}' is not supported by this build")]
    UnsupportedSolver(String),

    /// A problem file could not be hashed or handed to the backend
    #[error("failed to load problem from '{}': {source}", path.display())]
    ProblemLoad {
        /// problem file that was being loaded
        path: PathBuf,
        /// underlying cause
        #[source]
        source: Box<Error>,
    },

    /// The solver process could not be started or exited unsuccessfully
    #[error("{solver}: failed to run solver with cmd '{command}': {reason}")]
    SolverExecution {
        /// solver name
        solver: String,
        /// command line that was executed
        command: String,
        /// exit status or spawn error
        reason: String,
    },

    /// The solver process exceeded the configured wall-clock limit
    #[error("{solver}: cmd '{command}' did not finish within {timeout:?}")]
    SolverTimeout {
        /// solver name
        solver: String,
        /// command line that was executed
        command: String,
        /// configured limit
        timeout: Duration,
    },

    /// The backend cannot read or write the requested format
    #[error("{solver}: format '{format}' is not supported")]
    UnsupportedFormat {
        /// solver or component name
        solver: String,
        /// requested format
        format: String,
    },

    /// A problem was requested in another format than the one it was loaded with
    #[error("saving problem in format '{requested}' requested, but can only be saved as '{loaded}'")]
    FormatMismatch {
        /// format asked for
        requested: ProblemFormat,
        /// format of the loaded problem file
        loaded: ProblemFormat,
    },

    /// Solver output did not follow the expected grammar
    #[error("{solver}: failed to parse line {line_number} '{line}': {reason}")]
    Parse {
        /// solver whose report was parsed
        solver: String,
        /// 1-based line number, 0 when the whole report is affected
        line_number: usize,
        /// offending line
        line: String,
        /// what went wrong
        reason: String,
    },

    /// An embedded library returned a code missing from the translation table
    #[error("{solver}: unknown return code {code}")]
    UnknownReturnCode {
        /// solver name
        solver: String,
        /// raw return code
        code: i32,
    },

    /// A row or column name is already in use
    #[error("{kind} '{name}' has already been added")]
    DuplicateName {
        /// "row" or "column"
        kind: &'static str,
        /// duplicated name
        name: String,
    },

    /// A lookup by name or index failed
    #[error("no {kind} '{name}'")]
    NotFound {
        /// kind of the missing item
        kind: &'static str,
        /// name or index that was looked up
        name: String,
    },

    /// Bounds that cannot be rendered in the LP format
    #[error("invalid bounds for '{name}': {reason}")]
    InvalidBounds {
        /// row or column name
        name: String,
        /// why the bounds are invalid
        reason: String,
    },

    /// The backend does not provide this operation
    #[error("{solver}: '{operation}' is not implemented")]
    NotImplemented {
        /// solver name
        solver: String,
        /// operation name
        operation: &'static str,
    },

    /// An operation needed a loaded problem
    #[error("{0}: no problem has been loaded")]
    NoProblemLoaded(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn problem_load(path: impl Into<PathBuf>, source: Error) -> Error {
        Error::ProblemLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn parse(
        solver: &str,
        line_number: usize,
        line: &str,
        reason: impl Into<String>,
    ) -> Error {
        Error::Parse {
            solver: solver.to_string(),
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_format(solver: &str, format: impl ToString) -> Error {
        Error::UnsupportedFormat {
            solver: solver.to_string(),
            format: format.to_string(),
        }
    }
}
