//! Solvers linked into the process
//!
//! The return codes of the library are translated through explicit tables,
//! each entry logging what the code means. The library's own log output goes
//! to a file which is relayed line by line through the `log` facade.
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use log::{info, warn};
use tempfile::TempPath;

use crate::error::{Error, Result};
use crate::solvers::Status;

#[cfg(feature = "highs-solver")]
pub use self::highs::HighsSolver;

#[cfg(feature = "highs-solver")]
mod highs;

const HIGHS: &str = "Highs";

/// Translate the model status reported by HiGHS after a run
pub fn translate_model_status(code: i32) -> Result<Status> {
    let status = match code {
        0 => {
            info!("{}: model status not set", HIGHS);
            Status::Unknown
        }
        1 => {
            warn!("{}: the model could not be loaded", HIGHS);
            Status::InvalidProblemDefinition
        }
        2 => {
            warn!("{}: the model is invalid", HIGHS);
            Status::InvalidProblemDefinition
        }
        3 => {
            warn!("{}: presolve failed", HIGHS);
            Status::NoSolutionFound
        }
        4 => {
            warn!("{}: the solver failed", HIGHS);
            Status::NoSolutionFound
        }
        5 => {
            warn!("{}: postsolve failed", HIGHS);
            Status::NoSolutionFound
        }
        6 => {
            warn!("{}: the model is empty", HIGHS);
            Status::InvalidProblemDefinition
        }
        7 => {
            info!("{}: an optimal solution has been found", HIGHS);
            Status::Optimal
        }
        8 => {
            info!("{}: the model has no feasible solution", HIGHS);
            Status::Infeasible
        }
        9 => {
            warn!(
                "{}: the model is unbounded or infeasible, presolve cannot tell which",
                HIGHS
            );
            Status::NoSolutionFound
        }
        10 => {
            info!("{}: the objective is unbounded", HIGHS);
            Status::Unbounded
        }
        11 => {
            info!("{}: the objective has reached its bound", HIGHS);
            Status::SolutionFound
        }
        12 => {
            info!("{}: the objective has reached its target", HIGHS);
            Status::SolutionFound
        }
        13 => {
            warn!(
                "{}: the search was prematurely terminated by the time limit",
                HIGHS
            );
            Status::NoSolutionFound
        }
        14 => {
            warn!(
                "{}: the search was prematurely terminated by the iteration limit",
                HIGHS
            );
            Status::NoSolutionFound
        }
        15 => {
            warn!("{}: the model status is unknown", HIGHS);
            Status::Unknown
        }
        16 => {
            warn!(
                "{}: the search was prematurely terminated by the solution limit",
                HIGHS
            );
            Status::NoSolutionFound
        }
        17 => {
            warn!("{}: the search was interrupted", HIGHS);
            Status::NoSolutionFound
        }
        _ => {
            return Err(Error::UnknownReturnCode {
                solver: HIGHS.to_string(),
                code,
            })
        }
    };
    Ok(status)
}

/// Check the status returned by a HiGHS call
pub fn translate_run_status(code: i32) -> Result<()> {
    match code {
        0 => Ok(()),
        1 => {
            warn!("{}: call completed with a warning", HIGHS);
            Ok(())
        }
        -1 => Err(Error::SolverExecution {
            solver: HIGHS.to_string(),
            command: "Highs_run".to_string(),
            reason: "the library reported an error".to_string(),
        }),
        _ => Err(Error::UnknownReturnCode {
            solver: HIGHS.to_string(),
            code,
        }),
    }
}

/// Relays the lines an embedded solver appends to its log file through [log::info]
#[derive(Debug)]
pub struct LogRelay {
    solver: String,
    path: TempPath,
    offset: u64,
}

impl LogRelay {
    /// Relay for a fresh, empty temporary log file
    pub fn new(solver: &str) -> Result<LogRelay> {
        let path = tempfile::Builder::new()
            .prefix(&format!("{}-", solver))
            .suffix(".log")
            .tempfile()?
            .into_temp_path();
        Ok(LogRelay {
            solver: solver.to_string(),
            path,
            offset: 0,
        })
    }

    /// file the solver writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forward every complete line written since the previous call.
    /// Returns the number of forwarded lines.
    pub fn relay(&mut self) -> Result<usize> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut reader = BufReader::new(file);
        let mut count = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 || !line.ends_with('\n') {
                break;
            }
            self.offset += read as u64;
            let text = line.trim_end();
            if !text.is_empty() {
                info!("{}: {}", self.solver, text);
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use super::*;

    #[test]
    fn every_model_status_is_translated() {
        for code in 0..=17 {
            assert!(translate_model_status(code).is_ok(), "code {}", code);
        }
        assert_eq!(translate_model_status(7).unwrap(), Status::Optimal);
        assert_eq!(translate_model_status(8).unwrap(), Status::Infeasible);
        assert_eq!(translate_model_status(10).unwrap(), Status::Unbounded);
        assert_eq!(
            translate_model_status(2).unwrap(),
            Status::InvalidProblemDefinition
        );
        assert_eq!(translate_model_status(13).unwrap(), Status::NoSolutionFound);
        assert_eq!(translate_model_status(11).unwrap(), Status::SolutionFound);
        assert_eq!(translate_model_status(15).unwrap(), Status::Unknown);
    }

    #[test]
    fn unknown_codes_are_errors() {
        assert!(matches!(
            translate_model_status(18),
            Err(Error::UnknownReturnCode { code: 18, .. })
        ));
        assert!(matches!(
            translate_run_status(2),
            Err(Error::UnknownReturnCode { code: 2, .. })
        ));
    }

    #[test]
    fn run_status() {
        assert!(translate_run_status(0).is_ok());
        assert!(translate_run_status(1).is_ok());
        assert!(matches!(
            translate_run_status(-1),
            Err(Error::SolverExecution { .. })
        ));
    }

    #[test]
    fn relay_forwards_only_new_complete_lines() {
        let mut relay = LogRelay::new("test").unwrap();
        let mut log = OpenOptions::new().append(true).open(relay.path()).unwrap();

        write!(log, "Running HiGHS\n\nPresolving").unwrap();
        log.flush().unwrap();
        assert_eq!(relay.relay().unwrap(), 1);

        writeln!(log, " model").unwrap();
        writeln!(log, "Objective value 6").unwrap();
        log.flush().unwrap();
        assert_eq!(relay.relay().unwrap(), 2);
        assert_eq!(relay.relay().unwrap(), 0);
    }
}
