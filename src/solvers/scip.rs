//! The SCIP optimization suite, through its `scip` command
use std::ffi::OsString;
use std::io::BufRead;
use std::path::Path;

use crate::error::Result;
use crate::solution::Solution;
use crate::solvers::{
    command_from_env, SolverProgram, SolverType, SolverWithSolutionParsing, Status,
};
use crate::util::{parse_field, split_fields, truncated_report, COLUMN_NAME_PREFIX};

/// `scip` solver
#[derive(Debug, Clone)]
pub struct ScipSolver {
    name: String,
    command_name: String,
}

impl Default for ScipSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScipSolver {
    /// Run the `scip` binary found on the PATH
    pub fn new() -> ScipSolver {
        ScipSolver {
            name: "Scip".to_string(),
            command_name: "scip".to_string(),
        }
    }

    /// Binary taken from the `SCIP_BINARY` environment variable, if set
    pub fn from_env() -> ScipSolver {
        ScipSolver::new().command_name(command_from_env("SCIP_BINARY", "scip"))
    }

    /// Use another binary
    pub fn command_name(&self, command_name: String) -> ScipSolver {
        ScipSolver {
            name: self.name.clone(),
            command_name,
        }
    }
}

const SCIP: &str = "Scip";

impl SolverWithSolutionParsing for ScipSolver {
    /// SCIP has no solution report of its own; the session log written with
    /// `-l` is parsed instead. It contains the status, the primal bound and
    /// the listing of the best solution between `objective value:` and
    /// `Statistics`.
    fn read_specific_solution<R: BufRead>(&self, reader: R) -> Result<Solution> {
        let mut solution = Solution::default();
        let mut seen_status = false;
        let mut parse_columns = false;
        let mut line_number = 0;
        for line in reader.lines() {
            let line = line?;
            line_number += 1;
            let trimmed = line.trim();

            if trimmed.starts_with("SCIP Status") {
                seen_status = true;
                if trimmed.contains("optimal") {
                    solution.set_status(Status::Optimal);
                } else if trimmed.contains("infeasible") {
                    solution.set_status(Status::Infeasible);
                    return Ok(solution);
                } else {
                    solution.set_status(Status::Unknown);
                }
                continue;
            }

            let fields = split_fields(trimmed);
            if fields.is_empty() {
                continue;
            }
            if trimmed.starts_with("Primal Bound") {
                solution.set_objective_value(parse_field(SCIP, line_number, &line, &fields, 3)?);
                continue;
            }
            if trimmed.starts_with("objective value") {
                parse_columns = true;
                continue;
            }
            if trimmed.starts_with("Statistics") {
                parse_columns = false;
                continue;
            }
            if parse_columns && fields[0].starts_with(COLUMN_NAME_PREFIX) {
                let value = parse_field(SCIP, line_number, &line, &fields, 1)?;
                solution.set_column_value(fields[0], value);
            }
        }
        if !seen_status {
            return Err(truncated_report(SCIP, line_number, "no 'SCIP Status' line"));
        }
        Ok(solution)
    }
}

impl SolverProgram for ScipSolver {
    fn solver_type(&self) -> SolverType {
        SolverType::Scip
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        vec!["-f".into(), lp_file.into(), "-l".into(), solution_file.into()]
    }

    fn solution_suffix(&self) -> &str {
        "-solution.log"
    }
}
