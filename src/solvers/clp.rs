//! The COIN-OR linear programming solver, through its `clp` command
use std::ffi::OsString;
use std::io::BufRead;
use std::path::Path;

use crate::error::Result;
use crate::solution::Solution;
use crate::solvers::{
    command_from_env, SolverProgram, SolverType, SolverWithSolutionParsing, Status,
};
use crate::util::{parse_field, split_fields, truncated_report, COLUMN_NAME_PREFIX};

/// `clp` solver
#[derive(Debug, Clone)]
pub struct ClpSolver {
    name: String,
    command_name: String,
}

impl Default for ClpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClpSolver {
    /// Run the `clp` binary found on the PATH
    pub fn new() -> ClpSolver {
        ClpSolver {
            name: "Clp".to_string(),
            command_name: "clp".to_string(),
        }
    }

    /// Binary taken from the `CLP_BINARY` environment variable, if set
    pub fn from_env() -> ClpSolver {
        ClpSolver::new().command_name(command_from_env("CLP_BINARY", "clp"))
    }

    /// Use another binary
    pub fn command_name(&self, command_name: String) -> ClpSolver {
        ClpSolver {
            name: self.name.clone(),
            command_name,
        }
    }
}

const CLP: &str = "Clp";

impl SolverWithSolutionParsing for ClpSolver {
    /// Older releases write the status alone on the first line and the
    /// objective on a line of its own:
    ///
    /// ```text
    /// Optimal
    /// Objective value 6.00000000
    ///       0 x0                     2                       1
    /// ```
    ///
    /// newer ones write both on the first line:
    ///
    /// ```text
    /// Optimal - objective value 6.00000000
    ///       0 x0                     2                       1
    /// ```
    fn read_specific_solution<R: BufRead>(&self, reader: R) -> Result<Solution> {
        let mut solution = Solution::default();
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(header) => header?,
            None => return Err(truncated_report(CLP, 0, "no status line")),
        };
        let lower = header.to_lowercase();
        let (status, objective) = match lower.split_once('-') {
            Some((status, objective)) => (status.trim(), Some(objective)),
            None => (lower.trim(), None),
        };
        match status {
            "optimal" => solution.set_status(Status::Optimal),
            "infeasible" => {
                solution.set_status(Status::Infeasible);
                return Ok(solution);
            }
            _ => solution.set_status(Status::Unknown),
        }
        if let Some(objective) = objective.filter(|o| o.contains("objective value")) {
            let fields = split_fields(objective);
            solution.set_objective_value(parse_field(CLP, 1, &header, &fields, 2)?);
        }

        let mut line_number = 1;
        for line in lines {
            let line = line?;
            line_number += 1;
            let fields = split_fields(&line);
            if fields.is_empty() {
                continue;
            }
            if line.starts_with("Objective value") {
                solution.set_objective_value(parse_field(CLP, line_number, &line, &fields, 2)?);
            } else if fields.len() > 3 && fields[1].starts_with(COLUMN_NAME_PREFIX) {
                let value = parse_field(CLP, line_number, &line, &fields, 2)?;
                solution.set_column_value(fields[1], value);
            }
        }
        Ok(solution)
    }
}

impl SolverProgram for ClpSolver {
    fn solver_type(&self) -> SolverType {
        SolverType::Clp
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        vec![
            lp_file.into(),
            "solve".into(),
            "solution".into(),
            solution_file.into(),
        ]
    }
}
