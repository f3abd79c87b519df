//! The COIN-OR branch and cut solver, through its `cbc` command
use std::ffi::OsString;
use std::io::BufRead;
use std::path::Path;

use crate::error::Result;
use crate::solution::Solution;
use crate::solvers::{
    command_from_env, SolverProgram, SolverType, SolverWithSolutionParsing, Status,
    WithMaxSeconds, WithNbThreads,
};
use crate::util::{parse_field, split_fields, truncated_report};

/// `cbc` solver
#[derive(Debug, Clone)]
pub struct CbcSolver {
    name: String,
    command_name: String,
    threads: Option<u32>,
    seconds: Option<u32>,
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CbcSolver {
    /// Run the `cbc` binary found on the PATH
    pub fn new() -> CbcSolver {
        CbcSolver {
            name: "Cbc".to_string(),
            command_name: "cbc".to_string(),
            threads: None,
            seconds: None,
        }
    }

    /// Binary taken from the `CBC_BINARY` environment variable, if set
    pub fn from_env() -> CbcSolver {
        CbcSolver::new().command_name(command_from_env("CBC_BINARY", "cbc"))
    }

    /// Use another binary
    pub fn command_name(&self, command_name: String) -> CbcSolver {
        CbcSolver {
            command_name,
            ..self.clone()
        }
    }
}

const CBC: &str = "Cbc";

impl SolverWithSolutionParsing for CbcSolver {
    /// Reads the report written by `cbc ... solve solution <file>`:
    ///
    /// ```text
    /// Optimal - objective value 6.00000000
    ///       0 x0                     2                       1
    ///       1 x1                     4                       1
    /// ```
    ///
    /// Only non-zero columns are listed.
    fn read_specific_solution<R: BufRead>(&self, reader: R) -> Result<Solution> {
        let mut solution = Solution::default();
        let mut parse_header = true;
        let mut line_number = 0;
        for line in reader.lines() {
            let line = line?;
            line_number += 1;
            let mut fields = split_fields(&line);
            if fields.is_empty() {
                continue;
            }

            if parse_header {
                let status = cbc_status(&fields);
                solution.set_status(status);
                let lower = line.to_lowercase();
                let lower_fields = split_fields(&lower);
                match lower_fields
                    .windows(2)
                    .position(|w| w == ["objective", "value"])
                {
                    Some(idx) => solution.set_objective_value(parse_field(
                        CBC,
                        line_number,
                        &line,
                        &fields,
                        idx + 2,
                    )?),
                    // a plain "Infeasible" header carries no objective
                    None if status == Status::Infeasible => {}
                    None => {
                        return Err(truncated_report(
                            CBC,
                            line_number,
                            "no objective value in the status line",
                        ))
                    }
                }
                parse_header = false;
                continue;
            }

            // columns violating their bounds are marked with '**'
            if fields[0] == "**" {
                fields.remove(0);
            }
            if fields.len() >= 4 {
                let value = parse_field(CBC, line_number, &line, &fields, 2)?;
                solution.set_column_value(fields[1], value);
            }
        }
        if parse_header {
            return Err(truncated_report(CBC, line_number, "no status line"));
        }
        Ok(solution)
    }
}

fn cbc_status(fields: &[&str]) -> Status {
    let first = fields[0].to_lowercase();
    match first.as_str() {
        "optimal" => Status::Optimal,
        "infeasible" => Status::Infeasible,
        "integer" if fields.get(1).map(|s| s.to_lowercase()).as_deref() == Some("infeasible") => {
            Status::Infeasible
        }
        "unbounded" => Status::Unbounded,
        // "on time", "on iterations", "on difficulties" or "on ctrl-c"
        "stopped" => Status::SolutionFound,
        _ => Status::Unknown,
    }
}

impl WithMaxSeconds<CbcSolver> for CbcSolver {
    fn max_seconds(&self) -> Option<u32> {
        self.seconds
    }
    fn with_max_seconds(&self, seconds: u32) -> CbcSolver {
        CbcSolver {
            seconds: Some(seconds),
            ..(*self).clone()
        }
    }
}

impl WithNbThreads<CbcSolver> for CbcSolver {
    fn nb_threads(&self) -> Option<u32> {
        self.threads
    }
    fn with_nb_threads(&self, threads: u32) -> CbcSolver {
        CbcSolver {
            threads: Some(threads),
            ..(*self).clone()
        }
    }
}

impl SolverProgram for CbcSolver {
    fn solver_type(&self) -> SolverType {
        SolverType::Cbc
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        let mut args = vec![lp_file.as_os_str().to_owned()];
        for (name, value) in [
            ("seconds", self.max_seconds()),
            ("threads", self.nb_threads()),
        ]
        .iter()
        {
            if let Some(val) = value {
                args.push(name.into());
                args.push(val.to_string().into());
            }
        }
        args.extend_from_slice(&["solve".into(), "solution".into(), solution_file.into()]);
        args
    }
}
