//! The GNU Linear Programming Kit, through its `glpsol` command
use std::ffi::OsString;
use std::io::BufRead;
use std::path::Path;

use crate::error::Result;
use crate::solution::Solution;
use crate::solvers::{
    command_from_env, SolverProgram, SolverType, SolverWithSolutionParsing, Status,
    WithMaxSeconds,
};
use crate::util::{parse_field, split_fields, truncated_report};

/// `glpsol` solver
#[derive(Debug, Clone)]
pub struct GlpkSolver {
    name: String,
    command_name: String,
    seconds: Option<u32>,
}

impl Default for GlpkSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GlpkSolver {
    /// Run the `glpsol` binary found on the PATH
    pub fn new() -> GlpkSolver {
        GlpkSolver {
            name: "Glpk".to_string(),
            command_name: "glpsol".to_string(),
            seconds: None,
        }
    }

    /// Binary taken from the `GLPSOL_BINARY` environment variable, if set
    pub fn from_env() -> GlpkSolver {
        GlpkSolver::new().command_name(command_from_env("GLPSOL_BINARY", "glpsol"))
    }

    /// Use another binary
    pub fn command_name(&self, command_name: String) -> GlpkSolver {
        GlpkSolver {
            command_name,
            ..self.clone()
        }
    }
}

const GLPK: &str = "Glpk";

impl SolverWithSolutionParsing for GlpkSolver {
    /// Reads the `-o` report of `glpsol`:
    ///
    /// ```text
    /// Problem:
    /// Rows:       2
    /// Columns:    2 (2 integer, 0 binary)
    /// Non-zeros:  4
    /// Status:     INTEGER OPTIMAL
    /// Objective:  obj = 6 (MINimum)
    ///
    ///    No.   Row name        Activity     Lower bound   Upper bound
    /// ...
    ///    No. Column name       Activity     Lower bound   Upper bound
    ///      1 x0           *              2             0            10
    /// ```
    fn read_specific_solution<R: BufRead>(&self, reader: R) -> Result<Solution> {
        let mut solution = Solution::default();
        let mut parse_header = true;
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

            if parse_header {
                match keyword {
                    "Rows:" => {
                        solution.set_row_count(parse_field(GLPK, line_number, &line, &fields, 1)?)
                    }
                    "Columns:" => solution
                        .set_column_count(parse_field(GLPK, line_number, &line, &fields, 1)?),
                    "Non-zeros:" => solution
                        .set_nonzero_count(parse_field(GLPK, line_number, &line, &fields, 1)?),
                    "Status:" => solution.set_status(glpk_status(&fields[1..])),
                    "Objective:" => {
                        if fields.len() > 3 {
                            solution.set_objective_value(parse_field(
                                GLPK,
                                line_number,
                                &line,
                                &fields,
                                3,
                            )?);
                        }
                        parse_header = false;
                    }
                    _ => {}
                }
                continue;
            }

            match fields.get(1) {
                Some(&"Row") => parse_columns = false,
                Some(&"Column") => parse_columns = true,
                _ => {}
            }
            // basic integer variables are marked with '*' before their activity
            if parse_columns && fields.len() > 4 && fields[2] == "*" {
                let value = parse_field(GLPK, line_number, &line, &fields, 3)?;
                solution.set_column_value(fields[1], value);
            }
        }
        if parse_header {
            return Err(truncated_report(GLPK, line_number, "header incomplete"));
        }
        Ok(solution)
    }
}

fn glpk_status(tokens: &[&str]) -> Status {
    let tokens = match tokens.first() {
        Some(&"INTEGER") => &tokens[1..],
        _ => tokens,
    };
    match tokens.first() {
        Some(&"OPTIMAL") => Status::Optimal,
        Some(&"INFEASIBLE") | Some(&"EMPTY") => Status::Infeasible,
        Some(&"UNBOUNDED") => Status::Unbounded,
        _ => Status::Unknown,
    }
}

impl WithMaxSeconds<GlpkSolver> for GlpkSolver {
    fn max_seconds(&self) -> Option<u32> {
        self.seconds
    }
    fn with_max_seconds(&self, seconds: u32) -> GlpkSolver {
        GlpkSolver {
            seconds: Some(seconds),
            ..self.clone()
        }
    }
}

impl SolverProgram for GlpkSolver {
    fn solver_type(&self) -> SolverType {
        SolverType::Glpk
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--lp".into(), lp_file.into()];
        if let Some(seconds) = self.max_seconds() {
            args.push("--tmlim".into());
            args.push(seconds.to_string().into());
        }
        args.push("-o".into());
        args.push(solution_file.into());
        args
    }
}
