//! Adapter running a solver program as a subprocess
//!
//! The problem file is handed to the program unchanged; the program writes its
//! native report to a temporary file which is parsed into a [Solution].
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use tempfile::{NamedTempFile, TempPath};

use crate::error::{Error, Result};
use crate::solution::Solution;
use crate::solvers::{
    copy_file, LpSolver, ProblemFormat, SolutionType, SolverProgram, SolverType,
    SolverWithSolutionParsing, Status,
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lines of solver output repeated in a [Error::SolverExecution] message
const OUTPUT_TAIL_LINES: usize = 5;

/// A [LpSolver] driving the program `P`
pub struct CommandlineSolver<P> {
    program: P,
    timeout: Option<Duration>,
    problem_file: Option<PathBuf>,
    problem_format: Option<ProblemFormat>,
    solution_file: Option<TempPath>,
    solution: Solution,
}

impl<P: SolverProgram + SolverWithSolutionParsing> CommandlineSolver<P> {
    /// Adapter without timeout and without a loaded problem
    pub fn new(program: P) -> Self {
        CommandlineSolver {
            program,
            timeout: None,
            problem_file: None,
            problem_format: None,
            solution_file: None,
            solution: Solution::default(),
        }
    }

    /// Kill the solver process when it runs longer than `timeout`
    pub fn with_timeout(self, timeout: Duration) -> Self {
        CommandlineSolver {
            timeout: Some(timeout),
            ..self
        }
    }

    /// configured timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// the wrapped program
    pub fn program(&self) -> &P {
        &self.program
    }

    fn new_solution_file(&self) -> Result<TempPath> {
        Ok(tempfile::Builder::new()
            .prefix(&format!("{}-", self.program.name()))
            .suffix(self.program.solution_suffix())
            .tempfile()?
            .into_temp_path())
    }

    fn execute(&self, args: Vec<OsString>, command_line: &str) -> Result<()> {
        let log = tempfile::Builder::new()
            .prefix(&format!("{}-", self.program.name()))
            .suffix(".log")
            .tempfile()?;
        // both streams share one handle and its offset
        let stdout = log.reopen()?;
        let stderr = stdout.try_clone()?;
        let child = Command::new(self.program.command_name())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| self.execution_error(command_line, e.to_string()))?;
        let exit_status = self.wait(child, command_line)?;
        let output = solver_output(&log);
        for line in output.lines() {
            debug!("{}: {}", self.program.name(), line);
        }
        if !exit_status.success() {
            let tail: Vec<&str> = output.lines().rev().take(OUTPUT_TAIL_LINES).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(self.execution_error(
                command_line,
                format!("{}, output: {}", exit_status, tail.join(" | ")),
            ));
        }
        Ok(())
    }

    fn wait(&self, mut child: Child, command_line: &str) -> Result<ExitStatus> {
        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => return Ok(child.wait()?),
        };
        let start = Instant::now();
        loop {
            if let Some(exit_status) = child.try_wait()? {
                return Ok(exit_status);
            }
            if start.elapsed() >= timeout {
                info!(
                    "{}: killing solver after {:?}",
                    self.program.name(),
                    timeout
                );
                child.kill()?;
                child.wait()?;
                return Err(Error::SolverTimeout {
                    solver: self.program.name().to_string(),
                    command: command_line.to_string(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn execution_error(&self, command_line: &str, reason: String) -> Error {
        Error::SolverExecution {
            solver: self.program.name().to_string(),
            command: command_line.to_string(),
            reason,
        }
    }
}

fn solver_output(log: &NamedTempFile) -> String {
    match fs::read(log.path()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

fn command_line(command: &str, args: &[OsString]) -> String {
    let mut line = command.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

impl<P: SolverProgram + SolverWithSolutionParsing> LpSolver for CommandlineSolver<P> {
    fn solver_type(&self) -> SolverType {
        self.program.solver_type()
    }

    fn name(&self) -> &str {
        self.program.name()
    }

    fn do_load_problem(&mut self, filename: &Path, format: ProblemFormat) -> Result<()> {
        debug!(
            "{}: using problem file '{}' ({})",
            self.name(),
            filename.display(),
            format
        );
        self.problem_file = Some(filename.to_path_buf());
        self.problem_format = Some(format);
        Ok(())
    }

    fn save_problem(&self, filename: &Path, format: ProblemFormat) -> Result<()> {
        let (problem_file, loaded) = match (&self.problem_file, self.problem_format) {
            (Some(file), Some(loaded)) => (file, loaded),
            _ => return Err(Error::NoProblemLoaded(self.name().to_string())),
        };
        if format != loaded {
            return Err(Error::FormatMismatch {
                requested: format,
                loaded,
            });
        }
        copy_file(problem_file, filename)
    }

    fn load_solution(&mut self, filename: &Path, format: SolutionType) -> Result<()> {
        if format != SolutionType::Basic {
            return Err(Error::unsupported_format(self.name(), format));
        }
        let solution = self.program.read_solution(filename)?;
        let solution_file = self.new_solution_file()?;
        copy_file(filename, &solution_file)?;
        self.solution = solution;
        self.solution_file = Some(solution_file);
        Ok(())
    }

    fn save_solution(&self, filename: &Path, format: SolutionType) -> Result<()> {
        if format != SolutionType::Basic {
            return Err(Error::unsupported_format(self.name(), format));
        }
        match &self.solution_file {
            Some(solution_file) => copy_file(solution_file, filename),
            None => Err(Error::NotFound {
                kind: "solution file",
                name: self.name().to_string(),
            }),
        }
    }

    fn solve(&mut self) -> Result<Status> {
        let problem_file = self
            .problem_file
            .clone()
            .ok_or_else(|| Error::NoProblemLoaded(self.name().to_string()))?;
        let solution_file = self.new_solution_file()?;
        let args = self.program.arguments(&problem_file, &solution_file);
        let command_line = command_line(self.program.command_name(), &args);
        info!("{}: running '{}'", self.name(), command_line);

        self.execute(args, &command_line)?;

        self.solution = self.program.read_solution(&solution_file)?;
        self.solution_file = Some(solution_file);
        info!(
            "{}: status {}, objective {}",
            self.name(),
            self.solution.status(),
            self.solution.objective_value()
        );
        Ok(self.solution.status())
    }

    fn solution(&self) -> &Solution {
        &self.solution
    }

    fn problem_file(&self) -> Option<&Path> {
        self.problem_file.as_deref()
    }

    fn problem_format(&self) -> Option<ProblemFormat> {
        self.problem_format
    }

    fn solution_file(&self) -> Option<&Path> {
        self.solution_file.as_deref()
    }

    fn variable_value(&self, name: &str) -> Result<f64> {
        Ok(self.solution.column_value(name))
    }
}
