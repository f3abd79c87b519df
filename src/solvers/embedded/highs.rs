//! The HiGHS library, called through its C interface
#![allow(unsafe_code)]

use std::ffi::{c_char, c_void, CStr, CString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempPath;

use crate::error::{Error, Result};
use crate::solution::Solution;
use crate::solvers::embedded::{translate_model_status, translate_run_status, LogRelay};
use crate::solvers::{copy_file, LpSolver, ProblemFormat, SolutionType, SolverType, Status};
use crate::util::variable_name_by_column_idx;

/// Length of the name buffers filled by HiGHS
const MAXIMUM_STRING_LENGTH: usize = 512;

/// HiGHS instance owning one model
pub struct HighsSolver {
    highs: *mut c_void,
    log: LogRelay,
    problem_file: Option<PathBuf>,
    problem_format: Option<ProblemFormat>,
    solution_file: Option<TempPath>,
    solution: Solution,
}

impl HighsSolver {
    /// Create an instance whose console output is redirected to the log relay
    pub fn new() -> Result<HighsSolver> {
        // SAFETY: Highs_create has no preconditions
        let highs = unsafe { highs_sys::Highs_create() };
        if highs.is_null() {
            return Err(Error::SolverExecution {
                solver: "Highs".to_string(),
                command: "Highs_create".to_string(),
                reason: "no instance returned".to_string(),
            });
        }
        let mut solver = HighsSolver {
            highs,
            log: LogRelay::new("Highs")?,
            problem_file: None,
            problem_format: None,
            solution_file: None,
            solution: Solution::default(),
        };
        solver.set_bool_option("log_to_console", false)?;
        let log_file = c_path(solver.log.path())?;
        let option = c_string("log_file")?;
        // SAFETY: the instance is live and both strings are nul terminated
        let code = unsafe {
            highs_sys::Highs_setStringOptionValue(solver.highs, option.as_ptr(), log_file.as_ptr())
        };
        solver.check(code as i32)?;
        Ok(solver)
    }

    /// Version of the linked library
    pub fn version() -> Option<String> {
        // SAFETY: Highs_version returns a static string or null
        unsafe {
            let ptr = highs_sys::Highs_version();
            if ptr.is_null() {
                None
            } else {
                CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
            }
        }
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<()> {
        let option = c_string(name)?;
        // SAFETY: the instance is live and the option name is nul terminated
        let code = unsafe {
            highs_sys::Highs_setBoolOptionValue(self.highs, option.as_ptr(), value.into())
        };
        self.check(code as i32)
    }

    /// Relay the library log, then translate a call status
    fn check(&mut self, code: i32) -> Result<()> {
        self.log.relay()?;
        translate_run_status(code)
    }

    fn column_name(&self, idx: usize) -> String {
        let mut buffer = vec![0 as c_char; MAXIMUM_STRING_LENGTH];
        // SAFETY: the buffer holds the maximum name length HiGHS writes
        let code = unsafe {
            highs_sys::Highs_getColName(self.highs, idx as highs_sys::HighsInt, buffer.as_mut_ptr())
        };
        if code as i32 != 0 {
            return variable_name_by_column_idx(idx as u32);
        }
        // SAFETY: HiGHS wrote a nul terminated string into the buffer
        let name = unsafe { CStr::from_ptr(buffer.as_ptr()) };
        name.to_string_lossy().into_owned()
    }

    fn extract_solution(&self, status: Status) -> Solution {
        let mut solution = Solution::default();
        solution.set_status(status);
        // SAFETY: the instance is live; the value buffers are sized from the model
        unsafe {
            let columns = highs_sys::Highs_getNumCol(self.highs).max(0) as usize;
            let rows = highs_sys::Highs_getNumRow(self.highs).max(0) as usize;
            solution.set_column_count(columns);
            solution.set_row_count(rows);
            solution.set_nonzero_count(highs_sys::Highs_getNumNz(self.highs).max(0) as usize);
            solution.set_objective_value(highs_sys::Highs_getObjectiveValue(self.highs));

            let mut col_value = vec![0.0; columns];
            let mut col_dual = vec![0.0; columns];
            let mut row_value = vec![0.0; rows];
            let mut row_dual = vec![0.0; rows];
            highs_sys::Highs_getSolution(
                self.highs,
                col_value.as_mut_ptr(),
                col_dual.as_mut_ptr(),
                row_value.as_mut_ptr(),
                row_dual.as_mut_ptr(),
            );
            for (idx, value) in col_value.into_iter().enumerate() {
                solution.set_column_value(self.column_name(idx), value);
            }
        }
        solution
    }

    fn write_report(&mut self) -> Result<()> {
        let path = tempfile::Builder::new()
            .prefix("Highs-")
            .suffix("-solution.txt")
            .tempfile()?
            .into_temp_path();
        fs::write(&path, self.solution.to_string())?;
        self.solution_file = Some(path);
        Ok(())
    }
}

impl Drop for HighsSolver {
    fn drop(&mut self) {
        // SAFETY: the instance was created by Highs_create and is destroyed once
        unsafe { highs_sys::Highs_destroy(self.highs) };
    }
}

fn c_string(s: &str) -> Result<CString> {
    CString::new(s).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e).into())
}

fn c_path(path: &Path) -> Result<CString> {
    c_string(&path.to_string_lossy())
}

fn check_model_format(format: ProblemFormat) -> Result<()> {
    match format {
        ProblemFormat::Cplex | ProblemFormat::Mps => Ok(()),
        ProblemFormat::Glpk => Err(Error::unsupported_format("Highs", format)),
    }
}

impl LpSolver for HighsSolver {
    fn solver_type(&self) -> SolverType {
        SolverType::Highs
    }

    fn name(&self) -> &str {
        "Highs"
    }

    /// HiGHS selects the reader from the file extension: `.lp` or `.mps`
    fn do_load_problem(&mut self, filename: &Path, format: ProblemFormat) -> Result<()> {
        check_model_format(format)?;
        let path = c_path(filename)?;
        // SAFETY: the instance is live and the path is nul terminated
        let code = unsafe { highs_sys::Highs_readModel(self.highs, path.as_ptr()) };
        self.check(code as i32)?;
        debug!("Highs: loaded '{}' ({})", filename.display(), format);
        self.problem_file = Some(filename.to_path_buf());
        self.problem_format = Some(format);
        Ok(())
    }

    fn save_problem(&self, filename: &Path, format: ProblemFormat) -> Result<()> {
        check_model_format(format)?;
        if self.problem_file.is_none() {
            return Err(Error::NoProblemLoaded(self.name().to_string()));
        }
        let path = c_path(filename)?;
        // SAFETY: the instance is live and the path is nul terminated
        let code = unsafe { highs_sys::Highs_writeModel(self.highs, path.as_ptr()) };
        translate_run_status(code as i32)
    }

    fn load_solution(&mut self, filename: &Path, format: SolutionType) -> Result<()> {
        if format != SolutionType::Basic {
            return Err(Error::unsupported_format(self.name(), format));
        }
        let f = fs::File::open(filename)?;
        self.solution = Solution::read_report(io::BufReader::new(f))?;
        let path = tempfile::Builder::new()
            .prefix("Highs-")
            .suffix("-solution.txt")
            .tempfile()?
            .into_temp_path();
        copy_file(filename, &path)?;
        self.solution_file = Some(path);
        Ok(())
    }

    fn save_solution(&self, filename: &Path, format: SolutionType) -> Result<()> {
        if format != SolutionType::Basic {
            return Err(Error::unsupported_format(self.name(), format));
        }
        match &self.solution_file {
            Some(path) => copy_file(path, filename),
            None => Err(Error::NotFound {
                kind: "solution file",
                name: self.name().to_string(),
            }),
        }
    }

    fn solve(&mut self) -> Result<Status> {
        if self.problem_file.is_none() {
            return Err(Error::NoProblemLoaded(self.name().to_string()));
        }
        // SAFETY: the instance is live
        let code = unsafe { highs_sys::Highs_run(self.highs) };
        self.check(code as i32)?;
        // SAFETY: the instance is live
        let model_status = unsafe { highs_sys::Highs_getModelStatus(self.highs) };
        let status = translate_model_status(model_status as i32)?;
        self.solution = self.extract_solution(status);
        self.write_report()?;
        info!(
            "Highs: status {}, objective {}",
            status,
            self.solution.objective_value()
        );
        Ok(status)
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
