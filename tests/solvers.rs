use std::ffi::OsString;
use std::path::{Path, PathBuf};

use lp_bridge::solution::Solution;
use lp_bridge::solvers::{
    CbcSolver, ClpSolver, GlpkSolver, ScipSolver, SolverProgram, SolverWithSolutionParsing,
    Status, WithMaxSeconds, WithNbThreads,
};
use lp_bridge::Error;

fn solution_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("solution_files")
        .join(name)
}

fn read<S: SolverWithSolutionParsing>(solver: &S, name: &str) -> Solution {
    solver.read_solution(&solution_file(name)).unwrap()
}

fn assert_parse_error<S: SolverWithSolutionParsing>(solver: &S, name: &str) {
    match solver.read_solution(&solution_file(name)) {
        Err(Error::Parse { .. }) => {}
        other => panic!("{}: expected a parse error, got {:?}", name, other),
    }
}

#[test]
fn glpk_optimal() {
    let solution = read(&GlpkSolver::new(), "glpk_optimal.sol");
    assert_eq!(solution.status(), Status::Optimal);
    assert_eq!(solution.objective_value(), 6.);
    assert_eq!(solution.row_count(), 2);
    assert_eq!(solution.column_count(), 2);
    assert_eq!(solution.nonzero_count(), 4);
    assert_eq!(solution.column_value("x0"), 2.);
    assert_eq!(solution.column_value("x1"), 4.);
    assert_eq!(solution.column_values().len(), 2);
}

#[test]
// only basic integer columns, marked with '*', carry a value
fn glpk_simplex_report() {
    let solution = read(&GlpkSolver::new(), "glpk_simplex.sol");
    assert_eq!(solution.status(), Status::Optimal);
    assert_eq!(solution.objective_value(), 2.);
    assert!(solution.column_values().is_empty());
    assert_eq!(solution.column_value("x0"), 0.);
}

#[test]
fn glpk_infeasible() {
    let solution = read(&GlpkSolver::new(), "glpk_infeasible.sol");
    assert_eq!(solution.status(), Status::Infeasible);
}

#[test]
fn glpk_unbounded() {
    let solution = read(&GlpkSolver::new(), "glpk_unbounded.sol");
    assert_eq!(solution.status(), Status::Unbounded);
    assert_eq!(solution.objective_value(), 5.);
}

#[test]
fn glpk_broken_reports() {
    assert_parse_error(&GlpkSolver::new(), "glpk_truncated.sol");
    assert_parse_error(&GlpkSolver::new(), "glpk_corrupted.sol");
}

#[test]
fn cbc_optimal() {
    let solution = read(&CbcSolver::new(), "cbc_optimal.sol");
    assert_eq!(solution.status(), Status::Optimal);
    assert_eq!(solution.objective_value(), 6.);
    assert_eq!(solution.column_value("x0"), 2.);
    assert_eq!(solution.column_value("x1"), 4.);
    // cbc lists only non-zero columns
    assert_eq!(solution.column_value("x2"), 0.);
}

#[test]
fn cbc_infeasible() {
    let solution = read(&CbcSolver::new(), "cbc_infeasible.sol");
    assert_eq!(solution.status(), Status::Infeasible);
    assert_eq!(solution.objective_value(), 0.);
}

#[test]
fn cbc_integer_infeasible() {
    let solution = read(&CbcSolver::new(), "cbc_integer_infeasible.sol");
    assert_eq!(solution.status(), Status::Infeasible);
    assert_eq!(solution.objective_value(), 3.);
    assert_eq!(solution.column_value("x0"), 3.);
    assert_eq!(solution.column_value("x1"), -1.);
}

#[test]
fn cbc_unbounded() {
    let solution = read(&CbcSolver::new(), "cbc_unbounded.sol");
    assert_eq!(solution.status(), Status::Unbounded);
}

#[test]
fn cbc_broken_reports() {
    assert_parse_error(&CbcSolver::new(), "cbc_corrupted.sol");
    assert_parse_error(&CbcSolver::new(), "cbc_empty.sol");
    assert_parse_error(&CbcSolver::new(), "cbc_no_objective.sol");
    assert_parse_error(&CbcSolver::new(), "cbc_garbled_header.sol");
}

#[test]
fn cbc_infeasible_without_objective() {
    let solution = CbcSolver::new()
        .read_specific_solution("Infeasible\n".as_bytes())
        .unwrap();
    assert_eq!(solution.status(), Status::Infeasible);
    assert_eq!(solution.objective_value(), 0.);
}

#[test]
fn clp_both_layouts() {
    for name in ["clp_v1.sol", "clp_v2.sol"] {
        let solution = read(&ClpSolver::new(), name);
        assert_eq!(solution.status(), Status::Optimal, "{}", name);
        assert_eq!(solution.objective_value(), 6., "{}", name);
        assert_eq!(solution.column_value("x0"), 2., "{}", name);
        assert_eq!(solution.column_value("x1"), 4., "{}", name);
        assert!(!solution.column_values().contains_key("r0"), "{}", name);
    }
}

#[test]
fn clp_infeasible_stops_parsing() {
    let solution = read(&ClpSolver::new(), "clp_infeasible.sol");
    assert_eq!(solution.status(), Status::Infeasible);
    assert!(solution.column_values().is_empty());
}

#[test]
fn clp_broken_reports() {
    assert_parse_error(&ClpSolver::new(), "clp_corrupted_objective.sol");
    assert_parse_error(&ClpSolver::new(), "clp_corrupted_column.sol");
}

#[test]
fn scip_optimal() {
    let solution = read(&ScipSolver::new(), "scip_optimal.log");
    assert_eq!(solution.status(), Status::Optimal);
    assert_eq!(solution.objective_value(), 6.);
    assert_eq!(solution.column_value("x0"), 2.);
    assert_eq!(solution.column_value("x1"), 4.);
    assert_eq!(solution.column_values().len(), 2);
}

#[test]
fn scip_infeasible() {
    let solution = read(&ScipSolver::new(), "scip_infeasible.log");
    assert_eq!(solution.status(), Status::Infeasible);
    assert!(solution.column_values().is_empty());
}

#[test]
fn scip_without_status() {
    assert_parse_error(&ScipSolver::new(), "scip_no_status.log");
}

#[test]
fn scip_broken_reports() {
    assert_parse_error(&ScipSolver::new(), "scip_corrupted_column.log");
    assert_parse_error(&ScipSolver::new(), "scip_corrupted_bound.log");
}

#[test]
fn reports_are_read_from_memory() {
    let report = "Optimal - objective value -1.50000000\n      0 x3    -1.5    1\n";
    let solution = CbcSolver::new()
        .read_specific_solution(report.as_bytes())
        .unwrap();
    assert_eq!(solution.objective_value(), -1.5);
    assert_eq!(solution.column_value("x3"), -1.5);
}

fn args<P: SolverProgram>(program: &P) -> Vec<OsString> {
    program.arguments(Path::new("p.lp"), Path::new("p.sol"))
}

fn os(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn command_lines() {
    assert_eq!(
        args(&GlpkSolver::new()),
        os(&["--lp", "p.lp", "-o", "p.sol"])
    );
    assert_eq!(
        args(&CbcSolver::new()),
        os(&["p.lp", "solve", "solution", "p.sol"])
    );
    assert_eq!(
        args(&ClpSolver::new()),
        os(&["p.lp", "solve", "solution", "p.sol"])
    );
    assert_eq!(
        args(&ScipSolver::new()),
        os(&["-f", "p.lp", "-l", "p.sol"])
    );
}

#[test]
fn native_limits() {
    let glpk = GlpkSolver::new().with_max_seconds(30);
    assert_eq!(glpk.max_seconds(), Some(30));
    assert_eq!(
        args(&glpk),
        os(&["--lp", "p.lp", "--tmlim", "30", "-o", "p.sol"])
    );

    let cbc = CbcSolver::new().with_max_seconds(10).with_nb_threads(4);
    assert_eq!(cbc.nb_threads(), Some(4));
    assert_eq!(
        args(&cbc),
        os(&["p.lp", "seconds", "10", "threads", "4", "solve", "solution", "p.sol"])
    );
}

#[test]
fn command_names() {
    assert_eq!(SolverProgram::command_name(&GlpkSolver::new()), "glpsol");
    let cbc = CbcSolver::new().command_name("/opt/coin/bin/cbc".to_string());
    assert_eq!(SolverProgram::command_name(&cbc), "/opt/coin/bin/cbc");
}
