#![cfg(feature = "highs-solver")]

use lp_bridge::cache::SolutionCache;
use lp_bridge::lp_format::{Bounds, LpObjective};
use lp_bridge::problem::{Column, Problem, Row};
use lp_bridge::solvers::embedded::HighsSolver;
use lp_bridge::solvers::{LpSolver, ProblemFormat, SolutionType, Status};
use lp_bridge::Error;

fn problem() -> Problem {
    let mut pb = Problem::new("p", LpObjective::Minimize);
    pb.add_column(Column::new("x0", Bounds::lower_upper(0., 10.), 1.), true)
        .unwrap();
    pb.add_row(Row::new("r0", Bounds::lower(2.)).with_entry("x0", 1.))
        .unwrap();
    pb
}

#[test]
fn solve_lp_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let file = problem().save_problem_to_tempfile(ProblemFormat::Cplex).unwrap();
    let mut cache = SolutionCache::new();

    let mut solver = HighsSolver::new().unwrap();
    let status = solver
        .run(file.path(), ProblemFormat::Cplex, Some(&mut cache))
        .unwrap();
    assert_eq!(status, Status::Optimal);
    assert_eq!(solver.objective_value(), 2.);
    assert_eq!(solver.variable_value_by_column_idx(0).unwrap(), 2.);
    assert_eq!(cache.len(), 1);

    let mut other = HighsSolver::new().unwrap();
    let status = other
        .run(file.path(), ProblemFormat::Cplex, Some(&mut cache))
        .unwrap();
    assert_eq!(status, Status::Optimal);
    assert_eq!(other.solution(), solver.solution());

    let saved = solver
        .save_solution_to_tempfile(SolutionType::Basic)
        .unwrap();
    other.load_solution(&saved, SolutionType::Basic).unwrap();
    assert_eq!(other.variable_value("x0").unwrap(), 2.);
}

#[test]
fn glpk_format_is_rejected() {
    let file = problem().save_problem_to_tempfile(ProblemFormat::Cplex).unwrap();
    let mut solver = HighsSolver::new().unwrap();
    assert!(matches!(
        solver.do_load_problem(file.path(), ProblemFormat::Glpk),
        Err(Error::UnsupportedFormat { .. })
    ));
}

#[test]
fn only_basic_solutions_are_exchanged() {
    let file = problem().save_problem_to_tempfile(ProblemFormat::Cplex).unwrap();
    let mut solver = HighsSolver::new().unwrap();
    solver.run(file.path(), ProblemFormat::Cplex, None).unwrap();
    let saved = solver
        .save_solution_to_tempfile(SolutionType::Basic)
        .unwrap();

    for kind in [SolutionType::InteriorPoint, SolutionType::MixedInteger] {
        assert!(matches!(
            solver.save_solution(&saved, kind),
            Err(Error::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            solver.load_solution(&saved, kind),
            Err(Error::UnsupportedFormat { .. })
        ));
    }
}

#[test]
fn paths_with_nul_bytes_are_rejected() {
    let mut solver = HighsSolver::new().unwrap();
    assert!(matches!(
        solver.do_load_problem(std::path::Path::new("p\0.lp"), ProblemFormat::Cplex),
        Err(Error::Io(_))
    ));
}
