use std::fs;

use lp_bridge::lp_format::{BoundKind, Bounds, LpObjective};
use lp_bridge::problem::{Column, Problem, Row, ValueKind};
use lp_bridge::solvers::ProblemFormat;
use lp_bridge::Error;

fn single_column_problem() -> Problem {
    let mut pb = Problem::new("p", LpObjective::Minimize);
    pb.add_column(Column::new("x0", Bounds::lower_upper(0., 10.), 1.), true)
        .unwrap();
    pb.add_row(Row::new("r0", Bounds::lower(2.)).with_entry("x0", 1.))
        .unwrap();
    pb
}

#[test]
fn simple_problem() {
    let expected_str = "\\* Problem: p *\\
Minimize
 obj: + x0

Subject To
 r0: + x0 >= 2

Bounds
 0 <= x0 <= 10

Generals
 x0

End
";
    assert_eq!(
        single_column_problem().to_lp_string(0).unwrap(),
        expected_str
    );
}

#[test]
fn mixed_problem() {
    let mut pb = Problem::new("mix", LpObjective::Maximize);
    pb.add_column(Column::new("x0", Bounds::lower_upper(0., 10.), 3.), true)
        .unwrap();
    pb.add_column(
        Column::new("x1", Bounds::free(), -1.).with_value_kind(ValueKind::Continuous),
        true,
    )
    .unwrap();
    pb.add_column(
        Column::new("x2", Bounds::lower_upper(0., 1.), 1.).with_value_kind(ValueKind::Binary),
        true,
    )
    .unwrap();
    pb.add_row(
        Row::new("r0", Bounds::lower_upper(1., 4.))
            .with_entry("x0", 1.)
            .with_entry("x1", -2.),
    )
    .unwrap();
    pb.add_row(
        Row::new("r1", Bounds::upper(8.))
            .with_entry("x0", 2.)
            .with_entry("x2", 1.),
    )
    .unwrap();
    pb.add_row(Row::new("r2", Bounds::exact(3.)).with_entry("x1", 1.))
        .unwrap();

    let expected_str = "\\* Problem: mix *\\
Maximize
 obj: + 3 x0 - x1 + x2

Subject To
 r0: + x0 - 2 x1 - ~r_1 = 0
 r1: + 2 x0 + x2 <= 8
 r2: + x1 = 3

Bounds
 1 <= ~r_1 <= 4
 0 <= x0 <= 10
 - inf <= x1 <= + inf
 0 <= x2 <= 1

Generals
 x0
 x1
 x2

Binaries
 x2

End
";
    assert_eq!(pb.to_lp_string(0).unwrap(), expected_str);
}

#[test]
fn free_rows_get_a_slack_each() {
    let mut pb = Problem::new("slack", LpObjective::Minimize);
    pb.add_column(Column::new("x0", Bounds::lower(0.), 1.), true)
        .unwrap();
    pb.add_row(Row::new("a", Bounds::free()).with_entry("x0", 1.))
        .unwrap();
    pb.add_row(Row::new("b", Bounds::lower_upper(-5., 5.)).with_entry("x0", 1.))
        .unwrap();
    let lp = pb.to_lp_string(0).unwrap();
    assert!(lp.contains(" a: + x0 - ~r_1 = 0\n"));
    assert!(lp.contains(" b: + x0 - ~r_2 = 0\n"));
    assert!(lp.contains(" - inf <= ~r_1 <= + inf\n"));
    assert!(lp.contains(" -5 <= ~r_2 <= 5\n"));
    assert!(lp.contains(" 0 <= x0 <= + inf\n"));
}

#[test]
fn zero_coefficients_are_skipped() {
    let mut pb = Problem::new("zeros", LpObjective::Minimize);
    pb.add_column(Column::new("x0", Bounds::lower(0.), 0.), true)
        .unwrap();
    pb.add_column(Column::new("x1", Bounds::lower(0.), 1.), true)
        .unwrap();
    pb.add_row(
        Row::new("r0", Bounds::upper(3.))
            .with_entry("x0", 0.)
            .with_entry("x1", 1.),
    )
    .unwrap();
    let lp = pb.to_lp_string(0).unwrap();
    assert!(lp.contains(" obj: + x1\n"));
    assert!(lp.contains(" r0: + x1 <= 3\n"));
}

#[test]
fn long_expressions_are_wrapped() {
    let mut pb = Problem::new("wide", LpObjective::Minimize);
    for i in 0..12 {
        pb.add_column(Column::new(format!("x{}", i), Bounds::lower(0.), 1.), true)
            .unwrap();
    }
    let lp = pb.to_lp_string(0).unwrap();
    assert!(lp.contains(
        " obj: + x0 + x1 + x2 + x3 + x4 + x5 + x6 + x7 + x8 + x9 + x10\n + x11\n"
    ));
}

#[test]
fn indentation() {
    let lp = single_column_problem().to_lp_string(2).unwrap();
    assert!(lp.starts_with("\\* Problem: p *\\\n  Minimize\n   obj: + x0\n"));
    assert!(lp.contains("  Subject To\n   r0: + x0 >= 2\n"));
    assert!(lp.ends_with("End\n"));
}

#[test]
fn numbers_are_truncated() {
    assert_eq!(Bounds::min_bound(-3.7), "-3");
    assert_eq!(Bounds::max_bound(16.5), "16");
    assert_eq!(Bounds::min_bound(-3e9), "- inf");
    assert_eq!(Bounds::max_bound(3e9), "+ inf");
    assert_eq!(Bounds::max_bound(f64::from(i32::MAX)), i32::MAX.to_string());

    let mut pb = Problem::new("frac", LpObjective::Minimize);
    pb.add_column(Column::new("x0", Bounds::lower_upper(0.5, 9.9), 2.5), true)
        .unwrap();
    let lp = pb.to_lp_string(0).unwrap();
    assert!(lp.contains(" obj: + 2 x0\n"));
    assert!(lp.contains(" 0 <= x0 <= 9\n"));
}

#[test]
fn invalid_exact_row_bounds() {
    let mut pb = single_column_problem();
    pb.set_row_bounds_exact("r0", f64::INFINITY).unwrap();
    assert!(matches!(
        pb.to_lp_string(0),
        Err(Error::InvalidBounds { .. })
    ));

    pb.row_by_name_mut("r0").unwrap().bounds = Bounds::new(1., 2., BoundKind::Exact);
    assert!(matches!(
        pb.to_lp_string(0),
        Err(Error::InvalidBounds { .. })
    ));

    pb.set_row_bounds("r0", 1., 2.).unwrap();
    assert!(pb.to_lp_string(0).is_ok());
}

#[test]
fn invalid_exact_column_bounds() {
    let mut pb = single_column_problem();
    pb.set_column_bounds_exact("x0", f64::INFINITY).unwrap();
    match pb.to_lp_string(0) {
        Err(Error::InvalidBounds { name, .. }) => assert_eq!(name, "x0"),
        other => panic!("expected invalid bounds, got {:?}", other),
    }

    pb.set_column_bounds_exact("x0", 3.).unwrap();
    assert!(pb.to_lp_string(0).unwrap().contains(" 3 <= x0 <= 3\n"));
}

#[test]
fn serialization_is_idempotent() {
    let pb = single_column_problem();
    assert_eq!(pb.to_lp_string(1).unwrap(), pb.to_lp_string(1).unwrap());
}

#[test]
fn duplicate_rows_are_rejected() {
    let mut pb = single_column_problem();
    let err = pb.add_row(Row::new("r0", Bounds::upper(1.))).unwrap_err();
    assert!(matches!(err, Error::DuplicateName { kind: "row", .. }));
    assert_eq!(pb.rows().len(), 1);
}

#[test]
fn duplicate_columns_depend_on_strictness() {
    let mut pb = single_column_problem();
    let column = Column::new("x0", Bounds::lower(0.), 1.);
    assert!(matches!(
        pb.add_column(column.clone(), true),
        Err(Error::DuplicateName { kind: "column", .. })
    ));
    pb.add_column(column, false).unwrap();
    assert_eq!(pb.columns().len(), 2);
}

#[test]
fn lookups() {
    let pb = single_column_problem();
    assert_eq!(pb.row_by_name("r0").unwrap().name, "r0");
    assert_eq!(pb.row_by_idx(1, -1).unwrap().name, "r0");
    assert!(matches!(pb.row_by_idx(0, -1), Err(Error::NotFound { .. })));
    assert!(matches!(pb.row_by_name("r1"), Err(Error::NotFound { .. })));
    assert_eq!(pb.column_by_idx(0, 0).unwrap().name, "x0");
    assert!(pb.column_by_name("x1").is_err());
}

#[test]
fn bounds_setters_infer_the_kind() {
    let mut pb = single_column_problem();
    pb.set_column_bounds("x0", f64::NEG_INFINITY, 4.).unwrap();
    assert_eq!(pb.column_by_name("x0").unwrap().bounds.kind, BoundKind::Upper);
    pb.set_column_bounds_exact("x0", 2.).unwrap();
    assert_eq!(pb.column_by_name("x0").unwrap().bounds, Bounds::exact(2.));
    assert!(pb.set_column_bounds("y", 0., 1.).is_err());
}

#[test]
fn problem_is_written_to_a_temporary_file() {
    let pb = single_column_problem();
    let file = pb.save_problem_to_tempfile(ProblemFormat::Cplex).unwrap();
    let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("p-"));
    assert!(name.ends_with(".lp"));
    assert_eq!(
        fs::read_to_string(file.path()).unwrap(),
        pb.to_lp_string(0).unwrap()
    );

    assert!(matches!(
        pb.save_problem_to_tempfile(ProblemFormat::Mps),
        Err(Error::UnsupportedFormat { .. })
    ));
}

#[test]
fn problem_names_are_not_paths() {
    let pb = Problem::new("plans/2024", LpObjective::Minimize);
    let file = pb.save_problem_to_tempfile(ProblemFormat::Cplex).unwrap();
    let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("plans_2024-"), "{}", name);
    assert!(fs::read_to_string(file.path())
        .unwrap()
        .starts_with("\\* Problem: plans/2024 *\\"));
}
