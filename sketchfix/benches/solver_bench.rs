//! Benchmarks for the sketch solver.
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sketchfix::{Constraint, Point, Solver};

/// The rectangle build-up scene: nine points chained together by fixings,
/// coincidences, lengths, a perpendicular and a parallel.
fn rectangle_solver() -> Solver {
    let mut solver = Solver::new();
    let p: Vec<_> = (0..9)
        .map(|i| solver.add_point(Point::new(i as f64, i as f64)).unwrap())
        .collect();

    let constraints = [
        Constraint::fix_y(p[0], 0.0).unwrap(),
        Constraint::fix_x(p[0], 0.0).unwrap(),
        Constraint::vertical(p[0], p[1]),
        Constraint::length(p[0], p[1], 10.0).unwrap(),
        Constraint::coincident_x(p[1], p[2]),
        Constraint::coincident_y(p[1], p[2]),
        Constraint::horizontal(p[2], p[3]),
        Constraint::length(p[2], p[3], 10.0).unwrap(),
        Constraint::fix_y(p[3], 10.0).unwrap(),
        Constraint::fix_x(p[3], 10.0).unwrap(),
        Constraint::coincident_y(p[3], p[4]),
        Constraint::coincident_x(p[3], p[4]),
        Constraint::perpendicular(p[2], p[3], p[4], p[5]),
        Constraint::coincident_x(p[5], p[6]),
        Constraint::coincident_y(p[5], p[6]),
        Constraint::horizontal(p[6], p[7]),
        Constraint::length(p[6], p[7], 10.0).unwrap(),
        Constraint::parallel(p[7], p[8], p[5], p[4]),
        Constraint::horizontal(p[8], p[0]),
    ];
    for constraint in constraints {
        solver.add_constraint(constraint).unwrap();
    }
    solver
}

fn solve_rectangle(c: &mut Criterion) {
    c.bench_function("solve_rectangle", |b| {
        b.iter(|| {
            let mut solver = rectangle_solver();
            black_box(solver.recount().unwrap());
        });
    });
}

fn solve_single_length(c: &mut Criterion) {
    c.bench_function("solve_single_length", |b| {
        b.iter(|| {
            let mut solver = Solver::new();
            let p1 = solver.add_point(Point::new(10.0, 15.0)).unwrap();
            let p2 = solver.add_point(Point::new(20.0, 30.0)).unwrap();
            solver
                .add_constraint(Constraint::length(p1, p2, 20.0).unwrap())
                .unwrap();
            black_box(solver.recount().unwrap());
        });
    });
}

criterion_group!(benches, solve_rectangle, solve_single_length);
criterion_main!(benches);
