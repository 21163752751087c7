use proptest::prelude::*;

use crate::{Constraint, Point, Rounding, Segment, Solver, angle, p2l, p2p, p2s};

proptest! {
    #[test]
    fn p2p_is_symmetric_and_non_negative(
        x1 in -1e4f64..1e4,
        y1 in -1e4f64..1e4,
        x2 in -1e4f64..1e4,
        y2 in -1e4f64..1e4,
    ) {
        let a = Point::new(x1, y1);
        let b = Point::new(x2, y2);
        let d = p2p(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!((d - p2p(b, a)).abs() <= 0.0);
    }

    #[test]
    fn segment_distance_dominates_line_distance(
        px in -1e4f64..1e4,
        py in -1e4f64..1e4,
        x1 in -1e4f64..1e4,
        y1 in -1e4f64..1e4,
        x2 in -1e4f64..1e4,
        y2 in -1e4f64..1e4,
    ) {
        let point = Point::new(px, py);
        let segment = Segment::new(Point::new(x1, y1), Point::new(x2, y2));
        // Slack covers the different roundoff of the two formulas.
        prop_assert!(p2s(point, segment) >= p2l(point, segment) - 1e-6);
    }

    #[test]
    fn angle_is_in_range(
        x1 in -1e3f64..1e3,
        y1 in -1e3f64..1e3,
        x2 in -1e3f64..1e3,
        y2 in -1e3f64..1e3,
        x3 in -1e3f64..1e3,
        y3 in -1e3f64..1e3,
        x4 in -1e3f64..1e3,
        y4 in -1e3f64..1e3,
    ) {
        let s1 = Segment::new(Point::new(x1, y1), Point::new(x2, y2));
        let s2 = Segment::new(Point::new(x3, y3), Point::new(x4, y4));
        prop_assume!(s1.length() > 0.0 && s2.length() > 0.0);
        let value = angle(s1, s2);
        prop_assert!((0.0..360.0).contains(&value));
    }

    #[test]
    fn recount_without_constraints_is_quiescent(
        coords in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..6),
    ) {
        let mut solver = Solver::new();
        for &(x, y) in &coords {
            solver.add_point(Point::new(x, y)).unwrap();
        }
        let solved = solver.recount().unwrap();
        let rounding = Rounding::default();
        for (point, &(x, y)) in solved.iter().zip(&coords) {
            prop_assert!((point.x - rounding.round(x)).abs() <= 0.0);
            prop_assert!((point.y - rounding.round(y)).abs() <= 0.0);
        }
    }

    #[test]
    fn length_constraint_holds_from_random_layouts(
        x1 in -50f64..50.0,
        y1 in -50f64..50.0,
        x2 in -50f64..50.0,
        y2 in -50f64..50.0,
    ) {
        // A distance constraint needs a direction to work along.
        prop_assume!(p2p(Point::new(x1, y1), Point::new(x2, y2)) > 1.0);

        let mut solver = Solver::new();
        let p1 = solver.add_point(Point::new(x1, y1)).unwrap();
        let p2 = solver.add_point(Point::new(x2, y2)).unwrap();
        solver.add_constraint(Constraint::length(p1, p2, 5.0).unwrap()).unwrap();

        solver.recount().unwrap();
        prop_assert!((p2p(solver.point(p1), solver.point(p2)) - 5.0).abs() < 1e-1);
    }
}
