extern crate aerospline;

use aerospline::linalg::{Matrix3, Vector3};
use aerospline::polyfit::*;
use approx::{assert_abs_diff_eq, relative_eq};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use rstest::*;

#[fixture]
fn rng() -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(0x5EED)
}

/// Random strictly increasing knot times, between 100 ms and 10 s apart
fn random_times(rng: &mut Pcg64Mcg) -> TriKnot {
    let t0 = rng.gen_range(1.6e12..1.7e12_f64).round();
    let t1 = t0 + rng.gen_range(100..10_000) as f64;
    let t2 = t1 + rng.gen_range(100..10_000) as f64;
    TriKnot::new(t0, t1, t2)
}

fn random_values(rng: &mut Pcg64Mcg) -> TriKnot {
    TriKnot::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
}

#[test]
fn straight_line_is_reproduced() {
    // Knots at [0, 500, 1000] ms on a straight line
    let times = TriKnot::new(0.0, 500.0, 1000.0);
    let x = TriKnot::new(0.0, 0.5, 1.0);
    let slopes = derivatives(&times, &x);

    // Left segment
    let y = hermite_interval(250.0, 0.0, 500.0, 0.0, 0.5, slopes.oldest, slopes.middle);
    assert_abs_diff_eq!(y, 0.25, epsilon = 1e-9);

    let spline = ChannelSpline::fit(times, x);
    assert_abs_diff_eq!(spline.eval(250.0), 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(spline.eval(750.0), 0.75, epsilon = 1e-9);
    // The newest interval extrapolated backwards is the same line
    assert_abs_diff_eq!(spline.eval_interval(Interval::Newer, 250.0), 0.25, epsilon = 1e-9);
}

#[rstest]
fn boundary_reproduction(mut rng: Pcg64Mcg) {
    for _ in 0..1000 {
        let times = random_times(&mut rng);
        let values = random_values(&mut rng);
        let spline = ChannelSpline::fit(times, values);
        assert!(spline.is_finite());

        for interval in [Interval::Older, Interval::Newer] {
            let i = interval.first_knot();
            let (x0, x1) = (times[i], times[i + 1]);
            assert_eq!(spline.eval_interval(interval, x0), values[i]);
            assert_abs_diff_eq!(spline.eval_interval(interval, x1), values[i + 1], epsilon = 1e-14);
        }
    }
}

#[rstest]
fn derivative_continuity(mut rng: Pcg64Mcg) {
    for _ in 0..1000 {
        let times = random_times(&mut rng);
        let values = random_values(&mut rng);
        let k = derivatives(&times, &values);

        let from_left = hermite_interval_slope(
            times.middle,
            times.oldest,
            times.middle,
            values.oldest,
            values.middle,
            k.oldest,
            k.middle,
        );
        let from_right = hermite_interval_slope(
            times.middle,
            times.middle,
            times.newest,
            values.middle,
            values.newest,
            k.middle,
            k.newest,
        );
        assert!(
            relative_eq!(from_left, from_right, epsilon = 1e-12, max_relative = 1e-8),
            "slope discontinuity at {}: {from_left} vs {from_right}",
            times.middle
        );
        assert!(relative_eq!(from_left, k.middle, epsilon = 1e-12, max_relative = 1e-8));
    }
}

#[rstest]
fn tridiagonal_matches_dense_solve(mut rng: Pcg64Mcg) {
    for _ in 0..100 {
        let times = random_times(&mut rng);
        let (h0, h1) = (times.middle - times.oldest, times.newest - times.middle);
        #[rustfmt::skip]
        let a = Matrix3::new(
            2.0 / h0, 1.0 / h0,            0.0,
            1.0 / h0, 2.0 / h0 + 2.0 / h1, 1.0 / h1,
            0.0,      1.0 / h1,            2.0 / h1,
        );
        let b = Vector3::new(
            rng.gen_range(-1e-6..1e-6),
            rng.gen_range(-1e-6..1e-6),
            rng.gen_range(-1e-6..1e-6),
        );

        let expected = a.lu().solve(&b).unwrap();
        let (mut m, mut d) = (a, b);
        let x = solve_tridiagonal(&mut m, &mut d);
        for i in 0..3 {
            assert!(
                relative_eq!(x[i], expected[i], epsilon = 1e-15, max_relative = 1e-9),
                "{x} != {expected}"
            );
        }
    }
}

#[test]
fn duplicate_knot_times_do_not_panic() {
    let times = TriKnot::new(0.0, 0.0, 1000.0);
    let values = TriKnot::new(0.1, 0.2, 0.3);
    let slopes = derivatives(&times, &values);
    assert!(!slopes.is_finite());
    assert!(!ChannelSpline::fit(times, values).is_finite());
}

#[test]
fn quadratic_motion_is_smooth() {
    // An accelerating aircraft: the spline bends, and the newest interval stays between its end values
    let times = TriKnot::new(0.0, 5000.0, 10_000.0);
    let values = TriKnot::new(0.0, 0.25, 1.0);
    let spline = ChannelSpline::fit(times, values);
    let mut prev = spline.eval(5000.0);
    for ms in (5100..=10_000).step_by(100) {
        let y = spline.eval(ms as f64);
        assert!(y >= prev, "not increasing at {ms} ms");
        prev = y;
    }
    assert_abs_diff_eq!(prev, 1.0, epsilon = 1e-12);
}
