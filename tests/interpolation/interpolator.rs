extern crate aerospline;

use std::thread;

use aerospline::aviation::{GroundDetails, OnGround, SharedHistory};
use aerospline::geo::{normal_vector, ElevationCache, ElevationPlane, NoElevation};
use aerospline::interpolation::{SampleWindow, WindowState};
use aerospline::linalg::Vector3;
use aerospline::polyfit::TriKnot;
use aerospline::units::{Altitude, LengthUnit, Meters};
use aerospline::*;
use approx::assert_abs_diff_eq;
use rstest::*;

use crate::{cruise_at, init_logger, with_ground_factor, CALLSIGN};

#[fixture]
fn interpolator() -> SplineInterpolator {
    init_logger();
    SplineInterpolator::new(CALLSIGN, InterpolationSetup::default())
}

#[rstest]
fn single_situation_holds_position(mut interpolator: SplineInterpolator) {
    let history = SituationHistory::from_situations([cruise_at(1000, 47.45, 8.56)]);
    let interpolant = interpolator.get_interpolant(1000, &history, &NoElevation);
    assert!(interpolant.is_valid(), "{interpolant}");
    assert_eq!(interpolant.knot_times(), TriKnot::new(-1000.0, 1000.0, 3000.0));
    let velocity = interpolant.normal_velocity().unwrap();
    assert_abs_diff_eq!(velocity.norm(), 0.0, epsilon = 1e-15);

    let position = interpolant.interpolate_position_and_altitude().unwrap();
    assert_abs_diff_eq!(position.latitude_deg(), 47.45, epsilon = 1e-9);
    assert_abs_diff_eq!(position.altitude.value, 35_000.0, epsilon = 1e-9);
    assert_eq!(interpolator.window_state(), WindowState::Synthesized);
}

#[rstest]
fn empty_history_is_invalid(mut interpolator: SplineInterpolator) {
    let interpolant = interpolator.get_interpolant(1000, &SituationHistory::new(), &NoElevation);
    assert!(!interpolant.is_valid());
    assert_eq!(interpolant.status(), Err(InterpolationError::InsufficientData));
    assert!(interpolator
        .interpolated_situation(1016, &SituationHistory::new(), &NoElevation)
        .is_none());
    assert_eq!(interpolator.invalid_count(), 1);
}

#[test]
fn duplicate_knot_times_are_invalid() {
    let window = SampleWindow {
        oldest: cruise_at(0, 47.0, 8.0),
        middle: cruise_at(0, 47.01, 8.0),
        newest: cruise_at(1000, 47.02, 8.0),
    };
    let interpolant = SplineInterpolant::fit(&window, TriKnot::splat(35_000.0), LengthUnit::Foot);
    assert!(!interpolant.is_valid());
    assert!(matches!(
        interpolant.status(),
        Err(InterpolationError::NonFinite { .. })
    ));
    assert!(interpolant.interpolate_position_and_altitude().is_err());
}

#[rstest]
fn overshooting_frame_is_skipped(mut interpolator: SplineInterpolator) {
    // Knots on the x axis at 0.99 and 1: the cubic of the newer interval bulges beyond the unit sphere
    let on_x_axis = |ms: i64, x: f64| {
        let mut s = cruise_at(ms, 0.0, 0.0);
        s.normal = Vector3::new(x, 0.0, 0.0);
        s
    };
    let history = SituationHistory::from_situations([on_x_axis(0, 0.99), on_x_axis(4000, 1.0)]);

    let start = interpolator
        .interpolated_situation(2000, &history, &NoElevation)
        .unwrap();
    assert_eq!(start.normal.x, 1.0);
    assert_eq!(interpolator.interpolant().knot_times(), TriKnot::new(0.0, 2000.0, 4000.0));

    assert!(interpolator
        .interpolated_situation(3000, &history, &NoElevation)
        .is_none());
    assert!(matches!(
        interpolator.interpolant().status(),
        Err(InterpolationError::InvalidVector { .. })
    ));
    assert_eq!(interpolator.invalid_count(), 1);
    assert_eq!(interpolator.last_situation(), &start);

    // Same fit, the next frame is rendered again
    let resumed = interpolator
        .interpolated_situation(3999, &history, &NoElevation)
        .unwrap();
    assert!(!interpolator.interpolant().is_recalculated());
    assert!(interpolator.interpolant().is_valid());
    assert!(resumed.normal.x > 1.0 && resumed.normal.x < 1.00001);
    assert_eq!(interpolator.invalid_count(), 1);
}

#[rstest]
fn evaluation_is_idempotent(mut interpolator: SplineInterpolator) {
    let history = SituationHistory::from_situations(
        (0..4).map(|i| cruise_at(i * 5000, 47.0 + i as f64 * 0.01, 8.0 + i as f64 * 0.005)),
    );
    let interpolant = interpolator.get_interpolant(15_000, &history, &NoElevation);
    assert!(interpolant.is_valid());
    for t in [15_000.0, 15_250.5, 16_000.0] {
        let first = interpolant.evaluate_at(t).unwrap();
        let second = interpolant.evaluate_at(t).unwrap();
        for i in 0..3 {
            assert_eq!(first.normal[i].to_bits(), second.normal[i].to_bits());
        }
        assert_eq!(first.altitude.value.to_bits(), second.altitude.value.to_bits());
    }
    assert_eq!(
        interpolant.interpolate_position_and_altitude(),
        interpolant.interpolate_position_and_altitude()
    );
}

#[rstest]
fn recalculation_only_on_news(mut interpolator: SplineInterpolator) {
    let mut history = SituationHistory::from_situations(
        (0..3).map(|i| cruise_at(i * 5000, 47.0 + i as f64 * 0.01, 8.0)),
    );
    assert!(interpolator
        .get_interpolant(10_000, &history, &NoElevation)
        .is_recalculated());
    let next = interpolator.interpolant().next_knot_ms();
    for now in (10_020..next).step_by(20) {
        assert!(!interpolator
            .get_interpolant(now, &history, &NoElevation)
            .is_recalculated());
    }
    // A new situation triggers the refit before the next knot is reached
    history.push(cruise_at(15_000, 47.03, 8.0));
    let now = next - 100;
    let interpolant = interpolator.get_interpolant(now, &history, &NoElevation);
    assert!(interpolant.is_recalculated());
    assert_eq!(interpolant.next_knot_ms(), 15_000);
}

/// Flies an aircraft reporting every 5 s, received 6 s ahead of its adjusted time, and renders it at 50 Hz
#[rstest]
#[case::default(InterpolationSetup::default())]
#[case::strict(InterpolationSetup::builder().strict_time_fraction(true).build())]
fn continuous_flight(#[case] setup: InterpolationSetup) {
    init_logger();
    const OFFSET_MS: i64 = 6000;
    let shared = SharedHistory::new();
    let mut interpolator = SplineInterpolator::new(CALLSIGN, setup);
    let report = |k: i64| {
        let mut s = cruise_at(k * 5000, 47.0 + k as f64 * 0.01, 8.0);
        s.time_offset_ms = OFFSET_MS;
        s
    };

    let mut received = 0;
    let mut prev: Option<Situation> = None;
    for now in (OFFSET_MS..60_000).step_by(20) {
        while received * 5000 <= now + OFFSET_MS {
            shared.push(report(received));
            received += 1;
        }
        let situation = interpolator
            .interpolated_situation(now, &shared, &NoElevation)
            .unwrap_or_else(|| panic!("no situation at {now} ms: {}", interpolator.interpolant()));

        assert_abs_diff_eq!(situation.altitude.value, 35_000.0, epsilon = 1e-6);
        assert_eq!(situation.adjusted_ms, now);
        let lat = situation.latitude_deg();
        assert!(lat > 46.99 && lat < 47.0 + received as f64 * 0.01, "{situation}");
        if let Some(prev) = prev {
            let jump = (lat - prev.latitude_deg()).abs();
            assert!(jump < 2e-3, "jump of {jump} deg at {now} ms");
        }
        prev = Some(situation);
    }
    assert_eq!(interpolator.invalid_count(), 0);
}

#[test]
fn touch_and_go_ground_factor() {
    init_logger();
    let window = SampleWindow {
        oldest: with_ground_factor(cruise_at(0, 47.0, 8.0), 0.0),
        middle: with_ground_factor(cruise_at(5000, 47.01, 8.0), 0.0),
        newest: with_ground_factor(cruise_at(10_000, 47.02, 8.0), 1.0),
    };
    let mut interpolant = SplineInterpolant::fit(&window, TriKnot::splat(1400.0), LengthUnit::Foot);
    let mut prev_gf = 0.0;
    for ms in (5000..10_000).step_by(500) {
        let fraction = (ms - 5000) as f64 / 5000.0;
        interpolant.set_times(ms, fraction, ms, true);
        let gnd = interpolant.interpolate_ground_factor();
        assert_eq!(gnd.details, GroundDetails::ByInterpolation);
        let gf = gnd.factor.unwrap();
        assert!((0.0..=1.0).contains(&gf));
        assert!(gf >= prev_gf, "ground factor decreasing at {ms} ms");
        if gf < 0.95 {
            assert_eq!(gnd.on_ground, OnGround::NotOnGround);
        }
        prev_gf = gf;
    }

    // Steady states never evaluate the spline
    let steady = SampleWindow {
        oldest: with_ground_factor(cruise_at(0, 47.0, 8.0), 1.0),
        middle: with_ground_factor(cruise_at(5000, 47.0, 8.0), 1.0),
        newest: with_ground_factor(cruise_at(10_000, 47.0, 8.0), 1.0),
    };
    let mut interpolant = SplineInterpolant::fit(&steady, TriKnot::splat(1400.0), LengthUnit::Foot);
    interpolant.set_times(7500, 0.5, 7500, true);
    let gnd = interpolant.interpolate_ground_factor();
    assert_eq!(gnd.on_ground, OnGround::OnGround);
    assert_eq!(gnd.factor, Some(1.0));
}

#[test]
fn parked_aircraft_sits_on_the_ground() {
    init_logger();
    let parked = |ms: i64| {
        let mut s = with_ground_factor(cruise_at(ms, 47.4582, 8.5555), 1.0);
        s.altitude = Altitude::feet(1400.0);
        s.ground_speed_kts = 0.0;
        s
    };
    let history = SituationHistory::from_situations([parked(0), parked(5000)]);
    let mut elevations = ElevationCache::default();
    elevations.insert(ElevationPlane::new(
        normal_vector(47.4582, 8.5555),
        Altitude::feet(1410.0),
        Meters::new(250.0),
    ));
    let mut interpolator = SplineInterpolator::new(CALLSIGN, InterpolationSetup::default());
    interpolator.set_model_cg(Meters::new(2.0));

    let situation = interpolator
        .interpolated_situation(5000, &history, &elevations)
        .unwrap();
    // Reported below the ground, dragged up to the ground plus the CG
    let expected = Altitude::feet(1410.0).with_offset(Meters::new(2.0));
    assert_abs_diff_eq!(situation.altitude.value, expected.value, epsilon = 1e-6);
    assert!(situation.is_on_ground());
    assert!(situation.has_ground_elevation());
}

#[test]
fn history_written_by_another_thread() {
    init_logger();
    let shared = SharedHistory::new();
    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for k in 0..10 {
                shared.push(cruise_at(k * 5000, 47.0 + k as f64 * 0.01, 8.0));
            }
        })
    };
    writer.join().unwrap();

    let mut interpolator = SplineInterpolator::new(CALLSIGN, InterpolationSetup::default());
    let interpolant = interpolator.get_interpolant(45_000, &shared, &NoElevation);
    assert!(interpolant.is_valid());
    assert_eq!(interpolator.window_state(), WindowState::Real);

    assert!(shared.remove(CALLSIGN).is_some());
    assert!(!interpolator
        .get_interpolant(45_020, &shared, &NoElevation)
        .is_valid());
}

#[test]
fn reconnected_aircraft_is_refitted() {
    init_logger();
    let shared = SharedHistory::new();
    for k in 0..3 {
        shared.push(cruise_at(k * 5000, 47.0, 8.0));
    }
    let mut interpolator = SplineInterpolator::new(CALLSIGN, InterpolationSetup::default());
    assert!(interpolator
        .get_interpolant(10_000, &shared, &NoElevation)
        .is_valid());

    // Disconnects and comes back elsewhere with as many situations as before
    shared.remove(CALLSIGN);
    for k in 0..3 {
        shared.push(cruise_at(k * 5000, 52.3, 4.76));
    }
    let interpolant = interpolator.get_interpolant(10_020, &shared, &NoElevation);
    assert!(interpolant.is_recalculated());
    let position = interpolant.interpolate_position_and_altitude().unwrap();
    assert_abs_diff_eq!(position.latitude_deg(), 52.3, epsilon = 1e-6);
}

#[test]
fn logs_exported_as_csv() {
    init_logger();
    let setup = InterpolationSetup::builder()
        .logging_enabled(true)
        .max_log_entries(100)
        .build();
    let history = SituationHistory::from_situations((0..4).map(|k| cruise_at(k * 5000, 47.0, 8.0)));
    let mut interpolator = SplineInterpolator::new(CALLSIGN, setup);
    for now in (15_000..18_000).step_by(20) {
        interpolator.interpolated_situation(now, &history, &NoElevation);
    }
    assert_eq!(interpolator.logger().len(), 100);
    let latest = interpolator.logger().latest().unwrap();
    assert_eq!(latest.current_ms, 17_980);
    assert!(latest.valid);
    assert_eq!(latest.callsign, CALLSIGN);

    let path = std::env::temp_dir().join("aerospline_interpolation_log.csv");
    interpolator.logger().write_csv(&path).unwrap();
    let rows = std::fs::read_to_string(&path).unwrap().lines().count();
    assert_eq!(rows, 101);
    std::fs::remove_file(&path).unwrap();
}
