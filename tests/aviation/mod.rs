extern crate aerospline;

use aerospline::aviation::*;
use aerospline::geo::{great_circle_distance, normal_vector, ElevationPlane};
use aerospline::units::{Altitude, LengthUnit, Meters};
use aerospline::{Situation, SituationHistory};
use approx::assert_abs_diff_eq;
use rstest::*;

use crate::{cruise_at, init_logger, CALLSIGN};

#[test]
fn history_is_bounded_and_sorted() {
    init_logger();
    let mut history = SituationHistory::new();
    // Out of order delivery, as happens with mixed fast and slow position updates
    for k in [3, 1, 2, 7, 5, 4, 6] {
        history.push(cruise_at(k * 1000, 46.0, 7.0));
    }
    assert!(history.is_sorted_latest_first());
    assert_eq!(history.latest().unwrap().adjusted_ms, 7000);

    for k in 8..200 {
        history.push(cruise_at(k * 1000, 46.0, 7.0));
    }
    assert_eq!(history.len(), MAX_SITUATIONS_PER_CALLSIGN);
    assert_eq!(history.oldest().unwrap().adjusted_ms, 150_000);

    // Null situations are never stored
    let revision = history.revision();
    history.push(Situation::null());
    assert_eq!(history.revision(), revision);
}

#[test]
fn provider_snapshots() {
    let shared = SharedHistory::new();
    for k in 0..5 {
        shared.push(cruise_at(k * 5000, 46.0, 7.0));
    }
    let snapshot = shared.situations(CALLSIGN);
    assert_eq!(snapshot.latest_n(3, 12_000).len(), 3);
    assert_eq!(snapshot.latest_n(3, 12_000)[0].adjusted_ms, 10_000);
    assert_eq!(shared.revision(CALLSIGN), 5);
    assert_eq!(shared.revision("NOPE"), 0);
}

#[rstest]
#[case::low_and_slow(1500.0, 140.0, false)]
#[case::fast(1500.0, 300.0, true)]
#[case::high_above_ground(5000.0, 140.0, true)]
fn near_ground_skip(#[case] altitude_ft: f64, #[case] gs_kts: f64, #[case] skip: bool) {
    let mut s = cruise_at(0, 47.4582, 8.5555);
    s.altitude = Altitude::feet(altitude_ft);
    s.ground_speed_kts = gs_kts;
    s.ground_elevation = Some(ElevationPlane::new(
        s.normal,
        Altitude::feet(1400.0),
        Meters::new(100.0),
    ));
    assert_eq!(s.can_likely_skip_near_ground_interpolation(), skip);
}

#[test]
fn altitude_correction() {
    let mut s = cruise_at(0, 47.4582, 8.5555);
    s.ground_elevation = Some(ElevationPlane::new(
        s.normal,
        Altitude::meters(432.0),
        Meters::new(100.0),
    ));
    let cg = Meters::new(2.5);
    let near = Meters::new(0.5);

    // Within the near ground delta above ground plus CG
    s.altitude = Altitude::meters(434.8);
    let corrected = s.corrected_altitude(cg, near);
    assert_abs_diff_eq!(corrected.value, 434.5, epsilon = 1e-9);
    assert_eq!(corrected.unit, LengthUnit::Meter);

    // Clearly airborne
    s.altitude = Altitude::meters(436.0);
    assert_eq!(s.corrected_altitude(cg, near), s.altitude);

    // Below the ground, in feet
    s.altitude = Altitude::feet(1000.0);
    let corrected = s.corrected_altitude(cg, near);
    assert_eq!(corrected.unit, LengthUnit::Foot);
    assert_abs_diff_eq!(corrected.in_meters().value(), 434.5, epsilon = 1e-9);
}

#[test]
fn ground_blending() {
    let airborne = blend_ground_factor(0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    assert!(!airborne.is_on_ground());
    let landing = blend_ground_factor(0.9, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0);
    assert_abs_diff_eq!(landing.factor.unwrap(), 0.9, epsilon = 1e-12);
    assert_eq!(landing.on_ground, OnGround::NotOnGround);
    let touchdown = blend_ground_factor(0.99, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0);
    assert!(touchdown.is_on_ground());
}

#[test]
fn normal_vectors() {
    // Across the antimeridian, the normal vectors stay close
    let east = normal_vector(0.0, 179.99);
    let west = normal_vector(0.0, -179.99);
    assert!(great_circle_distance(&east, &west).value() < 2300.0);
}
