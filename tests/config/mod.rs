extern crate aerospline;

use std::path::PathBuf;

use aerospline::io::{ConfigError, ConfigRepr};
use aerospline::time::Unit;
use aerospline::InterpolationSetup;

use crate::init_logger;

fn data(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "data", name].iter().collect()
}

#[test]
fn load_setup() {
    init_logger();
    let setup = InterpolationSetup::load(data("interpolation_setup.yaml")).unwrap();
    assert_eq!(setup.interim_position_offset, 2 * Unit::Second);
    assert!(setup.logging_enabled);
    assert_eq!(setup.max_log_entries, 5000);
    assert!(setup.validate().is_ok());
}

#[test]
fn load_many_setups() {
    init_logger();
    let setups = InterpolationSetup::load_many(data("interpolation_setups.yaml")).unwrap();
    assert_eq!(setups.len(), 3);
    // Missing fields take the defaults
    assert_eq!(setups[0], InterpolationSetup::default());
    assert_eq!(setups[1].interim_position_offset_ms(), 1500);
    assert!(setups[1].strict_time_fraction);
    assert_eq!(setups[2].interim_position_offset_ms(), 6000);
    assert_eq!(setups[2].default_cg().value(), 3.1);
}

#[test]
fn missing_file() {
    let err = InterpolationSetup::load(data("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
    assert!(err.to_string().contains("does_not_exist.yaml"));
}

#[test]
fn round_trip_with_human_durations() {
    let setup = InterpolationSetup::builder()
        .interim_position_offset(2500 * Unit::Millisecond)
        .near_ground_delta_m(1.0)
        .build();
    let yaml = setup.to_yaml().unwrap();
    assert!(yaml.contains("interim_position_offset:"), "{yaml}");
    let reloaded = InterpolationSetup::loads(&yaml).unwrap();
    assert_eq!(reloaded, setup);

}

#[test]
fn invalid_setups_are_rejected_on_load() {
    init_logger();
    for yaml in [
        "interim_position_offset: 0 s",
        "interim_position_offset: -2 s",
        "near_ground_delta_m: -0.5",
    ] {
        let err = InterpolationSetup::loads(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }), "{yaml}: {err}");
    }

    let path = std::env::temp_dir().join("aerospline_invalid_setups.yaml");
    std::fs::write(&path, "- interim_position_offset: 2 s\n- interim_position_offset: -1 s\n").unwrap();
    assert!(matches!(
        InterpolationSetup::load_many(&path),
        Err(ConfigError::InvalidConfig { .. })
    ));
    std::fs::remove_file(&path).unwrap();
}
