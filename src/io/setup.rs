/*
    Aerospline, smooth remote aircraft situations for flight simulators
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use hifitime::{Duration, Unit};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{duration_from_str, duration_to_ms, duration_to_str, ConfigError, ConfigRepr};
use crate::units::Meters;

/// Setup of the interpolation of the remote aircraft.
///
/// ```
/// use aerospline::io::ConfigRepr;
/// use aerospline::InterpolationSetup;
///
/// let setup = InterpolationSetup::loads("interim_position_offset: 3 s\nstrict_time_fraction: true").unwrap();
/// assert_eq!(setup.interim_position_offset_ms(), 3000);
/// assert!(setup.strict_time_fraction);
/// assert!(!setup.logging_enabled);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
#[serde(default)]
pub struct InterpolationSetup {
    /// Minimum spacing of the knots around the latest situation, the time offset of interim position updates
    #[serde(
        serialize_with = "duration_to_str",
        deserialize_with = "duration_from_str"
    )]
    #[builder(default = 2 * Unit::Second)]
    pub interim_position_offset: Duration,
    /// Search radius of the ground elevation lookups, in meters
    #[builder(default = 100.0)]
    pub elevation_search_radius_m: f64,
    /// Situations closer than this to the ground elevation plus center of gravity are put on the ground, in meters
    #[builder(default = 0.5)]
    pub near_ground_delta_m: f64,
    /// Center of gravity above ground used when the model does not provide one, in meters
    #[builder(default = 2.5)]
    pub default_cg_m: f64,
    /// Flags the interpolant as stale instead of clamping a time fraction outside of [0; 1]
    #[builder(default)]
    pub strict_time_fraction: bool,
    /// Records a situation log for each interpolation step
    #[builder(default)]
    pub logging_enabled: bool,
    /// Maximum number of situation logs kept per interpolator
    #[builder(default = 1000)]
    pub max_log_entries: usize,
}

impl InterpolationSetup {
    pub fn interim_position_offset_ms(&self) -> i64 {
        duration_to_ms(self.interim_position_offset)
    }

    pub fn elevation_search_radius(&self) -> Meters {
        Meters::new(self.elevation_search_radius_m)
    }

    pub fn near_ground_delta(&self) -> Meters {
        Meters::new(self.near_ground_delta_m)
    }

    pub fn default_cg(&self) -> Meters {
        Meters::new(self.default_cg_m)
    }
}

impl Default for InterpolationSetup {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for InterpolationSetup {
    /// Rejects the values which would break the interpolation, e.g. a non positive offset
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interim_position_offset_ms() <= 0 {
            return Err(ConfigError::InvalidConfig {
                msg: format!(
                    "interim position offset must be positive, got {}",
                    self.interim_position_offset
                ),
            });
        }
        for (name, value) in [
            ("elevation search radius", self.elevation_search_radius_m),
            ("near ground delta", self.near_ground_delta_m),
            ("default center of gravity", self.default_cg_m),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidConfig {
                    msg: format!("{name} must be a non negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}
