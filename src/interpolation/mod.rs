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

use std::fmt;

use serde::{Deserialize, Serialize};

mod interpolant;
mod log;
mod pbh;
mod spline_interpolator;
mod window;

pub use self::interpolant::SplineInterpolant;
pub use self::log::{InterpolationLogger, SituationLog};
pub use self::pbh::LinearPbh;
pub use self::spline_interpolator::SplineInterpolator;
pub use self::window::{SampleWindow, SampleWindowManager, WindowState};

/// Time fractions within this margin outside of [0; 1] are expected from the frame jitter and are not reported
const TIME_FRACTION_TOLERANCE: f64 = 0.01;

/// The interpolated channels of a situation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    X,
    Y,
    Z,
    Altitude,
    GroundFactor,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
            Self::Altitude => write!(f, "altitude"),
            Self::GroundFactor => write!(f, "ground factor"),
        }
    }
}

/// Clamps the time fraction to [0; 1], a NaN fraction becomes 0
pub fn clamp_valid_time_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Returns true if the time fraction is in [0; 1] give or take the frame jitter
pub fn is_acceptable_time_fraction(fraction: f64) -> bool {
    (-TIME_FRACTION_TOLERANCE..=1.0 + TIME_FRACTION_TOLERANCE).contains(&fraction)
}

#[test]
fn time_fractions() {
    assert_eq!(clamp_valid_time_fraction(-0.2), 0.0);
    assert_eq!(clamp_valid_time_fraction(1.7), 1.0);
    assert_eq!(clamp_valid_time_fraction(f64::NAN), 0.0);
    assert_eq!(clamp_valid_time_fraction(0.25), 0.25);
    assert!(is_acceptable_time_fraction(1.005));
    assert!(!is_acceptable_time_fraction(1.2));
    assert!(!is_acceptable_time_fraction(f64::NAN));
    assert_eq!(format!("{}", Channel::GroundFactor), "ground factor");
}
