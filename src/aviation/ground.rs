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

use approx::abs_diff_eq;
use serde::{Deserialize, Serialize};

use crate::polyfit::hermite_interval;

/// Binary on ground state, as used by simulators which cannot render partial ground contact
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnGround {
    OnGround,
    NotOnGround,
    #[default]
    Unknown,
}

/// Where the on ground information comes from
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundDetails {
    #[default]
    NotSet,
    /// Reported by the network position update
    InFromNetwork,
    /// Derived from the aircraft parts (gear, contact) sent by the remote client
    InFromParts,
    /// Guessed from speed, pitch and altitude
    ByGuessing,
    /// Result of the interpolation between two situations
    ByInterpolation,
}

/// On ground state with its continuous ground factor, 0 is airborne and 1 is on ground.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OnGroundInfo {
    pub on_ground: OnGround,
    pub details: GroundDetails,
    /// `None` when unknown
    pub factor: Option<f64>,
}

impl OnGroundInfo {
    /// Threshold of the ground factor above which an aircraft counts as on ground
    pub const ON_GROUND_THRESHOLD: f64 = 0.95;

    pub fn unknown() -> Self {
        Self::default()
    }

    /// Binary state from the interpolation, with the matching factor
    pub fn interpolated(on_ground: bool) -> Self {
        if on_ground {
            Self {
                on_ground: OnGround::OnGround,
                details: GroundDetails::ByInterpolation,
                factor: Some(1.0),
            }
        } else {
            Self {
                on_ground: OnGround::NotOnGround,
                details: GroundDetails::ByInterpolation,
                factor: Some(0.0),
            }
        }
    }

    /// Continuous state from a ground factor, clamped to [0; 1]
    pub fn from_factor(factor: f64, details: GroundDetails) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let on_ground = if factor >= Self::ON_GROUND_THRESHOLD {
            OnGround::OnGround
        } else {
            OnGround::NotOnGround
        };
        Self {
            on_ground,
            details,
            factor: Some(factor),
        }
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground == OnGround::OnGround
    }

    /// Ground factor, or `None` if unknown or not a number
    pub fn ground_factor(&self) -> Option<f64> {
        self.factor.filter(|gf| gf.is_finite())
    }
}

impl fmt::Display for OnGroundInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.factor {
            Some(gf) => write!(f, "{:?} ({gf:.3}, {:?})", self.on_ground, self.details),
            None => write!(f, "{:?} ({:?})", self.on_ground, self.details),
        }
    }
}

/// Both ground factors are (within epsilon) on ground
pub fn is_gf_equal_on_ground(old_gf: f64, new_gf: f64) -> bool {
    abs_diff_eq!(old_gf, 1.0, epsilon = f64::EPSILON) && abs_diff_eq!(new_gf, 1.0, epsilon = f64::EPSILON)
}

/// Both ground factors are (within epsilon) airborne
pub fn is_gf_equal_airborne(old_gf: f64, new_gf: f64) -> bool {
    abs_diff_eq!(old_gf, 0.0, epsilon = f64::EPSILON) && abs_diff_eq!(new_gf, 0.0, epsilon = f64::EPSILON)
}

/// Blends the ground state between the two knots enclosing `x`.
///
/// When both knots agree on airborne or on ground, the binary state is returned without evaluating the
/// spline, so that a steady state never picks up interpolation noise. Otherwise the Hermite interval
/// `[x1; x2]` of the ground factor channel is evaluated, e.g. during a touch and go.
pub fn blend_ground_factor(x: f64, x1: f64, x2: f64, gf1: f64, gf2: f64, k1: f64, k2: f64) -> OnGroundInfo {
    if is_gf_equal_airborne(gf1, gf2) {
        OnGroundInfo::interpolated(false)
    } else if is_gf_equal_on_ground(gf1, gf2) {
        OnGroundInfo::interpolated(true)
    } else {
        let gf = hermite_interval(x, x1, x2, gf1, gf2, k1, k2);
        if !gf.is_finite() {
            return OnGroundInfo::unknown();
        }
        OnGroundInfo::from_factor(gf, GroundDetails::ByInterpolation)
    }
}
