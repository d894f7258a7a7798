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

use serde::{Deserialize, Serialize};

use crate::linalg::Vector3;
use crate::units::{Altitude, Meters};

mod elevation;
pub use elevation::{ElevationCache, ElevationPlane, ElevationProvider, NoElevation};

/// Mean Earth radius used for great circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_000.8;

/// Normal vector components may overshoot the unit sphere slightly because of the interpolation
pub const NORMAL_VECTOR_LIMIT: f64 = 1.00001;

/// Builds the unit normal vector of a geodetic position on a sphere
pub fn normal_vector(latitude_deg: f64, longitude_deg: f64) -> Vector3<f64> {
    let (lat, lon) = (latitude_deg.to_radians(), longitude_deg.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Returns the latitude of a normal vector, in degrees
pub fn latitude_deg(v: &Vector3<f64>) -> f64 {
    v.z.atan2(v.x.hypot(v.y)).to_degrees()
}

/// Returns the longitude of a normal vector, in degrees. At the poles, the longitude is zero.
pub fn longitude_deg(v: &Vector3<f64>) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// Returns true if all components are within the tolerated range around [-1; 1]. Infinities are out of range
/// and NaNs never compare, so both are invalid.
pub fn is_valid_vector(v: &Vector3<f64>) -> bool {
    v.iter()
        .all(|c| *c <= NORMAL_VECTOR_LIMIT && *c >= -NORMAL_VECTOR_LIMIT)
}

/// Great circle distance between two normal vectors
pub fn great_circle_distance(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Meters {
    Meters::new(EARTH_RADIUS_M * v1.cross(v2).norm().atan2(v1.dot(v2)))
}

/// A geodetic position with its altitude, as rendered by the simulator
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub normal: Vector3<f64>,
    pub altitude: Altitude,
}

impl GeodeticPosition {
    pub fn latitude_deg(&self) -> f64 {
        latitude_deg(&self.normal)
    }

    pub fn longitude_deg(&self) -> f64 {
        longitude_deg(&self.normal)
    }
}
