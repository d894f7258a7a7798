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
use typed_builder::TypedBuilder;

use super::ground::{GroundDetails, OnGround, OnGroundInfo};
use crate::geo::{is_valid_vector, latitude_deg, longitude_deg, ElevationPlane};
use crate::linalg::Vector3;
use crate::time::Epoch;
use crate::units::{Altitude, Meters};

/// Ground speed above which an aircraft is never close enough to the ground to need the elevation
const SKIP_GROUND_SPEED_KTS: f64 = 250.0;

/// Height above ground above which the ground elevation is irrelevant
const SKIP_HEIGHT_ABOVE_GROUND: Meters = Meters::new(400.0);

/// Situation of a remote aircraft at a given time, as reported by the network.
///
/// The position is a unit normal vector and the time axis used by the interpolation is the adjusted
/// timestamp, i.e. the reported time shifted by the per aircraft offset compensating the network latency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Situation {
    /// Callsign of the aircraft
    #[builder(setter(into))]
    pub callsign: String,
    /// Unit normal vector of the position, zero for a null situation
    pub normal: Vector3<f64>,
    pub altitude: Altitude,
    #[builder(default)]
    pub on_ground: OnGroundInfo,
    /// Adjusted timestamp in milliseconds since the Unix epoch
    pub adjusted_ms: i64,
    /// Network timestamp before adjustment, only used for ordering diagnostics
    #[builder(default, setter(strip_option))]
    pub raw_ms: Option<i64>,
    /// Per aircraft time offset declared with this update, in milliseconds
    #[builder(default)]
    pub time_offset_ms: i64,
    /// Ground elevation below this situation, if already known
    #[builder(default, setter(strip_option))]
    pub ground_elevation: Option<ElevationPlane>,
    #[builder(default)]
    pub ground_speed_kts: f64,
    #[builder(default)]
    pub pitch_deg: f64,
    #[builder(default)]
    pub bank_deg: f64,
    #[builder(default)]
    pub heading_deg: f64,
}

impl Situation {
    /// The null situation: no callsign, no position
    pub fn null() -> Self {
        Self {
            callsign: String::new(),
            normal: Vector3::zeros(),
            altitude: Altitude::default(),
            on_ground: OnGroundInfo::unknown(),
            adjusted_ms: 0,
            raw_ms: None,
            time_offset_ms: 0,
            ground_elevation: None,
            ground_speed_kts: 0.0,
            pitch_deg: 0.0,
            bank_deg: 0.0,
            heading_deg: 0.0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.normal == Vector3::zeros()
    }

    /// Shifts both the adjusted and raw timestamps
    pub fn add_msecs(&mut self, msecs: i64) {
        self.adjusted_ms += msecs;
        if let Some(raw_ms) = self.raw_ms.as_mut() {
            *raw_ms += msecs;
        }
    }

    /// Raw timestamp if known, adjusted timestamp otherwise
    pub fn raw_or_adjusted_ms(&self) -> i64 {
        self.raw_ms.unwrap_or(self.adjusted_ms)
    }

    pub fn is_newer_than_adjusted(&self, other: &Self) -> bool {
        self.adjusted_ms > other.adjusted_ms
    }

    /// Adjusted time as an Epoch, for display
    pub fn epoch(&self) -> Epoch {
        Epoch::from_unix_milliseconds(self.adjusted_ms as f64)
    }

    pub fn latitude_deg(&self) -> f64 {
        latitude_deg(&self.normal)
    }

    pub fn longitude_deg(&self) -> f64 {
        longitude_deg(&self.normal)
    }

    pub fn is_valid_vector_range(&self) -> bool {
        is_valid_vector(&self.normal)
    }

    /// Ground factor if known
    pub fn ground_factor(&self) -> Option<f64> {
        self.on_ground.ground_factor()
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground.on_ground == OnGround::OnGround
    }

    /// True if the on ground state was reported by the network or the parts rather than guessed
    pub fn has_inbound_ground_information(&self) -> bool {
        matches!(
            self.on_ground.details,
            GroundDetails::InFromNetwork | GroundDetails::InFromParts
        )
    }

    pub fn has_ground_elevation(&self) -> bool {
        self.ground_elevation.is_some()
    }

    /// Sets the ground elevation if none is known yet and the plane covers this position. Returns true if set.
    pub fn set_ground_elevation_checked(&mut self, plane: Option<ElevationPlane>) -> bool {
        if self.has_ground_elevation() {
            return false;
        }
        match plane {
            Some(plane) if plane.elevation.is_finite() && plane.is_within_range(&self.normal) => {
                self.ground_elevation = Some(plane);
                true
            }
            _ => false,
        }
    }

    pub fn height_above_ground(&self) -> Option<Meters> {
        self.ground_elevation
            .map(|plane| self.altitude.in_meters() - plane.elevation.in_meters())
    }

    /// Returns true if this situation is very likely far enough from the ground for the ground elevation
    /// to not matter, which spares elevation lookups.
    pub fn can_likely_skip_near_ground_interpolation(&self) -> bool {
        // Reported on ground always needs the elevation
        if self.is_on_ground() && self.has_inbound_ground_information() {
            return false;
        }
        if self.is_null() || self.ground_speed_kts > SKIP_GROUND_SPEED_KTS {
            return true;
        }
        match self.height_above_ground() {
            Some(height) => height >= SKIP_HEIGHT_ABOVE_GROUND,
            None => false,
        }
    }

    /// Altitude dragged to the ground elevation plus the center of gravity when the reported altitude is
    /// below it, or within `near_ground` of it. Without known ground elevation, the reported altitude.
    pub fn corrected_altitude(&self, cg: Meters, near_ground: Meters) -> Altitude {
        let plane = match self.ground_elevation {
            Some(plane) => plane,
            None => return self.altitude,
        };
        let ground_plus_cg = plane.elevation.with_offset(cg).switched_unit(self.altitude.unit);
        let distance = self.altitude.in_meters() - ground_plus_cg.in_meters();
        if distance.value() < 0.0 || distance.value().abs() < near_ground.value() {
            ground_plus_cg
        } else {
            self.altitude
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null situation");
        }
        write!(
            f,
            "{} @ {} ({} ms): lat {:.6} lon {:.6} alt {} gs {:.1} kts hdg {:.1} {}",
            self.callsign,
            self.epoch(),
            self.adjusted_ms,
            self.latitude_deg(),
            self.longitude_deg(),
            self.altitude,
            self.ground_speed_kts,
            self.heading_deg,
            self.on_ground
        )
    }
}
