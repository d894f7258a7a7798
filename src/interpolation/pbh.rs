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

use crate::aviation::Situation;
use crate::interpolation::clamp_valid_time_fraction;

/// Linear interpolation of pitch, bank, heading and ground speed between two situations.
///
/// The attitude is interpolated linearly even though the position follows the spline: the attitude updates
/// are coarse and a cubic fit would overshoot on every turn entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearPbh {
    start: Situation,
    end: Situation,
    time_fraction: f64,
}

impl LinearPbh {
    pub fn new(start: Situation, end: Situation) -> Self {
        Self {
            start,
            end,
            time_fraction: 0.0,
        }
    }

    pub fn start_situation(&self) -> &Situation {
        &self.start
    }

    pub fn end_situation(&self) -> &Situation {
        &self.end
    }

    pub fn time_fraction(&self) -> f64 {
        self.time_fraction
    }

    /// Sets the time fraction, clamped to [0; 1]
    pub fn set_time_fraction(&mut self, fraction: f64) {
        self.time_fraction = clamp_valid_time_fraction(fraction);
    }

    fn lerp(&self, start: f64, end: f64) -> f64 {
        start + (end - start) * self.time_fraction
    }

    /// Heading in degrees within [0; 360), turning along the shorter arc
    pub fn heading_deg(&self) -> f64 {
        let start = self.start.heading_deg.rem_euclid(360.0);
        let mut delta = self.end.heading_deg.rem_euclid(360.0) - start;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        (start + delta * self.time_fraction).rem_euclid(360.0)
    }

    pub fn pitch_deg(&self) -> f64 {
        self.lerp(self.start.pitch_deg, self.end.pitch_deg)
    }

    pub fn bank_deg(&self) -> f64 {
        self.lerp(self.start.bank_deg, self.end.bank_deg)
    }

    pub fn ground_speed_kts(&self) -> f64 {
        self.lerp(self.start.ground_speed_kts, self.end.ground_speed_kts)
    }
}

impl Default for LinearPbh {
    fn default() -> Self {
        Self::new(Situation::null(), Situation::null())
    }
}
