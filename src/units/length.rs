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

use super::Base;

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Meters(Base);

super::unit!(Meters, "m");

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Feet(Base);

super::unit!(Feet, "ft");

super::linear_conversion!(0.3048_f64, Feet, Meters);
super::linear_conversion!(3.280839895013123_f64, Meters, Feet);

/// Unit of an altitude. All situations of a window must be converted to the same unit before fitting,
/// but which one is irrelevant to the spline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Foot,
    Meter,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Foot => write!(f, "ft"),
            Self::Meter => write!(f, "m"),
        }
    }
}

/// Altitude above mean sea level, with an explicit unit
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Altitude {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Altitude {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn feet(value: f64) -> Self {
        Self::new(value, LengthUnit::Foot)
    }

    pub const fn meters(value: f64) -> Self {
        Self::new(value, LengthUnit::Meter)
    }

    /// Returns the numeric value of this altitude in the requested unit
    pub fn value_in(&self, unit: LengthUnit) -> f64 {
        match (self.unit, unit) {
            (LengthUnit::Foot, LengthUnit::Meter) => Meters::from(Feet::new(self.value)).value(),
            (LengthUnit::Meter, LengthUnit::Foot) => Feet::from(Meters::new(self.value)).value(),
            _ => self.value,
        }
    }

    pub fn in_meters(&self) -> Meters {
        Meters::new(self.value_in(LengthUnit::Meter))
    }

    /// Returns a copy converted to the requested unit
    pub fn switched_unit(&self, unit: LengthUnit) -> Self {
        Self::new(self.value_in(unit), unit)
    }

    /// Returns this altitude shifted by a length, e.g. ground elevation plus center of gravity
    pub fn with_offset(&self, offset: Meters) -> Self {
        let meters = self.in_meters() + offset;
        Self::meters(meters.value()).switched_unit(self.unit)
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl Default for Altitude {
    fn default() -> Self {
        Self::feet(0.0)
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[test]
fn feet_meters_round_trip() {
    let alt = Altitude::feet(1000.0);
    assert!((alt.value_in(LengthUnit::Meter) - 304.8).abs() < 1e-9);
    let back = alt.switched_unit(LengthUnit::Meter).switched_unit(LengthUnit::Foot);
    assert!((back.value - 1000.0).abs() < 1e-9);
    assert_eq!(format!("{}", Meters::new(2.5)), "2.5 m");
    assert!(((Meters::new(1.0) + Feet::new(1.0)).value() - 1.3048).abs() < 1e-12);
}

#[test]
fn altitude_offset_keeps_unit() {
    let ground = Altitude::feet(500.0).with_offset(Meters::new(3.048));
    assert_eq!(ground.unit, LengthUnit::Foot);
    assert!((ground.value - 510.0).abs() < 1e-9);
}
