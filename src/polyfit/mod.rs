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
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::linalg::Vector3;

/// Cubic Hermite evaluation of a single interval.
pub mod hermite;
/// Not-a-knot style slope estimation of a three knot cubic spline.
pub mod spline;
/// Thomas algorithm for the three knot tridiagonal system.
pub mod tridiagonal;

pub use hermite::{hermite_interval, hermite_interval_slope};
pub use spline::{derivatives, ChannelSpline, Interval};
pub use tridiagonal::solve_tridiagonal;

/// TriKnot stores one value per knot of a three knot spline, ordered from the oldest to the newest knot.
///
/// The boundary equations of the spline are specific to exactly three knots, hence the fixed struct instead of a slice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriKnot {
    pub oldest: f64,
    pub middle: f64,
    pub newest: f64,
}

impl TriKnot {
    pub const fn new(oldest: f64, middle: f64, newest: f64) -> Self {
        Self {
            oldest,
            middle,
            newest,
        }
    }

    /// Same value at all three knots
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.oldest, self.middle, self.newest)
    }

    /// Returns true if none of the values is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.oldest.is_finite() && self.middle.is_finite() && self.newest.is_finite()
    }

    /// Returns true if oldest < middle < newest. NaNs are never increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.oldest < self.middle && self.middle < self.newest
    }

    /// Returns true if all values are within [-limit; limit], NaNs are out of range
    pub fn is_within(&self, limit: f64) -> bool {
        [self.oldest, self.middle, self.newest]
            .iter()
            .all(|v| *v >= -limit && *v <= limit)
    }

    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self::new(f(self.oldest), f(self.middle), f(self.newest))
    }
}

impl Index<usize> for TriKnot {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.oldest,
            1 => &self.middle,
            2 => &self.newest,
            _ => panic!("knot index {index} out of range for a three knot spline"),
        }
    }
}

impl IndexMut<usize> for TriKnot {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.oldest,
            1 => &mut self.middle,
            2 => &mut self.newest,
            _ => panic!("knot index {index} out of range for a three knot spline"),
        }
    }
}

impl From<[f64; 3]> for TriKnot {
    fn from(values: [f64; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

impl fmt::Display for TriKnot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.oldest, self.middle, self.newest)
    }
}

#[test]
fn triknot_ordering() {
    assert!(TriKnot::new(0.0, 500.0, 1000.0).is_strictly_increasing());
    assert!(!TriKnot::new(0.0, 0.0, 1000.0).is_strictly_increasing());
    assert!(!TriKnot::new(0.0, f64::NAN, 1000.0).is_strictly_increasing());
    assert!(!TriKnot::new(0.0, f64::INFINITY, 1.0).is_finite());
}

#[test]
fn triknot_vector_conversion() {
    let knots = TriKnot::from([1.0, 2.0, 3.0]);
    let v = knots.to_vector();
    assert_eq!(TriKnot::from_vector(&v), knots);
    assert_eq!(knots[2], 3.0);
    assert_eq!(format!("{knots}"), "[1, 2, 3]");
}
