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

use super::hermite::{hermite_interval, hermite_interval_slope};
use super::tridiagonal::solve_tridiagonal;
use super::TriKnot;
use crate::linalg::{Matrix3, Vector3};

/// Computes the slope at each of the three knots `(x, y)` of a cubic spline.
///
/// The end rows use the one-sided conditions scaled by `1 / (x[1] - x[0])` and `1 / (x[2] - x[1])`, and the
/// middle row sums the contributions of both neighboring intervals. The right hand side is `3 dy / dx^2` per
/// interval. The knot times must be strictly increasing, otherwise the slopes are infinite or NaN.
///
/// References:
/// + <https://en.wikipedia.org/wiki/Spline_interpolation>
/// + <http://blog.ivank.net/interpolation-with-cubic-splines.html>
pub fn derivatives(x: &TriKnot, y: &TriKnot) -> TriKnot {
    let h0 = x.middle - x.oldest;
    let h1 = x.newest - x.middle;
    let dy0 = y.middle - y.oldest;
    let dy1 = y.newest - y.middle;

    #[rustfmt::skip]
    let mut a = Matrix3::new(
        2.0 / h0, 1.0 / h0,                 0.0,
        1.0 / h0, 2.0 / h0 + 2.0 / h1,      1.0 / h1,
        0.0,      1.0 / h1,                 2.0 / h1,
    );

    let mut b = Vector3::new(
        3.0 * dy0 / (h0 * h0),
        3.0 * dy0 / (h0 * h0) + 3.0 * dy1 / (h1 * h1),
        3.0 * dy1 / (h1 * h1),
    );

    TriKnot::from_vector(&solve_tridiagonal(&mut a, &mut b))
}

/// One of the two intervals of a three knot spline
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// Between the oldest and the middle knots
    Older,
    /// Between the middle and the newest knots
    Newer,
}

impl Interval {
    /// Index of the knot starting this interval
    pub const fn first_knot(self) -> usize {
        match self {
            Self::Older => 0,
            Self::Newer => 1,
        }
    }
}

/// A fitted three knot cubic spline of a single channel, C1 continuous over [oldest; newest].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpline {
    /// Knot times, strictly increasing for a valid fit
    pub times: TriKnot,
    /// Channel value at each knot
    pub values: TriKnot,
    /// Channel slope at each knot, per unit of time
    pub slopes: TriKnot,
}

impl ChannelSpline {
    /// Fits the spline through the three knots
    pub fn fit(times: TriKnot, values: TriKnot) -> Self {
        Self {
            times,
            values,
            slopes: derivatives(&times, &values),
        }
    }

    /// Returns true if all values and slopes are finite
    pub fn is_finite(&self) -> bool {
        self.values.is_finite() && self.slopes.is_finite()
    }

    /// Interval to use at `x`: the older one up to the middle knot, the newer one after.
    fn interval(&self, x: f64) -> Interval {
        if x < self.times.middle {
            Interval::Older
        } else {
            Interval::Newer
        }
    }

    /// Evaluates the spline at `x`, extrapolating the end intervals outside of the knots
    pub fn eval(&self, x: f64) -> f64 {
        let i = self.interval(x);
        self.eval_interval(i, x)
    }

    /// Evaluates the slope of the spline at `x`
    pub fn eval_slope(&self, x: f64) -> f64 {
        let i = self.interval(x).first_knot();
        hermite_interval_slope(
            x,
            self.times[i],
            self.times[i + 1],
            self.values[i],
            self.values[i + 1],
            self.slopes[i],
            self.slopes[i + 1],
        )
    }

    /// Evaluates the cubic of `interval` at `x`, extrapolating it outside of its knots
    pub fn eval_interval(&self, interval: Interval, x: f64) -> f64 {
        let i = interval.first_knot();
        hermite_interval(
            x,
            self.times[i],
            self.times[i + 1],
            self.values[i],
            self.values[i + 1],
            self.slopes[i],
            self.slopes[i + 1],
        )
    }
}
