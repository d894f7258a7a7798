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

/// Evaluates the cubic Hermite polynomial of the interval [x0; x1] at `x`.
///
/// The interval is defined by its end values `y0`, `y1` and end slopes `k0`, `k1`. With
/// `t = (x - x0) / (x1 - x0)`, the result is
/// `(1 - t) y0 + t y1 + t (1 - t) (a (1 - t) + b t)`
/// where `a = k0 (x1 - x0) - (y1 - y0)` and `b = -k1 (x1 - x0) + (y1 - y0)`.
///
/// This reproduces `y0` at `x0`, `y1` at `x1`, and the slopes `k0` and `k1` at both ends. Evaluating
/// outside of the interval extrapolates the same cubic; this is not checked here.
pub fn hermite_interval(x: f64, x0: f64, x1: f64, y0: f64, y1: f64, k0: f64, k1: f64) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let t = (x - x0) / dx;
    let a = k0 * dx - dy;
    let b = -k1 * dx + dy;
    (1.0 - t) * y0 + t * y1 + t * (1.0 - t) * (a * (1.0 - t) + b * t)
}

/// First derivative with respect to `x` of [`hermite_interval`].
pub fn hermite_interval_slope(x: f64, x0: f64, x1: f64, y0: f64, y1: f64, k0: f64, k1: f64) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let t = (x - x0) / dx;
    let a = k0 * dx - dy;
    let b = -k1 * dx + dy;
    // d/dt of the polynomial in t, then the chain rule for dt/dx
    let dy_dt = dy + (1.0 - 2.0 * t) * (a * (1.0 - t) + b * t) + t * (1.0 - t) * (b - a);
    dy_dt / dx
}

#[test]
fn hermite_reproduces_ends() {
    let (x0, x1, y0, y1, k0, k1) = (500.0, 1000.0, 0.5, 0.75, 1e-3, -2e-4);
    assert_eq!(hermite_interval(x0, x0, x1, y0, y1, k0, k1), y0);
    assert!((hermite_interval(x1, x0, x1, y0, y1, k0, k1) - y1).abs() < 1e-15);

    let k0_eval = hermite_interval_slope(x0, x0, x1, y0, y1, k0, k1);
    let k1_eval = hermite_interval_slope(x1, x0, x1, y0, y1, k0, k1);
    assert!((k0_eval - k0).abs() < 1e-15, "{k0_eval} != {k0}");
    assert!((k1_eval - k1).abs() < 1e-15, "{k1_eval} != {k1}");
}

#[test]
fn hermite_linear_extrapolation() {
    // Matching slopes on a straight line make the cubic terms vanish, even outside of the interval
    let y = hermite_interval(-250.0, 0.0, 500.0, 0.0, 0.5, 1e-3, 1e-3);
    assert!((y + 0.25).abs() < 1e-12);
}
