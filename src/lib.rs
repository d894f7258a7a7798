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

/*! # aerospline

Smooth, continuously evaluable trajectories of remote aircraft for flight simulator rendering.

Remote aircraft situations arrive from the network as noisy, irregularly timed samples. On every visual
frame of the simulator, the [`interpolation::SplineInterpolator`] of each aircraft fits a cubic spline through
a three sample window of its history and provides an [`interpolation::SplineInterpolant`] from which the
position, altitude, on-ground state, pitch, bank and heading can be evaluated at the frame time.
*/

/// Fixed size cubic spline math: the tri-knot struct, tridiagonal solver, slope estimation and Hermite evaluation.
pub mod polyfit;

/// Geodetic normal vectors and ground elevation lookups.
pub mod geo;

/// Aircraft situations, their history, and the on ground state.
pub mod aviation;

/// The spline interpolator, its sample window, interpolant and diagnostics logging.
pub mod interpolation;

/// Length units used for altitudes and elevations.
pub mod units;

/// Configuration of the interpolation, loadable from YAML.
pub mod io;

mod errors;
/// The interpolator never panics: failures are recorded on the interpolant and reported via these errors.
pub use self::errors::InterpolationError;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::aviation::{Situation, SituationHistory};
pub use self::interpolation::{SplineInterpolant, SplineInterpolator};
pub use self::io::InterpolationSetup;
