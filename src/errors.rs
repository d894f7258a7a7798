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

use snafu::prelude::*;

use crate::interpolation::Channel;

/// Reasons for which an interpolant cannot be used for rendering in the current frame.
///
/// None of these are fatal: the interpolant is flagged invalid, the aircraft is skipped for this frame,
/// and the next frame retries with fresh data.
#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InterpolationError {
    /// No history sample is available, or the interpolant was never fitted
    #[snafu(display("no situation available for interpolation"))]
    InsufficientData,
    /// Two enclosing knots share (or nearly share) a timestamp
    #[snafu(display(
        "degenerate time interval between knots at {prev_ms} ms and {next_ms} ms"
    ))]
    DegenerateTimeInterval { prev_ms: i64, next_ms: i64 },
    /// Query time outside of the enclosing knots, only reported in strict mode
    #[snafu(display("time fraction {fraction} is outside of [0; 1], the window is stale"))]
    OutOfRangeTimeFraction { fraction: f64 },
    /// Normal vector component outside of the tolerated range
    #[snafu(display("invalid normal vector ({x}, {y}, {z})"))]
    InvalidVector { x: f64, y: f64, z: f64 },
    /// A fitted value or slope is NaN or infinite
    #[snafu(display("non finite coefficient in the {channel} channel"))]
    NonFinite { channel: Channel },
}
