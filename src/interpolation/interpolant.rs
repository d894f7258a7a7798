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

use snafu::ensure;

use super::pbh::LinearPbh;
use super::window::SampleWindow;
use super::{clamp_valid_time_fraction, is_acceptable_time_fraction, Channel};
use crate::aviation::{blend_ground_factor, OnGroundInfo};
use crate::errors::{
    DegenerateTimeIntervalSnafu, InterpolationError, InvalidVectorSnafu, NonFiniteSnafu,
};
use crate::geo::{is_valid_vector, GeodeticPosition};
use crate::linalg::Vector3;
use crate::polyfit::{ChannelSpline, Interval, TriKnot};
use crate::units::{Altitude, LengthUnit};

/// The interpolated interval, i.e. [middle; newest]
const INTERVAL: Interval = Interval::Newer;

/// The fitted spline of a sample window, evaluated for the current frame.
///
/// An interpolant is rebuilt from scratch on every recompute, and the per frame evaluation only moves its
/// query time. A failed fit invalidates it until the next refit, whereas a failed evaluation only invalidates
/// the frame it happened in. An invalid interpolant must not be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineInterpolant {
    x: ChannelSpline,
    y: ChannelSpline,
    z: ChannelSpline,
    altitude: ChannelSpline,
    /// Unknown if any of the knots has no ground factor
    ground_factor: Option<ChannelSpline>,
    altitude_unit: LengthUnit,
    pbh: LinearPbh,
    current_ms: i64,
    time_fraction: f64,
    interpolated_ms: i64,
    recalculated: bool,
    /// Set by the fit, kept until the next refit
    fit_error: Option<InterpolationError>,
    /// Set by the evaluation of the current frame only
    frame_error: Option<InterpolationError>,
}

impl SplineInterpolant {
    /// An interpolant which may not be used, e.g. before the first fit
    pub fn invalid(error: InterpolationError) -> Self {
        Self {
            x: ChannelSpline::default(),
            y: ChannelSpline::default(),
            z: ChannelSpline::default(),
            altitude: ChannelSpline::default(),
            ground_factor: None,
            altitude_unit: LengthUnit::default(),
            pbh: LinearPbh::default(),
            current_ms: 0,
            time_fraction: 0.0,
            interpolated_ms: 0,
            recalculated: false,
            fit_error: Some(error),
            frame_error: None,
        }
    }

    /// Fits the five channels through the knots of the window.
    ///
    /// The altitudes are provided separately since they may have been corrected to the ground, in `altitude_unit`.
    pub fn fit(window: &SampleWindow, altitudes: TriKnot, altitude_unit: LengthUnit) -> Self {
        let times = window.times();
        let ground_factor = match (
            window.oldest.ground_factor(),
            window.middle.ground_factor(),
            window.newest.ground_factor(),
        ) {
            (Some(g0), Some(g1), Some(g2)) => {
                Some(ChannelSpline::fit(times, TriKnot::new(g0, g1, g2)))
            }
            _ => None,
        };

        let mut me = Self {
            x: ChannelSpline::fit(times, window.normal_component(0)),
            y: ChannelSpline::fit(times, window.normal_component(1)),
            z: ChannelSpline::fit(times, window.normal_component(2)),
            altitude: ChannelSpline::fit(times, altitudes),
            ground_factor,
            altitude_unit,
            pbh: LinearPbh::new(window.middle.clone(), window.newest.clone()),
            current_ms: window.middle.adjusted_ms,
            time_fraction: 0.0,
            interpolated_ms: window.middle.raw_or_adjusted_ms(),
            recalculated: true,
            fit_error: None,
            frame_error: None,
        };
        me.fit_error = me.check_fit().err();
        if let Some(e) = &me.fit_error {
            if cfg!(debug_assertions) {
                warn!("invalid fit of {window}: {e}");
            }
        }
        me
    }

    fn check_fit(&self) -> Result<(), InterpolationError> {
        for (channel, spline) in [
            (Channel::X, &self.x),
            (Channel::Y, &self.y),
            (Channel::Z, &self.z),
            (Channel::Altitude, &self.altitude),
        ] {
            ensure!(spline.is_finite(), NonFiniteSnafu { channel });
        }
        if let Some(gf) = &self.ground_factor {
            ensure!(
                gf.is_finite(),
                NonFiniteSnafu {
                    channel: Channel::GroundFactor
                }
            );
        }

        let (t1, t2) = (self.prev_knot_ms(), self.next_knot_ms());
        ensure!(
            t1 < t2,
            DegenerateTimeIntervalSnafu {
                prev_ms: t1,
                next_ms: t2
            }
        );

        for i in 0..3 {
            let knot = Vector3::new(self.x.values[i], self.y.values[i], self.z.values[i]);
            ensure!(
                is_valid_vector(&knot),
                InvalidVectorSnafu {
                    x: knot.x,
                    y: knot.y,
                    z: knot.z
                }
            );
        }
        Ok(())
    }

    /// Adjusted time of the middle knot, start of the interpolated interval
    pub fn prev_knot_ms(&self) -> i64 {
        self.x.times.middle as i64
    }

    /// Adjusted time of the newest knot, end of the interpolated interval
    pub fn next_knot_ms(&self) -> i64 {
        self.x.times.newest as i64
    }

    pub fn knot_times(&self) -> TriKnot {
        self.x.times
    }

    /// Sets the frame time, its fraction of the interpolated interval and the matching interpolated time.
    ///
    /// In strict mode, a fraction outside of [0; 1] flags the frame as stale, otherwise it is clamped.
    /// The position at the query time is validated right away so that `is_valid` covers it. The outcome of the
    /// previous frame is discarded.
    pub fn set_times(&mut self, current_ms: i64, time_fraction: f64, interpolated_ms: i64, strict: bool) {
        self.current_ms = current_ms;
        self.interpolated_ms = interpolated_ms;
        self.frame_error = None;
        if self.fit_error.is_some() {
            return;
        }
        if strict && !(0.0..=1.0).contains(&time_fraction) {
            self.frame_error = Some(InterpolationError::OutOfRangeTimeFraction {
                fraction: time_fraction,
            });
            return;
        }
        if cfg!(debug_assertions) && !is_acceptable_time_fraction(time_fraction) {
            warn!(
                "time fraction {time_fraction} at {current_ms} ms outside of [{}; {}]",
                self.prev_knot_ms(),
                self.next_knot_ms()
            );
        }
        self.time_fraction = clamp_valid_time_fraction(time_fraction);
        self.pbh.set_time_fraction(self.time_fraction);

        if let Err(e) = self.evaluate_at(self.query_time()) {
            if cfg!(debug_assertions) {
                warn!("invalid interpolation at {current_ms} ms: {e}");
            }
            self.frame_error = Some(e);
        }
    }

    pub fn set_recalculated(&mut self, recalculated: bool) {
        self.recalculated = recalculated;
    }

    /// Returns true if the coefficients were fitted in the last step
    pub fn is_recalculated(&self) -> bool {
        self.recalculated
    }

    pub fn is_valid(&self) -> bool {
        self.fit_error.is_none() && self.frame_error.is_none()
    }

    /// Reason why this interpolant is invalid for the current frame, if it is
    pub fn status(&self) -> Result<(), InterpolationError> {
        match self.fit_error.as_ref().or(self.frame_error.as_ref()) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    pub fn current_ms(&self) -> i64 {
        self.current_ms
    }

    pub fn time_fraction(&self) -> f64 {
        self.time_fraction
    }

    /// Interpolated time on the network clock, i.e. without the time offsets
    pub fn interpolated_ms(&self) -> i64 {
        self.interpolated_ms
    }

    pub fn altitude_unit(&self) -> LengthUnit {
        self.altitude_unit
    }

    /// Adjusted time at which the channels are evaluated, the frame time clamped into the interval
    pub fn query_time(&self) -> f64 {
        let t1 = self.x.times.middle;
        let t2 = self.x.times.newest;
        t1 + self.time_fraction * (t2 - t1)
    }

    /// Evaluates the position and altitude at the adjusted time `t_ms` on the [middle; newest] interval.
    ///
    /// Pure: it does not depend on the query time, and the same `t_ms` always gives the same result.
    pub fn evaluate_at(&self, t_ms: f64) -> Result<GeodeticPosition, InterpolationError> {
        if let Some(e) = &self.fit_error {
            return Err(e.clone());
        }
        let normal = Vector3::new(
            self.x.eval_interval(INTERVAL, t_ms),
            self.y.eval_interval(INTERVAL, t_ms),
            self.z.eval_interval(INTERVAL, t_ms),
        );
        ensure!(
            is_valid_vector(&normal),
            InvalidVectorSnafu {
                x: normal.x,
                y: normal.y,
                z: normal.z
            }
        );
        let altitude = self.altitude.eval_interval(INTERVAL, t_ms);
        ensure!(
            altitude.is_finite(),
            NonFiniteSnafu {
                channel: Channel::Altitude
            }
        );
        Ok(GeodeticPosition {
            normal,
            altitude: Altitude::new(altitude, self.altitude_unit),
        })
    }

    /// Position and altitude at the query time of the current frame
    pub fn interpolate_position_and_altitude(&self) -> Result<GeodeticPosition, InterpolationError> {
        self.status()?;
        self.evaluate_at(self.query_time())
    }

    /// Velocity of the normal vector at the query time, per millisecond
    pub fn normal_velocity(&self) -> Result<Vector3<f64>, InterpolationError> {
        self.status()?;
        let t = self.query_time();
        Ok(Vector3::new(
            self.x.eval_slope(t),
            self.y.eval_slope(t),
            self.z.eval_slope(t),
        ))
    }

    /// Ground state at the query time of the current frame, unknown if invalid or if a knot has no ground factor
    pub fn interpolate_ground_factor(&self) -> OnGroundInfo {
        if !self.is_valid() {
            return OnGroundInfo::unknown();
        }
        match &self.ground_factor {
            Some(gf) => blend_ground_factor(
                self.query_time(),
                gf.times.middle,
                gf.times.newest,
                gf.values.middle,
                gf.values.newest,
                gf.slopes.middle,
                gf.slopes.newest,
            ),
            None => OnGroundInfo::unknown(),
        }
    }

    /// Pitch, bank, heading and ground speed interpolation
    pub fn pbh(&self) -> &LinearPbh {
        &self.pbh
    }
}

impl Default for SplineInterpolant {
    fn default() -> Self {
        Self::invalid(InterpolationError::InsufficientData)
    }
}

impl fmt::Display for SplineInterpolant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.status() {
            Err(e) => write!(f, "invalid spline interpolant: {e}"),
            Ok(()) => write!(
                f,
                "spline interpolant over {} at {} ms (fraction {:.3}, recalculated: {})",
                self.x.times, self.current_ms, self.time_fraction, self.recalculated
            ),
        }
    }
}
