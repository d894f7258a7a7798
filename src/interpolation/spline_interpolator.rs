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

use super::interpolant::SplineInterpolant;
use super::log::{InterpolationLogger, SituationLog};
use super::window::{SampleWindow, SampleWindowManager, WindowState};
use crate::aviation::{HistoryProvider, Situation, SituationHistory};
use crate::errors::InterpolationError;
use crate::geo::ElevationProvider;
use crate::io::{ConfigError, ConfigRepr, InterpolationSetup};
use crate::polyfit::TriKnot;
use crate::units::{LengthUnit, Meters};

/// Spline interpolator of one remote aircraft.
///
/// Called once per simulator frame with the frame time, it keeps the sample window and the fitted
/// interpolant between frames and only refits when the window moves on or the history changed.
#[derive(Clone, Debug)]
pub struct SplineInterpolator {
    callsign: String,
    setup: InterpolationSetup,
    model_cg: Option<Meters>,
    windows: SampleWindowManager,
    /// Snapshot of the history, refreshed when the provider reports a new revision
    situations: SituationHistory,
    revision_used: Option<u64>,
    last_situation: Situation,
    interpolant: SplineInterpolant,
    logger: InterpolationLogger,
    invalid_count: u64,
    last_invalid_log_ms: Option<i64>,
}

impl SplineInterpolator {
    /// Builds the interpolator of an aircraft. The setup is not checked, cf. [`Self::try_new`].
    pub fn new<S: Into<String>>(callsign: S, setup: InterpolationSetup) -> Self {
        let logger = InterpolationLogger::new(setup.max_log_entries);
        Self {
            callsign: callsign.into(),
            setup,
            model_cg: None,
            windows: SampleWindowManager::new(),
            situations: SituationHistory::new(),
            revision_used: None,
            last_situation: Situation::null(),
            interpolant: SplineInterpolant::default(),
            logger,
            invalid_count: 0,
            last_invalid_log_ms: None,
        }
    }

    /// Builds the interpolator of an aircraft after validating the setup
    pub fn try_new<S: Into<String>>(callsign: S, setup: InterpolationSetup) -> Result<Self, ConfigError> {
        setup.validate()?;
        Ok(Self::new(callsign, setup))
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn setup(&self) -> &InterpolationSetup {
        &self.setup
    }

    /// Sets the center of gravity of the rendered model, the ground clearance of a parked aircraft
    pub fn set_model_cg(&mut self, cg: Meters) {
        self.model_cg = Some(cg);
    }

    /// Center of gravity of the model, or the default of the setup if unknown
    pub fn model_cg(&self) -> Meters {
        self.model_cg.unwrap_or_else(|| self.setup.default_cg())
    }

    pub fn window(&self) -> &SampleWindow {
        self.windows.window()
    }

    pub fn window_state(&self) -> WindowState {
        self.windows.state()
    }

    /// Interpolant of the last step
    pub fn interpolant(&self) -> &SplineInterpolant {
        &self.interpolant
    }

    /// Last successfully interpolated situation, null if none
    pub fn last_situation(&self) -> &Situation {
        &self.last_situation
    }

    /// Forgets the last interpolated situation, e.g. after the aircraft was moved
    pub fn reset_last_interpolation(&mut self) {
        self.last_situation = Situation::null();
    }

    pub fn logger(&self) -> &InterpolationLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut InterpolationLogger {
        &mut self.logger
    }

    /// Number of steps which did not produce a situation
    pub fn invalid_count(&self) -> u64 {
        self.invalid_count
    }

    /// Returns the interpolant for the frame at `now`, refitting it if needed.
    ///
    /// The returned interpolant must be checked with `is_valid` before evaluating it.
    pub fn get_interpolant(
        &mut self,
        now: i64,
        history: &dyn HistoryProvider,
        elevations: &dyn ElevationProvider,
    ) -> &SplineInterpolant {
        self.step(now, history, elevations);
        if self.setup.logging_enabled {
            self.log_step(now, None);
        }
        &self.interpolant
    }

    /// Interpolates the situation of the aircraft at `now`, or `None` if this frame cannot be interpolated,
    /// in which case the aircraft should stay where it was last rendered.
    pub fn interpolated_situation(
        &mut self,
        now: i64,
        history: &dyn HistoryProvider,
        elevations: &dyn ElevationProvider,
    ) -> Option<Situation> {
        self.step(now, history, elevations);
        let situation = match self.situation_from_interpolant(now) {
            Ok(situation) => {
                self.last_situation = situation.clone();
                Some(situation)
            }
            Err(e) => {
                self.report_invalid(now, &e);
                None
            }
        };
        if self.setup.logging_enabled {
            self.log_step(now, situation.as_ref());
        }
        situation
    }

    /// Looks up the ground elevation of the window situations which do not have one yet.
    ///
    /// With `can_skip`, situations which are very likely far from the ground are not looked up. Returns true
    /// if any elevation was set.
    pub fn update_elevations(&mut self, elevations: &dyn ElevationProvider, can_skip: bool) -> bool {
        let radius = self.setup.elevation_search_radius();
        let mut updated = false;
        for situation in self.windows.window_mut().iter_mut() {
            if situation.is_null() || situation.has_ground_elevation() {
                continue;
            }
            if can_skip && situation.can_likely_skip_near_ground_interpolation() {
                continue;
            }
            let plane = elevations.find_closest_elevation_within_range(&situation.normal, radius);
            updated |= situation.set_ground_elevation_checked(plane);
        }
        updated
    }

    fn step(&mut self, now: i64, history: &dyn HistoryProvider, elevations: &dyn ElevationProvider) {
        let revision = history.revision(&self.callsign);
        let first = self.revision_used.is_none();
        let modified = self.revision_used != Some(revision);
        if modified {
            self.situations = history.situations(&self.callsign);
        }

        let recalculate = first || modified || now >= self.interpolant.next_knot_ms();
        if recalculate {
            self.revision_used = Some(revision);
            if self.situations.is_empty() {
                self.last_situation = Situation::null();
            }
            let has_newer = self.windows.refresh(
                &self.situations,
                now,
                &self.last_situation,
                self.setup.interim_position_offset_ms(),
            );
            if !has_newer {
                let window = self.windows.window();
                // Knots sharing a time, e.g. from a zero offset, rather than a lack of data
                let error = if self.windows.state() != WindowState::Empty && !window.is_sorted() {
                    InterpolationError::DegenerateTimeInterval {
                        prev_ms: window.middle.adjusted_ms,
                        next_ms: window.newest.adjusted_ms,
                    }
                } else {
                    InterpolationError::InsufficientData
                };
                self.interpolant = SplineInterpolant::invalid(error);
                self.interpolant.set_times(now, 0.0, now, false);
                return;
            }

            self.update_elevations(elevations, true);
            let cg = self.model_cg();
            let near_ground = self.setup.near_ground_delta();
            let unit = LengthUnit::default();
            let window = self.windows.window();
            let altitude = |s: &Situation| s.corrected_altitude(cg, near_ground).value_in(unit);
            let altitudes = TriKnot::new(
                altitude(&window.oldest),
                altitude(&window.middle),
                altitude(&window.newest),
            );
            self.interpolant = SplineInterpolant::fit(window, altitudes, unit);
            debug!(
                "{}: refitted {} ({:?}) at {now} ms",
                self.callsign,
                window,
                self.windows.state()
            );
        }

        let prev = self.interpolant.prev_knot_ms();
        let next = self.interpolant.next_knot_ms();
        let dt1 = (now - prev) as f64;
        let dt2 = (next - prev) as f64;
        if cfg!(debug_assertions) && self.interpolant.is_valid() {
            if dt1 < 0.0 {
                warn!("{}: frame at {now} ms before the previous knot at {prev} ms", self.callsign);
            }
            if dt2 <= 0.0 {
                warn!("{}: knots at {prev} ms and {next} ms are not increasing", self.callsign);
            }
        }
        let fraction = dt1 / dt2;
        let prev_raw = self.interpolant.pbh().start_situation().raw_or_adjusted_ms();
        let interpolated_ms =
            prev_raw + (super::clamp_valid_time_fraction(fraction) * dt2).round() as i64;
        self.interpolant.set_times(
            now,
            fraction,
            interpolated_ms,
            self.setup.strict_time_fraction,
        );
        self.interpolant.set_recalculated(recalculate);
    }

    /// Builds the rendered situation from the current step of the interpolant
    fn situation_from_interpolant(&self, now: i64) -> Result<Situation, InterpolationError> {
        let interpolant = &self.interpolant;
        let position = interpolant.interpolate_position_and_altitude()?;
        let pbh = interpolant.pbh();

        let mut situation = pbh.start_situation().clone();
        situation.callsign = self.callsign.clone();
        situation.normal = position.normal;
        situation.altitude = position.altitude;
        situation.adjusted_ms = now;
        situation.raw_ms = Some(interpolant.interpolated_ms());
        situation.heading_deg = pbh.heading_deg();
        situation.pitch_deg = pbh.pitch_deg();
        situation.bank_deg = pbh.bank_deg();
        situation.ground_speed_kts = pbh.ground_speed_kts();
        situation.on_ground = interpolant.interpolate_ground_factor();

        // Keep the elevation of either end if it still covers the new position
        situation.ground_elevation = None;
        let planes = [
            pbh.start_situation().ground_elevation,
            pbh.end_situation().ground_elevation,
        ];
        for plane in planes.into_iter().flatten() {
            if situation.set_ground_elevation_checked(Some(plane)) {
                break;
            }
        }
        Ok(situation)
    }

    /// Counts the invalid step and warns, at most once per time offset of the aircraft
    fn report_invalid(&mut self, now: i64, error: &InterpolationError) {
        self.invalid_count += 1;
        let quiet_ms = self
            .setup
            .interim_position_offset_ms()
            .max(self.last_situation.time_offset_ms);
        let due = match self.last_invalid_log_ms {
            Some(last) => now - last > quiet_ms,
            None => true,
        };
        if due {
            self.last_invalid_log_ms = Some(now);
            if self.last_situation.is_null() {
                warn!(
                    "{}: no situation #{} for interpolation: {error}",
                    self.callsign, self.invalid_count
                );
            } else {
                warn!(
                    "{}: invalid situation #{} for interpolation, {} ms after the last one: {error}",
                    self.callsign,
                    self.invalid_count,
                    now - self.last_situation.adjusted_ms
                );
            }
        }
    }

    fn log_step(&mut self, now: i64, situation: Option<&Situation>) {
        let entry = SituationLog::new(
            &self.callsign,
            now,
            self.windows.window(),
            &self.interpolant,
            situation,
        );
        self.logger.log(entry);
    }
}
