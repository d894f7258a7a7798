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

use crate::aviation::{Situation, SituationHistory};
use crate::polyfit::TriKnot;

/// Share of the time offset by which the oldest knot must precede the middle knot, avoids two very close knots
const NOT_TOO_CLOSE_RATIO: f64 = 0.8;

/// Where the knots of the sample window come from
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WindowState {
    /// Nothing known, all three knots are null situations
    #[default]
    Empty,
    /// Knots built from a single situation shifted in time
    Synthesized,
    /// At least one knot is a distinct situation from the history
    Real,
}

/// Three situations ordered by adjusted time, from the oldest to the newest.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleWindow {
    pub oldest: Situation,
    pub middle: Situation,
    pub newest: Situation,
}

impl SampleWindow {
    /// The same situation at the three knots
    pub fn splat(situation: Situation) -> Self {
        Self {
            oldest: situation.clone(),
            middle: situation.clone(),
            newest: situation,
        }
    }

    pub fn null() -> Self {
        Self::splat(Situation::null())
    }

    /// Adjusted times of the knots, in milliseconds
    pub fn times(&self) -> TriKnot {
        TriKnot::new(
            self.oldest.adjusted_ms as f64,
            self.middle.adjusted_ms as f64,
            self.newest.adjusted_ms as f64,
        )
    }

    /// Normal vector component `i` (0 for x, 1 for y, 2 for z) of the knots
    pub fn normal_component(&self, i: usize) -> TriKnot {
        TriKnot::new(self.oldest.normal[i], self.middle.normal[i], self.newest.normal[i])
    }

    /// Returns true if the adjusted times strictly increase from the oldest to the newest knot
    pub fn is_sorted(&self) -> bool {
        self.oldest.adjusted_ms < self.middle.adjusted_ms
            && self.middle.adjusted_ms < self.newest.adjusted_ms
    }

    pub fn are_any_elevations_missing(&self) -> bool {
        self.iter().any(|s| !s.has_ground_elevation())
    }

    /// Returns true if any knot may be close enough to the ground for the elevation to matter
    pub fn is_any_situation_near_ground_relevant(&self) -> bool {
        self.iter()
            .any(|s| !s.can_likely_skip_near_ground_interpolation())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Situation> {
        [&self.oldest, &self.middle, &self.newest].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Situation> {
        [&mut self.oldest, &mut self.middle, &mut self.newest].into_iter()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for SampleWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "window [{} ms, {} ms, {} ms]",
            self.oldest.adjusted_ms, self.middle.adjusted_ms, self.newest.adjusted_ms
        )
    }
}

/// Maintains the rolling three situation window of one aircraft.
///
/// The window always spans around the last interpolated situation: the middle knot is where the aircraft
/// currently is, the newest knot where it is heading, and the oldest knot where it came from.
#[derive(Clone, Debug, Default)]
pub struct SampleWindowManager {
    window: SampleWindow,
    state: WindowState,
}

impl SampleWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut SampleWindow {
        &mut self.window
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Rebuilds the window around `last` (the last interpolated situation, possibly null) at time `now`.
    ///
    /// The knots are spaced by the larger of `interim_offset_ms` and the time offset of the aircraft. Returns
    /// true if the newest knot is ahead of `now`, i.e. the window has data to interpolate towards.
    pub fn refresh(
        &mut self,
        history: &SituationHistory,
        now: i64,
        last: &Situation,
        interim_offset_ms: i64,
    ) -> bool {
        // Adjusted time of the history situation the seed was copied from
        let mut seeded_from = None;
        let seed = if last.is_null() {
            match history.latest() {
                Some(latest) => {
                    seeded_from = Some(latest.adjusted_ms);
                    let mut seed = latest.clone();
                    seed.adjusted_ms = now;
                    seed
                }
                None => {
                    self.window = SampleWindow::null();
                    self.state = WindowState::Empty;
                    return false;
                }
            }
        } else {
            last.clone()
        };

        let mut window = SampleWindow::splat(seed);
        let offset = interim_offset_ms.max(window.newest.time_offset_ms);
        window.oldest.add_msecs(-offset);
        window.newest.add_msecs(offset);
        let mut state = WindowState::Synthesized;

        if history.is_empty() {
            self.window = window;
            self.state = state;
            return false;
        }

        if let Some(latest) = history.latest() {
            if latest.is_newer_than_adjusted(&window.middle) {
                window.newest = latest.clone();
                if seeded_from != Some(latest.adjusted_ms) {
                    state = WindowState::Real;
                }
            }
        }

        let middle_ms = window.middle.adjusted_ms;
        let not_too_close = (NOT_TOO_CLOSE_RATIO * offset as f64).round() as i64;
        // The fallback must stay strictly older than the middle knot, otherwise both knots would share a time
        let older = history
            .find_before_adjusted(middle_ms - not_too_close)
            .or_else(|| history.find_before_adjusted(middle_ms - 1));
        if let Some(older) = older {
            if seeded_from != Some(older.adjusted_ms) {
                state = WindowState::Real;
            }
            window.oldest = older.clone();
        }

        if cfg!(debug_assertions) && !window.is_sorted() {
            warn!(
                "unverified situations for {}, oldest to latest: {} {} {}",
                window.middle.callsign,
                window.oldest.adjusted_ms,
                window.middle.adjusted_ms,
                window.newest.adjusted_ms
            );
        }

        let has_newer = window.newest.adjusted_ms > now;
        self.window = window;
        self.state = state;
        has_newer
    }
}
