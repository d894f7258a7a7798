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

use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use super::interpolant::SplineInterpolant;
use super::window::SampleWindow;
use crate::aviation::Situation;
use crate::io::{CreateFileSnafu, ExportError, FlushSnafu, WriteRecordSnafu};
use crate::time::Epoch;
use crate::units::LengthUnit;

/// Diagnostics of one interpolation step of one aircraft, one CSV row once exported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationLog {
    pub callsign: String,
    /// Frame time as an UTC epoch
    pub epoch: String,
    pub current_ms: i64,
    /// Interpolated time on the network clock
    pub interpolated_ms: i64,
    pub oldest_ms: i64,
    pub middle_ms: i64,
    pub newest_ms: i64,
    /// Duration of the interpolated interval
    pub delta_sample_times_ms: i64,
    pub time_fraction: f64,
    pub recalculated: bool,
    pub valid: bool,
    /// Empty when valid
    pub status: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub altitude_ft: Option<f64>,
    pub ground_factor: Option<f64>,
}

impl SituationLog {
    /// Records the window and the interpolant of the step at `now`, and the resulting situation if any
    pub fn new(
        callsign: &str,
        now: i64,
        window: &SampleWindow,
        interpolant: &SplineInterpolant,
        interpolated: Option<&Situation>,
    ) -> Self {
        Self {
            callsign: callsign.to_string(),
            epoch: format!("{}", Epoch::from_unix_milliseconds(now as f64)),
            current_ms: now,
            interpolated_ms: interpolant.interpolated_ms(),
            oldest_ms: window.oldest.adjusted_ms,
            middle_ms: window.middle.adjusted_ms,
            newest_ms: window.newest.adjusted_ms,
            delta_sample_times_ms: window.newest.adjusted_ms - window.middle.adjusted_ms,
            time_fraction: interpolant.time_fraction(),
            recalculated: interpolant.is_recalculated(),
            valid: interpolant.is_valid(),
            status: interpolant
                .status()
                .err()
                .map(|e| e.to_string())
                .unwrap_or_default(),
            latitude_deg: interpolated.map(|s| s.latitude_deg()),
            longitude_deg: interpolated.map(|s| s.longitude_deg()),
            altitude_ft: interpolated.map(|s| s.altitude.value_in(LengthUnit::Foot)),
            ground_factor: interpolated.and_then(|s| s.ground_factor()),
        }
    }
}

/// Keeps the latest situation logs in a bounded buffer, for export after a flight.
#[derive(Clone, Debug)]
pub struct InterpolationLogger {
    entries: VecDeque<SituationLog>,
    max_entries: usize,
}

impl InterpolationLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Adds a log, dropping the oldest one if full
    pub fn log(&mut self, entry: SituationLog) {
        if self.max_entries == 0 {
            return;
        }
        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &SituationLog> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&SituationLog> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes all logs to a CSV file with headers, oldest first
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        let file = File::create(path).context(CreateFileSnafu {
            path: path.to_path_buf(),
        })?;
        let mut wtr = csv::Writer::from_writer(file);
        for entry in &self.entries {
            wtr.serialize(entry).context(WriteRecordSnafu)?;
        }
        wtr.flush().context(FlushSnafu {
            path: path.to_path_buf(),
        })?;
        info!(
            "Saved {} interpolation logs to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for InterpolationLogger {
    fn default() -> Self {
        Self::new(1000)
    }
}
