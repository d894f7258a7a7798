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

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use super::Situation;

/// How many situations are kept per callsign
pub const MAX_SITUATIONS_PER_CALLSIGN: usize = 50;

/// Situations of one aircraft, latest first by adjusted time, bounded in size.
///
/// The interpolator only ever works on such a history as a snapshot: it is cloned out of the store
/// written by the network, so no lock is held while fitting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SituationHistory {
    situations: VecDeque<Situation>,
    /// Incremented on every modification
    revision: u64,
}

impl SituationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from situations in any order
    pub fn from_situations<I: IntoIterator<Item = Situation>>(situations: I) -> Self {
        let mut me = Self::new();
        for situation in situations {
            me.push(situation);
        }
        me
    }

    /// Inserts a situation, keeping the latest first order. A situation with the same adjusted time as an
    /// existing one replaces it. The oldest situations are dropped beyond the maximum size.
    pub fn push(&mut self, situation: Situation) {
        if situation.is_null() {
            warn!("ignoring null situation for {}", situation.callsign);
            return;
        }
        // Index of the first situation which is not newer than the new one
        let idx = self
            .situations
            .partition_point(|s| s.adjusted_ms > situation.adjusted_ms);
        match self.situations.get(idx) {
            Some(existing) if existing.adjusted_ms == situation.adjusted_ms => {
                self.situations[idx] = situation;
            }
            _ => {
                if idx > 0 {
                    debug!(
                        "out of order situation for {} at {} ms, {} newer situations known",
                        situation.callsign, situation.adjusted_ms, idx
                    );
                }
                self.situations.insert(idx, situation);
            }
        }
        self.situations.truncate(MAX_SITUATIONS_PER_CALLSIGN);
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.situations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.situations.is_empty()
    }

    /// Modification counter, changes whenever a situation is pushed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Latest situation
    pub fn latest(&self) -> Option<&Situation> {
        self.situations.front()
    }

    /// Oldest situation still kept
    pub fn oldest(&self) -> Option<&Situation> {
        self.situations.back()
    }

    /// Up to `n` situations not newer than `up_to_ms`, latest first
    pub fn latest_n(&self, n: usize, up_to_ms: i64) -> Vec<Situation> {
        self.situations
            .iter()
            .filter(|s| s.adjusted_ms <= up_to_ms)
            .take(n)
            .cloned()
            .collect()
    }

    /// Latest situation whose adjusted time is at or before `adjusted_ms`
    pub fn find_before_adjusted(&self, adjusted_ms: i64) -> Option<&Situation> {
        self.situations.iter().find(|s| s.adjusted_ms <= adjusted_ms)
    }

    /// Iterates from the latest to the oldest situation
    pub fn iter(&self) -> impl Iterator<Item = &Situation> {
        self.situations.iter()
    }

    /// Returns true if the adjusted times are strictly decreasing
    pub fn is_sorted_latest_first(&self) -> bool {
        self.situations
            .iter()
            .zip(self.situations.iter().skip(1))
            .all(|(newer, older)| newer.adjusted_ms > older.adjusted_ms)
    }
}

/// Source of the situation histories of the remote aircraft, implemented by the network side.
pub trait HistoryProvider {
    /// Snapshot of the situations of this callsign, latest first
    fn situations(&self, callsign: &str) -> SituationHistory;

    /// Revision of the history of this callsign, used to skip the snapshot when nothing changed
    fn revision(&self, callsign: &str) -> u64;
}

/// Histories of all aircraft, with the store wide generation at which each one was last modified
#[derive(Debug, Default)]
struct HistoryStore {
    histories: HashMap<String, SituationHistory>,
    revisions: HashMap<String, u64>,
    /// Incremented on every push and removal, never reset
    generation: u64,
}

/// Thread safe store of all histories: the network thread pushes, and each interpolator takes snapshots.
///
/// The lock is only held for the time of the push or of the copy, never during the spline fit. Revisions
/// come from a store wide generation, so an aircraft removed and added again never reuses a revision.
#[derive(Clone, Debug, Default)]
pub struct SharedHistory {
    inner: Arc<RwLock<HistoryStore>>,
}

impl SharedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, situation: Situation) {
        match self.inner.write() {
            Ok(mut store) => {
                store.generation += 1;
                let generation = store.generation;
                store
                    .revisions
                    .insert(situation.callsign.clone(), generation);
                store
                    .histories
                    .entry(situation.callsign.clone())
                    .or_default()
                    .push(situation);
            }
            Err(e) => error!("situation history lock poisoned: {e}"),
        }
    }

    /// Forgets an aircraft, e.g. when it disconnects
    pub fn remove(&self, callsign: &str) -> Option<SituationHistory> {
        match self.inner.write() {
            Ok(mut store) => {
                store.generation += 1;
                store.revisions.remove(callsign);
                store.histories.remove(callsign)
            }
            Err(e) => {
                error!("situation history lock poisoned: {e}");
                None
            }
        }
    }

    pub fn callsigns(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|store| store.histories.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl HistoryProvider for SharedHistory {
    fn situations(&self, callsign: &str) -> SituationHistory {
        self.inner
            .read()
            .ok()
            .and_then(|store| store.histories.get(callsign).cloned())
            .unwrap_or_default()
    }

    /// Generation of the last modification of this callsign, zero if unknown
    fn revision(&self, callsign: &str) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|store| store.revisions.get(callsign).copied())
            .unwrap_or_default()
    }
}

impl HistoryProvider for SituationHistory {
    fn situations(&self, callsign: &str) -> SituationHistory {
        match self.latest() {
            Some(latest) if latest.callsign != callsign => SituationHistory::new(),
            _ => self.clone(),
        }
    }

    fn revision(&self, _callsign: &str) -> u64 {
        self.revision
    }
}
