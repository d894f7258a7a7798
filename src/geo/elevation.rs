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

use serde::{Deserialize, Serialize};

use super::great_circle_distance;
use crate::linalg::Vector3;
use crate::units::{Altitude, Meters};

/// Ground elevation known around a position, valid within its radius
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElevationPlane {
    pub normal: Vector3<f64>,
    pub elevation: Altitude,
    pub radius: Meters,
}

impl ElevationPlane {
    pub fn new(normal: Vector3<f64>, elevation: Altitude, radius: Meters) -> Self {
        Self {
            normal,
            elevation,
            radius,
        }
    }

    /// Returns true if the position is within the radius of this plane
    pub fn is_within_range(&self, normal: &Vector3<f64>) -> bool {
        great_circle_distance(&self.normal, normal) <= self.radius
    }
}

/// Ground elevation lookup of the simulator terrain.
///
/// The interpolator calls this from the frame callback and cannot wait: implementations must answer from
/// memory, and return `None` rather than block when the answer would need disk or network access.
pub trait ElevationProvider {
    /// Closest known elevation plane within `range` of the provided normal vector
    fn find_closest_elevation_within_range(
        &self,
        normal: &Vector3<f64>,
        range: Meters,
    ) -> Option<ElevationPlane>;
}

/// Provider for simulators without terrain probing, never knows the elevation
#[derive(Copy, Clone, Debug, Default)]
pub struct NoElevation;

impl ElevationProvider for NoElevation {
    fn find_closest_elevation_within_range(
        &self,
        _normal: &Vector3<f64>,
        _range: Meters,
    ) -> Option<ElevationPlane> {
        None
    }
}

/// A bounded, in memory cache of elevation planes, oldest entries are evicted first
#[derive(Clone, Debug)]
pub struct ElevationCache {
    planes: VecDeque<ElevationPlane>,
    capacity: usize,
}

impl ElevationCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            planes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn insert(&mut self, plane: ElevationPlane) {
        if self.capacity == 0 {
            return;
        }
        while self.planes.len() >= self.capacity {
            self.planes.pop_front();
        }
        self.planes.push_back(plane);
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

impl Default for ElevationCache {
    fn default() -> Self {
        Self::with_capacity(1000)
    }
}

impl ElevationProvider for ElevationCache {
    fn find_closest_elevation_within_range(
        &self,
        normal: &Vector3<f64>,
        range: Meters,
    ) -> Option<ElevationPlane> {
        self.planes
            .iter()
            .map(|plane| (great_circle_distance(&plane.normal, normal), plane))
            .filter(|(distance, plane)| *distance <= range && *distance <= plane.radius)
            .min_by(|(d1, _), (d2, _)| d1.value().total_cmp(&d2.value()))
            .map(|(_, plane)| *plane)
    }
}
