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

mod ground;
mod history;
mod situation;

pub use ground::{
    blend_ground_factor, is_gf_equal_airborne, is_gf_equal_on_ground, GroundDetails, OnGround,
    OnGroundInfo,
};
pub use history::{HistoryProvider, SharedHistory, SituationHistory, MAX_SITUATIONS_PER_CALLSIGN};
pub use situation::Situation;
