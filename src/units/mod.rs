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

pub mod length;

pub use length::{Altitude, Feet, LengthUnit, Meters};

type Base = f64;

macro_rules! unit {
    ($me:ident, $abbrev:literal) => {
        impl $me {
            pub const fn new(base: $crate::units::Base) -> Self {
                $me(base)
            }

            /// Raw value in this unit
            pub const fn value(&self) -> $crate::units::Base {
                self.0
            }

            fn inner(&self) -> Base {
                self.0
            }
        }

        impl ::std::fmt::Debug for $me {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::result::Result<(), ::std::fmt::Error> {
                ::std::write!(f, "{}({})", ::std::stringify!($me), self.0)
            }
        }

        impl ::std::fmt::Display for $me {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::result::Result<(), ::std::fmt::Error> {
                ::std::write!(f, "{} {}", self.0, $abbrev)
            }
        }

        impl ::std::ops::Add for $me {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                $me(self.0 + rhs.0)
            }
        }

        impl ::std::ops::AddAssign for $me {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl ::std::ops::Sub for $me {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                $me(self.0 - rhs.0)
            }
        }

        impl ::std::ops::SubAssign for $me {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl ::std::ops::Mul<$crate::units::Base> for $me {
            type Output = Self;

            fn mul(self, rhs: $crate::units::Base) -> Self::Output {
                $me(self.0 * rhs)
            }
        }

        impl ::std::ops::Neg for $me {
            type Output = Self;

            fn neg(self) -> Self::Output {
                $me(-self.0)
            }
        }
    };
}

macro_rules! linear_conversion {
    ($factor:literal, $from:ident, $into:ident) => {
        impl std::convert::From<$from> for $into {
            fn from(value: $from) -> Self {
                let converted = $factor * value.inner();
                $into::new(converted)
            }
        }

        impl ::std::ops::Add<$from> for $into {
            type Output = Self;

            fn add(self, rhs: $from) -> Self::Output {
                let rhs: $into = rhs.into();
                self + rhs
            }
        }

        impl ::std::ops::Sub<$from> for $into {
            type Output = Self;

            fn sub(self, rhs: $from) -> Self::Output {
                let rhs: $into = rhs.into();
                self - rhs
            }
        }
    };
}

pub(crate) use linear_conversion;
pub(crate) use unit;
