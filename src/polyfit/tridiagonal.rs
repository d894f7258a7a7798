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

use crate::linalg::{Matrix3, Vector3};

/// Solves `matrix * x = d` for a tridiagonal 3x3 matrix with the Thomas algorithm.
///
/// Both inputs are consumed: the super diagonal of `matrix` and all of `d` are overwritten during the
/// forward sweep, and `d` holds the solution at the end, which is also returned.
///
/// There is no singularity check. The callers build diagonally dominant systems from strictly increasing
/// knot times; if the knot times are not increasing, the divisions yield infinities or NaNs which are
/// caught by the validity checks of the interpolant.
///
/// Reference: <https://en.wikipedia.org/wiki/Tridiagonal_matrix_algorithm>
pub fn solve_tridiagonal(matrix: &mut Matrix3<f64>, d: &mut Vector3<f64>) -> Vector3<f64> {
    // Forward sweep
    matrix[(0, 1)] /= matrix[(0, 0)];
    d[0] /= matrix[(0, 0)];
    for i in 1..3 {
        let denom = matrix[(i, i)] - matrix[(i, i - 1)] * matrix[(i - 1, i)];
        if i < 2 {
            matrix[(i, i + 1)] /= denom;
        }
        d[i] = (d[i] - matrix[(i, i - 1)] * d[i - 1]) / denom;
    }

    // Back substitution
    for i in (0..2).rev() {
        d[i] -= matrix[(i, i + 1)] * d[i + 1];
    }

    *d
}

#[test]
fn tridiagonal_matches_lu() {
    let a = Matrix3::new(4.0, 1.0, 0.0, 1.0, 4.0, 1.0, 0.0, 1.0, 4.0);
    let b = Vector3::new(5.0, 6.0, 5.0);

    let expected = a.lu().solve(&b).unwrap();

    let mut m = a;
    let mut d = b;
    let x = solve_tridiagonal(&mut m, &mut d);

    assert!((x - expected).norm() < 1e-14, "{x} != {expected}");
    assert!((a * x - b).norm() < 1e-14);
    // The right hand side is consumed and holds the solution
    assert_eq!(d, x);
}

#[test]
fn tridiagonal_singular_does_not_panic() {
    let mut m = Matrix3::zeros();
    let mut d = Vector3::new(1.0, 1.0, 1.0);
    let x = solve_tridiagonal(&mut m, &mut d);
    assert!(x.iter().any(|v| !v.is_finite()));
}
