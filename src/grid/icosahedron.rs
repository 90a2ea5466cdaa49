//! Level-0 seed of the grid: a regular icosahedron inscribed in the unit sphere.
//!
//! The 12 corners are the cyclic permutations of `(±a, ±b, 0)` where
//! `a / b` is the golden ratio. The 20 faces are listed so that:
//! - every triple winds counter-clockwise seen from outside the sphere;
//! - faces `2k` and `2k + 1` form a pair, which level-0 partner lookup uses.

use crate::geom::sphere::{Real, Vec3};

pub const NUM_CORNERS: usize = 12;
pub const NUM_FACES: usize = 20;

/// Corner indices of each base triangle.
pub const FACES: [[usize; 3]; NUM_FACES] = [
    [1, 0, 10],
    [0, 1, 9],
    [0, 9, 6],
    [9, 8, 6],
    [0, 7, 10],
    [6, 7, 0],
    [7, 6, 3],
    [6, 8, 3],
    [11, 10, 7],
    [7, 3, 11],
    [3, 2, 11],
    [2, 3, 8],
    [10, 11, 4],
    [2, 4, 11],
    [5, 4, 2],
    [2, 8, 5],
    [4, 1, 10],
    [4, 5, 1],
    [5, 9, 1],
    [8, 9, 5],
];

/// The 12 unit-length corners, computed in double precision and narrowed to `F`.
pub fn corners<F: Real>() -> [Vec3<F>; NUM_CORNERS] {
    let g = 0.5 * (1.0 + 5f64.sqrt());
    let b = 1.0 / (1.0 + g * g).sqrt();
    let a = b * g;

    let raw: [[f64; 3]; NUM_CORNERS] = [
        [a, -b, 0.0],
        [a, b, 0.0],
        [-a, b, 0.0],
        [-a, -b, 0.0],
        [0.0, a, -b],
        [0.0, a, b],
        [0.0, -a, b],
        [0.0, -a, -b],
        [-b, 0.0, a],
        [b, 0.0, a],
        [b, 0.0, -a],
        [-b, 0.0, -a],
    ];
    raw.map(|c| c.map(F::from_f64_lossy))
}
