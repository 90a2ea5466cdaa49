use std::fmt::Debug;

use num_traits::{Float, FloatConst};

/// A direction in 3-space, usually a point on the unit sphere.
pub type Vec3<F = f64> = [F; 3];

/// Scalar type the grid can be built over.
///
/// `f64` is the default everywhere; `f32` halves the memory of a deep grid at
/// the cost of precision near zone boundaries.
pub trait Real: Float + FloatConst + Debug + Default + Send + Sync + 'static {
    fn from_f64_lossy(v: f64) -> Self;
    fn into_f64(self) -> f64;
}

impl Real for f64 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self
    }
}

impl Real for f32 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self as f64
    }
}

#[inline]
pub fn dot<F: Real>(a: Vec3<F>, b: Vec3<F>) -> F {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross<F: Real>(a: Vec3<F>, b: Vec3<F>) -> Vec3<F> {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn sub<F: Real>(a: Vec3<F>, b: Vec3<F>) -> Vec3<F> {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Euclidean length.
#[inline]
pub fn norm<F: Real>(v: Vec3<F>) -> F {
    dot(v, v).sqrt()
}

/// Scale `v` to unit length. A zero vector yields NaN components.
#[inline]
pub fn normalize<F: Real>(v: Vec3<F>) -> Vec3<F> {
    let inv = F::one() / norm(v);
    [v[0] * inv, v[1] * inv, v[2] * inv]
}

/// Midpoint of two points on the unit sphere (normalized).
///
/// Undefined for antipodal points, which never occur between corners of a
/// geodesic triangle.
#[inline]
pub fn midpoint<F: Real>(a: Vec3<F>, b: Vec3<F>) -> Vec3<F> {
    normalize([a[0] + b[0], a[1] + b[1], a[2] + b[2]])
}

/// Triple product `(a × b) · c`; non-negative for a counter-clockwise
/// triangle seen from outside the sphere.
#[inline]
pub fn orientation<F: Real>(a: Vec3<F>, b: Vec3<F>, c: Vec3<F>) -> F {
    dot(cross(a, b), c)
}

/// Convert (RA, Dec) in radians to a unit vector `[x, y, z]`.
pub fn radec_to_xyz<F: Real>(ra: F, dec: F) -> Vec3<F> {
    let cos_dec = dec.cos();
    [cos_dec * ra.cos(), cos_dec * ra.sin(), dec.sin()]
}

/// Convert a unit vector to (RA, Dec) in radians.
/// RA is in `[0, 2*pi)`, Dec is in `[-pi/2, pi/2]`.
pub fn xyz_to_radec<F: Real>(xyz: Vec3<F>) -> (F, F) {
    let mut ra = xyz[1].atan2(xyz[0]);
    if ra < F::zero() {
        ra = ra + F::TAU();
    }
    let dec = xyz[2].max(-F::one()).min(F::one()).asin();
    (ra, dec)
}

/// Great-circle angular distance between two unit vectors, in radians.
pub fn angular_distance<F: Real>(a: Vec3<F>, b: Vec3<F>) -> F {
    dot(a, b).max(-F::one()).min(F::one()).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    const EPS: f64 = 1e-12;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() < tol,
            "expected {a} ~= {b} (diff = {})",
            (a - b).abs()
        );
    }

    fn assert_vec_close(a: [f64; 3], b: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert_close(a[i], b[i], tol);
        }
    }

    #[test]
    fn roundtrip_radec_xyz() {
        let cases = [
            (0.0, 0.0),
            (PI, 0.0),
            (PI / 4.0, PI / 6.0),
            (3.0 * PI / 2.0, -PI / 4.0),
            (1.234, 0.567),
        ];
        for (ra, dec) in cases {
            let (ra2, dec2) = xyz_to_radec(radec_to_xyz(ra, dec));
            assert_close(dec, dec2, EPS);
            let dra = ((ra - ra2 + PI) % TAU + TAU) % TAU - PI;
            assert_close(dra, 0.0, EPS);
        }
    }

    #[test]
    fn known_positions() {
        assert_vec_close(radec_to_xyz(0.0, 0.0), [1.0, 0.0, 0.0], EPS);
        assert_vec_close(radec_to_xyz(FRAC_PI_2, 0.0), [0.0, 1.0, 0.0], EPS);
        assert_vec_close(radec_to_xyz(0.0, FRAC_PI_2), [0.0, 0.0, 1.0], EPS);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_vec_close(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0], EPS);
        assert_close(
            orientation([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            1.0,
            EPS,
        );
        assert!(orientation([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]) < 0.0);
    }

    #[test]
    fn midpoint_is_unit_and_symmetric() {
        let a = radec_to_xyz(0.5, 0.3);
        let b = radec_to_xyz(0.7, -0.1);
        let m = midpoint(a, b);
        assert_close(norm(m), 1.0, EPS);
        assert_vec_close(m, midpoint(b, a), EPS);
        assert_close(angular_distance(a, m), angular_distance(m, b), 1e-10);
    }

    #[test]
    fn single_precision_matches_double() {
        let d = radec_to_xyz(1.0f64, 0.25);
        let s = radec_to_xyz(1.0f32, 0.25);
        for i in 0..3 {
            assert_close(d[i], s[i].into_f64(), 1e-6);
        }
        assert_eq!(f32::from_f64_lossy(0.5), 0.5f32);
    }

    #[test]
    fn angular_distance_clamps_rounding() {
        let a = normalize([1.0, 1e-9, 0.0]);
        assert_close(angular_distance(a, a), 0.0, 1e-7);
        assert_close(angular_distance([0.0, 0.0, 1.0], [0.0, 0.0, -1.0]), PI, EPS);
    }
}
