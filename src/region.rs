//! Convex sky regions expressed as intersections of half-spaces.

use crate::error::{GridError, Result};
use crate::geom::sphere::{Real, Vec3, cross, dot, radec_to_xyz, sub};

/// Points `v` with `normal · v >= 0`: one side of a plane through the origin,
/// i.e. a hemisphere of the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace<F: Real = f64> {
    pub normal: Vec3<F>,
}

impl<F: Real> HalfSpace<F> {
    pub fn new(normal: Vec3<F>) -> Self {
        HalfSpace { normal }
    }

    /// Hemisphere centred on (RA, Dec), in radians.
    pub fn towards(ra: F, dec: F) -> Self {
        HalfSpace::new(radec_to_xyz(ra, dec))
    }

    #[inline]
    pub fn contains(&self, v: Vec3<F>) -> bool {
        dot(self.normal, v) >= F::zero()
    }

    /// The complementary hemisphere (sharing the boundary circle).
    pub fn opposite(&self) -> Self {
        HalfSpace::new(self.normal.map(|c| -c))
    }
}

/// Intersection of half-spaces. No half-spaces means the whole sphere.
///
/// Equality is structural: same half-spaces in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexRegion<F: Real = f64> {
    half_spaces: Vec<HalfSpace<F>>,
}

impl<F: Real> ConvexRegion<F> {
    pub fn new(half_spaces: Vec<HalfSpace<F>>) -> Self {
        ConvexRegion { half_spaces }
    }

    pub fn whole_sphere() -> Self {
        ConvexRegion::default()
    }

    pub fn hemisphere(normal: Vec3<F>) -> Self {
        ConvexRegion::new(vec![HalfSpace::new(normal)])
    }

    /// Region bounded by a convex spherical polygon.
    ///
    /// Vertices go counter-clockwise as seen from outside the sphere; each
    /// edge `v[i] -> v[i+1]` becomes the half-space `v[i] × v[i+1]`. When
    /// the first three vertices wind the other way, the polygon spans more
    /// than a hemisphere and no half-space bound is valid, so the whole
    /// sphere is returned.
    pub fn from_polygon(vertices: &[Vec3<F>]) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GridError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }

        let v0 = vertices[0];
        let plane = cross(sub(vertices[1], v0), sub(vertices[2], v0));
        if dot(v0, plane) <= F::zero() {
            log::debug!("polygon wider than a hemisphere, searching whole sphere");
            return Ok(ConvexRegion::whole_sphere());
        }

        let half_spaces = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(&a, &b)| HalfSpace::new(cross(a, b)))
            .collect();
        Ok(ConvexRegion::new(half_spaces))
    }

    /// Add one more bounding half-space.
    pub fn with(mut self, half_space: HalfSpace<F>) -> Self {
        self.half_spaces.push(half_space);
        self
    }

    pub fn half_spaces(&self) -> &[HalfSpace<F>] {
        &self.half_spaces
    }

    pub fn len(&self) -> usize {
        self.half_spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.half_spaces.is_empty()
    }

    pub fn contains(&self, v: Vec3<F>) -> bool {
        self.half_spaces.iter().all(|h| h.contains(v))
    }
}
