//! Geodesic grid: the celestial sphere split into a tree of triangular zones.
//!
//! Level 0 is the 20 faces of an icosahedron. Every zone at level `L` is
//! split into four zones at level `L + 1` by joining its (normalized) edge
//! midpoints, so level `L` holds `20 * 4^L` zones.
//!
//! Zone ids are plain integers. Zone `i` at level `L > 0` is child `i & 3`
//! of zone `i >> 2` at level `L - 1`, which is all the structure the tree
//! needs: each level is a flat array indexed by zone id, with no pointers.
//!
//! Each stored triangle keeps only its three edge midpoints `e0, e1, e2`
//! (opposite corners 0, 1, 2). Corners are recovered by walking up to the
//! icosahedron, and the children are
//! - 0: `(c0, e2, e1)`
//! - 1: `(e2, c1, e0)`
//! - 2: `(e1, e0, c2)`
//! - 3: `(e0, e1, e2)`, the central one.

pub mod icosahedron;

use crate::error::{GridError, Result};
use crate::geom::sphere::{Real, Vec3, dot, midpoint, normalize, orientation};

use icosahedron::{FACES, NUM_CORNERS};

/// Zone index within one level.
pub type ZoneId = u32;

/// Deepest level a grid will materialize. Level 12 has 335,544,320 zones,
/// still addressable with a `u32`.
pub const MAX_GRID_LEVEL: u8 = 12;

/// Edge midpoints of one zone, each normalized to the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle<F: Real = f64> {
    /// Midpoint of corners 1 and 2.
    pub e0: Vec3<F>,
    /// Midpoint of corners 2 and 0.
    pub e1: Vec3<F>,
    /// Midpoint of corners 0 and 1.
    pub e2: Vec3<F>,
}

impl<F: Real> Triangle<F> {
    fn from_corners([c0, c1, c2]: [Vec3<F>; 3]) -> Self {
        Triangle {
            e0: midpoint(c1, c2),
            e1: midpoint(c2, c0),
            e2: midpoint(c0, c1),
        }
    }

    fn placeholder() -> Self {
        let zero = [F::zero(); 3];
        Triangle {
            e0: zero,
            e1: zero,
            e2: zero,
        }
    }

    /// Corners of child `slot` (0..4) given this triangle's own corners.
    pub fn child_corners(&self, [c0, c1, c2]: [Vec3<F>; 3], slot: usize) -> [Vec3<F>; 3] {
        match slot {
            0 => [c0, self.e2, self.e1],
            1 => [self.e2, c1, self.e0],
            2 => [self.e1, self.e0, c2],
            _ => [self.e0, self.e1, self.e2],
        }
    }

    /// Which child contains `v`, assuming the triangle itself does.
    /// Points on an inner edge go to the lower-numbered child.
    fn child_slot(&self, v: Vec3<F>) -> usize {
        if orientation(self.e1, self.e2, v) <= F::zero() {
            0
        } else if orientation(self.e2, self.e0, v) <= F::zero() {
            1
        } else if orientation(self.e0, self.e1, v) <= F::zero() {
            2
        } else {
            3
        }
    }
}

/// Index of the partner zone at the same level, from the bits of `index` alone.
///
/// Partners pair up every zone of a level (the relation is an involution).
/// Base faces pair as `2k <-> 2k + 1`; below that, children 2 and 3 of a
/// zone pair with each other, and children 0 and 1 pair with children 1 and
/// 0 of the parent's partner.
pub fn partner_of(level: u8, index: ZoneId) -> ZoneId {
    if level == 0 {
        return index ^ 1;
    }
    match index & 7 {
        2 | 6 => index + 1,
        3 | 7 => index - 1,
        0 | 4 => (partner_of(level - 1, index >> 2) << 2) + 1,
        _ => partner_of(level - 1, index >> 2) << 2,
    }
}

/// Immutable geodesic grid materialized down to `max_level`.
///
/// Stores the triangles of levels `0..max_level`; zones of level `max_level`
/// are addressable through their parents' midpoints. Safe to share between
/// threads once built.
pub struct GeodesicGrid<F: Real = f64> {
    max_level: u8,
    corners: [Vec3<F>; NUM_CORNERS],
    triangles: Vec<Vec<Triangle<F>>>,
}

impl<F: Real> std::fmt::Debug for GeodesicGrid<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesicGrid")
            .field("max_level", &self.max_level)
            .field("triangles", &self.triangle_count())
            .finish()
    }
}

impl<F: Real> GeodesicGrid<F> {
    /// Build the grid. Depths above [`MAX_GRID_LEVEL`] are clamped.
    pub fn build(max_level: u8) -> Self {
        if max_level > MAX_GRID_LEVEL {
            log::warn!("geodesic level {max_level} clamped to {MAX_GRID_LEVEL}");
        }
        let max_level = max_level.min(MAX_GRID_LEVEL);
        let corners = icosahedron::corners::<F>();

        let mut triangles: Vec<Vec<Triangle<F>>> = (0..max_level)
            .map(|level| vec![Triangle::placeholder(); Self::nr_of_zones(level)])
            .collect();
        if max_level > 0 {
            for (index, face) in FACES.iter().enumerate() {
                let face_corners = face.map(|c| corners[c]);
                init_triangle(&mut triangles, 0, index, face_corners);
            }
        }

        let grid = GeodesicGrid {
            max_level,
            corners,
            triangles,
        };
        log::debug!(
            "built geodesic grid: max_level={}, triangles={}",
            grid.max_level,
            grid.triangle_count()
        );
        grid
    }

    /// Number of zones at `level`: `20 * 4^level`.
    pub fn nr_of_zones(level: u8) -> usize {
        20usize << (2 * level as u32)
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Stored triangles across all levels: `20 * (4^max_level - 1) / 3`.
    pub fn triangle_count(&self) -> usize {
        self.triangles.iter().map(Vec::len).sum()
    }

    fn check(&self, level: u8, index: ZoneId) -> Result<()> {
        if level > self.max_level {
            return Err(GridError::LevelOutOfRange {
                level,
                max_level: self.max_level,
            });
        }
        let count = Self::nr_of_zones(level);
        if index as usize >= count {
            return Err(GridError::ZoneOutOfRange {
                level,
                index,
                count,
            });
        }
        Ok(())
    }

    /// Stored midpoints of a zone above `max_level`.
    pub(crate) fn triangle(&self, level: u8, index: usize) -> &Triangle<F> {
        debug_assert!(level < self.max_level, "no triangles stored at level {level}");
        &self.triangles[level as usize][index]
    }

    /// The 12 base corners.
    pub(crate) fn base_corners(&self) -> &[Vec3<F>; NUM_CORNERS] {
        &self.corners
    }

    /// Corners of zone `(level, index)`, wound counter-clockwise from outside.
    pub fn triangle_corners(&self, level: u8, index: ZoneId) -> Result<[Vec3<F>; 3]> {
        self.check(level, index)?;
        Ok(self.corners_unchecked(level, index as usize))
    }

    fn corners_unchecked(&self, level: u8, index: usize) -> [Vec3<F>; 3] {
        if level == 0 {
            return FACES[index].map(|c| self.corners[c]);
        }
        let parent = index >> 2;
        let t = self.triangle(level - 1, parent);
        match index & 3 {
            3 => [t.e0, t.e1, t.e2],
            slot => t.child_corners(self.corners_unchecked(level - 1, parent), slot),
        }
    }

    /// Partner of zone `(level, index)`, see [`partner_of`].
    pub fn partner_triangle(&self, level: u8, index: ZoneId) -> Result<ZoneId> {
        self.check(level, index)?;
        Ok(partner_of(level, index))
    }

    /// Unit vector through the centroid of a zone's corners.
    pub fn zone_center(&self, level: u8, index: ZoneId) -> Result<Vec3<F>> {
        let [c0, c1, c2] = self.triangle_corners(level, index)?;
        Ok(normalize([
            c0[0] + c1[0] + c2[0],
            c0[1] + c1[1] + c2[1],
            c0[2] + c1[2] + c2[2],
        ]))
    }

    /// Zone at `level` containing `point`.
    ///
    /// `point` need not be normalized. A point on the edge between zones
    /// belongs to both; the lookup is deterministic and returns the first
    /// base face, then the lowest child, that claims it.
    pub fn zone_containing(&self, point: Vec3<F>, level: u8) -> Result<ZoneId> {
        let [x, y, z] = point.map(Real::into_f64);
        if !point.iter().all(|c| c.is_finite()) || dot(point, point) == F::zero() {
            return Err(GridError::InvalidPoint { x, y, z });
        }
        if level > self.max_level {
            return Err(GridError::LevelOutOfRange {
                level,
                max_level: self.max_level,
            });
        }

        let zero = F::zero();
        for (base, face) in FACES.iter().enumerate() {
            let [c0, c1, c2] = face.map(|c| self.corners[c]);
            if orientation(c0, c1, point) >= zero
                && orientation(c1, c2, point) >= zero
                && orientation(c2, c0, point) >= zero
            {
                let mut index = base;
                for lev in 0..level {
                    let slot = self.triangle(lev, index).child_slot(point);
                    index = (index << 2) + slot;
                }
                return Ok(index as ZoneId);
            }
        }
        Err(GridError::PointNotFound { x, y, z })
    }

    /// Depth-first visit of every zone from level 0 through `max_visit_level`
    /// (clamped to `max_level`), parents before children.
    pub fn visit_triangles<V>(&self, max_visit_level: u8, mut visitor: V)
    where
        V: FnMut(u8, ZoneId, &[Vec3<F>; 3]),
    {
        let max_visit_level = max_visit_level.min(self.max_level);
        for (index, face) in FACES.iter().enumerate() {
            let corners = face.map(|c| self.corners[c]);
            self.visit_recursive(0, index, corners, max_visit_level, &mut visitor);
        }
    }

    fn visit_recursive<V>(
        &self,
        level: u8,
        index: usize,
        corners: [Vec3<F>; 3],
        max_visit_level: u8,
        visitor: &mut V,
    ) where
        V: FnMut(u8, ZoneId, &[Vec3<F>; 3]),
    {
        visitor(level, index as ZoneId, &corners);
        if level < max_visit_level {
            let t = self.triangle(level, index);
            for slot in 0..4 {
                let child = t.child_corners(corners, slot);
                self.visit_recursive(level + 1, (index << 2) + slot, child, max_visit_level, visitor);
            }
        }
    }
}

fn init_triangle<F: Real>(
    levels: &mut [Vec<Triangle<F>>],
    level: usize,
    index: usize,
    corners: [Vec3<F>; 3],
) {
    let t = Triangle::from_corners(corners);
    levels[level][index] = t;
    if level + 1 < levels.len() {
        for slot in 0..4 {
            init_triangle(levels, level + 1, (index << 2) + slot, t.child_corners(corners, slot));
        }
    }
}
