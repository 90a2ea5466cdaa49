//! Region search: which zones lie inside, or on the border of, a convex region.
//!
//! The search descends from the 20 base faces. A zone is classified against
//! each half-space still in doubt by testing its three corners:
//! - all corners outside one half-space: the zone is outside, prune it;
//! - all corners inside: the half-space holds for the whole subtree and is
//!   not tested again below this zone;
//! - mixed: the half-space stays active.
//!
//! A zone with no active half-spaces left is inside. Any other surviving zone
//! is a border zone and is subdivided until `max_search_level`. Corner
//! containment is inherited from the parent, so each subdivision costs one
//! test per active half-space per new edge midpoint.

use crate::geom::sphere::Real;
use crate::grid::icosahedron::FACES;
use crate::grid::{GeodesicGrid, ZoneId};
use crate::region::{ConvexRegion, HalfSpace};

/// Inside and border zones of one search, per level.
///
/// Each level owns one buffer of `20 * 4^level` ids. Inside ids fill it from
/// the front and border ids from the back, so neither list ever reallocates.
/// A zone id appears at most once across all inside lists: once a zone is
/// inside, its descendants are not listed.
#[derive(Debug, Clone)]
pub struct SearchResult {
    zones: Vec<Vec<ZoneId>>,
    inside_end: Vec<usize>,
    border_start: Vec<usize>,
}

impl SearchResult {
    /// Empty result with buffers for levels `0..=max_level`.
    pub fn new(max_level: u8) -> Self {
        let zones: Vec<Vec<ZoneId>> = (0..=max_level)
            .map(|level| vec![0; GeodesicGrid::<f64>::nr_of_zones(level)])
            .collect();
        let border_start = zones.iter().map(Vec::len).collect();
        SearchResult {
            inside_end: vec![0; zones.len()],
            border_start,
            zones,
        }
    }

    /// Empty result sized for every level of `grid`.
    pub fn for_grid<F: Real>(grid: &GeodesicGrid<F>) -> Self {
        SearchResult::new(grid.max_level())
    }

    pub fn max_level(&self) -> u8 {
        (self.zones.len() - 1) as u8
    }

    fn clear(&mut self) {
        self.inside_end.fill(0);
        for (start, zones) in self.border_start.iter_mut().zip(&self.zones) {
            *start = zones.len();
        }
    }

    fn push_inside(&mut self, level: u8, index: usize) {
        let level = level as usize;
        let end = self.inside_end[level];
        debug_assert!(end < self.border_start[level], "level {level} overflow");
        self.zones[level][end] = index as ZoneId;
        self.inside_end[level] = end + 1;
    }

    fn push_border(&mut self, level: u8, index: usize) {
        let level = level as usize;
        debug_assert!(self.inside_end[level] < self.border_start[level], "level {level} overflow");
        let start = self.border_start[level] - 1;
        self.zones[level][start] = index as ZoneId;
        self.border_start[level] = start;
    }

    /// Zones at `level` lying entirely inside the region.
    pub fn inside_zones_at(&self, level: u8) -> &[ZoneId] {
        match self.zones.get(level as usize) {
            Some(zones) => &zones[..self.inside_end[level as usize]],
            None => &[],
        }
    }

    /// Zones at `level` crossed by the region boundary. The region covers
    /// only part of these, so callers must still test their contents.
    pub fn border_zones_at(&self, level: u8) -> &[ZoneId] {
        match self.zones.get(level as usize) {
            Some(zones) => &zones[self.border_start[level as usize]..],
            None => &[],
        }
    }

    /// Inside zones over all levels.
    pub fn inside_count(&self) -> usize {
        self.inside_end.iter().sum()
    }

    /// Border zones over all levels.
    pub fn border_count(&self) -> usize {
        self.border_start
            .iter()
            .zip(&self.zones)
            .map(|(&start, zones)| zones.len() - start)
            .sum()
    }

    /// Every inside zone expressed at `max_visit_level`, see [`InsideZones`].
    pub fn iterate_inside(&self, max_visit_level: u8) -> InsideZones<'_> {
        InsideZones::new(self, max_visit_level)
    }

    pub fn border_iter(&self, level: u8) -> BorderZones<'_> {
        self.border_zones_at(level).iter().copied()
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.zones.len() == other.zones.len()
            && (0..=self.max_level()).all(|level| {
                self.inside_zones_at(level) == other.inside_zones_at(level)
                    && self.border_zones_at(level) == other.border_zones_at(level)
            })
    }
}

pub type BorderZones<'a> = std::iter::Copied<std::slice::Iter<'a, ZoneId>>;

/// Lazy walk over the inside zones of a [`SearchResult`], normalized to one
/// fine level.
///
/// Inside zone `id` at level `L` expands to the `4^(V - L)` consecutive ids
/// `id * 4^(V - L) + k` at visit level `V`. Levels are walked coarsest first.
/// Inside zones stored deeper than level `V` are not produced. Clone or
/// [`reset`](InsideZones::reset) to walk again.
#[derive(Debug, Clone)]
pub struct InsideZones<'a> {
    result: &'a SearchResult,
    max_level: u8,
    level: u8,
    pos: usize,
    expand: u32,
    count: u32,
}

impl<'a> InsideZones<'a> {
    fn new(result: &'a SearchResult, max_visit_level: u8) -> Self {
        let mut it = InsideZones {
            result,
            max_level: max_visit_level.min(result.max_level()),
            level: 0,
            pos: 0,
            expand: 1,
            count: 0,
        };
        it.reset();
        it
    }

    pub fn reset(&mut self) {
        self.level = 0;
        self.pos = 0;
        self.count = 0;
        self.expand = 1 << (2 * self.max_level as u32);
    }

    /// Level that produced ids are expressed at.
    pub fn visit_level(&self) -> u8 {
        self.max_level
    }

    fn remaining(&self) -> usize {
        let current = self.result.inside_zones_at(self.level).len();
        let mut n = (current.saturating_sub(self.pos)) * self.expand as usize;
        if self.pos < current {
            n -= self.count as usize;
        }
        for level in self.level + 1..=self.max_level {
            let expand = 1usize << (2 * (self.max_level - level) as u32);
            n += self.result.inside_zones_at(level).len() * expand;
        }
        n
    }
}

impl Iterator for InsideZones<'_> {
    type Item = ZoneId;

    fn next(&mut self) -> Option<ZoneId> {
        loop {
            let list = self.result.inside_zones_at(self.level);
            if let Some(&id) = list.get(self.pos) {
                if self.count < self.expand {
                    let zone = id * self.expand + self.count;
                    self.count += 1;
                    return Some(zone);
                }
                self.pos += 1;
                self.count = 0;
                continue;
            }
            if self.level >= self.max_level {
                return None;
            }
            self.level += 1;
            self.pos = 0;
            self.count = 0;
            self.expand >>= 2;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for InsideZones<'_> {}

impl std::iter::FusedIterator for InsideZones<'_> {}

/// Per-level working storage, reused by every zone visited at that level.
struct Scratch {
    active: Vec<usize>,
    edges: [Vec<bool>; 3],
}

impl Scratch {
    fn new(half_spaces: usize) -> Self {
        Scratch {
            active: Vec::with_capacity(half_spaces),
            edges: std::array::from_fn(|_| vec![false; half_spaces]),
        }
    }
}

struct ZoneSearch<'a, F: Real> {
    grid: &'a GeodesicGrid<F>,
    half_spaces: &'a [HalfSpace<F>],
    max_search_level: u8,
    result: &'a mut SearchResult,
}

impl<F: Real> ZoneSearch<'_, F> {
    /// `inside[k][h]` tells whether corner `k` lies in half-space `h`; only
    /// entries for the `active` half-spaces are meaningful.
    fn visit(
        &mut self,
        level: u8,
        index: usize,
        inside: [&[bool]; 3],
        active: &[usize],
        scratch: &mut [Scratch],
    ) {
        let Some((here, deeper)) = scratch.split_first_mut() else {
            debug_assert!(false, "search scratch exhausted at level {level}");
            return;
        };

        here.active.clear();
        for &h in active {
            match (inside[0][h], inside[1][h], inside[2][h]) {
                (false, false, false) => return,
                (true, true, true) => {}
                _ => here.active.push(h),
            }
        }

        if here.active.is_empty() {
            self.result.push_inside(level, index);
            return;
        }
        self.result.push_border(level, index);
        if level >= self.max_search_level {
            return;
        }

        let t = self.grid.triangle(level, index);
        for &h in &here.active {
            let half_space = &self.half_spaces[h];
            here.edges[0][h] = half_space.contains(t.e0);
            here.edges[1][h] = half_space.contains(t.e1);
            here.edges[2][h] = half_space.contains(t.e2);
        }

        let [c0, c1, c2] = inside;
        let (e0, e1, e2) = (
            here.edges[0].as_slice(),
            here.edges[1].as_slice(),
            here.edges[2].as_slice(),
        );
        let active = here.active.as_slice();
        let first = index << 2;
        self.visit(level + 1, first, [c0, e2, e1], active, deeper);
        self.visit(level + 1, first + 1, [e2, c1, e0], active, deeper);
        self.visit(level + 1, first + 2, [e1, e0, c2], active, deeper);
        self.visit(level + 1, first + 3, [e0, e1, e2], active, deeper);
    }
}

impl<F: Real> GeodesicGrid<F> {
    /// Classify zones against `region` down to `max_search_level` (clamped
    /// to the grid's and the result's depth), overwriting `result`.
    ///
    /// Zones still straddling the boundary at `max_search_level` are
    /// reported as border zones without further subdivision.
    pub fn search_zones(
        &self,
        region: &ConvexRegion<F>,
        max_search_level: u8,
        result: &mut SearchResult,
    ) {
        let max_search_level = max_search_level
            .min(self.max_level())
            .min(result.max_level());
        result.clear();

        let half_spaces = region.half_spaces();
        let corner_inside: Vec<Vec<bool>> = self
            .base_corners()
            .iter()
            .map(|&c| half_spaces.iter().map(|h| h.contains(c)).collect())
            .collect();
        let all: Vec<usize> = (0..half_spaces.len()).collect();
        let mut scratch: Vec<Scratch> = (0..=max_search_level)
            .map(|_| Scratch::new(half_spaces.len()))
            .collect();

        let mut search = ZoneSearch {
            grid: self,
            half_spaces,
            max_search_level,
            result,
        };
        for (index, face) in FACES.iter().enumerate() {
            let inside = face.map(|c| corner_inside[c].as_slice());
            search.visit(0, index, inside, &all, &mut scratch);
        }
    }

    /// Uncached search into a freshly allocated result.
    pub fn search(&self, region: &ConvexRegion<F>, max_search_level: u8) -> SearchResult {
        let mut result = SearchResult::for_grid(self);
        self.search_zones(region, max_search_level, &mut result);
        result
    }
}
