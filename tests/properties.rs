//! Property-based tests of zone addressing, point lookup and region search.

use std::collections::HashSet;
use std::f64::consts::TAU;

use proptest::prelude::*;
use skygrid::geom::sphere::{dot, orientation, radec_to_xyz};
use skygrid::{ConvexRegion, GeodesicGrid, HalfSpace, SearchResult, Vec3, ZoneId, partner_of};

const LEVEL: u8 = 5;

fn sky_point() -> impl Strategy<Value = Vec3> {
    (0.0..TAU, -1.55f64..1.55).prop_map(|(ra, dec)| radec_to_xyz(ra, dec))
}

fn region() -> impl Strategy<Value = ConvexRegion> {
    prop::collection::vec(sky_point(), 0..5)
        .prop_map(|normals| ConvexRegion::new(normals.into_iter().map(HalfSpace::new).collect()))
}

/// Smallest `normal · p` over the region's half-spaces.
fn margin(region: &ConvexRegion, p: Vec3) -> f64 {
    region
        .half_spaces()
        .iter()
        .map(|h| dot(h.normal, p))
        .fold(f64::INFINITY, f64::min)
}

/// Whether `zone` at `level`, or one of its ancestors, was reported inside.
fn covered_inside(result: &SearchResult, level: u8, zone: ZoneId) -> bool {
    (0..=level).any(|l| {
        let ancestor = zone >> (2 * (level - l) as u32);
        result.inside_zones_at(l).contains(&ancestor)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partner_is_involution(level in 0u8..10, raw in any::<u32>()) {
        let count = GeodesicGrid::<f64>::nr_of_zones(level) as u32;
        let index = raw % count;
        let partner = partner_of(level, index);
        prop_assert!(partner < count);
        prop_assert_ne!(partner, index);
        prop_assert_eq!(partner_of(level, partner), index);
    }

    #[test]
    fn lookup_contains_point(p in sky_point()) {
        let grid = GeodesicGrid::<f64>::build(LEVEL);
        let zone = grid.zone_containing(p, LEVEL).unwrap();
        let [c0, c1, c2] = grid.triangle_corners(LEVEL, zone).unwrap();
        prop_assert!(orientation(c0, c1, p) >= -1e-12);
        prop_assert!(orientation(c1, c2, p) >= -1e-12);
        prop_assert!(orientation(c2, c0, p) >= -1e-12);

        let parent = grid.zone_containing(p, LEVEL - 1).unwrap();
        prop_assert_eq!(parent, zone >> 2);
    }

    #[test]
    fn inside_zones_satisfy_every_half_space(region in region()) {
        let grid = GeodesicGrid::<f64>::build(LEVEL);
        let result = grid.search(&region, LEVEL);
        for level in 0..=LEVEL {
            for &zone in result.inside_zones_at(level) {
                for c in grid.triangle_corners(level, zone).unwrap() {
                    prop_assert!(margin(&region, c) >= -1e-9,
                        "inside zone ({}, {}) has corner outside", level, zone);
                }
            }
        }
    }

    #[test]
    fn border_zones_straddle_or_hit_depth_limit(region in region(), depth in 0u8..=LEVEL) {
        let grid = GeodesicGrid::<f64>::build(LEVEL);
        let result = grid.search(&region, depth);
        for level in 0..depth {
            for &zone in result.border_zones_at(level) {
                let corners = grid.triangle_corners(level, zone).unwrap();
                let some_outside = corners.iter().any(|&c| !region.contains(c));
                prop_assert!(some_outside, "border zone ({}, {}) fully inside", level, zone);
            }
        }
        for level in depth + 1..=LEVEL {
            prop_assert!(result.border_zones_at(level).is_empty());
            prop_assert!(result.inside_zones_at(level).is_empty());
        }
    }

    #[test]
    fn search_agrees_with_point_lookup(region in region(), p in sky_point()) {
        let grid = GeodesicGrid::<f64>::build(LEVEL);
        let result = grid.search(&region, LEVEL);
        let zone = grid.zone_containing(p, LEVEL).unwrap();
        let m = margin(&region, p);

        if m > 1e-9 {
            let found = covered_inside(&result, LEVEL, zone)
                || result.border_zones_at(LEVEL).contains(&zone);
            prop_assert!(found, "point inside region but zone {} not reported", zone);
        } else if m < -1e-9 {
            prop_assert!(!covered_inside(&result, LEVEL, zone),
                "point outside region but zone {} reported inside", zone);
        }
    }

    #[test]
    fn inside_iterator_is_distinct_and_in_range(region in region(), visit in 0u8..=LEVEL) {
        let grid = GeodesicGrid::<f64>::build(LEVEL);
        let result = grid.search(&region, LEVEL);
        let it = result.iterate_inside(visit);
        let expected_len = it.len();
        let ids: Vec<ZoneId> = it.collect();
        prop_assert_eq!(ids.len(), expected_len);

        let count = GeodesicGrid::<f64>::nr_of_zones(visit);
        let distinct: HashSet<ZoneId> = ids.iter().copied().collect();
        prop_assert_eq!(distinct.len(), ids.len());
        prop_assert!(ids.iter().all(|&id| (id as usize) < count));
    }
}

#[test]
fn whole_sphere_iterates_every_zone() {
    let grid = GeodesicGrid::<f64>::build(LEVEL);
    let result = grid.search(&ConvexRegion::whole_sphere(), LEVEL);
    let ids: HashSet<ZoneId> = result.iterate_inside(LEVEL).collect();
    assert_eq!(ids.len(), GeodesicGrid::<f64>::nr_of_zones(LEVEL));
}
