//! Single-slot query cache over a shared grid.
//!
//! Consecutive frames usually ask for the same region, so a [`ZoneSearcher`]
//! remembers the last `(region, level)` pair and its result. The grid is
//! immutable and shared through an `Arc`; the cache is the only mutable
//! state and is owned by exactly one searcher. Threads either wrap a
//! searcher in a `Mutex` or each keep their own over a cloned `Arc`.

use std::sync::Arc;

use crate::geom::sphere::Real;
use crate::grid::GeodesicGrid;
use crate::region::ConvexRegion;
use crate::search::SearchResult;

/// Hit/miss counters of a [`ZoneSearcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Region search with a one-entry result cache.
#[derive(Debug)]
pub struct ZoneSearcher<F: Real = f64> {
    grid: Arc<GeodesicGrid<F>>,
    key: Option<(ConvexRegion<F>, u8)>,
    result: SearchResult,
    stats: CacheStats,
}

impl<F: Real> ZoneSearcher<F> {
    pub fn new(grid: Arc<GeodesicGrid<F>>) -> Self {
        let result = SearchResult::new(grid.max_level());
        ZoneSearcher {
            grid,
            key: None,
            result,
            stats: CacheStats::default(),
        }
    }

    pub fn grid(&self) -> &Arc<GeodesicGrid<F>> {
        &self.grid
    }

    /// Zones of `region` down to `max_search_level`.
    ///
    /// Returns the cached result untouched when both arguments equal the
    /// previous call's; otherwise searches again and replaces the cache.
    pub fn query(&mut self, region: &ConvexRegion<F>, max_search_level: u8) -> &SearchResult {
        let hit = matches!(
            &self.key,
            Some((cached, level)) if *level == max_search_level && cached == region
        );
        if hit {
            self.stats.hits += 1;
            log::trace!("zone cache hit: {} half-spaces, level {max_search_level}", region.len());
        } else {
            self.stats.misses += 1;
            log::trace!("zone cache miss: {} half-spaces, level {max_search_level}", region.len());
            self.grid
                .search_zones(region, max_search_level, &mut self.result);
            match &mut self.key {
                Some((cached, level)) => {
                    cached.clone_from(region);
                    *level = max_search_level;
                }
                None => self.key = Some((region.clone(), max_search_level)),
            }
        }
        &self.result
    }

    /// Result of the last query, if any.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.key.as_ref().map(|_| &self.result)
    }

    /// Forget the cached key so the next query searches again.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
