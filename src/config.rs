use std::sync::Arc;

use crate::cache::ZoneSearcher;
use crate::geom::sphere::Real;
use crate::grid::{GeodesicGrid, MAX_GRID_LEVEL};

/// Configuration for building a grid and searching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Deepest level the grid materializes (clamped to [`MAX_GRID_LEVEL`]).
    pub max_level: u8,
    /// Default depth for region searches; never deeper than `max_level`.
    pub max_search_level: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_level: 7,
            max_search_level: 7,
        }
    }
}

impl GridConfig {
    /// Grid depth after clamping.
    pub fn grid_level(&self) -> u8 {
        self.max_level.min(MAX_GRID_LEVEL)
    }

    /// Search depth after clamping to the grid depth.
    pub fn search_level(&self) -> u8 {
        let level = self.grid_level();
        if self.max_search_level > level {
            log::warn!(
                "search level {} exceeds grid level {level}, clamping",
                self.max_search_level
            );
        }
        self.max_search_level.min(level)
    }

    pub fn build_grid<F: Real>(&self) -> GeodesicGrid<F> {
        GeodesicGrid::build(self.max_level)
    }

    /// Searcher over a freshly built grid.
    pub fn searcher<F: Real>(&self) -> ZoneSearcher<F> {
        ZoneSearcher::new(Arc::new(self.build_grid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels_agree() {
        let config = GridConfig::default();
        assert_eq!(config.search_level(), config.max_level);
    }

    #[test]
    fn levels_are_clamped() {
        let config = GridConfig {
            max_level: 3,
            max_search_level: 8,
        };
        assert_eq!(config.search_level(), 3);

        let deep = GridConfig {
            max_level: 40,
            max_search_level: 40,
        };
        assert_eq!(deep.grid_level(), MAX_GRID_LEVEL);
        assert_eq!(deep.search_level(), MAX_GRID_LEVEL);
    }

    #[test]
    fn searcher_uses_configured_depth() {
        let config = GridConfig {
            max_level: 2,
            max_search_level: 2,
        };
        let searcher = config.searcher::<f32>();
        assert_eq!(searcher.grid().max_level(), 2);
    }
}
