//! Hierarchical triangular index of the celestial sphere.
//!
//! Skygrid splits the sphere into the 20 faces of an icosahedron and then
//! recursively into four sub-triangles per zone. Catalogs file their objects
//! under zone ids; renderers ask which zones a convex region of sky
//! (a viewport, a hemisphere) covers and get back the zones fully inside it
//! and the zones on its border.

pub mod cache;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod region;
pub mod search;

pub use cache::{CacheStats, ZoneSearcher};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use geom::{Real, Vec3};
pub use grid::{GeodesicGrid, MAX_GRID_LEVEL, ZoneId, partner_of};
pub use region::{ConvexRegion, HalfSpace};
pub use search::{InsideZones, SearchResult};
