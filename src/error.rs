//! Error types for skygrid.

use thiserror::Error;

/// Errors returned by grid lookups and region construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// No base triangle claimed the point. Only reachable through rounding
    /// on a base edge or for points far from unit length.
    #[error("point ({x}, {y}, {z}) lies in no base triangle")]
    PointNotFound { x: f64, y: f64, z: f64 },

    /// The point has a non-finite component or zero length.
    #[error("invalid lookup point ({x}, {y}, {z})")]
    InvalidPoint { x: f64, y: f64, z: f64 },

    /// Requested level is deeper than the grid was built for.
    #[error("level {level} exceeds grid max level {max_level}")]
    LevelOutOfRange { level: u8, max_level: u8 },

    /// Zone index is not valid at the given level.
    #[error("zone {index} out of range at level {level} ({count} zones)")]
    ZoneOutOfRange { level: u8, index: u32, count: usize },

    /// A polygon region needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    DegeneratePolygon { vertices: usize },
}

/// Result type for skygrid operations.
pub type Result<T> = std::result::Result<T, GridError>;
