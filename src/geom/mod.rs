pub mod sphere;

pub use sphere::{Real, Vec3};
