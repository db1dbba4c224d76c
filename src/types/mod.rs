//! Small fixed-size vector types used for grid sizes, coordinates and
//! per-axis quantities such as wave speeds.

mod vec3;

pub use vec3::{IVec3, RVec3, Vec3};
