//! Region module
//!
//! Selection shapes and their rasterization into per-pixel masks.

mod rasterizer;
pub mod types;

pub use rasterizer::rasterize;
pub use types::{BoundingBox, Mask, Point, Region};
