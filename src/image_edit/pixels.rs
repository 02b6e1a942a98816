//! Pixel buffer module
//!
//! Dense RGBA buffers and the adapter that reads native image handles into them.

mod adapter;
pub mod types;

pub use adapter::{RgbaSource, from_rgba, to_rgba};
pub use types::{CHANNELS, PixelBuffer, PixelLayout, RawFrame};
