//! Drawing primitives shared by the overlay and text tools.

mod canvas;
mod color;

pub use canvas::{Canvas, Coverage};
pub use color::Color;
