//! Camera HUD overlay
//!
//! Corner brackets, battery gauge, recording indicator and timer, all sized from
//! ratios of the short image side.

mod camera;
pub mod layout;
pub mod types;

pub use camera::{add_camera_overlay, add_camera_overlay_with_font};
pub use layout::{OverlayLayout, PixelRect};
pub use types::{
    BATTERY_CAUTION_THRESHOLD, BATTERY_FLOOR, BATTERY_WARNING_THRESHOLD, OverlayConfig, REC_LABEL,
};
