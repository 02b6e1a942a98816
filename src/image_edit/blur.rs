//! Motion blur module
//!
//! Line-kernel construction and the masked, feathered blur built on it.

pub mod kernel;
mod motion_blur;

pub use kernel::{BlurKernel, Tap, normalize_angle};
pub use motion_blur::{apply_motion_blur, apply_motion_blur_to_region};
