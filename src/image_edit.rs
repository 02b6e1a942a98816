//! Region image editing module
//!
//! Masked effects over RGBA buffers: selections are rasterized into masks, then
//! pixelated, motion blurred or stamped with text. A camera HUD can be laid over
//! the whole frame. The editor module wires these into a decode/edit/encode pipeline.

pub mod blur;
pub mod common;
pub mod draw;
pub mod editor;
pub mod mosaic;
pub mod overlay;
pub mod pixels;
pub mod region;
pub mod text;

pub use common::{EditError, Result};

pub use pixels::{PixelBuffer, PixelLayout, RawFrame, RgbaSource, from_rgba, to_rgba};

pub use region::{BoundingBox, Mask, Point, Region, rasterize};

pub use mosaic::{apply_mosaic, apply_mosaic_to_region};

pub use blur::{BlurKernel, apply_motion_blur, apply_motion_blur_to_region};

pub use overlay::{OverlayConfig, OverlayLayout, add_camera_overlay};

pub use draw::Color;

pub use text::{TextStyle, stamp_text};

pub use editor::{
    EditConfig,
    EditConfigBuilder,
    EditorDefaults,
    Effect,
    ImageLoader,
    ImageSaver,
    OutputFormat,
    RegionEditPipeline,
    StandardImageCodec,
    TiffCompression,
};
