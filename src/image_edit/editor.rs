mod types;
mod loader;
mod saver;
mod standard_codec;
mod pipeline;


pub use types::{EditConfig, EditConfigBuilder, EditorDefaults, Effect, OutputFormat, TiffCompression};
pub use loader::ImageLoader;
pub use saver::ImageSaver;
pub use standard_codec::StandardImageCodec;
pub use pipeline::RegionEditPipeline;
