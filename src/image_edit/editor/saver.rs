use std::io::Write;

use crate::image_edit::common::error::Result;
use crate::image_edit::editor::types::OutputFormat;
use crate::image_edit::pixels::PixelBuffer;

pub trait ImageSaver {
    fn save(&self, image: &PixelBuffer, output: &mut dyn Write, format: OutputFormat) -> Result<()>;
}
