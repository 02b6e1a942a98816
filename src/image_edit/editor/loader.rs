use crate::image_edit::common::error::Result;
use crate::image_edit::pixels::PixelBuffer;

pub trait ImageLoader {
    fn load(&self, data: &[u8]) -> Result<PixelBuffer>;
}
