use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tracing::debug;

use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::editor::loader::ImageLoader;
use crate::image_edit::editor::saver::ImageSaver;
use crate::image_edit::editor::types::{OutputFormat, TiffCompression};
use crate::image_edit::pixels::{PixelBuffer, to_rgba};

/// PNG, JPEG and TIFF through the `image` and `tiff` crates.
pub struct StandardImageCodec;

impl ImageLoader for StandardImageCodec {
    fn load(&self, data: &[u8]) -> Result<PixelBuffer> {
        let image = image::load_from_memory(data).map_err(|e| EditError::DecodeError(e.to_string()))?;
        debug!("Decoded image: {}x{} {:?}", image.width(), image.height(), image.color());
        to_rgba(&image)
    }
}

impl ImageSaver for StandardImageCodec {
    fn save(&self, image: &PixelBuffer, output: &mut dyn Write, format: OutputFormat) -> Result<()> {
        debug!("Encoding {:?} image: {}x{}", format, image.width(), image.height());

        let width = dimension(image.width())?;
        let height = dimension(image.height())?;
        let mut buffer = Vec::new();

        match format {
            OutputFormat::Png => {
                PngEncoder::new(&mut buffer)
                    .write_image(image.as_bytes(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|e| EditError::EncodeError(e.to_string()))?;
            }
            OutputFormat::Jpeg { quality } => {
                let rgb: Vec<u8> = image
                    .as_bytes()
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
                    .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| EditError::EncodeError(e.to_string()))?;
            }
            OutputFormat::Tiff(compression) => {
                let compression = match compression {
                    TiffCompression::None => Compression::Uncompressed,
                    TiffCompression::Lzw => Compression::Lzw,
                    TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
                    TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
                    TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
                };
                let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                    .map_err(|e| EditError::EncodeError(e.to_string()))?
                    .with_compression(compression);
                encoder
                    .write_image::<colortype::RGBA8>(width, height, image.as_bytes())
                    .map_err(|e| EditError::EncodeError(e.to_string()))?;
            }
        }

        output.write_all(&buffer)?;

        debug!("Encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn dimension(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| EditError::EncodeError(format!("dimension {} exceeds u32", value)))
}
