use std::io::Write;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::image_edit::blur::apply_motion_blur_to_region;
use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::editor::loader::ImageLoader;
use crate::image_edit::editor::saver::ImageSaver;
use crate::image_edit::editor::standard_codec::StandardImageCodec;
use crate::image_edit::editor::types::{EditConfig, Effect};
use crate::image_edit::mosaic::apply_mosaic_to_region;
use crate::image_edit::overlay::add_camera_overlay;
use crate::image_edit::pixels::PixelBuffer;
use crate::image_edit::region::Region;
use crate::image_edit::text::{load_font_or_default, stamp_text};

/// Decode, edit, encode.
pub struct RegionEditPipeline<L: ImageLoader, S: ImageSaver> {
    loader: L,
    saver: S,
    config: EditConfig,
}

impl RegionEditPipeline<StandardImageCodec, StandardImageCodec> {
    pub fn new(config: EditConfig) -> Self {
        Self {
            loader: StandardImageCodec,
            saver: StandardImageCodec,
            config,
        }
    }
}

impl<L: ImageLoader, S: ImageSaver> RegionEditPipeline<L, S> {
    pub fn with_custom(loader: L, saver: S, config: EditConfig) -> Self {
        Self {
            loader,
            saver,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(EditError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Parameter checks that do not need the image.
    pub fn validate_effect(&self, effect: &Effect) -> Result<()> {
        match effect {
            Effect::Mosaic { block_size } => {
                if *block_size == 0 {
                    return Err(EditError::invalid("mosaic block size must be at least 1"));
                }
            }
            Effect::MotionBlur { intensity, angle } => {
                if *intensity == 0 {
                    return Err(EditError::invalid("blur intensity must be at least 1"));
                }
                if let Some(max) = self.config.max_blur_intensity {
                    if *intensity > max {
                        return Err(EditError::invalid(format!(
                            "blur intensity {} exceeds the limit of {}",
                            intensity, max
                        )));
                    }
                }
                if !angle.is_finite() {
                    return Err(EditError::invalid("blur angle is not finite"));
                }
            }
            Effect::CameraOverlay { .. } => {}
            Effect::Text(style) => style.validate()?,
        }
        Ok(())
    }

    /// Applies `effect` to a copy of `image`.
    ///
    /// Region effects without a region return the image unchanged.
    #[instrument(skip(self, image, region), fields(effect = effect.name(), width = image.width(), height = image.height()))]
    pub fn apply(&self, image: &PixelBuffer, region: Option<&Region>, effect: &Effect) -> Result<PixelBuffer> {
        self.validate_effect(effect)?;

        match (effect, region) {
            (Effect::CameraOverlay { battery_ratio, timer_text }, _) => {
                Ok(add_camera_overlay(image, *battery_ratio, timer_text, &self.config.overlay))
            }
            (_, None) => {
                debug!("No selection, returning the image unchanged");
                Ok(image.clone())
            }
            (Effect::Mosaic { block_size }, Some(region)) => apply_mosaic_to_region(image, region, *block_size),
            (Effect::MotionBlur { intensity, angle }, Some(region)) => {
                apply_motion_blur_to_region(image, region, *intensity, *angle)
            }
            (Effect::Text(style), Some(region)) => {
                let font = load_font_or_default(self.config.overlay.font_path.as_deref());
                stamp_text(image, region, style, font.as_ref())
            }
        }
    }

    #[instrument(skip(self, input_data, output, region), fields(input_size = input_data.len(), effect = effect.name()))]
    pub fn edit(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
        region: Option<&Region>,
        effect: &Effect,
    ) -> Result<()> {
        info!("Starting region edit");
        self.validate_effect(effect)?;

        let image = {
            let _span = tracing::info_span!("decode_image").entered();
            self.loader.load(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions", width = image.width(), height = image.height())
                .entered();
            self.validate_dimensions(image.width(), image.height())?;
        }

        let edited = {
            let _span = tracing::info_span!("apply_effect").entered();
            self.apply(&image, region, effect)?
        };

        {
            let _span = tracing::info_span!("encode_image").entered();
            self.saver.save(&edited, output, self.config.output_format)?;
        }

        info!(width = edited.width(), height = edited.height(), "Edit complete");
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path, region, effect))]
    pub fn edit_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        region: Option<&Region>,
        effect: &Effect,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Editing file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path)
                .map_err(|e| EditError::InputReadError(format!("{}: {}", input_path.display(), e)))?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path)
                .map_err(|e| EditError::OutputWriteError(format!("{}: {}", output_path.display(), e)))?
        };

        self.edit(&input_data, &mut output_file, region, effect)?;

        Ok(())
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditConfig) {
        self.config = config;
    }
}
