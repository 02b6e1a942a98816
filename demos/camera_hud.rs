//! Renders the camera HUD over a synthetic frame at a few resolutions and a few
//! battery levels, then writes PNGs to the current directory.

use region_fx::image_edit::{
    Effect, OutputFormat, OverlayConfig, PixelBuffer, Region, add_camera_overlay, apply_mosaic_to_region,
    apply_motion_blur_to_region, EditConfig, RegionEditPipeline, ImageSaver, StandardImageCodec,
};
use region_fx::logger;
use tracing::info;

fn sky(width: usize, height: usize) -> PixelBuffer {
    let mut frame = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
    for y in 0..height {
        let t = y as f64 / height.max(1) as f64;
        for x in 0..width {
            let r = (40.0 + 80.0 * t) as u8;
            let g = (90.0 + 60.0 * t) as u8;
            let b = (200.0 - 90.0 * t + 30.0 * (x as f64 / width as f64)) as u8;
            frame.set_pixel(x, y, [r, g, b, 255]);
        }
    }
    frame
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let config = OverlayConfig::default();
    for (width, height) in [(200, 200), (1280, 720), (4000, 3000)] {
        for battery in [0.1, 0.5, 0.95] {
            let frame = add_camera_overlay(&sky(width, height), battery, "00:03:17", &config);
            let name = format!("hud_{}x{}_{:.0}.png", width, height, battery * 100.0);
            let mut file = std::fs::File::create(&name)?;
            StandardImageCodec.save(&frame, &mut file, OutputFormat::Png)?;
            info!(file = %name, "Wrote overlay");
        }
    }

    // the same effects through the pipeline, chained in memory
    let pipeline = RegionEditPipeline::new(EditConfig::default());
    let frame = sky(640, 480);
    let face = Region::polygon([(250.0, 140.0), (390.0, 140.0), (420.0, 300.0), (220.0, 300.0)]);
    let frame = apply_mosaic_to_region(&frame, &face, 16)?;
    let frame = apply_motion_blur_to_region(&frame, &Region::rect(0.0, 360.0, 640.0, 119.0), 25, 0.0)?;
    let frame = pipeline.apply(
        &frame,
        None,
        &Effect::CameraOverlay {
            battery_ratio: 0.25,
            timer_text: "00:00:42".to_string(),
        },
    )?;
    let mut file = std::fs::File::create("hud_composite.png")?;
    StandardImageCodec.save(&frame, &mut file, OutputFormat::Png)?;
    info!("Wrote hud_composite.png");

    Ok(())
}
