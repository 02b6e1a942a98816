use std::str::FromStr;

use anyhow::{Context, bail};
use region_fx::image_edit::{EditConfig, Effect, OutputFormat, Point, Region, RegionEditPipeline};
use region_fx::logger;

use tracing::{error, info};

const USAGE: &str = "usage: region_fx <input> <output> <effect> [args...] [--rect x,y,w,h | --polygon x,y;x,y;...]

effects:
  mosaic [block_size]
  blur [intensity] [angle]
  overlay [battery_ratio] [timer_text]
  text <text> [size] [angle]";

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (positional, region) = split_region(&args)?;
    if positional.len() < 3 {
        bail!("{}", USAGE);
    }
    let (input, output, effect_name, params) = (&positional[0], &positional[1], &positional[2], &positional[3..]);

    let mut builder = EditConfig::builder();
    if let Some(format) = OutputFormat::from_path(output) {
        builder = builder.output_format(format);
    }
    let config = builder.build();
    let effect = parse_effect(effect_name, params, &config)?;

    info!("Starting region_fx...");
    let pipeline = RegionEditPipeline::new(config);
    info!("Output format: {:?}", pipeline.config().output_format);
    info!("Effect: {}", effect.name());
    if region.is_none() && effect.needs_region() {
        info!("No selection given, the image is copied unchanged");
    }

    match pipeline.edit_file(input, output, region.as_ref(), &effect) {
        Ok(_) => info!("Edit successful!"),
        Err(e) => {
            error!("Edit failed: {}", e);
            return Err(e).with_context(|| format!("editing {}", input));
        }
    }

    Ok(())
}

fn split_region(args: &[String]) -> anyhow::Result<(Vec<String>, Option<Region>)> {
    let mut positional = Vec::new();
    let mut region = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--rect" => {
                let value = iter.next().context("--rect needs x,y,w,h")?;
                let v = parse_numbers(value, ',')?;
                if v.len() != 4 {
                    bail!("--rect needs exactly four numbers, got {}", v.len());
                }
                region = Some(Region::rect(v[0], v[1], v[2], v[3]));
            }
            "--polygon" => {
                let value = iter.next().context("--polygon needs x,y;x,y;...")?;
                let points = value
                    .split(';')
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| {
                        let v = parse_numbers(p, ',')?;
                        if v.len() != 2 {
                            bail!("polygon point '{}' is not x,y", p);
                        }
                        Ok(Point::new(v[0], v[1]))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                region = Some(Region::Polygon(points));
            }
            _ => positional.push(arg.clone()),
        }
    }
    Ok((positional, region))
}

fn parse_numbers(value: &str, separator: char) -> anyhow::Result<Vec<f64>> {
    value
        .split(separator)
        .map(|n| n.trim().parse::<f64>().with_context(|| format!("'{}' is not a number", n)))
        .collect()
}

fn parse_effect(name: &str, params: &[String], config: &EditConfig) -> anyhow::Result<Effect> {
    let defaults = &config.defaults;
    let arg = |i: usize| params.get(i).map(String::as_str);

    let effect = match name {
        "mosaic" => Effect::Mosaic {
            block_size: parse_or(arg(0), defaults.block_size)?,
        },
        "blur" => Effect::MotionBlur {
            intensity: parse_or(arg(0), defaults.blur_intensity)?,
            angle: parse_or(arg(1), defaults.blur_angle)?,
        },
        "overlay" => Effect::CameraOverlay {
            battery_ratio: parse_or(arg(0), 1.0)?,
            timer_text: arg(1).unwrap_or_default().to_string(),
        },
        "text" => {
            let text = arg(0).context("text effect needs the text to stamp")?;
            let size = parse_or(arg(1), defaults.text_size)?;
            let angle = parse_or(arg(2), defaults.text_angle)?;
            let (size, angle) = defaults.clamp_text(size, angle);
            let mut style = defaults.text_style(text).rotated(angle);
            style.size_px = size;
            Effect::Text(style)
        }
        other => bail!("unknown effect '{}'\n{}", other, USAGE),
    };
    Ok(effect)
}

fn parse_or<T>(value: Option<&str>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v.parse::<T>().with_context(|| format!("invalid value '{}'", v)),
        None => Ok(default),
    }
}
