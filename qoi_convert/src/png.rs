//! PNG adapter, backed by the `image` crate. The source's color type
//! decides the channel count handed to the encoder: anything carrying alpha
//! becomes 4-channel RGBA, everything else 3-channel RGB.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat};
use qoi_codec::ImageMeta;

use crate::RawImage;

pub fn parse(bytes: &[u8]) -> Result<RawImage> {
  let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
    .context("failed to decode PNG data")?;

  let width = decoded.width();
  let height = decoded.height();

  let (channels, pixels) = if decoded.color().has_alpha() {
    (4, decoded.into_rgba8().into_raw())
  } else {
    (3, decoded.into_rgb8().into_raw())
  };

  Ok(RawImage {
    meta: ImageMeta { width, height, channels, colorspace: 0 },
    pixels,
  })
}

pub fn write(path: &Path, meta: &ImageMeta, pixels: &[u8]) -> Result<()> {
  let file =
    File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

  let color = if meta.channels == 4 {
    ColorType::Rgba8
  } else {
    ColorType::Rgb8
  };

  PngEncoder::new(BufWriter::new(file))
    .write_image(pixels, meta.width, meta.height, color)
    .with_context(|| format!("failed to write PNG file {}", path.display()))
}
