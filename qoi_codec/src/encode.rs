use log::debug;

use crate::error::Error;
use crate::meta::{ImageMeta, QOI_END_MARKER, QOI_HEADER_LEN, QOI_MAGIC, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::{Delta, Pixel};
use crate::state::State;

/// Encodes an image's raw pixel data and `ImageMeta` into a QOI byte stream.
///
/// `pixels` must hold exactly `width * height * channels` bytes of row-major
/// pixel data, `channels` bytes per pixel. A channel count other than 3 or 4
/// fails with `Error::UnsupportedChannels` before any output is produced,
/// and a mismatched buffer length fails with `Error::BufferSize`.
///
/// The returned buffer is freshly allocated and starts with the serialized
/// header and ends with the 8-byte end marker. Encoding state is private to
/// the call; consecutive calls never observe each other.
pub fn encode(pixels: &[u8], meta: &ImageMeta) -> Result<Vec<u8>, Error> {
  if meta.channels != 3 && meta.channels != 4 {
    return Err(Error::UnsupportedChannels(meta.channels));
  }

  let channels = meta.channels as usize;
  let expected = meta.num_pixels() * channels;

  if pixels.len() != expected {
    return Err(Error::BufferSize { len: pixels.len(), expected });
  }

  let mut out = Vec::with_capacity(QOI_HEADER_LEN + expected + QOI_END_MARKER.len());
  encode_header(meta, &mut out);

  let mut state = State::new();

  for chunk in pixels.chunks_exact(channels) {
    let pixel = Pixel {
      r: chunk[0],
      g: chunk[1],
      b: chunk[2],
      a: if channels == 4 { chunk[3] } else { 255 },
    };

    encode_pixel(&mut state, pixel, &mut out);
    state.prev = pixel;
  }

  if state.run > 0 {
    Op::Run(state.run).push_to(&mut out);
  }

  out.extend_from_slice(&QOI_END_MARKER);

  debug!(
    "encoded {}x{} image, {} -> {} bytes",
    meta.width,
    meta.height,
    pixels.len(),
    out.len(),
  );

  Ok(out)
}

// Serializes the 14-byte header: magic, big-endian dimensions, channel
// count, colorspace byte.
fn encode_header(meta: &ImageMeta, out: &mut Vec<u8>) {
  out.extend_from_slice(&QOI_MAGIC);
  out.extend_from_slice(&meta.width.to_be_bytes());
  out.extend_from_slice(&meta.height.to_be_bytes());
  out.push(meta.channels);
  out.push(meta.colorspace);
}

// Encodes one pixel against the running state, trying ops from cheapest to
// most verbose: run, cache index, small diff, luma diff, verbatim RGB,
// verbatim RGBA. A pixel absorbed into a run produces no output until the
// run is flushed.
fn encode_pixel(state: &mut State, pixel: Pixel, out: &mut Vec<u8>) {
  if pixel == state.prev {
    state.run += 1;

    if state.run == QOI_MAX_RUN {
      Op::Run(QOI_MAX_RUN).push_to(out);
      state.run = 0;
    }

    return;
  }

  if state.run > 0 {
    Op::Run(state.run).push_to(out);
    state.run = 0;
  }

  if let Some(index) = state.lookup(pixel) {
    Op::Index(index).push_to(out);
    return;
  }

  match pixel.delta_from(&state.prev) {
    Some(Delta::Rgb(dr, dg, db)) => {
      Op::Diff(dr, dg, db).push_to(out);
    }
    Some(Delta::Luma(luma_g, luma_rg, luma_bg)) => {
      Op::Luma(luma_g, luma_rg, luma_bg).push_to(out);
    }
    None if pixel.a == state.prev.a => {
      Op::Rgb(pixel.r, pixel.g, pixel.b).push_to(out);
    }
    None => {
      Op::Rgba(pixel.r, pixel.g, pixel.b, pixel.a).push_to(out);
    }
  }
}
