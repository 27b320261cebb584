use log::debug;

use crate::error::Error;
use crate::meta::{ImageMeta, MAX_DECODE_LEN, QOI_END_MARKER, QOI_HEADER_LEN, QOI_MAGIC};
use crate::op::{Op, OpStream};
use crate::pixel::{Delta, Pixel};
use crate::state::State;

/// A decoded image: its metadata and raw pixel data. `pixels` holds
/// `width * height * channels` bytes of row-major data, `channels` bytes per
/// pixel; the alpha byte is present only for 4-channel images.
#[derive(Debug, Eq, PartialEq)]
pub struct DecodedImage {
  pub meta: ImageMeta,
  pub pixels: Vec<u8>,
}

/// Decodes a QOI byte stream into raw pixel data and its `ImageMeta`.
///
/// The stream must open with a well-formed 14-byte header and close with the
/// fixed 8-byte end marker; both are validated before any opcode is
/// processed. The opcode section between them must produce exactly
/// `width * height` pixels. Decoding state is private to the call;
/// consecutive calls never observe each other.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, Error> {
  if bytes.len() > MAX_DECODE_LEN {
    return Err(Error::OversizedInput(bytes.len()));
  }

  let meta = decode_header(bytes)?;

  if bytes.len() < QOI_HEADER_LEN + QOI_END_MARKER.len() {
    return Err(Error::MissingEndMarker);
  }

  let payload_end = bytes.len() - QOI_END_MARKER.len();

  if bytes[payload_end..] != QOI_END_MARKER {
    return Err(Error::MissingEndMarker);
  }

  debug!(
    "decoding {}x{} image, {} channels, {} opcode bytes",
    meta.width,
    meta.height,
    meta.channels,
    payload_end - QOI_HEADER_LEN,
  );

  let channels = meta.channels as usize;
  let mut stream = OpStream::new(&bytes[QOI_HEADER_LEN..payload_end]);
  let mut state = State::new();
  let mut pixels = Vec::with_capacity(meta.num_pixels() * channels);

  for _ in 0..meta.num_pixels() {
    let pixel = next_pixel(&mut state, &mut stream)?;

    // Mirrors the encoder's bookkeeping exactly; skipping either update
    // desynchronizes every later index op.
    state.remember(pixel);
    state.prev = pixel;

    pixels.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);

    if channels == 4 {
      pixels.push(pixel.a);
    }
  }

  Ok(DecodedImage { meta, pixels })
}

// Validates and deserializes the 14-byte header.
fn decode_header(bytes: &[u8]) -> Result<ImageMeta, Error> {
  if bytes.len() < QOI_HEADER_LEN {
    return Err(Error::InvalidHeader);
  }

  if bytes[..4] != QOI_MAGIC {
    return Err(Error::InvalidHeader);
  }

  let channels = bytes[12];

  if channels != 3 && channels != 4 {
    return Err(Error::UnsupportedChannels(channels));
  }

  Ok(ImageMeta {
    width: u32::from_be_bytes(bytes[4..8].try_into()?),
    height: u32::from_be_bytes(bytes[8..12].try_into()?),
    channels,
    colorspace: bytes[13],
  })
}

// Produces the next pixel, either by replaying the pending run or by
// reading and dispatching one op.
fn next_pixel(state: &mut State, stream: &mut OpStream<'_>) -> Result<Pixel, Error> {
  if state.run > 0 {
    state.run -= 1;
    return Ok(state.prev);
  }

  let pixel = match Op::read_from(stream)? {
    Op::Diff(dr, dg, db) => Pixel::apply_delta(Delta::Rgb(dr, dg, db), &state.prev),
    Op::Index(index) => state.cache[index as usize],
    Op::Luma(luma_g, luma_rg, luma_bg) => {
      Pixel::apply_delta(Delta::Luma(luma_g, luma_rg, luma_bg), &state.prev)
    }
    Op::Rgb(r, g, b) => Pixel { r, g, b, a: state.prev.a },
    Op::Rgba(r, g, b, a) => Pixel { r, g, b, a },
    Op::Run(len) => {
      state.run = len - 1;
      state.prev
    }
  };

  Ok(pixel)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn op_bytes(op: Op) -> Vec<u8> {
    let mut bytes = Vec::new();
    op.push_to(&mut bytes);
    bytes
  }

  #[test]
  fn test_decoding_image_header() {
    let mut header = Vec::new();

    header.extend_from_slice(&QOI_MAGIC);
    header.extend_from_slice(&7u32.to_be_bytes());
    header.extend_from_slice(&9u32.to_be_bytes());
    header.extend_from_slice(&[4, 1]);

    assert_eq!(
      decode_header(&header),
      Ok(ImageMeta { width: 7, height: 9, channels: 4, colorspace: 1 })
    );
  }

  #[test]
  fn test_decoding_header_with_bad_magic() {
    let mut header = Vec::new();

    header.extend_from_slice(&[b'q', b'q', b'q', b'q']);
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&[4, 0]);

    assert_eq!(decode_header(&header), Err(Error::InvalidHeader));
  }

  #[test]
  fn test_decoding_header_with_bad_channels() {
    let mut header = Vec::new();

    header.extend_from_slice(&QOI_MAGIC);
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&[5, 0]);

    assert_eq!(decode_header(&header), Err(Error::UnsupportedChannels(5)));
  }

  #[test]
  fn test_decoding_truncated_header() {
    assert_eq!(decode_header(b"qoif"), Err(Error::InvalidHeader));
  }

  #[test]
  fn test_decoding_rgb_op() {
    let mut state = State::new();
    let source = op_bytes(Op::Rgb(101, 102, 103));

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Ok(Pixel { r: 101, g: 102, b: 103, a: 255 })
    );
  }

  #[test]
  fn test_decoding_rgba_op() {
    let mut state = State::new();
    let source = op_bytes(Op::Rgba(101, 102, 103, 104));

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Ok(Pixel { r: 101, g: 102, b: 103, a: 104 })
    );
  }

  #[test]
  fn test_decoding_run_op() {
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };
    let source = op_bytes(Op::Run(2));
    let mut stream = OpStream::new(&source);

    state.prev = pixel;

    assert_eq!(next_pixel(&mut state, &mut stream), Ok(pixel));
    assert_eq!(state.run, 1);

    // The second pixel of the run comes from state, not the stream.
    assert_eq!(next_pixel(&mut state, &mut stream), Ok(pixel));
    assert_eq!(state.run, 0);
  }

  #[test]
  fn test_decoding_index_op() {
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };
    let source = op_bytes(Op::Index(pixel.cache_index() as u8));

    state.remember(pixel);

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Ok(pixel)
    );
  }

  #[test]
  fn test_decoding_diff_op() {
    let mut state = State::new();
    let pixel_a = Pixel { r: 100, g: 100, b: 100, a: 255 };
    let pixel_b = Pixel { r: 101, g: 101, b: 101, a: 255 };

    state.prev = pixel_a;

    let source = match pixel_b.delta_from(&pixel_a) {
      Some(Delta::Rgb(dr, dg, db)) => op_bytes(Op::Diff(dr, dg, db)),
      _ => panic!("expected an rgb delta"),
    };

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Ok(pixel_b)
    );
  }

  #[test]
  fn test_decoding_luma_op() {
    let mut state = State::new();
    let pixel_a = Pixel { r: 100, g: 100, b: 100, a: 255 };
    let pixel_b = Pixel { r: 100, g: 108, b: 100, a: 255 };

    state.prev = pixel_a;

    let source = match pixel_b.delta_from(&pixel_a) {
      Some(Delta::Luma(luma_g, luma_rg, luma_bg)) => {
        op_bytes(Op::Luma(luma_g, luma_rg, luma_bg))
      }
      _ => panic!("expected a luma delta"),
    };

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Ok(pixel_b)
    );
  }

  #[test]
  fn test_decoding_op_cut_short() {
    let mut state = State::new();
    let source = [0xfe, 101, 102]; // Op::Rgb missing its blue byte

    assert_eq!(
      next_pixel(&mut state, &mut OpStream::new(&source)),
      Err(Error::TruncatedStream)
    );
  }
}
