//! Reader and writer for binary (P6) PPM files, the converter's default
//! image container. Only 8-bit RGB data is supported: the header's max
//! pixel value must be exactly 255.

use anyhow::{bail, ensure, Context, Result};
use qoi_codec::ImageMeta;

use crate::RawImage;

// Parses a P6 file into raw pixels and metadata. The header is a `P6`
// magic, then width, height, and max value as ASCII tokens; `#` comment
// lines and runs of whitespace may appear between tokens. A single
// whitespace byte separates the header from `width * height * 3` bytes of
// RGB data.
pub fn parse(bytes: &[u8]) -> Result<RawImage> {
  let mut cursor = 0;

  let magic = next_token(bytes, &mut cursor).context("missing PPM magic")?;
  ensure!(
    magic == b"P6",
    "unsupported PPM format, only P6 (binary RGB) is supported",
  );

  let width = next_number(bytes, &mut cursor).context("missing image width")?;
  let height = next_number(bytes, &mut cursor).context("missing image height")?;
  let max_value = next_number(bytes, &mut cursor).context("missing max pixel value")?;

  ensure!(
    max_value == 255,
    "only 8-bit PPM files (max color 255) are supported",
  );

  // the single delimiter byte before the pixel data
  cursor += 1;

  let expected = width as usize * height as usize * 3;
  ensure!(
    bytes.len() >= cursor + expected,
    "unable to read pixel data from PPM file",
  );

  Ok(RawImage {
    meta: ImageMeta { width, height, channels: 3, colorspace: 0 },
    pixels: bytes[cursor..cursor + expected].to_vec(),
  })
}

// Serializes decoded pixels as a P6 file. PPM has no alpha channel, so for
// 4-channel pixels only the leading RGB bytes of each pixel are written.
pub fn to_bytes(meta: &ImageMeta, pixels: &[u8]) -> Vec<u8> {
  let mut out = format!("P6\n{} {}\n255\n", meta.width, meta.height).into_bytes();

  if meta.channels == 4 {
    for pixel in pixels.chunks_exact(4) {
      out.extend_from_slice(&pixel[..3]);
    }
  } else {
    out.extend_from_slice(pixels);
  }

  out
}

// Advances past whitespace and `#` comment lines, then returns the token
// running up to the next whitespace byte.
fn next_token<'a>(bytes: &'a [u8], cursor: &mut usize) -> Result<&'a [u8]> {
  loop {
    match bytes.get(*cursor) {
      Some(byte) if byte.is_ascii_whitespace() => *cursor += 1,
      Some(b'#') => {
        while let Some(&byte) = bytes.get(*cursor) {
          *cursor += 1;

          if byte == b'\n' {
            break;
          }
        }
      }
      Some(_) => break,
      None => bail!("unexpected end of PPM header"),
    }
  }

  let start = *cursor;

  while let Some(byte) = bytes.get(*cursor) {
    if byte.is_ascii_whitespace() {
      break;
    }

    *cursor += 1;
  }

  Ok(&bytes[start..*cursor])
}

fn next_number(bytes: &[u8], cursor: &mut usize) -> Result<u32> {
  let token = next_token(bytes, cursor)?;

  std::str::from_utf8(token)
    .ok()
    .and_then(|token| token.parse().ok())
    .with_context(|| format!("invalid number in PPM header: {:?}", token))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parsing_p6_with_comments() {
    let file = b"P6\n# made by hand\n2 1\n255\n\x01\x02\x03\x04\x05\x06";
    let image = parse(file).expect("failed to parse PPM");

    assert_eq!(image.meta.width, 2);
    assert_eq!(image.meta.height, 1);
    assert_eq!(image.meta.channels, 3);
    assert_eq!(image.pixels, vec![1, 2, 3, 4, 5, 6]);
  }

  #[test]
  fn test_parsing_rejects_ascii_ppm() {
    assert!(parse(b"P3\n1 1\n255\n1 2 3\n").is_err());
  }

  #[test]
  fn test_parsing_rejects_wide_pixels() {
    assert!(parse(b"P6\n1 1\n65535\n\x00\x00\x00\x00\x00\x00").is_err());
  }

  #[test]
  fn test_parsing_rejects_short_pixel_data() {
    assert!(parse(b"P6\n2 2\n255\n\x01\x02\x03").is_err());
  }

  #[test]
  fn test_write_then_parse_round_trip() {
    let meta = ImageMeta { width: 2, height: 2, channels: 3, colorspace: 0 };
    let pixels = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

    let file = to_bytes(&meta, &pixels);
    let image = parse(&file).expect("failed to parse PPM");

    assert_eq!(image.meta, meta);
    assert_eq!(image.pixels, pixels);
  }

  #[test]
  fn test_writing_drops_alpha() {
    let meta = ImageMeta { width: 1, height: 1, channels: 4, colorspace: 0 };
    let file = to_bytes(&meta, &[10, 20, 30, 255]);

    assert_eq!(&file[file.len() - 3..], &[10, 20, 30]);
  }
}
