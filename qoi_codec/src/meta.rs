/// The 4-byte magic opening every QOI stream.
pub const QOI_MAGIC: [u8; 4] = *b"qoif";

/// The fixed 8-byte sequence closing every QOI stream.
pub const QOI_END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Serialized header length: magic + width + height + channels + colorspace.
pub const QOI_HEADER_LEN: usize = 14;

/// Longest run a single run op can express.
pub const QOI_MAX_RUN: u8 = 62;

/// Upper bound on the size of a byte buffer accepted for decoding (1 GB).
pub const MAX_DECODE_LEN: usize = 1_000_000_000;

/// Metadata describing an image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageMeta {
  /// The image's width in pixels.
  pub width: u32,
  /// The image's height in pixels.
  pub height: u32,
  /// The number of color channels per pixel: 3 for RGB, 4 for RGBA. Color
  /// channels are assumed to not be pre-multiplied with the alpha channel
  /// ("un-premultiplied alpha").
  pub channels: u8,
  /// The image's colorspace byte. Carried through the header verbatim and
  /// never interpreted by the codec.
  pub colorspace: u8,
}

impl ImageMeta {
  /// Returns the total number of pixels that make up the image.
  pub fn num_pixels(&self) -> usize {
    self.width as usize * self.height as usize
  }
}
