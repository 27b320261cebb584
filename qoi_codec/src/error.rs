use std::array;
use std::error;
use std::fmt;

/// An enumeration of all error values this crate may produce. Every failure
/// is terminal for the call that raised it; no partial output is returned.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
  /// The pixel buffer handed to the encoder does not hold exactly
  /// `width * height * channels` bytes.
  BufferSize { len: usize, expected: usize },
  /// A leading byte in the opcode stream matched no known tag pattern.
  /// Decoding aborts rather than skipping the byte.
  CorruptOpcode(u8),
  /// The stream is shorter than a full header or does not open with the
  /// `qoif` magic.
  InvalidHeader,
  /// The stream does not close with the fixed 8-byte end marker.
  MissingEndMarker,
  /// The byte buffer handed to the decoder exceeds the maximum input size
  /// guard.
  OversizedInput(usize),
  /// The opcode stream ended in the middle of an op, or before enough
  /// pixels were produced.
  TruncatedStream,
  /// A channel count other than 3 or 4.
  UnsupportedChannels(u8),
}

// Header fields are read through fixed-size slices; a failed conversion can
// only mean a malformed header.
impl From<array::TryFromSliceError> for Error {
  fn from(_: array::TryFromSliceError) -> Self {
    Error::InvalidHeader
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::BufferSize { len, expected } => {
        write!(f, "pixel buffer holds {} bytes, expected {}", len, expected)
      }
      Error::CorruptOpcode(byte) => {
        write!(f, "no QOI op matches leading byte {:#04x}", byte)
      }
      Error::InvalidHeader => {
        write!(f, "invalid or malformed QOI image header")
      }
      Error::MissingEndMarker => {
        write!(f, "QOI stream does not end with the 8-byte end marker")
      }
      Error::OversizedInput(len) => {
        write!(f, "input of {} bytes exceeds the 1GB decode limit", len)
      }
      Error::TruncatedStream => {
        write!(f, "QOI opcode stream ended before decoding was completed")
      }
      Error::UnsupportedChannels(channels) => {
        write!(f, "unsupported channel count {}, expected 3 or 4", channels)
      }
    }
  }
}

impl error::Error for Error {}
