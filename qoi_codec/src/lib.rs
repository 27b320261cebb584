//! This crate implements an encoder and decoder for the
//! [QOI image format](https://qoiformat.org).
//!
//! The two primary exports are the `encode` and `decode` functions. Both are
//! one-shot transforms over in-memory buffers: they borrow their input,
//! return a freshly allocated output buffer, and keep no state between
//! calls. The pixel cache and previous-pixel bookkeeping the format requires
//! are rebuilt inside every call, so two transforms can never contaminate
//! each other.
//!
//! To keep this crate simple, it does not read or write other image
//! formats. To encode an image, it will first need to be unpacked into raw
//! row-major pixel bytes using another method; the `qoi_convert` binary in
//! this workspace does that for PPM and PNG files.
//!
//! # Encode example
//!
//! ```rust
//! use qoi_codec::{encode, ImageMeta};
//!
//! // A 1x1 image made up of a single opaque black pixel.
//! let pixels = [0, 0, 0, 255];
//!
//! let meta = ImageMeta {
//!   width: 1,
//!   height: 1,
//!   channels: 4,
//!   colorspace: 0,
//! };
//!
//! let encoded = encode(&pixels, &meta).expect("failed to encode image");
//! assert_eq!(&encoded[..4], b"qoif");
//! ```
//!
//! # Decode example
//!
//! ```rust
//! use qoi_codec::{decode, encode, ImageMeta};
//!
//! let meta = ImageMeta { width: 2, height: 1, channels: 3, colorspace: 0 };
//! let encoded = encode(&[10, 20, 30, 10, 20, 30], &meta).expect("failed to encode image");
//!
//! let image = decode(&encoded).expect("failed to decode image");
//! assert_eq!(image.meta, meta);
//! assert_eq!(image.pixels, vec![10, 20, 30, 10, 20, 30]);
//! ```

pub use crate::decode::{decode, DecodedImage};
pub use crate::encode::encode;
pub use crate::error::Error;
pub use crate::meta::{
  ImageMeta, MAX_DECODE_LEN, QOI_END_MARKER, QOI_HEADER_LEN, QOI_MAGIC, QOI_MAX_RUN,
};

mod decode;
mod encode;
mod error;
mod meta;
mod op;
mod pixel;
mod state;
