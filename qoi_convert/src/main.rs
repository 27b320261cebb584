//! Command line converter between QOI images and PPM/PNG files.
//!
//! ```sh
//! qoi_convert encode photo.ppm photo.qoi
//! qoi_convert decode photo.qoi photo.png -f png
//! ```
//!
//! The `encode` operation unpacks the input file with the selected format
//! adapter and compresses the raw pixels to a QOI file; `decode` goes the
//! other way. All codec work happens in the `qoi_codec` crate; this binary
//! is file handling and dispatch.

mod png;
mod ppm;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use qoi_codec::ImageMeta;

// Input files larger than this are rejected before any parsing.
const MAX_FILE_SIZE: u64 = 1_000_000_000; // 1GB

const USAGE: &str = "\
usage: qoi_convert <operation> <input> <output> [-f <format>]

operations:
  encode    compress an image file into a QOI file
  decode    expand a QOI file into an image file

options:
  -f, --format <format>    image format to encode from or decode to,
                           either ppm (default) or png
  -h, --help               show this help
";

// Raw pixel data plus its metadata, as produced by a format adapter.
pub struct RawImage {
  pub meta: ImageMeta,
  pub pixels: Vec<u8>,
}

#[derive(Clone, Copy)]
enum Format {
  Ppm,
  Png,
}

struct Args {
  operation: String,
  input: PathBuf,
  output: PathBuf,
  format: Format,
}

fn main() -> Result<()> {
  env_logger::init();

  let args = parse_args(env::args().skip(1))?;

  match args.operation.as_str() {
    "encode" => encode_file(&args),
    "decode" => decode_file(&args),
    other => {
      bail!("invalid operation {other:?}, use either <encode> or <decode>")
    }
  }
}

fn parse_args<I: Iterator<Item = String>>(mut raw: I) -> Result<Args> {
  let mut positional = Vec::new();
  let mut format = Format::Ppm;

  while let Some(arg) = raw.next() {
    match arg.as_str() {
      "-f" | "--format" => {
        let value = raw.next().context("expected a value after -f")?;

        format = match value.as_str() {
          "ppm" => Format::Ppm,
          "png" => Format::Png,
          other => {
            bail!("invalid file format {other:?}, supported formats are <ppm> and <png>")
          }
        };
      }
      "-h" | "--help" => {
        print!("{USAGE}");
        std::process::exit(0);
      }
      _ => positional.push(arg),
    }
  }

  let [operation, input, output]: [String; 3] = positional
    .try_into()
    .map_err(|_| anyhow::anyhow!("expected <operation> <input> <output>\n\n{USAGE}"))?;

  Ok(Args {
    operation,
    input: PathBuf::from(input),
    output: PathBuf::from(output),
    format,
  })
}

fn encode_file(args: &Args) -> Result<()> {
  let input = read_input(&args.input)?;

  let image = match args.format {
    Format::Ppm => ppm::parse(&input)
      .with_context(|| format!("failed to read PPM file {}", args.input.display()))?,
    Format::Png => png::parse(&input)
      .with_context(|| format!("failed to read PNG file {}", args.input.display()))?,
  };

  let encoded = qoi_codec::encode(&image.pixels, &image.meta)?;

  info!(
    "encoded {} ({} bytes) into {} bytes",
    args.input.display(),
    image.pixels.len(),
    encoded.len(),
  );

  fs::write(&args.output, &encoded)
    .with_context(|| format!("failed to write {}", args.output.display()))
}

fn decode_file(args: &Args) -> Result<()> {
  let input = read_input(&args.input)?;
  let image = qoi_codec::decode(&input)?;

  info!(
    "decoded {} into a {}x{} image with {} channels",
    args.input.display(),
    image.meta.width,
    image.meta.height,
    image.meta.channels,
  );

  match args.format {
    Format::Ppm => fs::write(&args.output, ppm::to_bytes(&image.meta, &image.pixels))
      .with_context(|| format!("failed to write {}", args.output.display())),
    Format::Png => png::write(&args.output, &image.meta, &image.pixels),
  }
}

// Reads a whole input file, refusing anything over the size guard.
fn read_input(path: &Path) -> Result<Vec<u8>> {
  let bytes =
    fs::read(path).with_context(|| format!("failed to open file {}", path.display()))?;

  if bytes.len() as u64 > MAX_FILE_SIZE {
    bail!("{} exceeds the limit of 1GB", path.display());
  }

  Ok(bytes)
}
