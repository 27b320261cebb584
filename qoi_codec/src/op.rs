use crate::error::Error;

// An enumeration of each possible QOI encoding "chunk", or op.
pub enum Op {
  // `QOI_OP_DIFF`, the per-channel color difference from the previous pixel
  // with a bias of +2 applied to each field.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 1 |  dr |  dg |  db  |
  //
  Diff(u8, u8, u8),

  // `QOI_OP_INDEX`, a slot number in the 64-entry pixel cache.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 0 |      index       |
  //
  Index(u8),

  // `QOI_OP_LUMA`, the green difference from the previous pixel with a bias
  // of +32, followed by the red-green and blue-green differences with a
  // bias of +8.
  //
  // | 7 6   5  4  3  2  1  0 | 7  6  5  4   3  2  1  0 |
  // |------------------------|-------------------------|
  // | 1 0 |       dg         |   dr - dg  |   db - dg  |
  //
  Luma(u8, u8, u8),

  // `QOI_OP_RGB`, the verbatim red, green, and blue values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|
  // | 1  1  1  1  1  1  1  0 |   r  |   g  |   b  |
  //
  Rgb(u8, u8, u8),

  // `QOI_OP_RGBA`, the verbatim red, green, blue, and alpha values of a
  // pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|------|
  // | 1  1  1  1  1  1  1  1 |   r  |   g  |   b  |   a  |
  //
  Rgba(u8, u8, u8, u8),

  // `QOI_OP_RUN`, a repetition of the previous pixel. The variant carries
  // the actual run length (1..=62); the stored six bits are biased by -1.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 1 1 |     run - 1      |
  //
  Run(u8),
}

impl Op {
  const MASK_NIBBLE: u8 = 0x0f;
  const MASK_SIX: u8 = 0x3f;
  const MASK_TAG: u8 = 0xc0;
  const MASK_TWO: u8 = 0x03;

  const TAG_DIFF: u8 = 0x40;
  const TAG_INDEX: u8 = 0x00;
  const TAG_LUMA: u8 = 0x80;
  const TAG_RGB: u8 = 0xfe;
  const TAG_RGBA: u8 = 0xff;
  const TAG_RUN: u8 = 0xc0;

  // Serializes the op onto the end of the output buffer.
  pub fn push_to(self, out: &mut Vec<u8>) {
    match self {
      Op::Diff(dr, dg, db) => {
        out.push(Op::TAG_DIFF | (dr << 4) | (dg << 2) | db);
      }
      Op::Index(index) => {
        out.push(Op::TAG_INDEX | index);
      }
      Op::Luma(luma_g, luma_rg, luma_bg) => {
        out.extend_from_slice(&[Op::TAG_LUMA | luma_g, (luma_rg << 4) | luma_bg]);
      }
      Op::Rgb(r, g, b) => {
        out.extend_from_slice(&[Op::TAG_RGB, r, g, b]);
      }
      Op::Rgba(r, g, b, a) => {
        out.extend_from_slice(&[Op::TAG_RGBA, r, g, b, a]);
      }
      Op::Run(len) => {
        out.push(Op::TAG_RUN | (len - 1));
      }
    }
  }

  // Attempts to read one op from the stream. The two exact 8-bit tags are
  // checked before the 2-bit tag classes, which they would otherwise shadow
  // as run ops. A leading byte outside every tag pattern is a fatal
  // `CorruptOpcode` error, never a silent skip.
  pub fn read_from(stream: &mut OpStream<'_>) -> Result<Self, Error> {
    let byte = stream.take()?;

    if byte == Op::TAG_RGB {
      return Ok(Op::Rgb(stream.take()?, stream.take()?, stream.take()?));
    }

    if byte == Op::TAG_RGBA {
      return Ok(Op::Rgba(
        stream.take()?,
        stream.take()?,
        stream.take()?,
        stream.take()?,
      ));
    }

    match byte & Op::MASK_TAG {
      Op::TAG_INDEX => Ok(Op::Index(byte & Op::MASK_SIX)),
      Op::TAG_DIFF => Ok(Op::Diff(
        byte >> 4 & Op::MASK_TWO,
        byte >> 2 & Op::MASK_TWO,
        byte & Op::MASK_TWO,
      )),
      Op::TAG_LUMA => {
        let second = stream.take()?;

        Ok(Op::Luma(
          byte & Op::MASK_SIX,
          second >> 4 & Op::MASK_NIBBLE,
          second & Op::MASK_NIBBLE,
        ))
      }
      Op::TAG_RUN => Ok(Op::Run((byte & Op::MASK_SIX) + 1)),
      _ => Err(Error::CorruptOpcode(byte)),
    }
  }
}

// A bounds-checked forward view over the opcode section of an encoded
// image, between the header and the end marker.
pub struct OpStream<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> OpStream<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, pos: 0 }
  }

  // Consumes and returns the next byte, failing once the section is spent.
  fn take(&mut self) -> Result<u8, Error> {
    let byte = self
      .bytes
      .get(self.pos)
      .copied()
      .ok_or(Error::TruncatedStream)?;

    self.pos += 1;

    Ok(byte)
  }
}
