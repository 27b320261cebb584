// The two compact encodings of a pixel relative to its predecessor. Field
// values carry the wire bias already applied, so they can be packed into an
// op without further arithmetic.
pub enum Delta {
  // Per-channel difference, each channel biased by +2 (QOI_OP_DIFF).
  Rgb(u8, u8, u8),
  // Green-anchored difference: dg biased by +32, dr-dg and db-dg biased by
  // +8 (QOI_OP_LUMA).
  Luma(u8, u8, u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pixel {
  // Red channel value.
  pub r: u8,
  // Green channel value.
  pub g: u8,
  // Blue channel value.
  pub b: u8,
  // Alpha channel value.
  pub a: u8,
}

// Opaque black, the previous-pixel seed at the start of every pass.
impl Default for Pixel {
  fn default() -> Self {
    Self { r: 0, g: 0, b: 0, a: 255 }
  }
}

impl Pixel {
  // The initial content of every pixel cache slot. Distinct from the
  // previous-pixel seed, which is opaque.
  pub const ZERO: Pixel = Pixel { r: 0, g: 0, b: 0, a: 0 };

  // Attempts to express this pixel as a small difference from `prev`.
  // Returns the one-byte `Delta::Rgb` form when all three channel deltas fit
  // in [-2, 1], the two-byte `Delta::Luma` form when the green delta fits in
  // [-32, 31] and the red/blue deltas stay within [-8, 7] of it, and `None`
  // otherwise. The alpha channel must be unchanged for either form.
  pub fn delta_from(&self, prev: &Pixel) -> Option<Delta> {
    if self.a != prev.a {
      return None;
    }

    let dr = self.r.wrapping_sub(prev.r);
    let dg = self.g.wrapping_sub(prev.g);
    let db = self.b.wrapping_sub(prev.b);

    let biased_r = dr.wrapping_add(2);
    let biased_g = dg.wrapping_add(2);
    let biased_b = db.wrapping_add(2);

    if biased_r < 4 && biased_g < 4 && biased_b < 4 {
      return Some(Delta::Rgb(biased_r, biased_g, biased_b));
    }

    let luma_g = dg.wrapping_add(32);

    if luma_g > 63 {
      return None;
    }

    let luma_rg = dr.wrapping_sub(dg).wrapping_add(8);
    let luma_bg = db.wrapping_sub(dg).wrapping_add(8);

    if luma_rg < 16 && luma_bg < 16 {
      return Some(Delta::Luma(luma_g, luma_rg, luma_bg));
    }

    None
  }

  // Reconstructs the pixel a `Delta` was computed from, given the same
  // predecessor. Exact inverse of `delta_from` for in-range deltas.
  pub fn apply_delta(delta: Delta, prev: &Pixel) -> Self {
    match delta {
      Delta::Rgb(biased_r, biased_g, biased_b) => Self {
        r: prev.r.wrapping_add(biased_r.wrapping_sub(2)),
        g: prev.g.wrapping_add(biased_g.wrapping_sub(2)),
        b: prev.b.wrapping_add(biased_b.wrapping_sub(2)),
        a: prev.a,
      },
      Delta::Luma(luma_g, luma_rg, luma_bg) => {
        let dg = luma_g.wrapping_sub(32);
        let dr = luma_rg.wrapping_sub(8).wrapping_add(dg);
        let db = luma_bg.wrapping_sub(8).wrapping_add(dg);

        Self {
          r: prev.r.wrapping_add(dr),
          g: prev.g.wrapping_add(dg),
          b: prev.b.wrapping_add(db),
          a: prev.a,
        }
      }
    }
  }

  // Position of this pixel in the 64-slot cache. Must match between encoder
  // and decoder or index ops become unrecoverable.
  pub fn cache_index(&self) -> usize {
    let r = self.r as usize;
    let g = self.g as usize;
    let b = self.b as usize;
    let a = self.a as usize;

    (r * 3 + g * 5 + b * 7 + a * 11) % 64
  }
}
