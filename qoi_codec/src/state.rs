use crate::pixel::Pixel;

// The running state of one encode or decode pass. A fresh `State` is built
// inside every call and discarded when the call returns; two passes never
// observe each other's cache or previous pixel.
pub struct State {
  // Recently seen pixels, directly mapped by `Pixel::cache_index`.
  pub cache: [Pixel; 64],
  // The previously encoded/decoded pixel.
  pub prev: Pixel,
  // Pending pixels of the current run, not yet written or replayed.
  pub run: u8,
}

impl State {
  pub fn new() -> Self {
    Self {
      cache: [Pixel::ZERO; 64],
      prev: Pixel::default(),
      run: 0,
    }
  }

  // Stores the pixel in its cache slot, overwriting whatever was there.
  pub fn remember(&mut self, pixel: Pixel) {
    self.cache[pixel.cache_index()] = pixel;
  }

  // Returns the pixel's slot number when the cache already holds an equal
  // pixel there. On a miss the slot is overwritten with the pixel, matching
  // the unconditional cache update the decoder performs.
  pub fn lookup(&mut self, pixel: Pixel) -> Option<u8> {
    let index = pixel.cache_index();

    if self.cache[index] == pixel {
      return Some(index as u8);
    }

    self.cache[index] = pixel;

    None
  }
}
