use crate::color::TRANSPARENT_INDEX;
use crate::error::{CaptchaError, CaptchaResult};

/// Largest supported width or height.
pub const MAX_SIDE: u32 = 1 << 15;

/// A fixed-size grid of palette indices, stored row-major.
///
/// Coordinates are signed: drawing routines routinely produce positions off the canvas, which
/// are dropped on write and read back as [`TRANSPARENT_INDEX`].
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Raster {
    /// Creates a fully transparent raster. Both sides must be within `1..=MAX_SIDE`.
    pub fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        if !(1..=MAX_SIDE).contains(&width) || !(1..=MAX_SIDE).contains(&height) {
            return Err(CaptchaError::invalid_input(format!(
                "canvas sides must be within 1..={}, got {}x{}",
                MAX_SIDE, width, height
            )));
        }
        Ok(Raster {
            width: width as i32,
            height: height as i32,
            pixels: vec![TRANSPARENT_INDEX; width as usize * height as usize],
        })
    }

    /// Blank raster with the same dimensions.
    pub fn blank_like(&self) -> Self {
        Raster {
            width: self.width,
            height: self.height,
            pixels: vec![TRANSPARENT_INDEX; self.pixels.len()],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if (0..self.width).contains(&x) && (0..self.height).contains(&y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn index_at(&self, x: i32, y: i32) -> u8 {
        self.offset(x, y)
            .map_or(TRANSPARENT_INDEX, |i| self.pixels[i])
    }

    pub fn set_index(&mut self, x: i32, y: i32, index: u8) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = index;
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[cfg(test)]
    pub(crate) fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.pixels.chunks(self.width as usize)
    }

    /// Fills `from_x..=to_x` on row `y`.
    pub fn draw_hline(&mut self, from_x: i32, to_x: i32, y: i32, index: u8) {
        for x in from_x..=to_x {
            self.set_index(x, y, index);
        }
    }

    /// Fills a disc using the midpoint circle walk.
    ///
    /// Each step of the octant walk fills the four horizontal spans it reaches instead of
    /// plotting the eight boundary points.
    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32, index: u8) {
        let mut f = 1 - radius;
        let mut dfx = 1;
        let mut dfy = -2 * radius;
        let mut xo = 0;
        let mut yo = radius;

        self.set_index(x, y + radius, index);
        self.set_index(x, y - radius, index);
        self.draw_hline(x - radius, x + radius, y, index);

        while xo < yo {
            if f >= 0 {
                yo -= 1;
                dfy += 2;
                f += dfy;
            }
            xo += 1;
            dfx += 2;
            f += dfx;
            self.draw_hline(x - xo, x + xo, y + yo, index);
            self.draw_hline(x - xo, x + xo, y - yo, index);
            self.draw_hline(x - yo, x + yo, y + xo, index);
            self.draw_hline(x - yo, x + yo, y - xo, index);
        }
    }
}
