use crate::error::{CaptchaError, CaptchaResult};
use crate::rand::Entropy;

/// Size of each digit and of the dots they are stamped with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Horizontal extent reserved for one glyph, excluding the one-dot gap after it.
    pub glyph_width: i32,
    /// Vertical extent of one glyph.
    pub cell_height: i32,
    /// Base dot size. Glyph dots have radius `dot_size / 2`.
    pub dot_size: i32,
    /// Whether the available height, rather than width, decided the cell size.
    pub height_bound: bool,
    digit_count: i32,
}

/// Margin around the digit block: a fifth of the smaller canvas dimension.
fn sizing_border(width: i32, height: i32) -> i32 {
    if width > height {
        height / 5
    } else {
        width / 5
    }
}

/// Margin used when placing the block: a sixth of the smaller canvas dimension.
fn placement_border(width: i32, height: i32) -> i32 {
    if width > height {
        height / 6
    } else {
        width / 6
    }
}

impl Layout {
    /// Fits `digit_count` glyphs of `font_width` x `font_height` cells into the canvas.
    ///
    /// Cells are first sized from the usable width (with one cell of spacing per glyph); if the
    /// resulting height does not fit, they are sized from the usable height instead.
    pub fn size(
        width: i32,
        height: i32,
        digit_count: usize,
        font_width: usize,
        font_height: usize,
    ) -> CaptchaResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CaptchaError::invalid_input(format!(
                "canvas must be non-empty, got {}x{}",
                width, height
            )));
        }
        let digit_count = i32::try_from(digit_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| CaptchaError::invalid_input("digit count out of range"))?;

        let border = sizing_border(width, height);
        let w = f64::from(width - border * 2);
        let h = f64::from(height - border * 2);
        // One extra column accounts for the spacing between digits.
        let fw = (font_width + 1) as f64;
        let fh = font_height as f64;

        let mut nw = w / f64::from(digit_count);
        let mut nh = nw * fh / fw;
        let height_bound = nh > h;
        if height_bound {
            nh = h;
            nw = fw / fh * nh;
        }
        if (nw as i32) < 1 || (nh as i32) < 1 {
            return Err(CaptchaError::geometry(format!(
                "{} digits do not fit into {}x{}",
                digit_count, width, height
            )));
        }

        let dot_size = ((nh / fh) as i32).max(1);
        Ok(Layout {
            glyph_width: nw as i32 - dot_size,
            cell_height: nh as i32,
            dot_size,
            height_bound,
            digit_count,
        })
    }

    /// Horizontal distance between the origins of consecutive glyphs.
    pub fn advance(&self) -> i32 {
        self.glyph_width + self.dot_size
    }

    /// Width of the whole digit block, including one trailing dot.
    pub fn block_width(&self) -> i32 {
        self.advance() * self.digit_count + self.dot_size
    }

    /// Height of the block, leaving a dot of room above and below for jitter.
    pub fn block_height(&self) -> i32 {
        self.cell_height + self.dot_size * 2
    }

    /// Picks the top-left corner of the digit block.
    ///
    /// The block keeps a margin of a sixth of the smaller canvas dimension where it can; on
    /// cramped axes the margin shrinks to at most half the free space so a position always
    /// exists.
    pub fn anchor(
        &self,
        rng: &mut impl Entropy,
        width: i32,
        height: i32,
    ) -> CaptchaResult<(i32, i32)> {
        let max_x = width - self.block_width();
        let max_y = height - self.block_height();
        if max_x < 0 || max_y < 0 {
            return Err(CaptchaError::geometry(format!(
                "digit block of {}x{} does not fit into {}x{}",
                self.block_width(),
                self.block_height(),
                width,
                height
            )));
        }
        let border = placement_border(width, height);
        let bx = border.min(max_x / 2);
        let by = border.min(max_y / 2);
        let x = rng.int(bx, max_x - bx)?;
        let y = rng.int(by, max_y - by)?;
        Ok((x, y))
    }
}
