use crate::color::PRIMARY_INDEX;
use crate::error::CaptchaResult;
use crate::font::{Glyph, FONT_HEIGHT};
use crate::math::px;
use crate::rand::Entropy;
use crate::raster::Raster;

/// Stamps `glyph` with its top-left cell at `(x, y)`, one disc per set cell.
///
/// The glyph is sheared by a skew factor drawn from `[-max_skew, max_skew]`: the horizontal
/// origin accumulates the skew once per row in floating point and is truncated anew for every
/// row. The whole glyph is also shifted vertically by up to half a dot.
pub fn draw_digit(
    raster: &mut Raster,
    rng: &mut impl Entropy,
    glyph: &Glyph,
    (x, y): (i32, i32),
    max_skew: f64,
    dot_size: i32,
) -> CaptchaResult<()> {
    let skew = rng.float(-max_skew, max_skew)?;
    let radius = dot_size / 2;
    let y = y + rng.int(-radius, radius)?;

    let mut row_x = [x; FONT_HEIGHT];
    let mut sheared = f64::from(x);
    for origin in row_x.iter_mut().skip(1) {
        sheared += skew;
        *origin = px(sheared);
    }
    for (col, row) in glyph.dots() {
        raster.draw_circle(
            row_x[row] + col as i32 * dot_size,
            y + row as i32 * dot_size,
            radius,
            PRIMARY_INDEX,
        );
    }
    Ok(())
}
