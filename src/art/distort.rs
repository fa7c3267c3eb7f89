use crate::math::{angular_step, px};
use crate::raster::Raster;

/// Remaps `src` through a sinusoidal displacement field into a new raster.
///
/// Destination `(x, y)` samples the source at `(x + a·sin(y·k), y + a·cos(x·k))` with
/// `k = 2π / period`. Samples that fall off the canvas read as transparent.
pub fn distort(src: &Raster, amplitude: f64, period: f64) -> Raster {
    let mut dst = src.blank_like();
    let step = angular_step(period);
    for x in 0..src.width() {
        for y in 0..src.height() {
            let xo = amplitude * (f64::from(y) * step).sin();
            let yo = amplitude * (f64::from(x) * step).cos();
            dst.set_index(x, y, src.index_at(x + px(xo), y + px(yo)));
        }
    }
    dst
}
