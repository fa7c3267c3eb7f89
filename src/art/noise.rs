use crate::color::PRIMARY_INDEX;
use crate::config::WarpBounds;
use crate::error::CaptchaResult;
use crate::math::{angular_step, px};
use crate::rand::Entropy;
use crate::raster::Raster;

/// A filled circle in palette color `index`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Disc {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub index: u8,
}

impl Disc {
    pub fn paint(&self, raster: &mut Raster) {
        raster.draw_circle(self.x, self.y, self.radius, self.index);
    }
}

/// Draws one wavy strike-through line across the middle third of the canvas.
///
/// The line is a column-by-column stack of small primary-colored discs. Its horizontal wobble
/// uses the line's base row as phase, so it is the same for every column; only the vertical
/// displacement follows the column.
pub fn strike_through(
    raster: &mut Raster,
    rng: &mut impl Entropy,
    warp: &WarpBounds,
    dot_size: i32,
) -> CaptchaResult<()> {
    let width = raster.width();
    let height = raster.height();
    let y = rng.int(height / 3, height - height / 3)?;
    let amplitude = rng.float(warp.amp_min, warp.amp_max)?;
    let period = rng.float(warp.period_min, warp.period_max)?;
    tracing::trace!(y, amplitude, period, "strike-through");

    let step = angular_step(period);
    for x in 0..width {
        let xo = amplitude * (f64::from(y) * step).cos();
        let yo = amplitude * (f64::from(x) * step).sin();
        let stacked = rng.int(0, 2 * dot_size / 3)?;
        for n in 0..stacked {
            let r = rng.int(0, dot_size)?;
            raster.draw_circle(x + px(xo), y + px(yo) + n * dot_size, r / 2, PRIMARY_INDEX);
        }
    }
    Ok(())
}

/// Picks `count` discs that lie entirely on the canvas, with radii in `1..=max_radius` and
/// colors from the palette's `1..count` range.
pub fn background_discs(
    rng: &mut impl Entropy,
    width: i32,
    height: i32,
    count: usize,
    max_radius: i32,
) -> CaptchaResult<Vec<Disc>> {
    let max_index = i32::try_from(count).unwrap_or(i32::MAX) - 1;
    (0..count)
        .map(|_| {
            let index = rng.int(1, max_index)? as u8;
            let radius = rng.int(1, max_radius)?;
            let x = rng.int(radius, width - 1 - radius)?;
            let y = rng.int(radius, height - 1 - radius)?;
            Ok(Disc {
                x,
                y,
                radius,
                index,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rand::SipRng;

    #[test]
    fn test_discs_stay_on_canvas() {
        for seed in 0u8..8 {
            let mut rng = SipRng::from_seed(&[seed; 16]);
            for (width, height, radius) in [(240, 80, 2), (50, 50, 1), (300, 120, 4), (9, 9, 4)] {
                let discs = background_discs(&mut rng, width, height, 20, radius).unwrap();
                assert_eq!(discs.len(), 20);
                for d in discs {
                    assert!((1..=radius).contains(&d.radius));
                    assert!((1..=19).contains(&d.index));
                    assert!(d.x - d.radius >= 0 && d.x + d.radius < width, "{:?}", d);
                    assert!(d.y - d.radius >= 0 && d.y + d.radius < height, "{:?}", d);
                }
            }
        }
    }

    #[test]
    fn test_painted_discs_never_clip() {
        let mut rng = SipRng::from_seed(&[3; 16]);
        let discs = background_discs(&mut rng, 30, 20, 40, 5).unwrap();
        for d in discs {
            let mut raster = Raster::new(30, 20).unwrap();
            d.paint(&mut raster);
            let painted = raster.pixels().iter().filter(|&&i| i == d.index).count();
            let mut big = Raster::new(100, 100).unwrap();
            Disc { x: 50, y: 50, ..d }.paint(&mut big);
            let unclipped = big.pixels().iter().filter(|&&i| i == d.index).count();
            assert_eq!(painted, unclipped, "{:?}", d);
        }
    }

    #[test]
    fn test_discs_too_big_for_canvas_are_rejected() {
        let mut rng = SipRng::from_seed(&[0; 16]);
        // A radius-3 disc needs a 7-pixel canvas; a 2-pixel one can't hold radius 1.
        assert!(background_discs(&mut rng, 2, 2, 5, 3).is_err());
    }

    #[test]
    fn test_strike_through_stays_in_band() {
        for seed in 0u8..8 {
            let mut rng = SipRng::from_seed(&[seed; 16]);
            let mut raster = Raster::new(240, 90).unwrap();
            let warp = WarpBounds {
                amp_min: 0.0,
                amp_max: 0.0,
                period_min: 80.0,
                period_max: 180.0,
            };
            strike_through(&mut raster, &mut rng, &warp, 3).unwrap();
            // With no wobble every disc is centered on rows y..y + dot_size of the
            // chosen row y, itself within the middle third.
            for (y, row) in raster.rows().enumerate() {
                if row.iter().any(|&i| i != 0) {
                    assert!((30 - 1..=60 + 3 + 1).contains(&(y as i32)), "row {}", y);
                    assert!(row.iter().all(|&i| i == 0 || i == PRIMARY_INDEX));
                }
            }
        }
    }

    #[test]
    fn test_strike_through_draws_something() {
        let mut rng = SipRng::from_seed(&[5; 16]);
        let mut raster = Raster::new(240, 80).unwrap();
        strike_through(&mut raster, &mut rng, &WarpBounds::STRIKE, 6).unwrap();
        let inked = raster.pixels().iter().filter(|&&i| i == PRIMARY_INDEX).count();
        assert!(inked > 240, "only {} pixels inked", inked);
    }
}
