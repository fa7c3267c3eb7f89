use crate::challenge::{check_digits, Challenge};
use crate::color::Palette;
use crate::config::DistortionOpts;
use crate::error::{CaptchaError, CaptchaResult};
use crate::font::{self, FONT_HEIGHT, FONT_WIDTH};
use crate::layouts::Layout;
use crate::rand::{derive_seed, Entropy, SeedKey, SipRng, IMAGE_SEED_PURPOSE};
use crate::raster::Raster;

pub mod digits;
pub mod distort;
pub mod noise;

use self::digits::draw_digit;
use self::distort::distort;
use self::noise::{background_discs, strike_through};

/// A finished challenge image: indexed pixels plus the palette they index into.
#[derive(Debug, Clone, PartialEq)]
pub struct Captcha {
    pub raster: Raster,
    pub palette: Palette,
    pub layout: Layout,
    /// Top-left corner of the digit block before distortion.
    pub anchor: (i32, i32),
}

/// Renders `challenge` into a `width` x `height` image.
///
/// All randomness comes from a stream seeded with `key`, the challenge identifier and its
/// digits, so the same inputs always produce the same pixels. Default distortion options apply
/// when `opts` is `None`.
pub fn render(
    key: &SeedKey,
    challenge: &Challenge,
    width: u32,
    height: u32,
    opts: Option<&DistortionOpts>,
) -> CaptchaResult<Captcha> {
    let seed = derive_seed(key, IMAGE_SEED_PURPOSE, challenge.id(), challenge.digits());
    let mut rng = SipRng::from_seed(&seed);
    render_with(&mut rng, challenge.digits(), width, height, opts)
}

/// Like [`render`], but drawing from an arbitrary entropy source.
///
/// The stages run in a fixed order: palette, block placement, digits, strike-through lines,
/// canvas warp, background circles. The circles are drawn after the warp and so stay round.
#[tracing::instrument(skip(rng, digits), fields(digits = digits.len()))]
pub fn render_with(
    rng: &mut impl Entropy,
    digits: &[u8],
    width: u32,
    height: u32,
    opts: Option<&DistortionOpts>,
) -> CaptchaResult<Captcha> {
    let opts = opts.copied().unwrap_or_default();
    check_digits(digits)?;
    opts.validate()?;
    let mut raster = Raster::new(width, height)?;
    let (w, h) = (raster.width(), raster.height());
    let layout = Layout::size(w, h, digits.len(), FONT_WIDTH, FONT_HEIGHT)?;

    let palette = Palette::from_entropy(rng, opts.circle_count)?;
    let anchor = layout.anchor(rng, w, h)?;
    tracing::debug!(?layout, ?anchor, primary = ?palette.primary(), "placed digit block");

    let mut x = anchor.0;
    for &digit in digits {
        let glyph = font::glyph(digit)
            .ok_or_else(|| CaptchaError::invalid_input(format!("no glyph for {}", digit)))?;
        draw_digit(
            &mut raster,
            rng,
            glyph,
            (x, anchor.1),
            opts.max_skew,
            layout.dot_size,
        )?;
        x += layout.advance();
    }

    for _ in 0..opts.strike_count {
        strike_through(&mut raster, rng, &opts.strike_warp, layout.dot_size)?;
    }

    let amplitude = rng.float(opts.canvas_warp.amp_min, opts.canvas_warp.amp_max)?;
    let period = rng.float(opts.canvas_warp.period_min, opts.canvas_warp.period_max)?;
    tracing::debug!(amplitude, period, "canvas warp");
    let mut raster = distort(&raster, amplitude, period);

    for disc in background_discs(rng, w, h, opts.circle_count, layout.dot_size)? {
        disc.paint(&mut raster);
    }

    Ok(Captcha {
        raster,
        palette,
        layout,
        anchor,
    })
}
