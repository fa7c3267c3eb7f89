use std::ops::Index;

use crate::error::{CaptchaError, CaptchaResult};
use crate::rand::Entropy;

/// Palette index that reads as "nothing drawn here".
pub const TRANSPARENT_INDEX: u8 = 0;
/// Palette index of the glyph and strike-through color.
pub const PRIMARY_INDEX: u8 = 1;

/// Upper bound (inclusive) of each primary channel. Keeps the primary dark enough that lighter
/// variants stay distinguishable from the background.
const PRIMARY_CHANNEL_MAX: i32 = 128;
/// Brightness ceiling for the circle color variants.
pub const BRIGHTNESS_CEILING: u8 = 255;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0xff, 0xff, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 0xff)
    }

    fn min_channel(&self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    fn max_channel(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    /// Adds the same signed `delta` to all three color channels, saturating at the channel
    /// bounds. Alpha is kept.
    fn shifted(&self, delta: i32) -> Self {
        let shift = |c: u8| (i32::from(c) + delta).clamp(0, 255) as u8;
        Rgba::new(shift(self.r), shift(self.g), shift(self.b), self.a)
    }
}

/// Indexed colors of one render: transparent at 0, the primary at 1, and brightness variants of
/// the primary after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Draws a palette with `circle_count + 1` entries.
    pub fn from_entropy(rng: &mut impl Entropy, circle_count: usize) -> CaptchaResult<Self> {
        if !(1..=255).contains(&circle_count) {
            return Err(CaptchaError::invalid_input(format!(
                "palette needs between 1 and 255 non-transparent colors, got {}",
                circle_count
            )));
        }
        let mut colors = Vec::with_capacity(circle_count + 1);
        colors.push(Rgba::TRANSPARENT);
        let primary = Rgba::opaque(
            rng.int_below(PRIMARY_CHANNEL_MAX + 1)? as u8,
            rng.int_below(PRIMARY_CHANNEL_MAX + 1)? as u8,
            rng.int_below(PRIMARY_CHANNEL_MAX + 1)? as u8,
        );
        colors.push(primary);
        for _ in 1..circle_count {
            colors.push(random_brightness(rng, primary, BRIGHTNESS_CEILING)?);
        }
        Ok(Palette { colors })
    }

    pub fn primary(&self) -> Rgba {
        self.colors[usize::from(PRIMARY_INDEX)]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rgba> {
        self.colors.iter()
    }
}

impl Index<u8> for Palette {
    type Output = Rgba;
    fn index(&self, index: u8) -> &Rgba {
        &self.colors[usize::from(index)]
    }
}

/// Picks a lighter or darker variant of `color` with the same hue.
///
/// A single delta is drawn and added to every channel. Colors whose brightest channel already
/// reaches `ceiling` are returned unchanged without consuming entropy.
pub fn random_brightness(rng: &mut impl Entropy, color: Rgba, ceiling: u8) -> CaptchaResult<Rgba> {
    let max = color.max_channel();
    if max >= ceiling {
        return Ok(color);
    }
    let delta = rng.int_below(i32::from(ceiling - max))? - i32::from(color.min_channel());
    Ok(color.shifted(delta))
}
