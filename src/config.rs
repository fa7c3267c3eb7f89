use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CaptchaError, CaptchaResult};

/// Standard width and height of a captcha image.
pub const STD_WIDTH: u32 = 240;
pub const STD_HEIGHT: u32 = 80;

/// Largest warp amplitude, in pixels, in either direction.
pub const MAX_WARP_AMPLITUDE: f64 = 1024.0;
/// Largest per-row digit skew, in pixels.
pub const MAX_SKEW: f64 = 10.0;
pub const MAX_STRIKE_COUNT: usize = 64;

/// Amplitude and period ranges (in pixels) of a sinusoidal warp.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpBounds {
    pub amp_min: f64,
    pub amp_max: f64,
    pub period_min: f64,
    pub period_max: f64,
}

impl WarpBounds {
    pub const CANVAS: WarpBounds = WarpBounds {
        amp_min: 5.0,
        amp_max: 10.0,
        period_min: 100.0,
        period_max: 200.0,
    };

    pub const STRIKE: WarpBounds = WarpBounds {
        amp_min: 5.0,
        amp_max: 20.0,
        period_min: 80.0,
        period_max: 180.0,
    };

    fn validate(&self, name: &str) -> CaptchaResult<()> {
        let finite = [self.amp_min, self.amp_max, self.period_min, self.period_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite
            || self.amp_min.abs() > MAX_WARP_AMPLITUDE
            || self.amp_max.abs() > MAX_WARP_AMPLITUDE
            || self.amp_min > self.amp_max
            || self.period_min <= 0.0
            || self.period_min > self.period_max
        {
            return Err(CaptchaError::invalid_input(format!(
                "{}: invalid warp bounds {:?}",
                name, self
            )));
        }
        Ok(())
    }
}

/// Knobs for the noise drawn over the digits.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistortionOpts {
    /// Number of background circles. Also the number of non-transparent palette entries.
    pub circle_count: usize,
    /// Number of strike-through lines.
    pub strike_count: usize,
    /// Maximum absolute skew factor of a single digit.
    pub max_skew: f64,
    pub canvas_warp: WarpBounds,
    pub strike_warp: WarpBounds,
}

impl Default for DistortionOpts {
    fn default() -> Self {
        DistortionOpts {
            circle_count: 20,
            strike_count: 1,
            max_skew: 0.7,
            canvas_warp: WarpBounds::CANVAS,
            strike_warp: WarpBounds::STRIKE,
        }
    }
}

impl DistortionOpts {
    pub fn validate(&self) -> CaptchaResult<()> {
        // Circles pick their color from `1..=circle_count - 1`, and indices must fit a byte.
        if !(2..=255).contains(&self.circle_count) {
            return Err(CaptchaError::invalid_input(format!(
                "circle count must be within 2..=255, got {}",
                self.circle_count
            )));
        }
        if self.strike_count > MAX_STRIKE_COUNT {
            return Err(CaptchaError::invalid_input(format!(
                "strike count must be at most {}, got {}",
                MAX_STRIKE_COUNT, self.strike_count
            )));
        }
        if !(0.0..=MAX_SKEW).contains(&self.max_skew) {
            return Err(CaptchaError::invalid_input(format!(
                "max skew must be within 0..={}, got {}",
                MAX_SKEW, self.max_skew
            )));
        }
        self.canvas_warp.validate("canvas warp")?;
        self.strike_warp.validate("strike warp")
    }
}

#[derive(Debug, clap::Args)]
pub struct RenderConfig {
    /// Image width in pixels.
    #[clap(long, default_value_t = STD_WIDTH)]
    pub width: u32,

    /// Image height in pixels.
    #[clap(long, default_value_t = STD_HEIGHT)]
    pub height: u32,

    /// JSON file with distortion options. Missing keys take their defaults.
    #[clap(long)]
    pub opts: Option<PathBuf>,

    /// Override the number of background circles.
    #[clap(long)]
    pub circle_count: Option<usize>,

    /// Override the number of strike-through lines.
    #[clap(long)]
    pub strike_count: Option<usize>,

    /// Override the maximum digit skew.
    #[clap(long)]
    pub max_skew: Option<f64>,
}

impl RenderConfig {
    /// Applies the command-line overrides on top of `base`, which holds the defaults or the
    /// contents of the options file.
    pub fn distortion_opts(&self, base: DistortionOpts) -> CaptchaResult<DistortionOpts> {
        let mut opts = base;
        if let Some(n) = self.circle_count {
            opts.circle_count = n;
        }
        if let Some(n) = self.strike_count {
            opts.strike_count = n;
        }
        if let Some(skew) = self.max_skew {
            opts.max_skew = skew;
        }
        opts.validate()?;
        Ok(opts)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        DistortionOpts::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let opts: DistortionOpts =
            serde_json::from_str(r#"{"circleCount": 40, "strikeWarp": {"ampMin": 1, "ampMax": 2, "periodMin": 10, "periodMax": 20}}"#)
                .unwrap();
        assert_eq!(opts.circle_count, 40);
        assert_eq!(opts.strike_count, 1);
        assert_eq!(opts.max_skew, 0.7);
        assert_eq!(opts.canvas_warp, WarpBounds::CANVAS);
        assert_eq!(opts.strike_warp.period_max, 20.0);
    }

    #[test]
    fn test_invalid_opts_are_rejected() {
        let bad = [
            DistortionOpts {
                circle_count: 1,
                ..Default::default()
            },
            DistortionOpts {
                circle_count: 256,
                ..Default::default()
            },
            DistortionOpts {
                max_skew: -0.1,
                ..Default::default()
            },
            DistortionOpts {
                canvas_warp: WarpBounds {
                    period_min: 0.0,
                    ..WarpBounds::CANVAS
                },
                ..Default::default()
            },
            DistortionOpts {
                strike_warp: WarpBounds {
                    amp_min: 30.0,
                    ..WarpBounds::STRIKE
                },
                ..Default::default()
            },
            DistortionOpts {
                strike_warp: WarpBounds {
                    amp_max: f64::INFINITY,
                    ..WarpBounds::STRIKE
                },
                ..Default::default()
            },
        ];
        for opts in bad {
            assert!(
                matches!(opts.validate(), Err(CaptchaError::InvalidInput(_))),
                "{:?}",
                opts
            );
        }
    }

    #[test]
    fn test_oversized_distortion_is_rejected() {
        let bad = [
            DistortionOpts {
                canvas_warp: WarpBounds {
                    amp_min: 1e10,
                    amp_max: 1e10,
                    ..WarpBounds::CANVAS
                },
                ..Default::default()
            },
            DistortionOpts {
                strike_warp: WarpBounds {
                    amp_min: -1e10,
                    ..WarpBounds::STRIKE
                },
                ..Default::default()
            },
            DistortionOpts {
                max_skew: 1e12,
                ..Default::default()
            },
            DistortionOpts {
                strike_count: usize::MAX,
                ..Default::default()
            },
        ];
        for opts in bad {
            assert!(
                matches!(opts.validate(), Err(CaptchaError::InvalidInput(_))),
                "{:?}",
                opts
            );
        }
        let edge = DistortionOpts {
            canvas_warp: WarpBounds {
                amp_min: -MAX_WARP_AMPLITUDE,
                amp_max: MAX_WARP_AMPLITUDE,
                ..WarpBounds::CANVAS
            },
            strike_count: MAX_STRIKE_COUNT,
            max_skew: MAX_SKEW,
            ..Default::default()
        };
        edge.validate().unwrap();
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = RenderConfig {
            width: STD_WIDTH,
            height: STD_HEIGHT,
            opts: None,
            circle_count: None,
            strike_count: Some(MAX_STRIKE_COUNT + 1),
            max_skew: None,
        };
        assert!(matches!(
            config.distortion_opts(DistortionOpts::default()),
            Err(CaptchaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let config = RenderConfig {
            width: STD_WIDTH,
            height: STD_HEIGHT,
            opts: None,
            circle_count: Some(40),
            strike_count: Some(2),
            max_skew: Some(0.8),
        };
        let opts = config.distortion_opts(DistortionOpts::default()).unwrap();
        assert_eq!((opts.circle_count, opts.strike_count), (40, 2));
        assert_eq!(opts.max_skew, 0.8);
        assert_eq!(opts.canvas_warp, WarpBounds::CANVAS);
    }
}
