pub mod art;
pub mod challenge;
pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod layouts;
pub mod math;
pub mod rand;
pub mod raster;

pub use art::{render, render_with, Captcha};
pub use challenge::{Challenge, Digits};
pub use config::DistortionOpts;
pub use error::{CaptchaError, CaptchaResult};
pub use rand::SeedKey;
