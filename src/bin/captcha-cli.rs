use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use captcha::challenge::{Challenge, Digits};
use captcha::config::{DistortionOpts, RenderConfig};
use captcha::rand::SeedKey;

#[derive(Parser)]
struct Opts {
    /// Challenge identifier. Together with the key and digits it fixes every random choice.
    id: String,
    /// Digits to draw, e.g. "381904".
    digits: Digits,
    /// 32-byte hex key for seed derivation.
    #[clap(long, env = "CAPTCHA_SEED_KEY", hide_env_values = true)]
    key: SeedKey,
    /// Output path. Defaults to "<id>-<digits>-<width>x<height>.png".
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    config: RenderConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let base = match &opts.config.opts {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<DistortionOpts>(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => DistortionOpts::default(),
    };
    let distortion = opts.config.distortion_opts(base)?;
    let challenge = Challenge::new(opts.id, opts.digits);
    let (width, height) = (opts.config.width, opts.config.height);

    let captcha = captcha::render(&opts.key, &challenge, width, height, Some(&distortion))
        .context("Failed to render challenge")?;
    let filename = opts.output.unwrap_or_else(|| {
        let digits: String = challenge.digits().iter().map(|d| char::from(b'0' + d)).collect();
        PathBuf::from(format!(
            "{}-{}-{}x{}.png",
            challenge.id(),
            digits,
            width,
            height
        ))
    });
    captcha
        .write_png(&filename)
        .with_context(|| format!("Failed to write {}", filename.display()))?;
    eprintln!("wrote png: {}", filename.display());
    Ok(())
}
