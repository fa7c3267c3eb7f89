use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::art::Captcha;
use crate::color::Palette;
use crate::error::CaptchaResult;
use crate::raster::Raster;

/// Somewhere a finished indexed image can go.
pub trait RasterSink {
    fn write_indexed(&mut self, raster: &Raster, palette: &Palette) -> CaptchaResult<()>;
}

/// Encodes indexed images as 8-bit paletted PNGs with a transparency chunk.
pub struct PngSink<W: Write> {
    inner: W,
}

impl<W: Write> PngSink<W> {
    pub fn new(inner: W) -> Self {
        PngSink { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RasterSink for PngSink<W> {
    #[tracing::instrument(
        skip_all,
        fields(width = raster.width(), height = raster.height(), colors = palette.len())
    )]
    fn write_indexed(&mut self, raster: &Raster, palette: &Palette) -> CaptchaResult<()> {
        let rgb: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        let alpha: Vec<u8> = palette.iter().map(|c| c.a).collect();

        let mut encoder = png::Encoder::new(
            &mut self.inner,
            raster.width() as u32,
            raster.height() as u32,
        );
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(rgb);
        encoder.set_trns(alpha);
        encoder.set_compression(png::Compression::Fast);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(raster.pixels())?;
        writer.finish()?;
        tracing::trace!("png encoded");
        Ok(())
    }
}

impl Captcha {
    /// Encodes the image as an in-memory PNG.
    pub fn encode_png(&self) -> CaptchaResult<Vec<u8>> {
        let mut sink = PngSink::new(Vec::new());
        sink.write_indexed(&self.raster, &self.palette)?;
        Ok(sink.into_inner())
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> CaptchaResult<()> {
        let file = File::create(path.as_ref())?;
        let mut sink = PngSink::new(BufWriter::new(file));
        sink.write_indexed(&self.raster, &self.palette)?;
        sink.into_inner().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Rgba;
    use crate::rand::SipRng;

    fn small_image() -> (Raster, Palette) {
        let mut rng = SipRng::from_seed(&[7; 16]);
        let palette = Palette::from_entropy(&mut rng, 4).unwrap();
        let mut raster = Raster::new(9, 5).unwrap();
        raster.draw_circle(4, 2, 2, 1);
        raster.set_index(0, 0, 3);
        (raster, palette)
    }

    #[test]
    fn test_png_keeps_indices_and_palette() {
        let (raster, palette) = small_image();
        let mut sink = PngSink::new(Vec::new());
        sink.write_indexed(&raster, &palette).unwrap();
        let bytes = sink.into_inner();

        let mut decoder = png::Decoder::new(bytes.as_slice());
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).unwrap();
        assert_eq!((frame.width, frame.height), (9, 5));
        assert_eq!(frame.color_type, png::ColorType::Indexed);
        assert_eq!(&buf[..frame.buffer_size()], raster.pixels());

        let info = reader.info();
        let plte = info.palette.as_deref().unwrap();
        let trns = info.trns.as_deref().unwrap();
        assert_eq!(plte.len(), 3 * palette.len());
        assert_eq!(trns.len(), palette.len());
        let decoded: Vec<Rgba> = plte
            .chunks(3)
            .zip(trns)
            .map(|(rgb, &a)| Rgba::new(rgb[0], rgb[1], rgb[2], a))
            .collect();
        assert_eq!(decoded, palette.as_slice());
        assert_eq!(decoded[0], Rgba::TRANSPARENT);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_surface() {
        let (raster, palette) = small_image();
        assert!(PngSink::new(Broken).write_indexed(&raster, &palette).is_err());
    }
}
