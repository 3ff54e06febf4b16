//! Grayscale preview of a single-band raster, as drawn by the standalone TIFF viewer.

/// An RGBA image, 4 bytes per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl GrayscaleImage {
    /// Maps raster samples to opaque gray pixels.
    ///
    /// Samples are clamped to `0..=255` and rounded to the nearest integer (ties to even). NaN
    /// becomes black. Missing samples are left black, surplus samples are ignored.
    pub fn from_samples(width: u32, height: u32, samples: &[f64]) -> Self {
        let pixels = width as usize * height as usize;
        let mut rgba = vec![0u8; pixels * 4];
        for (pixel, sample) in rgba.chunks_exact_mut(4).zip(samples) {
            let gray = gray_level(*sample);
            pixel.copy_from_slice(&[gray, gray, gray, 255]);
        }
        for pixel in rgba.chunks_exact_mut(4).skip(samples.len()) {
            pixel[3] = 255;
        }

        Self {
            width,
            height,
            rgba,
        }
    }

    /// Decodes the first band of a TIFF image and maps it to gray.
    #[cfg(feature = "geotiff")]
    pub fn from_tiff(bytes: &[u8]) -> Result<Self, tiff::TiffError> {
        let (width, height, samples) =
            crate::overlay::geotiff::read_first_band(std::io::Cursor::new(bytes))?;
        Ok(Self::from_samples(width, height, &samples))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

fn gray_level(sample: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    sample.clamp(0.0, 255.0).round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "geotiff")]
    fn encode<C: tiff::encoder::colortype::ColorType>(
        width: u32,
        height: u32,
        data: &[C::Inner],
    ) -> Vec<u8>
    where
        [C::Inner]: tiff::encoder::TiffValue,
    {
        let mut buf = std::io::Cursor::new(Vec::new());
        tiff::encoder::TiffEncoder::new(&mut buf)
            .unwrap()
            .write_image::<C>(width, height, data)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn samples_are_clamped_and_opaque() {
        let image = GrayscaleImage::from_samples(2, 2, &[-5.0, 12.4, 300.0, f64::NAN]);
        assert_eq!(
            image.rgba(),
            &[0, 0, 0, 255, 12, 12, 12, 255, 255, 255, 255, 255, 0, 0, 0, 255]
        );
    }

    #[test]
    fn rounding_is_ties_to_even() {
        assert_eq!(gray_level(2.5), 2);
        assert_eq!(gray_level(3.5), 4);
    }

    #[test]
    fn short_input_leaves_black_pixels() {
        let image = GrayscaleImage::from_samples(2, 1, &[100.0]);
        assert_eq!(image.rgba(), &[100, 100, 100, 255, 0, 0, 0, 255]);
        assert_eq!((image.width(), image.height()), (2, 1));
    }

    #[cfg(feature = "geotiff")]
    #[test]
    fn preview_of_gray_tiff() {
        use tiff::encoder::colortype::Gray8;

        let tiff = encode::<Gray8>(2, 2, &[0, 64, 128, 255]);
        let image = GrayscaleImage::from_tiff(&tiff).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        assert_eq!(
            image.rgba(),
            &[0, 0, 0, 255, 64, 64, 64, 255, 128, 128, 128, 255, 255, 255, 255, 255]
        );
    }

    #[cfg(feature = "geotiff")]
    #[test]
    fn preview_of_color_tiff_uses_first_band() {
        use tiff::encoder::colortype::RGB8;

        let tiff = encode::<RGB8>(2, 1, &[10, 20, 30, 40, 50, 60]);
        let image = GrayscaleImage::from_tiff(&tiff).unwrap();
        assert_eq!(image.rgba(), &[10, 10, 10, 255, 40, 40, 40, 255]);
    }

    #[cfg(feature = "geotiff")]
    #[test]
    fn preview_of_garbage_fails() {
        assert!(GrayscaleImage::from_tiff(b"not a tiff").is_err());
    }
}
