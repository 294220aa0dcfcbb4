//! Thumbnail generation.
//!
//! Decodes a stored original, resizes it to fit a bounding box (aspect
//! preserved, never upscaled), and re-encodes it according to the storage
//! name's extension: mozjpeg at quality 75 with optimized entropy coding
//! for JPEG, a moderate-effort PNG encode for PNG, the native encoder for
//! other allowed extensions, and a JPEG-quality fallback when none exists.
//!
//! Failures here are reported as a boolean so callers can keep the
//! original upload alive; they are logged with the paths involved.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

const JPEG_QUALITY: f32 = 75.0;

/// Generates bounded thumbnails for stored originals.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    max_dim: u32,
}

impl Thumbnailer {
    pub fn new(max_dim: u32) -> Self {
        Self { max_dim }
    }

    /// Generate a thumbnail for `original` at `thumbnail`.
    ///
    /// Returns `true` on success. Any decode/encode error is logged and
    /// reported as `false`; it never propagates, because a missing
    /// thumbnail must not cancel the upload that triggered it.
    pub fn generate(&self, original: &Path, thumbnail: &Path) -> bool {
        match self.try_generate(original, thumbnail) {
            Ok(()) => {
                tracing::info!(thumbnail = %thumbnail.display(), "Generated thumbnail");
                true
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    original = %original.display(),
                    thumbnail = %thumbnail.display(),
                    "Thumbnail generation failed"
                );
                false
            }
        }
    }

    fn try_generate(&self, original: &Path, thumbnail: &Path) -> Result<(), anyhow::Error> {
        let img = image::ImageReader::open(original)?
            .with_guessed_format()?
            .decode()?;

        let (width, height) = img.dimensions();
        let (new_width, new_height) = bounded_dimensions(width, height, self.max_dim);
        let resized = if (new_width, new_height) == (width, height) {
            img
        } else {
            img.resize(new_width, new_height, FilterType::Lanczos3)
        };

        let ext = thumbnail
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let encoded = match ext.as_str() {
            "jpg" | "jpeg" => encode_jpeg(&resized)?,
            "png" => encode_png(&resized)?,
            other => match ImageFormat::from_extension(other) {
                Some(format) => encode_native(&resized, format)?,
                None => encode_jpeg(&resized)?,
            },
        };

        fs::write(thumbnail, &encoded)?;
        Ok(())
    }
}

/// Dimensions fitting within a `max_dim` square, aspect preserved.
/// Images already inside the box are returned unchanged (no upscaling).
pub fn bounded_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    if width <= max_dim && height <= max_dim {
        return (width, height);
    }
    if width >= height {
        let scaled = (u64::from(height) * u64::from(max_dim) / u64::from(width)) as u32;
        (max_dim, scaled.max(1))
    } else {
        let scaled = (u64::from(width) * u64::from(max_dim) / u64::from(height)) as u32;
        (scaled.max(1), max_dim)
    }
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, anyhow::Error> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(JPEG_QUALITY);
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(jpeg_data)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, anyhow::Error> {
    let mut buffer = Vec::new();
    // Default compression is the moderate effort level; Best would roughly
    // double encode time for a few percent of size.
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut buffer),
        CompressionType::Default,
        PngFilterType::Adaptive,
    );
    img.write_with_encoder(encoder)?;
    Ok(buffer)
}

fn encode_native(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, anyhow::Error> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_test_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
        let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
        DynamicImage::ImageRgb8(img).save_with_format(path, format).unwrap();
    }

    #[test]
    fn test_bounded_dimensions_landscape() {
        assert_eq!(bounded_dimensions(600, 300, 300), (300, 150));
        assert_eq!(bounded_dimensions(900, 300, 300), (300, 100));
    }

    #[test]
    fn test_bounded_dimensions_portrait() {
        assert_eq!(bounded_dimensions(300, 600, 300), (150, 300));
    }

    #[test]
    fn test_bounded_dimensions_never_upscales() {
        assert_eq!(bounded_dimensions(100, 50, 300), (100, 50));
        assert_eq!(bounded_dimensions(300, 300, 300), (300, 300));
    }

    #[test]
    fn test_bounded_dimensions_extreme_aspect() {
        // Very wide images must not collapse to zero height.
        assert_eq!(bounded_dimensions(100_000, 10, 300).1, 1);
    }

    #[test]
    fn test_generate_jpeg_thumbnail() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc_wide.jpg");
        let thumb = dir.path().join("thumb_abc_wide.jpg");
        write_test_image(&original, 600, 400, ImageFormat::Jpeg);

        let thumbnailer = Thumbnailer::new(300);
        assert!(thumbnailer.generate(&original, &thumb));

        let result = image::open(&thumb).unwrap();
        assert_eq!(result.dimensions(), (300, 200));
    }

    #[test]
    fn test_generate_png_thumbnail() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc_tall.png");
        let thumb = dir.path().join("thumb_abc_tall.png");
        write_test_image(&original, 200, 800, ImageFormat::Png);

        let thumbnailer = Thumbnailer::new(300);
        assert!(thumbnailer.generate(&original, &thumb));

        let result = image::open(&thumb).unwrap();
        assert_eq!(result.dimensions(), (75, 300));
    }

    #[test]
    fn test_generate_gif_thumbnail() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc_anim.gif");
        let thumb = dir.path().join("thumb_abc_anim.gif");
        write_test_image(&original, 400, 400, ImageFormat::Gif);

        let thumbnailer = Thumbnailer::new(300);
        assert!(thumbnailer.generate(&original, &thumb));

        let result = image::open(&thumb).unwrap();
        assert_eq!(result.dimensions(), (300, 300));
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc_small.png");
        let thumb = dir.path().join("thumb_abc_small.png");
        write_test_image(&original, 50, 80, ImageFormat::Png);

        let thumbnailer = Thumbnailer::new(300);
        assert!(thumbnailer.generate(&original, &thumb));

        let result = image::open(&thumb).unwrap();
        assert_eq!(result.dimensions(), (50, 80));
    }

    #[test]
    fn test_generate_reports_failure_for_garbage() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc_bad.jpg");
        let thumb = dir.path().join("thumb_abc_bad.jpg");
        std::fs::write(&original, b"not an image at all").unwrap();

        let thumbnailer = Thumbnailer::new(300);
        assert!(!thumbnailer.generate(&original, &thumb));
        assert!(!thumb.exists());
    }

    #[test]
    fn test_generate_reports_failure_for_missing_original() {
        let dir = tempdir().unwrap();
        let thumbnailer = Thumbnailer::new(300);
        assert!(!thumbnailer.generate(
            &dir.path().join("nope.jpg"),
            &dir.path().join("thumb_nope.jpg")
        ));
    }
}
