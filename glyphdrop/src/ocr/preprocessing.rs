use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::config::OcrConfig;
use crate::error::{GlyphError, Result};

/// Decode raw upload bytes and normalise them for the recognition engine.
///
/// The format is guessed from the bytes, not from the filename. Images larger
/// than `max_image_dimension` on either side are downscaled (aspect ratio
/// kept), then everything is flattened to 8-bit grayscale and re-encoded as
/// PNG, which drops any alpha channel on the way.
pub fn preprocess_image(bytes: &[u8], config: &OcrConfig) -> Result<Vec<u8>> {
    let img = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let img = resize_if_needed(img, config.max_image_dimension);
    let gray = DynamicImage::ImageLuma8(img.to_luma8());

    let mut output = Vec::new();
    gray.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| GlyphError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Downscale with Lanczos3 when either side exceeds `max_dim`.
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if max_dim == 0 || (width <= max_dim && height <= max_dim) {
        return img;
    }

    let ratio = if width > height {
        max_dim as f32 / width as f32
    } else {
        max_dim as f32 / height as f32
    };

    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}
