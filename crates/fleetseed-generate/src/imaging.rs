use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat};

pub const CAR_IMAGE_WIDTH: u32 = 800;
pub const CAR_IMAGE_HEIGHT: u32 = 600;
/// Content type of every uploaded car image.
pub const CAR_IMAGE_MIME: &str = "image/jpeg";

/// Decode generated bytes, cover-crop them to 800x600, and re-encode as JPEG.
pub fn normalize_car_image(bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_to_fill(CAR_IMAGE_WIDTH, CAR_IMAGE_HEIGHT, FilterType::Lanczos3);
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg)?;
    Ok(encoded.into_inner())
}
