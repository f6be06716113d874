use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Scales to an exact target width with the height following at the same
/// ratio, rounded to the nearest pixel.
pub fn resize_to_width(image: &DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let target_height = (height as f64 * target_width as f64 / width as f64).round() as u32;
    image.resize_exact(target_width, target_height.max(1), FilterType::Lanczos3)
}

/// The encode format for an allowed upload extension. `None` means the
/// extension is not publishable.
pub fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    match ext {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "gif" => Some(ImageFormat::Gif),
        _ => None,
    }
}
