use image::{GrayImage, RgbaImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;

/// Convert an RGBA frame to grayscale using standard luma weighting.
pub fn to_grayscale(frame: &RgbaImage) -> GrayImage {
    image::imageops::grayscale(frame)
}

/// Apply Gaussian blur to suppress sensor/compression noise.
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Binarize with an automatic Otsu threshold computed from the image itself.
pub fn binarize(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    threshold(img, level, ThresholdType::Binary)
}
