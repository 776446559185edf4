use image::{Rgba, RgbaImage};

use crate::models::ToneParams;

/// Remap brightness and contrast of an image.
///
/// Each color channel is passed through two affine remaps in sequence:
/// a shadow/highlight shift for brightness, then a pivot-at-127 stretch
/// for contrast. A step whose parameter is 0 is skipped entirely. The
/// alpha channel passes through unmodified. The output has the same
/// dimensions as the input.
pub fn enhance(image: &RgbaImage, params: ToneParams) -> RgbaImage {
    let params = params.clamped();
    if params.brightness == 0 && params.contrast == 0 {
        return image.clone();
    }

    let lut = build_lut(params);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([lut[r as usize], lut[g as usize], lut[b as usize], a]);
    }
    output
}

/// Channel lookup table combining the brightness and contrast remaps.
fn build_lut(params: ToneParams) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let mut v = value as f64;

        if params.brightness != 0 {
            let shadow = params.brightness.max(0) as f64;
            let highlight = 255.0 + params.brightness.min(0) as f64;
            let alpha = (highlight - shadow) / 255.0;
            v = (alpha * v + shadow).clamp(0.0, 255.0);
        }

        if params.contrast != 0 {
            // Singular at contrast = 131; ToneParams::clamped keeps us off it.
            let c = params.contrast as f64;
            let f = 131.0 * (c + 127.0) / (127.0 * (131.0 - c));
            v = (f * v + 127.0 * (1.0 - f)).clamp(0.0, 255.0);
        }

        *slot = v.round() as u8;
    }
    lut
}
