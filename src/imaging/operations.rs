//! Buffer-level raster operations shared by every layout.
//!
//! These are thin wrappers over `image::imageops` that fix the conventions
//! the layouts rely on: RGB canvases, white backgrounds, black borders, and
//! alpha-aware logo pastes.

use super::calculations::{SwatchFill, square_placement, swatch_block_width};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A solid canvas.
pub fn canvas(width: u32, height: u32, fill: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width.max(1), height.max(1), fill)
}

/// Resize to exact dimensions.
pub fn resize(image: &RgbImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width.max(1), height.max(1), filter)
}

/// Surround an image with a solid border of `thickness` pixels.
pub fn expand_border(image: &RgbImage, thickness: u32, color: Rgb<u8>) -> RgbImage {
    if thickness == 0 {
        return image.clone();
    }
    let mut out = canvas(
        image.width() + 2 * thickness,
        image.height() + 2 * thickness,
        color,
    );
    imageops::replace(&mut out, image, thickness as i64, thickness as i64);
    out
}

/// Paste an opaque image; parts falling outside the canvas are clipped.
pub fn paste(canvas: &mut RgbImage, image: &RgbImage, x: i64, y: i64) {
    imageops::replace(canvas, image, x, y);
}

/// Paste an image with alpha, blending each pixel over the canvas.
pub fn paste_blended(canvas: &mut RgbImage, image: &RgbaImage, x: i64, y: i64) {
    for (px, py, src) in image.enumerate_pixels() {
        let cx = x + px as i64;
        let cy = y + py as i64;
        if cx < 0 || cy < 0 || cx >= canvas.width() as i64 || cy >= canvas.height() as i64 {
            continue;
        }
        let alpha = src[3] as f32 / 255.0;
        let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
        for c in 0..3 {
            let blended = src[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha);
            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Resize a logo and paste it, honoring transparency when `keep_alpha` is set.
///
/// Opaque pastes flatten the logo onto black first, which is how a logo
/// with transparency looks when its alpha channel is simply dropped.
pub fn paste_logo(
    canvas: &mut RgbImage,
    logo: &DynamicImage,
    size: (u32, u32),
    at: (i64, i64),
    keep_alpha: bool,
) {
    let (w, h) = (size.0.max(1), size.1.max(1));
    if keep_alpha {
        let resized = imageops::resize(&logo.to_rgba8(), w, h, FilterType::CatmullRom);
        paste_blended(canvas, &resized, at.0, at.1);
    } else {
        let resized = imageops::resize(&logo.to_rgb8(), w, h, FilterType::CatmullRom);
        paste(canvas, &resized, at.0, at.1);
    }
}

/// Quarter-turn an image. Turning a pixel buffer by 90° is lossless, so no
/// intermediate canvas is needed to keep the corners.
pub fn rotate_quarter(image: &RgbImage, clockwise: bool) -> RgbImage {
    if clockwise {
        imageops::rotate90(image)
    } else {
        imageops::rotate270(image)
    }
}

/// Pad a canvas symmetrically on its shorter axis to make it square.
pub fn pad_to_square(image: &RgbImage, fill: Rgb<u8>) -> RgbImage {
    let placement = square_placement(image.width(), image.height());
    if placement.x == 0 && placement.y == 0 && image.width() == image.height() {
        return image.clone();
    }
    let mut out = canvas(placement.side, placement.side, fill);
    paste(&mut out, image, placement.x as i64, placement.y as i64);
    out
}

/// Render a swatch bar: equal-width blocks of each color, left to right.
///
/// The bar starts black, so any columns not reached by a block stay black.
pub fn render_swatch(colors: &[Rgb<u8>], width: u32, height: u32, fill: SwatchFill) -> RgbImage {
    let mut bar = canvas(width, height, BLACK);
    let block = swatch_block_width(width, colors.len(), fill);
    for (i, color) in colors.iter().enumerate() {
        let start = i as u32 * block;
        if start >= bar.width() {
            break;
        }
        let end = (start + block).min(bar.width());
        for x in start..end {
            for y in 0..bar.height() {
                bar.put_pixel(x, y, *color);
            }
        }
    }
    bar
}
