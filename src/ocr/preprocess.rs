//! Image variants fed to the recognizer.
//!
//! Shot charts vary wildly in print quality, so the extractor runs the same
//! recognizer over several renditions of the image and pools the results.
//! All operations work on `image` buffers; nothing here touches disk.

use image::{DynamicImage, GrayImage, Luma};

use crate::zones::ZoneRect;

/// Converts to plain 8-bit grayscale.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Picks a global threshold by Otsu's method (maximizing between-class
/// variance over the histogram).
pub fn otsu_level(img: &GrayImage) -> u8 {
    let mut histogram = [0u32; 256];
    for pixel in img.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return 128;
    }

    let sum_all: u64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as u64 * count as u64)
        .sum();

    let mut sum_background: u64 = 0;
    let mut weight_background: u64 = 0;
    let mut best_level = 128u8;
    let mut best_variance = -1.0f64;

    for level in 0..256 {
        weight_background += histogram[level] as u64;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += level as u64 * histogram[level] as u64;
        let mean_background = sum_background as f64 / weight_background as f64;
        let mean_foreground = (sum_all - sum_background) as f64 / weight_foreground as f64;

        let variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Global binarization: pixels above the level become white, the rest black.
pub fn threshold(img: &GrayImage, level: u8) -> GrayImage {
    let mut output = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let value = if pixel[0] > level { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([value]));
    }
    output
}

/// Global Otsu binarization.
pub fn otsu_threshold(img: &GrayImage) -> GrayImage {
    threshold(img, otsu_level(img))
}

/// Adaptive local mean threshold over a square window.
///
/// Each pixel is compared against the mean of its neighborhood minus a
/// small offset; this keeps text legible when illumination varies across
/// the chart (photographed charts, shadows). Uses a summed-area table so
/// the window size does not affect cost.
pub fn adaptive_threshold(img: &GrayImage, radius: u32, offset: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return output;
    }

    // integral[y][x] = sum of pixels in [0,x) x [0,y)
    let w = width as usize + 1;
    let h = height as usize + 1;
    let mut integral = vec![0u64; w * h];
    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += img.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * w + (x + 1)] = integral[y * w + (x + 1)] + row_sum;
        }
    }

    let radius = radius as i64;
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let x0 = (x - radius).max(0) as usize;
            let y0 = (y - radius).max(0) as usize;
            let x1 = ((x + radius + 1).min(width as i64)) as usize;
            let y1 = ((y + radius + 1).min(height as i64)) as usize;

            let area = ((x1 - x0) * (y1 - y0)) as u64;
            let sum = integral[y1 * w + x1] + integral[y0 * w + x0]
                - integral[y0 * w + x1]
                - integral[y1 * w + x0];
            let mean = (sum / area) as i32;

            let pixel = img.get_pixel(x as u32, y as u32)[0] as i32;
            let value = if pixel > mean - offset { 255u8 } else { 0u8 };
            output.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    output
}

/// Gaussian blur followed by Otsu binarization. Smooths away JPEG noise
/// that would otherwise survive the global threshold.
pub fn blur_threshold(img: &GrayImage, sigma: f32) -> GrayImage {
    let blurred = image::imageops::blur(img, sigma);
    otsu_threshold(&blurred)
}

/// Contrast stretch plus brightness lift, used before the restricted N/A
/// scan. Faint gray "N/A" markers end up near full black on white.
pub fn enhance_contrast(img: &GrayImage, brightness: i32) -> GrayImage {
    let (mut min, mut max) = (255u8, 0u8);
    for pixel in img.pixels() {
        min = min.min(pixel[0]);
        max = max.max(pixel[0]);
    }
    let range = (max as i32 - min as i32).max(1);

    let mut output = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let stretched = (pixel[0] as i32 - min as i32) * 255 / range;
        let value = (stretched + brightness).clamp(0, 255) as u8;
        output.put_pixel(x, y, Luma([value]));
    }
    output
}

/// Crops the zone rectangle (plus margin) out of the image, clamped to the
/// image bounds. Returns the crop and the top-left offset needed to map
/// token coordinates back into full-image space.
pub fn crop_zone(img: &DynamicImage, rect: &ZoneRect, margin: f32) -> (DynamicImage, u32, u32) {
    let (w, h) = (img.width(), img.height());

    let x0 = ((rect.x - margin).max(0.0) as u32).min(w);
    let y0 = ((rect.y - margin).max(0.0) as u32).min(h);
    let cw = (((rect.width + 2.0 * margin) as u32).max(1)).min(w - x0);
    let ch = (((rect.height + 2.0 * margin) as u32).max(1)).min(h - y0);

    (img.crop_imm(x0, y0, cw, ch), x0, y0)
}
