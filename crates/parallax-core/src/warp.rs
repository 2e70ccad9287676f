//! Geometric resampling primitives: translation, rotation and resizing.
//!
//! Translation and rotation fill newly exposed pixels with a constant black
//! value; resizing replicates the border instead so that scaled frames keep
//! their edge brightness.

use ndarray::Array2;

use crate::frame::{ColorFrame, Frame};

/// Bilinear sample at fractional coordinates. Out-of-bounds taps read 0.0.
pub fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let sample = |r: i64, c: i64| -> f32 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize]]
        } else {
            0.0
        }
    };

    let v00 = sample(y0, x0);
    let v10 = sample(y0, x1);
    let v01 = sample(y1, x0);
    let v11 = sample(y1, x1);

    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}

/// Bilinear sample with coordinates clamped to the image bounds.
fn bilinear_sample_clamped(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    let y = y.clamp(0.0, (h - 1) as f64);
    let x = x.clamp(0.0, (w - 1) as f64);
    bilinear_sample(data, y, x)
}

/// Shift frame content by (dx, dy). Exposed border pixels become 0.0.
pub fn translate(frame: &Frame, dx: f64, dy: f64) -> Frame {
    let (h, w) = frame.data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let src_y = row as f64 - dy;
            let src_x = col as f64 - dx;
            result[[row, col]] = bilinear_sample(&frame.data, src_y, src_x);
        }
    }

    Frame::new(result)
}

pub fn translate_color(color: &ColorFrame, dx: f64, dy: f64) -> ColorFrame {
    color.map_planes(|plane| translate(plane, dx, dy))
}

/// Rotate frame content about its center, keeping the output size.
///
/// Positive angles rotate counter-clockwise in image coordinates (y down).
/// The center is ((w-1)/2, (h-1)/2); exposed border pixels become 0.0.
pub fn rotate_about_center(frame: &Frame, degrees: f64) -> Frame {
    let (h, w) = frame.data.dim();
    let theta = degrees.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;

    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let x = col as f64 - cx;
            let y = row as f64 - cy;
            // Inverse mapping: sample where the output pixel came from.
            let src_x = cos_t * x - sin_t * y + cx;
            let src_y = sin_t * x + cos_t * y + cy;
            result[[row, col]] = bilinear_sample(&frame.data, src_y, src_x);
        }
    }

    Frame::new(result)
}

pub fn rotate_color(color: &ColorFrame, degrees: f64) -> ColorFrame {
    color.map_planes(|plane| rotate_about_center(plane, degrees))
}

/// Bilinear resize to the given dimensions using pixel-center mapping.
pub fn resize(frame: &Frame, new_width: usize, new_height: usize) -> Frame {
    let (h, w) = frame.data.dim();
    let scale_x = w as f64 / new_width as f64;
    let scale_y = h as f64 / new_height as f64;

    let mut result = Array2::<f32>::zeros((new_height, new_width));

    for row in 0..new_height {
        for col in 0..new_width {
            let src_y = (row as f64 + 0.5) * scale_y - 0.5;
            let src_x = (col as f64 + 0.5) * scale_x - 0.5;
            result[[row, col]] = bilinear_sample_clamped(&frame.data, src_y, src_x);
        }
    }

    Frame::new(result)
}

pub fn resize_color(color: &ColorFrame, new_width: usize, new_height: usize) -> ColorFrame {
    color.map_planes(|plane| resize(plane, new_width, new_height))
}

/// Shrink a frame by an integer factor. A factor of 1 is the identity.
pub fn downscale(frame: &Frame, factor: u32) -> Frame {
    if factor <= 1 {
        return frame.clone();
    }
    let (h, w) = frame.data.dim();
    let new_w = ((w as f64 / factor as f64).round() as usize).max(1);
    let new_h = ((h as f64 / factor as f64).round() as usize).max(1);
    resize(frame, new_w, new_h)
}

pub fn downscale_color(color: &ColorFrame, factor: u32) -> ColorFrame {
    color.map_planes(|plane| downscale(plane, factor))
}
