//! Synthetic-aperture photograph: shift-and-add temporal averaging.
//!
//! Every color frame is translated by the negative of the tracked
//! displacement for that frame, cancelling the motion of the tracked feature,
//! then all translated frames are averaged per pixel. The tracked feature
//! stays sharp; content moving differently smears.

use ndarray::Array2;
use tracing::info;

use crate::error::{ParallaxError, Result};
use crate::frame::{ColorFrame, Displacement, Frame};
use crate::warp::translate_color;

/// Average all frames after cancelling the given per-frame displacements.
///
/// `shifts` holds one displacement per frame, in frame order. Newly exposed
/// border pixels are black; the caller clamps on integer export.
pub fn synthesize_aperture(frames: &[ColorFrame], shifts: &[Displacement]) -> Result<ColorFrame> {
    if frames.is_empty() {
        return Err(ParallaxError::NoFramesDecoded);
    }
    debug_assert_eq!(frames.len(), shifts.len());

    let (h, w) = (frames[0].height(), frames[0].width());
    let n = frames.len() as f32;
    info!(frames = frames.len(), "Synthesizing aperture image");

    let mut sum_r = Array2::<f32>::zeros((h, w));
    let mut sum_g = Array2::<f32>::zeros((h, w));
    let mut sum_b = Array2::<f32>::zeros((h, w));

    for (frame, shift) in frames.iter().zip(shifts) {
        let shifted = translate_color(frame, -shift.dx, -shift.dy);
        sum_r += &shifted.red.data;
        sum_g += &shifted.green.data;
        sum_b += &shifted.blue.data;
    }

    sum_r /= n;
    sum_g /= n;
    sum_b /= n;

    Ok(ColorFrame {
        red: Frame::new(sum_r),
        green: Frame::new(sum_g),
        blue: Frame::new(sum_b),
    })
}
