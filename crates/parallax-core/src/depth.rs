//! Parallax-based depth estimation.
//!
//! Each template's end-to-end drift magnitude is normalized across templates
//! and mapped onto a blue (far) to red (near) gradient; a filled disc per
//! template is painted onto a canvas the size of the first frame.

use tracing::warn;

use crate::consts::{DEPTH_FAR_COLOR, DEPTH_NEAR_COLOR, PARALLAX_EPSILON};
use crate::frame::ColorFrame;
use crate::track::TemplateTrack;

/// One parallax scalar per template: the norm of its last-frame displacement.
pub fn parallax_scalars(tracks: &[TemplateTrack]) -> Vec<f64> {
    tracks.iter().map(TemplateTrack::parallax).collect()
}

/// Build the depth map for the tracked templates.
///
/// With fewer than two templates there is no parallax spread to rank, so the
/// first frame is returned unchanged as a placeholder and the scalar list is
/// empty; the caller surfaces the condition through its status text.
pub fn estimate_depth(
    first_frame: &ColorFrame,
    tracks: &[TemplateTrack],
    template_size: usize,
) -> (ColorFrame, Vec<f64>) {
    if tracks.len() < 2 {
        warn!(
            templates = tracks.len(),
            "Depth map requires at least 2 templates; returning first frame as placeholder"
        );
        return (first_frame.clone(), Vec::new());
    }

    let parallaxes = parallax_scalars(tracks);
    let min = parallaxes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = parallaxes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut map = ColorFrame::zeros(first_frame.height(), first_frame.width());

    for (track, &parallax) in tracks.iter().zip(&parallaxes) {
        let normalized = if range > PARALLAX_EPSILON {
            ((parallax - min) / range) as f32
        } else {
            0.0
        };
        let color = gradient_color(normalized);

        let half = (template_size / 2) as i64;
        let cx = track.origin.x as i64 + half;
        let cy = track.origin.y as i64 + half;
        paint_disc(&mut map, cx, cy, template_size as i64, color);
    }

    (map, parallaxes)
}

/// Linear blend between the far and near endpoint colors.
fn gradient_color(p: f32) -> [f32; 3] {
    [
        DEPTH_FAR_COLOR[0] * (1.0 - p) + DEPTH_NEAR_COLOR[0] * p,
        DEPTH_FAR_COLOR[1] * (1.0 - p) + DEPTH_NEAR_COLOR[1] * p,
        DEPTH_FAR_COLOR[2] * (1.0 - p) + DEPTH_NEAR_COLOR[2] * p,
    ]
}

/// Paint a filled disc, clipped to the canvas bounds.
fn paint_disc(canvas: &mut ColorFrame, cx: i64, cy: i64, radius: i64, color: [f32; 3]) {
    let h = canvas.height() as i64;
    let w = canvas.width() as i64;
    let r2 = radius * radius;

    let row0 = (cy - radius).max(0);
    let row1 = (cy + radius).min(h - 1);
    let col0 = (cx - radius).max(0);
    let col1 = (cx + radius).min(w - 1);

    for row in row0..=row1 {
        for col in col0..=col1 {
            let dy = row - cy;
            let dx = col - cx;
            if dx * dx + dy * dy <= r2 {
                let idx = [row as usize, col as usize];
                canvas.red.data[idx] = color[0];
                canvas.green.data[idx] = color[1];
                canvas.blue.data[idx] = color[2];
            }
        }
    }
}
