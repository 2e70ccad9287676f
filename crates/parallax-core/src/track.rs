//! Multi-template patch tracking via brute-force normalized cross-correlation.
//!
//! Each template is a fixed square patch cut from grayscale frame 0. For every
//! later frame the patch is scored against all placements inside a bounded
//! search window and the best-scoring placement becomes that frame's
//! displacement relative to the template origin.

use ndarray::{s, Array2};
use tracing::info;

use crate::config::ProcessConfig;
use crate::consts::CORRELATION_VARIANCE_EPSILON;
use crate::error::{ParallaxError, Result};
use crate::frame::{Displacement, Frame, TemplatePoint};

/// Tracking output for one template: its origin, the reference patch retained
/// for display, and one displacement per frame (entry 0 pinned to zero).
#[derive(Clone, Debug)]
pub struct TemplateTrack {
    pub origin: TemplatePoint,
    pub patch: Frame,
    pub displacements: Vec<Displacement>,
}

impl TemplateTrack {
    /// Apparent drift between the first and last frame, the depth proxy.
    pub fn parallax(&self) -> f64 {
        self.displacements.last().map(Displacement::norm).unwrap_or(0.0)
    }
}

/// Zero-mean template prepared for repeated correlation scoring.
///
/// `t_prime` is the patch minus its mean, `var_t` the sum of its squares.
/// With a zero-mean template, the ZNCC numerator at a placement reduces to
/// the dot product of `t_prime` with the window patch.
struct TemplatePlan {
    t_prime: Array2<f32>,
    var_t: f32,
}

impl TemplatePlan {
    fn new(patch: &Array2<f32>) -> Self {
        let n = patch.len() as f32;
        let mean = patch.sum() / n;
        let t_prime = patch.mapv(|v| v - mean);
        let var_t = t_prime.iter().map(|v| v * v).sum();
        Self { t_prime, var_t }
    }
}

/// Reject template lists that cannot be tracked: empty lists, windows smaller
/// than the template, and template rectangles leaving the frame. All-or-nothing;
/// runs before any prior result is touched.
pub fn validate_templates(width: usize, height: usize, config: &ProcessConfig) -> Result<()> {
    if config.template_points.is_empty() {
        return Err(ParallaxError::NoTemplates);
    }
    if config.search_window_size < config.template_size {
        return Err(ParallaxError::SearchWindowTooSmall {
            search_window_size: config.search_window_size,
            template_size: config.template_size,
        });
    }
    for pt in &config.template_points {
        if pt.x as usize + config.template_size > width
            || pt.y as usize + config.template_size > height
        {
            return Err(ParallaxError::TemplateOutOfBounds {
                x: pt.x,
                y: pt.y,
                size: config.template_size,
                width,
                height,
            });
        }
    }
    Ok(())
}

/// Track every configured template across the grayscale sequence.
///
/// Returns one `TemplateTrack` per template, in input order.
pub fn track_templates(gray: &[Frame], config: &ProcessConfig) -> Result<Vec<TemplateTrack>> {
    let reference = match gray.first() {
        Some(f) => f,
        None => return Err(ParallaxError::NoFramesDecoded),
    };
    let (h, w) = reference.data.dim();
    validate_templates(w, h, config)?;

    let size = config.template_size;
    let margin = config.search_margin();
    info!(
        templates = config.template_points.len(),
        frames = gray.len(),
        template_size = size,
        search_window = config.search_window_size,
        "Tracking templates"
    );

    let mut tracks = Vec::with_capacity(config.template_points.len());

    for &origin in &config.template_points {
        let (ox, oy) = (origin.x as usize, origin.y as usize);
        let patch = reference.data.slice(s![oy..oy + size, ox..ox + size]).to_owned();
        let plan = TemplatePlan::new(&patch);

        let mut displacements = Vec::with_capacity(gray.len());
        // Frame 0 is the reference: zero by construction, no search.
        displacements.push(Displacement::default());

        for frame in &gray[1..] {
            let (fh, fw) = frame.data.dim();
            // Window top-left before clipping may be negative.
            let win_x0 = (origin.x as i64 - margin).max(0) as usize;
            let win_y0 = (origin.y as i64 - margin).max(0) as usize;
            let win_x1 = ((origin.x as i64 - margin) + config.search_window_size as i64)
                .min(fw as i64) as usize;
            let win_y1 = ((origin.y as i64 - margin) + config.search_window_size as i64)
                .min(fh as i64) as usize;

            let (best_x, best_y) = match_in_window(
                &frame.data,
                &plan,
                size,
                win_x0,
                win_y0,
                win_x1,
                win_y1,
            )?;

            displacements.push(Displacement::new(
                best_x as f64 - origin.x as f64,
                best_y as f64 - origin.y as f64,
            ));
        }

        tracks.push(TemplateTrack {
            origin,
            patch: Frame::new(patch),
            displacements,
        });
    }

    info!(tracks = tracks.len(), "Tracking complete");
    Ok(tracks)
}

/// Scan every placement of the template inside the clipped window and return
/// the absolute frame coordinates of the best match.
///
/// Scan order is row-major (y outer, x inner); a strictly greater score is
/// required to displace the current best, so ties resolve to the first
/// occurrence in scan order.
fn match_in_window(
    frame: &Array2<f32>,
    plan: &TemplatePlan,
    size: usize,
    win_x0: usize,
    win_y0: usize,
    win_x1: usize,
    win_y1: usize,
) -> Result<(usize, usize)> {
    if win_x1 < win_x0 + size || win_y1 < win_y0 + size {
        return Err(ParallaxError::SearchWindowTooSmall {
            search_window_size: (win_x1.saturating_sub(win_x0)).min(win_y1.saturating_sub(win_y0)),
            template_size: size,
        });
    }

    let n = (size * size) as f32;
    let mut best_score = f32::NEG_INFINITY;
    let mut best = (win_x0, win_y0);

    for y in win_y0..=win_y1 - size {
        for x in win_x0..=win_x1 - size {
            let score = zncc_at(frame, plan, x, y, size, n);
            if score > best_score {
                best_score = score;
                best = (x, y);
            }
        }
    }

    Ok(best)
}

/// Zero-mean normalized cross-correlation of the template placed at (x, y).
///
/// Scores lie in [-1, 1]; placements where either patch is effectively flat
/// score 0.0 rather than dividing by a vanishing variance.
fn zncc_at(
    frame: &Array2<f32>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
    size: usize,
    n: f32,
) -> f32 {
    let mut dot = 0.0f32;
    let mut sum_i = 0.0f32;
    let mut sum_i2 = 0.0f32;

    for ty in 0..size {
        for tx in 0..size {
            let value = frame[[y + ty, x + tx]];
            dot += plan.t_prime[[ty, tx]] * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= CORRELATION_VARIANCE_EPSILON || plan.var_t <= CORRELATION_VARIANCE_EPSILON {
        return 0.0;
    }

    dot / (plan.var_t * var_i).sqrt()
}
