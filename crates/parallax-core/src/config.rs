use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MAX_FRAMES, DEFAULT_SCALE_FACTOR, DEFAULT_SEARCH_WINDOW_SIZE, DEFAULT_TEMPLATE_SIZE,
};
use crate::frame::TemplatePoint;

/// Parameters for the load phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Maximum number of frames pulled from the source.
    pub max_frames: usize,
    /// Integer downscale factor; decoded frames shrink by 1/scale_factor.
    /// Values below 1 are treated as 1.
    pub scale_factor: u32,
    /// Resize decoded frames to this width before any other step (0 = keep).
    pub override_width: u32,
    /// Resize decoded frames to this height before any other step (0 = keep).
    pub override_height: u32,
    /// Rotation about the frame center, in degrees (0 = none).
    pub rotation_degrees: i32,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            scale_factor: DEFAULT_SCALE_FACTOR,
            override_width: 0,
            override_height: 0,
            rotation_degrees: 0,
        }
    }
}

/// Parameters for the process phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Template origins, in the order their discs are painted and their
    /// displacement series are reported.
    pub template_points: Vec<TemplatePoint>,
    /// Square template side length in pixels.
    pub template_size: usize,
    /// Square search window side length in pixels. Must be at least
    /// `template_size`.
    pub search_window_size: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            template_points: Vec::new(),
            template_size: DEFAULT_TEMPLATE_SIZE,
            search_window_size: DEFAULT_SEARCH_WINDOW_SIZE,
        }
    }
}

impl ProcessConfig {
    /// Margin between the template rectangle and the search window edge.
    pub fn search_margin(&self) -> i64 {
        (self.search_window_size as i64 - self.template_size as i64) / 2
    }
}
