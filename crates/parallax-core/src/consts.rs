/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Parallax spread below which all normalized depth values collapse to 0.
pub const PARALLAX_EPSILON: f64 = 1e-5;

/// Patch variance below which a correlation score is defined as 0 instead
/// of dividing by a vanishing denominator.
pub const CORRELATION_VARIANCE_EPSILON: f32 = 1e-8;

/// RGB color painted at normalized parallax 1.0 (nearest).
pub const DEPTH_NEAR_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// RGB color painted at normalized parallax 0.0 (farthest).
pub const DEPTH_FAR_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

/// Default maximum number of frames pulled from a source.
pub const DEFAULT_MAX_FRAMES: usize = 90;

/// Default integer downscale factor applied to decoded frames.
pub const DEFAULT_SCALE_FACTOR: u32 = 2;

/// Default template side length in pixels.
pub const DEFAULT_TEMPLATE_SIZE: usize = 32;

/// Default search window side length in pixels.
pub const DEFAULT_SEARCH_WINDOW_SIZE: usize = 160;
