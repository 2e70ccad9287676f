//! Caller-owned pipeline session: a strict two-phase `load` / `process`
//! lifecycle over one frame sequence, holding every derived artifact.
//!
//! Both phases run synchronously to completion on the calling thread. A
//! session is a plain value; independent sessions do not share state.

use std::path::Path;

use tracing::info;

use crate::color::luminance;
use crate::config::{LoadConfig, ProcessConfig};
use crate::depth::estimate_depth;
use crate::error::{ParallaxError, Result};
use crate::frame::{ColorFrame, Displacement, Frame};
use crate::io::source::{open_source, FrameSource};
use crate::synth::synthesize_aperture;
use crate::track::{track_templates, validate_templates, TemplateTrack};
use crate::warp::{downscale_color, resize_color, rotate_color};

pub struct Session {
    frames_color: Vec<ColorFrame>,
    frames_gray: Vec<Frame>,
    first_frame: Option<ColorFrame>,
    tracks: Vec<TemplateTrack>,
    parallaxes: Vec<f64>,
    depth_map: Option<ColorFrame>,
    synthetic_image: Option<ColorFrame>,
    status: String,
    loaded: bool,
    processed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            frames_color: Vec::new(),
            frames_gray: Vec::new(),
            first_frame: None,
            tracks: Vec::new(),
            parallaxes: Vec::new(),
            depth_map: None,
            synthetic_image: None,
            status: "Ready.".to_string(),
            loaded: false,
            processed: false,
        }
    }

    /// Populate the frame store from a source of decoded frames.
    ///
    /// Per frame, in order: optional resize override (when both override
    /// dimensions are set), optional rotation about the frame center,
    /// downscale by 1/scale_factor, grayscale conversion of the small frame.
    ///
    /// All prior frames and artifacts are discarded up front; on any failure
    /// the session is left in the not-loaded state.
    pub fn load(&mut self, source: &mut dyn FrameSource, config: &LoadConfig) -> Result<()> {
        self.status = "Loading frames...".to_string();
        self.clear_frames();

        let scale = config.scale_factor.max(1);
        info!(
            max_frames = config.max_frames,
            scale_factor = scale,
            rotation = config.rotation_degrees,
            "Loading frame sequence"
        );

        while self.frames_color.len() < config.max_frames {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) => return self.fail(err),
            };

            let frame = if config.override_width > 0 && config.override_height > 0 {
                resize_color(
                    &frame,
                    config.override_width as usize,
                    config.override_height as usize,
                )
            } else {
                frame
            };

            let frame = if config.rotation_degrees != 0 {
                rotate_color(&frame, config.rotation_degrees as f64)
            } else {
                frame
            };

            let small = downscale_color(&frame, scale);
            self.frames_gray.push(luminance(&small));
            self.frames_color.push(small);
        }

        if self.frames_color.is_empty() {
            return self.fail(ParallaxError::NoFramesDecoded);
        }

        self.first_frame = Some(self.frames_color[0].clone());
        self.loaded = true;
        self.status = format!("Successfully loaded {} frames.", self.frames_color.len());
        info!(frames = self.frames_color.len(), "Load complete");
        Ok(())
    }

    /// Run tracking, depth estimation and aperture synthesis.
    ///
    /// Validation (loaded state, non-empty template list, window/template
    /// sizes, template bounds) happens before any prior result is touched, so
    /// a rejected call leaves earlier artifacts intact. Once tracking starts,
    /// artifacts are rebuilt in full.
    pub fn process(&mut self, config: &ProcessConfig) -> Result<()> {
        if !self.loaded {
            return self.fail(ParallaxError::NotLoaded);
        }
        let first = match &self.first_frame {
            Some(frame) => frame.clone(),
            None => return self.fail(ParallaxError::NotLoaded),
        };
        let (h, w) = (self.frames_gray[0].height(), self.frames_gray[0].width());
        if let Err(err) = validate_templates(w, h, config) {
            return self.fail(err);
        }

        self.clear_artifacts();
        self.status = "Processing...".to_string();

        self.tracks = match track_templates(&self.frames_gray, config) {
            Ok(tracks) => tracks,
            Err(err) => return self.fail(err),
        };

        let (map, parallaxes) = estimate_depth(&first, &self.tracks, config.template_size);
        self.depth_map = Some(map);
        self.parallaxes = parallaxes;

        // The synthetic image always follows template index 0.
        let shifts = &self.tracks[0].displacements;
        self.synthetic_image = match synthesize_aperture(&self.frames_color, shifts) {
            Ok(image) => Some(image),
            Err(err) => return self.fail(err),
        };

        self.processed = true;
        self.status = if self.tracks.len() < 2 {
            "Processing complete. Depth map requires at least 2 templates.".to_string()
        } else {
            "Processing complete.".to_string()
        };
        info!(templates = self.tracks.len(), "Processing complete");
        Ok(())
    }

    /// Open a source by path and load from it.
    ///
    /// Prior session contents are discarded before the open is attempted, so
    /// a path that cannot be opened leaves the session not-loaded.
    pub fn load_path(&mut self, path: &Path, config: &LoadConfig) -> Result<()> {
        match open_source(path) {
            Ok(mut source) => self.load(source.as_mut(), config),
            Err(err) => {
                self.clear_frames();
                self.fail(err)
            }
        }
    }

    fn clear_frames(&mut self) {
        self.loaded = false;
        self.frames_color.clear();
        self.frames_gray.clear();
        self.first_frame = None;
        self.clear_artifacts();
    }

    fn clear_artifacts(&mut self) {
        self.processed = false;
        self.tracks.clear();
        self.parallaxes.clear();
        self.depth_map = None;
        self.synthetic_image = None;
    }

    fn fail(&mut self, err: ParallaxError) -> Result<()> {
        self.status = err.to_string();
        Err(err)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn status_message(&self) -> &str {
        &self.status
    }

    pub fn frame_count(&self) -> usize {
        self.frames_color.len()
    }

    /// The stored copy of frame 0's small color frame.
    pub fn first_frame(&self) -> Option<&ColorFrame> {
        self.first_frame.as_ref()
    }

    pub fn depth_map(&self) -> Option<&ColorFrame> {
        self.depth_map.as_ref()
    }

    pub fn synthetic_image(&self) -> Option<&ColorFrame> {
        self.synthetic_image.as_ref()
    }

    pub fn template_count(&self) -> usize {
        self.tracks.len()
    }

    /// Reference patch cut from frame 0 for the given template.
    pub fn template_patch(&self, index: usize) -> Option<&Frame> {
        self.tracks.get(index).map(|t| &t.patch)
    }

    /// Default display patch: the last template in input order.
    pub fn focal_template_patch(&self) -> Option<&Frame> {
        self.tracks.last().map(|t| &t.patch)
    }

    /// Displacement series for the given template, one entry per frame.
    pub fn displacements(&self, index: usize) -> Option<&[Displacement]> {
        self.tracks.get(index).map(|t| t.displacements.as_slice())
    }

    /// Displacement series of template 0, used for plotting; empty before
    /// processing.
    pub fn primary_displacements(&self) -> &[Displacement] {
        self.tracks
            .first()
            .map(|t| t.displacements.as_slice())
            .unwrap_or(&[])
    }

    /// Per-template parallax scalars; empty with fewer than two templates.
    pub fn parallaxes(&self) -> &[f64] {
        &self.parallaxes
    }
}
