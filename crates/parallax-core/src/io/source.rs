//! Frame sources: the boundary through which the pipeline receives an
//! ordered sequence of already-decoded color frames.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ParallaxError, Result};
use crate::frame::ColorFrame;
use crate::io::image_io::load_color_image;
use crate::io::ser::SerSource;

/// An ordered pull-based supply of decoded frames.
///
/// `next_frame` yields frames in sequence order until exhausted. Sources are
/// single-pass; reopen to read again.
pub trait FrameSource: std::fmt::Debug {
    fn next_frame(&mut self) -> Result<Option<ColorFrame>>;

    /// Total frame count, when the container knows it up front.
    fn frame_count_hint(&self) -> Option<usize> {
        None
    }
}

/// Frames decoded elsewhere and handed over in memory.
#[derive(Debug)]
pub struct MemorySource {
    frames: std::vec::IntoIter<ColorFrame>,
    total: usize,
}

impl MemorySource {
    pub fn new(frames: Vec<ColorFrame>) -> Self {
        let total = frames.len();
        Self {
            frames: frames.into_iter(),
            total,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<ColorFrame>> {
        Ok(self.frames.next())
    }

    fn frame_count_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// A directory of still images, read in lexicographic filename order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ParallaxError::SourceUnavailable(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        debug!(dir = %dir.display(), images = paths.len(), "Opened image sequence");
        Ok(Self { paths, next: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<ColorFrame>> {
        match self.paths.get(self.next) {
            Some(path) => {
                let frame = load_color_image(path)?;
                self.next += 1;
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    fn frame_count_hint(&self) -> Option<usize> {
        Some(self.paths.len())
    }
}

/// Open a frame source by path: a directory is read as an image sequence, a
/// `.ser` file as a SER container. Anything else cannot be opened.
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        return Ok(Box::new(ImageSequenceSource::open(path)?));
    }
    if path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ser"))
    {
        return Ok(Box::new(SerSource::open(path)?));
    }
    Err(ParallaxError::SourceUnavailable(path.to_path_buf()))
}
