use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParallaxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot open frame source '{0}'")]
    SourceUnavailable(PathBuf),

    #[error("No frames were decoded from the source")]
    NoFramesDecoded,

    #[error("Cannot process: no frame sequence loaded")]
    NotLoaded,

    #[error("No templates have been selected")]
    NoTemplates,

    #[error(
        "Template at ({x}, {y}) with size {size} exceeds the {width}x{height} frame bounds"
    )]
    TemplateOutOfBounds {
        x: u32,
        y: u32,
        size: usize,
        width: usize,
        height: usize,
    },

    #[error(
        "Search window ({search_window_size}) is smaller than the template ({template_size})"
    )]
    SearchWindowTooSmall {
        search_window_size: usize,
        template_size: usize,
    },

    #[error("Invalid SER file: {0}")]
    InvalidSequence(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),
}

pub type Result<T> = std::result::Result<T, ParallaxError>;
