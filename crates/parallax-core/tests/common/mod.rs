#![allow(dead_code)]

use ndarray::Array2;

use parallax_core::frame::{ColorFrame, Frame};
use parallax_core::io::ser::SER_HEADER_SIZE;

/// Deterministic non-repeating background texture in [0.1, 0.3].
///
/// The modular residue breaks shift-invariance, so a patch of this pattern
/// correlates perfectly only with itself at zero displacement.
pub fn pattern_value(row: usize, col: usize) -> f32 {
    0.1 + ((row * 7 + col * 13) % 11) as f32 * 0.02
}

/// Checkerboard texture of the bright moving square, in [0.7, 1.0].
pub fn square_value(u: usize, v: usize) -> f32 {
    if (u + v) % 2 == 0 {
        1.0
    } else {
        0.7
    }
}

/// Grayscale array filled with the background pattern.
pub fn pattern_array(height: usize, width: usize) -> Array2<f32> {
    let mut data = Array2::<f32>::zeros((height, width));
    for row in 0..height {
        for col in 0..width {
            data[[row, col]] = pattern_value(row, col);
        }
    }
    data
}

/// Color frame whose three channels all equal `data`.
pub fn gray_color_frame(data: Array2<f32>) -> ColorFrame {
    ColorFrame {
        red: Frame::new(data.clone()),
        green: Frame::new(data.clone()),
        blue: Frame::new(data),
    }
}

/// One frame of the moving-square scene: patterned background with a
/// textured square whose top-left corner sits at (x, y).
pub fn square_scene(height: usize, width: usize, x: usize, y: usize, square: usize) -> Array2<f32> {
    let mut data = pattern_array(height, width);
    for u in 0..square {
        for v in 0..square {
            let (row, col) = (y + u, x + v);
            if row < height && col < width {
                data[[row, col]] = square_value(u, v);
            }
        }
    }
    data
}

/// Frame sequence in which the square's top-left starts at (x0, y0) and
/// moves by (step_x, step_y) pixels per frame.
pub fn moving_square_sequence(
    height: usize,
    width: usize,
    frames: usize,
    x0: usize,
    y0: usize,
    square: usize,
    step_x: usize,
    step_y: usize,
) -> Vec<ColorFrame> {
    (0..frames)
        .map(|i| {
            gray_color_frame(square_scene(
                height,
                width,
                x0 + i * step_x,
                y0 + i * step_y,
                square,
            ))
        })
        .collect()
}

/// Build a SER file header for mono 8-bit frames.
///
/// Returns a `Vec<u8>` containing just the 178-byte header.
/// Append frame pixel data after calling this function.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 100=RGB, 101=BGR (Bayer ids are rejected by the reader)
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0 (little-endian per Siril convention)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // Instrument (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // Telescope (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());
    // DateTimeUTC (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}
