//! SER (LUCAM-RECORDER) container source.
//!
//! SER stores uncompressed frames behind a fixed 178-byte header, which makes
//! it a ready-decoded video source for the pipeline. Mono and interleaved
//! RGB/BGR data at 8 or 16 bits are supported; Bayer-mosaiced modes are not.

use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::error::{ParallaxError, Result};
use crate::frame::{ColorFrame, Frame, SourceInfo};
use crate::io::source::FrameSource;

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

const COLOR_ID_MONO: i32 = 0;
const COLOR_ID_RGB: i32 = 100;
const COLOR_ID_BGR: i32 = 101;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Number of planes per pixel (1 for mono, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            COLOR_ID_RGB | COLOR_ID_BGR => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> usize {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .expect("image dimensions too large");
        let bytes_per_pixel = self.bytes_per_pixel_plane() * self.planes_per_pixel();
        pixels
            .checked_mul(bytes_per_pixel)
            .expect("frame size calculation overflow")
    }
}

/// Memory-mapped SER source, yielding frames in container order.
#[derive(Debug)]
pub struct SerSource {
    mmap: Mmap,
    header: SerHeader,
    cursor: usize,
}

impl SerSource {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|_| ParallaxError::SourceUnavailable(path.to_path_buf()))?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(ParallaxError::InvalidSequence(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(ParallaxError::InvalidSequence(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        match header.color_id {
            COLOR_ID_MONO | COLOR_ID_RGB | COLOR_ID_BGR => {}
            other => {
                return Err(ParallaxError::UnsupportedColorMode(format!(
                    "SER color id {other}"
                )))
            }
        }

        let expected_data_size =
            SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(ParallaxError::InvalidSequence(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            cursor: 0,
        })
    }

    pub fn header(&self) -> &SerHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: Some(self.frame_count()),
            width: self.header.width,
            height: self.header.height,
        }
    }

    /// Decode a single frame to a color frame.
    ///
    /// Mono data is replicated across the three channels.
    pub fn read_frame(&self, index: usize) -> Result<ColorFrame> {
        let count = self.frame_count();
        if index >= count {
            return Err(ParallaxError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }

        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let raw = &self.mmap[offset..offset + self.header.frame_byte_size()];
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let bpp = self.header.bytes_per_pixel_plane();
        let depth = self.header.pixel_depth;
        let le = self.header.little_endian;

        match self.header.color_id {
            COLOR_ID_MONO => {
                let gray = decode_plane(raw, h, w, bpp, 1, 0, depth, le);
                Ok(ColorFrame {
                    red: Frame::new(gray.clone()),
                    green: Frame::new(gray.clone()),
                    blue: Frame::new(gray),
                })
            }
            id => {
                // Interleaved RGB or BGR triples.
                let (r_idx, b_idx) = if id == COLOR_ID_BGR { (2, 0) } else { (0, 2) };
                Ok(ColorFrame {
                    red: Frame::new(decode_plane(raw, h, w, bpp, 3, r_idx, depth, le)),
                    green: Frame::new(decode_plane(raw, h, w, bpp, 3, 1, depth, le)),
                    blue: Frame::new(decode_plane(raw, h, w, bpp, 3, b_idx, depth, le)),
                })
            }
        }
    }
}

impl FrameSource for SerSource {
    fn next_frame(&mut self) -> Result<Option<ColorFrame>> {
        if self.cursor >= self.frame_count() {
            return Ok(None);
        }
        let frame = self.read_frame(self.cursor)?;
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn frame_count_hint(&self) -> Option<usize> {
        Some(self.frame_count())
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(ParallaxError::InvalidSequence(format!(
            "Invalid dimensions {width}x{height}"
        )));
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(ParallaxError::InvalidSequence(format!(
            "Invalid pixel depth {pixel_depth}"
        )));
    }

    // SER spec: LittleEndian field = 0 means big-endian pixel data, but most
    // writers use 0 for little-endian. Follow Siril's convention: 0 is
    // little-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
    })
}

#[allow(clippy::too_many_arguments)]
fn decode_plane(
    raw: &[u8],
    height: usize,
    width: usize,
    bytes_per_sample: usize,
    planes: usize,
    plane_index: usize,
    bit_depth: u32,
    little_endian: bool,
) -> Array2<f32> {
    let max_val = ((1u32 << bit_depth) - 1) as f32;
    let mut data = Array2::<f32>::zeros((height, width));

    for row in 0..height {
        for col in 0..width {
            let pixel_offset = (row * width + col) * planes * bytes_per_sample;
            let idx = pixel_offset + plane_index * bytes_per_sample;
            let val = if bytes_per_sample == 1 {
                raw[idx] as f32
            } else {
                let pair = [raw[idx], raw[idx + 1]];
                if little_endian {
                    u16::from_le_bytes(pair) as f32
                } else {
                    u16::from_be_bytes(pair) as f32
                }
            };
            data[[row, col]] = val / max_val;
        }
    }

    data
}
