mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use common::{
    build_ser_header_full, build_ser_with_frames, gray_color_frame, write_test_ser,
};
use parallax_core::error::ParallaxError;
use parallax_core::io::image_io::save_color_png;
use parallax_core::io::ser::SerSource;
use parallax_core::io::source::{FrameSource, ImageSequenceSource, MemorySource};
use parallax_core::io::open_source;

#[test]
fn test_memory_source_drains_in_order() {
    let frames = vec![
        gray_color_frame(Array2::from_elem((4, 4), 0.25f32)),
        gray_color_frame(Array2::from_elem((4, 4), 0.75f32)),
    ];
    let mut source = MemorySource::new(frames);

    assert_eq!(source.frame_count_hint(), Some(2));
    let first = source.next_frame().unwrap().unwrap();
    assert_abs_diff_eq!(first.red.data[[0, 0]], 0.25, epsilon = 1e-6);
    let second = source.next_frame().unwrap().unwrap();
    assert_abs_diff_eq!(second.red.data[[0, 0]], 0.75, epsilon = 1e-6);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn test_ser_mono_frames_decode_and_replicate() {
    // Two 3x2 frames of increasing brightness.
    let frames = vec![vec![0u8, 51, 102, 153, 204, 255], vec![255u8; 6]];
    let data = build_ser_with_frames(3, 2, &frames);
    let file = write_test_ser(&data);

    let mut source = SerSource::open(file.path()).unwrap();
    assert_eq!(source.frame_count(), 2);
    assert_eq!(source.frame_count_hint(), Some(2));

    let frame = source.next_frame().unwrap().unwrap();
    assert_eq!(frame.width(), 3);
    assert_eq!(frame.height(), 2);
    assert_abs_diff_eq!(frame.red.data[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.red.data[[0, 1]], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.red.data[[1, 2]], 1.0, epsilon = 1e-6);
    // Mono is replicated across channels.
    assert_eq!(frame.red.data, frame.green.data);
    assert_eq!(frame.red.data, frame.blue.data);

    let frame = source.next_frame().unwrap().unwrap();
    assert_abs_diff_eq!(frame.blue.data[[1, 1]], 1.0, epsilon = 1e-6);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn test_ser_rgb_and_bgr_channel_order() {
    // One 1x1 frame with a pure red pixel, in both interleave orders.
    let mut rgb = build_ser_header_full(1, 1, 8, 1, 100);
    rgb.extend_from_slice(&[255, 0, 0]);
    let file = write_test_ser(&rgb);
    let frame = SerSource::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_abs_diff_eq!(frame.red.data[[0, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.blue.data[[0, 0]], 0.0, epsilon = 1e-6);

    let mut bgr = build_ser_header_full(1, 1, 8, 1, 101);
    bgr.extend_from_slice(&[0, 0, 255]);
    let file = write_test_ser(&bgr);
    let frame = SerSource::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_abs_diff_eq!(frame.red.data[[0, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.blue.data[[0, 0]], 0.0, epsilon = 1e-6);
}

#[test]
fn test_ser_sixteen_bit_little_endian() {
    let mut data = build_ser_header_full(2, 1, 16, 1, 0);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&65535u16.to_le_bytes());
    let file = write_test_ser(&data);

    let frame = SerSource::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_abs_diff_eq!(frame.red.data[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(frame.red.data[[0, 1]], 1.0, epsilon = 1e-6);
}

#[test]
fn test_ser_truncated_file_rejected() {
    let frames = vec![vec![0u8; 6]];
    let mut data = build_ser_with_frames(3, 2, &frames);
    data.truncate(data.len() - 2);
    let file = write_test_ser(&data);

    let err = SerSource::open(file.path()).unwrap_err();
    assert!(matches!(err, ParallaxError::InvalidSequence(_)));
}

#[test]
fn test_ser_bad_magic_rejected() {
    let frames = vec![vec![0u8; 6]];
    let mut data = build_ser_with_frames(3, 2, &frames);
    data[0] = b'X';
    let file = write_test_ser(&data);

    let err = SerSource::open(file.path()).unwrap_err();
    assert!(matches!(err, ParallaxError::InvalidSequence(_)));
}

#[test]
fn test_ser_bayer_mode_unsupported() {
    let mut data = build_ser_header_full(2, 2, 8, 1, 8); // BAYER_RGGB
    data.extend_from_slice(&[0u8; 4]);
    let file = write_test_ser(&data);

    let err = SerSource::open(file.path()).unwrap_err();
    assert!(matches!(err, ParallaxError::UnsupportedColorMode(_)));
}

#[test]
fn test_open_source_nonexistent_path() {
    let err = open_source(std::path::Path::new("/nonexistent/video.ser")).unwrap_err();
    assert!(matches!(err, ParallaxError::SourceUnavailable(_)));
}

#[test]
fn test_image_sequence_reads_in_lexicographic_order() {
    let dir = tempfile::tempdir().unwrap();

    // Written out of order; read back sorted by filename.
    for (name, value) in [("frame_002.png", 0.8f32), ("frame_000.png", 0.2), ("frame_001.png", 0.4)] {
        let frame = gray_color_frame(Array2::from_elem((6, 6), value));
        save_color_png(&frame, &dir.path().join(name)).unwrap();
    }
    // Non-image files are ignored.
    std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

    let mut source = ImageSequenceSource::open(dir.path()).unwrap();
    assert_eq!(source.frame_count_hint(), Some(3));

    let mut values = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        values.push(frame.red.data[[0, 0]]);
    }
    assert_eq!(values.len(), 3);
    // 8-bit quantization: compare loosely.
    assert_abs_diff_eq!(values[0], 0.2, epsilon = 0.01);
    assert_abs_diff_eq!(values[1], 0.4, epsilon = 0.01);
    assert_abs_diff_eq!(values[2], 0.8, epsilon = 0.01);
}
