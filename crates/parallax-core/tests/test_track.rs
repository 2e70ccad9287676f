mod common;

use ndarray::Array2;

use common::{moving_square_sequence, pattern_array, square_scene};
use parallax_core::color::luminance;
use parallax_core::config::ProcessConfig;
use parallax_core::error::ParallaxError;
use parallax_core::frame::{Frame, TemplatePoint};
use parallax_core::track::{track_templates, validate_templates};

fn gray_frames(color: &[parallax_core::frame::ColorFrame]) -> Vec<Frame> {
    color.iter().map(luminance).collect()
}

#[test]
fn test_series_length_and_reference_entry() {
    let frames = gray_frames(&moving_square_sequence(64, 64, 6, 12, 12, 12, 1, 0));
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(12, 12)],
        template_size: 12,
        search_window_size: 32,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].displacements.len(), 6);
    assert_eq!(tracks[0].displacements[0].dx, 0.0);
    assert_eq!(tracks[0].displacements[0].dy, 0.0);
}

#[test]
fn test_known_integer_shift_recovered_exactly() {
    // Square jumps from (12, 9) to (15, 11) between the two frames.
    let frames = vec![
        Frame::new(square_scene(64, 64, 12, 9, 12)),
        Frame::new(square_scene(64, 64, 15, 11, 12)),
    ];
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(12, 9)],
        template_size: 12,
        search_window_size: 32,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    assert_eq!(tracks[0].displacements[1].dx, 3.0);
    assert_eq!(tracks[0].displacements[1].dy, 2.0);
}

#[test]
fn test_static_scene_tracks_zero() {
    let frames: Vec<Frame> = (0..4).map(|_| Frame::new(pattern_array(48, 48))).collect();
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(20, 16)],
        template_size: 10,
        search_window_size: 26,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    for d in &tracks[0].displacements {
        assert_eq!(d.dx, 0.0);
        assert_eq!(d.dy, 0.0);
    }
}

#[test]
fn test_flat_window_ties_resolve_to_window_top_left() {
    // A featureless scene scores 0 everywhere; the first placement in
    // row-major scan order wins, i.e. the window's top-left corner.
    let frames: Vec<Frame> = (0..2)
        .map(|_| Frame::new(Array2::from_elem((64, 64), 0.5f32)))
        .collect();
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(30, 30)],
        template_size: 8,
        search_window_size: 16,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    // margin = (16 - 8) / 2 = 4, so the window starts at (26, 26).
    assert_eq!(tracks[0].displacements[1].dx, -4.0);
    assert_eq!(tracks[0].displacements[1].dy, -4.0);
}

#[test]
fn test_window_clipped_at_frame_corner() {
    // Template at the frame origin: the window loses its top-left margin to
    // clipping but the static content still matches in place.
    let frames: Vec<Frame> = (0..3).map(|_| Frame::new(pattern_array(48, 48))).collect();
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(0, 0)],
        template_size: 8,
        search_window_size: 16,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    for d in &tracks[0].displacements {
        assert_eq!(d.dx, 0.0);
        assert_eq!(d.dy, 0.0);
    }
}

#[test]
fn test_reference_patch_retained_per_template() {
    let frames = gray_frames(&moving_square_sequence(64, 64, 3, 12, 12, 12, 1, 0));
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(12, 12), TemplatePoint::new(40, 40)],
        template_size: 12,
        search_window_size: 32,
    };

    let tracks = track_templates(&frames, &config).unwrap();
    assert_eq!(tracks.len(), 2);
    for (track, pt) in tracks.iter().zip(&config.template_points) {
        assert_eq!(track.patch.height(), 12);
        assert_eq!(track.patch.width(), 12);
        // Patch content is the frame-0 region at the template origin.
        let expected = frames[0].data[[pt.y as usize, pt.x as usize]];
        assert_eq!(track.patch.data[[0, 0]], expected);
    }
}

#[test]
fn test_validation_rejects_out_of_bounds_template() {
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(58, 10)],
        template_size: 12,
        search_window_size: 32,
    };
    let err = validate_templates(64, 64, &config).unwrap_err();
    assert!(matches!(err, ParallaxError::TemplateOutOfBounds { .. }));
}

#[test]
fn test_validation_rejects_empty_template_list() {
    let config = ProcessConfig {
        template_points: vec![],
        template_size: 12,
        search_window_size: 32,
    };
    let err = validate_templates(64, 64, &config).unwrap_err();
    assert!(matches!(err, ParallaxError::NoTemplates));
}

#[test]
fn test_validation_rejects_window_smaller_than_template() {
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(10, 10)],
        template_size: 16,
        search_window_size: 12,
    };
    let err = validate_templates(64, 64, &config).unwrap_err();
    assert!(matches!(err, ParallaxError::SearchWindowTooSmall { .. }));
}

#[test]
fn test_all_or_nothing_validation() {
    // One valid and one invalid template: nothing is tracked.
    let frames: Vec<Frame> = (0..2).map(|_| Frame::new(pattern_array(48, 48))).collect();
    let config = ProcessConfig {
        template_points: vec![TemplatePoint::new(10, 10), TemplatePoint::new(45, 45)],
        template_size: 10,
        search_window_size: 20,
    };
    assert!(track_templates(&frames, &config).is_err());
}
