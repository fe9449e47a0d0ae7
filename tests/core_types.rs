use ssd_decode::{
    BoxFormat, DecodeConfig, DecodeError, Decoder, FrameView, TensorView, OUTPUT_ROW_LEN,
};

#[test]
fn tensor_view_rejects_wrong_rank() {
    let data = [0.0f32; 26];
    let err = TensorView::new(&data, &[2, 13]).err().unwrap();
    assert_eq!(
        err,
        DecodeError::RankMismatch {
            expected: 3,
            got: 2,
        }
    );

    let err = TensorView::new(&data, &[1, 1, 2, 13]).err().unwrap();
    assert_eq!(
        err,
        DecodeError::RankMismatch {
            expected: 3,
            got: 4,
        }
    );
}

#[test]
fn tensor_view_rejects_buffer_length_mismatch() {
    let data = [0.0f32; 25];
    let err = TensorView::new(&data, &[1, 2, 13]).err().unwrap();
    assert_eq!(
        err,
        DecodeError::BufferLengthMismatch {
            expected: 26,
            got: 25,
        }
    );
}

#[test]
fn tensor_view_slices_frames_and_records() {
    let data: Vec<f32> = (0..2 * 3 * 13).map(|v| v as f32).collect();
    let view = TensorView::new(&data, &[2, 3, 13]).unwrap();
    assert_eq!(view.shape(), [2, 3, 13]);
    assert_eq!(view.as_slice().len(), data.len());

    let frame = view.frame(1).unwrap();
    assert_eq!(frame.n_boxes(), 3);
    assert_eq!(frame.record(0).unwrap()[0], 39.0);
    assert_eq!(frame.record(2).unwrap()[12], 77.0);
    assert!(frame.record(3).is_none());
    assert!(view.frame(2).is_none());

    let starts: Vec<f32> = view.frames().map(|f| f.record(0).unwrap()[0]).collect();
    assert_eq!(starts, vec![0.0, 39.0]);
}

#[test]
fn empty_batch_and_empty_frames_are_valid_views() {
    let view = TensorView::new(&[], &[0, 10, 13]).unwrap();
    assert_eq!(view.frames().len(), 0);

    let view = TensorView::new(&[], &[2, 0, 13]).unwrap();
    assert_eq!(view.frames().len(), 2);
    assert_eq!(view.frame(0).unwrap().n_boxes(), 0);
}

#[test]
fn frame_view_rejects_partial_records() {
    let data = [0.0f32; 20];
    assert!(FrameView::from_slice(&data, 13).is_err());
    assert!(FrameView::from_slice(&data, 0).is_err());
}

#[test]
fn config_rejects_non_centroid_formats() {
    for (coords, name) in [(BoxFormat::Corners, "corners"), (BoxFormat::MinMax, "minmax")] {
        let cfg = DecodeConfig {
            coords,
            ..DecodeConfig::default()
        };
        let err = Decoder::new(cfg).err().unwrap();
        assert_eq!(err, DecodeError::UnsupportedFormat { format: name });
        assert!(err.is_configuration());
    }
}

#[test]
fn config_requires_image_size_when_normalizing() {
    let cfg = DecodeConfig {
        normalize_coords: true,
        img_width: Some(300.0),
        ..DecodeConfig::default()
    };
    let err = Decoder::new(cfg).err().unwrap();
    assert_eq!(
        err,
        DecodeError::MissingImageSize {
            img_height: None,
            img_width: Some(300.0),
        }
    );

    let cfg = DecodeConfig {
        normalize_coords: true,
        img_height: Some(0.0),
        img_width: Some(300.0),
        ..DecodeConfig::default()
    };
    assert!(matches!(
        Decoder::new(cfg),
        Err(DecodeError::OutOfRange {
            option: "img_height",
            ..
        })
    ));
}

#[test]
fn config_ignores_image_size_without_normalization() {
    let cfg = DecodeConfig {
        normalize_coords: false,
        img_height: None,
        img_width: Some(-1.0),
        ..DecodeConfig::default()
    };
    assert!(Decoder::new(cfg).is_ok());
}

#[test]
fn config_rejects_out_of_range_numbers() {
    let cases = [
        (
            DecodeConfig {
                confidence_thresh: 1.0,
                ..DecodeConfig::default()
            },
            "confidence_thresh",
        ),
        (
            DecodeConfig {
                confidence_thresh: -0.1,
                ..DecodeConfig::default()
            },
            "confidence_thresh",
        ),
        (
            DecodeConfig {
                iou_threshold: 1.5,
                ..DecodeConfig::default()
            },
            "iou_threshold",
        ),
        (
            DecodeConfig {
                top_k: 0,
                ..DecodeConfig::default()
            },
            "top_k",
        ),
        (
            DecodeConfig {
                nms_max_output_size: 0,
                ..DecodeConfig::default()
            },
            "nms_max_output_size",
        ),
        (
            DecodeConfig {
                n_classes: 0,
                ..DecodeConfig::default()
            },
            "n_classes",
        ),
    ];
    for (cfg, expected_option) in cases {
        match Decoder::new(cfg) {
            Err(DecodeError::OutOfRange { option, .. }) => assert_eq!(option, expected_option),
            other => panic!("expected OutOfRange for {expected_option}, got {other:?}"),
        }
    }
}

#[test]
fn config_accepts_domain_edges() {
    let cfg = DecodeConfig {
        confidence_thresh: 0.0,
        iou_threshold: 1.0,
        top_k: 1,
        nms_max_output_size: 1,
        n_classes: 1,
        ..DecodeConfig::default()
    };
    assert!(Decoder::new(cfg).is_ok());

    let cfg = DecodeConfig {
        iou_threshold: 0.0,
        ..DecodeConfig::default()
    };
    assert!(Decoder::new(cfg).is_ok());
}

#[test]
fn decoder_reports_shapes() {
    let decoder = Decoder::new(DecodeConfig {
        n_classes: 4,
        top_k: 7,
        ..DecodeConfig::default()
    })
    .unwrap();
    assert_eq!(decoder.record_len(), 16);
    assert_eq!(decoder.output_shape(3), [3, 7, OUTPUT_ROW_LEN]);
    assert_eq!(decoder.config().top_k, 7);
}

#[test]
fn decoder_rejects_mismatched_record_length_before_decoding() {
    let decoder = Decoder::new(DecodeConfig {
        n_classes: 3,
        ..DecodeConfig::default()
    })
    .unwrap();

    let data = vec![0.0f32; 2 * 4 * 16];
    let err = decoder.decode_slice(&data, &[2, 4, 16]).err().unwrap();
    assert_eq!(
        err,
        DecodeError::ShapeMismatch {
            expected: 15,
            got: 16,
        }
    );
    assert!(!err.is_configuration());

    let view = TensorView::new(&data, &[2, 4, 16]).unwrap();
    assert!(matches!(
        decoder.decode(view),
        Err(DecodeError::ShapeMismatch { .. })
    ));

    let err = decoder.decode_slice(&data, &[8, 16]).err().unwrap();
    assert_eq!(
        err,
        DecodeError::RankMismatch {
            expected: 3,
            got: 2,
        }
    );

    let frame = FrameView::from_slice(&data[..32], 16).unwrap();
    assert!(matches!(
        decoder.decode_frame(frame),
        Err(DecodeError::ShapeMismatch { .. })
    ));
}

#[test]
fn errors_render_readable_messages() {
    let err = DecodeError::ShapeMismatch {
        expected: 33,
        got: 32,
    };
    assert_eq!(
        err.to_string(),
        "record length mismatch: expected 33 values per box, got 32"
    );
    let err = DecodeError::UnsupportedFormat { format: "corners" };
    assert!(err.to_string().contains("centroids"));
}
