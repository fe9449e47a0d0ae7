#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssd_decode::{DecodeConfig, Decoder, FrameView};

fn make_tensor(batch: usize, n_boxes: usize, n_classes: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut data = Vec::with_capacity(batch * n_boxes * (n_classes + 12));
    for _ in 0..batch * n_boxes {
        for _ in 0..n_classes {
            // Coarse scores produce many ties across classes and anchors.
            data.push((rng.random_range(0u32..20) as f32) / 20.0);
        }
        for _ in 0..4 {
            data.push(rng.random_range(-1.0f32..1.0));
        }
        data.push(rng.random_range(0.0f32..1.0));
        data.push(rng.random_range(0.0f32..1.0));
        data.push(rng.random_range(0.05f32..0.3));
        data.push(rng.random_range(0.05f32..0.3));
        data.extend_from_slice(&[0.1, 0.1, 0.2, 0.2]);
    }
    data
}

#[test]
fn parallel_matches_sequential_bit_for_bit() {
    let (batch, n_boxes, n_classes) = (6, 300, 8);
    let data = make_tensor(batch, n_boxes, n_classes);
    let shape = [batch, n_boxes, n_classes + 12];

    let base_cfg = DecodeConfig {
        n_classes,
        confidence_thresh: 0.1,
        iou_threshold: 0.45,
        top_k: 50,
        nms_max_output_size: 20,
        normalize_coords: true,
        img_height: Some(300.0),
        img_width: Some(300.0),
        ..DecodeConfig::default()
    };
    let seq = Decoder::new(DecodeConfig {
        parallel: false,
        ..base_cfg.clone()
    })
    .unwrap();
    let par = Decoder::new(DecodeConfig {
        parallel: true,
        ..base_cfg
    })
    .unwrap();

    let seq_out = seq.decode_slice(&data, &shape).unwrap();
    let par_out = par.decode_slice(&data, &shape).unwrap();
    assert_eq!(seq_out.shape(), par_out.shape());

    let seq_bits: Vec<u32> = seq_out.to_vec().iter().map(|v| v.to_bits()).collect();
    let par_bits: Vec<u32> = par_out.to_vec().iter().map(|v| v.to_bits()).collect();
    assert_eq!(seq_bits, par_bits);

    let record_len = n_classes + 12;
    let frame_len = n_boxes * record_len;
    let frame = FrameView::from_slice(&data[frame_len..2 * frame_len], record_len).unwrap();
    assert_eq!(
        par.decode_frame(frame).unwrap(),
        seq.decode_frame(frame).unwrap()
    );
}
