//! YOLOv8 head decoding and non-maximum suppression.
//!
//! Kept free of any inference runtime so it can be exercised on plain slices.

use std::cmp::Ordering;

use crate::error::DetectionError;

use super::{class_name_for, BoundingBox, RawDetection};

/// Upper bound on detections kept per image after NMS.
pub const MAX_DETECTIONS: usize = 300;

/// Parameters for turning a raw output tensor into detections.
#[derive(Debug, Clone)]
pub struct DecodeParams<'a> {
    pub class_names: &'a [String],
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    /// Model input edge length; boxes are emitted in this space.
    pub input_size: u32,
    /// Source image size the boxes are mapped back to.
    pub source_width: u32,
    pub source_height: u32,
}

/// Decodes a `[1, 4 + nc, N]` (or transposed `[1, N, 4 + nc]`) YOLO output.
///
/// Each candidate takes its best-scoring class; candidates below the
/// confidence threshold are dropped, the rest go through per-class NMS.
pub fn decode_yolo_output(
    data: &[f32],
    shape: &[usize],
    params: &DecodeParams<'_>,
) -> Result<Vec<RawDetection>, DetectionError> {
    let (rows, cols) = match shape {
        [1, a, b] => (*a, *b),
        [a, b] => (*a, *b),
        _ => {
            return Err(DetectionError::InvalidOutput(format!(
                "unexpected output shape {:?}",
                shape
            )))
        }
    };

    if data.len() != rows * cols {
        return Err(DetectionError::InvalidOutput(format!(
            "output holds {} values, shape {:?} needs {}",
            data.len(),
            shape,
            rows * cols
        )));
    }

    let expected_channels = 4 + params.class_names.len();
    // Channels-first is what ultralytics exports; fall back to rows-first.
    let (channels, candidates, channels_first) = if rows == expected_channels {
        (rows, cols, true)
    } else if cols == expected_channels {
        (cols, rows, false)
    } else if rows > 4 && (rows <= cols || cols <= 4) {
        (rows, cols, true)
    } else if cols > 4 {
        (cols, rows, false)
    } else {
        return Err(DetectionError::InvalidOutput(format!(
            "output shape {:?} has no room for box and class channels",
            shape
        )));
    };

    let value = |channel: usize, candidate: usize| -> f32 {
        if channels_first {
            data[channel * candidates + candidate]
        } else {
            data[candidate * channels + channel]
        }
    };

    let scale_x = params.source_width as f32 / params.input_size as f32;
    let scale_y = params.source_height as f32 / params.input_size as f32;
    let max_x = params.source_width as f32;
    let max_y = params.source_height as f32;

    let mut detections = Vec::new();
    for candidate in 0..candidates {
        let mut best_class = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for class in 0..channels - 4 {
            let score = value(4 + class, candidate);
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        if best_score.is_nan() || best_score < params.confidence_threshold {
            continue;
        }

        let bbox = BoundingBox::from_center(
            value(0, candidate) * scale_x,
            value(1, candidate) * scale_y,
            value(2, candidate) * scale_x,
            value(3, candidate) * scale_y,
        );
        let bbox = BoundingBox::new(
            bbox.x1.clamp(0.0, max_x),
            bbox.y1.clamp(0.0, max_y),
            bbox.x2.clamp(0.0, max_x),
            bbox.y2.clamp(0.0, max_y),
        );

        let class_id = best_class as u32;
        detections.push(RawDetection {
            class_id,
            class_name: class_name_for(params.class_names, class_id),
            confidence: best_score.min(1.0),
            bbox,
        });
    }

    Ok(non_max_suppression(detections, params.iou_threshold))
}

/// Greedy per-class NMS. Output is sorted by confidence, descending.
pub fn non_max_suppression(
    mut detections: Vec<RawDetection>,
    iou_threshold: f32,
) -> Vec<RawDetection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut suppressed = vec![false; detections.len()];
    let mut keep = Vec::new();

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..detections.len() {
            if suppressed[j] || detections[j].class_id != detections[i].class_id {
                continue;
            }
            if detections[i].bbox.iou(&detections[j].bbox) > iou_threshold {
                suppressed[j] = true;
            }
        }
        keep.push(i);
        if keep.len() == MAX_DETECTIONS {
            break;
        }
    }

    let mut kept = Vec::with_capacity(keep.len());
    for (index, detection) in detections.into_iter().enumerate() {
        if keep.binary_search(&index).is_ok() {
            kept.push(detection);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["GLASS".to_string(), "PLASTIC".to_string()]
    }

    fn raw(class_id: u32, confidence: f32, bbox: BoundingBox) -> RawDetection {
        RawDetection {
            class_id,
            class_name: format!("class{}", class_id),
            confidence,
            bbox,
        }
    }

    // Channels-first tensor for three candidates and two classes:
    // rows are cx, cy, w, h, score(GLASS), score(PLASTIC).
    fn channels_first_output() -> Vec<f32> {
        vec![
            10.0, 12.0, 50.0, // cx
            10.0, 10.0, 50.0, // cy
            10.0, 10.0, 20.0, // w
            10.0, 10.0, 20.0, // h
            0.9, 0.8, 0.1, // GLASS
            0.1, 0.2, 0.7, // PLASTIC
        ]
    }

    #[test]
    fn test_decode_channels_first_with_nms_and_scaling() {
        let names = names();
        let params = DecodeParams {
            class_names: &names,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 100,
            source_width: 200,
            source_height: 100,
        };

        let detections =
            decode_yolo_output(&channels_first_output(), &[1, 6, 3], &params).unwrap();

        // Candidates 0 and 1 overlap heavily as GLASS; only the stronger survives.
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].class_name, "GLASS");
        assert!((detections[0].confidence - 0.9).abs() < 1e-6);
        assert_eq!(detections[0].bbox, BoundingBox::new(10.0, 5.0, 30.0, 15.0));
        assert_eq!(detections[1].class_name, "PLASTIC");
        assert_eq!(detections[1].class_id, 1);
    }

    #[test]
    fn test_decode_transposed_layout_matches() {
        let names = names();
        let params = DecodeParams {
            class_names: &names,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 100,
            source_width: 100,
            source_height: 100,
        };

        let first = channels_first_output();
        let mut transposed = vec![0.0; first.len()];
        for channel in 0..6 {
            for candidate in 0..3 {
                transposed[candidate * 6 + channel] = first[channel * 3 + candidate];
            }
        }

        let a = decode_yolo_output(&first, &[1, 6, 3], &params).unwrap();
        let b = decode_yolo_output(&transposed, &[1, 3, 6], &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_drops_low_confidence() {
        let names = names();
        let params = DecodeParams {
            class_names: &names,
            confidence_threshold: 0.95,
            iou_threshold: 0.45,
            input_size: 100,
            source_width: 100,
            source_height: 100,
        };

        let detections =
            decode_yolo_output(&channels_first_output(), &[1, 6, 3], &params).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_decode_rejects_mismatched_length() {
        let names = names();
        let params = DecodeParams {
            class_names: &names,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 100,
            source_width: 100,
            source_height: 100,
        };

        let result = decode_yolo_output(&[0.0; 5], &[1, 6, 3], &params);
        assert!(matches!(result, Err(DetectionError::InvalidOutput(_))));
    }

    #[test]
    fn test_decode_names_unknown_classes() {
        let names = vec!["GLASS".to_string()];
        let params = DecodeParams {
            class_names: &names,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 100,
            source_width: 100,
            source_height: 100,
        };

        // Model exports two classes while only one name is configured.
        let detections =
            decode_yolo_output(&channels_first_output(), &[1, 6, 3], &params).unwrap();
        assert!(detections.iter().any(|d| d.class_name == "Unknown_1"));
    }

    #[test]
    fn test_nms_keeps_overlapping_boxes_of_different_classes() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let kept = non_max_suppression(vec![raw(0, 0.6, bbox), raw(1, 0.9, bbox)], 0.45);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].class_id, 1);
    }

    #[test]
    fn test_nms_suppresses_same_class_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(1.0, 1.0, 11.0, 11.0);
        let kept = non_max_suppression(vec![raw(0, 0.6, a), raw(0, 0.9, b)], 0.45);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox, b);
    }
}
