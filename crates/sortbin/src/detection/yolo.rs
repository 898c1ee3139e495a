use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::error::DetectionError;

use super::postprocess::{decode_yolo_output, DecodeParams};
use super::{Detector, RawDetection};

/// YOLOv8 detector running an exported ONNX model through tract.
///
/// The optimized plan is immutable once built, so one instance serves every
/// batch worker concurrently.
pub struct YoloDetector {
    model: TypedRunnableModel<TypedModel>,
    class_names: Vec<String>,
    input_size: u32,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl YoloDetector {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        config: &DetectorConfig,
    ) -> Result<Self, DetectionError> {
        let model_path = model_path.as_ref();
        let size = config.image_size as usize;
        let load_err = |e: TractError| DetectionError::ModelLoad {
            path: model_path.to_path_buf(),
            reason: e.to_string(),
        };

        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(load_err)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        info!(
            "Loaded YOLO model {} ({} classes, input {}x{})",
            model_path.display(),
            config.class_names.len(),
            size,
            size
        );

        Ok(Self {
            model,
            class_names: config.class_names.clone(),
            input_size: config.image_size,
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
        })
    }

    /// Load the model named in `config.model_path`.
    pub fn from_config(config: &DetectorConfig) -> Result<Self, DetectionError> {
        let path = config
            .model_path
            .as_deref()
            .ok_or_else(|| DetectionError::ModelLoad {
                path: Default::default(),
                reason: "detector.model_path is not set".to_string(),
            })?;
        Self::new(path, config)
    }

    fn build_input(&self, image: &RgbImage) -> Tensor {
        let size = self.input_size;
        let resized = imageops::resize(image, size, size, FilterType::Triangle);
        let size = size as usize;

        tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
            resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
        })
        .into_tensor()
    }
}

impl Detector for YoloDetector {
    fn name(&self) -> &str {
        "yolo"
    }

    fn class_names(&self) -> Vec<String> {
        self.class_names.clone()
    }

    fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>, DetectionError> {
        let _span = tracing::info_span!("detector.yolo").entered();

        let input = self.build_input(image);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| DetectionError::InvalidOutput("model produced no outputs".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| DetectionError::InvalidOutput(e.to_string()))?;
        let shape = view.shape().to_vec();
        let data: Vec<f32> = view.iter().copied().collect();

        let params = DecodeParams {
            class_names: &self.class_names,
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            input_size: self.input_size,
            source_width: image.width(),
            source_height: image.height(),
        };
        let detections = decode_yolo_output(&data, &shape, &params)?;

        debug!("YOLO produced {} detections", detections.len());
        Ok(detections)
    }
}
