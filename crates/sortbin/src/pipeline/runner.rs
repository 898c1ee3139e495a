use std::cmp::Ordering;
use std::sync::Arc;

use image::RgbImage;
use tracing::{debug, info, info_span};

use crate::annotate;
use crate::categorizer::{CategoryRegistry, EnrichedDetection, Enricher};
use crate::codec;
use crate::config::Config;
use crate::detection::Detector;
use crate::stats;

use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::PipelineError;
use super::progress::{NoopProgress, PipelinePhase, ProgressEvent, ProgressReporter};
use super::result::{AnnotatedClassification, ClassificationResult};

/// Detect, enrich, sort and summarize a single image.
///
/// Shared across batch workers; every method takes `&self`.
pub struct ClassificationPipeline {
    config: Arc<PipelineConfig>,
    detector: Arc<dyn Detector>,
    enricher: Enricher,
}

impl ClassificationPipeline {
    pub fn new(
        config: Arc<PipelineConfig>,
        detector: Arc<dyn Detector>,
        registry: Arc<CategoryRegistry>,
    ) -> Self {
        Self {
            config,
            detector,
            enricher: Enricher::new(registry),
        }
    }

    /// Production constructor: registry and tuning come from the loaded config.
    pub fn from_config(config: &Config, detector: Arc<dyn Detector>) -> Self {
        let registry = CategoryRegistry::from_materials(config.materials.iter().cloned());
        Self::new(
            Arc::new(PipelineConfig::from_config(config)),
            detector,
            Arc::new(registry),
        )
    }

    pub fn detector(&self) -> &dyn Detector {
        self.detector.as_ref()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.enricher.registry()
    }

    pub fn classify(&self, image: &RgbImage) -> Result<ClassificationResult, PipelineError> {
        self.classify_with_progress(image, &NoopProgress)
    }

    pub fn classify_with_progress(
        &self,
        image: &RgbImage,
        progress: &dyn ProgressReporter,
    ) -> Result<ClassificationResult, PipelineError> {
        let _pipeline_span = info_span!(
            "classify",
            detector = self.detector.name(),
            width = image.width(),
            height = image.height(),
        )
        .entered();

        let mut ctx = PipelineContext::new(image.width(), image.height());

        // Step 1: Detect
        {
            let _step = info_span!("detect").entered();
            progress.report(ProgressEvent::Phase {
                phase: PipelinePhase::Detecting,
                message: "Running object detection...".to_string(),
            });
            if let Err(e) = self.step_detect(&mut ctx, image) {
                progress.report(ProgressEvent::Failed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        }

        // Step 2+3: Enrich and order by confidence
        {
            let _step = info_span!("enrich").entered();
            progress.report(ProgressEvent::Phase {
                phase: PipelinePhase::Enriching,
                message: "Attaching waste categories...".to_string(),
            });
            self.step_enrich(&mut ctx);
            step_sort(&mut ctx);
            ctx.processing_time_seconds = ctx.started.elapsed().as_secs_f64();
        }

        // Step 4: Aggregate
        {
            let _step = info_span!("aggregate").entered();
            progress.report(ProgressEvent::Phase {
                phase: PipelinePhase::Aggregating,
                message: "Computing statistics...".to_string(),
            });
            self.step_aggregate(&mut ctx);
        }

        let total_objects = ctx.detections.len();
        info!(
            total_objects,
            processing_time_seconds = ctx.processing_time_seconds,
            "Classification complete"
        );
        progress.report(ProgressEvent::Completed {
            total_objects,
            processing_time_seconds: ctx.processing_time_seconds,
        });

        Ok(ClassificationResult {
            detections: ctx.detections,
            total_objects,
            processing_time_seconds: ctx.processing_time_seconds,
            image_size: ctx.image_size,
            waste_statistics: ctx.statistics,
            recommendations: ctx.recommendations,
        })
    }

    /// Classifies and renders the detections onto a copy of `image`.
    pub fn classify_and_annotate(
        &self,
        image: &RgbImage,
    ) -> Result<(RgbImage, ClassificationResult), PipelineError> {
        self.classify_and_annotate_with_progress(image, &NoopProgress)
    }

    pub fn classify_and_annotate_with_progress(
        &self,
        image: &RgbImage,
        progress: &dyn ProgressReporter,
    ) -> Result<(RgbImage, ClassificationResult), PipelineError> {
        let result = self.classify_with_progress(image, progress)?;

        let _step = info_span!("annotate", detections = result.detections.len()).entered();
        progress.report(ProgressEvent::Phase {
            phase: PipelinePhase::Annotating,
            message: "Drawing detections...".to_string(),
        });
        let annotated = annotate::annotate_with_style(
            image,
            &result.detections,
            &self.config.annotation_style,
        );

        Ok((annotated, result))
    }

    /// Decodes upload bytes, then classifies.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<ClassificationResult, PipelineError> {
        self.classify_bytes_with_progress(bytes, &NoopProgress)
    }

    pub fn classify_bytes_with_progress(
        &self,
        bytes: &[u8],
        progress: &dyn ProgressReporter,
    ) -> Result<ClassificationResult, PipelineError> {
        let image = decode_step(bytes, progress)?;
        self.classify_with_progress(&image, progress)
    }

    /// Decodes, classifies, annotates and encodes the result as JPEG.
    pub fn classify_and_annotate_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<AnnotatedClassification, PipelineError> {
        self.classify_and_annotate_bytes_with_progress(bytes, &NoopProgress)
    }

    pub fn classify_and_annotate_bytes_with_progress(
        &self,
        bytes: &[u8],
        progress: &dyn ProgressReporter,
    ) -> Result<AnnotatedClassification, PipelineError> {
        let image = decode_step(bytes, progress)?;
        let (annotated, result) = self.classify_and_annotate_with_progress(&image, progress)?;

        let jpeg = {
            let _step = info_span!("encode").entered();
            progress.report(ProgressEvent::Phase {
                phase: PipelinePhase::Encoding,
                message: "Encoding annotated image...".to_string(),
            });
            codec::encode_jpeg(&annotated, self.config.jpeg_quality).map_err(|e| {
                progress.report(ProgressEvent::Failed {
                    error: e.to_string(),
                });
                PipelineError::Encode(e)
            })?
        };

        Ok(AnnotatedClassification {
            image: annotated,
            jpeg,
            result,
        })
    }

    fn step_detect(&self, ctx: &mut PipelineContext, image: &RgbImage) -> Result<(), PipelineError> {
        ctx.raw_detections = self.detector.detect(image)?;
        debug!(count = ctx.raw_detections.len(), "Detector returned");
        Ok(())
    }

    fn step_enrich(&self, ctx: &mut PipelineContext) {
        let raws = std::mem::take(&mut ctx.raw_detections);
        ctx.detections = self.enricher.enrich_all(raws);
    }

    fn step_aggregate(&self, ctx: &mut PipelineContext) {
        ctx.statistics = stats::aggregate(&ctx.detections);
        ctx.recommendations = self.config.recommendation_rules.recommend(&ctx.detections);
    }
}

fn decode_step(bytes: &[u8], progress: &dyn ProgressReporter) -> Result<RgbImage, PipelineError> {
    let _step = info_span!("decode", bytes = bytes.len()).entered();
    progress.report(ProgressEvent::Phase {
        phase: PipelinePhase::Decoding,
        message: "Decoding image...".to_string(),
    });
    codec::decode_image(bytes).map_err(|e| {
        progress.report(ProgressEvent::Failed {
            error: e.to_string(),
        });
        PipelineError::Decode(e)
    })
}

/// Stable, confidence-descending. NaN confidences go last.
fn step_sort(ctx: &mut PipelineContext) {
    ctx.detections.sort_by(compare_confidence_desc);
}

fn compare_confidence_desc(a: &EnrichedDetection, b: &EnrichedDetection) -> Ordering {
    match (a.confidence.is_nan(), b.confidence.is_nan()) {
        // `partial_cmp` keeps -0.0 and 0.0 equal so ties stay in detector order.
        (false, false) => b
            .confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}
