use crate::annotate::AnnotationStyle;
use crate::codec::DEFAULT_JPEG_QUALITY;
use crate::config::Config;
use crate::stats::RecommendationRules;

pub struct PipelineConfig {
    pub recommendation_rules: RecommendationRules,
    pub annotation_style: AnnotationStyle,
    pub jpeg_quality: u8,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recommendation_rules: config.recommendations.clone(),
            annotation_style: config.annotation.clone(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
