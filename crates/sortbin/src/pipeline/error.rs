use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid image: {0}")]
    Decode(#[from] crate::error::CodecError),

    #[error("Detection failed: {0}")]
    Detection(#[from] crate::error::DetectionError),

    #[error("Failed to encode annotated image: {0}")]
    Encode(crate::error::CodecError),
}
