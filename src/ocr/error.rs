use std::path::PathBuf;
use thiserror::Error;

use super::engine::PassKind;

/// Failures of the extraction pipeline.
///
/// `Recognition` is recoverable: the pipeline skips the failed pass and
/// continues with the remaining variants. Everything else aborts the
/// extraction call with no partial result.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("recognition failed on {variant} pass: {message}")]
    Recognition { variant: PassKind, message: String },
    #[error("all recognition passes failed for {path}")]
    AllVariantsFailed { path: PathBuf },
    #[error("tesseract setup failed: {0}")]
    Setup(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn recognition(variant: PassKind, message: impl Into<String>) -> Self {
        Self::Recognition {
            variant,
            message: message.into(),
        }
    }
}
