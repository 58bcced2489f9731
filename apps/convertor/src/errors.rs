use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Pipeline stage a file was in when its run aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    ModelCall,
    Sanitize,
    Normalize,
    Render,
    Convert,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::ModelCall => "model-call",
            Stage::Sanitize => "sanitize",
            Stage::Normalize => "normalize",
            Stage::Render => "render",
            Stage::Convert => "convert",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Per-file conversion error.
/// Every variant is fatal for the file being converted and never for the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {path}: {message}")]
    ExtractionIo { path: PathBuf, message: String },

    #[error("Model call failed: {0}")]
    ModelCall(LlmError),

    #[error("Model response contained no completion content")]
    MissingContent,

    #[error("Model output is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Template rendering failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Document conversion failed: {0}")]
    Convert(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn stage(&self) -> Stage {
        match self {
            ConvertError::UnsupportedFormat(_) | ConvertError::ExtractionIo { .. } => {
                Stage::Extract
            }
            ConvertError::ModelCall(_) | ConvertError::MissingContent => Stage::ModelCall,
            ConvertError::MalformedJson(_) => Stage::Normalize,
            ConvertError::Render(_) => Stage::Render,
            ConvertError::Convert(_) => Stage::Convert,
            ConvertError::Write { .. } => Stage::Write,
        }
    }
}

impl From<LlmError> for ConvertError {
    fn from(err: LlmError) -> Self {
        match err {
            // A well-formed HTTP exchange that carried no usable completion.
            LlmError::EmptyContent | LlmError::Parse(_) => ConvertError::MissingContent,
            other => ConvertError::ModelCall(other),
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::MalformedJson(err.to_string())
    }
}
