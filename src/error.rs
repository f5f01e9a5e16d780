use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::columnar::ShapeError;

#[derive(Debug, Error, Diagnostic)]
pub enum VibesError {
    #[error("malformed record at {file}:{line}: {message}")]
    #[diagnostic(help("rows must be tab-separated with numeric coordinates, lengths and e-values"))]
    Format {
        file: String,
        line: usize,
        message: String,
    },

    #[error("no sequence-region header lines found in gff file: {0}")]
    #[diagnostic(help("re-run gene annotation with `##sequence-region` headers enabled"))]
    MissingAuthority(PathBuf),

    #[error("no recorded length for sequence {sequence} of genome {genome}")]
    UnknownSequenceLength { genome: String, sequence: String },

    #[error("no recorded length for virus {virus} integrated into genome {genome}")]
    UnknownVirusLength { genome: String, virus: String },

    #[error("{0}")]
    BucketShape(#[from] ShapeError),

    #[error("missing config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to serialize data block: {0}")]
    Serialize(String),

    #[error("template has no {0} placeholder")]
    MissingPlaceholder(String),
}

impl VibesError {
    pub(crate) fn format(file: &str, line: usize, message: impl Into<String>) -> Self {
        VibesError::Format {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
