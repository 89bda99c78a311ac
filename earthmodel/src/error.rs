use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("column lengths differ: {0} depths but {1} values")]
    LengthMismatch(usize, usize),

    #[error("need at least two distinct samples, got {0}")]
    TooFewSamples(usize),

    #[error("unknown interpolation kind '{0}'")]
    UnknownKind(String),

    #[error("attribute has {got} samples, grid expects {expected}")]
    Shape { expected: usize, got: usize },

    #[error("{0} axis must be strictly monotonic")]
    Axis(&'static str),

    #[error("no attribute at index {0}")]
    UnknownAttribute(usize),

    #[error("invalid sample file len {0} for {1}")]
    SampleLen(u64, PathBuf),

    #[error("point cloud has no points")]
    EmptyCloud,
}
