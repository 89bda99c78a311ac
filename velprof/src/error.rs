use earthmodel::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("unknown mode '{0}', expected 'velocity' or 'slowness'")]
    UnknownMode(String),

    #[error("negative velocity {value} at point {index}")]
    NegativeVelocity { index: usize, value: f64 },

    #[error("velocity {value} at point {index} is too small to invert")]
    VanishingVelocity { index: usize, value: f64 },

    #[error("{0} layer bottoms but {1} layer tops")]
    LayerMismatch(usize, usize),

    #[error("no attribute named '{0}'")]
    AttributeName(String),

    #[error("{0}")]
    Model(#[from] ModelError),
}
