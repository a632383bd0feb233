//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid {name}: 0 (must be > 0)")]
    ZeroDimension { name: &'static str },

    #[error("Invalid {name}: {value} (must be in [0.0, 1.0])")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("Invalid validation fraction: {0} (must be in (0.0, 1.0))")]
    InvalidValFraction(f64),

    #[error("Invalid {model} learning rate: {value} (must be > 0.0)")]
    InvalidLearningRate { model: &'static str, value: f32 },

    #[error("Invalid {model} weight decay: {value} (must be >= 0.0)")]
    InvalidWeightDecay { model: &'static str, value: f32 },

    #[error("Invalid {model} gamma: {value} (must be in (0.0, 1.0])")]
    InvalidGamma { model: &'static str, value: f32 },

    #[error("Invalid {model} milestones: {milestones:?} (must be strictly increasing)")]
    InvalidMilestones {
        model: &'static str,
        milestones: Vec<usize>,
    },

    #[error("Invalid classification weight: {0} (must be finite and >= 0.0)")]
    InvalidClassificationWeight(f32),

    #[error("Invalid graph interval: 0 (must be > 0)")]
    InvalidGraphEvery,
}

impl From<ValidationError> for crate::Error {
    fn from(e: ValidationError) -> Self {
        crate::Error::Config(format!("Invalid config: {e}"))
    }
}
