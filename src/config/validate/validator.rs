//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::{OptimizerConfig, TrainingConfig};

/// Validate a training configuration
///
/// Checks:
/// - Counts and layer sizes are non-zero
/// - Thresholds and fractions are in range
/// - Optimizer settings are usable
pub fn validate_config(config: &TrainingConfig) -> Result<(), ValidationError> {
    if config.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(config.epochs));
    }

    for (name, value) in [
        ("num_nodes", config.num_nodes),
        ("feature_dim", config.feature_dim),
        ("hidden_dim_1", config.hidden_dim_1),
        ("hidden_dim_2", config.hidden_dim_2),
    ] {
        if value == 0 {
            return Err(ValidationError::ZeroDimension { name });
        }
    }

    for (name, value) in [
        ("decision_threshold", config.decision_threshold),
        ("edge_threshold", config.edge_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidThreshold { name, value });
        }
    }

    if !(config.val_fraction > 0.0 && config.val_fraction < 1.0) {
        return Err(ValidationError::InvalidValFraction(config.val_fraction));
    }

    validate_optimizer("generator", &config.generator)?;
    validate_optimizer("classifier", &config.classifier)?;

    if !config.classification_weight.is_finite() || config.classification_weight < 0.0 {
        return Err(ValidationError::InvalidClassificationWeight(
            config.classification_weight,
        ));
    }

    if config.graph_every == 0 {
        return Err(ValidationError::InvalidGraphEvery);
    }

    Ok(())
}

fn validate_optimizer(model: &'static str, opt: &OptimizerConfig) -> Result<(), ValidationError> {
    if !(opt.lr > 0.0 && opt.lr.is_finite()) {
        return Err(ValidationError::InvalidLearningRate { model, value: opt.lr });
    }
    if !(opt.weight_decay >= 0.0 && opt.weight_decay.is_finite()) {
        return Err(ValidationError::InvalidWeightDecay {
            model,
            value: opt.weight_decay,
        });
    }
    if !(opt.gamma > 0.0 && opt.gamma <= 1.0) {
        return Err(ValidationError::InvalidGamma { model, value: opt.gamma });
    }
    if opt.milestones.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ValidationError::InvalidMilestones {
            model,
            milestones: opt.milestones.clone(),
        });
    }
    Ok(())
}
