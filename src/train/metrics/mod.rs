//! Thresholded binary classification metrics
//!
//! Raw probabilities become class 1 only when strictly above the decision
//! threshold. Scores are computed from a [`ConfusionMatrix`].

mod classification;
mod confusion;


pub use classification::{f1_score, threshold_predictions};
pub use confusion::ConfusionMatrix;
