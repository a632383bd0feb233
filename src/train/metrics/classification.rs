//! Thresholded F1

use super::ConfusionMatrix;

/// Class 1 where the raw prediction is strictly above `threshold`
pub fn threshold_predictions(raw: &[f32], threshold: f32) -> Vec<u8> {
    raw.iter().map(|&p| u8::from(p > threshold)).collect()
}

/// F1 of the positive class after thresholding raw predictions
///
/// # Example
///
/// ```
/// use ecg_gvae::train::f1_score;
///
/// let f1 = f1_score(&[0, 1, 0, 1], &[0.1, 0.9, 0.4, 0.6], 0.55);
/// assert_eq!(f1, 1.0);
/// ```
pub fn f1_score(y_true: &[u8], y_pred_raw: &[f32], threshold: f32) -> f32 {
    let y_pred = threshold_predictions(y_pred_raw, threshold);
    ConfusionMatrix::from_labels(y_true, &y_pred).f1()
}
