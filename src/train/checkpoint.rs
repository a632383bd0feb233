//! Best-model tracking

use crate::io::{save_snapshot, write_atomic, ModelSnapshot};
use crate::nn::Parameterized;
use crate::train::metrics::ConfusionMatrix;
use crate::Result;
use std::path::{Path, PathBuf};

/// Persists both models and the confusion matrix whenever the validation
/// score strictly improves
///
/// The running best starts below every valid score, so the first validation
/// pass always saves. Ties never save.
#[derive(Debug, Clone)]
pub struct BestModelTracker {
    model_dir: PathBuf,
    best_score: f32,
    best_epoch: Option<usize>,
    saves: usize,
}

impl BestModelTracker {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            best_score: f32::NEG_INFINITY,
            best_epoch: None,
            saves: 0,
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn generator_path(&self) -> PathBuf {
        self.model_dir.join("generator_model.json")
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir.join("classifier_model.json")
    }

    pub fn confusion_path(&self) -> PathBuf {
        self.model_dir.join("confusion_matrix.csv")
    }

    /// Best score so far, `None` before the first save
    pub fn best_score(&self) -> Option<f32> {
        self.best_epoch.map(|_| self.best_score)
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    /// Number of times the models were written
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn is_improvement(&self, score: f32) -> bool {
        score > self.best_score
    }

    /// Compare `score` to the best so far and save on strict improvement
    ///
    /// Returns whether a save happened. The best score only moves once every
    /// file has been written.
    pub fn observe<G, C>(
        &mut self,
        epoch: usize,
        score: f32,
        confusion: &ConfusionMatrix,
        generator: &G,
        classifier: &C,
    ) -> Result<bool>
    where
        G: Parameterized + ?Sized,
        C: Parameterized + ?Sized,
    {
        if !self.is_improvement(score) {
            return Ok(false);
        }

        let generator_snapshot =
            ModelSnapshot::capture("generator", "vgae", generator, epoch, score);
        let classifier_snapshot =
            ModelSnapshot::capture("classifier", "graph-classifier", classifier, epoch, score);
        save_snapshot(&generator_snapshot, self.generator_path())?;
        save_snapshot(&classifier_snapshot, self.classifier_path())?;
        write_atomic(self.confusion_path(), confusion.to_csv().as_bytes())?;

        tracing::info!(
            epoch,
            score,
            previous = self.best_score,
            dir = %self.model_dir.display(),
            "Validation score improved, models saved"
        );
        self.best_score = score;
        self.best_epoch = Some(epoch);
        self.saves += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_snapshot;
    use crate::nn::{BinaryGraphClassifier, ClassifierConfig, GeneratorConfig, VariationalGraphAutoEncoder};
    use std::fs;
    use tempfile::tempdir;

    fn models() -> (VariationalGraphAutoEncoder, BinaryGraphClassifier) {
        (
            VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 1),
            BinaryGraphClassifier::new(ClassifierConfig::default(), 2),
        )
    }

    #[test]
    fn test_saves_only_on_strict_improvement() {
        let dir = tempdir().unwrap();
        let (gen, cls) = models();
        let mut tracker = BestModelTracker::new(dir.path());
        let cm = ConfusionMatrix::default();

        let saved: Vec<bool> = [0.5, 0.6, 0.55, 0.7]
            .iter()
            .enumerate()
            .map(|(epoch, &score)| tracker.observe(epoch, score, &cm, &gen, &cls).unwrap())
            .collect();

        assert_eq!(saved, vec![true, true, false, true]);
        assert_eq!(tracker.saves(), 3);
        assert_eq!(tracker.best_score(), Some(0.7));
        assert_eq!(tracker.best_epoch(), Some(3));
    }

    #[test]
    fn test_equal_score_does_not_save() {
        let dir = tempdir().unwrap();
        let (gen, cls) = models();
        let mut tracker = BestModelTracker::new(dir.path());
        let cm = ConfusionMatrix::default();
        assert!(tracker.observe(0, 0.4, &cm, &gen, &cls).unwrap());
        assert!(!tracker.observe(1, 0.4, &cm, &gen, &cls).unwrap());
    }

    #[test]
    fn test_first_zero_score_saves() {
        let dir = tempdir().unwrap();
        let (gen, cls) = models();
        let mut tracker = BestModelTracker::new(dir.path());
        assert_eq!(tracker.best_score(), None);
        assert!(tracker.observe(0, 0.0, &ConfusionMatrix::default(), &gen, &cls).unwrap());
    }

    #[test]
    fn test_nan_score_never_saves() {
        let dir = tempdir().unwrap();
        let (gen, cls) = models();
        let mut tracker = BestModelTracker::new(dir.path());
        assert!(!tracker.observe(0, f32::NAN, &ConfusionMatrix::default(), &gen, &cls).unwrap());
        assert!(!tracker.generator_path().exists());
    }

    #[test]
    fn test_written_artifacts() {
        let dir = tempdir().unwrap();
        let (gen, cls) = models();
        let mut tracker = BestModelTracker::new(dir.path().join("models"));
        let cm = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 1, 0]);
        tracker.observe(7, 0.66, &cm, &gen, &cls).unwrap();

        assert_eq!(fs::read_to_string(tracker.confusion_path()).unwrap(), "1,0\n1,1\n");
        let snap = load_snapshot(tracker.generator_path()).unwrap();
        assert_eq!(snap.metadata.epoch, 7);
        assert_eq!(snap.num_values(), gen.num_parameters());
        let snap = load_snapshot(tracker.classifier_path()).unwrap();
        assert_eq!(snap.metadata.name, "classifier");
    }
}
