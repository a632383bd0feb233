//! Epoch-level accumulation and finalization

use super::core::{EpochRunner, JointModel, Mode};
use super::result::EpochSummary;
use super::step::{StepOutcome, StepRecord};
use crate::autograd::NoGradGuard;
use crate::data::Dataset;
use crate::nn::{GraphClassifier, GraphGenerator};
use crate::train::metrics::{threshold_predictions, ConfusionMatrix};
use crate::{Error, Result};
use ndarray::Array1;

/// Running sums, reset for every pass
#[derive(Debug, Default)]
struct EpochAccumulator {
    loss: f64,
    reconstruction: f64,
    kl: f64,
    classification: f64,
    edges: f64,
    y_true: Vec<u8>,
    y_raw: Vec<f32>,
    last_graph: Option<Array1<f32>>,
    skipped: usize,
}

impl EpochAccumulator {
    fn push(&mut self, record: StepRecord) {
        self.loss += f64::from(record.loss);
        self.reconstruction += f64::from(record.reconstruction);
        self.kl += f64::from(record.kl);
        self.classification += f64::from(record.classification);
        self.edges += f64::from(record.edges);
        self.y_true.push(record.label);
        self.y_raw.push(record.prediction);
        self.last_graph = Some(record.graph);
    }

    fn finish(self, mode: Mode, epoch: usize, decision_threshold: f32) -> Result<EpochSummary> {
        let samples = self.y_true.len();
        let Some(last_graph) = self.last_graph else {
            return Err(Error::NonFinite {
                epoch,
                sample: self.skipped,
                what: format!("loss for every {} sample", mode.series()),
            });
        };

        let mean = |sum: f64| (sum / samples as f64) as f32;
        let y_pred = threshold_predictions(&self.y_raw, decision_threshold);
        let confusion = ConfusionMatrix::from_labels(&self.y_true, &y_pred);

        Ok(EpochSummary {
            mode,
            epoch,
            loss: mean(self.loss),
            reconstruction: mean(self.reconstruction),
            kl: mean(self.kl),
            classification: mean(self.classification),
            edges: mean(self.edges),
            score: confusion.f1(),
            confusion: mode.is_eval().then_some(confusion),
            last_graph,
            samples,
            skipped: self.skipped,
        })
    }
}

impl EpochRunner<'_> {
    /// Run one pass over `order`, in that order
    ///
    /// # Errors
    ///
    /// `EmptySubset` when `order` is empty; `NonFinite` under the abort
    /// policy, or when every sample had to be skipped.
    pub fn run<G, C, D>(
        &self,
        mode: Mode,
        epoch: usize,
        model: &mut JointModel<G, C>,
        dataset: &D,
        order: &[usize],
    ) -> Result<EpochSummary>
    where
        G: GraphGenerator,
        C: GraphClassifier,
        D: Dataset + ?Sized,
    {
        if order.is_empty() {
            return Err(Error::EmptySubset(mode.series()));
        }

        let _no_grad = mode.is_eval().then(NoGradGuard::new);
        let mut acc = EpochAccumulator::default();

        for &index in order {
            let sample = dataset.sample(index);
            match self.step(mode, epoch, index, &sample, model)? {
                StepOutcome::Recorded(record) => acc.push(record),
                StepOutcome::Skipped => acc.skipped += 1,
            }
        }

        acc.finish(mode, epoch, self.decision_threshold)
    }
}
