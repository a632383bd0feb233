//! Per-sample pipeline

use super::core::{EpochRunner, JointModel, Mode};
use crate::autograd::backward;
use crate::config::NonFinitePolicy;
use crate::data::Sample;
use crate::graph::structural_edge_count;
use crate::nn::{GraphClassifier, GraphGenerator};
use crate::train::loss::LossInputs;
use crate::{Error, Result, Tensor};
use ndarray::Array1;

/// Everything one processed sample contributes to the epoch
#[derive(Debug, Clone)]
pub(crate) struct StepRecord {
    pub loss: f32,
    pub reconstruction: f32,
    pub kl: f32,
    pub classification: f32,
    pub edges: f32,
    pub prediction: f32,
    pub label: u8,
    pub graph: Array1<f32>,
}

#[derive(Debug)]
pub(crate) enum StepOutcome {
    Recorded(StepRecord),
    Skipped,
}

impl EpochRunner<'_> {
    /// Run one sample through the pipeline, updating both models in TRAIN mode
    pub(crate) fn step<G: GraphGenerator, C: GraphClassifier>(
        &self,
        mode: Mode,
        epoch: usize,
        index: usize,
        sample: &Sample,
        model: &mut JointModel<G, C>,
    ) -> Result<StepOutcome> {
        let n = model.generator.num_nodes();
        if self.base.num_nodes() != n {
            return Err(Error::Shape(format!(
                "base graph has {} nodes, generator expects {n}",
                self.base.num_nodes()
            )));
        }

        let generated = model
            .generator
            .forward(self.base.laplacian(), &sample.features, mode.is_eval());
        let prediction = model.classifier.forward(&generated.graph, &sample.features);
        let label = Tensor::constant(Array1::from(vec![f32::from(sample.label)]));

        let mut breakdown = self.loss.compute(&LossInputs {
            generated_graph: &generated.graph,
            target_graph: self.base.adjacency(),
            prediction: &prediction,
            label: &label,
            latent_mean: &generated.latent_mean,
            latent_log_std: &generated.latent_log_std,
            num_nodes: n,
            latent_dim: model.generator.latent_dim(),
        });

        if let Some(what) = breakdown.first_non_finite() {
            return self.on_non_finite(epoch, index, what);
        }

        if mode == Mode::Train {
            model.generator_optimizer.zero_gradients(&mut model.generator);
            model.classifier_optimizer.zero_gradients(&mut model.classifier);
            backward(&mut breakdown.total, None);

            if !model.generator.gradients_finite() {
                return self.on_non_finite(epoch, index, "generator gradient");
            }
            if !model.classifier.gradients_finite() {
                return self.on_non_finite(epoch, index, "classifier gradient");
            }

            model.generator_optimizer.step(&mut model.generator);
            model.classifier_optimizer.step(&mut model.classifier);
        }

        let graph = generated.graph.data().clone();
        let edges = structural_edge_count(&graph, n, self.edge_threshold);
        let record = StepRecord {
            loss: breakdown.total.item(),
            reconstruction: breakdown.reconstruction,
            kl: breakdown.kl,
            classification: breakdown.classification,
            edges,
            prediction: prediction.item(),
            label: sample.label,
            graph,
        };

        tracing::debug!(
            mode = mode.series(),
            epoch,
            sample = index,
            loss = record.loss,
            prediction = record.prediction,
            label = record.label,
            edges = record.edges,
            "sample processed"
        );

        Ok(StepOutcome::Recorded(record))
    }

    fn on_non_finite(&self, epoch: usize, sample: usize, what: &str) -> Result<StepOutcome> {
        match self.non_finite {
            NonFinitePolicy::Abort => Err(Error::NonFinite {
                epoch,
                sample,
                what: what.to_string(),
            }),
            NonFinitePolicy::Skip => {
                tracing::warn!(epoch, sample, "Non-finite {what}, skipping sample");
                Ok(StepOutcome::Skipped)
            }
        }
    }
}
