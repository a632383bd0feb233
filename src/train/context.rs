//! Per-run state: history, telemetry and the best-model record

use super::history::HistoryWriter;
use super::telemetry::{JsonlTelemetry, NullTelemetry, TelemetrySink, Window};
use super::trainer::{EpochSummary, Mode};
use super::BestModelTracker;
use crate::config::TrainingConfig;
use crate::graph::to_dot;
use crate::nn::Parameterized;
use crate::Result;

/// Everything a run mutates besides the models themselves
///
/// Created when a session starts and closed with [`RunContext::finish`],
/// which flushes the history files and telemetry.
pub struct RunContext {
    history: Option<HistoryWriter>,
    telemetry: Box<dyn TelemetrySink>,
    tracker: BestModelTracker,
    graph_every: usize,
    edge_threshold: f32,
    num_nodes: usize,
}

impl RunContext {
    /// Open history and telemetry outputs named in `config`
    pub fn open(config: &TrainingConfig) -> Result<Self> {
        let history = config
            .history_path
            .as_ref()
            .map(|prefix| HistoryWriter::open(prefix))
            .transpose()?;
        let telemetry: Box<dyn TelemetrySink> = match &config.telemetry_path {
            Some(path) => Box::new(JsonlTelemetry::open(path)?),
            None => Box::new(NullTelemetry),
        };
        Ok(Self {
            history,
            telemetry,
            tracker: BestModelTracker::new(&config.model_dir),
            graph_every: config.graph_every.max(1),
            edge_threshold: config.edge_threshold,
            num_nodes: config.num_nodes,
        })
    }

    /// Replace the telemetry sink
    pub fn with_telemetry(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    pub fn tracker(&self) -> &BestModelTracker {
        &self.tracker
    }

    /// Log, persist and publish one finished pass
    pub fn record(&mut self, summary: &EpochSummary) -> Result<()> {
        tracing::info!(
            epoch = summary.epoch,
            loss = summary.loss,
            reconstruction = summary.reconstruction,
            kl = summary.kl,
            classification = summary.classification,
            f1 = summary.score,
            edges = summary.edges,
            skipped = summary.skipped,
            "{} epoch {}",
            summary.mode,
            summary.epoch
        );

        if let Some(history) = self.history.as_mut() {
            history.record(summary)?;
            if summary.epoch % self.graph_every == 0 {
                let name = format!("{}_{}", summary.mode.series(), summary.epoch);
                let dot = to_dot(&name, &summary.last_graph, self.num_nodes, self.edge_threshold);
                let path = history.write_graph(summary.mode, summary.epoch, &dot)?;
                tracing::debug!(path = %path.display(), "Graph artifact written");
            }
        }

        self.publish(summary);
        Ok(())
    }

    fn publish(&mut self, summary: &EpochSummary) {
        let series = summary.mode.series();
        let points = [
            (Window::Loss, summary.loss),
            (Window::Accuracy, summary.score),
            (Window::Reconstruction, summary.reconstruction),
            (Window::Kl, summary.kl),
            (Window::Classification, summary.classification),
            (Window::NumEdges, summary.edges),
        ];
        for (window, value) in points {
            if let Err(e) = self.telemetry.line(window, series, summary.epoch, value) {
                tracing::warn!(window = window.as_str(), "Telemetry failed: {e}");
            }
        }
        if let Some(confusion) = summary.confusion.as_ref() {
            if let Err(e) = self
                .telemetry
                .heatmap(Window::ConfusionMatrix, summary.epoch, confusion)
            {
                tracing::warn!("Telemetry failed: {e}");
            }
        }
    }

    /// Hand a validation pass to the best-model tracker; returns whether it saved
    pub fn observe_validation<G, C>(
        &mut self,
        summary: &EpochSummary,
        generator: &G,
        classifier: &C,
    ) -> Result<bool>
    where
        G: Parameterized + ?Sized,
        C: Parameterized + ?Sized,
    {
        debug_assert_eq!(summary.mode, Mode::Eval);
        let confusion = summary.confusion.unwrap_or_default();
        self.tracker
            .observe(summary.epoch, summary.score, &confusion, generator, classifier)
    }

    /// Flush every output; the context is consumed
    pub fn finish(mut self) -> Result<BestModelTracker> {
        if let Some(history) = self.history.as_mut() {
            history.flush()?;
        }
        if let Err(e) = self.telemetry.flush() {
            tracing::warn!("Telemetry flush failed: {e}");
        }
        Ok(self.tracker)
    }
}
