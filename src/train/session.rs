//! Run orchestration

use super::context::RunContext;
use super::trainer::{EpochRunner, EpochSummary, JointModel, Mode, TrainReport};
use crate::config::{validate_config, OptimizerConfig, TrainingConfig};
use crate::data::{stratified_split, ClassCounts, Dataset, EcgDataset, SubsetSampler};
use crate::graph::BaseGraph;
use crate::nn::{BinaryGraphClassifier, Parameterized, VariationalGraphAutoEncoder};
use crate::optim::{Adam, ModelOptimizer, MultiStepLR};
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

/// Build one model's optimizer from its config block
pub fn build_optimizer(config: &OptimizerConfig) -> ModelOptimizer {
    let adam = Adam::default_params(config.lr).with_weight_decay(config.weight_decay);
    let optimizer = ModelOptimizer::new(Box::new(adam));
    if config.milestones.is_empty() {
        optimizer
    } else {
        optimizer.with_scheduler(MultiStepLR::new(
            config.lr,
            config.milestones.clone(),
            config.gamma,
        ))
    }
}

/// Independent RNG seeds derived from the run seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSeeds {
    /// Generator weights and latent noise
    pub generator: u64,
    pub classifier: u64,
    /// Per-epoch train/validation order
    pub shuffle: u64,
}

impl RunSeeds {
    pub(crate) fn from_seed(seed: u64) -> Self {
        Self {
            generator: seed,
            classifier: seed.wrapping_add(1),
            shuffle: seed.wrapping_add(2),
        }
    }
}

/// A complete training run over one dataset
///
/// # Example
///
/// ```no_run
/// use ecg_gvae::config::TrainingConfig;
/// use ecg_gvae::train::Session;
///
/// let config = TrainingConfig { epochs: 100, ..TrainingConfig::default() };
/// let report = Session::new(config, "data.csv", "labels.csv").run()?;
/// println!("best F1 {:?} at epoch {:?}", report.best_score, report.best_epoch);
/// # Ok::<(), ecg_gvae::Error>(())
/// ```
pub struct Session {
    config: TrainingConfig,
    data_path: PathBuf,
    label_path: PathBuf,
}

impl Session {
    pub fn new(
        config: TrainingConfig,
        data_path: impl Into<PathBuf>,
        label_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            data_path: data_path.into(),
            label_path: label_path.into(),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Validate, load the CSV dataset and train
    pub fn run(self) -> Result<TrainReport> {
        validate_config(&self.config)?;
        let dataset = EcgDataset::from_csv(
            &self.data_path,
            &self.label_path,
            self.config.num_nodes,
            self.config.feature_dim,
        )?;
        self.run_with_dataset(&dataset)
    }

    /// Train on an already loaded dataset
    pub fn run_with_dataset<D: Dataset + ?Sized>(&self, dataset: &D) -> Result<TrainReport> {
        let config = &self.config;
        validate_config(config)?;
        let start = Instant::now();

        let labels = dataset.labels();
        let split = stratified_split(&labels, config.val_fraction, config.split_seed)?;
        let counts = |indices: &[usize]| ClassCounts::from_labels(indices.iter().map(|&i| labels[i]));
        tracing::info!("Dataset: {}", ClassCounts::from_labels(labels.iter().copied()));
        tracing::info!("Training split: {}", counts(&split.train));
        tracing::info!("Validation split: {}", counts(&split.validation));

        let train_sampler = SubsetSampler::new(split.train, config.shuffle_train);
        let val_sampler = SubsetSampler::new(split.validation, config.shuffle_validation);

        let seeds = RunSeeds::from_seed(config.seed);
        let base = BaseGraph::complete(config.num_nodes);
        let mut model = JointModel::new(
            VariationalGraphAutoEncoder::new(config.generator_config(), seeds.generator),
            BinaryGraphClassifier::new(config.classifier_config(), seeds.classifier),
            build_optimizer(&config.generator),
            build_optimizer(&config.classifier),
        );
        tracing::info!(
            generator = model.generator.num_parameters(),
            classifier = model.classifier.num_parameters(),
            "Models initialized"
        );

        let mut ctx = RunContext::open(config)?;
        let runner = EpochRunner::from_config(&base, config);
        let mut rng = StdRng::seed_from_u64(seeds.shuffle);

        let mut epochs = 0;
        let mut last: Option<(EpochSummary, EpochSummary)> = None;
        let outcome = (|| -> Result<()> {
            for epoch in 0..config.epochs {
                let order = train_sampler.epoch_order(&mut rng);
                let train = runner.run(Mode::Train, epoch, &mut model, dataset, &order)?;
                ctx.record(&train)?;

                let order = val_sampler.epoch_order(&mut rng);
                let validation = runner.run(Mode::Eval, epoch, &mut model, dataset, &order)?;
                ctx.record(&validation)?;
                ctx.observe_validation(&validation, &model.generator, &model.classifier)?;

                model.end_epoch();
                epochs = epoch + 1;
                last = Some((train, validation));
            }
            Ok(())
        })();

        let finished = ctx.finish();
        outcome?;
        let tracker = finished?;

        let (final_train, final_validation) = last.unzip();
        let report = TrainReport {
            epochs,
            best_score: tracker.best_score(),
            best_epoch: tracker.best_epoch(),
            final_train,
            final_validation,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        tracing::info!(
            epochs = report.epochs,
            best_score = ?report.best_score,
            best_epoch = ?report.best_epoch,
            elapsed_secs = report.elapsed_secs,
            "Training finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::LRScheduler;

    #[test]
    fn test_run_seeds_are_distinct() {
        for seed in [0, 10, u64::MAX - 1, u64::MAX] {
            let seeds = RunSeeds::from_seed(seed);
            assert_eq!(seeds.generator, seed);
            assert_ne!(seeds.shuffle, seeds.generator);
            assert_ne!(seeds.shuffle, seeds.classifier);
            assert_ne!(seeds.classifier, seeds.generator);
        }
    }

    #[test]
    fn test_shuffle_stream_differs_from_init_stream() {
        use rand::Rng;

        let seeds = RunSeeds::from_seed(10);
        let mut init = StdRng::seed_from_u64(seeds.generator);
        let mut shuffle = StdRng::seed_from_u64(seeds.shuffle);
        let a: Vec<u64> = (0..4).map(|_| init.random()).collect();
        let b: Vec<u64> = (0..4).map(|_| shuffle.random()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_build_optimizer_without_milestones() {
        let mut opt = build_optimizer(&OptimizerConfig::default());
        opt.end_epoch();
        assert_eq!(opt.lr(), 1e-4);
    }

    #[test]
    fn test_build_optimizer_with_milestones() {
        let config = OptimizerConfig {
            lr: 1.0,
            milestones: vec![1, 2],
            gamma: 0.5,
            ..OptimizerConfig::default()
        };
        let mut opt = build_optimizer(&config);
        opt.end_epoch();
        assert_eq!(opt.lr(), 0.5);
        opt.end_epoch();
        assert_eq!(opt.lr(), 0.25);

        let mut sched = MultiStepLR::new(1.0, vec![1, 2], 0.5);
        sched.step();
        assert_eq!(sched.get_lr(), 0.5);
    }
}
