//! One model's optimizer and learning-rate schedule

use super::{LRScheduler, MultiStepLR, Optimizer};
use crate::nn::Parameterized;

/// Update rule bound to a single model
///
/// The generator and classifier each get their own `ModelOptimizer`, while a
/// single `backward` over the shared loss fills both models' gradients.
/// Per sample the fixed order is `zero_gradients` on both, one backward,
/// then `step` on both.
pub struct ModelOptimizer {
    optimizer: Box<dyn Optimizer>,
    scheduler: Option<MultiStepLR>,
}

impl ModelOptimizer {
    pub fn new(optimizer: Box<dyn Optimizer>) -> Self {
        Self {
            optimizer,
            scheduler: None,
        }
    }

    /// Attach a per-epoch learning-rate schedule
    pub fn with_scheduler(mut self, scheduler: MultiStepLR) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Clear every gradient of `model`
    pub fn zero_gradients<M: Parameterized + ?Sized>(&mut self, model: &mut M) {
        let mut params = model.parameters_mut();
        self.optimizer.zero_grad_refs(&mut params);
    }

    /// Apply one update to `model` from its accumulated gradients
    pub fn step<M: Parameterized + ?Sized>(&mut self, model: &mut M) {
        let mut params = model.parameters_mut();
        self.optimizer.step_refs(&mut params);
    }

    /// Advance the schedule at the end of an epoch
    pub fn end_epoch(&mut self) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.step();
            scheduler.apply(self.optimizer.as_mut());
        }
    }

    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }
}
