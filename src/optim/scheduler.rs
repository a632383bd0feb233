//! Learning rate schedulers

use super::Optimizer;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Step the scheduler (called once per epoch)
    fn step(&mut self);
}

/// Multi-step decay
///
/// Multiplies the learning rate by `gamma` each time the epoch counter
/// reaches one of the milestones.
///
/// Formula: lr_t = lr_initial * gamma^(number of milestones <= t)
#[derive(Debug, Clone)]
pub struct MultiStepLR {
    lr_initial: f32,
    milestones: Vec<usize>,
    gamma: f32,
    current_epoch: usize,
}

impl MultiStepLR {
    /// Create a new multi-step scheduler
    ///
    /// # Arguments
    /// * `lr_initial` - Initial learning rate
    /// * `milestones` - Epochs (after stepping) at which to decay; sorted on construction
    /// * `gamma` - Multiplicative factor applied at each milestone
    pub fn new(lr_initial: f32, mut milestones: Vec<usize>, gamma: f32) -> Self {
        milestones.sort_unstable();
        Self {
            lr_initial,
            milestones,
            gamma,
            current_epoch: 0,
        }
    }

    /// Apply the current learning rate to an optimizer
    pub fn apply<O: Optimizer + ?Sized>(&self, optimizer: &mut O) {
        optimizer.set_lr(self.get_lr());
    }
}

impl LRScheduler for MultiStepLR {
    fn get_lr(&self) -> f32 {
        let passed = self.milestones.iter().filter(|&&m| m <= self.current_epoch).count();
        self.lr_initial * self.gamma.powi(passed as i32)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }
}
