//! Optimizers for training the generator and classifier

mod adam;
mod group;
mod optimizer;
mod scheduler;

pub use adam::Adam;
pub use group::ModelOptimizer;
pub use optimizer::Optimizer;
pub use scheduler::{LRScheduler, MultiStepLR};
