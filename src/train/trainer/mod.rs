//! Epoch runner: one pass over a subset in TRAIN or EVAL mode
//!
//! Every sample goes through the same pipeline:
//!
//! 1. generator forward on the base Laplacian and the sample's features
//! 2. classifier forward on the generated graph
//! 3. composite loss
//! 4. TRAIN only: zero both models' gradients, one shared backward, step both
//! 5. accumulate losses, edge count and the raw prediction
//!
//! EVAL runs the whole pass with gradient tracking disabled and never touches
//! the optimizers.

mod core;
mod epoch;
mod result;
mod step;

pub use core::{EpochRunner, JointModel, Mode};
pub use result::{EpochSummary, TrainReport};
