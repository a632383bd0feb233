//! Model snapshot serialization and crash-safe file writes
//!
//! Snapshots are JSON documents holding metadata, the parameter layout and
//! the flattened parameter values. Every write goes through
//! [`write_atomic`], so an interrupted save never leaves a truncated file
//! in place of an earlier good one.

mod load;
mod model;
mod save;

pub use load::load_snapshot;
pub use model::{ModelSnapshot, ParameterInfo, SnapshotMetadata};
pub use save::{save_snapshot, write_atomic};
