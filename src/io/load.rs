//! Snapshot loading

use super::model::ModelSnapshot;
use crate::Result;
use std::fs;
use std::path::Path;

/// Read a snapshot written by [`super::save_snapshot`]
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ModelSnapshot> {
    let json = fs::read_to_string(path.as_ref())?;
    ModelSnapshot::from_json(&json)
}
