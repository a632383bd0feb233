//! Atomic file writes

use super::model::ModelSnapshot;
use crate::Result;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sibling temp path: `<path>.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace `path` with `bytes` via write-to-temp + rename
///
/// The temp file lives in the same directory so the rename stays on one
/// filesystem. Readers see either the old contents or the new, never a
/// partial write.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path);
    let written = File::create(&temp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }

    fs::rename(&temp, path)?;
    Ok(())
}

/// Save a snapshot as pretty-printed JSON
pub fn save_snapshot(snapshot: &ModelSnapshot, path: impl AsRef<Path>) -> Result<()> {
    write_atomic(path, snapshot.to_json()?.as_bytes())
}
