//! Per-epoch history files and graph artifacts

use super::trainer::Mode;
use super::EpochSummary;
use crate::io::write_atomic;
use crate::Result;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only scalar histories under a common path prefix
///
/// For prefix `runs/a` the files are `runs/a_train_losses.txt`,
/// `runs/a_train_accs.txt`, `runs/a_val_losses.txt` and
/// `runs/a_val_accs.txt`, one value per line. Existing files are extended.
pub struct HistoryWriter {
    prefix: PathBuf,
    train_losses: BufWriter<File>,
    train_accs: BufWriter<File>,
    val_losses: BufWriter<File>,
    val_accs: BufWriter<File>,
}

fn tag(mode: Mode) -> &'static str {
    match mode {
        Mode::Train => "train",
        Mode::Eval => "val",
    }
}

/// `prefix` with `suffix` appended to its final component
pub fn prefixed_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn open_append(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

impl HistoryWriter {
    pub fn open(prefix: impl Into<PathBuf>) -> Result<Self> {
        let prefix = prefix.into();
        if let Some(parent) = prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            train_losses: open_append(&prefixed_path(&prefix, "_train_losses.txt"))?,
            train_accs: open_append(&prefixed_path(&prefix, "_train_accs.txt"))?,
            val_losses: open_append(&prefixed_path(&prefix, "_val_losses.txt"))?,
            val_accs: open_append(&prefixed_path(&prefix, "_val_accs.txt"))?,
            prefix,
        })
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Append the loss and score of one pass and flush
    pub fn record(&mut self, summary: &EpochSummary) -> Result<()> {
        let (losses, accs) = match summary.mode {
            Mode::Train => (&mut self.train_losses, &mut self.train_accs),
            Mode::Eval => (&mut self.val_losses, &mut self.val_accs),
        };
        writeln!(losses, "{}", summary.loss)?;
        writeln!(accs, "{}", summary.score)?;
        losses.flush()?;
        accs.flush()?;
        Ok(())
    }

    /// Path of the graph artifact for `mode` at `epoch`
    pub fn graph_path(&self, mode: Mode, epoch: usize) -> PathBuf {
        prefixed_path(&self.prefix, &format!("_{}_graph_{epoch}.dot", tag(mode)))
    }

    /// Write a DOT graph artifact, replacing any earlier one for the same epoch
    pub fn write_graph(&self, mode: Mode, epoch: usize, dot: &str) -> Result<PathBuf> {
        let path = self.graph_path(mode, epoch);
        write_atomic(&path, dot.as_bytes())?;
        Ok(path)
    }

    pub fn flush(&mut self) -> Result<()> {
        for w in [
            &mut self.train_losses,
            &mut self.train_accs,
            &mut self.val_losses,
            &mut self.val_accs,
        ] {
            w.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use tempfile::tempdir;

    fn summary(mode: Mode, loss: f32, score: f32) -> EpochSummary {
        EpochSummary {
            mode,
            epoch: 0,
            loss,
            reconstruction: 0.0,
            kl: 0.0,
            classification: 0.0,
            edges: 0.0,
            score,
            confusion: None,
            last_graph: Array1::zeros(1),
            samples: 1,
            skipped: 0,
        }
    }

    #[test]
    fn test_appends_one_value_per_line() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("runs/exp");
        let mut history = HistoryWriter::open(&prefix).unwrap();
        history.record(&summary(Mode::Train, 1.5, 0.25)).unwrap();
        history.record(&summary(Mode::Train, 1.25, 0.5)).unwrap();
        history.record(&summary(Mode::Eval, 2.0, 0.75)).unwrap();

        let read = |s: &str| fs::read_to_string(prefixed_path(&prefix, s)).unwrap();
        assert_eq!(read("_train_losses.txt"), "1.5\n1.25\n");
        assert_eq!(read("_train_accs.txt"), "0.25\n0.5\n");
        assert_eq!(read("_val_losses.txt"), "2\n");
        assert_eq!(read("_val_accs.txt"), "0.75\n");
    }

    #[test]
    fn test_reopen_extends_files() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("h");
        HistoryWriter::open(&prefix)
            .unwrap()
            .record(&summary(Mode::Eval, 1.0, 0.1))
            .unwrap();
        HistoryWriter::open(&prefix)
            .unwrap()
            .record(&summary(Mode::Eval, 3.0, 0.2))
            .unwrap();
        let text = fs::read_to_string(prefixed_path(&prefix, "_val_losses.txt")).unwrap();
        assert_eq!(text, "1\n3\n");
    }

    #[test]
    fn test_graph_artifact_path() {
        let dir = tempdir().unwrap();
        let history = HistoryWriter::open(dir.path().join("h")).unwrap();
        let path = history.write_graph(Mode::Eval, 9, "graph {}\n").unwrap();
        assert_eq!(path, dir.path().join("h_val_graph_9.dot"));
        assert_eq!(fs::read_to_string(path).unwrap(), "graph {}\n");
    }
}
