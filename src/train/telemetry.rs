//! Fire-and-forget metric telemetry
//!
//! Sinks receive one point per (window, series, epoch) plus the validation
//! confusion matrix. Failures are reported to the caller, which logs them
//! and carries on; telemetry never stops a run.

use crate::train::metrics::ConfusionMatrix;
use crate::Result;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Named panel a metric is plotted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Loss,
    Accuracy,
    Reconstruction,
    Kl,
    Classification,
    NumEdges,
    ConfusionMatrix,
}

impl Window {
    pub fn as_str(self) -> &'static str {
        match self {
            Window::Loss => "loss",
            Window::Accuracy => "accuracy",
            Window::Reconstruction => "reconstruction",
            Window::Kl => "kl",
            Window::Classification => "classification",
            Window::NumEdges => "num_edges",
            Window::ConfusionMatrix => "confusion_matrix",
        }
    }
}

/// Destination for live metrics
pub trait TelemetrySink {
    /// Append one point to a line chart
    fn line(&mut self, window: Window, series: &str, epoch: usize, value: f32) -> Result<()>;

    /// Replace a heatmap with the given confusion matrix
    fn heatmap(&mut self, window: Window, epoch: usize, confusion: &ConfusionMatrix) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn line(&mut self, _: Window, _: &str, _: usize, _: f32) -> Result<()> {
        Ok(())
    }

    fn heatmap(&mut self, _: Window, _: usize, _: &ConfusionMatrix) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Event<'a> {
    Line {
        window: &'a str,
        series: &'a str,
        epoch: usize,
        value: f32,
    },
    Heatmap {
        window: &'a str,
        epoch: usize,
        rows: [[usize; 2]; 2],
        row_names: [&'a str; 2],
        column_names: [&'a str; 2],
    },
}

/// Newline-delimited JSON events appended to a file
pub struct JsonlTelemetry {
    writer: BufWriter<File>,
}

impl JsonlTelemetry {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn emit(&mut self, event: &Event<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)
            .map_err(|e| crate::Error::Serialization(format!("telemetry event: {e}")))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl TelemetrySink for JsonlTelemetry {
    fn line(&mut self, window: Window, series: &str, epoch: usize, value: f32) -> Result<()> {
        self.emit(&Event::Line {
            window: window.as_str(),
            series,
            epoch,
            value,
        })
    }

    fn heatmap(&mut self, window: Window, epoch: usize, confusion: &ConfusionMatrix) -> Result<()> {
        self.emit(&Event::Heatmap {
            window: window.as_str(),
            epoch,
            rows: confusion.rows(),
            row_names: ["true_0", "true_1"],
            column_names: ["pred_0", "pred_1"],
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_jsonl_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let mut sink = JsonlTelemetry::open(&path).unwrap();
        sink.line(Window::Loss, "train", 2, 1.5).unwrap();
        sink.heatmap(
            Window::ConfusionMatrix,
            2,
            &ConfusionMatrix::from_labels(&[0, 1], &[0, 0]),
        )
        .unwrap();
        sink.flush().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "line");
        assert_eq!(lines[0]["window"], "loss");
        assert_eq!(lines[0]["series"], "train");
        assert_eq!(lines[0]["value"], 1.5);
        assert_eq!(lines[1]["kind"], "heatmap");
        assert_eq!(lines[1]["rows"], serde_json::json!([[1, 0], [1, 0]]));
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullTelemetry;
        assert!(sink.line(Window::Kl, "validation", 0, f32::NAN).is_ok());
        assert!(sink.flush().is_ok());
    }
}
