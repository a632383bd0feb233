//! Dataset collaborator and the CSV-backed ECG dataset

use crate::{Error, Result, Tensor};
use ndarray::Array1;
use std::fmt;
use std::path::Path;

/// One sample: `num_nodes × feature_dim` features (row-major) and a 0/1 label
#[derive(Debug, Clone)]
pub struct Sample {
    pub features: Tensor,
    pub label: u8,
}

/// Indexed access to labelled samples
pub trait Dataset {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class label of sample `index` (0 = healthy, 1 = unhealthy)
    fn label(&self, index: usize) -> u8;

    fn sample(&self, index: usize) -> Sample;

    /// All labels in index order, used for stratification
    fn labels(&self) -> Vec<u8> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }
}

/// Healthy / unhealthy tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub healthy: usize,
    pub unhealthy: usize,
}

impl ClassCounts {
    pub fn from_labels<I: IntoIterator<Item = u8>>(labels: I) -> Self {
        labels.into_iter().fold(Self::default(), |mut acc, label| {
            if label == 0 {
                acc.healthy += 1;
            } else {
                acc.unhealthy += 1;
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.healthy + self.unhealthy
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} healthy / {} unhealthy", self.healthy, self.unhealthy)
    }
}

/// ECG feature rows loaded from two headerless CSV files
///
/// Each data row carries one value per (channel, feature) pair, channel by
/// channel; the label file carries one `0` or `1` per row.
#[derive(Debug, Clone)]
pub struct EcgDataset {
    features: Vec<Array1<f32>>,
    labels: Vec<u8>,
    num_nodes: usize,
    feature_dim: usize,
}

impl EcgDataset {
    /// Build from in-memory rows
    pub fn new(
        features: Vec<Array1<f32>>,
        labels: Vec<u8>,
        num_nodes: usize,
        feature_dim: usize,
    ) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::Shape(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if let Some(row) = features.iter().position(|f| f.len() != num_nodes * feature_dim) {
            return Err(Error::Shape(format!(
                "row {row} has {} values, expected {}",
                features[row].len(),
                num_nodes * feature_dim
            )));
        }
        if let Some(row) = labels.iter().position(|&l| l > 1) {
            return Err(Error::Shape(format!("label {row} is {}, expected 0 or 1", labels[row])));
        }
        Ok(Self {
            features,
            labels,
            num_nodes,
            feature_dim,
        })
    }

    /// Load and validate the feature and label files
    pub fn from_csv(
        data_path: impl AsRef<Path>,
        label_path: impl AsRef<Path>,
        num_nodes: usize,
        feature_dim: usize,
    ) -> Result<Self> {
        let data_path = data_path.as_ref();
        let label_path = label_path.as_ref();
        let width = num_nodes * feature_dim;

        let features: Vec<Array1<f32>> = read_rows(data_path)?
            .into_iter()
            .enumerate()
            .map(|(row, cells)| {
                if cells.len() != width {
                    return Err(Error::data(
                        data_path,
                        row + 1,
                        format!("expected {width} columns, found {}", cells.len()),
                    ));
                }
                cells
                    .iter()
                    .map(|cell| parse_value(data_path, row + 1, cell))
                    .collect::<Result<Array1<f32>>>()
            })
            .collect::<Result<_>>()?;

        let labels: Vec<u8> = read_rows(label_path)?
            .into_iter()
            .enumerate()
            .map(|(row, cells)| match cells.as_slice() {
                [cell] => parse_label(label_path, row + 1, cell),
                _ => Err(Error::data(
                    label_path,
                    row + 1,
                    format!("expected 1 column, found {}", cells.len()),
                )),
            })
            .collect::<Result<_>>()?;

        if features.is_empty() {
            return Err(Error::data(data_path, 0, "no samples"));
        }
        if features.len() != labels.len() {
            return Err(Error::data(
                label_path,
                labels.len(),
                format!("{} labels for {} data rows", labels.len(), features.len()),
            ));
        }

        tracing::debug!(
            samples = features.len(),
            data = %data_path.display(),
            labels = %label_path.display(),
            "Loaded ECG dataset"
        );

        Ok(Self {
            features,
            labels,
            num_nodes,
            feature_dim,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    pub fn class_counts(&self) -> ClassCounts {
        ClassCounts::from_labels(self.labels.iter().copied())
    }
}

impl Dataset for EcgDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn label(&self, index: usize) -> u8 {
        self.labels[index]
    }

    fn sample(&self, index: usize) -> Sample {
        Sample {
            features: Tensor::constant(self.features[index].clone()),
            label: self.labels[index],
        }
    }
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(csv_err)
        })
        .collect()
}

fn parse_value(path: &Path, row: usize, cell: &str) -> Result<f32> {
    let value: f32 = cell
        .parse()
        .map_err(|_| Error::data(path, row, format!("'{cell}' is not a number")))?;
    if !value.is_finite() {
        return Err(Error::data(path, row, format!("non-finite value '{cell}'")));
    }
    Ok(value)
}

fn parse_label(path: &Path, row: usize, cell: &str) -> Result<u8> {
    // Labels may be written as integers or floats ("1", "1.0")
    match cell.parse::<f32>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(Error::data(path, row, format!("label '{cell}' is not 0 or 1"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_csv_reads_rows() {
        let data = write_file("1,2,3,4\n0.5, -1 ,2e-1,0\n");
        let labels = write_file("0\n1.0\n");
        let ds = EcgDataset::from_csv(data.path(), labels.path(), 2, 2).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.labels(), vec![0, 1]);
        let s = ds.sample(1);
        assert_eq!(s.label, 1);
        assert_eq!(s.features.data().to_vec(), vec![0.5, -1.0, 0.2, 0.0]);
        assert!(!s.features.requires_grad());
        assert_eq!(ds.class_counts(), ClassCounts { healthy: 1, unhealthy: 1 });
    }

    #[test]
    fn test_wrong_column_count() {
        let data = write_file("1,2,3\n");
        let labels = write_file("0\n");
        let err = EcgDataset::from_csv(data.path(), labels.path(), 2, 2).unwrap_err();
        assert!(matches!(err, Error::Data { row: 1, .. }), "{err}");
    }

    #[test]
    fn test_non_numeric_and_non_finite_cells() {
        let labels = write_file("0\n");
        let data = write_file("1,x\n");
        assert!(EcgDataset::from_csv(data.path(), labels.path(), 1, 2).is_err());
        let data = write_file("1,NaN\n");
        let err = EcgDataset::from_csv(data.path(), labels.path(), 1, 2).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_bad_label() {
        let data = write_file("1,2\n");
        let labels = write_file("2\n");
        let err = EcgDataset::from_csv(data.path(), labels.path(), 1, 2).unwrap_err();
        assert!(err.to_string().contains("not 0 or 1"));
    }

    #[test]
    fn test_row_count_mismatch() {
        let data = write_file("1,2\n3,4\n");
        let labels = write_file("0\n");
        assert!(EcgDataset::from_csv(data.path(), labels.path(), 1, 2).is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let data = write_file("");
        let labels = write_file("");
        assert!(EcgDataset::from_csv(data.path(), labels.path(), 1, 2).is_err());
    }

    #[test]
    fn test_missing_file() {
        let labels = write_file("0\n");
        let err = EcgDataset::from_csv("/nonexistent/data.csv", labels.path(), 1, 2).unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
    }

    #[test]
    fn test_new_validates_shapes() {
        let rows = vec![Array1::zeros(4)];
        assert!(EcgDataset::new(rows.clone(), vec![0], 2, 2).is_ok());
        assert!(EcgDataset::new(rows.clone(), vec![0], 3, 2).is_err());
        assert!(EcgDataset::new(rows.clone(), vec![0, 1], 2, 2).is_err());
        assert!(EcgDataset::new(rows, vec![5], 2, 2).is_err());
    }
}
