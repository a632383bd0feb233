//! Serializable parameter snapshot

use crate::nn::Parameterized;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a snapshot came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Model identifier, e.g. "generator"
    pub name: String,

    /// Architecture type, e.g. "vgae"
    pub architecture: String,

    /// Epoch whose validation pass produced `score`
    pub epoch: usize,

    /// Validation score at save time
    pub score: f32,

    pub saved_at: DateTime<Utc>,

    /// Crate version that wrote the snapshot
    pub version: String,
}

/// Name and size of one flattened parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name (e.g., "gc1.weight")
    pub name: String,

    /// Number of values in `data` belonging to this parameter
    pub len: usize,
}

/// Parameters of one model in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub metadata: SnapshotMetadata,
    pub parameters: Vec<ParameterInfo>,
    /// All parameter values concatenated in `parameters` order
    pub data: Vec<f32>,
}

impl ModelSnapshot {
    /// Capture the current parameters of `model`
    pub fn capture<M: Parameterized + ?Sized>(
        name: impl Into<String>,
        architecture: impl Into<String>,
        model: &M,
        epoch: usize,
        score: f32,
    ) -> Self {
        let named = model.named_parameters();
        let parameters = named
            .iter()
            .map(|(name, tensor)| ParameterInfo {
                name: (*name).to_string(),
                len: tensor.len(),
            })
            .collect();
        let data = named.iter().flat_map(|(_, t)| t.data().iter().copied()).collect();

        Self {
            metadata: SnapshotMetadata {
                name: name.into(),
                architecture: architecture.into(),
                epoch,
                score,
                saved_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            parameters,
            data,
        }
    }

    pub fn num_values(&self) -> usize {
        self.data.len()
    }

    /// Values of the parameter called `name`
    pub fn parameter(&self, name: &str) -> Option<&[f32]> {
        let mut offset = 0;
        for info in &self.parameters {
            if info.name == name {
                return self.data.get(offset..offset + info.len);
            }
            offset += info.len;
        }
        None
    }

    /// Copy the stored values back into `model`
    ///
    /// Fails without modifying anything if the parameter names or sizes do
    /// not match the model's layout.
    pub fn restore<M: Parameterized + ?Sized>(&self, model: &mut M) -> Result<()> {
        let layout: Vec<(&'static str, usize)> = model
            .named_parameters()
            .iter()
            .map(|(name, t)| (*name, t.len()))
            .collect();

        let matches = layout.len() == self.parameters.len()
            && layout
                .iter()
                .zip(&self.parameters)
                .all(|((name, len), info)| *name == info.name && *len == info.len);
        let total: usize = self.parameters.iter().map(|p| p.len).sum();
        if !matches || total != self.data.len() {
            return Err(Error::Shape(format!(
                "snapshot '{}' does not match the model's parameter layout",
                self.metadata.name
            )));
        }

        let mut offset = 0;
        for param in model.parameters_mut() {
            let len = param.len();
            param
                .data_mut()
                .iter_mut()
                .zip(&self.data[offset..offset + len])
                .for_each(|(dst, &src)| *dst = src);
            offset += len;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::{BinaryGraphClassifier, ClassifierConfig, GeneratorConfig, VariationalGraphAutoEncoder};

    #[test]
    fn test_capture_layout() {
        let cls = BinaryGraphClassifier::new(ClassifierConfig::default(), 1);
        let snap = ModelSnapshot::capture("classifier", "gcn", &cls, 4, 0.8);
        assert_eq!(snap.parameters.len(), 6);
        assert_eq!(snap.num_values(), cls.num_parameters());
        assert_eq!(snap.parameters[0].name, "gc1.weight");
        assert_eq!(snap.metadata.epoch, 4);
        assert_eq!(
            snap.parameter("readout.bias").unwrap(),
            cls.named_parameters()[5].1.data().as_slice().unwrap()
        );
        assert!(snap.parameter("missing").is_none());
    }

    #[test]
    fn test_restore_copies_values() {
        let a = BinaryGraphClassifier::new(ClassifierConfig::default(), 1);
        let mut b = BinaryGraphClassifier::new(ClassifierConfig::default(), 2);
        let snap = ModelSnapshot::capture("classifier", "gcn", &a, 0, 0.0);
        snap.restore(&mut b).unwrap();
        for ((_, ta), (_, tb)) in a.named_parameters().iter().zip(b.named_parameters().iter()) {
            assert_eq!(ta.data(), tb.data());
        }
    }

    #[test]
    fn test_restore_rejects_other_layout() {
        let cls = BinaryGraphClassifier::new(ClassifierConfig::default(), 1);
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 1);
        let snap = ModelSnapshot::capture("classifier", "gcn", &cls, 0, 0.0);
        assert!(matches!(snap.restore(&mut gen), Err(Error::Shape(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let cls = BinaryGraphClassifier::new(ClassifierConfig::default(), 3);
        let snap = ModelSnapshot::capture("classifier", "gcn", &cls, 2, 0.5);
        let back = ModelSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);
    }
}
