//! Sample storage, stratified splitting and subset sampling

mod dataset;
mod split;

pub use dataset::{ClassCounts, Dataset, EcgDataset, Sample};
pub use split::{stratified_split, Split, SubsetSampler};
