//! Synthetic traffic generator.
//!
//! Produces a labeled dataset from a seeded `ChaCha8Rng`. Feature columns are
//! drawn uniformly and labels independently of the features, so a classifier
//! fit on this data can do no better than the majority-class rate.
//!
//! # Sampling Ranges
//!
//! | column      | distribution            |
//! |-------------|-------------------------|
//! | packet_size | integer in [40, 1500)   |
//! | duration    | real in [0.0, 10.0)     |
//! | src_bytes   | integer in [0, 10000)   |
//! | dst_bytes   | integer in [0, 10000)   |
//! | count       | integer in [1, 100)     |
//! | label       | attack with p = 0.3     |

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};
use tracing::debug;

use crate::config::DatasetConfig;
use crate::traffic::{Feature, Label, LabeledRecord, TrafficRecord};

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;
/// Default number of generated records.
pub const DEFAULT_SIZE: usize = 1000;
/// Default probability of an attack label.
pub const DEFAULT_ATTACK_RATIO: f64 = 0.3;

/// Deterministic generator of labeled traffic.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    seed: u64,
    size: usize,
    attack_ratio: f64,
}

impl DatasetGenerator {
    pub fn new(seed: u64, size: usize) -> Self {
        Self {
            seed,
            size,
            attack_ratio: DEFAULT_ATTACK_RATIO,
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.seed, config.size).with_attack_ratio(config.attack_ratio)
    }

    /// Overrides the attack probability (clamped to [0, 1]).
    pub fn with_attack_ratio(mut self, attack_ratio: f64) -> Self {
        self.attack_ratio = attack_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Generates the dataset. Identical parameters yield identical output.
    pub fn generate(&self) -> TrainingDataset {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let normal_ratio = 1.0 - self.attack_ratio;

        let records = (0..self.size)
            .map(|_| {
                let record = TrafficRecord {
                    packet_size: rng.gen_range(40..1500),
                    duration: rng.gen_range(0.0..10.0),
                    src_bytes: rng.gen_range(0..10_000),
                    dst_bytes: rng.gen_range(0..10_000),
                    count: rng.gen_range(1..100),
                };
                let label = if rng.gen::<f64>() < normal_ratio {
                    Label::Normal
                } else {
                    Label::Attack
                };
                LabeledRecord { record, label }
            })
            .collect();

        let dataset = TrainingDataset {
            seed: self.seed,
            records,
        };
        debug!(
            seed = self.seed,
            size = self.size,
            attack = dataset.class_balance().attack,
            "Generated synthetic dataset"
        );
        dataset
    }
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, DEFAULT_SIZE)
    }
}

/// Shorthand for `DatasetGenerator::new(seed, size).generate()`.
pub fn generate(seed: u64, size: usize) -> TrainingDataset {
    DatasetGenerator::new(seed, size).generate()
}

/// Ordered collection of labeled traffic records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingDataset {
    seed: u64,
    records: Vec<LabeledRecord>,
}

impl TrainingDataset {
    /// Builds a dataset from explicit records.
    pub fn from_records(records: Vec<LabeledRecord>) -> Self {
        Self { seed: 0, records }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    /// First `n` records, for previews.
    pub fn head(&self, n: usize) -> &[LabeledRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Feature matrix, one row per record.
    pub fn features(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.record.to_features()).collect()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }

    pub fn class_balance(&self) -> ClassBalance {
        ClassBalance::from_labels(self.records.iter().map(|r| r.label))
    }

    /// Per-column statistics plus label balance.
    pub fn summary(&self) -> DatasetSummary {
        let features = Feature::ALL
            .iter()
            .map(|&feature| {
                let column: Vec<f64> = self.records.iter().map(|r| r.record.get(feature)).collect();
                FeatureSummary::from_column(feature, column)
            })
            .collect();

        DatasetSummary {
            records: self.len(),
            seed: self.seed,
            features,
            balance: self.class_balance(),
        }
    }
}

/// Label counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassBalance {
    pub normal: usize,
    pub attack: usize,
}

impl ClassBalance {
    pub fn from_labels<I: IntoIterator<Item = Label>>(labels: I) -> Self {
        labels.into_iter().fold(Self::default(), |mut acc, label| {
            match label {
                Label::Normal => acc.normal += 1,
                Label::Attack => acc.attack += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.normal + self.attack
    }

    pub fn attack_fraction(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.attack as f64 / self.total() as f64
        }
    }

    /// Accuracy of always predicting the more frequent class.
    pub fn majority_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.normal.max(self.attack) as f64 / self.total() as f64
        }
    }
}

/// Statistics for one feature column.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub feature: Feature,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl FeatureSummary {
    fn from_column(feature: Feature, column: Vec<f64>) -> Self {
        let count = column.len();
        if count == 0 {
            return Self {
                feature,
                count,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                median: 0.0,
            };
        }

        let mut data = Data::new(column);
        Self {
            feature,
            count,
            mean: data.mean().unwrap_or(0.0),
            std_dev: data.std_dev().unwrap_or(0.0),
            min: data.min(),
            max: data.max(),
            median: data.median(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub seed: u64,
    pub features: Vec<FeatureSummary>,
    pub balance: ClassBalance,
}
