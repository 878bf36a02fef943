//! Train/test partitioning and classification metrics.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::traffic::Label;

/// Index partition of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n` with a seeded RNG and holds out `ceil(n * test_ratio)`
/// indices for evaluation.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_count = ((n as f64) * test_ratio.clamp(0.0, 1.0)).ceil() as usize;
    let train = indices.split_off(test_count.min(n));

    Split {
        train,
        test: indices,
    }
}

/// Fraction of predictions matching the truth. Empty input yields 0.0.
pub fn accuracy(truth: &[Label], predicted: &[Label]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / truth.len() as f64
}

/// Binary confusion matrix with attack as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Self {
        let mut matrix = Self::default();
        for (t, p) in truth.iter().zip(predicted) {
            match (t, p) {
                (Label::Normal, Label::Normal) => matrix.true_negative += 1,
                (Label::Normal, Label::Attack) => matrix.false_positive += 1,
                (Label::Attack, Label::Normal) => matrix.false_negative += 1,
                (Label::Attack, Label::Attack) => matrix.true_positive += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Precision for the attack class.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Recall (detection rate) for the attack class.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
