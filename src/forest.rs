//! Tree-ensemble classifier.
//!
//! A bagged random forest of CART decision trees using Gini impurity.
//! Each tree is fit on a bootstrap sample and considers a random subset
//! of `sqrt(n_features)` features at every split. Predictions average the
//! per-tree leaf class probabilities; ties resolve to [`Label::Normal`].

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::ModelError;
use crate::traffic::Label;

/// Opaque two-operation classifier capability.
pub trait Classifier {
    /// Fits the classifier, replacing any previously learned state.
    fn fit(&mut self, samples: &[Vec<f64>], labels: &[Label]) -> Result<(), ModelError>;

    /// Predicts the label of one sample.
    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError>;

    /// Predicts every sample in order.
    fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<Label>, ModelError> {
        samples.iter().map(|s| self.predict(s)).collect()
    }
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth (None = grow until pure).
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Features examined per split (None = all).
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        counts: [usize; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn leaf_counts(&self, sample: &[f64]) -> [usize; 2] {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { counts } => return *counts,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// CART decision tree for binary labels.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: TreeParams,
    seed: u64,
    n_features: usize,
    root: Option<Node>,
}

impl DecisionTree {
    pub fn new(params: TreeParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            n_features: 0,
            root: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Depth of the fitted tree (0 for a single leaf or unfitted tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map(Node::depth).unwrap_or(0)
    }

    /// Fits on the rows named by `indices` (repeats allowed).
    fn fit_indices(
        &mut self,
        samples: &[Vec<f64>],
        labels: &[Label],
        indices: &[usize],
    ) -> Result<(), ModelError> {
        validate_training_set(samples, labels)?;
        if indices.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        self.n_features = samples[0].len();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut indices = indices.to_vec();
        self.root = Some(self.build(samples, labels, &mut indices, 0, &mut rng));
        Ok(())
    }

    fn build(
        &self,
        samples: &[Vec<f64>],
        labels: &[Label],
        indices: &mut [usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        let counts = class_counts(labels, indices);
        let pure = counts[0] == 0 || counts[1] == 0;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);

        if pure || depth_reached || indices.len() < self.params.min_samples_split {
            return Node::Leaf { counts };
        }

        let Some(best) = self.best_split(samples, labels, indices, counts, rng) else {
            return Node::Leaf { counts };
        };

        // Partition in place: left side holds values <= threshold.
        let mut mid = 0;
        for i in 0..indices.len() {
            if samples[indices[i]][best.feature] <= best.threshold {
                indices.swap(i, mid);
                mid += 1;
            }
        }

        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.build(samples, labels, left_idx, depth + 1, rng);
        let right = self.build(samples, labels, right_idx, depth + 1, rng);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Scans features in random order, stopping once `max_features`
    /// non-constant features have been evaluated.
    fn best_split(
        &self,
        samples: &[Vec<f64>],
        labels: &[Label],
        indices: &[usize],
        parent: [usize; 2],
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);
        let wanted = self
            .params
            .max_features
            .unwrap_or(self.n_features)
            .clamp(1, self.n_features);

        let n = indices.len() as f64;
        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0;
        let mut column: Vec<(f64, Label)> = Vec::with_capacity(indices.len());

        for feature in features {
            if visited >= wanted {
                break;
            }

            column.clear();
            column.extend(indices.iter().map(|&i| (samples[i][feature], labels[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            if column[0].0 == column[column.len() - 1].0 {
                continue;
            }
            visited += 1;

            let mut left = [0usize; 2];
            for pos in 0..column.len() - 1 {
                left[column[pos].1.index()] += 1;
                let (value, next) = (column[pos].0, column[pos + 1].0);
                if value == next {
                    continue;
                }

                let right = [parent[0] - left[0], parent[1] - left[1]];
                let n_left = (pos + 1) as f64;
                let n_right = n - n_left;
                let impurity = (n_left * gini(left) + n_right * gini(right)) / n;

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }

    fn leaf_counts(&self, sample: &[f64]) -> Result<[usize; 2], ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        if sample.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: sample.len(),
            });
        }
        Ok(root.leaf_counts(sample))
    }
}

impl Classifier for DecisionTree {
    fn fit(&mut self, samples: &[Vec<f64>], labels: &[Label]) -> Result<(), ModelError> {
        let indices: Vec<usize> = (0..samples.len()).collect();
        self.fit_indices(samples, labels, &indices)
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        let counts = self.leaf_counts(sample)?;
        Ok(majority(counts[0] as f64, counts[1] as f64))
    }
}

/// Parameters for a [`RandomForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    pub bootstrap: bool,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            bootstrap: true,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Bagged ensemble of decision trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Number of fitted trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Mean attack probability across trees.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }

        let mut total = 0.0;
        for tree in &self.trees {
            let counts = tree.leaf_counts(sample)?;
            let n = (counts[0] + counts[1]) as f64;
            if n > 0.0 {
                total += counts[1] as f64 / n;
            }
        }
        Ok(total / self.trees.len() as f64)
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, samples: &[Vec<f64>], labels: &[Label]) -> Result<(), ModelError> {
        validate_training_set(samples, labels)?;

        let n = samples.len();
        let n_features = samples[0].len();
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split.max(2),
            max_features: Some(((n_features as f64).sqrt() as usize).max(1)),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_estimators);

        for _ in 0..self.params.n_estimators {
            let tree_seed: u64 = rng.gen();
            let indices: Vec<usize> = if self.params.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };

            let mut tree = DecisionTree::new(tree_params, tree_seed);
            tree.fit_indices(samples, labels, &indices)?;
            trees.push(tree);
        }

        debug!(
            trees = trees.len(),
            samples = n,
            max_depth = trees.iter().map(DecisionTree::depth).max().unwrap_or(0),
            "Random forest fitted"
        );

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        let attack = self.predict_proba(sample)?;
        Ok(majority(1.0 - attack, attack))
    }
}

fn validate_training_set(samples: &[Vec<f64>], labels: &[Label]) -> Result<(), ModelError> {
    if samples.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if samples.len() != labels.len() {
        return Err(ModelError::LengthMismatch {
            samples: samples.len(),
            labels: labels.len(),
        });
    }
    let expected = samples[0].len();
    if expected == 0 {
        return Err(ModelError::FeatureCount {
            expected: 1,
            actual: 0,
        });
    }
    if let Some(row) = samples.iter().find(|row| row.len() != expected) {
        return Err(ModelError::FeatureCount {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

fn class_counts(labels: &[Label], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &i in indices {
        counts[labels[i].index()] += 1;
    }
    counts
}

fn gini(counts: [usize; 2]) -> f64 {
    let n = (counts[0] + counts[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / n;
    let p1 = counts[1] as f64 / n;
    1.0 - p0 * p0 - p1 * p1
}

fn majority(normal: f64, attack: f64) -> Label {
    if attack > normal {
        Label::Attack
    } else {
        Label::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Attack iff the first feature exceeds 5; the second feature is noise.
    fn separable(n: usize) -> (Vec<Vec<f64>>, Vec<Label>) {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let samples: Vec<Vec<f64>> = (0..n)
            .map(|_| vec![rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)])
            .collect();
        let labels = samples
            .iter()
            .map(|s| if s[0] > 5.0 { Label::Attack } else { Label::Normal })
            .collect();
        (samples, labels)
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini([10, 0]), 0.0);
        assert_eq!(gini([5, 5]), 0.5);
        assert_eq!(gini([0, 0]), 0.0);
    }

    #[test]
    fn test_tree_learns_separable_data() {
        let (samples, labels) = separable(200);
        let mut tree = DecisionTree::new(TreeParams::default(), 1);
        tree.fit(&samples, &labels).unwrap();

        let predicted = tree.predict_batch(&samples).unwrap();
        assert_eq!(predicted, labels, "unbounded tree should fit training data");
        assert_eq!(tree.predict(&[9.0, 1.0]).unwrap(), Label::Attack);
        assert_eq!(tree.predict(&[1.0, 9.0]).unwrap(), Label::Normal);
    }

    #[test]
    fn test_tree_max_depth_zero_is_majority_leaf() {
        let samples = vec![vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![Label::Attack, Label::Attack, Label::Normal];
        let params = TreeParams {
            max_depth: Some(0),
            ..TreeParams::default()
        };
        let mut tree = DecisionTree::new(params, 0);
        tree.fit(&samples, &labels).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[3.0]).unwrap(), Label::Attack);
    }

    #[test]
    fn test_constant_features_produce_leaf() {
        let samples = vec![vec![1.0, 1.0]; 4];
        let labels = vec![Label::Normal, Label::Attack, Label::Normal, Label::Attack];
        let mut tree = DecisionTree::new(TreeParams::default(), 0);
        tree.fit(&samples, &labels).unwrap();
        assert_eq!(tree.depth(), 0);
        // Tie between classes resolves to normal.
        assert_eq!(tree.predict(&[1.0, 1.0]).unwrap(), Label::Normal);
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (samples, labels) = separable(300);
        let mut forest = RandomForest::new(ForestParams {
            n_estimators: 25,
            ..ForestParams::default()
        });
        forest.fit(&samples, &labels).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&[8.5, 2.0]).unwrap(), Label::Attack);
        assert_eq!(forest.predict(&[1.5, 8.0]).unwrap(), Label::Normal);
        let p = forest.predict_proba(&[8.5, 2.0]).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_forest_is_deterministic() {
        let (samples, labels) = separable(150);
        let probe: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 0.5, 5.0]).collect();

        let mut a = RandomForest::new(ForestParams::default());
        let mut b = RandomForest::new(ForestParams::default());
        a.fit(&samples, &labels).unwrap();
        b.fit(&samples, &labels).unwrap();

        for s in &probe {
            assert_eq!(a.predict_proba(s).unwrap(), b.predict_proba(s).unwrap());
        }
    }

    #[test]
    fn test_unfitted_and_invalid_inputs() {
        let forest = RandomForest::new(ForestParams::default());
        assert_eq!(forest.predict(&[1.0]), Err(ModelError::NotFitted));

        let mut forest = RandomForest::new(ForestParams::default());
        assert_eq!(forest.fit(&[], &[]), Err(ModelError::EmptyTrainingSet));
        assert_eq!(
            forest.fit(&[vec![1.0]], &[]),
            Err(ModelError::LengthMismatch { samples: 1, labels: 0 })
        );
        assert!(matches!(
            forest.fit(&[vec![1.0], vec![1.0, 2.0]], &[Label::Normal, Label::Attack]),
            Err(ModelError::FeatureCount { .. })
        ));

        assert_eq!(
            forest.fit(&[Vec::new()], &[Label::Normal]),
            Err(ModelError::FeatureCount { expected: 1, actual: 0 })
        );
        let mut tree = DecisionTree::new(TreeParams::default(), 0);
        assert!(tree.fit(&[Vec::new(), Vec::new()], &[Label::Normal, Label::Attack]).is_err());

        let (samples, labels) = separable(20);
        forest.fit(&samples, &labels).unwrap();
        assert_eq!(
            forest.predict(&[1.0]),
            Err(ModelError::FeatureCount { expected: 2, actual: 1 })
        );
    }
}
