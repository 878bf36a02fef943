//! Classifier session.
//!
//! A session owns at most one fitted model. Training always replaces the
//! current model; prediction without a model yields
//! [`SessionError::Untrained`] instead of a guessed label.
//!
//! ```text
//!   Created ──train──> Trained ──reset──> Reset
//!                       ^  │                │
//!                       └──┘ train          │
//!                       ^───────train───────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::dataset::{ClassBalance, TrainingDataset};
use crate::error::SessionError;
use crate::evaluation::{accuracy, train_test_split, ConfusionMatrix};
use crate::forest::{Classifier, RandomForest};
use crate::traffic::{Label, TrafficRecord};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    Trained,
    Reset,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Trained => write!(f, "trained"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// Outcome of a train action.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Held-out accuracy in [0, 1].
    pub accuracy: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub n_estimators: usize,
    /// Accuracy of always predicting the majority class of the held-out set.
    pub baseline_accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub trained_at: DateTime<Utc>,
}

/// Verdict shown to the user for a predict action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionOutcome {
    /// No model exists yet.
    Untrained,
    Normal,
    Attack,
}

impl PredictionOutcome {
    /// Numeric label, if a prediction was made.
    pub fn label(&self) -> Option<Label> {
        match self {
            Self::Untrained => None,
            Self::Normal => Some(Label::Normal),
            Self::Attack => Some(Label::Attack),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Untrained => "Please train the model first.",
            Self::Normal => "Normal traffic detected",
            Self::Attack => "Intrusion / attack detected",
        }
    }
}

impl From<Label> for PredictionOutcome {
    fn from(label: Label) -> Self {
        match label {
            Label::Normal => Self::Normal,
            Label::Attack => Self::Attack,
        }
    }
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Holds the model for one interactive session.
#[derive(Debug, Clone)]
pub struct ClassifierSession {
    config: ModelConfig,
    model: Option<RandomForest>,
    state: SessionState,
    last_report: Option<TrainingReport>,
    trainings: u64,
}

impl ClassifierSession {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            model: None,
            state: SessionState::Created,
            last_report: None,
            trainings: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn last_report(&self) -> Option<&TrainingReport> {
        self.last_report.as_ref()
    }

    /// Number of successful train actions in this session.
    pub fn trainings(&self) -> u64 {
        self.trainings
    }

    /// Splits the dataset, fits a fresh forest, scores it on the held-out
    /// partition and installs it as the session model.
    pub fn train(&mut self, dataset: &TrainingDataset) -> Result<TrainingReport, SessionError> {
        if dataset.is_empty() {
            return Err(SessionError::EmptyDataset);
        }

        let split = train_test_split(dataset.len(), self.config.test_ratio, self.config.split_seed);
        if split.train.is_empty() || split.test.is_empty() {
            return Err(SessionError::EmptyPartition {
                train: split.train.len(),
                test: split.test.len(),
            });
        }

        let features = dataset.features();
        let labels = dataset.labels();
        let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<Label>) {
            idx.iter()
                .map(|&i| (features[i].clone(), labels[i]))
                .unzip()
        };
        let (x_train, y_train) = pick(&split.train);
        let (x_test, y_test) = pick(&split.test);

        debug!(
            train = x_train.len(),
            test = x_test.len(),
            trees = self.config.n_estimators,
            "Fitting random forest"
        );

        let mut forest = RandomForest::new(self.config.forest_params());
        forest.fit(&x_train, &y_train)?;
        let predicted = forest.predict_batch(&x_test)?;

        let report = TrainingReport {
            accuracy: accuracy(&y_test, &predicted),
            train_size: x_train.len(),
            test_size: x_test.len(),
            n_estimators: forest.n_trees(),
            baseline_accuracy: ClassBalance::from_labels(y_test.iter().copied()).majority_rate(),
            confusion: ConfusionMatrix::from_predictions(&y_test, &predicted),
            trained_at: Utc::now(),
        };

        info!(
            accuracy = report.accuracy,
            baseline = report.baseline_accuracy,
            "Model trained"
        );

        self.model = Some(forest);
        self.state = SessionState::Trained;
        self.last_report = Some(report.clone());
        self.trainings += 1;
        Ok(report)
    }

    /// Predicts the label of `record` with the current model.
    pub fn predict(&self, record: &TrafficRecord) -> Result<Label, SessionError> {
        let model = self.model.as_ref().ok_or(SessionError::Untrained)?;
        let label = model.predict(&record.to_features())?;
        debug!(?record, %label, "Prediction");
        Ok(label)
    }

    /// Attack probability for `record`, averaged over the trees.
    pub fn attack_probability(&self, record: &TrafficRecord) -> Result<f64, SessionError> {
        let model = self.model.as_ref().ok_or(SessionError::Untrained)?;
        Ok(model.predict_proba(&record.to_features())?)
    }

    /// Like [`predict`](Self::predict), folding the untrained condition into
    /// a displayable outcome.
    pub fn assess(&self, record: &TrafficRecord) -> Result<PredictionOutcome, SessionError> {
        match self.predict(record) {
            Ok(label) => Ok(label.into()),
            Err(SessionError::Untrained) => {
                warn!("Prediction requested before training");
                Ok(PredictionOutcome::Untrained)
            }
            Err(e) => Err(e),
        }
    }

    /// Drops the current model.
    pub fn reset(&mut self) {
        self.model = None;
        self.last_report = None;
        self.state = SessionState::Reset;
        info!("Session reset");
    }
}

impl Default for ClassifierSession {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
