//! # nids-lab
//!
//! Simulated network intrusion detection: a seeded traffic generator, a
//! random forest classifier and a session object that owns the trained
//! model between a train action and subsequent predictions.
//!
//! ```no_run
//! use nids_lab::dataset::generate;
//! use nids_lab::session::ClassifierSession;
//! use nids_lab::traffic::TrafficRecord;
//!
//! let dataset = generate(42, 1000);
//! let mut session = ClassifierSession::default();
//! let report = session.train(&dataset).unwrap();
//! println!("accuracy: {:.2}", report.accuracy);
//!
//! let label = session.predict(&TrafficRecord::default()).unwrap();
//! println!("verdict: {}", label);
//! ```

pub mod config;
pub mod console;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod forest;
pub mod session;
pub mod traffic;
pub mod ui;

pub use config::Config;
pub use dataset::{DatasetGenerator, TrainingDataset};
pub use error::{InputError, ModelError, SessionError};
pub use forest::{Classifier, RandomForest};
pub use session::{ClassifierSession, PredictionOutcome, TrainingReport};
pub use traffic::{Feature, Label, TrafficRecord};
