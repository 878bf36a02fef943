//! nids-lab: interactive network intrusion detection demo.
//!
//! Simulates labeled network traffic, trains a random forest on it and lets
//! the user probe the trained model with hand-entered feature values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  Generator  │────>│ ClassifierSession │<────│  UI/Console  │
//! │ (seeded RNG)│     │ (RandomForest)    │     │  (ratatui)   │
//! └─────────────┘     └──────────────────┘     └──────────────┘
//! ```
//!
//! - **Generator**: deterministic synthetic traffic with independent labels
//! - **Session**: owns at most one fitted model; train / predict / reset
//! - **Surfaces**: terminal form, line console, one-shot subcommands

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nids_lab::config::Config;
use nids_lab::console::Console;
use nids_lab::dataset::DatasetGenerator;
use nids_lab::export::{export_prediction, export_records, export_report, export_summary, OutputFormat};
use nids_lab::session::{ClassifierSession, PredictionOutcome};
use nids_lab::traffic::{Feature, TrafficRecord};
use nids_lab::ui;

/// nids-lab: train and probe a simulated intrusion detector.
#[derive(Parser, Debug)]
#[command(name = "nids-lab")]
#[command(version = "0.1.0")]
#[command(about = "Train a random forest on simulated network traffic and probe it interactively")]
#[command(long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (writes to stderr; ignored by the TUI).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive terminal form (default).
    Ui,

    /// Run a line-oriented session on stdin/stdout.
    Console {
        /// Output format: text, json, jsonl.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print the simulated dataset.
    Generate {
        /// Number of rows to print (default: all).
        #[arg(short, long)]
        rows: Option<usize>,

        /// Print column statistics instead of rows.
        #[arg(long)]
        summary: bool,

        /// Output format: text, json, jsonl.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Train the model once and print the evaluation report.
    Train {
        /// Output format: text, json, jsonl.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Predict the traffic type of one record.
    Predict {
        #[command(flatten)]
        input: RecordArgs,

        /// Train the model before predicting.
        #[arg(long)]
        train: bool,

        /// Output format: text, json, jsonl.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print the default configuration file.
    Config,
}

/// Feature values for a one-shot prediction.
#[derive(Args, Debug)]
struct RecordArgs {
    /// Packet size in bytes (40-1500).
    #[arg(long, default_value_t = 500)]
    packet_size: u32,

    /// Connection duration in seconds (0-10).
    #[arg(long, default_value_t = 1.0)]
    duration: f64,

    /// Bytes sent by the source (0-10000).
    #[arg(long, default_value_t = 2000)]
    src_bytes: u32,

    /// Bytes sent by the destination (0-10000).
    #[arg(long, default_value_t = 3000)]
    dst_bytes: u32,

    /// Connections in the window (1-100).
    #[arg(long, default_value_t = 10)]
    count: u32,
}

impl RecordArgs {
    fn to_record(&self) -> Result<TrafficRecord> {
        let mut record = TrafficRecord::default();
        let values = [
            (Feature::PacketSize, self.packet_size as f64),
            (Feature::Duration, self.duration),
            (Feature::SrcBytes, self.src_bytes as f64),
            (Feature::DstBytes, self.dst_bytes as f64),
            (Feature::Count, self.count as f64),
        ];
        for (feature, value) in values {
            record.set(feature, value)?;
        }
        Ok(record)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.output.verbose |= cli.verbose;
    config.validate().context("Invalid configuration")?;

    // The TUI owns the terminal, so it gets no log subscriber.
    if !matches!(command, Commands::Ui) {
        let log_level = if config.output.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_target(false)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to set tracing subscriber")?;
    }

    match command {
        Commands::Ui => ui::run_ui(&config),

        Commands::Console { format } => {
            if let Some(format) = format {
                config.output.format = format;
            }
            let stdin = io::stdin();
            Console::new(&config).run(stdin.lock(), io::stdout())
        }

        Commands::Generate {
            rows,
            summary,
            format,
        } => {
            let format = format.unwrap_or(config.output.format);
            let dataset = DatasetGenerator::from_config(&config.dataset).generate();
            let output = if summary {
                export_summary(&dataset.summary(), format)
            } else {
                export_records(dataset.head(rows.unwrap_or(dataset.len())), format)
            };
            println!("{}", output);
            Ok(())
        }

        Commands::Train { format } => {
            let format = format.unwrap_or(config.output.format);
            let dataset = DatasetGenerator::from_config(&config.dataset).generate();
            let mut session = ClassifierSession::new(config.model.clone());
            let report = session.train(&dataset).context("Training failed")?;
            println!("{}", export_report(&report, format));
            Ok(())
        }

        Commands::Predict {
            input,
            train,
            format,
        } => {
            let format = format.unwrap_or(config.output.format);
            let record = input.to_record()?;
            let mut session = ClassifierSession::new(config.model.clone());

            if train {
                let dataset = DatasetGenerator::from_config(&config.dataset).generate();
                let report = session.train(&dataset).context("Training failed")?;
                info!("Model trained, accuracy {:.2}", report.accuracy);
            }

            let outcome = session.assess(&record).context("Prediction failed")?;
            let probability = match outcome {
                PredictionOutcome::Untrained => None,
                _ => session.attack_probability(&record).ok(),
            };
            println!("{}", export_prediction(&record, outcome, probability, format));
            Ok(())
        }

        Commands::Config => {
            print!("{}", Config::generate_default());
            Ok(())
        }
    }
}
