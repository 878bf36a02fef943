//! Line-oriented interactive session.
//!
//! Reads one command per line and writes the response, so a whole train /
//! probe session can be scripted through a pipe:
//!
//! ```text
//! $ printf 'predict\ntrain\nset count 80\npredict\n' | nids-lab console
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use tracing::{debug, info};

use crate::config::Config;
use crate::dataset::{DatasetGenerator, TrainingDataset};
use crate::error::Result;
use crate::export::{
    describe_record, export_prediction, export_records, export_report, export_summary,
    OutputFormat,
};
use crate::session::{ClassifierSession, PredictionOutcome};
use crate::traffic::{Feature, TrafficRecord};

const HELP: &str = "\
Commands:
  train                 Train the model on the simulated dataset
  preview [rows]        Show the first rows of the dataset
  summary               Show per-feature statistics and label balance
  show                  Show the current input values
  set <field> <value>   Set an input (packet_size, duration, src_bytes, dst_bytes, count)
  defaults              Restore default input values
  predict               Predict the traffic type of the current input
  status                Show the session state
  reset                 Discard the trained model
  help                  Show this help
  quit                  Leave the session";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Train,
    Preview(Option<usize>),
    Summary,
    Show,
    Set(Feature, String),
    Defaults,
    Predict,
    Status,
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("Empty command".to_string());
        };

        let command = match head.to_lowercase().as_str() {
            "train" | "t" => Command::Train,
            "preview" | "head" => match parts.next() {
                Some(n) => Command::Preview(Some(
                    n.parse()
                        .map_err(|_| format!("Invalid row count: {}", n))?,
                )),
                None => Command::Preview(None),
            },
            "summary" | "describe" => Command::Summary,
            "show" | "input" => Command::Show,
            "set" => {
                let field = parts.next().ok_or("Usage: set <field> <value>")?;
                let value = parts.next().ok_or("Usage: set <field> <value>")?;
                let feature = field.parse::<Feature>().map_err(|e| e.to_string())?;
                Command::Set(feature, value.to_string())
            }
            "defaults" => Command::Defaults,
            "predict" | "p" => Command::Predict,
            "status" => Command::Status,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        };

        if parts.next().is_some() {
            return Err(format!("Too many arguments for '{}'", head));
        }
        Ok(command)
    }
}

/// Response to one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// Console session state: dataset, classifier session and current input.
pub struct Console {
    dataset: TrainingDataset,
    session: ClassifierSession,
    input: TrafficRecord,
    preview_rows: usize,
    format: OutputFormat,
}

impl Console {
    pub fn new(config: &Config) -> Self {
        Self {
            dataset: DatasetGenerator::from_config(&config.dataset).generate(),
            session: ClassifierSession::new(config.model.clone()),
            input: TrafficRecord::default(),
            preview_rows: config.ui.preview_rows,
            format: config.output.format,
        }
    }

    pub fn session(&self) -> &ClassifierSession {
        &self.session
    }

    pub fn input(&self) -> &TrafficRecord {
        &self.input
    }

    /// Parses and executes one input line.
    pub fn execute_line(&mut self, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => Reply::text(e),
        }
    }

    pub fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Console command");
        match command {
            Command::Train => match self.session.train(&self.dataset) {
                Ok(report) => Reply::text(export_report(&report, self.format)),
                Err(e) => Reply::text(format!("Training failed: {}", e)),
            },
            Command::Preview(rows) => {
                let rows = rows.unwrap_or(self.preview_rows);
                Reply::text(export_records(self.dataset.head(rows), self.format))
            }
            Command::Summary => Reply::text(export_summary(&self.dataset.summary(), self.format)),
            Command::Show => Reply::text(describe_record(&self.input)),
            Command::Set(feature, raw) => {
                match feature
                    .parse_value(&raw)
                    .and_then(|v| self.input.set(feature, v))
                {
                    Ok(()) => Reply::text(format!(
                        "{} = {}",
                        feature.name(),
                        feature.format_value(self.input.get(feature))
                    )),
                    Err(e) => Reply::text(e.to_string()),
                }
            }
            Command::Defaults => {
                self.input = TrafficRecord::default();
                Reply::text(describe_record(&self.input))
            }
            Command::Predict => self.predict(),
            Command::Status => {
                let mut text = format!("Session: {}", self.session.state());
                if let Some(report) = self.session.last_report() {
                    text.push_str(&format!(
                        " (accuracy {:.2}, {} trees)",
                        report.accuracy, report.n_estimators
                    ));
                }
                Reply::text(text)
            }
            Command::Reset => {
                self.session.reset();
                Reply::text("Model discarded. Train again before predicting.")
            }
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                text: String::new(),
                quit: true,
            },
        }
    }

    fn predict(&self) -> Reply {
        match self.session.assess(&self.input) {
            Ok(outcome) => {
                let probability = match outcome {
                    PredictionOutcome::Untrained => None,
                    _ => self.session.attack_probability(&self.input).ok(),
                };
                Reply::text(export_prediction(&self.input, outcome, probability, self.format))
            }
            Err(e) => Reply::text(format!("Prediction failed: {}", e)),
        }
    }

    /// Runs until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        info!(records = self.dataset.len(), "Console session started");
        writeln!(writer, "nids-lab console. Type 'help' for commands.")?;

        for line in reader.lines() {
            let line = line.context("Failed to read console input")?;
            if line.trim().is_empty() {
                continue;
            }

            let reply = self.execute_line(&line);
            if !reply.text.is_empty() {
                writeln!(writer, "{}", reply.text)?;
            }
            writer.flush()?;
            if reply.quit {
                break;
            }
        }

        info!(trainings = self.session.trainings(), "Console session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_console() -> Console {
        let mut config = Config::default();
        config.dataset.size = 200;
        config.model.n_estimators = 10;
        Console::new(&config)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("train".parse::<Command>().unwrap(), Command::Train);
        assert_eq!("preview 3".parse::<Command>().unwrap(), Command::Preview(Some(3)));
        assert_eq!("PREVIEW".parse::<Command>().unwrap(), Command::Preview(None));
        assert_eq!(
            "set packet_size 640".parse::<Command>().unwrap(),
            Command::Set(Feature::PacketSize, "640".to_string())
        );
        assert!("set packet_size".parse::<Command>().is_err());
        assert!("set ttl 4".parse::<Command>().is_err());
        assert!("preview many".parse::<Command>().is_err());
        assert!("train now".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_predict_before_train_warns() {
        let mut console = small_console();
        let reply = console.execute(Command::Predict);
        assert!(reply.text.contains("Please train the model first."));
        assert!(!reply.quit);
    }

    #[test]
    fn test_train_then_predict() {
        let mut console = small_console();
        let reply = console.execute(Command::Train);
        assert!(reply.text.contains("Accuracy"));
        assert!(console.session().is_trained());

        let reply = console.execute(Command::Predict);
        assert!(
            reply.text.contains("Normal traffic detected")
                || reply.text.contains("Intrusion / attack detected"),
            "unexpected reply: {}",
            reply.text
        );
    }

    #[test]
    fn test_set_validates_range() {
        let mut console = small_console();
        let reply = console.execute_line("set count 500");
        assert!(reply.text.contains("must be between"));
        assert_eq!(console.input().count, 10);

        let reply = console.execute_line("set duration 2.5");
        assert_eq!(reply.text, "duration = 2.50");
        assert_eq!(console.input().duration, 2.5);

        console.execute(Command::Defaults);
        assert_eq!(*console.input(), TrafficRecord::default());
    }

    #[test]
    fn test_reset_returns_to_untrained() {
        let mut console = small_console();
        assert_eq!(console.execute(Command::Status).text, "Session: created");
        console.execute(Command::Train);
        assert!(console.execute(Command::Status).text.starts_with("Session: trained (accuracy"));
        console.execute(Command::Reset);
        assert_eq!(console.execute(Command::Status).text, "Session: reset");
        let reply = console.execute(Command::Predict);
        assert!(reply.text.contains("Please train the model first."));
    }

    #[test]
    fn test_run_scripted_session() {
        let mut console = small_console();
        let script = "predict\npreview 2\n\ntrain\npredict\nquit\npredict\n";
        let mut out = Vec::new();
        console.run(script.as_bytes(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Please train the model first."));
        assert!(out.contains("packet_size"));
        assert!(out.contains("Model trained successfully!"));
        assert_eq!(console.session().trainings(), 1);
    }
}
