//! Export Module
//!
//! Renders datasets, training reports and predictions as plain text,
//! pretty JSON, or JSON Lines for piping into other tools.

use serde::Serialize;

use crate::dataset::DatasetSummary;
use crate::session::{PredictionOutcome, TrainingReport};
use crate::traffic::{Feature, LabeledRecord, TrafficRecord};

/// Output format for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonLines, // One JSON object per line (JSONL)
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" => Ok(Self::JsonLines),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::JsonLines => write!(f, "jsonl"),
        }
    }
}

/// JSON-serializable prediction result
#[derive(Serialize)]
pub struct JsonPrediction<'a> {
    pub input: &'a TrafficRecord,
    pub outcome: PredictionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_probability: Option<f64>,
    pub message: &'static str,
}

/// Exports dataset rows in the specified format
pub fn export_records(records: &[LabeledRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => records_table(records),
        OutputFormat::Json => to_pretty(&records),
        OutputFormat::JsonLines => records
            .iter()
            .filter_map(|r| serde_json::to_string(r).ok())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Exports a training report in the specified format
pub fn export_report(report: &TrainingReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => report_text(report),
        OutputFormat::Json => to_pretty(report),
        OutputFormat::JsonLines => serde_json::to_string(report).unwrap_or_default(),
    }
}

/// Exports a prediction in the specified format
pub fn export_prediction(
    input: &TrafficRecord,
    outcome: PredictionOutcome,
    attack_probability: Option<f64>,
    format: OutputFormat,
) -> String {
    let json = JsonPrediction {
        input,
        outcome,
        label: outcome.label().map(|l| l.as_u8()),
        attack_probability,
        message: outcome.message(),
    };

    match format {
        OutputFormat::Text => {
            let mut out = format!("Input:  {}\n", describe_record(input));
            out.push_str(&format!("Result: {}", outcome.message()));
            if let Some(p) = attack_probability {
                out.push_str(&format!(" (attack probability: {})", format_percent(p)));
            }
            out
        }
        OutputFormat::Json => to_pretty(&json),
        OutputFormat::JsonLines => serde_json::to_string(&json).unwrap_or_default(),
    }
}

/// Exports a dataset summary in the specified format
pub fn export_summary(summary: &DatasetSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => summary_text(summary),
        OutputFormat::Json => to_pretty(summary),
        OutputFormat::JsonLines => serde_json::to_string(summary).unwrap_or_default(),
    }
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

fn records_table(records: &[LabeledRecord]) -> String {
    let mut out = format!(
        "{:>5} {:>11} {:>9} {:>9} {:>9} {:>6} {:>6}\n",
        "#", "packet_size", "duration", "src_bytes", "dst_bytes", "count", "label"
    );
    out.push_str(&"-".repeat(62));

    for (i, r) in records.iter().enumerate() {
        let rec = &r.record;
        out.push_str(&format!(
            "\n{:>5} {:>11} {:>9.3} {:>9} {:>9} {:>6} {:>6}",
            i,
            rec.packet_size,
            rec.duration,
            rec.src_bytes,
            rec.dst_bytes,
            rec.count,
            r.label.as_u8()
        ));
    }
    out
}

fn report_text(report: &TrainingReport) -> String {
    let c = &report.confusion;
    let lines = [
        format!("Model trained successfully! Accuracy: {:.2}", report.accuracy),
        format!(
            "Trees: {}  Train records: {}  Evaluation records: {}",
            report.n_estimators, report.train_size, report.test_size
        ),
        format!("Majority-class baseline: {:.2}", report.baseline_accuracy),
        String::new(),
        "Confusion matrix (rows = actual, cols = predicted):".to_string(),
        format!("{:>10} {:>8} {:>8}", "", "normal", "attack"),
        format!("{:>10} {:>8} {:>8}", "normal", c.true_negative, c.false_positive),
        format!("{:>10} {:>8} {:>8}", "attack", c.false_negative, c.true_positive),
        String::new(),
        format!(
            "Attack precision: {}  recall: {}",
            format_percent(c.precision()),
            format_percent(c.recall())
        ),
        format!("Trained at: {}", report.trained_at.format("%Y-%m-%d %H:%M:%S UTC")),
    ];
    lines.join("\n")
}

fn summary_text(summary: &DatasetSummary) -> String {
    let mut out = format!(
        "Dataset: {} records (seed {})\n\n{:<12} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        summary.records, summary.seed, "feature", "mean", "std", "min", "median", "max"
    );
    out.push_str(&"-".repeat(67));

    for f in &summary.features {
        out.push_str(&format!(
            "\n{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            f.feature.name(),
            f.mean,
            f.std_dev,
            f.min,
            f.median,
            f.max
        ));
    }

    out.push_str(&format!(
        "\n\nLabels: {} normal / {} attack ({} attack)",
        summary.balance.normal,
        summary.balance.attack,
        format_percent(summary.balance.attack_fraction())
    ));
    out
}

/// One-line `name=value` rendering of a record.
pub fn describe_record(record: &TrafficRecord) -> String {
    Feature::ALL
        .iter()
        .map(|f| format!("{}={}", f.name(), f.format_value(record.get(*f))))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a ratio as a percentage.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::generate;
    use crate::traffic::Label;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "jsonl".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonLines
        );
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::JsonLines.to_string(), "jsonl");
    }

    #[test]
    fn test_export_records() {
        let dataset = generate(42, 5);

        let text = export_records(dataset.head(3), OutputFormat::Text);
        assert!(text.contains("packet_size"));
        assert_eq!(text.lines().count(), 5);

        let jsonl = export_records(dataset.records(), OutputFormat::JsonLines);
        assert_eq!(jsonl.lines().count(), 5);
        let first: serde_json::Value = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert!(first.get("packet_size").is_some());
        assert!(first.get("label").unwrap().is_u64());

        let json: serde_json::Value =
            serde_json::from_str(&export_records(dataset.records(), OutputFormat::Json)).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_export_prediction() {
        let record = TrafficRecord::default();

        let untrained = export_prediction(&record, PredictionOutcome::Untrained, None, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&untrained).unwrap();
        assert_eq!(value["outcome"], "untrained");
        assert!(value.get("label").is_none());

        let attack = export_prediction(
            &record,
            PredictionOutcome::from(Label::Attack),
            Some(0.62),
            OutputFormat::JsonLines,
        );
        let value: serde_json::Value = serde_json::from_str(&attack).unwrap();
        assert_eq!(value["label"], 1);
        assert_eq!(value["input"]["packet_size"], 500);

        let text = export_prediction(&record, PredictionOutcome::Normal, Some(0.25), OutputFormat::Text);
        assert!(text.contains("packet_size=500"));
        assert!(text.contains("duration=1.00"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn test_export_summary_text() {
        let text = export_summary(&generate(42, 100).summary(), OutputFormat::Text);
        assert!(text.contains("Dataset: 100 records (seed 42)"));
        assert!(text.contains("dst_bytes"));
        assert!(text.contains("Labels:"));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.7), "70.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
