//! Traffic record model.
//!
//! A traffic record is a fixed five-feature vector describing one simulated
//! network connection. Each feature carries the bounds and default used by
//! the interactive surfaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Number of features in a traffic record.
pub const NUM_FEATURES: usize = 5;

/// One of the five traffic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PacketSize,
    Duration,
    SrcBytes,
    DstBytes,
    Count,
}

impl Feature {
    /// All features in column order.
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::PacketSize,
        Feature::Duration,
        Feature::SrcBytes,
        Feature::DstBytes,
        Feature::Count,
    ];

    /// Column name used in tables, config and console commands.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PacketSize => "packet_size",
            Self::Duration => "duration",
            Self::SrcBytes => "src_bytes",
            Self::DstBytes => "dst_bytes",
            Self::Count => "count",
        }
    }

    /// Human-readable label for form fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PacketSize => "Packet Size",
            Self::Duration => "Duration (seconds)",
            Self::SrcBytes => "Source Bytes",
            Self::DstBytes => "Destination Bytes",
            Self::Count => "Connection Count",
        }
    }

    /// Inclusive lower bound for entered values.
    pub fn min(&self) -> f64 {
        match self {
            Self::PacketSize => 40.0,
            Self::Duration => 0.0,
            Self::SrcBytes => 0.0,
            Self::DstBytes => 0.0,
            Self::Count => 1.0,
        }
    }

    /// Inclusive upper bound for entered values.
    pub fn max(&self) -> f64 {
        match self {
            Self::PacketSize => 1500.0,
            Self::Duration => 10.0,
            Self::SrcBytes => 10_000.0,
            Self::DstBytes => 10_000.0,
            Self::Count => 100.0,
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            Self::PacketSize => 500.0,
            Self::Duration => 1.0,
            Self::SrcBytes => 2000.0,
            Self::DstBytes => 3000.0,
            Self::Count => 10.0,
        }
    }

    /// Whether the feature holds whole numbers.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Duration)
    }

    /// Increment used by the form's step keys.
    pub fn step(&self) -> f64 {
        match self {
            Self::Duration => 0.1,
            Self::SrcBytes | Self::DstBytes => 100.0,
            Self::PacketSize => 10.0,
            Self::Count => 1.0,
        }
    }

    /// Column index within a feature vector.
    pub fn index(&self) -> usize {
        match self {
            Self::PacketSize => 0,
            Self::Duration => 1,
            Self::SrcBytes => 2,
            Self::DstBytes => 3,
            Self::Count => 4,
        }
    }

    /// Checks that `value` lies within the feature's closed range.
    pub fn validate(&self, value: f64) -> Result<f64, InputError> {
        if !value.is_finite() || value < self.min() || value > self.max() {
            return Err(InputError::OutOfRange {
                feature: self.name(),
                min: self.min(),
                max: self.max(),
                value,
            });
        }
        Ok(self.normalize(value))
    }

    /// Clamps `value` into range, rounding integer features.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.default_value() } else { value };
        self.normalize(value.clamp(self.min(), self.max()))
    }

    /// Parses raw text into an in-range value for this feature.
    pub fn parse_value(&self, raw: &str) -> Result<f64, InputError> {
        let value: f64 = raw.trim().parse().map_err(|_| InputError::InvalidNumber {
            feature: self.name(),
            raw: raw.to_string(),
        })?;
        self.validate(value)
    }

    /// Formats a value the way the feature is displayed.
    pub fn format_value(&self, value: f64) -> String {
        if self.is_integer() {
            format!("{}", value as i64)
        } else {
            format!("{:.2}", value)
        }
    }

    fn normalize(&self, value: f64) -> f64 {
        if self.is_integer() {
            value.round()
        } else {
            value
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| InputError::UnknownFeature(s.to_string()))
    }
}

/// Binary traffic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Normal = 0,
    Attack = 1,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Attack),
            other => Err(format!("Invalid label {} (expected 0 or 1)", other)),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// One simulated network connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub packet_size: u32,
    pub duration: f64,
    pub src_bytes: u32,
    pub dst_bytes: u32,
    pub count: u32,
}

impl TrafficRecord {
    /// Reads a feature as a float.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::PacketSize => self.packet_size as f64,
            Feature::Duration => self.duration,
            Feature::SrcBytes => self.src_bytes as f64,
            Feature::DstBytes => self.dst_bytes as f64,
            Feature::Count => self.count as f64,
        }
    }

    /// Sets a feature, rejecting out-of-range values.
    pub fn set(&mut self, feature: Feature, value: f64) -> Result<(), InputError> {
        let value = feature.validate(value)?;
        self.assign(feature, value);
        Ok(())
    }

    /// Sets a feature, clamping into range.
    pub fn set_clamped(&mut self, feature: Feature, value: f64) {
        let value = feature.clamp(value);
        self.assign(feature, value);
    }

    fn assign(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::PacketSize => self.packet_size = value as u32,
            Feature::Duration => self.duration = value,
            Feature::SrcBytes => self.src_bytes = value as u32,
            Feature::DstBytes => self.dst_bytes = value as u32,
            Feature::Count => self.count = value as u32,
        }
    }

    /// Feature vector in column order.
    pub fn to_features(&self) -> Vec<f64> {
        Feature::ALL.iter().map(|f| self.get(*f)).collect()
    }
}

impl Default for TrafficRecord {
    fn default() -> Self {
        Self {
            packet_size: Feature::PacketSize.default_value() as u32,
            duration: Feature::Duration.default_value(),
            src_bytes: Feature::SrcBytes.default_value() as u32,
            dst_bytes: Feature::DstBytes.default_value() as u32,
            count: Feature::Count.default_value() as u32,
        }
    }
}

/// A traffic record paired with its training label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    #[serde(flatten)]
    pub record: TrafficRecord,
    pub label: Label,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_matches_form_defaults() {
        let record = TrafficRecord::default();
        assert_eq!(record.packet_size, 500);
        assert_eq!(record.duration, 1.0);
        assert_eq!(record.src_bytes, 2000);
        assert_eq!(record.dst_bytes, 3000);
        assert_eq!(record.count, 10);
        assert_eq!(record.to_features(), vec![500.0, 1.0, 2000.0, 3000.0, 10.0]);
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut record = TrafficRecord::default();
        assert!(record.set(Feature::PacketSize, 39.0).is_err());
        assert!(record.set(Feature::Count, 101.0).is_err());
        assert!(record.set(Feature::Duration, f64::NAN).is_err());
        assert_eq!(record, TrafficRecord::default());

        record.set(Feature::PacketSize, 1500.0).unwrap();
        assert_eq!(record.packet_size, 1500);
    }

    #[test]
    fn test_set_clamped() {
        let mut record = TrafficRecord::default();
        record.set_clamped(Feature::SrcBytes, 25_000.0);
        record.set_clamped(Feature::Count, -4.0);
        record.set_clamped(Feature::Duration, 3.25);
        assert_eq!(record.src_bytes, 10_000);
        assert_eq!(record.count, 1);
        assert_eq!(record.duration, 3.25);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(Feature::PacketSize.parse_value(" 640 ").unwrap(), 640.0);
        assert_eq!(Feature::Count.parse_value("12.6").unwrap(), 13.0);
        assert!(matches!(
            Feature::Duration.parse_value("abc"),
            Err(InputError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Feature::Duration.parse_value("10.5"),
            Err(InputError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_feature_from_str() {
        assert_eq!("packet_size".parse::<Feature>().unwrap(), Feature::PacketSize);
        assert_eq!("DST-BYTES".parse::<Feature>().unwrap(), Feature::DstBytes);
        assert!("ttl".parse::<Feature>().is_err());
    }

    #[test]
    fn test_label_serde() {
        assert_eq!(serde_json::to_string(&Label::Attack).unwrap(), "1");
        let label: Label = serde_json::from_str("0").unwrap();
        assert_eq!(label, Label::Normal);
        assert!(serde_json::from_str::<Label>("2").is_err());
    }
}
