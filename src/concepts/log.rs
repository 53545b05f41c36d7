use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::locatable::Point;
use crate::utils::errors::SimulationError;

/// The states an activity, or a concept taking part in an activity, can
/// report in a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogState {
    Start,
    Stop,
    WaitStart,
    WaitStop,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelKind {
    #[serde(rename = "subprocess")]
    Subprocess,
    #[serde(rename = "additional log")]
    AdditionalLog,
    #[serde(rename = "plugin")]
    Plugin,
}

impl LabelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Subprocess => "subprocess",
            LabelKind::AdditionalLog => "additional log",
            LabelKind::Plugin => "plugin",
        }
    }
}

/// Labels qualify an entry, for example the sub-activity a structural
/// activity started, or the plugin that delayed an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLabel {
    #[serde(rename = "type")]
    pub kind: LabelKind,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl ActivityLabel {
    pub fn new(kind: LabelKind, reference: &str) -> Self {
        Self {
            kind,
            reference: reference.to_string(),
        }
    }
}

/// The state of the logging entity at the time of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_level: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: f64,
    pub activity_id: String,
    pub activity_state: LogState,
    #[serde(default)]
    pub object_state: ObjectState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_label: Option<ActivityLabel>,
}

impl LogEntry {
    /// The entry timestamp as a UTC date, with simulation time interpreted
    /// as seconds since the Unix epoch.
    pub fn datetime(&self) -> Result<DateTime<Utc>, SimulationError> {
        to_datetime(self.timestamp)
    }
}

pub fn to_datetime(timestamp: f64) -> Result<DateTime<Utc>, SimulationError> {
    if !timestamp.is_finite() {
        return Err(SimulationError::InvalidTimestamp(timestamp));
    }
    let seconds = timestamp.floor();
    let nanos = ((timestamp - seconds) * 1e9).round().min(999_999_999.0);
    Utc.timestamp_opt(seconds as i64, nanos as u32)
        .single()
        .ok_or(SimulationError::InvalidTimestamp(timestamp))
}

/// An append-only record of the activities an entity took part in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    pub fn entry(
        &mut self,
        timestamp: f64,
        activity_id: &str,
        activity_state: LogState,
        object_state: ObjectState,
        activity_label: Option<ActivityLabel>,
    ) {
        self.entries.push(LogEntry {
            timestamp,
            activity_id: activity_id.to_string(),
            activity_state,
            object_state,
            activity_label,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of entries with the given state.
    pub fn count(&self, state: LogState) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.activity_state == state)
            .count()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_serialize_in_upper_case() {
        assert_eq!(
            serde_json::to_string(&LogState::WaitStart).unwrap(),
            "\"WAIT_START\""
        );
        let label = ActivityLabel::new(LabelKind::AdditionalLog, "abc");
        assert_eq!(
            serde_json::to_string(&label).unwrap(),
            r#"{"type":"additional log","ref":"abc"}"#
        );
    }

    #[test]
    fn timestamps_convert_to_utc_dates() {
        let date = to_datetime(1_577_836_800.5).unwrap();
        assert_eq!(date.to_rfc3339(), "2020-01-01T00:00:00.500+00:00");
        assert!(to_datetime(f64::NAN).is_err());
    }

    #[test]
    fn entries_are_counted_by_state() {
        let mut log = Log::default();
        log.entry(0.0, "a", LogState::Start, ObjectState::default(), None);
        log.entry(3.0, "a", LogState::Stop, ObjectState::default(), None);
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(LogState::Start), 1);
        assert_eq!(log.count(LogState::WaitStop), 0);
        assert_eq!(log.last().map(|entry| entry.timestamp), Some(3.0));
    }
}
