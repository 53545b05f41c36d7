//! The output analysis module turns the logs of activities and concepts
//! into tables and series for reporting.  Log tables resolve activity ids
//! to names and simulation times to UTC dates, level series follow the
//! containers of a concept over time, and event logs combine the logs of
//! several activities.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activities::Activity;
use crate::concepts::{Concept, Identifiable, Log, LogEntry, LogState, Point};
use crate::utils::errors::SimulationError;

/// One row of a log table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRow {
    pub activity: String,
    pub timestamp: DateTime<Utc>,
    pub activity_state: LogState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_level: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ref: Option<String>,
}

fn collect_names<'a>(activity: &'a Activity, names: &mut BTreeMap<&'a str, &'a str>) {
    names.insert(activity.id(), activity.name());
    for sub_activity in activity.sub_activities() {
        collect_names(sub_activity, names);
    }
}

/// The activity names by id, including nested sub-activities.
pub fn activity_names<'a>(activities: &[&'a Activity]) -> BTreeMap<&'a str, &'a str> {
    let mut names = BTreeMap::new();
    activities
        .iter()
        .for_each(|activity| collect_names(*activity, &mut names));
    names
}

/// A table of the entries of a log, sorted by timestamp.  Activity ids
/// are replaced by the names of the given activities, where known.
pub fn get_log_table(log: &Log, activities: &[&Activity]) -> Result<Vec<LogRow>, SimulationError> {
    let names = activity_names(activities);
    let mut entries: Vec<&LogEntry> = log.entries().iter().collect();
    entries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    entries
        .into_iter()
        .map(|entry| {
            let activity = names
                .get(entry.activity_id.as_str())
                .map_or_else(|| entry.activity_id.clone(), |name| name.to_string());
            let (label_type, label_ref) = match &entry.activity_label {
                Some(label) => (
                    Some(label.kind.as_str().to_string()),
                    Some(label.reference.clone()),
                ),
                None => (None, None),
            };
            Ok(LogRow {
                activity,
                timestamp: entry.datetime()?,
                activity_state: entry.activity_state,
                container_level: entry.object_state.container_level.clone(),
                geometry: entry.object_state.geometry,
                label_type,
                label_ref,
            })
        })
        .collect()
}

/// The container levels of a concept over time, per container id, as
/// `(time, level)` steps.  Consecutive entries with an unchanged level are
/// merged.
pub fn get_level_series(concept: &Concept) -> BTreeMap<String, Vec<(f64, f64)>> {
    let mut series: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for entry in concept.log().entries() {
        if let Some(levels) = &entry.object_state.container_level {
            for (id, level) in levels {
                let steps = series.entry(id.clone()).or_default();
                if steps.last().map_or(true, |(_, last)| last != level) {
                    steps.push((entry.timestamp, *level));
                }
            }
        }
    }
    if let Ok(container) = concept.container() {
        for (id, level) in container.levels() {
            let steps = series.entry(id).or_default();
            if steps.last().map_or(true, |(_, last)| *last != level) {
                let time = concept.log().last().map_or(0.0, |entry| entry.timestamp);
                steps.push((time, level));
            }
        }
    }
    series
}

/// The entries of several activities, combined and sorted by timestamp.
/// At equal timestamps, starts come after all other states, so an
/// activity handing over to the next reads as a stop followed by a start.
pub fn get_event_log<'a>(activities: &[&'a Activity]) -> Vec<&'a LogEntry> {
    let mut entries: Vec<&LogEntry> = activities
        .iter()
        .flat_map(|activity: &&'a Activity| (*activity).log().entries())
        .collect();
    entries.sort_by(|a, b| {
        a.timestamp.total_cmp(&b.timestamp).then_with(|| {
            (a.activity_state == LogState::Start).cmp(&(b.activity_state == LogState::Start))
        })
    });
    entries
}

/// The time, in hours, spanned by the event log of the given activities,
/// waits and plugin delays included.  Zero when nothing was logged.
pub fn project_length(activities: &[&Activity]) -> f64 {
    let entries = get_event_log(activities);
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => (last.timestamp - first.timestamp) / 3600.0,
        _ => 0.0,
    }
}
