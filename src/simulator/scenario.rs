use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Simulation;
use crate::activities::Activity;
use crate::concepts::Concept;
use crate::utils::errors::SimulationError;

/// A complete simulation configuration: the concepts, the top level
/// activities, and an optional start time.  Scenarios are read from YAML or
/// JSON, with activities built by the activity factory from their `type`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Scenario {
    pub fn from_yaml(scenario: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(scenario)?)
    }

    pub fn from_json(scenario: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(scenario)?)
    }

    pub fn to_yaml(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn into_simulation(self) -> Simulation {
        let simulation = Simulation::post(self.concepts, self.activities);
        match self.start_time {
            Some(start_time) => simulation.with_start_time(start_time),
            None => simulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_read_start_time_and_activities() {
        let scenario = Scenario::from_yaml(
            "
startTime: 2021-01-01T00:00:00Z
concepts:
  - name: site
    id: site
    geometry: {lon: 4.0, lat: 52.0}
activities:
  - name: wait
    id: wait
    type: BasicActivity
    duration: 10
",
        )
        .unwrap();
        assert_eq!(scenario.concepts.len(), 1);
        assert_eq!(scenario.activities[0].get_type(), "BasicActivity");
        let simulation = scenario.into_simulation();
        assert_eq!(simulation.get_global_time(), 1_609_459_200.0);
    }

    #[test]
    fn unknown_activity_types_are_rejected() {
        let scenario = Scenario::from_json(
            r#"{"activities": [{"name": "x", "type": "TeleportActivity"}]}"#,
        );
        assert!(scenario.is_err());
    }
}
