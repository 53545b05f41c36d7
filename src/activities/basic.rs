use std::f64::INFINITY;

use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::lifecycle::ActivityCore;
use crate::concepts::{ActivityLabel, LabelKind, LogState};
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

/// The basic activity takes a fixed amount of time, and requires no
/// resources.  Its start and stop are mirrored on the logs of the
/// additional log concepts.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct BasicActivity {
    duration: f64,
    #[serde(default)]
    additional_logs: Vec<String>,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone)]
struct State {
    phase: Phase,
    until_next_event: f64,
}

impl Default for State {
    fn default() -> Self {
        State {
            phase: Phase::Passive,
            until_next_event: INFINITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Passive,
    Active,
}

impl BasicActivity {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            additional_logs: Vec::new(),
            state: State::default(),
        }
    }

    pub fn with_additional_logs(mut self, additional_logs: Vec<String>) -> Self {
        self.additional_logs = additional_logs;
        self
    }

    fn log_additional(
        &self,
        core: &ActivityCore,
        world: &mut World,
        timestamp: f64,
        state: LogState,
    ) -> Result<(), SimulationError> {
        let label = ActivityLabel::new(LabelKind::AdditionalLog, core.id());
        self.additional_logs.iter().try_for_each(|concept| {
            world.log_entry(concept, timestamp, core.id(), state, Some(label.clone()))
        })
    }
}

impl ActivityModel for BasicActivity {
    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        if self.state.phase == Phase::Passive {
            self.log_additional(core, world, services.global_time(), LogState::Start)?;
            self.state.phase = Phase::Active;
            self.state.until_next_event = self.duration;
        }
        if self.state.until_next_event > 0.0 {
            return Ok(false);
        }
        self.log_additional(core, world, services.global_time(), LogState::Stop)?;
        self.state = State::default();
        Ok(true)
    }

    fn time_advance(&mut self, time_delta: f64) {
        self.state.until_next_event -= time_delta;
    }

    fn until_next_event(&self) -> f64 {
        self.state.until_next_event
    }

    fn reset(&mut self) {
        self.state = State::default();
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn additional_logs(&self) -> &[String] {
        &self.additional_logs
    }

    fn status(&self) -> String {
        match self.state.phase {
            Phase::Active => String::from("Active"),
            Phase::Passive => String::from("Passive"),
        }
    }
}
