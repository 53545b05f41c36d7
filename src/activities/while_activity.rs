use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::condition::{Condition, Trigger};
use super::lifecycle::ActivityCore;
use super::sequential::{self, Sequence};
use super::Activity;
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

fn default_max_iterations() -> u64 {
    1_000_000
}

fn require_sub_processes(core: &ActivityCore, sub_processes: &[Activity]) -> Result<(), SimulationError> {
    if sub_processes.is_empty() {
        Err(SimulationError::InvalidActivityConfiguration(format!(
            "{} has no sub processes to repeat",
            core.name()
        )))
    } else {
        Ok(())
    }
}

/// The while activity runs its sub-activities in sequence, over and over,
/// until its condition fires.  The condition is armed when the activity
/// starts and checked before every iteration, so a running iteration is
/// always completed.
#[derive(Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct WhileActivity {
    sub_processes: Vec<Activity>,
    condition_event: Condition,
    #[serde(default = "default_max_iterations")]
    max_iterations: u64,
    #[serde(skip)]
    state: State,
}

#[derive(Clone, Default)]
struct State {
    trigger: Option<Trigger>,
    iteration: u64,
    sequence: Sequence,
}

impl WhileActivity {
    pub fn new(sub_processes: Vec<Activity>, condition_event: Condition) -> Self {
        Self {
            sub_processes,
            condition_event,
            max_iterations: default_max_iterations(),
            state: State::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn iterations(&self) -> u64 {
        self.state.iteration
    }
}

impl ActivityModel for WhileActivity {
    fn acquire(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        require_sub_processes(core, &self.sub_processes)?;
        self.state.trigger = Some(Trigger::arm(&self.condition_event, world)?);
        Ok(true)
    }

    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        loop {
            if self.state.sequence.is_fresh() {
                let fired = match self.state.trigger.as_mut() {
                    Some(trigger) => trigger.fired(world)?,
                    None => return Err(SimulationError::InvalidActivityState),
                };
                if fired || self.state.iteration >= self.max_iterations {
                    return Ok(true);
                }
            }
            if !self
                .state
                .sequence
                .run(&mut self.sub_processes, core, world, services)?
            {
                return Ok(false);
            }
            self.state.iteration += 1;
            self.state.sequence = Sequence::default();
        }
    }

    fn time_advance(&mut self, time_delta: f64) {
        sequential::time_advance(&mut self.sub_processes, time_delta);
    }

    fn until_next_event(&self) -> f64 {
        sequential::until_next_event(&self.sub_processes)
    }

    fn reset(&mut self) {
        self.state = State::default();
    }

    fn sub_activities(&self) -> Vec<&Activity> {
        self.sub_processes.iter().collect()
    }

    fn status(&self) -> String {
        format!(
            "Iteration {}: {}",
            self.state.iteration,
            sequential::sub_process_status(&self.sub_processes, self.state.sequence.current())
        )
    }
}

/// The repeat activity runs its sub-activities in sequence a fixed number
/// of times.
#[derive(Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct RepeatActivity {
    sub_processes: Vec<Activity>,
    repetitions: u64,
    #[serde(skip)]
    state: RepeatState,
}

#[derive(Clone, Default)]
struct RepeatState {
    iteration: u64,
    sequence: Sequence,
}

impl RepeatActivity {
    pub fn new(sub_processes: Vec<Activity>, repetitions: u64) -> Self {
        Self {
            sub_processes,
            repetitions,
            state: RepeatState::default(),
        }
    }
}

impl ActivityModel for RepeatActivity {
    fn acquire(
        &mut self,
        core: &mut ActivityCore,
        _world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        require_sub_processes(core, &self.sub_processes)?;
        Ok(true)
    }

    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        while self.state.iteration < self.repetitions {
            if !self
                .state
                .sequence
                .run(&mut self.sub_processes, core, world, services)?
            {
                return Ok(false);
            }
            self.state.iteration += 1;
            self.state.sequence = Sequence::default();
        }
        Ok(true)
    }

    fn time_advance(&mut self, time_delta: f64) {
        sequential::time_advance(&mut self.sub_processes, time_delta);
    }

    fn until_next_event(&self) -> f64 {
        sequential::until_next_event(&self.sub_processes)
    }

    fn reset(&mut self) {
        self.state = RepeatState::default();
    }

    fn sub_activities(&self) -> Vec<&Activity> {
        self.sub_processes.iter().collect()
    }

    fn status(&self) -> String {
        format!(
            "Repetition {} of {}: {}",
            self.state.iteration + 1,
            self.repetitions,
            sequential::sub_process_status(&self.sub_processes, self.state.sequence.current())
        )
    }
}
