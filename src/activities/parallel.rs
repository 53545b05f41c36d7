use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::lifecycle::ActivityCore;
use super::sequential;
use super::Activity;
use crate::concepts::{ActivityLabel, Identifiable, LabelKind, LogState};
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

/// The parallel activity starts all of its sub-activities at once, and
/// stops when the last of them is done.  Each sub-activity is logged with
/// a subprocess START when started and a subprocess STOP when done,
/// referencing the sub-activity.
#[derive(Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct ParallelActivity {
    sub_processes: Vec<Activity>,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone, Default)]
struct State {
    started: bool,
    finished: Vec<bool>,
}

impl ParallelActivity {
    pub fn new(sub_processes: Vec<Activity>) -> Self {
        Self {
            sub_processes,
            state: State::default(),
        }
    }
}

impl ActivityModel for ParallelActivity {
    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        let now = services.global_time();
        if !self.state.started {
            for sub_process in self.sub_processes.iter_mut() {
                let label = ActivityLabel::new(LabelKind::Subprocess, sub_process.id());
                core.log_entry(now, LogState::Start, Some(label));
                sub_process.restart();
            }
            self.state.started = true;
            self.state.finished = vec![false; self.sub_processes.len()];
        }
        for (sub_process, finished) in self
            .sub_processes
            .iter_mut()
            .zip(self.state.finished.iter_mut())
        {
            if *finished {
                continue;
            }
            sub_process.poll(world, services)?;
            if sub_process.is_done() {
                *finished = true;
                let label = ActivityLabel::new(LabelKind::Subprocess, sub_process.id());
                core.log_entry(services.global_time(), LogState::Stop, Some(label));
            }
        }
        Ok(self.state.finished.iter().all(|finished| *finished))
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
        let running = self
            .state
            .finished
            .iter()
            .filter(|finished| !**finished)
            .count();
        format!("{} of {} sub processes running", running, self.sub_processes.len())
    }
}
