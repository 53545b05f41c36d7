use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::lifecycle::ActivityCore;
use super::Activity;
use crate::concepts::{ActivityLabel, Identifiable, LabelKind, LogState};
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

/// Progress through a list of sub-activities run one after the other.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sequence {
    index: usize,
    started: bool,
}

impl Sequence {
    /// Runs `sub_processes` in order, starting each one once its
    /// predecessor is done, and logging a subprocess START and STOP around
    /// each.  Returns whether all sub-activities are done.
    pub(crate) fn run(
        &mut self,
        sub_processes: &mut [Activity],
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        while let Some(sub_process) = sub_processes.get_mut(self.index) {
            let label = ActivityLabel::new(LabelKind::Subprocess, core.id());
            if !self.started {
                core.log_entry(services.global_time(), LogState::Start, Some(label.clone()));
                sub_process.restart();
                self.started = true;
            }
            sub_process.poll(world, services)?;
            if !sub_process.is_done() {
                return Ok(false);
            }
            core.log_entry(services.global_time(), LogState::Stop, Some(label));
            self.index += 1;
            self.started = false;
        }
        Ok(true)
    }

    /// Whether no sub-activity has been started yet.
    pub(crate) fn is_fresh(&self) -> bool {
        self.index == 0 && !self.started
    }

    pub(crate) fn current(&self) -> usize {
        self.index
    }
}

pub(crate) fn until_next_event(sub_processes: &[Activity]) -> f64 {
    sub_processes
        .iter()
        .fold(f64::INFINITY, |min, sub_process| {
            f64::min(min, sub_process.until_next_event())
        })
}

pub(crate) fn time_advance(sub_processes: &mut [Activity], time_delta: f64) {
    sub_processes
        .iter_mut()
        .for_each(|sub_process| sub_process.time_advance(time_delta));
}

pub(crate) fn sub_process_status(sub_processes: &[Activity], index: usize) -> String {
    match sub_processes.get(index) {
        Some(sub_process) => format!("Running {}", sub_process.name()),
        None => String::from("Finishing"),
    }
}

/// The sequential activity runs its sub-activities one after the other.
#[derive(Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct SequentialActivity {
    sub_processes: Vec<Activity>,
    #[serde(skip)]
    sequence: Sequence,
}

impl SequentialActivity {
    pub fn new(sub_processes: Vec<Activity>) -> Self {
        Self {
            sub_processes,
            sequence: Sequence::default(),
        }
    }
}

impl ActivityModel for SequentialActivity {
    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        self.sequence
            .run(&mut self.sub_processes, core, world, services)
    }

    fn time_advance(&mut self, time_delta: f64) {
        time_advance(&mut self.sub_processes, time_delta);
    }

    fn until_next_event(&self) -> f64 {
        until_next_event(&self.sub_processes)
    }

    fn reset(&mut self) {
        self.sequence = Sequence::default();
    }

    fn sub_activities(&self) -> Vec<&Activity> {
        self.sub_processes.iter().collect()
    }

    fn status(&self) -> String {
        sub_process_status(&self.sub_processes, self.sequence.current())
    }
}
