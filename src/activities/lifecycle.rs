//! The lifecycle shared by all activities.  An activity waits for its start
//! condition, acquires what its body needs, runs its plugins'
//! pre-processing, executes its body, runs its plugins' post-processing,
//! and finally releases what it acquired.  Each phase is polled, and a
//! phase that cannot progress at the current simulation time leaves the
//! activity blocked until the world or the clock changes.

use std::f64::INFINITY;

use super::condition::Trigger;
use super::Activity;
use crate::concepts::{ActivityLabel, LabelKind, Log, LogState, ObjectState};
use crate::simulator::world::{ActivityStatus, World};
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// Identity, resource holding and the log of an activity, shared with the
/// activity body.
#[derive(Debug, Clone)]
pub struct ActivityCore {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) requested_resources: Option<String>,
    pub(crate) keep_resources: Vec<String>,
    pub(crate) log: Log,
}

impl ActivityCore {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key resource requests are made under.  Activities sharing a
    /// requested resources group share their resource grants.
    pub fn holder(&self) -> &str {
        self.requested_resources.as_deref().unwrap_or(&self.id)
    }

    pub fn keeps(&self, concept: &str) -> bool {
        self.keep_resources.iter().any(|kept| kept == concept)
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn log_entry(&mut self, timestamp: f64, state: LogState, label: Option<ActivityLabel>) {
        self.log
            .entry(timestamp, &self.id, state, ObjectState::default(), label);
    }

    /// Requests the resource of `concept` under the holder key.
    pub fn request(&self, world: &mut World, concept: &str) -> Result<bool, SimulationError> {
        world.request(concept, self.holder())
    }

    /// Releases the resource of `concept`, unless the activity keeps it.
    pub fn release(&self, world: &mut World, concept: &str) -> Result<(), SimulationError> {
        if self.keeps(concept) {
            Ok(())
        } else {
            world.release(concept, self.holder())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Phase {
    Idle,
    AwaitingStart,
    Acquiring,
    PreProcessing,
    Executing,
    PostProcessing,
    Done,
}

#[derive(Debug, Clone)]
pub(crate) struct Lifecycle {
    pub(crate) phase: Phase,
    trigger: Option<Trigger>,
    wait_started: f64,
    start_activity: f64,
    plugin_index: usize,
    delaying: bool,
    pub(crate) until_next_event: f64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            trigger: None,
            wait_started: 0.0,
            start_activity: 0.0,
            plugin_index: 0,
            delaying: false,
            until_next_event: INFINITY,
        }
    }
}

impl Activity {
    /// Progresses the activity as far as possible at the current simulation
    /// time.
    pub(crate) fn poll(
        &mut self,
        world: &mut World,
        services: &mut Services,
    ) -> Result<(), SimulationError> {
        while self.advance(world, services)? {}
        Ok(())
    }

    /// Returns the activity to its initial phase, for another run.  The log
    /// is kept.
    pub(crate) fn restart(&mut self) {
        self.lifecycle = Lifecycle::default();
        self.inner.reset();
    }

    fn advance(&mut self, world: &mut World, services: &mut Services) -> Result<bool, SimulationError> {
        let now = services.global_time();
        match self.lifecycle.phase {
            Phase::Idle => {
                world.set_status(&self.core.id, ActivityStatus::Running)?;
                self.lifecycle.wait_started = now;
                self.lifecycle.trigger = match &self.start_event {
                    Some(condition) => Some(Trigger::arm(condition, world)?),
                    None => None,
                };
                self.lifecycle.phase = Phase::AwaitingStart;
                Ok(true)
            }
            Phase::AwaitingStart => {
                if let Some(trigger) = self.lifecycle.trigger.as_mut() {
                    if !trigger.fired(world)? {
                        return Ok(false);
                    }
                }
                if now > self.lifecycle.wait_started {
                    self.log_start_wait(world, now)?;
                }
                self.lifecycle.phase = Phase::Acquiring;
                Ok(true)
            }
            Phase::Acquiring => {
                if !self.inner.acquire(&mut self.core, world, services)? {
                    return Ok(false);
                }
                self.lifecycle.plugin_index = 0;
                self.lifecycle.phase = Phase::PreProcessing;
                Ok(true)
            }
            Phase::PreProcessing | Phase::PostProcessing => self.process_plugins(world, services),
            Phase::Executing => {
                if !self.inner.execute(&mut self.core, world, services)? {
                    return Ok(false);
                }
                self.core
                    .log_entry(services.global_time(), LogState::Stop, None);
                self.lifecycle.plugin_index = 0;
                self.lifecycle.phase = Phase::PostProcessing;
                Ok(true)
            }
            Phase::Done => Ok(false),
        }
    }

    fn log_start_wait(&mut self, world: &mut World, now: f64) -> Result<(), SimulationError> {
        let started = self.lifecycle.wait_started;
        self.core.log_entry(started, LogState::WaitStart, None);
        self.core.log_entry(now, LogState::WaitStop, None);
        let label = ActivityLabel::new(LabelKind::AdditionalLog, &self.core.id);
        for concept in self.inner.additional_logs() {
            world.log_entry(
                concept,
                started,
                &self.core.id,
                LogState::WaitStart,
                Some(label.clone()),
            )?;
            world.log_entry(
                concept,
                now,
                &self.core.id,
                LogState::WaitStop,
                Some(label.clone()),
            )?;
        }
        Ok(())
    }

    fn process_plugins(
        &mut self,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        let now = services.global_time();
        let pre = self.lifecycle.phase == Phase::PreProcessing;
        if self.lifecycle.delaying {
            if self.lifecycle.until_next_event > 0.0 {
                return Ok(false);
            }
            if let Some(plugin) = self.plugins.get(self.lifecycle.plugin_index) {
                let label = ActivityLabel::new(LabelKind::Plugin, plugin.label());
                self.core.log_entry(now, LogState::WaitStop, Some(label));
            }
            self.lifecycle.delaying = false;
            self.lifecycle.until_next_event = INFINITY;
            self.lifecycle.plugin_index += 1;
            return Ok(true);
        }
        match self.plugins.get(self.lifecycle.plugin_index) {
            Some(plugin) => {
                let delay = if pre {
                    plugin.pre_process(services, self.inner.duration())?
                } else {
                    plugin.post_process(self.lifecycle.start_activity, services)?
                };
                if delay > 0.0 {
                    let label = ActivityLabel::new(LabelKind::Plugin, plugin.label());
                    self.core.log_entry(now, LogState::WaitStart, Some(label));
                    self.lifecycle.delaying = true;
                    self.lifecycle.until_next_event = delay;
                } else {
                    self.lifecycle.plugin_index += 1;
                }
            }
            None if pre => {
                self.core.log_entry(now, LogState::Start, None);
                self.lifecycle.start_activity = now;
                self.lifecycle.phase = Phase::Executing;
            }
            None => {
                self.inner.release(&mut self.core, world, services)?;
                world.set_status(&self.core.id, ActivityStatus::Done)?;
                self.lifecycle.phase = Phase::Done;
            }
        }
        Ok(true)
    }
}
