use std::f64::INFINITY;

use log::debug;
use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::lifecycle::ActivityCore;
use crate::concepts::{
    determine_processor_amount, ActivityLabel, Identifiable, LabelKind, LogState,
    DEFAULT_CONTAINER,
};
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

fn default_container_id() -> String {
    String::from(DEFAULT_CONTAINER)
}

/// Whether the processor loads into the destination or unloads out of the
/// origin, which selects the processing rate used when no duration is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShiftPhase {
    Loading,
    Unloading,
}

/// The shift amount activity transfers content from an origin container to
/// a destination container, using a processor.  The processor and the
/// destination must be at the location of the origin.  The destination,
/// processor and origin resources are held while shifting, and the shift
/// only starts once the origin holds the full amount.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAmountActivity {
    processor: String,
    origin: String,
    destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phase: Option<ShiftPhase>,
    #[serde(default = "default_container_id")]
    container_id: String,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone)]
struct State {
    acquisition: Acquisition,
    step: Step,
    amount: f64,
    duration: f64,
    until_next_event: f64,
}

impl Default for State {
    fn default() -> Self {
        State {
            acquisition: Acquisition::Unplanned,
            step: Step::Idle,
            amount: 0.0,
            duration: 0.0,
            until_next_event: INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Acquisition {
    Unplanned,
    Destination,
    Content,
    Processor,
    Origin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Idle,
    Getting { since: f64 },
    Shifting,
    Putting { since: f64 },
}

const WAITING_ORIGIN: &str = "waiting origin content";
const WAITING_DESTINATION: &str = "waiting destination content";

impl ShiftAmountActivity {
    pub fn new(processor: &str, origin: &str, destination: &str) -> Self {
        Self {
            processor: processor.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            amount: None,
            duration: None,
            phase: None,
            container_id: default_container_id(),
            state: State::default(),
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_phase(mut self, phase: ShiftPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_container_id(mut self, container_id: &str) -> Self {
        self.container_id = container_id.to_string();
        self
    }

    /// The concepts taking part, each listed once.
    fn participants(&self) -> Vec<&str> {
        let mut participants: Vec<&str> = Vec::new();
        for concept in [&self.processor, &self.origin, &self.destination] {
            if !participants.contains(&concept.as_str()) {
                participants.push(concept);
            }
        }
        participants
    }

    fn plan(&mut self, world: &World) -> Result<(), SimulationError> {
        let processor = world.concept(&self.processor)?;
        let origin = world.concept(&self.origin)?;
        let destination = world.concept(&self.destination)?;
        if !processor.is_at(origin)? {
            return Err(SimulationError::NotCoLocated(
                processor.name().to_string(),
                origin.name().to_string(),
            ));
        }
        if !destination.is_at(origin)? {
            return Err(SimulationError::NotCoLocated(
                destination.name().to_string(),
                origin.name().to_string(),
            ));
        }
        self.state.amount = determine_processor_amount(
            (origin.name(), origin.container()?),
            (destination.name(), destination.container()?),
            self.amount,
            &self.container_id,
        )?;
        Ok(())
    }

    fn origin_holds_amount(&self, world: &World) -> Result<bool, SimulationError> {
        world
            .concept(&self.origin)?
            .container()?
            .get_available(self.state.amount, &self.container_id)
    }

    fn shift_duration(&self, world: &World) -> Result<f64, SimulationError> {
        if let Some(duration) = self.duration {
            return Ok(duration);
        }
        let processor = world.concept(&self.processor)?.processor()?;
        let (duration, _) = match self.phase {
            Some(ShiftPhase::Loading) => {
                let level = world
                    .concept(&self.destination)?
                    .container()?
                    .get_level(&self.container_id)?;
                processor.loading(level, self.state.amount)?
            }
            Some(ShiftPhase::Unloading) => {
                let level = world
                    .concept(&self.origin)?
                    .container()?
                    .get_level(&self.container_id)?;
                processor.unloading(level, self.state.amount)?
            }
            None => {
                return Err(SimulationError::InvalidActivityConfiguration(String::from(
                    "both the phase (loading / unloading) and the duration of the shift amount activity are undefined",
                )))
            }
        };
        Ok(duration)
    }

    fn log_participants(
        &self,
        core: &ActivityCore,
        world: &mut World,
        timestamp: f64,
        state: LogState,
    ) -> Result<(), SimulationError> {
        self.participants()
            .into_iter()
            .try_for_each(|concept| world.log_entry(concept, timestamp, core.id(), state, None))
    }

    fn log_wait(
        &self,
        core: &ActivityCore,
        world: &mut World,
        since: f64,
        now: f64,
        reference: &str,
    ) -> Result<(), SimulationError> {
        if now > since {
            let label = ActivityLabel::new(LabelKind::Subprocess, reference);
            world.log_entry(
                &self.processor,
                since,
                core.id(),
                LogState::WaitStart,
                Some(label.clone()),
            )?;
            world.log_entry(
                &self.processor,
                now,
                core.id(),
                LogState::WaitStop,
                Some(label),
            )?;
        }
        Ok(())
    }
}

impl ActivityModel for ShiftAmountActivity {
    fn acquire(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        loop {
            match self.state.acquisition {
                Acquisition::Unplanned => {
                    self.plan(world)?;
                    self.state.acquisition = Acquisition::Destination;
                }
                Acquisition::Destination => {
                    if !core.request(world, &self.destination)? {
                        return Ok(false);
                    }
                    self.state.acquisition = Acquisition::Content;
                }
                Acquisition::Content => {
                    if !self.origin_holds_amount(world)? {
                        return Ok(false);
                    }
                    self.state.acquisition = Acquisition::Processor;
                }
                Acquisition::Processor => {
                    if !core.request(world, &self.processor)? {
                        return Ok(false);
                    }
                    if self.origin_holds_amount(world)? {
                        self.state.acquisition = Acquisition::Origin;
                    } else {
                        // Content was taken while waiting for the processor
                        world.release(&self.processor, core.holder())?;
                        self.state.acquisition = Acquisition::Content;
                    }
                }
                Acquisition::Origin => {
                    if !core.request(world, &self.origin)? {
                        return Ok(false);
                    }
                    if self.origin_holds_amount(world)? {
                        return Ok(true);
                    }
                    world.release(&self.processor, core.holder())?;
                    world.release(&self.origin, core.holder())?;
                    self.state.acquisition = Acquisition::Content;
                }
            }
        }
    }

    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        let now = services.global_time();
        loop {
            match self.state.step {
                Step::Idle => {
                    self.log_participants(core, world, now, LogState::Start)?;
                    self.state.duration = self.shift_duration(world)?;
                    self.state.step = Step::Getting { since: now };
                }
                Step::Getting { since } => {
                    if !world.try_get(&self.origin, self.state.amount, &self.container_id)? {
                        return Ok(false);
                    }
                    self.log_wait(core, world, since, now, WAITING_ORIGIN)?;
                    debug!(
                        "{} shifting {} from {} to {}, duration: {:.2} hrs",
                        self.processor,
                        self.state.amount,
                        self.origin,
                        self.destination,
                        self.state.duration / 3600.0
                    );
                    self.state.until_next_event = self.state.duration;
                    self.state.step = Step::Shifting;
                }
                Step::Shifting => {
                    if self.state.until_next_event > 0.0 {
                        return Ok(false);
                    }
                    self.state.until_next_event = INFINITY;
                    self.state.step = Step::Putting { since: now };
                }
                Step::Putting { since } => {
                    if !world.try_put(&self.destination, self.state.amount, &self.container_id)? {
                        return Ok(false);
                    }
                    self.log_wait(core, world, since, now, WAITING_DESTINATION)?;
                    self.log_participants(core, world, now, LogState::Stop)?;
                    return Ok(true);
                }
            }
        }
    }

    fn release(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<(), SimulationError> {
        core.release(world, &self.destination)?;
        core.release(world, &self.origin)?;
        core.release(world, &self.processor)
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
        self.duration
    }

    fn status(&self) -> String {
        match self.state.step {
            Step::Idle => String::from("Idle"),
            Step::Getting { .. } => String::from("Waiting for origin content"),
            Step::Shifting => format!("Shifting {}", self.state.amount),
            Step::Putting { .. } => String::from("Waiting for destination space"),
        }
    }
}
