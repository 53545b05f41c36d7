use std::f64::INFINITY;

use log::debug;
use serde::{Deserialize, Serialize};

use super::activity_trait::{ActivityModel, SerializableActivity};
use super::lifecycle::ActivityCore;
use crate::concepts::LogState;
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

use clsim_derive::SerializableActivity;

fn default_engine_order() -> f64 {
    1.0
}

/// The move activity sails a mover to the location of a destination.  The
/// mover's resource is held while sailing.  Without a configured duration,
/// the sailing duration follows from the geodesic distance and the
/// mover's speed at its current fill degree.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct MoveActivity {
    mover: String,
    destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(default = "default_engine_order")]
    engine_order: f64,
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
            phase: Phase::Moored,
            until_next_event: INFINITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Moored,
    Sailing,
}

impl MoveActivity {
    pub fn new(mover: &str, destination: &str) -> Self {
        Self {
            mover: mover.to_string(),
            destination: destination.to_string(),
            duration: None,
            engine_order: default_engine_order(),
            state: State::default(),
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_engine_order(mut self, engine_order: f64) -> Self {
        self.engine_order = engine_order;
        self
    }

    fn sailing_duration(&self, world: &World) -> Result<f64, SimulationError> {
        if let Some(duration) = self.duration {
            return Ok(duration);
        }
        let mover = world.concept(&self.mover)?;
        let destination = world.concept(&self.destination)?;
        mover.mover()?.sailing_duration(
            mover.geometry()?,
            destination.geometry()?,
            self.engine_order,
            mover.container().ok(),
        )
    }

    fn depart(
        &mut self,
        core: &ActivityCore,
        world: &mut World,
        services: &Services,
    ) -> Result<(), SimulationError> {
        world.log_entry(
            &self.mover,
            services.global_time(),
            core.id(),
            LogState::Start,
            None,
        )?;
        let sailing_duration = self.sailing_duration(world)?;
        debug!(
            "{} sailing to {}, duration: {:.2} hrs",
            self.mover,
            self.destination,
            sailing_duration / 3600.0
        );
        self.state.phase = Phase::Sailing;
        self.state.until_next_event = sailing_duration;
        Ok(())
    }

    fn arrive(
        &mut self,
        core: &ActivityCore,
        world: &mut World,
        services: &Services,
    ) -> Result<(), SimulationError> {
        let geometry = *world.concept(&self.destination)?.geometry()?;
        world.move_to(&self.mover, geometry)?;
        world.log_entry(
            &self.mover,
            services.global_time(),
            core.id(),
            LogState::Stop,
            None,
        )?;
        self.state = State::default();
        Ok(())
    }
}

impl ActivityModel for MoveActivity {
    fn acquire(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        core.request(world, &self.mover)
    }

    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError> {
        if self.state.phase == Phase::Moored {
            self.depart(core, world, services)?;
        }
        if self.state.until_next_event > 0.0 {
            return Ok(false);
        }
        self.arrive(core, world, services)?;
        Ok(true)
    }

    fn release(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<(), SimulationError> {
        core.release(world, &self.mover)
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

    fn status(&self) -> String {
        match self.state.phase {
            Phase::Moored => String::from("Moored"),
            Phase::Sailing => format!("Sailing to {}", self.destination),
        }
    }
}
