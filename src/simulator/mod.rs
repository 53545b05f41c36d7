//! The simulator module provides the mechanics to run activities over the
//! concepts of a simulation.  Activities are polled at the current
//! simulation time until no activity can make further progress, after
//! which the clock advances to the earliest timed event of any activity.
//! A simulation ends when no activity has a timed event left.
//!
//! `Simulation` and `WebSimulation` are used for Rust- and npm-based
//! projects, respectively.  The `Simulation` methods use the associated
//! struct types directly, while the `WebSimulation` provides an interface
//! with better JS/WASM compatibility.  Both can be set up from a
//! `Scenario`, a YAML or JSON description of the concepts and activities.

use std::f64::INFINITY;

use chrono::{DateTime, Utc};
use log::{info, trace};
use serde::Serialize;

use crate::activities::Activity;
use crate::concepts::{Concept, Identifiable, Log};
use crate::input_modeling::SimulationRng;
use crate::utils::errors::SimulationError;
use crate::utils::set_panic_hook;

pub mod scenario;
pub mod services;
pub mod web;
pub mod world;

pub use self::scenario::Scenario;
pub use self::services::Services;
pub use self::web::Simulation as WebSimulation;
pub use self::world::{ActivityStatus, Registry, RegistryEntry, World};

/// The number of polling rounds within which the activities must settle at
/// a single simulation time.
const MAX_SETTLE_ROUNDS: usize = 100_000;

/// The `Simulation` struct is the core of clsim, and includes everything
/// needed to run a simulation: concepts, activities, and the services
/// (clock and random number generator).
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    world: World,
    activities: Vec<Activity>,
    services: Services,
}

impl Simulation {
    /// This constructor method creates a simulation from a supplied
    /// configuration (concepts and activities).  All activities, including
    /// nested sub-activities, are registered so that conditions can refer
    /// to them.
    pub fn post(concepts: Vec<Concept>, activities: Vec<Activity>) -> Self {
        set_panic_hook();
        let mut world = World::new(concepts);
        activities
            .iter()
            .for_each(|activity| activity.register(&mut world));
        Self {
            world,
            activities,
            ..Self::default()
        }
    }

    /// Sets the simulation clock to a start time.
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        let seconds =
            start_time.timestamp() as f64 + f64::from(start_time.timestamp_subsec_nanos()) / 1e9;
        self.services.start_at(seconds);
        self
    }

    /// Replaces the default, seeded, random number generator.
    pub fn with_rng<Rng: SimulationRng + 'static>(mut self, rng: Rng) -> Self {
        self.services.set_rng(rng);
        self
    }

    /// An accessor method for the simulation global time.
    pub fn get_global_time(&self) -> f64 {
        self.services.global_time()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn get_concept(&self, concept_id: &str) -> Result<&Concept, SimulationError> {
        self.world.concept(concept_id)
    }

    pub fn get_level(&self, concept_id: &str, container_id: &str) -> Result<f64, SimulationError> {
        self.world
            .concept(concept_id)?
            .container()?
            .get_level(container_id)
    }

    /// Finds an activity, at any nesting depth, by id.
    pub fn get_activity(&self, activity_id: &str) -> Result<&Activity, SimulationError> {
        self.activities
            .iter()
            .find_map(|activity| activity.find(activity_id))
            .ok_or_else(|| SimulationError::ActivityNotFound(activity_id.to_string()))
    }

    /// The log of an activity, or of a concept, by id.
    pub fn get_log(&self, id: &str) -> Result<&Log, SimulationError> {
        match self.get_activity(id) {
            Ok(activity) => Ok(activity.log()),
            Err(_) => Ok(self.world.concept(id)?.log()),
        }
    }

    pub fn get_status(&self, activity_id: &str) -> Result<String, SimulationError> {
        Ok(self.get_activity(activity_id)?.status())
    }

    pub fn concepts(&self) -> &[Concept] {
        self.world.concepts()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn registry(&self) -> &Registry {
        self.world.registry()
    }

    /// Whether all top level activities are done.
    pub fn is_done(&self) -> bool {
        self.activities.iter().all(Activity::is_done)
    }

    /// Polls all activities until none of them can progress any further at
    /// the current simulation time.
    fn settle(&mut self) -> Result<(), SimulationError> {
        for _ in 0..MAX_SETTLE_ROUNDS {
            let revision = self.world.revision();
            for activity in self.activities.iter_mut() {
                if !activity.is_done() {
                    activity.poll(&mut self.world, &mut self.services)?;
                }
            }
            if self.world.revision() == revision {
                return Ok(());
            }
        }
        Err(SimulationError::EventSchedulingError)
    }

    fn until_next_event(&self) -> f64 {
        self.activities.iter().fold(INFINITY, |min, activity| {
            f64::min(min, activity.until_next_event())
        })
    }

    fn advance(&mut self, time_delta: f64) {
        self.activities
            .iter_mut()
            .for_each(|activity| activity.time_advance(time_delta));
        self.services.advance(time_delta);
    }

    /// The simulation step settles all activities at the current time and
    /// then advances the clock to the next timed event.  Returns whether
    /// the clock advanced, which is false once no timed events remain.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        self.settle()?;
        let until_next_event = self.until_next_event();
        trace!(
            "t = {}, next event in {}",
            self.services.global_time(),
            until_next_event
        );
        if until_next_event == INFINITY {
            return Ok(false);
        }
        if until_next_event < 0.0 {
            return Err(SimulationError::EventSchedulingError);
        }
        self.advance(until_next_event);
        Ok(true)
    }

    /// Runs the simulation until no timed events remain.  Activities still
    /// waiting at that point, for example on a condition that never fires,
    /// are left unfinished.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while self.step()? {}
        info!(
            "Simulation ended at t = {}, {} of {} activities done",
            self.services.global_time(),
            self.activities.iter().filter(|a| a.is_done()).count(),
            self.activities.len()
        );
        Ok(())
    }

    /// Runs the simulation until a global time, leaving the clock at that
    /// time when events remain beyond it.
    pub fn run_until(&mut self, until: f64) -> Result<(), SimulationError> {
        loop {
            self.settle()?;
            let now = self.services.global_time();
            let until_next_event = self.until_next_event();
            if until_next_event == INFINITY {
                return Ok(());
            }
            if now + until_next_event > until {
                if until > now {
                    self.advance(until - now);
                }
                return Ok(());
            }
            self.advance(until_next_event);
        }
    }

    /// This method executes the specified number of simulation steps, `n`.
    pub fn step_n(&mut self, n: usize) -> Result<(), SimulationError> {
        for _ in 0..n {
            if !self.step()? {
                break;
            }
        }
        Ok(())
    }

    /// The names of activities and concepts by id, for reporting.
    pub fn names(&self) -> Vec<(&str, &str)> {
        let mut names: Vec<(&str, &str)> = self
            .world
            .registry()
            .entries()
            .iter()
            .map(|entry| (entry.id.as_str(), entry.name.as_str()))
            .collect();
        names.extend(
            self.world
                .concepts()
                .iter()
                .map(|concept| (concept.id(), concept.name())),
        );
        names
    }
}
