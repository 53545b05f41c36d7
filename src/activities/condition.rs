//! Conditions express when activities start and when repeating activities
//! stop.  A `Condition` is the configured expression, and a `Trigger` is a
//! condition armed against the world at a point in simulation time.
//! Triggers latch: once a leaf has fired it stays fired, even when the
//! observed state changes again.

use serde::{Deserialize, Serialize};

use crate::concepts::DEFAULT_CONTAINER;
use crate::simulator::world::{ActivityStatus, World};
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerState {
    Full,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityState {
    Done,
}

fn default_container_id() -> String {
    String::from(DEFAULT_CONTAINER)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Container {
        concept: String,
        state: ContainerState,
        #[serde(default = "default_container_id")]
        id: String,
    },
    Activity {
        name: String,
        state: ActivityState,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn container_full(concept: &str) -> Self {
        Condition::Container {
            concept: concept.to_string(),
            state: ContainerState::Full,
            id: default_container_id(),
        }
    }

    pub fn container_empty(concept: &str) -> Self {
        Condition::Container {
            concept: concept.to_string(),
            state: ContainerState::Empty,
            id: default_container_id(),
        }
    }

    /// Satisfied once every activity with the id, or else the name, `name`
    /// is done.
    pub fn activity_done(name: &str) -> Self {
        Condition::Activity {
            name: name.to_string(),
            state: ActivityState::Done,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Trigger {
    Container {
        concept: String,
        state: ContainerState,
        id: String,
        armed: u64,
        fired: bool,
    },
    Activity {
        armed: Vec<(String, u64)>,
        fired: bool,
    },
    All(Vec<Trigger>),
    Any(Vec<Trigger>),
}

fn transitions(
    world: &World,
    concept: &str,
    state: ContainerState,
    id: &str,
) -> Result<u64, SimulationError> {
    let container = world.concept(concept)?.container()?;
    match state {
        ContainerState::Full => container.full_transitions(id),
        ContainerState::Empty => container.empty_transitions(id),
    }
}

impl Trigger {
    pub fn arm(condition: &Condition, world: &World) -> Result<Self, SimulationError> {
        match condition {
            Condition::Container { concept, state, id } => {
                let container = world.concept(concept)?.container()?;
                let fired = match state {
                    ContainerState::Full => container.is_full(id)?,
                    ContainerState::Empty => container.is_empty(id)?,
                };
                Ok(Trigger::Container {
                    concept: concept.clone(),
                    state: *state,
                    id: id.clone(),
                    armed: transitions(world, concept, *state, id)?,
                    fired,
                })
            }
            Condition::Activity { name, .. } => {
                let entries = world.registry().lookup(name)?;
                let fired = entries
                    .iter()
                    .all(|entry| entry.status == ActivityStatus::Done);
                Ok(Trigger::Activity {
                    armed: entries
                        .iter()
                        .map(|entry| (entry.id.clone(), entry.completions))
                        .collect(),
                    fired,
                })
            }
            Condition::And(conditions) => Ok(Trigger::All(
                conditions
                    .iter()
                    .map(|condition| Trigger::arm(condition, world))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Condition::Or(conditions) => Ok(Trigger::Any(
                conditions
                    .iter()
                    .map(|condition| Trigger::arm(condition, world))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        }
    }

    pub fn fired(&mut self, world: &World) -> Result<bool, SimulationError> {
        match self {
            Trigger::Container {
                concept,
                state,
                id,
                armed,
                fired,
            } => {
                if !*fired {
                    *fired = transitions(world, concept, *state, id)? > *armed;
                }
                Ok(*fired)
            }
            Trigger::Activity { armed, fired } => {
                if !*fired {
                    let registry = world.registry();
                    let mut all_done = true;
                    for (id, completions) in armed.iter() {
                        let entry = registry.lookup(id)?;
                        all_done &= entry.iter().all(|entry| {
                            entry.status == ActivityStatus::Done
                                || entry.completions > *completions
                        });
                    }
                    *fired = all_done;
                }
                Ok(*fired)
            }
            Trigger::All(triggers) => {
                let mut all = true;
                for trigger in triggers.iter_mut() {
                    all &= trigger.fired(world)?;
                }
                Ok(all)
            }
            Trigger::Any(triggers) => {
                let mut any = false;
                for trigger in triggers.iter_mut() {
                    any |= trigger.fired(world)?;
                }
                Ok(any)
            }
        }
    }
}
