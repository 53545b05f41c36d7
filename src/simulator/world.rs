use serde::{Deserialize, Serialize};

use crate::concepts::{ActivityLabel, Concept, Identifiable, LogState, Point};
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    pub status: ActivityStatus,
    pub completions: u64,
}

/// The registry tracks the status of every activity, including nested
/// sub-activities, so conditions can refer to activities by id or name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn register(&mut self, id: &str, name: &str) {
        if !self.entries.iter().any(|entry| entry.id == id) {
            self.entries.push(RegistryEntry {
                id: id.to_string(),
                name: name.to_string(),
                status: ActivityStatus::Pending,
                completions: 0,
            });
        }
    }

    /// The entries matching `key`, by id first and by name otherwise.
    pub fn lookup(&self, key: &str) -> Result<Vec<&RegistryEntry>, SimulationError> {
        let by_id: Vec<&RegistryEntry> =
            self.entries.iter().filter(|entry| entry.id == key).collect();
        if !by_id.is_empty() {
            return Ok(by_id);
        }
        let by_name: Vec<&RegistryEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.name == key)
            .collect();
        if by_name.is_empty() {
            Err(SimulationError::ActivityNotFound(key.to_string()))
        } else {
            Ok(by_name)
        }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut RegistryEntry, SimulationError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| SimulationError::ActivityNotFound(id.to_string()))
    }
}

/// The shared state activities operate on: the concepts and the activity
/// registry.  Every change activities can wait on bumps the revision, which
/// the simulator uses to detect that no further progress is possible at the
/// current simulation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    concepts: Vec<Concept>,
    #[serde(skip)]
    registry: Registry,
    #[serde(skip)]
    revision: u64,
}

impl World {
    pub fn new(concepts: Vec<Concept>) -> Self {
        Self {
            concepts,
            ..Self::default()
        }
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn concept(&self, id: &str) -> Result<&Concept, SimulationError> {
        self.concepts
            .iter()
            .find(|concept| concept.id() == id)
            .ok_or_else(|| SimulationError::ConceptNotFound(id.to_string()))
    }

    fn concept_mut(&mut self, id: &str) -> Result<&mut Concept, SimulationError> {
        self.concepts
            .iter_mut()
            .find(|concept| concept.id() == id)
            .ok_or_else(|| SimulationError::ConceptNotFound(id.to_string()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn register_activity(&mut self, id: &str, name: &str) {
        self.registry.register(id, name);
    }

    pub(crate) fn set_status(
        &mut self,
        activity_id: &str,
        status: ActivityStatus,
    ) -> Result<(), SimulationError> {
        let entry = self.registry.entry_mut(activity_id)?;
        if entry.status != status {
            entry.status = status;
            if status == ActivityStatus::Done {
                entry.completions += 1;
                self.revision += 1;
            }
        }
        Ok(())
    }

    pub fn try_get(
        &mut self,
        concept: &str,
        amount: f64,
        container: &str,
    ) -> Result<bool, SimulationError> {
        let taken = self.concept_mut(concept)?.container_mut()?.get(amount, container)?;
        if taken {
            self.revision += 1;
        }
        Ok(taken)
    }

    pub fn try_put(
        &mut self,
        concept: &str,
        amount: f64,
        container: &str,
    ) -> Result<bool, SimulationError> {
        let placed = self.concept_mut(concept)?.container_mut()?.put(amount, container)?;
        if placed {
            self.revision += 1;
        }
        Ok(placed)
    }

    pub fn request(&mut self, concept: &str, holder: &str) -> Result<bool, SimulationError> {
        let resource = self.concept_mut(concept)?.resource_mut()?;
        let already_granted = resource.is_granted(holder);
        let granted = resource.request(holder);
        if granted && !already_granted {
            self.revision += 1;
        }
        Ok(granted)
    }

    pub fn release(&mut self, concept: &str, holder: &str) -> Result<(), SimulationError> {
        if self.concept_mut(concept)?.resource_mut()?.release(holder) {
            self.revision += 1;
        }
        Ok(())
    }

    pub fn move_to(&mut self, concept: &str, geometry: Point) -> Result<(), SimulationError> {
        self.concept_mut(concept)?.set_geometry(geometry);
        self.revision += 1;
        Ok(())
    }

    pub fn log_entry(
        &mut self,
        concept: &str,
        timestamp: f64,
        activity_id: &str,
        state: LogState,
        label: Option<ActivityLabel>,
    ) -> Result<(), SimulationError> {
        self.concept_mut(concept)?
            .log_entry(timestamp, activity_id, state, label);
        Ok(())
    }
}
