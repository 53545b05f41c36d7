use std::collections::BTreeMap;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

pub const DEFAULT_CONTAINER: &str = "default";

fn default_store_capacity() -> usize {
    1
}

/// The initial configuration of one store in a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInitial {
    #[serde(default = "default_container_id")]
    pub id: String,
    pub capacity: f64,
    #[serde(default)]
    pub level: f64,
}

fn default_container_id() -> String {
    String::from(DEFAULT_CONTAINER)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Store {
    capacity: f64,
    level: f64,
    #[serde(skip)]
    full_transitions: u64,
    #[serde(skip)]
    empty_transitions: u64,
}

impl Store {
    fn set_level(&mut self, level: f64) {
        let was_full = self.is_full();
        let was_empty = self.is_empty();
        self.level = level;
        if self.is_full() && !was_full {
            self.full_transitions += 1;
        }
        if self.is_empty() && !was_empty {
            self.empty_transitions += 1;
        }
    }

    fn is_full(&self) -> bool {
        self.level >= self.capacity
    }

    fn is_empty(&self) -> bool {
        self.level <= 0.0
    }
}

/// A container of one or more stores, each holding a level of content up to
/// its capacity.  Transfers are non-blocking attempts, so waiting for
/// content or space is left to the activity polling the container.  Every
/// transition into the full or empty state is counted, which lets a
/// condition observe a transition that has already been undone by the time
/// the condition is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContainerRepr")]
pub struct EventsContainer {
    store_capacity: usize,
    stores: BTreeMap<String, Store>,
}

impl Default for EventsContainer {
    fn default() -> Self {
        Self::new(default_store_capacity())
    }
}

#[derive(Deserialize)]
struct StoreRepr {
    capacity: f64,
    #[serde(default)]
    level: f64,
}

/// The serialized form of a container, validated into an
/// `EventsContainer` on deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerRepr {
    #[serde(default = "default_store_capacity")]
    store_capacity: usize,
    #[serde(default)]
    stores: BTreeMap<String, StoreRepr>,
}

impl TryFrom<ContainerRepr> for EventsContainer {
    type Error = SimulationError;

    fn try_from(repr: ContainerRepr) -> Result<Self, Self::Error> {
        let initials: Vec<ContainerInitial> = repr
            .stores
            .into_iter()
            .map(|(id, store)| ContainerInitial {
                id,
                capacity: store.capacity,
                level: store.level,
            })
            .collect();
        Self::multi(repr.store_capacity, &initials)
    }
}

impl EventsContainer {
    pub fn new(store_capacity: usize) -> Self {
        Self {
            store_capacity,
            stores: BTreeMap::new(),
        }
    }

    /// A single store container, with the default container id.
    pub fn single(capacity: f64, level: f64) -> Result<Self, SimulationError> {
        let mut container = Self::new(1);
        container.initialize(capacity, level)?;
        Ok(container)
    }

    /// A multi container, with a store for each of the initials.
    pub fn multi(
        store_capacity: usize,
        initials: &[ContainerInitial],
    ) -> Result<Self, SimulationError> {
        let mut container = Self::new(store_capacity);
        container.initialize_container(initials)?;
        Ok(container)
    }

    pub fn initialize(&mut self, capacity: f64, level: f64) -> Result<(), SimulationError> {
        self.initialize_container(&[ContainerInitial {
            id: default_container_id(),
            capacity,
            level,
        }])
    }

    pub fn initialize_container(
        &mut self,
        initials: &[ContainerInitial],
    ) -> Result<(), SimulationError> {
        for initial in initials {
            if initial.level < 0.0 || initial.level > initial.capacity {
                return Err(SimulationError::InvalidContainerLevel {
                    container: initial.id.clone(),
                    capacity: initial.capacity,
                    level: initial.level,
                });
            }
            if !self.stores.contains_key(&initial.id) && self.stores.len() >= self.store_capacity {
                return Err(SimulationError::StoreCapacityExceeded(self.store_capacity));
            }
            self.stores.insert(
                initial.id.clone(),
                Store {
                    capacity: initial.capacity,
                    level: initial.level,
                    full_transitions: 0,
                    empty_transitions: 0,
                },
            );
        }
        Ok(())
    }

    fn store(&self, id: &str) -> Result<&Store, SimulationError> {
        self.stores
            .get(id)
            .ok_or_else(|| SimulationError::ContainerNotFound(id.to_string()))
    }

    fn store_mut(&mut self, id: &str) -> Result<&mut Store, SimulationError> {
        self.stores
            .get_mut(id)
            .ok_or_else(|| SimulationError::ContainerNotFound(id.to_string()))
    }

    pub fn get_level(&self, id: &str) -> Result<f64, SimulationError> {
        Ok(self.store(id)?.level)
    }

    pub fn get_capacity(&self, id: &str) -> Result<f64, SimulationError> {
        Ok(self.store(id)?.capacity)
    }

    /// Attempts to take `amount` out of the store, which succeeds only when
    /// the store holds at least that amount.
    pub fn get(&mut self, amount: f64, id: &str) -> Result<bool, SimulationError> {
        let store = self.store_mut(id)?;
        if store.level >= amount {
            let level = store.level - amount;
            store.set_level(level);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Attempts to add `amount` to the store, which succeeds only when the
    /// store has room for that amount.
    pub fn put(&mut self, amount: f64, id: &str) -> Result<bool, SimulationError> {
        let store = self.store_mut(id)?;
        if store.level + amount <= store.capacity {
            let level = store.level + amount;
            store.set_level(level);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get_available(&self, amount: f64, id: &str) -> Result<bool, SimulationError> {
        Ok(self.store(id)?.level >= amount)
    }

    pub fn put_available(&self, amount: f64, id: &str) -> Result<bool, SimulationError> {
        let store = self.store(id)?;
        Ok(store.capacity - store.level >= amount)
    }

    pub fn is_full(&self, id: &str) -> Result<bool, SimulationError> {
        Ok(self.store(id)?.is_full())
    }

    pub fn is_empty(&self, id: &str) -> Result<bool, SimulationError> {
        Ok(self.store(id)?.is_empty())
    }

    pub(crate) fn full_transitions(&self, id: &str) -> Result<u64, SimulationError> {
        Ok(self.store(id)?.full_transitions)
    }

    pub(crate) fn empty_transitions(&self, id: &str) -> Result<u64, SimulationError> {
        Ok(self.store(id)?.empty_transitions)
    }

    pub fn container_list(&self) -> Vec<&str> {
        self.stores.keys().map(String::as_str).collect()
    }

    pub fn store_capacity(&self) -> usize {
        self.store_capacity
    }

    pub fn levels(&self) -> BTreeMap<String, f64> {
        self.stores
            .iter()
            .map(|(id, store)| (id.clone(), store.level))
            .collect()
    }

    /// The total level over the total capacity of all stores.
    pub fn fill_degree(&self) -> f64 {
        let (level, capacity) = self
            .stores
            .values()
            .fold((0.0, 0.0), |(level, capacity), store| {
                (level + store.level, capacity + store.capacity)
            });
        if capacity > 0.0 {
            level / capacity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_put_respect_level_and_capacity() {
        let mut container = EventsContainer::single(10.0, 5.0).unwrap();
        assert!(container.put_available(5.0, DEFAULT_CONTAINER).unwrap());
        assert!(!container.put_available(6.0, DEFAULT_CONTAINER).unwrap());
        assert!(container.get_available(5.0, DEFAULT_CONTAINER).unwrap());
        assert!(!container.get_available(6.0, DEFAULT_CONTAINER).unwrap());

        assert!(!container.get(6.0, DEFAULT_CONTAINER).unwrap());
        assert!(container.get(2.0, DEFAULT_CONTAINER).unwrap());
        assert_eq!(container.get_level(DEFAULT_CONTAINER).unwrap(), 3.0);
        assert!(!container.put(8.0, DEFAULT_CONTAINER).unwrap());
        assert!(container.put(7.0, DEFAULT_CONTAINER).unwrap());
        assert!(container.is_full(DEFAULT_CONTAINER).unwrap());
    }

    #[test]
    fn full_and_empty_transitions_latch() {
        let mut container = EventsContainer::single(2.0, 1.0).unwrap();
        assert_eq!(container.full_transitions(DEFAULT_CONTAINER).unwrap(), 0);
        container.put(1.0, DEFAULT_CONTAINER).unwrap();
        container.get(2.0, DEFAULT_CONTAINER).unwrap();
        assert!(!container.is_full(DEFAULT_CONTAINER).unwrap());
        assert_eq!(container.full_transitions(DEFAULT_CONTAINER).unwrap(), 1);
        assert_eq!(container.empty_transitions(DEFAULT_CONTAINER).unwrap(), 1);
        container.put(1.0, DEFAULT_CONTAINER).unwrap();
        assert_eq!(container.empty_transitions(DEFAULT_CONTAINER).unwrap(), 1);
    }

    #[test]
    fn multi_containers_track_stores_separately() {
        let initials = vec![
            ContainerInitial {
                id: String::from("MP"),
                capacity: 10.0,
                level: 2.0,
            },
            ContainerInitial {
                id: String::from("TP"),
                capacity: 2.0,
                level: 0.0,
            },
        ];
        let mut container = EventsContainer::multi(2, &initials).unwrap();
        assert_eq!(container.container_list(), vec!["MP", "TP"]);
        assert!(container.put(2.0, "TP").unwrap());
        assert!(container.is_full("TP").unwrap());
        assert!(!container.is_full("MP").unwrap());
        assert_eq!(container.fill_degree(), 4.0 / 12.0);
        assert!(matches!(
            container.get_level("missing"),
            Err(SimulationError::ContainerNotFound(_))
        ));
        assert!(matches!(
            container.initialize(1.0, 0.0),
            Err(SimulationError::StoreCapacityExceeded(2))
        ));
    }

    #[test]
    fn levels_above_capacity_are_rejected() {
        assert!(matches!(
            EventsContainer::single(1.0, 2.0),
            Err(SimulationError::InvalidContainerLevel { .. })
        ));
    }

    #[test]
    fn deserialized_containers_are_validated() {
        let container: EventsContainer =
            serde_yaml::from_str("stores:\n  default: {capacity: 4.0, level: 1.0}\n").unwrap();
        assert_eq!(container.store_capacity(), 1);
        assert_eq!(container.get_level(DEFAULT_CONTAINER).unwrap(), 1.0);

        let overfull: Result<EventsContainer, _> =
            serde_yaml::from_str("stores:\n  default: {capacity: 1.0, level: 50.0}\n");
        assert!(overfull.is_err());
        let crowded: Result<EventsContainer, _> =
            serde_yaml::from_str("stores:\n  MP: {capacity: 1.0}\n  TP: {capacity: 1.0}\n");
        assert!(crowded.is_err());
    }
}
