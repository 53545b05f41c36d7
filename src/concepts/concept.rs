use serde::{Deserialize, Serialize};

use super::container::EventsContainer;
use super::identifiable::{new_id, Identifiable};
use super::locatable::{Point, DEFAULT_TOLERANCE};
use super::log::{ActivityLabel, Log, LogState, ObjectState};
use super::movable::{Movable, Speed};
use super::processor::Processor;
use super::resource::Resource;
use crate::utils::errors::SimulationError;

/// A simulation concept, such as a site or a vessel.  Every concept has an
/// identity and a log, and optionally a location, a container, a resource,
/// the ability to move and the ability to process content.  Activities
/// require capabilities of the concepts they operate on, and fail with
/// `MissingCapability` when a concept lacks one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    name: String,
    #[serde(default = "new_id")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geometry: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    container: Option<EventsContainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mover: Option<Movable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processor: Option<Processor>,
    #[serde(skip)]
    log: Log,
}

impl Concept {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: new_id(),
            geometry: None,
            container: None,
            resource: None,
            mover: None,
            processor: None,
            log: Log::default(),
        }
    }

    /// A location with a container and a single resource.
    pub fn site(
        name: &str,
        geometry: Point,
        capacity: f64,
        level: f64,
    ) -> Result<Self, SimulationError> {
        Ok(Self::new(name)
            .with_geometry(geometry)
            .with_container(EventsContainer::single(capacity, level)?)
            .with_resource(1))
    }

    /// A vessel, with an empty container, processing rates and a speed that
    /// depends on its fill degree.
    pub fn transport_processing_resource(
        name: &str,
        geometry: Point,
        capacity: f64,
        loading_rate: f64,
        unloading_rate: f64,
        speed: Speed,
    ) -> Result<Self, SimulationError> {
        Ok(Self::new(name)
            .with_geometry(geometry)
            .with_container(EventsContainer::single(capacity, 0.0)?)
            .with_resource(1)
            .with_mover(Movable::new(speed))
            .with_processor(Processor::new(loading_rate, unloading_rate)))
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_geometry(mut self, geometry: Point) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_container(mut self, container: EventsContainer) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_resource(mut self, nr_resources: usize) -> Self {
        self.resource = Some(Resource::new(nr_resources));
        self
    }

    pub fn with_mover(mut self, mover: Movable) -> Self {
        self.mover = Some(mover);
        self
    }

    pub fn with_processor(mut self, processor: Processor) -> Self {
        self.processor = Some(processor);
        self
    }

    fn missing(&self, capability: &'static str) -> SimulationError {
        SimulationError::MissingCapability {
            concept: self.name.clone(),
            capability,
        }
    }

    pub fn geometry(&self) -> Result<&Point, SimulationError> {
        self.geometry.as_ref().ok_or_else(|| self.missing("geometry"))
    }

    pub(crate) fn set_geometry(&mut self, geometry: Point) {
        self.geometry = Some(geometry);
    }

    pub fn container(&self) -> Result<&EventsContainer, SimulationError> {
        self.container.as_ref().ok_or_else(|| self.missing("container"))
    }

    pub(crate) fn container_mut(&mut self) -> Result<&mut EventsContainer, SimulationError> {
        match self.container.as_mut() {
            Some(container) => Ok(container),
            None => Err(SimulationError::MissingCapability {
                concept: self.name.clone(),
                capability: "container",
            }),
        }
    }

    pub fn resource(&self) -> Result<&Resource, SimulationError> {
        self.resource.as_ref().ok_or_else(|| self.missing("resource"))
    }

    pub(crate) fn resource_mut(&mut self) -> Result<&mut Resource, SimulationError> {
        match self.resource.as_mut() {
            Some(resource) => Ok(resource),
            None => Err(SimulationError::MissingCapability {
                concept: self.name.clone(),
                capability: "resource",
            }),
        }
    }

    pub fn mover(&self) -> Result<&Movable, SimulationError> {
        self.mover.as_ref().ok_or_else(|| self.missing("mover"))
    }

    pub fn processor(&self) -> Result<&Processor, SimulationError> {
        self.processor.as_ref().ok_or_else(|| self.missing("processor"))
    }

    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Whether this concept is within the default tolerance of `other`.
    pub fn is_at(&self, other: &Concept) -> Result<bool, SimulationError> {
        self.geometry()?.is_at(other.geometry()?, DEFAULT_TOLERANCE)
    }

    /// The state of the concept, as recorded in its log entries.
    pub fn object_state(&self) -> ObjectState {
        ObjectState {
            container_level: self.container.as_ref().map(EventsContainer::levels),
            geometry: self.geometry,
        }
    }

    pub(crate) fn log_entry(
        &mut self,
        timestamp: f64,
        activity_id: &str,
        state: LogState,
        label: Option<ActivityLabel>,
    ) {
        let object_state = self.object_state();
        self.log
            .entry(timestamp, activity_id, state, object_state, label);
    }
}

impl Identifiable for Concept {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::container::DEFAULT_CONTAINER;

    #[test]
    fn sites_hold_content_at_a_location() {
        let site = Concept::site("from_site", Point::new(4.18, 52.18), 10.0, 10.0).unwrap();
        assert_eq!(site.name(), "from_site");
        assert_eq!(site.container().unwrap().get_level(DEFAULT_CONTAINER).unwrap(), 10.0);
        assert_eq!(site.resource().unwrap().capacity(), 1);
        assert!(matches!(
            site.mover(),
            Err(SimulationError::MissingCapability {
                capability: "mover",
                ..
            })
        ));
    }

    #[test]
    fn concepts_deserialize_with_generated_ids() {
        let concept: Concept = serde_yaml::from_str(
            "
name: vessel01
geometry: {lon: 4.18, lat: 52.18}
container:
  stores:
    default: {capacity: 5.0, level: 0.0}
resource: {}
mover:
  speed:
    linear: {vEmpty: 1.5, vFull: 1.0}
processor:
  loadingRate: 1.0
  unloadingRate: {coefficients: [2.0, 0.0]}
",
        )
        .unwrap();
        assert_eq!(concept.id().len(), 36);
        assert_eq!(concept.resource().unwrap().capacity(), 1);
        assert_eq!(
            concept
                .mover()
                .unwrap()
                .current_speed(concept.container().ok())
                .unwrap(),
            1.5
        );
    }

    #[test]
    fn log_entries_record_object_state() {
        let mut vessel = Concept::transport_processing_resource(
            "vessel01",
            Point::new(4.18, 52.18),
            5.0,
            1.0,
            1.0,
            Speed::Constant { v: 1.0 },
        )
        .unwrap();
        vessel.log_entry(0.0, "activity", LogState::Start, None);
        let entry = &vessel.log().entries()[0];
        assert_eq!(
            entry
                .object_state
                .container_level
                .as_ref()
                .and_then(|levels| levels.get(DEFAULT_CONTAINER).copied()),
            Some(0.0)
        );
        assert_eq!(entry.object_state.geometry, Some(Point::new(4.18, 52.18)));
    }
}
