//! The concepts module provides the capabilities of simulation concepts:
//! identity, logging, location, containers, resources, movement and
//! processing.  A `Concept` combines these capabilities, and activities
//! operate on concepts through them.

pub mod concept;
pub mod container;
pub mod identifiable;
pub mod locatable;
pub mod log;
pub mod movable;
pub mod processor;
pub mod resource;

pub use self::concept::Concept;
pub use self::container::{ContainerInitial, EventsContainer, DEFAULT_CONTAINER};
pub use self::identifiable::Identifiable;
pub use self::locatable::Point;
pub use self::log::{ActivityLabel, LabelKind, Log, LogEntry, LogState, ObjectState};
pub use self::movable::{Movable, Speed};
pub use self::processor::{determine_processor_amount, Processor, Rate};
pub use self::resource::Resource;
