use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by clsim
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents an invalid activity configuration encountered during simulation
    #[error("An invalid activity configuration was encountered: {0}")]
    InvalidActivityConfiguration(String),

    /// Represents an operation requested on a concept that does not exist
    #[error("Concept {0} cannot be found in the simulation")]
    ConceptNotFound(String),

    /// Represents an operation requested on an activity that does not exist
    #[error("No activity found for id/name {0}")]
    ActivityNotFound(String),

    /// Represents a concept lacking a capability an activity relies on
    #[error("Concept {concept} has no {capability}")]
    MissingCapability {
        concept: String,
        capability: &'static str,
    },

    /// Represents an operation requested on a container id that does not exist
    #[error("Container {0} cannot be found")]
    ContainerNotFound(String),

    /// Represents a multi container receiving more stores than it can hold
    #[error("The container can hold at most {0} stores")]
    StoreCapacityExceeded(usize),

    /// Represents a container initialized beyond its capacity, or with a
    /// negative level
    #[error("Container {container} cannot hold level {level} with capacity {capacity}")]
    InvalidContainerLevel {
        container: String,
        capacity: f64,
        level: f64,
    },

    /// Represents an attempt to shift content into a full destination
    #[error("Attempting to shift content to a full destination (name: {name}, container_id: {container}, capacity: {capacity} level: {level})")]
    FullDestination {
        name: String,
        container: String,
        capacity: f64,
        level: f64,
    },

    /// Represents an attempt to shift content out of an empty origin
    #[error("Attempting to shift content from an empty origin (name: {name}, container_id: {container}, capacity: {capacity} level: {level})")]
    EmptyOrigin {
        name: String,
        container: String,
        capacity: f64,
        level: f64,
    },

    /// Represents a processing step between concepts at different locations
    #[error("Concept {0} is not at the location of {1}")]
    NotCoLocated(String, String),

    /// Represents a geodesic distance calculation that did not converge
    #[error("The geodesic distance calculation did not converge")]
    GeodesicNotConverged,

    /// Represents an invalid state of event scheduling
    #[error("An invalid state was encountered, with respect to event scheduling")]
    EventSchedulingError,

    /// Represents an invalid activity state
    #[error("An invalid activity state was encountered")]
    InvalidActivityState,

    /// Represents an invalid weather criterion or metocean data set
    #[error("Invalid weather criterion: {0}")]
    InvalidWeatherCriterion(String),

    /// Represents random variable parameters no distribution accepts
    #[error("An invalid random variable configuration was encountered: {0}")]
    InvalidRandomVariable(String),

    /// Represents an empty polynomial configuration used in a simulation
    #[error("A polynomial was configured in a simulation, but the coefficients are empty")]
    EmptyPolynomial,

    /// Represents a simulation time that cannot be represented as a date
    #[error("Simulation time {0} cannot be represented as a UTC date")]
    InvalidTimestamp(f64),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Beta distribution errors
    #[error(transparent)]
    BetaError(#[from] rand_distr::BetaError),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Gamma distribution errors
    #[error(transparent)]
    GammaError(#[from] rand_distr::GammaError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),

    /// Transparent Triangular distribution errors
    #[error(transparent)]
    TriangularError(#[from] rand_distr::TriangularError),

    /// Transparent Weibull distribution errors
    #[error(transparent)]
    WeibullError(#[from] rand_distr::WeibullError),
}
