//! The input modeling module provides a foundation for configurable
//! activity behaviors, whether that is deterministic or stochastic.  The
//! module includes a set of random variable distributions, for use in
//! plugins such as stochastic delays, and a structure around random number
//! generation.

pub mod dynamic_rng;
pub mod random_variable;

pub use dynamic_rng::{dyn_rng, DynRng, SimulationRng};
pub use random_variable::Continuous as ContinuousRandomVariable;
