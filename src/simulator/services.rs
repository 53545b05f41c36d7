use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::concepts::log::to_datetime;
use crate::input_modeling::dynamic_rng::{default_rng, DynRng};
use crate::input_modeling::SimulationRng;
use crate::utils::errors::SimulationError;

/// The clock and random number generator available to activities and
/// plugins.  Simulation time is kept in seconds since the Unix epoch, so
/// every timestamp in a log maps onto a UTC date.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    #[serde(skip, default = "default_rng")]
    global_rng: DynRng,
    global_time: f64,
    #[serde(default)]
    start_time: f64,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            global_rng: default_rng(),
            global_time: 0.0,
            start_time: 0.0,
        }
    }
}

impl Services {
    pub fn global_rng(&self) -> DynRng {
        self.global_rng.clone()
    }

    pub(crate) fn set_rng<Rng: SimulationRng + 'static>(&mut self, rng: Rng) {
        self.global_rng = crate::input_modeling::dyn_rng(rng);
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    /// Seconds since the start of the simulation.
    pub fn elapsed(&self) -> f64 {
        self.global_time - self.start_time
    }

    /// The current simulation time as a UTC date.
    pub fn now(&self) -> Result<DateTime<Utc>, SimulationError> {
        to_datetime(self.global_time)
    }

    /// Moves the clock, and the start of the simulation, to `seconds` since
    /// the Unix epoch.
    pub(crate) fn start_at(&mut self, seconds: f64) {
        self.start_time = seconds;
        self.global_time = seconds;
    }

    pub(crate) fn advance(&mut self, time_delta: f64) {
        self.global_time += time_delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_clock_counts_from_the_start_time() {
        let mut services = Services::default();
        services.start_at(1_609_459_200.0);
        services.advance(3600.0);
        assert_eq!(services.elapsed(), 3600.0);
        assert_eq!(
            services.now().unwrap().to_rfc3339(),
            "2021-01-01T01:00:00+00:00"
        );
    }
}
