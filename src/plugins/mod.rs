//! Plugins hook into the activity lifecycle, before and after the activity
//! body runs, and may hold the activity for a while.  Pre-processing runs
//! before an activity starts, and post-processing after it stops.  Plugins
//! of an activity run in priority order, lowest first.

use serde::{Deserialize, Serialize};

use crate::simulator::Services;
use crate::utils::errors::SimulationError;

pub mod delay;
pub mod operational_limits;
pub mod weather;

pub use self::delay::{DelayPercentage, DelayPlugin};
pub use self::operational_limits::{Limit, OperationalLimitsPlugin};
pub use self::weather::{Metocean, WeatherCriterion, WeatherPlugin};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Plugin {
    Delay(DelayPlugin),
    Weather(WeatherPlugin),
    OperationalLimits(OperationalLimitsPlugin),
}

impl Plugin {
    pub fn priority(&self) -> u8 {
        match self {
            Plugin::Weather(_) | Plugin::OperationalLimits(_) => 2,
            Plugin::Delay(_) => 3,
        }
    }

    /// The reference of the label of the waiting entries a plugin logs.
    pub fn label(&self) -> &'static str {
        match self {
            Plugin::Delay(_) => "delay",
            Plugin::Weather(_) | Plugin::OperationalLimits(_) => "waiting on weather",
        }
    }

    /// The time to hold an activity before it starts, given the duration
    /// of the activity where it has a fixed one.
    pub fn pre_process(
        &self,
        services: &mut Services,
        activity_duration: Option<f64>,
    ) -> Result<f64, SimulationError> {
        match self {
            Plugin::Delay(_) => Ok(0.0),
            Plugin::Weather(weather) => weather.pre_process(services.global_time()),
            Plugin::OperationalLimits(limits) => {
                limits.pre_process(services.global_time(), activity_duration)
            }
        }
    }

    /// The time to hold an activity after it stopped, given the time its
    /// body started.
    pub fn post_process(
        &self,
        start_activity: f64,
        services: &mut Services,
    ) -> Result<f64, SimulationError> {
        match self {
            Plugin::Delay(delay) => delay.post_process(start_activity, services),
            Plugin::Weather(_) | Plugin::OperationalLimits(_) => Ok(0.0),
        }
    }
}

/// Orders plugins by priority, keeping the configured order among plugins
/// of equal priority.
pub fn sort_plugins(plugins: &mut [Plugin]) {
    plugins.sort_by_key(Plugin::priority);
}
