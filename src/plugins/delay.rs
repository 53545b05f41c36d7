use serde::{Deserialize, Serialize};

use crate::input_modeling::ContinuousRandomVariable;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// A delay percentage, either fixed or drawn from a random variable for
/// every activity run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelayPercentage {
    Fixed(f64),
    Random(ContinuousRandomVariable),
}

/// Extends activities by a percentage of the time they took.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayPlugin {
    delay_percentage: DelayPercentage,
}

impl DelayPlugin {
    pub fn new(delay_percentage: DelayPercentage) -> Self {
        Self { delay_percentage }
    }

    pub fn fixed(delay_percentage: f64) -> Self {
        Self::new(DelayPercentage::Fixed(delay_percentage))
    }

    pub fn post_process(
        &self,
        start_activity: f64,
        services: &mut Services,
    ) -> Result<f64, SimulationError> {
        let percentage = match &self.delay_percentage {
            DelayPercentage::Fixed(percentage) => *percentage,
            DelayPercentage::Random(variable) => variable.random_variate(services.global_rng())?,
        };
        Ok(((services.global_time() - start_activity) * percentage / 100.0).max(0.0))
    }
}
