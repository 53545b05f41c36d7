use serde::{Deserialize, Serialize};

use super::container::EventsContainer;
use super::locatable::Point;
use crate::utils::errors::SimulationError;
use crate::utils::evaluate_polynomial;

/// The velocity of a mover, in metres per second, as a function of the fill
/// degree (0 to 1) of its container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speed {
    Constant {
        v: f64,
    },
    #[serde(rename_all = "camelCase")]
    Linear {
        v_empty: f64,
        v_full: f64,
    },
    Polynomial {
        coefficients: Vec<f64>,
    },
}

impl Speed {
    pub fn compute_v(&self, fill_degree: f64) -> Result<f64, SimulationError> {
        match self {
            Speed::Constant { v } => Ok(*v),
            Speed::Linear { v_empty, v_full } => Ok(v_empty + (v_full - v_empty) * fill_degree),
            Speed::Polynomial { coefficients } => evaluate_polynomial(coefficients, fill_degree),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movable {
    speed: Speed,
}

impl Movable {
    pub fn new(speed: Speed) -> Self {
        Self { speed }
    }

    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    /// The current speed, given the container of the mover, if any.
    pub fn current_speed(&self, container: Option<&EventsContainer>) -> Result<f64, SimulationError> {
        let fill_degree = container.map_or(0.0, EventsContainer::fill_degree);
        self.speed.compute_v(fill_degree)
    }

    pub fn sailing_duration(
        &self,
        origin: &Point,
        destination: &Point,
        engine_order: f64,
        container: Option<&EventsContainer>,
    ) -> Result<f64, SimulationError> {
        let velocity = self.current_speed(container)? * engine_order;
        if velocity <= 0.0 {
            return Err(SimulationError::InvalidActivityConfiguration(format!(
                "sailing requires a positive velocity, not {}",
                velocity
            )));
        }
        Ok(origin.distance(destination)? / velocity)
    }
}
