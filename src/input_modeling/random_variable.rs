//! Random variables underpin stochastic activity behaviors, such as delays
//! expressed as a percentage of an activity's duration.  Common continuous
//! distributions, with their common parameterizations, are wrapped in the
//! `Continuous` enum.

use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use rand_distr::{Beta, Exp, Gamma, LogNormal, Normal, Triangular, Uniform, Weibull};

use super::DynRng;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    Beta { alpha: f64, beta: f64 },
    Exp { lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Normal { mean: f64, std_dev: f64 },
    Triangular { min: f64, max: f64, mode: f64 },
    Uniform { min: f64, max: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl Continuous {
    /// Draws a variate from the shared generator of the simulation.
    pub fn random_variate(&self, rng: DynRng) -> Result<f64, SimulationError> {
        let mut guard = rng.borrow_mut();
        let rng = &mut *guard;
        match self {
            Continuous::Beta { alpha, beta } => Ok(Beta::new(*alpha, *beta)?.sample(rng)),
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(rng)),
            Continuous::Gamma { shape, scale } => Ok(Gamma::new(*shape, *scale)?.sample(rng)),
            Continuous::LogNormal { mu, sigma } => Ok(LogNormal::new(*mu, *sigma)?.sample(rng)),
            Continuous::Normal { mean, std_dev } => Ok(Normal::new(*mean, *std_dev)?.sample(rng)),
            Continuous::Triangular { min, max, mode } => {
                Ok(Triangular::new(*min, *max, *mode)?.sample(rng))
            }
            Continuous::Uniform { min, max } => {
                if !(min < max && (max - min).is_finite()) {
                    return Err(SimulationError::InvalidRandomVariable(format!(
                        "uniform bounds [{}, {}) are empty or unbounded",
                        min, max
                    )));
                }
                Ok(Uniform::new(*min, *max).sample(rng))
            }
            Continuous::Weibull { shape, scale } => {
                Ok(Weibull::new(*shape, *scale)?.sample(rng))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::dynamic_rng::default_rng;

    fn sample(variable: &Continuous, size: usize) -> Vec<f64> {
        let rng = default_rng();
        (0..size)
            .map(|_| variable.random_variate(rng.clone()).unwrap())
            .collect()
    }

    fn mean(samples: &[f64]) -> f64 {
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    #[test]
    fn delay_percentages_center_on_the_distribution_mean() {
        let cases = [
            (Continuous::Uniform { min: 5.0, max: 15.0 }, 10.0),
            (Continuous::Exp { lambda: 0.2 }, 5.0),
            (
                Continuous::Gamma {
                    shape: 2.0,
                    scale: 4.0,
                },
                8.0,
            ),
            (
                Continuous::Triangular {
                    min: 0.0,
                    max: 30.0,
                    mode: 15.0,
                },
                15.0,
            ),
        ];
        for (variable, expected) in cases.iter() {
            let observed = mean(&sample(variable, 20_000));
            assert!(
                (observed - expected).abs() / expected < 0.03,
                "{:?}: mean {} instead of {}",
                variable,
                observed,
                expected
            );
        }
    }

    #[test]
    fn bounded_distributions_stay_within_bounds() {
        let samples = sample(
            &Continuous::Triangular {
                min: 5.0,
                max: 25.0,
                mode: 10.0,
            },
            5_000,
        );
        assert!(samples.iter().all(|x| (5.0..=25.0).contains(x)));
        let fractions = sample(
            &Continuous::Beta {
                alpha: 2.0,
                beta: 5.0,
            },
            5_000,
        );
        assert!(fractions.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn seeded_generators_repeat_their_variates() {
        let variable = Continuous::Normal {
            mean: 10.0,
            std_dev: 2.0,
        };
        assert_eq!(sample(&variable, 10), sample(&variable, 10));
    }

    #[test]
    fn invalid_parameters_are_reported() {
        let variable = Continuous::Exp { lambda: -1.0 };
        assert!(matches!(
            variable.random_variate(default_rng()),
            Err(SimulationError::ExpError(_))
        ));
        let empty = Continuous::Uniform { min: 3.0, max: 3.0 };
        assert!(matches!(
            empty.random_variate(default_rng()),
            Err(SimulationError::InvalidRandomVariable(_))
        ));
        let inverted = Continuous::Uniform { min: 5.0, max: 1.0 };
        assert!(inverted.random_variate(default_rng()).is_err());
    }
}
