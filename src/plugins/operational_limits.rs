use log::warn;
use serde::{Deserialize, Serialize};

use super::weather::Metocean;
use crate::utils::errors::SimulationError;

/// An expression over metocean conditions that holds when an operational
/// limit is exceeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Limit {
    /// Exceeded when the condition is above the value.
    Above { condition: String, value: f64 },
    /// Exceeded when the condition is below the value.
    Below { condition: String, value: f64 },
    /// Exceeded when any of the limits is.
    Any(Vec<Limit>),
    /// Exceeded when all of the limits are.
    All(Vec<Limit>),
}

impl Limit {
    pub fn above(condition: &str, value: f64) -> Self {
        Limit::Above {
            condition: condition.to_string(),
            value,
        }
    }

    pub fn below(condition: &str, value: f64) -> Self {
        Limit::Below {
            condition: condition.to_string(),
            value,
        }
    }

    fn exceeded(&self, metocean: &Metocean, index: usize) -> Result<bool, SimulationError> {
        match self {
            Limit::Above { condition, value } => Ok(sample(metocean, condition, index)? > *value),
            Limit::Below { condition, value } => Ok(sample(metocean, condition, index)? < *value),
            Limit::Any(limits) => {
                for limit in limits {
                    if limit.exceeded(metocean, index)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Limit::All(limits) => {
                for limit in limits {
                    if !limit.exceeded(metocean, index)? {
                        return Ok(false);
                    }
                }
                Ok(!limits.is_empty())
            }
        }
    }

    fn conditions<'a>(&'a self, conditions: &mut Vec<&'a str>) {
        match self {
            Limit::Above { condition, .. } | Limit::Below { condition, .. } => {
                conditions.push(condition)
            }
            Limit::Any(limits) | Limit::All(limits) => {
                limits.iter().for_each(|limit| limit.conditions(conditions))
            }
        }
    }
}

fn sample(metocean: &Metocean, condition: &str, index: usize) -> Result<f64, SimulationError> {
    metocean
        .column(condition)
        .and_then(|values| values.get(index).copied())
        .ok_or_else(|| {
            SimulationError::InvalidWeatherCriterion(format!(
                "operational limits use {}, which the metocean data lacks",
                condition
            ))
        })
}

/// Holds an activity until the first block of metocean data within the
/// operational limits that lasts at least the duration of the activity.
/// The duration is taken from the activity unless configured here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalLimitsPlugin {
    limit: Limit,
    metocean: Metocean,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

impl OperationalLimitsPlugin {
    pub fn new(limit: Limit, metocean: Metocean) -> Result<Self, SimulationError> {
        let plugin = Self {
            limit,
            metocean,
            duration: None,
        };
        plugin.validate()?;
        Ok(plugin)
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let mut conditions = Vec::new();
        self.limit.conditions(&mut conditions);
        for condition in conditions {
            match self.metocean.column(condition) {
                Some(values) if values.len() == self.metocean.ts.len() => {}
                Some(_) => {
                    return Err(SimulationError::InvalidWeatherCriterion(format!(
                        "the metocean data of {} is misaligned with its timestamps",
                        condition
                    )))
                }
                None => {
                    return Err(SimulationError::InvalidWeatherCriterion(format!(
                        "operational limits use {}, which the metocean data lacks",
                        condition
                    )))
                }
            }
        }
        Ok(())
    }

    /// The time to wait, from `now`, for the first block within the limits
    /// that starts no earlier than `now` and lasts at least `duration`.
    /// A block runs from its first timestamp to the first timestamp of the
    /// next block, so the final block has no known length.
    pub fn find_window(&self, now: f64, duration: f64) -> Result<f64, SimulationError> {
        let ts = &self.metocean.ts;
        let exceeded = (0..ts.len())
            .map(|index| self.limit.exceeded(&self.metocean, index))
            .collect::<Result<Vec<bool>, SimulationError>>()?;
        let mut block = 0;
        for index in 1..ts.len() {
            if exceeded[index] == exceeded[block] {
                continue;
            }
            let (start, end) = (ts[block], ts[index]);
            if !exceeded[block] && end - start >= duration && start >= now {
                return Ok(start - now);
            }
            block = index;
        }
        warn!(
            "No block within the operational limits lasts {} s after t = {}, proceeding without waiting",
            duration, now
        );
        Ok(0.0)
    }

    pub fn pre_process(
        &self,
        now: f64,
        activity_duration: Option<f64>,
    ) -> Result<f64, SimulationError> {
        let duration = self.duration.or(activity_duration).ok_or_else(|| {
            SimulationError::InvalidActivityConfiguration(String::from(
                "operational limits need the duration of the activity they hold",
            ))
        })?;
        self.find_window(now, duration)
    }
}
