use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

const THRESHOLD_MARGIN: f64 = 0.0001;

/// A limit on one metocean condition, such as a maximum significant wave
/// height.  Exactly one of `maximum` and `minimum` is set.  Window lengths
/// and delays are in seconds, like the metocean timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCriterion {
    pub name: String,
    pub condition: String,
    pub window_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub window_delay: f64,
}

/// A metocean time series: timestamps in simulation seconds, and a column
/// of values per condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metocean {
    pub ts: Vec<f64>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl Metocean {
    /// The values of one condition, aligned with `ts`.
    pub fn column(&self, condition: &str) -> Option<&[f64]> {
        self.columns.get(condition).map(Vec::as_slice)
    }
}

/// Holds activities until the weather allows them to be carried out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPlugin {
    criterion: WeatherCriterion,
    metocean: Metocean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Crossing {
    Start(f64),
    End(f64),
}

fn at_most(value: f64, threshold: f64) -> bool {
    value <= threshold
}

fn at_least(value: f64, threshold: f64) -> bool {
    value >= threshold
}

impl WeatherPlugin {
    pub fn new(criterion: WeatherCriterion, metocean: Metocean) -> Result<Self, SimulationError> {
        let plugin = Self {
            criterion,
            metocean,
        };
        plugin.validate()?;
        Ok(plugin)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let criterion = &self.criterion;
        if criterion.maximum.is_some() == criterion.minimum.is_some() {
            return Err(SimulationError::InvalidWeatherCriterion(format!(
                "{}: one and only one of minimum and maximum can be defined",
                criterion.name
            )));
        }
        let values = self.values()?;
        if values.is_empty() || values.len() != self.metocean.ts.len() {
            return Err(SimulationError::InvalidWeatherCriterion(format!(
                "{}: the metocean data of {} is empty or misaligned",
                criterion.name, criterion.condition
            )));
        }
        Ok(())
    }

    fn values(&self) -> Result<&[f64], SimulationError> {
        self.metocean
            .column(&self.criterion.condition)
            .ok_or_else(|| {
                SimulationError::InvalidWeatherCriterion(format!(
                    "{}: no metocean data for {}",
                    self.criterion.name, self.criterion.condition
                ))
            })
    }

    /// The workable windows, as `(start, end)` pairs of the times an
    /// activity may start.  Windows follow from linearly interpolated
    /// threshold crossings, are kept when longer than the window length,
    /// and are shifted back by the window delay.
    pub fn windows(&self) -> Result<Vec<(f64, f64)>, SimulationError> {
        self.validate()?;
        let ts = &self.metocean.ts;
        let values = self.values()?;
        let (lowest, highest) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
                (lo.min(*value), hi.max(*value))
            });
        let (threshold, workable): (f64, fn(f64, f64) -> bool) =
            match (self.criterion.maximum, self.criterion.minimum) {
                (Some(maximum), _) => {
                    let threshold = if highest < maximum {
                        highest - THRESHOLD_MARGIN
                    } else {
                        maximum
                    };
                    (threshold, at_most as fn(f64, f64) -> bool)
                }
                (None, Some(minimum)) => {
                    let threshold = if lowest > minimum {
                        lowest + THRESHOLD_MARGIN
                    } else {
                        minimum
                    };
                    (threshold, at_least as fn(f64, f64) -> bool)
                }
                (None, None) => return Ok(Vec::new()),
            };

        let mut crossings = Vec::new();
        for i in 1..values.len() {
            let previous = workable(values[i - 1], threshold);
            let current = workable(values[i], threshold);
            if previous == current {
                continue;
            }
            let t = if values[i] != values[i - 1] {
                ts[i - 1]
                    + (ts[i] - ts[i - 1]) * (threshold - values[i - 1]) / (values[i] - values[i - 1])
            } else {
                ts[i]
            };
            crossings.push(if current {
                Crossing::Start(t)
            } else {
                Crossing::End(t)
            });
        }

        let first = ts[0];
        let last = ts[ts.len() - 1];
        let mut raw_windows = Vec::new();
        let mut open = if workable(values[0], threshold) {
            Some(first)
        } else {
            None
        };
        for crossing in crossings {
            match crossing {
                Crossing::Start(t) => open = Some(t),
                Crossing::End(t) => {
                    if let Some(start) = open.take() {
                        raw_windows.push((start, t));
                    }
                }
            }
        }
        if let Some(start) = open {
            raw_windows.push((start, last));
        }

        let criterion = &self.criterion;
        Ok(raw_windows
            .into_iter()
            .filter(|(start, end)| end - start > criterion.window_length)
            .map(|(start, end)| {
                (
                    start - criterion.window_delay,
                    end - criterion.window_length - criterion.window_delay,
                )
            })
            .collect())
    }

    /// The time to wait, from `now`, for the first workable window.
    pub fn pre_process(&self, now: f64) -> Result<f64, SimulationError> {
        match self.windows()?.into_iter().find(|(_, end)| *end >= now) {
            Some((start, _)) => Ok((start - now).max(0.0)),
            None => {
                warn!(
                    "No workable window for {} after t = {}, proceeding without waiting",
                    self.criterion.name, now
                );
                Ok(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(window_length: f64) -> WeatherPlugin {
        let mut columns = BTreeMap::new();
        columns.insert(
            String::from("hs"),
            vec![2.0, 2.0, 0.5, 0.5, 0.5, 2.0, 2.0, 0.5],
        );
        WeatherPlugin::new(
            WeatherCriterion {
                name: String::from("waves"),
                condition: String::from("hs"),
                window_length,
                maximum: Some(1.0),
                minimum: None,
                window_delay: 0.0,
            },
            Metocean {
                ts: vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0],
                columns,
            },
        )
        .unwrap()
    }

    #[test]
    fn windows_follow_interpolated_crossings() {
        let windows = plugin(50.0).windows().unwrap();
        // The final workable period is shorter than the window length
        assert_eq!(windows.len(), 1);
        let (start, end) = windows[0];
        assert!((start - 500.0 / 3.0).abs() < 1e-9);
        assert!((end - (400.0 + 100.0 / 3.0 - 50.0)).abs() < 1e-9);
    }

    #[test]
    fn activities_wait_for_the_next_window() {
        let plugin = plugin(50.0);
        assert!((plugin.pre_process(0.0).unwrap() - 500.0 / 3.0).abs() < 1e-9);
        assert_eq!(plugin.pre_process(300.0).unwrap(), 0.0);
        // Beyond the data, no window remains and no delay is imposed
        assert_eq!(plugin.pre_process(10_000.0).unwrap(), 0.0);
    }

    #[test]
    fn short_windows_are_dropped() {
        assert_eq!(plugin(500.0).windows().unwrap().len(), 0);
    }

    #[test]
    fn criteria_need_exactly_one_limit() {
        let mut invalid = plugin(50.0);
        invalid.criterion.minimum = Some(0.1);
        assert!(matches!(
            invalid.validate(),
            Err(SimulationError::InvalidWeatherCriterion(_))
        ));
    }
}
