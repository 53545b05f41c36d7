use serde::{Deserialize, Serialize};

use super::container::EventsContainer;
use crate::utils::errors::SimulationError;
use crate::utils::evaluate_polynomial;

/// A processing rate.  Either a constant amount per second, or a
/// polynomial giving the cumulative processing time, in seconds, as a
/// function of the container level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    Constant(f64),
    Curve { coefficients: Vec<f64> },
}

impl Rate {
    fn duration(&self, from_level: f64, to_level: f64) -> Result<f64, SimulationError> {
        match self {
            Rate::Constant(rate) => {
                if *rate <= 0.0 {
                    return Err(SimulationError::InvalidActivityConfiguration(format!(
                        "processing rates must be positive, not {}",
                        rate
                    )));
                }
                Ok((to_level - from_level).abs() / rate)
            }
            Rate::Curve { coefficients } => Ok((evaluate_polynomial(coefficients, to_level)?
                - evaluate_polynomial(coefficients, from_level)?)
            .abs()),
        }
    }
}

/// Loading and unloading capabilities of a concept.  Manoeuvring times are
/// in minutes and are added to every loading or unloading step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processor {
    loading_rate: Rate,
    unloading_rate: Rate,
    #[serde(default)]
    load_manoeuvring: f64,
    #[serde(default)]
    unload_manoeuvring: f64,
}

impl Processor {
    pub fn new(loading_rate: f64, unloading_rate: f64) -> Self {
        Self::with_rates(Rate::Constant(loading_rate), Rate::Constant(unloading_rate))
    }

    pub fn with_rates(loading_rate: Rate, unloading_rate: Rate) -> Self {
        Self {
            loading_rate,
            unloading_rate,
            load_manoeuvring: 0.0,
            unload_manoeuvring: 0.0,
        }
    }

    pub fn with_manoeuvring(mut self, load_manoeuvring: f64, unload_manoeuvring: f64) -> Self {
        self.load_manoeuvring = load_manoeuvring;
        self.unload_manoeuvring = unload_manoeuvring;
        self
    }

    /// The duration of loading `amount` into a destination at
    /// `destination_level`, and the amount loaded.
    pub fn loading(
        &self,
        destination_level: f64,
        amount: f64,
    ) -> Result<(f64, f64), SimulationError> {
        let duration = self
            .loading_rate
            .duration(destination_level, destination_level + amount)?;
        Ok((duration + self.load_manoeuvring * 60.0, amount))
    }

    /// The duration of unloading `amount` out of an origin at
    /// `origin_level`, and the amount unloaded.
    pub fn unloading(&self, origin_level: f64, amount: f64) -> Result<(f64, f64), SimulationError> {
        let duration = self
            .unloading_rate
            .duration(origin_level, origin_level - amount)?;
        Ok((duration + self.unload_manoeuvring * 60.0, amount))
    }
}

/// The amount a single shift can transfer: the requested amount, bounded by
/// the origin level and the free space of the destination.
pub fn determine_processor_amount(
    origin: (&str, &EventsContainer),
    destination: (&str, &EventsContainer),
    amount: Option<f64>,
    id: &str,
) -> Result<f64, SimulationError> {
    let (destination_name, destination) = destination;
    let destination_capacity = destination.get_capacity(id)?;
    let destination_level = destination.get_level(id)?;
    let destination_max_amount = destination_capacity - destination_level;
    if destination_max_amount <= 0.0 {
        return Err(SimulationError::FullDestination {
            name: destination_name.to_string(),
            container: id.to_string(),
            capacity: destination_capacity,
            level: destination_level,
        });
    }

    let (origin_name, origin) = origin;
    let origin_max_amount = origin.get_level(id)?;
    if origin_max_amount <= 0.0 {
        return Err(SimulationError::EmptyOrigin {
            name: origin_name.to_string(),
            container: id.to_string(),
            capacity: origin.get_capacity(id)?,
            level: origin_max_amount,
        });
    }

    let max_amount = origin_max_amount.min(destination_max_amount);
    Ok(amount.map_or(max_amount, |amount| amount.min(max_amount)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::container::DEFAULT_CONTAINER;

    #[test]
    fn constant_rates_include_manoeuvring() {
        let processor = Processor::new(2.0, 4.0).with_manoeuvring(1.0, 0.5);
        assert_eq!(processor.loading(0.0, 10.0).unwrap(), (65.0, 10.0));
        assert_eq!(processor.unloading(10.0, 10.0).unwrap(), (32.5, 10.0));
    }

    #[test]
    fn curves_integrate_between_levels() {
        // t(level) = level^2
        let processor = Processor::with_rates(
            Rate::Curve {
                coefficients: vec![1.0, 0.0, 0.0],
            },
            Rate::Constant(1.0),
        );
        assert_eq!(processor.loading(2.0, 1.0).unwrap().0, 5.0);
    }

    #[test]
    fn rates_deserialize_untagged() {
        let constant: Rate = serde_json::from_str("0.5").unwrap();
        assert!(matches!(constant, Rate::Constant(rate) if rate == 0.5));
        let curve: Rate = serde_json::from_str(r#"{"coefficients": [1.0, 0.0]}"#).unwrap();
        assert!(matches!(curve, Rate::Curve { .. }));
    }

    #[test]
    fn amount_is_bounded_by_origin_and_destination() {
        let origin = EventsContainer::single(10.0, 3.0).unwrap();
        let destination = EventsContainer::single(5.0, 4.0).unwrap();
        let amount = determine_processor_amount(
            ("origin", &origin),
            ("destination", &destination),
            None,
            DEFAULT_CONTAINER,
        )
        .unwrap();
        assert_eq!(amount, 1.0);
        let empty_destination = EventsContainer::single(5.0, 0.0).unwrap();
        let amount = determine_processor_amount(
            ("origin", &origin),
            ("destination", &empty_destination),
            Some(2.0),
            DEFAULT_CONTAINER,
        )
        .unwrap();
        assert_eq!(amount, 2.0);
    }

    #[test]
    fn full_destinations_and_empty_origins_are_errors() {
        let full = EventsContainer::single(5.0, 5.0).unwrap();
        let empty = EventsContainer::single(5.0, 0.0).unwrap();
        assert!(matches!(
            determine_processor_amount(("o", &full), ("d", &full), None, DEFAULT_CONTAINER),
            Err(SimulationError::FullDestination { .. })
        ));
        assert!(matches!(
            determine_processor_amount(("o", &empty), ("d", &empty), None, DEFAULT_CONTAINER),
            Err(SimulationError::EmptyOrigin { .. })
        ));
    }
}
