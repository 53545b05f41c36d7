use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::utils::errors::SimulationError;
use crate::utils::set_panic_hook;

use super::{Scenario, Simulation as CoreSimulation};

fn to_js(error: SimulationError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// The web `Simulation` provides JS/WASM-compatible interfaces to the core
/// `Simulation` struct.  For additional insight on these methods, refer to
/// the associated core `Simulation` methods.  Errors are returned to
/// JavaScript as exceptions carrying the error message.
#[wasm_bindgen]
#[derive(Default, Serialize)]
pub struct Simulation {
    simulation: CoreSimulation,
}

#[wasm_bindgen]
impl Simulation {
    /// A JS/WASM interface for `Scenario::from_json`, which sets up a
    /// simulation from a JSON scenario.
    pub fn post_json(scenario: &str) -> Result<Simulation, JsValue> {
        set_panic_hook();
        Ok(Self {
            simulation: Scenario::from_json(scenario)
                .map_err(to_js)?
                .into_simulation(),
        })
    }

    /// A JS/WASM interface for `Scenario::from_yaml`, which sets up a
    /// simulation from a YAML scenario.
    pub fn post_yaml(scenario: &str) -> Result<Simulation, JsValue> {
        set_panic_hook();
        Ok(Self {
            simulation: Scenario::from_yaml(scenario)
                .map_err(to_js)?
                .into_simulation(),
        })
    }

    /// Get a JSON representation of the full `Simulation` state.
    pub fn get_json(&self) -> Result<String, JsValue> {
        serde_json::to_string_pretty(&self.simulation).map_err(|e| to_js(e.into()))
    }

    /// Get a YAML representation of the full `Simulation` state.
    pub fn get_yaml(&self) -> Result<String, JsValue> {
        serde_yaml::to_string(&self.simulation).map_err(|e| to_js(e.into()))
    }

    /// An interface to `Simulation.get_global_time`.
    pub fn get_global_time(&self) -> f64 {
        self.simulation.get_global_time()
    }

    /// An interface to `Simulation.is_done`.
    pub fn is_done(&self) -> bool {
        self.simulation.is_done()
    }

    /// An interface to `Simulation.get_status`.
    pub fn get_status(&self, activity_id: &str) -> Result<String, JsValue> {
        self.simulation.get_status(activity_id).map_err(to_js)
    }

    /// An interface to `Simulation.get_level`.
    pub fn get_level(&self, concept_id: &str, container_id: &str) -> Result<f64, JsValue> {
        self.simulation
            .get_level(concept_id, container_id)
            .map_err(to_js)
    }

    /// A JS/WASM interface for `Simulation.get_log`, which converts the log
    /// of an activity or concept to a JSON string.
    pub fn get_log_json(&self, id: &str) -> Result<String, JsValue> {
        let log = self.simulation.get_log(id).map_err(to_js)?;
        serde_json::to_string(log).map_err(|e| to_js(e.into()))
    }

    /// A JS/WASM interface for `Simulation.get_log`, which converts the log
    /// of an activity or concept to a YAML string.
    pub fn get_log_yaml(&self, id: &str) -> Result<String, JsValue> {
        let log = self.simulation.get_log(id).map_err(to_js)?;
        serde_yaml::to_string(log).map_err(|e| to_js(e.into()))
    }

    /// An interface to `Simulation.step`.
    pub fn step(&mut self) -> Result<bool, JsValue> {
        self.simulation.step().map_err(to_js)
    }

    /// An interface to `Simulation.step_n`.
    pub fn step_n(&mut self, n: usize) -> Result<(), JsValue> {
        self.simulation.step_n(n).map_err(to_js)
    }

    /// An interface to `Simulation.run_until`.
    pub fn run_until(&mut self, until: f64) -> Result<(), JsValue> {
        self.simulation.run_until(until).map_err(to_js)
    }

    /// An interface to `Simulation.run`.
    pub fn run(&mut self) -> Result<(), JsValue> {
        self.simulation.run().map_err(to_js)
    }
}

impl Simulation {
    pub fn simulation(&self) -> &CoreSimulation {
        &self.simulation
    }
}
