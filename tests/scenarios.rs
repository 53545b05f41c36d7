use std::f64::INFINITY;

use clsim::activities::{ActivityCore, ActivityModel, SerializableActivity};
use clsim::concepts::LogState;
use clsim::simulator::{Scenario, Services, Simulation, WebSimulation, World};
use clsim::utils::errors::SimulationError;
use clsim_derive::{register, SerializableActivity};
use serde::{Deserialize, Serialize};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn demo_yaml() -> &'static str {
    "
startTime: 2021-01-01T00:00:00Z
concepts:
  - name: Site
    id: site
    geometry: {lon: 4.18055556, lat: 52.18664444}
    container:
      stores:
        default: {capacity: 10.0, level: 10.0}
    resource: {capacity: 1}
  - name: Vessel
    id: vessel
    geometry: {lon: 4.18055556, lat: 52.18664444}
    container:
      stores:
        default: {capacity: 5.0, level: 0.0}
    resource: {}
    mover:
      speed:
        linear: {vEmpty: 1.0, vFull: 0.5}
    processor: {loadingRate: 1.0, unloadingRate: 1.0}
activities:
  - name: While activity
    id: while
    type: WhileActivity
    conditionEvent:
      container: {concept: vessel, state: full}
    subProcesses:
      - name: Transfer amount
        id: shift
        type: ShiftAmountActivity
        processor: vessel
        origin: site
        destination: vessel
        amount: 1
        duration: 20
"
}

#[test]
fn yaml_scenarios_run_the_demo() -> Result<(), SimulationError> {
    let mut simulation = Scenario::from_yaml(demo_yaml())?.into_simulation();
    simulation.run()?;
    assert_eq!(simulation.get_level("vessel", "default")?, 5.0);
    assert_eq!(simulation.get_level("site", "default")?, 5.0);
    assert_eq!(simulation.get_activity("shift")?.log().count(LogState::Stop), 5);
    Ok(())
}

#[test]
fn scenarios_survive_a_yaml_round_trip() -> Result<(), SimulationError> {
    let scenario = Scenario::from_yaml(demo_yaml())?;
    let mut simulation = Scenario::from_yaml(&scenario.to_yaml()?)?.into_simulation();
    simulation.run()?;
    assert_eq!(simulation.get_level("vessel", "default")?, 5.0);
    Ok(())
}

#[test]
fn json_scenarios_are_supported() -> Result<(), SimulationError> {
    let scenario = r#"
{
    "activities": [
        {
            "name": "sequence",
            "id": "sequence",
            "type": "SequentialActivity",
            "subProcesses": [
                {"name": "first", "type": "BasicActivity", "duration": 10},
                {
                    "name": "second",
                    "type": "BasicActivity",
                    "duration": 20,
                    "plugins": [{"delay": {"delayPercentage": 50}}]
                }
            ]
        }
    ]
}
"#;
    let mut simulation = Scenario::from_json(scenario)?.into_simulation();
    simulation.run()?;
    assert_eq!(simulation.get_global_time(), 40.0);
    assert!(simulation.registry().lookup("second").is_ok());
    Ok(())
}

/// The refuel activity tops up the container of a concept, taking a fixed
/// time per unit.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableActivity)]
#[serde(rename_all = "camelCase")]
pub struct RefuelActivity {
    concept: String,
    amount: f64,
    seconds_per_unit: f64,
    #[serde(skip)]
    until_next_event: Option<f64>,
}

impl ActivityModel for RefuelActivity {
    fn acquire(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        core.request(world, &self.concept)
    }

    fn execute(
        &mut self,
        _core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        match self.until_next_event {
            None => {
                self.until_next_event = Some(self.amount * self.seconds_per_unit);
                Ok(false)
            }
            Some(until_next_event) if until_next_event > 0.0 => Ok(false),
            Some(_) => {
                if !world.try_put(&self.concept, self.amount, "default")? {
                    return Ok(false);
                }
                self.until_next_event = None;
                Ok(true)
            }
        }
    }

    fn release(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<(), SimulationError> {
        core.release(world, &self.concept)
    }

    fn time_advance(&mut self, time_delta: f64) {
        if let Some(until_next_event) = self.until_next_event.as_mut() {
            *until_next_event -= time_delta;
        }
    }

    fn until_next_event(&self) -> f64 {
        self.until_next_event.unwrap_or(INFINITY)
    }

    fn reset(&mut self) {
        self.until_next_event = None;
    }

    fn status(&self) -> String {
        match self.until_next_event {
            Some(_) => String::from("Refuelling"),
            None => String::from("Idle"),
        }
    }
}

#[test]
fn custom_activities_are_configurable() -> Result<(), SimulationError> {
    register![RefuelActivity];
    let scenario = "
concepts:
  - name: tug
    id: tug
    container:
      stores:
        default: {capacity: 50.0, level: 10.0}
    resource: {}
activities:
  - name: refuel
    id: refuel
    type: RepeatActivity
    repetitions: 2
    subProcesses:
      - name: top up
        id: top-up
        type: RefuelActivity
        concept: tug
        amount: 15
        secondsPerUnit: 2
";
    let mut simulation = Scenario::from_yaml(scenario)?.into_simulation();
    simulation.run()?;
    assert_eq!(simulation.get_level("tug", "default")?, 40.0);
    assert_eq!(simulation.get_global_time(), 60.0);
    assert_eq!(
        simulation.get_activity("top-up")?.get_type(),
        "RefuelActivity"
    );
    let yaml = serde_yaml::to_string(&simulation)?;
    assert!(yaml.contains("secondsPerUnit"));
    Ok(())
}

/// Sloshing moves content in and out of a container without ever taking
/// simulation time, so the simulation never settles.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableActivity)]
pub struct SloshActivity {
    concept: String,
}

impl ActivityModel for SloshActivity {
    fn execute(
        &mut self,
        _core: &mut ActivityCore,
        world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        if !world.try_put(&self.concept, 1.0, "default")? {
            world.try_get(&self.concept, 1.0, "default")?;
        }
        Ok(false)
    }

    fn time_advance(&mut self, _time_delta: f64) {}

    fn until_next_event(&self) -> f64 {
        INFINITY
    }

    fn reset(&mut self) {}

    fn status(&self) -> String {
        String::from("Sloshing")
    }
}

#[test]
fn endless_instantaneous_changes_are_a_scheduling_error() -> Result<(), SimulationError> {
    register![SloshActivity];
    let scenario = "
concepts:
  - name: tank
    id: tank
    container:
      stores:
        default: {capacity: 1.0}
activities:
  - name: slosh
    type: SloshActivity
    concept: tank
";
    let mut simulation = Scenario::from_yaml(scenario)?.into_simulation();
    assert!(matches!(
        simulation.step(),
        Err(SimulationError::EventSchedulingError)
    ));
    Ok(())
}

#[test]
fn unknown_concepts_fail_the_run() -> Result<(), SimulationError> {
    let scenario = "
activities:
  - name: sailing
    type: MoveActivity
    mover: ghost
    destination: nowhere
";
    let mut simulation: Simulation = Scenario::from_yaml(scenario)?.into_simulation();
    assert!(matches!(
        simulation.run(),
        Err(SimulationError::ConceptNotFound(_))
    ));
    Ok(())
}

#[test]
fn overfull_containers_are_rejected() {
    let scenario = "
concepts:
  - name: barge
    id: barge
    container:
      stores:
        default: {capacity: 1.0, level: 50.0}
";
    assert!(matches!(
        Scenario::from_yaml(scenario),
        Err(SimulationError::YAMLError(_))
    ));
}

#[test]
fn containers_hold_at_most_their_store_capacity() -> Result<(), SimulationError> {
    let crowded = "
concepts:
  - name: barge
    id: barge
    container:
      stores:
        sand: {capacity: 1.0}
        gravel: {capacity: 1.0}
";
    assert!(Scenario::from_yaml(crowded).is_err());
    let roomy = crowded.replace("    container:\n", "    container:\n      storeCapacity: 2\n");
    let simulation = Scenario::from_yaml(&roomy)?.into_simulation();
    assert_eq!(simulation.get_level("barge", "gravel")?, 0.0);
    Ok(())
}

#[test]
#[wasm_bindgen_test]
fn web_simulations_run_yaml_scenarios() {
    let mut simulation = WebSimulation::post_yaml(demo_yaml()).unwrap();
    simulation.run().unwrap();
    assert!(simulation.is_done());
    assert_eq!(simulation.get_level("vessel", "default").unwrap(), 5.0);
    let log: serde_json::Value = serde_json::from_str(&simulation.get_log_json("vessel").unwrap()).unwrap();
    let entries = log["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0]["activityState"], "START");
    assert_eq!(entries[0]["activityId"], "shift");
}
