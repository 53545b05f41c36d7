use super::lifecycle::ActivityCore;
use super::Activity;
use crate::simulator::world::World;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

pub trait ActivityClone {
    fn clone_box(&self) -> Box<dyn ActivityModel>;
}

impl<T> ActivityClone for T
where
    T: 'static + ActivityModel + Clone,
{
    fn clone_box(&self) -> Box<dyn ActivityModel> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ActivityModel> {
    fn clone(&self) -> Box<dyn ActivityModel> {
        self.clone_box()
    }
}

pub trait SerializableActivity {
    fn get_type(&self) -> &'static str {
        "Activity"
    }
    fn serialize(&self) -> serde_yaml::Value {
        serde_yaml::Value::Null
    }
}

/// The `ActivityModel` trait defines the body of an activity.  The shared
/// lifecycle (start conditions, plugins, start/stop logging and the
/// registry) is driven by `Activity`, which calls into the body:
/// `acquire` before plugin pre-processing, `execute` between the START and
/// STOP log entries, and `release` after plugin post-processing.  `acquire`
/// and `execute` are polled until they report completion, so they must be
/// written as resumable state machines.  Timed waits are exposed through
/// `until_next_event` and `time_advance`, as relative durations.
pub trait ActivityModel: ActivityClone + SerializableActivity {
    fn acquire(
        &mut self,
        _core: &mut ActivityCore,
        _world: &mut World,
        _services: &mut Services,
    ) -> Result<bool, SimulationError> {
        Ok(true)
    }
    fn execute(
        &mut self,
        core: &mut ActivityCore,
        world: &mut World,
        services: &mut Services,
    ) -> Result<bool, SimulationError>;
    fn release(
        &mut self,
        _core: &mut ActivityCore,
        _world: &mut World,
        _services: &mut Services,
    ) -> Result<(), SimulationError> {
        Ok(())
    }
    fn time_advance(&mut self, time_delta: f64);
    fn until_next_event(&self) -> f64;
    /// Prepares the body for another run, keeping its configuration.
    fn reset(&mut self);
    /// The fixed duration of the body, when it has one.
    fn duration(&self) -> Option<f64> {
        None
    }
    /// Concepts that mirror the waiting entries of the activity.
    fn additional_logs(&self) -> &[String] {
        &[]
    }
    fn sub_activities(&self) -> Vec<&Activity> {
        Vec::new()
    }
    fn status(&self) -> String;
}
