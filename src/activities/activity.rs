use std::f64::INFINITY;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::activity_trait::ActivityModel;
use super::condition::Condition;
use super::lifecycle::{ActivityCore, Lifecycle, Phase};
use crate::concepts::{Identifiable, Log};
use crate::concepts::identifiable::new_id;
use crate::plugins::{sort_plugins, Plugin};
use crate::simulator::world::World;

/// `Activity` wraps an activity body and provides what all activities
/// share: identity, an optional start condition, plugins, resource
/// grouping, a log, and the lifecycle that drives the body.
#[derive(Clone)]
pub struct Activity {
    pub(crate) core: ActivityCore,
    pub(crate) start_event: Option<Condition>,
    pub(crate) plugins: Vec<Plugin>,
    pub(crate) inner: Box<dyn ActivityModel>,
    pub(crate) lifecycle: Lifecycle,
}

impl Activity {
    pub fn new(name: &str, inner: Box<dyn ActivityModel>) -> Self {
        Self {
            core: ActivityCore {
                id: new_id(),
                name: name.to_string(),
                requested_resources: None,
                keep_resources: Vec::new(),
                log: Log::default(),
            },
            start_event: None,
            plugins: Vec::new(),
            inner,
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.core.id = id.to_string();
        self
    }

    pub fn with_start_event(mut self, start_event: Condition) -> Self {
        self.start_event = Some(start_event);
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        sort_plugins(&mut self.plugins);
        self
    }

    /// Places the activity in a resource group.  Activities in the same
    /// group share the resources any of them holds.
    pub fn with_requested_resources(mut self, group: &str) -> Self {
        self.core.requested_resources = Some(group.to_string());
        self
    }

    /// Concepts whose resources are not released when the activity ends.
    pub fn with_keep_resources(mut self, concepts: Vec<String>) -> Self {
        self.core.keep_resources = concepts;
        self
    }

    pub fn log(&self) -> &Log {
        &self.core.log
    }

    pub fn is_done(&self) -> bool {
        self.lifecycle.phase == Phase::Done
    }

    pub fn status(&self) -> String {
        match self.lifecycle.phase {
            Phase::Idle => String::from("Idle"),
            Phase::AwaitingStart => String::from("Waiting for start event"),
            Phase::Acquiring => String::from("Acquiring"),
            Phase::PreProcessing | Phase::PostProcessing => String::from("Processing plugins"),
            Phase::Executing => self.inner.status(),
            Phase::Done => String::from("Done"),
        }
    }

    pub fn get_type(&self) -> &'static str {
        self.inner.get_type()
    }

    pub fn sub_activities(&self) -> Vec<&Activity> {
        self.inner.sub_activities()
    }

    /// Finds this activity, or one of its nested sub-activities, by id.
    pub fn find(&self, id: &str) -> Option<&Activity> {
        if self.core.id == id {
            return Some(self);
        }
        self.inner
            .sub_activities()
            .into_iter()
            .find_map(|activity| activity.find(id))
    }

    /// Adds this activity and its nested sub-activities to the registry.
    pub(crate) fn register(&self, world: &mut World) {
        world.register_activity(&self.core.id, &self.core.name);
        self.inner
            .sub_activities()
            .into_iter()
            .for_each(|activity| activity.register(world));
    }

    pub fn until_next_event(&self) -> f64 {
        if self.is_done() {
            INFINITY
        } else {
            f64::min(self.lifecycle.until_next_event, self.inner.until_next_event())
        }
    }

    pub fn time_advance(&mut self, time_delta: f64) {
        self.lifecycle.until_next_event -= time_delta;
        self.inner.time_advance(time_delta);
    }
}

impl Identifiable for Activity {
    fn id(&self) -> &str {
        &self.core.id
    }

    fn name(&self) -> &str {
        &self.core.name
    }
}

impl Serialize for Activity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra_fields: serde_yaml::Value = self.inner.serialize();
        let mut activity = serializer.serialize_map(None)?;
        activity.serialize_entry("id", &self.core.id)?;
        activity.serialize_entry("name", &self.core.name)?;
        activity.serialize_entry("type", self.inner.get_type())?;
        if let Some(start_event) = &self.start_event {
            activity.serialize_entry("startEvent", start_event)?;
        }
        if !self.plugins.is_empty() {
            activity.serialize_entry("plugins", &self.plugins)?;
        }
        if let Some(group) = &self.core.requested_resources {
            activity.serialize_entry("requestedResources", group)?;
        }
        if !self.core.keep_resources.is_empty() {
            activity.serialize_entry("keepResources", &self.core.keep_resources)?;
        }
        if let serde_yaml::Value::Mapping(map) = extra_fields {
            for (key, value) in map.iter() {
                activity.serialize_entry(&key, &value)?;
            }
        }
        activity.end()
    }
}

impl<'de> Deserialize<'de> for Activity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let activity_repr = super::ActivityRepr::deserialize(deserializer)?;
        let inner = super::activity_factory::create::<D>(
            &activity_repr.activity_type[..],
            activity_repr.extra,
        )?;
        let mut activity = Activity::new(&activity_repr.name, inner).with_id(&activity_repr.id);
        activity.start_event = activity_repr.start_event;
        activity.plugins = activity_repr.plugins;
        sort_plugins(&mut activity.plugins);
        activity.core.requested_resources = activity_repr.requested_resources;
        activity.core.keep_resources = activity_repr.keep_resources;
        Ok(activity)
    }
}
