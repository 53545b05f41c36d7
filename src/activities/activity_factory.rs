use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use serde::de;
use serde::Deserializer;

use super::activity_trait::ActivityModel;

pub type ActivityConstructor = fn(serde_yaml::Value) -> Option<Box<dyn ActivityModel>>;

lazy_static! {
    static ref CONSTRUCTORS: Mutex<HashMap<&'static str, ActivityConstructor>> = {
        let mut m = HashMap::new();
        m.insert(
            "BasicActivity",
            super::BasicActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "MoveActivity",
            super::MoveActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "ShiftAmountActivity",
            super::ShiftAmountActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "SequentialActivity",
            super::SequentialActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "WhileActivity",
            super::WhileActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "RepeatActivity",
            super::RepeatActivity::from_value as ActivityConstructor,
        );
        m.insert(
            "ParallelActivity",
            super::ParallelActivity::from_value as ActivityConstructor,
        );
        Mutex::new(m)
    };
}

fn constructors() -> MutexGuard<'static, HashMap<&'static str, ActivityConstructor>> {
    CONSTRUCTORS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Makes a custom activity type available to scenario configuration.
pub fn register(activity_type: &'static str, activity_constructor: ActivityConstructor) {
    constructors().insert(activity_type, activity_constructor);
}

pub fn create<'de, D: Deserializer<'de>>(
    activity_type: &str,
    extra_fields: serde_yaml::Value,
) -> Result<Box<dyn ActivityModel>, D::Error> {
    let constructor = constructors().get(activity_type).copied();
    match constructor {
        Some(constructor) => constructor(extra_fields).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid configuration for activity type {}",
                activity_type
            ))
        }),
        None => {
            let variants: Vec<&'static str> = constructors().keys().copied().collect();
            Err(de::Error::custom(format!(
                "unknown activity type `{}`, expected one of {:?}",
                activity_type, variants
            )))
        }
    }
}
