use serde::{Deserialize, Serialize};

use super::condition::Condition;
use crate::concepts::identifiable::new_id;
use crate::plugins::Plugin;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRepr {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub start_event: Option<Condition>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub requested_resources: Option<String>,
    #[serde(default)]
    pub keep_resources: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_yaml::Value,
}
