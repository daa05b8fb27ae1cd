//! Small records shared by several resources.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hypermedia link returned alongside created resources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// The HTTP method of the link.
    pub method: String,
    /// The absolute URL of the link.
    pub href: String,
    /// The relation of the link to the resource.
    pub rel: String,
}

/// Suspend or activate a single resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspensionState {
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
}

/// Location of a deployed form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    /// The form key.
    pub key: Option<String>,
    /// The context path of the process application the form belongs to.
    pub context_path: Option<String>,
}

/// Number of days historic data is kept for a definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTimeToLive {
    /// `None` removes the setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_time_to_live: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Retries {
    pub(crate) retries: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Priority {
    pub(crate) priority: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserIdBody<'a> {
    pub(crate) user_id: &'a str,
}

/// Suspend or activate a definition, optionally cascading to its instances
/// and at a later point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSuspensionState {
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
    /// Also suspend or activate the dependent instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_process_instances: Option<bool>,
    /// When to apply the change; immediately if not set.
    #[serde(
        default,
        with = "crate::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_date: Option<DateTime<Utc>>,
}
