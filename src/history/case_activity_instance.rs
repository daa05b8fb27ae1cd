use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A historic case activity instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCaseActivityInstance {
    /// The id of the case activity instance.
    pub id: String,
    /// The id of the parent case activity instance.
    pub parent_case_activity_instance_id: Option<String>,
    /// The id of the case activity.
    pub case_activity_id: String,
    /// The name of the case activity.
    pub case_activity_name: Option<String>,
    /// The type of the case activity.
    pub case_activity_type: Option<String>,
    /// The id of the case definition.
    pub case_definition_id: Option<String>,
    /// The id of the case instance.
    pub case_instance_id: Option<String>,
    /// The id of the case execution.
    pub case_execution_id: Option<String>,
    /// The id of the task, for human tasks.
    pub task_id: Option<String>,
    /// The process instance started by a process task.
    pub called_process_instance_id: Option<String>,
    /// The case instance started by a case task.
    pub called_case_instance_id: Option<String>,
    /// The tenant id of the case activity instance.
    pub tenant_id: Option<String>,
    /// When the case activity instance was created.
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
    /// When the case activity instance ended.
    #[serde(default, with = "crate::date::option")]
    pub end_time: Option<DateTime<Utc>>,
    /// How long the case activity instance ran.
    pub duration_in_millis: Option<u64>,
    /// Whether the case activity instance is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the case activity instance is available.
    #[serde(default)]
    pub available: bool,
    /// Whether the case activity instance is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Whether the case activity instance is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether the case activity instance is active.
    #[serde(default)]
    pub active: bool,
    /// Whether the case activity instance is completed.
    #[serde(default)]
    pub completed: bool,
    /// Whether the case activity instance is terminated.
    #[serde(default)]
    pub terminated: bool,
}

/// Properties historic case activity instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricCaseActivityInstanceSorting {
    /// by case activity instance id
    CaseActivityInstanceId,
    /// by case instance id
    CaseInstanceId,
    /// by case execution id
    CaseExecutionId,
    /// by case activity id
    CaseActivityId,
    /// by case activity name
    CaseActivityName,
    /// by case activity type
    CaseActivityType,
    /// by creation time
    CreateTime,
    /// by end time
    EndTime,
    /// by duration
    Duration,
    /// by case definition id
    CaseDefinitionId,
    /// by tenant id
    TenantId,
}

/// Filter for historic case activity instances.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCaseActivityInstanceQuery {
    /// Filter by case activity instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_activity_instance_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by case definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_id: Option<String>,
    /// Filter by case execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_execution_id: Option<String>,
    /// Filter by case activity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_activity_id: Option<String>,
    /// Filter by case activity name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_activity_name: Option<String>,
    /// Filter by case activity type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_activity_type: Option<String>,
    /// Only include instances created before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    /// Only include instances created after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    /// Only include instances ended before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub ended_before: Option<DateTime<Utc>>,
    /// Only include instances ended after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub ended_after: Option<DateTime<Utc>>,
    /// Only include finished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    /// Only include unfinished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfinished: Option<bool>,
    /// Only include required instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Only include available instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    /// Only include enabled instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Only include disabled instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Only include active instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include completed instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Only include terminated instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricCaseActivityInstanceSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic case activity instances.
#[derive(Clone, Debug)]
pub struct HistoricCaseActivityInstanceService {
    client: Client,
}

impl HistoricCaseActivityInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricCaseActivityInstanceService { client }
    }

    /// Query historic case activity instances.
    pub fn query(
        &self,
        query: HistoricCaseActivityInstanceQuery,
    ) -> QueryResource<HistoricCaseActivityInstanceQuery, HistoricCaseActivityInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/case-activity-instance",
            QueryMethod::Get,
            query,
        )
    }

    /// Retrieve a historic case activity instance.
    #[tracing::instrument(skip(self), name = "get_historic_case_activity_instance", err)]
    pub async fn get(&self, id: &str) -> Result<HistoricCaseActivityInstance> {
        self.client
            .get(format!("/history/case-activity-instance/{}", segment(id)))
            .send()
            .await
    }
}
