use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A historic activity instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricActivityInstance {
    /// The id of the activity instance.
    pub id: String,
    /// The id of the parent activity instance.
    pub parent_activity_instance_id: Option<String>,
    /// The id of the activity.
    pub activity_id: String,
    /// The name of the activity.
    pub activity_name: Option<String>,
    /// The type of the activity, e.g. `userTask`.
    pub activity_type: Option<String>,
    /// The key of the process definition.
    pub process_definition_key: Option<String>,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: Option<String>,
    /// The id of the execution.
    pub execution_id: Option<String>,
    /// The id of the task, for user tasks.
    pub task_id: Option<String>,
    /// The process instance started by a call activity.
    pub called_process_instance_id: Option<String>,
    /// The case instance started by a call activity.
    pub called_case_instance_id: Option<String>,
    /// The assignee, for user tasks.
    pub assignee: Option<String>,
    /// When the activity instance started.
    #[serde(default, with = "crate::date::option")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the activity instance ended.
    #[serde(default, with = "crate::date::option")]
    pub end_time: Option<DateTime<Utc>>,
    /// How long the activity instance ran.
    pub duration_in_millis: Option<u64>,
    /// Whether the activity instance was canceled.
    #[serde(default)]
    pub canceled: bool,
    /// Whether the activity instance completed its scope.
    #[serde(default)]
    pub complete_scope: bool,
    /// The tenant id of the activity instance.
    pub tenant_id: Option<String>,
}

/// Properties historic activity instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricActivityInstanceSorting {
    /// by activity instance id
    ActivityInstanceId,
    /// by process instance id
    InstanceId,
    /// by execution id
    ExecutionId,
    /// by activity id
    ActivityId,
    /// by activity name
    ActivityName,
    /// by activity type
    ActivityType,
    /// by start time
    StartTime,
    /// by end time
    EndTime,
    /// by duration
    Duration,
    /// by process definition id
    DefinitionId,
    /// by order of occurrence
    Occurrence,
    /// by tenant id
    TenantId,
}

/// Filter for historic activity instances.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricActivityInstanceQuery {
    /// Filter by activity instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_instance_id: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by activity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Filter by activity name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
    /// Filter by activity type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Filter by the assignee of user tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_assignee: Option<String>,
    /// Only include finished activity instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    /// Only include unfinished activity instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfinished: Option<bool>,
    /// Only include canceled activity instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled: Option<bool>,
    /// Only include activity instances which completed a scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_scope: Option<bool>,
    /// Only include activity instances started before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub started_before: Option<DateTime<Utc>>,
    /// Only include activity instances started after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub started_after: Option<DateTime<Utc>>,
    /// Only include activity instances finished before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub finished_before: Option<DateTime<Utc>>,
    /// Only include activity instances finished after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub finished_after: Option<DateTime<Utc>>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricActivityInstanceSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic activity instances.
#[derive(Clone, Debug)]
pub struct HistoricActivityInstanceService {
    client: Client,
}

impl HistoricActivityInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricActivityInstanceService { client }
    }

    /// Query historic activity instances.
    pub fn query(
        &self,
        query: HistoricActivityInstanceQuery,
    ) -> QueryResource<HistoricActivityInstanceQuery, HistoricActivityInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/activity-instance",
            QueryMethod::Get,
            query,
        )
    }

    /// Retrieve a historic activity instance.
    #[tracing::instrument(skip(self), name = "get_historic_activity_instance", err)]
    pub async fn get(&self, id: &str) -> Result<HistoricActivityInstance> {
        self.client
            .get(format!("/history/activity-instance/{}", segment(id)))
            .send()
            .await
    }
}
