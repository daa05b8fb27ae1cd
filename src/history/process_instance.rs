use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::VariableQueryParameter,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The final or current state of a historic process instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoricProcessInstanceState {
    /// running
    Active,
    /// running but suspended
    Suspended,
    /// ended normally
    Completed,
    /// canceled through the API
    ExternallyTerminated,
    /// canceled from within the process, e.g. by a terminate end event
    InternallyTerminated,
}

/// A historic process instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricProcessInstance {
    /// The id of the process instance.
    pub id: String,
    /// The business key of the process instance.
    pub business_key: Option<String>,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The key of the process definition.
    pub process_definition_key: Option<String>,
    /// The name of the process definition.
    pub process_definition_name: Option<String>,
    /// The version of the process definition.
    pub process_definition_version: Option<i32>,
    /// When the process instance started.
    #[serde(default, with = "crate::date::option")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the process instance ended.
    #[serde(default, with = "crate::date::option")]
    pub end_time: Option<DateTime<Utc>>,
    /// How long the process instance ran.
    pub duration_in_millis: Option<u64>,
    /// The user who started the process instance.
    pub start_user_id: Option<String>,
    /// The activity at which the process instance started.
    pub start_activity_id: Option<String>,
    /// Why the process instance was deleted.
    pub delete_reason: Option<String>,
    /// The calling process instance.
    pub super_process_instance_id: Option<String>,
    /// The calling case instance.
    pub super_case_instance_id: Option<String>,
    /// The case instance the process instance belongs to.
    pub case_instance_id: Option<String>,
    /// The tenant id of the process instance.
    pub tenant_id: Option<String>,
    /// The state of the process instance.
    pub state: Option<HistoricProcessInstanceState>,
}

/// Properties historic process instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricProcessInstanceSorting {
    /// by process instance id
    InstanceId,
    /// by process definition id
    DefinitionId,
    /// by process definition key
    DefinitionKey,
    /// by process definition name
    DefinitionName,
    /// by process definition version
    DefinitionVersion,
    /// by business key
    BusinessKey,
    /// by start time
    StartTime,
    /// by end time
    EndTime,
    /// by duration
    Duration,
    /// by tenant id
    TenantId,
}

/// Filter for historic process instances, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricProcessInstanceQuery {
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by a list of process instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_ids: Vec<String>,
    /// Filter by business key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_business_key: Option<String>,
    /// Filter by business keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_business_key_like: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by process definition name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_name: Option<String>,
    /// Exclude process definitions with these keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_key_not_in: Vec<String>,
    /// Only include finished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    /// Only include unfinished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfinished: Option<bool>,
    /// Only include instances with incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_incidents: Option<bool>,
    /// Only include instances with root incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_root_incidents: Option<bool>,
    /// Filter by incident type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Filter by incident status, `open` or `resolved`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_status: Option<String>,
    /// Only include instances started before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub started_before: Option<DateTime<Utc>>,
    /// Only include instances started after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub started_after: Option<DateTime<Utc>>,
    /// Only include instances finished before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub finished_before: Option<DateTime<Utc>>,
    /// Only include instances finished after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub finished_after: Option<DateTime<Utc>>,
    /// Filter by the user who started the instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    /// Only include instances called from this process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_process_instance_id: Option<String>,
    /// Only include instances which call this process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_process_instance_id: Option<String>,
    /// Only include instances called from this case instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_case_instance_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include instances which executed these activities.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub executed_activity_id_in: Vec<String>,
    /// Only include instances currently waiting in these activities.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub active_activity_id_in: Vec<String>,
    /// Only include active instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include completed instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Only include externally terminated instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externally_terminated: Option<bool>,
    /// Only include internally terminated instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internally_terminated: Option<bool>,
    /// Only include instances with certain variable values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableQueryParameter>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<HistoricProcessInstanceSorting>>,
}

/// Historic process instances.
#[derive(Clone, Debug)]
pub struct HistoricProcessInstanceService {
    client: Client,
}

impl HistoricProcessInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricProcessInstanceService { client }
    }

    /// Query historic process instances.
    pub fn query(
        &self,
        query: HistoricProcessInstanceQuery,
    ) -> QueryResource<HistoricProcessInstanceQuery, HistoricProcessInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/process-instance",
            QueryMethod::Post,
            query,
        )
    }

    /// Retrieve a historic process instance.
    #[tracing::instrument(skip(self), name = "get_historic_process_instance", err)]
    pub async fn get(&self, id: &str) -> Result<HistoricProcessInstance> {
        self.client
            .get(format!("/history/process-instance/{}", segment(id)))
            .send()
            .await
    }

    /// Delete a finished process instance together with its history.
    #[tracing::instrument(skip(self), name = "delete_historic_process_instance", err)]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(format!("/history/process-instance/{}", segment(id)))
            .send_empty()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn states_are_upper_case() {
        let instance: HistoricProcessInstance = serde_json::from_value(json!({
            "id": "p1",
            "processDefinitionKey": "invoice",
            "startTime": "2013-03-23T13:42:43.000+0200",
            "endTime": null,
            "state": "EXTERNALLY_TERMINATED"
        }))
        .unwrap();

        assert_eq!(
            instance.state,
            Some(HistoricProcessInstanceState::ExternallyTerminated)
        );
        assert!(instance.end_time.is_none());
    }

    #[test]
    fn query_body_uses_sorting_list() {
        let query = HistoricProcessInstanceQuery {
            finished: Some(true),
            sorting: vec![SortingInfo::desc(HistoricProcessInstanceSorting::EndTime)],
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "finished": true,
                "sorting": [{ "sortBy": "endTime", "sortOrder": "desc" }]
            })
        );
    }
}
