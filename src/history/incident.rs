use crate::{
    query::{QueryMethod, QueryResource, SortOrder},
    Client,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An incident, open or resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricIncident {
    pub id: String,
    pub process_definition_key: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::date::option")]
    pub end_time: Option<DateTime<Utc>>,
    pub incident_type: String,
    pub activity_id: Option<String>,
    pub cause_incident_id: Option<String>,
    pub root_cause_incident_id: Option<String>,
    pub configuration: Option<String>,
    pub incident_message: Option<String>,
    pub tenant_id: Option<String>,
    pub job_definition_id: Option<String>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub resolved: bool,
}

/// Properties historic incidents can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricIncidentSorting {
    /// by incident id
    IncidentId,
    /// by creation time
    CreateTime,
    /// by end time
    EndTime,
    /// by incident type
    IncidentType,
    /// by execution id
    ExecutionId,
    /// by activity id
    ActivityId,
    /// by process instance id
    ProcessInstanceId,
    /// by process definition id
    ProcessDefinitionId,
    /// by cause incident id
    CauseIncidentId,
    /// by root cause incident id
    RootCauseIncidentId,
    /// by configuration
    Configuration,
    /// by tenant id
    TenantId,
    /// by incident state
    IncidentState,
}

/// Filter for historic incidents.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricIncidentQuery {
    /// Filter by incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Filter by incident type, e.g. `failedJob`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Filter by incident message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by activity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Filter by cause incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_incident_id: Option<String>,
    /// Filter by root cause incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause_incident_id: Option<String>,
    /// Filter by configuration, e.g. the id of the failed job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    /// Only include open incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    /// Only include resolved incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    /// Only include deleted incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricIncidentSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic incidents.
#[derive(Clone, Debug)]
pub struct HistoricIncidentService {
    client: Client,
}

impl HistoricIncidentService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricIncidentService { client }
    }

    /// Query historic incidents.
    pub fn query(
        &self,
        query: HistoricIncidentQuery,
    ) -> QueryResource<HistoricIncidentQuery, HistoricIncident> {
        QueryResource::new(
            self.client.clone(),
            "/history/incident",
            QueryMethod::Get,
            query,
        )
    }
}
