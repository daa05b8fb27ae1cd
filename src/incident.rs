use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open incident, e.g. a job which ran out of retries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInfo {
    /// The id of the incident.
    pub id: String,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: Option<String>,
    /// The id of the execution the incident occurred in.
    pub execution_id: Option<String>,
    /// When the incident was created.
    #[serde(default, with = "crate::date::option")]
    pub incident_timestamp: Option<DateTime<Utc>>,
    /// The type of the incident, e.g. `failedJob`.
    pub incident_type: String,
    /// The id of the activity the incident occurred in.
    pub activity_id: Option<String>,
    /// The incident which caused this one.
    pub cause_incident_id: Option<String>,
    /// The root of the chain of incidents which caused this one.
    pub root_cause_incident_id: Option<String>,
    /// Type specific payload, e.g. the id of the failed job.
    pub configuration: Option<String>,
    /// The tenant id of the incident.
    pub tenant_id: Option<String>,
    /// The incident message.
    pub incident_message: Option<String>,
    /// The job definition of a failed job.
    pub job_definition_id: Option<String>,
}

/// Properties incidents can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncidentSorting {
    /// by id
    IncidentId,
    /// by message
    IncidentMessage,
    /// by creation time
    IncidentTimestamp,
    /// by type
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
}

/// Filter for incidents.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQuery {
    /// Filter by incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Filter by incident type.
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
    /// Filter by configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Filter by a list of job definition ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_definition_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<IncidentSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Incidents.
#[derive(Clone, Debug)]
pub struct IncidentService {
    client: Client,
}

impl IncidentService {
    pub(crate) fn new(client: Client) -> Self {
        IncidentService { client }
    }

    /// Query incidents.
    pub fn query(&self, query: IncidentQuery) -> QueryResource<IncidentQuery, IncidentInfo> {
        QueryResource::new(self.client.clone(), "/incident", QueryMethod::Get, query)
    }

    /// Resolve an incident. Failed job incidents are resolved by setting job
    /// retries instead.
    #[tracing::instrument(skip(self), name = "resolve_incident", err)]
    pub async fn resolve(&self, incident_id: &str) -> Result<()> {
        self.client
            .delete(format!("/incident/{}", segment(incident_id)))
            .send_empty()
            .await
    }
}
