use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One state change of a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricJobLog {
    pub id: String,
    #[serde(default, with = "crate::date::option")]
    pub timestamp: Option<DateTime<Utc>>,
    pub job_id: String,
    #[serde(default, with = "crate::date::option")]
    pub job_due_date: Option<DateTime<Utc>>,
    pub job_retries: Option<i32>,
    pub job_priority: Option<i64>,
    pub job_exception_message: Option<String>,
    pub job_definition_id: Option<String>,
    pub job_definition_type: Option<String>,
    pub job_definition_configuration: Option<String>,
    pub activity_id: Option<String>,
    pub execution_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_definition_key: Option<String>,
    pub deployment_id: Option<String>,
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub creation_log: bool,
    #[serde(default)]
    pub failure_log: bool,
    #[serde(default)]
    pub success_log: bool,
    #[serde(default)]
    pub deletion_log: bool,
}

/// Properties historic job logs can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricJobLogSorting {
    /// by timestamp
    Timestamp,
    /// by job id
    JobId,
    /// by job definition id
    JobDefinitionId,
    /// by job due date
    JobDueDate,
    /// by job retries
    JobRetries,
    /// by job priority
    JobPriority,
    /// by activity id
    ActivityId,
    /// by execution id
    ExecutionId,
    /// by process instance id
    ProcessInstanceId,
    /// by process definition id
    ProcessDefinitionId,
    /// by process definition key
    ProcessDefinitionKey,
    /// by deployment id
    DeploymentId,
    /// by order of occurrence
    Occurrence,
    /// by tenant id
    TenantId,
}

/// Filter for historic job logs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricJobLogQuery {
    /// Filter by log id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
    /// Filter by job id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Filter by job exception message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_exception_message: Option<String>,
    /// Filter by job definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_definition_id: Option<String>,
    /// Filter by job definition type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_definition_type: Option<String>,
    /// Filter by a list of activity ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_id_in: Vec<String>,
    /// Filter by a list of execution ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub execution_id_in: Vec<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by deployment id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    /// Only include logs of job creations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_log: Option<bool>,
    /// Only include logs of failed executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_log: Option<bool>,
    /// Only include logs of successful executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_log: Option<bool>,
    /// Only include logs of job deletions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_log: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricJobLogSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic job logs.
#[derive(Clone, Debug)]
pub struct HistoricJobLogService {
    client: Client,
}

impl HistoricJobLogService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricJobLogService { client }
    }

    /// Query historic job logs.
    pub fn query(
        &self,
        query: HistoricJobLogQuery,
    ) -> QueryResource<HistoricJobLogQuery, HistoricJobLog> {
        QueryResource::new(
            self.client.clone(),
            "/history/job-log",
            QueryMethod::Get,
            query,
        )
    }

    /// Retrieve a historic job log.
    #[tracing::instrument(skip(self), name = "get_historic_job_log", err)]
    pub async fn get(&self, id: &str) -> Result<HistoricJobLog> {
        self.client
            .get(format!("/history/job-log/{}", segment(id)))
            .send()
            .await
    }

    /// The stacktrace of a failure log.
    #[tracing::instrument(skip(self), name = "get_historic_job_log_stacktrace", err)]
    pub async fn stacktrace(&self, id: &str) -> Result<String> {
        self.client
            .get(format!("/history/job-log/{}/stacktrace", segment(id)))
            .send_text()
            .await
    }
}
