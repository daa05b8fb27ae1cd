use crate::{
    common::Retries,
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job definition, created for every asynchronous activity, timer or
/// message event of a deployed process definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinitionInfo {
    /// The id of the job definition.
    pub id: String,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The key of the process definition.
    pub process_definition_key: Option<String>,
    /// The id of the activity the jobs are created for.
    pub activity_id: Option<String>,
    /// The type of the jobs, e.g. `timer-intermediate-transition`.
    pub job_type: String,
    /// The configuration of the jobs, e.g. a timer expression.
    pub job_configuration: Option<String>,
    /// Priority overriding the one of created jobs.
    pub overriding_job_priority: Option<i64>,
    /// Whether the job definition is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The tenant id of the job definition.
    pub tenant_id: Option<String>,
}

/// Properties job definitions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobDefinitionSorting {
    /// by job definition id
    JobDefinitionId,
    /// by activity id
    ActivityId,
    /// by process definition id
    ProcessDefinitionId,
    /// by process definition key
    ProcessDefinitionKey,
    /// by job type
    JobType,
    /// by job configuration
    JobConfiguration,
    /// by tenant id
    TenantId,
}

/// Filter for job definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinitionQuery {
    /// Filter by job definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_definition_id: Option<String>,
    /// Filter by a list of activity ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_id_in: Vec<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by job type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// Filter by job configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_configuration: Option<String>,
    /// Only include active job definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended job definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include job definitions with an overriding priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_overriding_job_priority: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include job definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include job definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_job_definitions_without_tenant_id: Option<bool>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<JobDefinitionSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Suspend or activate job definitions, optionally with their jobs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinitionSuspensionState {
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
    /// Also suspend or activate the existing jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_jobs: Option<bool>,
    /// When to apply the change; immediately if not set.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub execution_date: Option<DateTime<Utc>>,
    /// Select the job definitions of a process definition. Bulk only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Select the job definitions of all process definitions with a key. Bulk only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Restrict a key selection to a tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_tenant_id: Option<String>,
    /// Restrict a key selection to definitions without tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_without_tenant_id: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobPriority {
    priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_jobs: Option<bool>,
}

/// Job definitions.
#[derive(Clone, Debug)]
pub struct JobDefinitionService {
    client: Client,
}

impl JobDefinitionService {
    pub(crate) fn new(client: Client) -> Self {
        JobDefinitionService { client }
    }

    /// Query job definitions.
    pub fn query(
        &self,
        query: JobDefinitionQuery,
    ) -> QueryResource<JobDefinitionQuery, JobDefinitionInfo> {
        QueryResource::new(self.client.clone(), "/job-definition", QueryMethod::Get, query)
    }

    /// Suspend or activate the job definitions of a process definition.
    #[tracing::instrument(skip(self), name = "suspend_job_definitions", err)]
    pub async fn suspend_or_activate(&self, state: JobDefinitionSuspensionState) -> Result<()> {
        self.client
            .put("/job-definition/suspended")
            .json(&state)?
            .send_empty()
            .await
    }

    /// A job definition by id.
    pub fn by_id(&self, job_definition_id: &str) -> JobDefinitionResource {
        JobDefinitionResource {
            client: self.client.clone(),
            path: format!("/job-definition/{}", segment(job_definition_id)),
        }
    }
}

/// A single job definition.
#[derive(Clone, Debug)]
pub struct JobDefinitionResource {
    client: Client,
    path: String,
}

impl JobDefinitionResource {
    /// Retrieve the job definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_job_definition", err)]
    pub async fn get(&self) -> Result<JobDefinitionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Suspend or activate the job definition. Only `suspended`,
    /// `include_jobs` and `execution_date` apply.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "suspend_job_definition", err)]
    pub async fn suspend_or_activate(&self, state: JobDefinitionSuspensionState) -> Result<()> {
        self.client
            .put(format!("{}/suspended", self.path))
            .json(&state)?
            .send_empty()
            .await
    }

    /// Set the retries of all failed jobs of the definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_job_definition_retries", err)]
    pub async fn set_retries(&self, retries: i32) -> Result<()> {
        self.client
            .put(format!("{}/retries", self.path))
            .json(&Retries { retries })?
            .send_empty()
            .await
    }

    /// Override the priority of new jobs; `None` clears the override.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_job_priority", err)]
    pub async fn set_priority(&self, priority: Option<i64>, include_jobs: bool) -> Result<()> {
        self.client
            .put(format!("{}/jobPriority", self.path))
            .json(&JobPriority {
                priority,
                include_jobs: include_jobs.then_some(true),
            })?
            .send_empty()
            .await
    }
}
