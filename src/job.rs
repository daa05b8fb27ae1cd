use crate::{
    common::{Priority, Retries, SuspensionState},
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A job, i.e. a timer, an asynchronous continuation or a message event
/// waiting to be executed by the job executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// The id of the job.
    pub id: String,
    /// The id of the job definition the job was created from.
    pub job_definition_id: Option<String>,
    /// When the job becomes executable; `None` means immediately.
    #[serde(default, with = "crate::date::option")]
    pub due_date: Option<DateTime<Utc>>,
    /// The id of the process instance the job belongs to.
    pub process_instance_id: Option<String>,
    /// The id of the execution the job belongs to.
    pub execution_id: Option<String>,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The key of the process definition.
    pub process_definition_key: Option<String>,
    /// The remaining retries.
    pub retries: i32,
    /// The message of the exception of the last failed execution.
    pub exception_message: Option<String>,
    /// Whether the job is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The priority of the job.
    #[serde(default)]
    pub priority: i64,
    /// The tenant id of the job.
    pub tenant_id: Option<String>,
    /// When the job was created.
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Properties jobs can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobSorting {
    /// by job id
    JobId,
    /// by execution id
    ExecutionId,
    /// by process instance id
    ProcessInstanceId,
    /// by process definition id
    ProcessDefinitionId,
    /// by process definition key
    ProcessDefinitionKey,
    /// by priority
    JobPriority,
    /// by remaining retries
    JobRetries,
    /// by due date
    JobDueDate,
    /// by tenant id
    TenantId,
}

/// Filter for jobs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    /// Filter by job id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Filter by a list of job ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_ids: Vec<String>,
    /// Filter by job definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_definition_id: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by a list of process instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_ids: Vec<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by the activity the job was created for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Only include jobs with retries left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_retries_left: Option<bool>,
    /// Only include jobs which are due and have retries left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<bool>,
    /// Only include timers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timers: Option<bool>,
    /// Only include message jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<bool>,
    /// Only include jobs whose last execution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_exception: Option<bool>,
    /// Filter by the exception message of the last execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_message: Option<String>,
    /// Only include jobs without retries left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_retries_left: Option<bool>,
    /// Only include active jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include jobs with at most this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_lower_than_or_equals: Option<i64>,
    /// Only include jobs with at least this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_higher_than_or_equals: Option<i64>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include jobs which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include jobs which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_jobs_without_tenant_id: Option<bool>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<JobSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Suspend or activate all jobs selected by definition or instance.
///
/// Exactly one of the selectors must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSuspensionState {
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
    /// Select the jobs of a job definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_definition_id: Option<String>,
    /// Select the jobs of a process definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Select the jobs of a process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Select the jobs of all process definitions with a key.
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
struct DueDate {
    #[serde(with = "crate::date")]
    duedate: DateTime<Utc>,
}

/// Jobs.
#[derive(Clone, Debug)]
pub struct JobService {
    client: Client,
}

impl JobService {
    pub(crate) fn new(client: Client) -> Self {
        JobService { client }
    }

    /// Query jobs.
    pub fn query(&self, query: JobQuery) -> QueryResource<JobQuery, JobInfo> {
        QueryResource::new(self.client.clone(), "/job", QueryMethod::Get, query)
    }

    /// Suspend or activate many jobs at once.
    #[tracing::instrument(skip(self), name = "suspend_jobs", err)]
    pub async fn suspend_or_activate(&self, state: JobSuspensionState) -> Result<()> {
        self.client
            .put("/job/suspended")
            .json(&state)?
            .send_empty()
            .await
    }

    /// A job by id.
    pub fn by_id(&self, job_id: &str) -> JobResource {
        JobResource {
            client: self.client.clone(),
            path: format!("/job/{}", segment(job_id)),
        }
    }
}

/// A single job.
#[derive(Clone, Debug)]
pub struct JobResource {
    client: Client,
    path: String,
}

impl JobResource {
    /// Retrieve the job.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_job", err)]
    pub async fn get(&self) -> Result<JobInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// The stack trace of the last failed execution.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_job_stacktrace", err)]
    pub async fn stacktrace(&self) -> Result<String> {
        self.client
            .get(format!("{}/stacktrace", self.path))
            .send_text()
            .await
    }

    /// Set the remaining retries. Positive retries resolve a failed job incident.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_job_retries", err)]
    pub async fn set_retries(&self, retries: i32) -> Result<()> {
        self.client
            .put(format!("{}/retries", self.path))
            .json(&Retries { retries })?
            .send_empty()
            .await
    }

    /// Execute the job synchronously.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "execute_job", err)]
    pub async fn execute(&self) -> Result<()> {
        debug!("executing job");
        self.client
            .post(format!("{}/execute", self.path))
            .send_empty()
            .await
    }

    /// Change when the job becomes executable.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_job_due_date", err)]
    pub async fn set_due_date(&self, due_date: DateTime<Utc>) -> Result<()> {
        self.client
            .put(format!("{}/duedate", self.path))
            .json(&DueDate { duedate: due_date })?
            .send_empty()
            .await
    }

    /// Suspend or activate the job.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "suspend_job", err)]
    pub async fn suspend_or_activate(&self, suspended: bool) -> Result<()> {
        self.client
            .put(format!("{}/suspended", self.path))
            .json(&SuspensionState { suspended })?
            .send_empty()
            .await
    }

    /// Set the priority.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_job_priority", err)]
    pub async fn set_priority(&self, priority: i64) -> Result<()> {
        self.client
            .put(format!("{}/priority", self.path))
            .json(&Priority { priority })?
            .send_empty()
            .await
    }

    /// Delete the job.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_job", err)]
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.path.as_str()).send_empty().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn due_date_uses_engine_field_name() {
        let body = DueDate {
            duedate: Utc.with_ymd_and_hms(2013, 8, 13, 18, 43, 28).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "duedate": "2013-08-13T18:43:28.000+0000" })
        );
    }

    #[test]
    fn job_parses_engine_json() {
        let job: JobInfo = serde_json::from_value(json!({
            "id": "aJobId",
            "jobDefinitionId": "aJobDefinitionId",
            "dueDate": "2013-07-17T17:00:00.000+0200",
            "processInstanceId": "aProcessInstanceId",
            "executionId": "anExecutionId",
            "processDefinitionId": "aProcessDefinitionId",
            "processDefinitionKey": "aPDKey",
            "retries": 0,
            "exceptionMessage": "An exception Message",
            "suspended": false,
            "priority": 10,
            "tenantId": null,
            "createTime": "2018-05-05T17:00:00+0200"
        }))
        .unwrap();

        assert_eq!(job.retries, 0);
        assert_eq!(
            job.due_date,
            Some(Utc.with_ymd_and_hms(2013, 7, 17, 15, 0, 0).unwrap())
        );
        assert_eq!(
            job.create_time,
            Some(Utc.with_ymd_and_hms(2018, 5, 5, 15, 0, 0).unwrap())
        );
    }
}
