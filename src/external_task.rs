use crate::{
    common::{Priority, Retries},
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::Variables,
    Client, Error, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// An external task as listed by queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTaskInfo {
    /// The id of the external task.
    pub id: String,
    /// The topic the task is published on.
    pub topic_name: Option<String>,
    /// The worker currently holding the lock.
    pub worker_id: Option<String>,
    /// When the current lock expires.
    #[serde(default, with = "crate::date::option")]
    pub lock_expiration_time: Option<DateTime<Utc>>,
    /// The id of the activity the task belongs to.
    pub activity_id: Option<String>,
    /// The id of the activity instance the task belongs to.
    pub activity_instance_id: Option<String>,
    /// The message of the last failure.
    pub error_message: Option<String>,
    /// The id of the execution the task belongs to.
    pub execution_id: Option<String>,
    /// The id of the process definition.
    pub process_definition_id: Option<String>,
    /// The key of the process definition.
    pub process_definition_key: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: Option<String>,
    /// The tenant id of the task.
    pub tenant_id: Option<String>,
    /// The remaining retries, `None` if never set.
    pub retries: Option<i32>,
    /// Whether the task is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The priority of the task.
    #[serde(default)]
    pub priority: i64,
    /// The business key of the process instance.
    pub business_key: Option<String>,
}

/// An external task locked for a worker, with the requested variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedExternalTask {
    /// The task.
    #[serde(flatten)]
    pub task: ExternalTaskInfo,
    /// The details of the last failure.
    pub error_details: Option<String>,
    /// The fetched variables.
    #[serde(default)]
    pub variables: Variables,
}

/// Properties external tasks can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExternalTaskSorting {
    /// by id
    Id,
    /// by lock expiration time
    LockExpirationTime,
    /// by process instance id
    ProcessInstanceId,
    /// by process definition id
    ProcessDefinitionId,
    /// by process definition key
    ProcessDefinitionKey,
    /// by tenant id
    TenantId,
    /// by priority
    TaskPriority,
}

/// Filter for external tasks.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTaskQuery {
    /// Filter by external task id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_task_id: Option<String>,
    /// Filter by topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    /// Filter by the worker holding the lock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// Only include locked tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Only include unlocked tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_locked: Option<bool>,
    /// Only include tasks with retries left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_retries_left: Option<bool>,
    /// Only include tasks without retries left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_retries_left: Option<bool>,
    /// Only include tasks whose lock expires after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub lock_expiration_after: Option<DateTime<Utc>>,
    /// Only include tasks whose lock expires before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub lock_expiration_before: Option<DateTime<Utc>>,
    /// Filter by activity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Filter by a list of activity ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_id_in: Vec<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include active tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include tasks with at least this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_higher_than_or_equals: Option<i64>,
    /// Only include tasks with at most this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_lower_than_or_equals: Option<i64>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ExternalTaskSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// A topic to fetch tasks from.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTopic {
    /// The topic name.
    pub topic_name: String,
    /// How long fetched tasks stay locked, in milliseconds.
    pub lock_duration: u64,
    /// The variables to fetch; all if empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
    /// Only fetch variables of the task's own scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_variables: Option<bool>,
    /// Only fetch tasks of process instances with this business key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
    /// Only fetch tasks of this process definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Only fetch tasks of these process definitions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_id_in: Vec<String>,
    /// Only fetch tasks of process definitions with this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Only fetch tasks of process definitions with one of these keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_key_in: Vec<String>,
    /// Only fetch tasks which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Only fetch tasks of these tenants.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only fetch tasks whose process instance has these variable values.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub process_variables: HashMap<String, serde_json::Value>,
    /// Return object values deserialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deserialize_values: Option<bool>,
}

impl FetchTopic {
    /// Fetch tasks of `topic_name`, locking them for `lock_duration` milliseconds.
    pub fn new<T: Into<String>>(topic_name: T, lock_duration: u64) -> Self {
        FetchTopic {
            topic_name: topic_name.into(),
            lock_duration,
            ..Default::default()
        }
    }

    /// Restrict the fetched variables to the given names.
    pub fn with_variables<I, T>(self, variables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        FetchTopic {
            variables: variables.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Only fetch variables of the task's own scope.
    pub fn with_local_variables(self) -> Self {
        FetchTopic {
            local_variables: Some(true),
            ..self
        }
    }

    /// Only fetch tasks of process instances with this business key.
    pub fn with_business_key<T: Into<String>>(self, business_key: T) -> Self {
        FetchTopic {
            business_key: Some(business_key.into()),
            ..self
        }
    }

    /// Only fetch tasks of process definitions with this key.
    pub fn with_process_definition_key<T: Into<String>>(self, key: T) -> Self {
        FetchTopic {
            process_definition_key: Some(key.into()),
            ..self
        }
    }

    /// Only fetch tasks of these tenants.
    pub fn with_tenant_ids<I, T>(self, tenant_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        FetchTopic {
            tenant_id_in: tenant_ids.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Return object values deserialized.
    pub fn with_deserialized_values(self) -> Self {
        FetchTopic {
            deserialize_values: Some(true),
            ..self
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchExternalTasks {
    worker_id: String,
    max_tasks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    async_response_timeout: Option<u64>,
    topics: Vec<FetchTopic>,
}

/// Fetch and lock external tasks for a worker.
#[derive(Debug)]
pub struct FetchAndLockBuilder {
    client: Client,
    worker_id: Option<String>,
    max_tasks: u32,
    use_priority: Option<bool>,
    async_response_timeout: Option<u64>,
    topics: Vec<FetchTopic>,
}

impl FetchAndLockBuilder {
    fn new(client: Client) -> Self {
        FetchAndLockBuilder {
            client,
            worker_id: None,
            max_tasks: 1,
            use_priority: None,
            async_response_timeout: None,
            topics: Vec::new(),
        }
    }

    /// Set the id of the worker locking the tasks.
    pub fn with_worker_id<T: Into<String>>(self, worker_id: T) -> Self {
        FetchAndLockBuilder {
            worker_id: Some(worker_id.into()),
            ..self
        }
    }

    /// Set the maximum number of tasks to fetch. Defaults to one.
    pub fn with_max_tasks(self, max_tasks: u32) -> Self {
        FetchAndLockBuilder { max_tasks, ..self }
    }

    /// Fetch tasks with higher priority first.
    pub fn with_use_priority(self, use_priority: bool) -> Self {
        FetchAndLockBuilder {
            use_priority: Some(use_priority),
            ..self
        }
    }

    /// Wait up to `timeout` milliseconds for tasks to become available.
    ///
    /// The request timeout of the HTTP client must be longer than this.
    pub fn with_async_response_timeout(self, timeout: u64) -> Self {
        FetchAndLockBuilder {
            async_response_timeout: Some(timeout),
            ..self
        }
    }

    /// Add a topic to fetch tasks from.
    pub fn with_topic(mut self, topic: FetchTopic) -> Self {
        self.topics.push(topic);
        self
    }

    /// Submit the fetch request.
    #[tracing::instrument(skip(self), name = "fetch_and_lock", err)]
    pub async fn send(self) -> Result<Vec<LockedExternalTask>> {
        let worker_id = self
            .worker_id
            .ok_or(Error::InvalidParameters("`worker_id` must be set"))?;
        if self.topics.is_empty() {
            return Err(Error::InvalidParameters("at least one topic must be set"));
        }

        let req = FetchExternalTasks {
            worker_id,
            max_tasks: self.max_tasks,
            use_priority: self.use_priority,
            async_response_timeout: self.async_response_timeout,
            topics: self.topics,
        };

        debug!(worker_id = %req.worker_id, max_tasks = req.max_tasks, "fetching external tasks");
        trace!(?req, "request:");

        let tasks: Vec<LockedExternalTask> = self
            .client
            .post("/external-task/fetchAndLock")
            .json(&req)?
            .send()
            .await?;

        debug!(count = tasks.len(), "locked external tasks");
        Ok(tasks)
    }
}

/// Set the retries of many external tasks at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRetriesForExternalTasks {
    /// The new number of retries.
    pub retries: i32,
    /// The tasks to update.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_task_ids: Vec<String>,
    /// Update the tasks of these process instances.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_ids: Vec<String>,
}

/// Complete a locked task.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteExternalTask {
    /// The worker holding the lock.
    pub worker_id: String,
    /// Process variables to set.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: Variables,
    /// Variables to set in the task's own scope.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub local_variables: Variables,
}

/// Report the failure of a locked task.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTaskFailure {
    /// The worker holding the lock.
    pub worker_id: String,
    /// A short description of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// The full failure details, e.g. a stack trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    /// The remaining retries. At zero, an incident is created.
    pub retries: i32,
    /// Milliseconds until the task can be fetched again.
    pub retry_timeout: u64,
}

/// Report a business error, thrown as BPMN error in the process.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTaskBpmnError {
    /// The worker holding the lock.
    pub worker_id: String,
    /// The error code caught by a boundary event.
    pub error_code: String,
    /// An error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Variables passed to the catching event.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: Variables,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtendLock<'a> {
    worker_id: &'a str,
    new_duration: u64,
}

/// External tasks.
#[derive(Clone, Debug)]
pub struct ExternalTaskService {
    client: Client,
}

impl ExternalTaskService {
    pub(crate) fn new(client: Client) -> Self {
        ExternalTaskService { client }
    }

    /// Query external tasks.
    pub fn query(
        &self,
        query: ExternalTaskQuery,
    ) -> QueryResource<ExternalTaskQuery, ExternalTaskInfo> {
        QueryResource::new(self.client.clone(), "/external-task", QueryMethod::Get, query)
    }

    /// Fetch and lock tasks for a worker.
    pub fn fetch_and_lock(&self) -> FetchAndLockBuilder {
        FetchAndLockBuilder::new(self.client.clone())
    }

    /// Set the retries of many tasks at once.
    #[tracing::instrument(skip(self), name = "set_external_task_retries", err)]
    pub async fn set_retries(&self, request: SetRetriesForExternalTasks) -> Result<()> {
        self.client
            .put("/external-task/retries")
            .json(&request)?
            .send_empty()
            .await
    }

    /// An external task by id.
    pub fn by_id(&self, external_task_id: &str) -> ExternalTaskResource {
        ExternalTaskResource {
            client: self.client.clone(),
            path: format!("/external-task/{}", segment(external_task_id)),
        }
    }
}

/// A single external task.
#[derive(Clone, Debug)]
pub struct ExternalTaskResource {
    client: Client,
    path: String,
}

impl ExternalTaskResource {
    /// Retrieve the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_external_task", err)]
    pub async fn get(&self) -> Result<ExternalTaskInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// The details of the last failure.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_external_task_error_details", err)]
    pub async fn error_details(&self) -> Result<String> {
        self.client
            .get(format!("{}/errorDetails", self.path))
            .send_text()
            .await
    }

    /// Complete the task.
    #[tracing::instrument(skip(self, request), fields(path = %self.path, worker_id = %request.worker_id), name = "complete_external_task", err)]
    pub async fn complete(&self, request: &CompleteExternalTask) -> Result<()> {
        self.client
            .post(format!("{}/complete", self.path))
            .json(request)?
            .send_empty()
            .await
    }

    /// Report a failure of the task.
    #[tracing::instrument(skip(self, request), fields(path = %self.path, worker_id = %request.worker_id), name = "handle_external_task_failure", err)]
    pub async fn handle_failure(&self, request: &ExternalTaskFailure) -> Result<()> {
        debug!(retries = request.retries, error_message = ?request.error_message, "reporting failure");
        self.client
            .post(format!("{}/failure", self.path))
            .json(request)?
            .send_empty()
            .await
    }

    /// Report a business error of the task.
    #[tracing::instrument(skip(self, request), fields(path = %self.path, worker_id = %request.worker_id), name = "handle_external_task_bpmn_error", err)]
    pub async fn handle_bpmn_error(&self, request: &ExternalTaskBpmnError) -> Result<()> {
        debug!(error_code = %request.error_code, "reporting bpmn error");
        self.client
            .post(format!("{}/bpmnError", self.path))
            .json(request)?
            .send_empty()
            .await
    }

    /// Release the lock.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "unlock_external_task", err)]
    pub async fn unlock(&self) -> Result<()> {
        self.client
            .post(format!("{}/unlock", self.path))
            .send_empty()
            .await
    }

    /// Extend the lock by `new_duration` milliseconds from now.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "extend_external_task_lock", err)]
    pub async fn extend_lock(&self, worker_id: &str, new_duration: u64) -> Result<()> {
        self.client
            .post(format!("{}/extendLock", self.path))
            .json(&ExtendLock {
                worker_id,
                new_duration,
            })?
            .send_empty()
            .await
    }

    /// Set the remaining retries.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_external_task_retries", err)]
    pub async fn set_retries(&self, retries: i32) -> Result<()> {
        self.client
            .put(format!("{}/retries", self.path))
            .json(&Retries { retries })?
            .send_empty()
            .await
    }

    /// Set the priority.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_external_task_priority", err)]
    pub async fn set_priority(&self, priority: i64) -> Result<()> {
        self.client
            .put(format!("{}/priority", self.path))
            .json(&Priority { priority })?
            .send_empty()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn topic_serializes_only_set_fields() {
        let topic = FetchTopic::new("invoice-archive", 30_000).with_variables(["invoiceId"]);

        assert_eq!(
            serde_json::to_value(&topic).unwrap(),
            json!({
                "topicName": "invoice-archive",
                "lockDuration": 30000,
                "variables": ["invoiceId"]
            })
        );
    }

    #[test]
    fn locked_task_carries_variables() {
        let task: LockedExternalTask = serde_json::from_value(json!({
            "activityId": "anActivityId",
            "activityInstanceId": "anActivityInstanceId",
            "errorMessage": "anErrorMessage",
            "errorDetails": "anErrorDetails",
            "executionId": "anExecutionId",
            "id": "anExternalTaskId",
            "lockExpirationTime": "2015-10-06T16:34:42.000+0200",
            "processDefinitionId": "aProcessDefinitionId",
            "processDefinitionKey": "aProcessDefinitionKey",
            "processInstanceId": "aProcessInstanceId",
            "tenantId": null,
            "retries": 3,
            "workerId": "aWorkerId",
            "priority": 4,
            "topicName": "createOrder",
            "businessKey": "aBusinessKey",
            "variables": {
                "orderId": { "type": "String", "value": "1234", "valueInfo": {} }
            }
        }))
        .unwrap();

        assert_eq!(task.task.id, "anExternalTaskId");
        assert_eq!(task.task.retries, Some(3));
        assert_eq!(task.error_details.as_deref(), Some("anErrorDetails"));
        assert_eq!(task.variables["orderId"].value, json!("1234"));
        assert_eq!(
            task.task.lock_expiration_time.map(|t| crate::date::format(&t)),
            Some("2015-10-06T14:34:42.000+0000".to_owned())
        );
    }
}
