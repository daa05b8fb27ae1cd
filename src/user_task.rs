use crate::{
    common::{FormInfo, Link, UserIdBody},
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::{VariableQueryParameter, VariableResource, Variables},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Delegation state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegationState {
    /// The task was delegated and awaits resolution.
    Pending,
    /// The delegated task was resolved by the delegate.
    Resolved,
}

/// A user task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// The id of the task.
    pub id: String,
    /// The name of the task.
    pub name: Option<String>,
    /// The assignee of the task.
    pub assignee: Option<String>,
    /// The owner of the task.
    pub owner: Option<String>,
    /// When the task was created.
    #[serde(default, with = "crate::date::option")]
    pub created: Option<DateTime<Utc>>,
    /// The due date of the task.
    #[serde(default, with = "crate::date::option")]
    pub due: Option<DateTime<Utc>>,
    /// The follow-up date of the task.
    #[serde(default, with = "crate::date::option")]
    pub follow_up: Option<DateTime<Utc>>,
    /// The delegation state of the task.
    pub delegation_state: Option<DelegationState>,
    /// The description of the task.
    pub description: Option<String>,
    /// The id of the execution the task belongs to.
    pub execution_id: Option<String>,
    /// The id of the parent task, if this is a subtask.
    pub parent_task_id: Option<String>,
    /// The priority of the task.
    pub priority: i32,
    /// The id of the process definition the task belongs to.
    pub process_definition_id: Option<String>,
    /// The id of the process instance the task belongs to.
    pub process_instance_id: Option<String>,
    /// The id of the case execution the task belongs to.
    pub case_execution_id: Option<String>,
    /// The id of the case definition the task belongs to.
    pub case_definition_id: Option<String>,
    /// The id of the case instance the task belongs to.
    pub case_instance_id: Option<String>,
    /// The task definition key.
    pub task_definition_key: Option<String>,
    /// Whether the task is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The form key of the task.
    pub form_key: Option<String>,
    /// The tenant id of the task.
    pub tenant_id: Option<String>,
}

/// Properties of a task to create or update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// The id of the task to create; generated if not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The name of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The description of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The assignee of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// The owner of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// The delegation state of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation_state: Option<DelegationState>,
    /// The due date of the task.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// The follow-up date of the task.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<DateTime<Utc>>,
    /// The priority of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// The id of the parent task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    /// The id of the case instance the task belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// The tenant id of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Properties tasks can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSorting {
    /// by process instance id
    InstanceId,
    /// by case instance id
    CaseInstanceId,
    /// by due date
    DueDate,
    /// by follow-up date
    FollowUpDate,
    /// by execution id
    ExecutionId,
    /// by case execution id
    CaseExecutionId,
    /// by assignee
    Assignee,
    /// by creation time
    Created,
    /// by description
    Description,
    /// by task id
    Id,
    /// by name
    Name,
    /// by name, ignoring case
    NameCaseInsensitive,
    /// by priority
    Priority,
    /// by tenant id
    TenantId,
}

/// Filter for tasks, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by the business key of the process instance.
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
    /// Filter by a list of process definition keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_key_in: Vec<String>,
    /// Filter by process definition name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_name: Option<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Only include tasks of the given activity instances.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_instance_id_in: Vec<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include tasks which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Filter by assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Filter by assignees that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_like: Option<String>,
    /// Filter by owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Only include tasks offered to the given group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_group: Option<String>,
    /// Only include tasks offered to one of the given groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidate_groups: Vec<String>,
    /// Only include tasks offered to the given user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_user: Option<String>,
    /// Also include assigned tasks in candidate queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_assigned_tasks: Option<bool>,
    /// Only include tasks the user is involved in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub involved_user: Option<String>,
    /// Only include assigned tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<bool>,
    /// Only include unassigned tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned: Option<bool>,
    /// Filter by task definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition_key: Option<String>,
    /// Filter by a list of task definition keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_definition_key_in: Vec<String>,
    /// Filter by task definition keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition_key_like: Option<String>,
    /// Filter by task name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by task names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Filter by task description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Filter by descriptions that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_like: Option<String>,
    /// Filter by priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Only include tasks with at least this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_priority: Option<i32>,
    /// Only include tasks with at most this priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority: Option<i32>,
    /// Only include tasks due before the given date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub due_before: Option<DateTime<Utc>>,
    /// Only include tasks due after the given date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub due_after: Option<DateTime<Utc>>,
    /// Only include tasks with a follow-up date before the given date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub follow_up_before: Option<DateTime<Utc>>,
    /// Only include tasks created before the given date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    /// Only include tasks created after the given date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    /// Filter by delegation state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation_state: Option<DelegationState>,
    /// Only include tasks which have candidate groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_candidate_groups: Option<bool>,
    /// Only include tasks which have no candidate groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_candidate_groups: Option<bool>,
    /// Only include active tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include tasks that have local variables with certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_variables: Vec<VariableQueryParameter>,
    /// Only include tasks whose process instance has variables with certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_variables: Vec<VariableQueryParameter>,
    /// Only include tasks whose case instance has variables with certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_instance_variables: Vec<VariableQueryParameter>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<TaskSorting>>,
}

/// A comment on a task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// The id of the comment.
    pub id: String,
    /// The user who wrote the comment.
    pub user_id: Option<String>,
    /// The task the comment belongs to.
    pub task_id: String,
    /// When the comment was written.
    #[serde(default, with = "crate::date::option")]
    pub time: Option<DateTime<Utc>>,
    /// The comment text.
    pub message: String,
    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A relation between a task and a user or group, e.g. `candidate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityLink {
    /// The user, if this link refers to a user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The group, if this link refers to a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// The type of the link, e.g. `assignee`, `owner` or `candidate`.
    #[serde(rename = "type")]
    pub link_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteTask<'a> {
    variables: &'a Variables,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    with_variables_in_return: bool,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    message: &'a str,
}

/// User tasks.
#[derive(Clone, Debug)]
pub struct UserTaskService {
    client: Client,
}

impl UserTaskService {
    pub(crate) fn new(client: Client) -> Self {
        UserTaskService { client }
    }

    /// Query tasks.
    pub fn query(&self, query: TaskQuery) -> QueryResource<TaskQuery, TaskInfo> {
        QueryResource::new(self.client.clone(), "/task", QueryMethod::Post, query)
    }

    /// Create a standalone task.
    #[tracing::instrument(skip(self), name = "create_task", err)]
    pub async fn create(&self, task: TaskUpdate) -> Result<()> {
        self.client
            .post("/task/create")
            .json(&task)?
            .send_empty()
            .await
    }

    /// A task by id.
    pub fn by_id(&self, task_id: &str) -> UserTaskResource {
        UserTaskResource {
            client: self.client.clone(),
            path: format!("/task/{}", segment(task_id)),
        }
    }
}

/// A single task.
#[derive(Clone, Debug)]
pub struct UserTaskResource {
    client: Client,
    path: String,
}

impl UserTaskResource {
    /// Retrieve the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_task", err)]
    pub async fn get(&self) -> Result<TaskInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Update the task. Unset properties are cleared on the engine side.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_task", err)]
    pub async fn update(&self, task: TaskUpdate) -> Result<()> {
        self.client
            .put(self.path.as_str())
            .json(&task)?
            .send_empty()
            .await
    }

    /// Delete a standalone task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_task", err)]
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.path.as_str()).send_empty().await
    }

    /// Claim the task for a user.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "claim_task", err)]
    pub async fn claim(&self, user_id: &str) -> Result<()> {
        self.client
            .post(format!("{}/claim", self.path))
            .json(&UserIdBody { user_id })?
            .send_empty()
            .await
    }

    /// Reset the assignee of the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "unclaim_task", err)]
    pub async fn unclaim(&self) -> Result<()> {
        self.client
            .post(format!("{}/unclaim", self.path))
            .send_empty()
            .await
    }

    /// Complete the task, setting the given process variables.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "complete_task", err)]
    pub async fn complete(&self, variables: &Variables) -> Result<()> {
        trace!(?variables, "completing task");
        self.client
            .post(format!("{}/complete", self.path))
            .json(&CompleteTask {
                variables,
                with_variables_in_return: false,
            })?
            .send_empty()
            .await
    }

    /// Complete the task and return the process variables afterwards.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "complete_task", err)]
    pub async fn complete_with_variables_in_return(
        &self,
        variables: &Variables,
    ) -> Result<Variables> {
        trace!(?variables, "completing task");
        self.client
            .post(format!("{}/complete", self.path))
            .json(&CompleteTask {
                variables,
                with_variables_in_return: true,
            })?
            .send()
            .await
    }

    /// Complete the task by submitting its form.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "submit_task_form", err)]
    pub async fn submit_form(&self, variables: &Variables) -> Result<()> {
        self.client
            .post(format!("{}/submit-form", self.path))
            .json(&CompleteTask {
                variables,
                with_variables_in_return: false,
            })?
            .send_empty()
            .await
    }

    /// Resolve a delegated task, handing it back to its owner.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "resolve_task", err)]
    pub async fn resolve(&self, variables: &Variables) -> Result<()> {
        self.client
            .post(format!("{}/resolve", self.path))
            .json(&CompleteTask {
                variables,
                with_variables_in_return: false,
            })?
            .send_empty()
            .await
    }

    /// Delegate the task to another user.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delegate_task", err)]
    pub async fn delegate(&self, user_id: &str) -> Result<()> {
        self.client
            .post(format!("{}/delegate", self.path))
            .json(&UserIdBody { user_id })?
            .send_empty()
            .await
    }

    /// Change the assignee without the checks a claim performs.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "set_task_assignee", err)]
    pub async fn set_assignee(&self, user_id: &str) -> Result<()> {
        self.client
            .post(format!("{}/assignee", self.path))
            .json(&UserIdBody { user_id })?
            .send_empty()
            .await
    }

    /// The form key of the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_task_form", err)]
    pub async fn form(&self) -> Result<FormInfo> {
        self.client.get(format!("{}/form", self.path)).send().await
    }

    /// The form variables, optionally restricted to some names.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_task_form_variables", err)]
    pub async fn form_variables(&self, variable_names: &[&str]) -> Result<Variables> {
        let request = self.client.get(format!("{}/form-variables", self.path));
        let request = if variable_names.is_empty() {
            request
        } else {
            request.param("variableNames", variable_names.join(","))
        };
        request.send().await
    }

    /// The rendered HTML of an embedded task form.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_rendered_task_form", err)]
    pub async fn rendered_form(&self) -> Result<String> {
        self.client
            .get(format!("{}/rendered-form", self.path))
            .send_text()
            .await
    }

    /// The variables visible from the task.
    pub fn variables(&self) -> VariableResource {
        VariableResource::new(self.client.clone(), format!("{}/variables", self.path))
    }

    /// The variables of the task's own scope.
    pub fn local_variables(&self) -> VariableResource {
        VariableResource::new(
            self.client.clone(),
            format!("{}/localVariables", self.path),
        )
    }

    /// All comments on the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_task_comments", err)]
    pub async fn comments(&self) -> Result<Vec<Comment>> {
        self.client.get(format!("{}/comment", self.path)).send().await
    }

    /// A single comment on the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_task_comment", err)]
    pub async fn comment(&self, comment_id: &str) -> Result<Comment> {
        self.client
            .get(format!("{}/comment/{}", self.path, segment(comment_id)))
            .send()
            .await
    }

    /// Add a comment to the task.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "add_task_comment", err)]
    pub async fn add_comment(&self, message: &str) -> Result<Comment> {
        self.client
            .post(format!("{}/comment/create", self.path))
            .json(&CommentBody { message })?
            .send()
            .await
    }

    /// The identity links of the task, optionally of one type only.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_identity_links", err)]
    pub async fn identity_links(&self, link_type: Option<&str>) -> Result<Vec<IdentityLink>> {
        self.client
            .get(format!("{}/identity-links", self.path))
            .param_opt("type", link_type)
            .send()
            .await
    }

    /// Add an identity link.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "add_identity_link", err)]
    pub async fn add_identity_link(&self, link: &IdentityLink) -> Result<()> {
        debug!(?link, "adding identity link");
        self.client
            .post(format!("{}/identity-links", self.path))
            .json(link)?
            .send_empty()
            .await
    }

    /// Remove an identity link.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_identity_link", err)]
    pub async fn delete_identity_link(&self, link: &IdentityLink) -> Result<()> {
        debug!(?link, "deleting identity link");
        self.client
            .post(format!("{}/identity-links/delete", self.path))
            .json(link)?
            .send_empty()
            .await
    }
}
