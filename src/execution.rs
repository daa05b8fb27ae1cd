use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::{VariableQueryParameter, VariableResource, Variables},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An execution, i.e. a path of execution through a process instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    /// The id of the execution.
    pub id: String,
    /// The id of the process instance the execution belongs to.
    pub process_instance_id: String,
    /// Whether the execution has ended.
    #[serde(default)]
    pub ended: bool,
    /// The tenant id of the execution.
    pub tenant_id: Option<String>,
}

/// Properties executions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionSorting {
    /// by process instance id
    InstanceId,
    /// by process definition key
    DefinitionKey,
    /// by process definition id
    DefinitionId,
    /// by tenant id
    TenantId,
}

/// Filter for executions, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionQuery {
    /// Filter by the business key of the process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by the activity the execution is waiting in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Only include executions waiting for the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_event_subscription_name: Option<String>,
    /// Only include executions waiting for the signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_event_subscription_name: Option<String>,
    /// Only include active executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Filter by incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Filter by incident type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Filter by incident message. Exact match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
    /// Filter by incident messages that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message_like: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include executions with local variables of certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableQueryParameter>,
    /// Only include executions whose process instance has variables of certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_variables: Vec<VariableQueryParameter>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<ExecutionSorting>>,
}

/// A subscription of an execution for a message or signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionInfo {
    /// The id of the subscription.
    pub id: String,
    /// The type of the event, `message` or `signal`.
    pub event_type: String,
    /// The name of the message or signal.
    pub event_name: String,
    /// The id of the subscribed execution.
    pub execution_id: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: Option<String>,
    /// The id of the activity the subscription belongs to.
    pub activity_id: Option<String>,
    /// When the subscription was created.
    #[serde(default, with = "crate::date::option")]
    pub created_date: Option<DateTime<Utc>>,
    /// The tenant id of the subscription.
    pub tenant_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct TriggerBody<'a> {
    variables: &'a Variables,
}

/// Executions.
#[derive(Clone, Debug)]
pub struct ExecutionService {
    client: Client,
}

impl ExecutionService {
    pub(crate) fn new(client: Client) -> Self {
        ExecutionService { client }
    }

    /// Query executions.
    pub fn query(&self, query: ExecutionQuery) -> QueryResource<ExecutionQuery, ExecutionInfo> {
        QueryResource::new(self.client.clone(), "/execution", QueryMethod::Post, query)
    }

    /// An execution by id.
    pub fn by_id(&self, execution_id: &str) -> ExecutionResource {
        ExecutionResource {
            client: self.client.clone(),
            path: format!("/execution/{}", segment(execution_id)),
        }
    }
}

/// A single execution.
#[derive(Clone, Debug)]
pub struct ExecutionResource {
    client: Client,
    path: String,
}

impl ExecutionResource {
    /// Retrieve the execution.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_execution", err)]
    pub async fn get(&self) -> Result<ExecutionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Signal an execution waiting in a receive task.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "signal_execution", err)]
    pub async fn signal(&self, variables: &Variables) -> Result<()> {
        debug!("signalling execution");
        self.client
            .post(format!("{}/signal", self.path))
            .json(&TriggerBody { variables })?
            .send_empty()
            .await
    }

    /// The variables of the execution's own scope.
    pub fn local_variables(&self) -> VariableResource {
        VariableResource::new(
            self.client.clone(),
            format!("{}/localVariables", self.path),
        )
    }

    /// The subscription of the execution for the named message.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_message_subscription", err)]
    pub async fn message_subscription(&self, message_name: &str) -> Result<EventSubscriptionInfo> {
        self.client
            .get(format!(
                "{}/messageSubscriptions/{}",
                self.path,
                segment(message_name)
            ))
            .send()
            .await
    }

    /// Deliver the named message to this execution.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "trigger_message_subscription", err)]
    pub async fn trigger_message_subscription(
        &self,
        message_name: &str,
        variables: &Variables,
    ) -> Result<()> {
        self.client
            .post(format!(
                "{}/messageSubscriptions/{}/trigger",
                self.path,
                segment(message_name)
            ))
            .json(&TriggerBody { variables })?
            .send_empty()
            .await
    }
}
