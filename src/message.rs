use crate::{
    execution::ExecutionInfo,
    process_instance::ProcessInstanceInfo,
    variables::{VariableValue, Variables},
    Client, Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// What a correlated message triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCorrelationResultType {
    /// A waiting execution received the message.
    Execution,
    /// A new process instance was started.
    ProcessDefinition,
}

/// The outcome of correlating a message, returned when results are requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCorrelationResult {
    /// What the message triggered.
    pub result_type: MessageCorrelationResultType,
    /// The execution which received the message.
    pub execution: Option<ExecutionInfo>,
    /// The started process instance.
    pub process_instance: Option<ProcessInstanceInfo>,
    /// The process variables, if requested.
    #[serde(default)]
    pub variables: Variables,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CorrelationMessage {
    message_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    without_tenant_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    process_instance_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    correlation_keys: Variables,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    local_correlation_keys: Variables,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    process_variables: Variables,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    process_variables_local: Variables,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    all: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    result_enabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    variables_in_result_enabled: bool,
}

/// Configuration to correlate a message.
#[derive(Debug)]
pub struct CorrelateMessageBuilder {
    client: Client,
    name: Option<String>,
    message: CorrelationMessage,
}

impl CorrelateMessageBuilder {
    fn new(client: Client) -> Self {
        CorrelateMessageBuilder {
            client,
            name: None,
            message: CorrelationMessage::default(),
        }
    }

    /// Set the name of the message.
    pub fn with_name<T: Into<String>>(self, name: T) -> Self {
        CorrelateMessageBuilder {
            name: Some(name.into()),
            ..self
        }
    }

    /// Only correlate with the process instance of this business key.
    pub fn with_business_key<T: Into<String>>(mut self, business_key: T) -> Self {
        self.message.business_key = Some(business_key.into());
        self
    }

    /// Only correlate with subscriptions of this tenant.
    pub fn with_tenant_id<T: Into<String>>(mut self, tenant_id: T) -> Self {
        self.message.tenant_id = Some(tenant_id.into());
        self
    }

    /// Only correlate with subscriptions which belong to no tenant.
    pub fn without_tenant_id(mut self) -> Self {
        self.message.without_tenant_id = Some(true);
        self
    }

    /// Only correlate with this process instance.
    pub fn with_process_instance_id<T: Into<String>>(mut self, process_instance_id: T) -> Self {
        self.message.process_instance_id = Some(process_instance_id.into());
        self
    }

    /// Only correlate with process instances which have this variable value.
    pub fn with_correlation_key<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.message
            .correlation_keys
            .insert(name.into(), value.into());
        self
    }

    /// Only correlate with executions which have this local variable value.
    pub fn with_local_correlation_key<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.message
            .local_correlation_keys
            .insert(name.into(), value.into());
        self
    }

    /// Set a process variable when the message is delivered.
    pub fn with_process_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.message
            .process_variables
            .insert(name.into(), value.into());
        self
    }

    /// Set a variable in the receiving execution's own scope.
    pub fn with_local_process_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.message
            .process_variables_local
            .insert(name.into(), value.into());
        self
    }

    /// Deliver the message to all matching subscriptions instead of exactly one.
    pub fn to_all(mut self) -> Self {
        self.message.all = true;
        self
    }

    /// Submit the correlation request.
    #[tracing::instrument(skip(self), name = "correlate_message", err)]
    pub async fn send(self) -> Result<()> {
        let (client, message) = self.into_message()?;
        client.post("/message").json(&message)?.send_empty().await
    }

    /// Submit the correlation request and return what the message triggered.
    #[tracing::instrument(skip(self), name = "correlate_message", err)]
    pub async fn send_with_result(
        self,
        variables_in_result: bool,
    ) -> Result<Vec<MessageCorrelationResult>> {
        let (client, mut message) = self.into_message()?;
        message.result_enabled = true;
        message.variables_in_result_enabled = variables_in_result;
        client.post("/message").json(&message)?.send().await
    }

    fn into_message(self) -> Result<(Client, CorrelationMessage)> {
        let message_name = self
            .name
            .ok_or(Error::InvalidParameters("`name` must be set"))?;
        let message = CorrelationMessage {
            message_name,
            ..self.message
        };

        debug!(name = %message.message_name, business_key = ?message.business_key, "correlating message");
        trace!(?message, "request:");
        Ok((self.client, message))
    }
}

/// Message correlation.
#[derive(Clone, Debug)]
pub struct MessageService {
    client: Client,
}

impl MessageService {
    pub(crate) fn new(client: Client) -> Self {
        MessageService { client }
    }

    /// Correlate a message with a waiting execution or a message start event.
    pub fn correlate(&self) -> CorrelateMessageBuilder {
        CorrelateMessageBuilder::new(self.client.clone())
    }
}
