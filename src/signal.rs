use crate::{
    variables::{VariableValue, Variables},
    Client, Error, Result,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Signal {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    variables: Variables,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    without_tenant_id: Option<bool>,
}

/// Configuration to throw a signal.
#[derive(Debug)]
pub struct ThrowSignalBuilder {
    client: Client,
    name: Option<String>,
    execution_id: Option<String>,
    variables: Variables,
    tenant_id: Option<String>,
    without_tenant_id: Option<bool>,
}

impl ThrowSignalBuilder {
    fn new(client: Client) -> Self {
        ThrowSignalBuilder {
            client,
            name: None,
            execution_id: None,
            variables: Variables::new(),
            tenant_id: None,
            without_tenant_id: None,
        }
    }

    /// Set the name of the signal.
    pub fn with_name<T: Into<String>>(self, name: T) -> Self {
        ThrowSignalBuilder {
            name: Some(name.into()),
            ..self
        }
    }

    /// Only deliver the signal to this execution.
    pub fn with_execution_id<T: Into<String>>(self, execution_id: T) -> Self {
        ThrowSignalBuilder {
            execution_id: Some(execution_id.into()),
            ..self
        }
    }

    /// Pass a variable to the catching events.
    pub fn with_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Only deliver the signal to subscriptions of this tenant.
    pub fn with_tenant_id<T: Into<String>>(self, tenant_id: T) -> Self {
        ThrowSignalBuilder {
            tenant_id: Some(tenant_id.into()),
            ..self
        }
    }

    /// Only deliver the signal to subscriptions which belong to no tenant.
    pub fn without_tenant_id(self) -> Self {
        ThrowSignalBuilder {
            without_tenant_id: Some(true),
            ..self
        }
    }

    /// Submit the signal.
    #[tracing::instrument(skip(self), name = "throw_signal", err)]
    pub async fn send(self) -> Result<()> {
        let name = self
            .name
            .ok_or(Error::InvalidParameters("`name` must be set"))?;
        let req = Signal {
            name,
            execution_id: self.execution_id,
            variables: self.variables,
            tenant_id: self.tenant_id,
            without_tenant_id: self.without_tenant_id,
        };

        debug!(name = %req.name, "throwing signal");
        trace!(?req, "request:");

        self.client.post("/signal").json(&req)?.send_empty().await
    }
}

/// Signals.
#[derive(Clone, Debug)]
pub struct SignalService {
    client: Client,
}

impl SignalService {
    pub(crate) fn new(client: Client) -> Self {
        SignalService { client }
    }

    /// Throw a signal, delivered to all matching signal subscriptions.
    pub fn throw(&self) -> ThrowSignalBuilder {
        ThrowSignalBuilder::new(self.client.clone())
    }
}
