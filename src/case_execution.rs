use crate::{
    params::segment,
    process_instance::TriggerVariableValue,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::{VariableQueryParameter, VariableResource, VariableValue},
    Client, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A case execution, i.e. a stage, task or milestone of a case instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExecutionInfo {
    /// The id of the case execution.
    pub id: String,
    /// The id of the case instance.
    pub case_instance_id: String,
    /// The id of the case definition.
    pub case_definition_id: Option<String>,
    /// The id of the activity.
    pub activity_id: Option<String>,
    /// The name of the activity.
    pub activity_name: Option<String>,
    /// The type of the activity, e.g. `humanTask`.
    pub activity_type: Option<String>,
    /// The description of the activity.
    pub activity_description: Option<String>,
    /// The id of the parent case execution.
    pub parent_id: Option<String>,
    /// The tenant id of the case execution.
    pub tenant_id: Option<String>,
    /// Whether the case execution is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the case execution is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Whether the case execution is active.
    #[serde(default)]
    pub active: bool,
    /// Whether the case execution is disabled.
    #[serde(default)]
    pub disabled: bool,
}

/// Properties case executions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseExecutionSorting {
    /// by case execution id
    CaseExecutionId,
    /// by case definition key
    CaseDefinitionKey,
    /// by case definition id
    CaseDefinitionId,
    /// by tenant id
    TenantId,
}

/// Filter for case executions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExecutionQuery {
    /// Filter by case execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_execution_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by the business key of the case instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
    /// Filter by case definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_id: Option<String>,
    /// Filter by case definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_key: Option<String>,
    /// Filter by activity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Only include required executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Only include repeatable executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeatable: Option<bool>,
    /// Only include executions which are repetitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition: Option<bool>,
    /// Only include active executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include enabled executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Only include disabled executions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include executions with matching local variables.
    #[serde(
        serialize_with = "crate::params::comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variables: Vec<VariableQueryParameter>,
    /// Only include executions whose case instance has matching variables.
    #[serde(
        serialize_with = "crate::params::comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub case_instance_variables: Vec<VariableQueryParameter>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<CaseExecutionSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// A variable removed during a state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeletion {
    /// The name of the variable.
    pub name: String,
    /// Delete the variable from the execution's own scope only.
    #[serde(default)]
    pub local: bool,
}

/// Variable changes applied with a state transition of a case execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExecutionTransition {
    /// Variables to set.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, TriggerVariableValue>,
    /// Variables to delete.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<VariableDeletion>,
}

impl CaseExecutionTransition {
    /// Set a variable, optionally in the execution's own scope.
    pub fn with_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
        local: bool,
    ) -> Self {
        self.variables.insert(
            name.into(),
            TriggerVariableValue {
                value: value.into(),
                local: Some(local),
            },
        );
        self
    }

    /// Delete a variable, optionally from the execution's own scope only.
    pub fn with_deletion<N: Into<String>>(mut self, name: N, local: bool) -> Self {
        self.deletions.push(VariableDeletion {
            name: name.into(),
            local,
        });
        self
    }
}

/// Case executions.
#[derive(Clone, Debug)]
pub struct CaseExecutionService {
    client: Client,
}

impl CaseExecutionService {
    pub(crate) fn new(client: Client) -> Self {
        CaseExecutionService { client }
    }

    /// Query case executions.
    pub fn query(
        &self,
        query: CaseExecutionQuery,
    ) -> QueryResource<CaseExecutionQuery, CaseExecutionInfo> {
        QueryResource::new(self.client.clone(), "/case-execution", QueryMethod::Get, query)
    }

    /// A case execution by id.
    pub fn by_id(&self, case_execution_id: &str) -> CaseExecutionResource {
        CaseExecutionResource {
            client: self.client.clone(),
            path: format!("/case-execution/{}", segment(case_execution_id)),
        }
    }
}

/// A single case execution.
#[derive(Clone, Debug)]
pub struct CaseExecutionResource {
    client: Client,
    path: String,
}

impl CaseExecutionResource {
    /// Retrieve the case execution.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_case_execution", err)]
    pub async fn get(&self) -> Result<CaseExecutionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    async fn transition(&self, transition: &str, body: &CaseExecutionTransition) -> Result<()> {
        debug!(transition, path = %self.path, "case execution transition");
        self.client
            .post(format!("{}/{}", self.path, transition))
            .json(body)?
            .send_empty()
            .await
    }

    /// Start an enabled case execution manually.
    #[tracing::instrument(skip(self, body), fields(path = %self.path), name = "manual_start_case_execution", err)]
    pub async fn manual_start(&self, body: &CaseExecutionTransition) -> Result<()> {
        self.transition("manual-start", body).await
    }

    /// Complete an active case execution.
    #[tracing::instrument(skip(self, body), fields(path = %self.path), name = "complete_case_execution", err)]
    pub async fn complete(&self, body: &CaseExecutionTransition) -> Result<()> {
        self.transition("complete", body).await
    }

    /// Disable an enabled case execution.
    #[tracing::instrument(skip(self, body), fields(path = %self.path), name = "disable_case_execution", err)]
    pub async fn disable(&self, body: &CaseExecutionTransition) -> Result<()> {
        self.transition("disable", body).await
    }

    /// Re-enable a disabled case execution.
    #[tracing::instrument(skip(self, body), fields(path = %self.path), name = "reenable_case_execution", err)]
    pub async fn reenable(&self, body: &CaseExecutionTransition) -> Result<()> {
        self.transition("reenable", body).await
    }

    /// Terminate an active case execution.
    #[tracing::instrument(skip(self, body), fields(path = %self.path), name = "terminate_case_execution", err)]
    pub async fn terminate(&self, body: &CaseExecutionTransition) -> Result<()> {
        self.transition("terminate", body).await
    }

    /// The variables visible from the case execution.
    pub fn variables(&self) -> VariableResource {
        VariableResource::new(self.client.clone(), format!("{}/variables", self.path))
    }

    /// The variables of the case execution's own scope.
    pub fn local_variables(&self) -> VariableResource {
        VariableResource::new(
            self.client.clone(),
            format!("{}/localVariables", self.path),
        )
    }
}
