use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::{VariableQueryParameter, VariableValue},
    Client, Result,
};
use serde::{Deserialize, Serialize};

/// A variable together with the scope it lives in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInstanceInfo {
    /// The id of the variable instance.
    pub id: String,
    /// The name of the variable.
    pub name: String,
    /// The typed value.
    #[serde(flatten)]
    pub value: VariableValue,
    /// The id of the process instance.
    pub process_instance_id: Option<String>,
    /// The id of the execution.
    pub execution_id: Option<String>,
    /// The id of the case instance.
    pub case_instance_id: Option<String>,
    /// The id of the case execution.
    pub case_execution_id: Option<String>,
    /// The id of the task.
    pub task_id: Option<String>,
    /// The id of the activity instance.
    pub activity_instance_id: Option<String>,
    /// The tenant id of the variable.
    pub tenant_id: Option<String>,
    /// Why the value could not be deserialized, if it could not.
    pub error_message: Option<String>,
}

/// Properties variable instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableInstanceSorting {
    /// by name
    VariableName,
    /// by type
    VariableType,
    /// by activity instance id
    ActivityInstanceId,
    /// by tenant id
    TenantId,
}

/// Filter for variable instances, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInstanceQuery {
    /// Filter by variable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    /// Filter by variable names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name_like: Option<String>,
    /// Filter by a list of process instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_id_in: Vec<String>,
    /// Filter by a list of execution ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub execution_id_in: Vec<String>,
    /// Filter by a list of case instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_instance_id_in: Vec<String>,
    /// Filter by a list of case execution ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_execution_id_in: Vec<String>,
    /// Filter by a list of task ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_id_in: Vec<String>,
    /// Filter by a list of activity instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_instance_id_in: Vec<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include variables with certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variable_values: Vec<VariableQueryParameter>,
    /// Match variable names case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_names_ignore_case: Option<bool>,
    /// Match variable values case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_values_ignore_case: Option<bool>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<VariableInstanceSorting>>,
}

/// Variable instances across all scopes.
#[derive(Clone, Debug)]
pub struct VariableInstanceService {
    client: Client,
}

impl VariableInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        VariableInstanceService { client }
    }

    /// Query variable instances. With `deserialize_values` off, object values
    /// are returned in their serialized form.
    pub fn query(
        &self,
        query: VariableInstanceQuery,
        deserialize_values: bool,
    ) -> QueryResource<VariableInstanceQuery, VariableInstanceInfo> {
        QueryResource::new(
            self.client.clone(),
            "/variable-instance",
            QueryMethod::Post,
            query,
        )
        .with_param("deserializeValues", deserialize_values)
    }

    /// Retrieve a variable instance.
    #[tracing::instrument(skip(self), name = "get_variable_instance", err)]
    pub async fn get(&self, id: &str, deserialize_value: bool) -> Result<VariableInstanceInfo> {
        self.client
            .get(format!("/variable-instance/{}", segment(id)))
            .param("deserializeValue", deserialize_value)
            .send()
            .await
    }

    /// The raw content of a `Bytes` or `File` variable instance.
    #[tracing::instrument(skip(self), name = "get_variable_instance_data", err)]
    pub async fn data(&self, id: &str) -> Result<Vec<u8>> {
        self.client
            .get(format!("/variable-instance/{}/data", segment(id)))
            .send_bytes()
            .await
    }
}
