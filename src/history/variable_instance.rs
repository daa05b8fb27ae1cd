use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::VariableValue,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The last known value of a variable, also after its scope ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricVariableInstance {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub value: VariableValue,
    pub process_definition_key: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub activity_instance_id: Option<String>,
    pub case_definition_key: Option<String>,
    pub case_definition_id: Option<String>,
    pub case_instance_id: Option<String>,
    pub case_execution_id: Option<String>,
    pub task_id: Option<String>,
    pub tenant_id: Option<String>,
    pub error_message: Option<String>,
    /// `CREATED` or `DELETED`.
    pub state: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Properties historic variable instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricVariableInstanceSorting {
    /// by process instance id
    InstanceId,
    /// by variable name
    VariableName,
    /// by tenant id
    TenantId,
}

/// Filter for historic variable instances, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricVariableInstanceQuery {
    /// Filter by variable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    /// Filter by variable names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name_like: Option<String>,
    /// Filter by the serialized value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_value: Option<serde_json::Value>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by a list of process instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_id_in: Vec<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by a list of execution ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub execution_id_in: Vec<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
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
    /// Also include deleted variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deleted: Option<bool>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<HistoricVariableInstanceSorting>>,
}

/// Historic variable instances.
#[derive(Clone, Debug)]
pub struct HistoricVariableInstanceService {
    client: Client,
}

impl HistoricVariableInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricVariableInstanceService { client }
    }

    /// Query historic variable instances.
    pub fn query(
        &self,
        query: HistoricVariableInstanceQuery,
        deserialize_values: bool,
    ) -> QueryResource<HistoricVariableInstanceQuery, HistoricVariableInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/variable-instance",
            QueryMethod::Post,
            query,
        )
        .with_param("deserializeValues", deserialize_values)
    }

    /// Retrieve a historic variable instance.
    #[tracing::instrument(skip(self), name = "get_historic_variable_instance", err)]
    pub async fn get(&self, id: &str, deserialize_value: bool) -> Result<HistoricVariableInstance> {
        self.client
            .get(format!("/history/variable-instance/{}", segment(id)))
            .param("deserializeValue", deserialize_value)
            .send()
            .await
    }

    /// The raw content of a `Bytes` or `File` variable.
    #[tracing::instrument(skip(self), name = "get_historic_variable_instance_data", err)]
    pub async fn data(&self, id: &str) -> Result<Vec<u8>> {
        self.client
            .get(format!("/history/variable-instance/{}/data", segment(id)))
            .send_bytes()
            .await
    }
}
