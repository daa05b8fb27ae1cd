use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::VariableValue,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a historic detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricDetailType {
    /// a variable was created, updated or deleted
    VariableUpdate,
    /// a form field was submitted
    FormField,
}

/// A change of a variable or a submitted form field.
///
/// Which of the optional fields are set depends on [`detail_type`].
///
/// [`detail_type`]: HistoricDetail::detail_type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub detail_type: HistoricDetailType,
    pub process_definition_key: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_instance_id: Option<String>,
    pub activity_instance_id: Option<String>,
    pub execution_id: Option<String>,
    pub case_definition_key: Option<String>,
    pub case_definition_id: Option<String>,
    pub case_instance_id: Option<String>,
    pub case_execution_id: Option<String>,
    pub task_id: Option<String>,
    pub tenant_id: Option<String>,
    pub user_operation_id: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub time: Option<DateTime<Utc>>,

    // variable updates
    pub variable_name: Option<String>,
    pub variable_instance_id: Option<String>,
    pub variable_type: Option<String>,
    #[serde(default)]
    pub value: Value,
    pub value_info: Option<serde_json::Map<String, Value>>,
    pub revision: Option<i32>,
    pub error_message: Option<String>,

    // form fields
    pub field_id: Option<String>,
    pub field_value: Option<Value>,
}

impl HistoricDetail {
    /// The value of a variable update as a typed variable value.
    pub fn variable_value(&self) -> Option<VariableValue> {
        if self.detail_type != HistoricDetailType::VariableUpdate {
            return None;
        }
        let variable_type = self
            .variable_type
            .as_deref()
            .and_then(|name| serde_json::from_value(Value::String(name.to_owned())).ok());

        Some(VariableValue {
            value: self.value.clone(),
            variable_type,
            value_info: self.value_info.clone(),
        })
    }
}

/// Properties historic details can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricDetailSorting {
    /// by process instance id
    ProcessInstanceId,
    /// by variable name
    VariableName,
    /// by variable type
    VariableType,
    /// by variable revision
    VariableRevision,
    /// by form field id
    FormPropertyId,
    /// by time
    Time,
    /// by order of occurrence
    Occurrence,
    /// by tenant id
    TenantId,
}

/// Filter for historic details.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDetailQuery {
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Filter by activity instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_instance_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by case execution id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_execution_id: Option<String>,
    /// Filter by variable instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_instance_id: Option<String>,
    /// Filter by a list of variable types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variable_type_in: Vec<String>,
    /// Filter by task id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Filter by user operation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_operation_id: Option<String>,
    /// Only include form field submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<bool>,
    /// Only include variable updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_updates: Option<bool>,
    /// Exclude details of task scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_task_details: Option<bool>,
    /// Only include details which happened after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub occurred_after: Option<DateTime<Utc>>,
    /// Only include details which happened before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub occurred_before: Option<DateTime<Utc>>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricDetailSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic variable updates and form field submissions.
#[derive(Clone, Debug)]
pub struct HistoricDetailService {
    client: Client,
}

impl HistoricDetailService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricDetailService { client }
    }

    /// Query historic details.
    pub fn query(
        &self,
        query: HistoricDetailQuery,
        deserialize_values: bool,
    ) -> QueryResource<HistoricDetailQuery, HistoricDetail> {
        QueryResource::new(
            self.client.clone(),
            "/history/detail",
            QueryMethod::Get,
            query,
        )
        .with_param("deserializeValues", deserialize_values)
    }

    /// Retrieve a historic detail.
    #[tracing::instrument(skip(self), name = "get_historic_detail", err)]
    pub async fn get(&self, id: &str, deserialize_value: bool) -> Result<HistoricDetail> {
        self.client
            .get(format!("/history/detail/{}", segment(id)))
            .param("deserializeValue", deserialize_value)
            .send()
            .await
    }

    /// The raw content of a binary variable update.
    #[tracing::instrument(skip(self), name = "get_historic_detail_data", err)]
    pub async fn data(&self, id: &str) -> Result<Vec<u8>> {
        self.client
            .get(format!("/history/detail/{}/data", segment(id)))
            .send_bytes()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::VariableType;
    use serde_json::json;

    #[test]
    fn variable_updates_expose_typed_value() {
        let detail: HistoricDetail = serde_json::from_value(json!({
            "id": "d1",
            "type": "variableUpdate",
            "processInstanceId": "p1",
            "variableName": "amount",
            "variableType": "Integer",
            "value": 5,
            "valueInfo": {},
            "revision": 2,
            "time": "2015-01-01T10:00:00.000+0000"
        }))
        .unwrap();

        let value = detail.variable_value().unwrap();
        assert_eq!(value.variable_type, Some(VariableType::Integer));
        assert_eq!(value.value, json!(5));
        assert_eq!(detail.revision, Some(2));
    }

    #[test]
    fn form_fields_have_no_variable_value() {
        let detail: HistoricDetail = serde_json::from_value(json!({
            "id": "d2",
            "type": "formField",
            "fieldId": "approved",
            "fieldValue": true
        }))
        .unwrap();

        assert_eq!(detail.detail_type, HistoricDetailType::FormField);
        assert_eq!(detail.field_value, Some(json!(true)));
        assert!(detail.variable_value().is_none());
    }
}
