use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::VariableValue,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An input of an evaluated decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDecisionInputInstance {
    pub id: String,
    pub decision_instance_id: String,
    pub clause_id: Option<String>,
    pub clause_name: Option<String>,
    #[serde(flatten)]
    pub value: VariableValue,
    pub error_message: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
}

/// An output of an evaluated decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDecisionOutputInstance {
    pub id: String,
    pub decision_instance_id: String,
    pub clause_id: Option<String>,
    pub clause_name: Option<String>,
    pub rule_id: Option<String>,
    pub rule_order: Option<i32>,
    pub variable_name: Option<String>,
    #[serde(flatten)]
    pub value: VariableValue,
    pub error_message: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
}

/// A single evaluation of a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDecisionInstance {
    pub id: String,
    pub decision_definition_id: String,
    pub decision_definition_key: Option<String>,
    pub decision_definition_name: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub evaluation_time: Option<DateTime<Utc>>,
    pub process_definition_id: Option<String>,
    pub process_definition_key: Option<String>,
    pub process_instance_id: Option<String>,
    pub case_definition_id: Option<String>,
    pub case_definition_key: Option<String>,
    pub case_instance_id: Option<String>,
    pub activity_id: Option<String>,
    pub activity_instance_id: Option<String>,
    pub user_id: Option<String>,
    /// Only present when requested with `include_inputs`.
    pub inputs: Option<Vec<HistoricDecisionInputInstance>>,
    /// Only present when requested with `include_outputs`.
    pub outputs: Option<Vec<HistoricDecisionOutputInstance>>,
    pub collect_result_value: Option<f64>,
    pub root_decision_instance_id: Option<String>,
    pub decision_requirements_definition_id: Option<String>,
    pub decision_requirements_definition_key: Option<String>,
    pub tenant_id: Option<String>,
}

/// Properties historic decision instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricDecisionInstanceSorting {
    /// by evaluation time
    EvaluationTime,
    /// by tenant id
    TenantId,
}

/// What to include when fetching decision instances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionInstanceOptions {
    /// Include the evaluated inputs.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_inputs: bool,
    /// Include the evaluated outputs.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_outputs: bool,
    /// Do not fetch the content of binary inputs and outputs.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_binary_fetching: bool,
    /// Return object values in their serialized form.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_custom_object_deserialization: bool,
}

/// Filter for historic decision instances.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricDecisionInstanceQuery {
    /// Filter by decision instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_instance_id: Option<String>,
    /// Filter by a list of decision instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decision_instance_id_in: Vec<String>,
    /// Filter by decision definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_definition_id: Option<String>,
    /// Filter by decision definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_definition_key: Option<String>,
    /// Filter by decision definition name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_definition_name: Option<String>,
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by process instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by a list of activity ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_id_in: Vec<String>,
    /// Only include instances evaluated before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub evaluated_before: Option<DateTime<Utc>>,
    /// Only include instances evaluated after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub evaluated_after: Option<DateTime<Utc>>,
    /// Filter by the user who evaluated the decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Only include root decision instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_decision_instances_only: Option<bool>,
    /// Filter by the root decision instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_decision_instance_id: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricDecisionInstanceSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic decision instances.
#[derive(Clone, Debug)]
pub struct HistoricDecisionInstanceService {
    client: Client,
}

impl HistoricDecisionInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricDecisionInstanceService { client }
    }

    /// Query historic decision instances.
    pub fn query(
        &self,
        query: HistoricDecisionInstanceQuery,
        options: DecisionInstanceOptions,
    ) -> QueryResource<HistoricDecisionInstanceQuery, HistoricDecisionInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/decision-instance",
            QueryMethod::Get,
            query,
        )
        .with_params(&options)
    }

    /// Retrieve a historic decision instance.
    #[tracing::instrument(skip(self), name = "get_historic_decision_instance", err)]
    pub async fn get(
        &self,
        id: &str,
        options: DecisionInstanceOptions,
    ) -> Result<HistoricDecisionInstance> {
        self.client
            .get(format!("/history/decision-instance/{}", segment(id)))
            .query(&options)?
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::query_pairs;
    use crate::variables::VariableType;
    use serde_json::json;

    #[test]
    fn only_enabled_options_are_sent() {
        let options = DecisionInstanceOptions {
            include_inputs: true,
            ..Default::default()
        };

        assert_eq!(
            query_pairs(&options).unwrap(),
            vec![("includeInputs".to_owned(), "true".to_owned())]
        );
    }

    #[test]
    fn parses_inputs_and_outputs() {
        let instance: HistoricDecisionInstance = serde_json::from_value(json!({
            "id": "d1",
            "decisionDefinitionId": "dish:1:abc",
            "evaluationTime": "2017-02-02T10:11:12.000+0100",
            "inputs": [{
                "id": "i1",
                "decisionInstanceId": "d1",
                "clauseId": "season",
                "type": "String",
                "value": "Winter",
                "valueInfo": {}
            }],
            "outputs": [{
                "id": "o1",
                "decisionInstanceId": "d1",
                "variableName": "dish",
                "ruleOrder": 1,
                "type": "String",
                "value": "Stew",
                "valueInfo": {}
            }]
        }))
        .unwrap();

        let inputs = instance.inputs.unwrap();
        assert_eq!(inputs[0].value.variable_type, Some(VariableType::String));
        assert_eq!(inputs[0].value.value, json!("Winter"));
        assert_eq!(instance.outputs.unwrap()[0].rule_order, Some(1));
        assert!(instance.evaluation_time.is_some());
    }
}
