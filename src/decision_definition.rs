use crate::{
    common::HistoryTimeToLive,
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::Variables,
    Client, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A deployed DMN decision definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDefinitionInfo {
    /// The id of the decision definition.
    pub id: String,
    /// The key of the decision definition.
    pub key: String,
    /// The category of the decision definition.
    pub category: Option<String>,
    /// The name of the decision definition.
    pub name: Option<String>,
    /// The version of the decision definition.
    pub version: i32,
    /// The file name of the decision definition.
    pub resource: Option<String>,
    /// The deployment id of the decision definition.
    pub deployment_id: Option<String>,
    /// The id of the decision requirements definition it belongs to.
    pub decision_requirements_definition_id: Option<String>,
    /// The key of the decision requirements definition it belongs to.
    pub decision_requirements_definition_key: Option<String>,
    /// The tenant id of the decision definition.
    pub tenant_id: Option<String>,
    /// The version tag of the decision definition.
    pub version_tag: Option<String>,
    /// History time to live value of the decision definition.
    pub history_time_to_live: Option<i32>,
}

/// A deployed decision requirements graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequirementsDefinitionInfo {
    /// The id of the decision requirements definition.
    pub id: String,
    /// The key of the decision requirements definition.
    pub key: String,
    /// The name of the decision requirements definition.
    pub name: Option<String>,
    /// The category of the decision requirements definition.
    pub category: Option<String>,
    /// The version of the decision requirements definition.
    pub version: i32,
    /// The file name of the decision requirements definition.
    pub resource: Option<String>,
    /// The deployment id of the decision requirements definition.
    pub deployment_id: Option<String>,
    /// The tenant id of the decision requirements definition.
    pub tenant_id: Option<String>,
}

/// Properties decision definitions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecisionDefinitionSorting {
    /// by category
    Category,
    /// by key
    Key,
    /// by id
    Id,
    /// by name
    Name,
    /// by version
    Version,
    /// by deployment id
    DeploymentId,
    /// by tenant id
    TenantId,
    /// by version tag
    VersionTag,
}

/// Filter for decision definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDefinitionQuery {
    /// Filter by decision definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_definition_id: Option<String>,
    /// Filter by a list of decision definition ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decision_definition_id_in: Vec<String>,
    /// Filter by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Filter by deployment id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    /// Filter by key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Filter by keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_like: Option<String>,
    /// Filter by category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Filter by categories that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_like: Option<String>,
    /// Filter by version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Only include latest versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<bool>,
    /// Filter by resource name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// Filter by resource names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name_like: Option<String>,
    /// Filter by the decision requirements definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_requirements_definition_id: Option<String>,
    /// Filter by the decision requirements definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_requirements_definition_key: Option<String>,
    /// Only include decisions without a requirements definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_decision_requirements_definition: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include decision definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include decision definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_decision_definitions_without_tenant_id: Option<bool>,
    /// Filter by version tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<String>,
    /// Filter by version tags that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_tag_like: Option<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<DecisionDefinitionSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// The DMN XML of a decision definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDefinitionDiagram {
    /// The id of the decision definition.
    pub id: String,
    /// The DMN 1.1 XML.
    pub dmn_xml: String,
}

#[derive(Debug, Serialize)]
struct EvaluateDecision<'a> {
    variables: &'a Variables,
}

/// Decision definitions.
#[derive(Clone, Debug)]
pub struct DecisionDefinitionService {
    client: Client,
}

impl DecisionDefinitionService {
    pub(crate) fn new(client: Client) -> Self {
        DecisionDefinitionService { client }
    }

    /// Query decision definitions.
    pub fn query(
        &self,
        query: DecisionDefinitionQuery,
    ) -> QueryResource<DecisionDefinitionQuery, DecisionDefinitionInfo> {
        QueryResource::new(
            self.client.clone(),
            "/decision-definition",
            QueryMethod::Get,
            query,
        )
    }

    /// A decision definition by id.
    pub fn by_id(&self, decision_definition_id: &str) -> DecisionDefinitionResource {
        self.resource(format!(
            "/decision-definition/{}",
            segment(decision_definition_id)
        ))
    }

    /// The latest version of a decision definition which belongs to no tenant.
    pub fn by_key(&self, decision_definition_key: &str) -> DecisionDefinitionResource {
        self.resource(format!(
            "/decision-definition/key/{}",
            segment(decision_definition_key)
        ))
    }

    /// The latest version of a decision definition which belongs to the given tenant.
    pub fn by_key_and_tenant_id(
        &self,
        decision_definition_key: &str,
        tenant_id: &str,
    ) -> DecisionDefinitionResource {
        self.resource(format!(
            "/decision-definition/key/{}/tenant-id/{}",
            segment(decision_definition_key),
            segment(tenant_id)
        ))
    }

    fn resource(&self, path: String) -> DecisionDefinitionResource {
        DecisionDefinitionResource {
            client: self.client.clone(),
            path,
        }
    }
}

/// A single decision definition.
#[derive(Clone, Debug)]
pub struct DecisionDefinitionResource {
    client: Client,
    path: String,
}

impl DecisionDefinitionResource {
    /// Retrieve the decision definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_decision_definition", err)]
    pub async fn get(&self) -> Result<DecisionDefinitionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Retrieve the DMN XML.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_decision_definition_xml", err)]
    pub async fn xml(&self) -> Result<DecisionDefinitionDiagram> {
        self.client.get(format!("{}/xml", self.path)).send().await
    }

    /// Retrieve the diagram image, if one was deployed.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_decision_definition_diagram", err)]
    pub async fn diagram(&self) -> Result<Vec<u8>> {
        self.client
            .get(format!("{}/diagram", self.path))
            .send_bytes()
            .await
    }

    /// Evaluate the decision. Returns one map of output values per matched rule.
    #[tracing::instrument(skip(self, variables), fields(path = %self.path), name = "evaluate_decision", err)]
    pub async fn evaluate(&self, variables: &Variables) -> Result<Vec<Variables>> {
        debug!(inputs = variables.len(), "evaluating decision");
        self.client
            .post(format!("{}/evaluate", self.path))
            .json(&EvaluateDecision { variables })?
            .send()
            .await
    }

    /// Change how long historic data of this definition is kept.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_history_time_to_live", err)]
    pub async fn update_history_time_to_live(&self, days: Option<i32>) -> Result<()> {
        self.client
            .put(format!("{}/history-time-to-live", self.path))
            .json(&HistoryTimeToLive {
                history_time_to_live: days,
            })?
            .send_empty()
            .await
    }
}
