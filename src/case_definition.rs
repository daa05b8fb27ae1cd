use crate::{
    common::{HistoryTimeToLive, Link},
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::{VariableValue, Variables},
    Client, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A deployed CMMN case definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDefinitionInfo {
    /// The id of the case definition.
    pub id: String,
    /// The key of the case definition.
    pub key: String,
    /// The category of the case definition.
    pub category: Option<String>,
    /// The name of the case definition.
    pub name: Option<String>,
    /// The version of the case definition.
    pub version: i32,
    /// The file name of the case definition.
    pub resource: Option<String>,
    /// The deployment id of the case definition.
    pub deployment_id: Option<String>,
    /// The tenant id of the case definition.
    pub tenant_id: Option<String>,
    /// History time to live value of the case definition.
    pub history_time_to_live: Option<i32>,
}

/// A case instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseInstanceInfo {
    /// The id of the case instance.
    pub id: String,
    /// The id of the case definition.
    pub case_definition_id: String,
    /// The business key of the case instance.
    pub business_key: Option<String>,
    /// The tenant id of the case instance.
    pub tenant_id: Option<String>,
    /// Whether the case instance is active.
    #[serde(default)]
    pub active: bool,
    /// Whether the case instance is completed.
    #[serde(default)]
    pub completed: bool,
    /// Whether the case instance is terminated.
    #[serde(default)]
    pub terminated: bool,
    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Properties case definitions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseDefinitionSorting {
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
}

/// Filter for case definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDefinitionQuery {
    /// Filter by case definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_id: Option<String>,
    /// Filter by a list of case definition ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_definition_id_in: Vec<String>,
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
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include case definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include case definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_case_definitions_without_tenant_id: Option<bool>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<CaseDefinitionSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// The CMMN XML of a case definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDefinitionDiagram {
    /// The id of the case definition.
    pub id: String,
    /// The CMMN 1.1 XML.
    pub cmmn_xml: String,
}

/// Create a case instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseInstance {
    /// The variables of the new instance.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: Variables,
    /// The business key of the new instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
}

impl CreateCaseInstance {
    /// Set a variable of the new instance.
    pub fn with_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Case definitions.
#[derive(Clone, Debug)]
pub struct CaseDefinitionService {
    client: Client,
}

impl CaseDefinitionService {
    pub(crate) fn new(client: Client) -> Self {
        CaseDefinitionService { client }
    }

    /// Query case definitions.
    pub fn query(
        &self,
        query: CaseDefinitionQuery,
    ) -> QueryResource<CaseDefinitionQuery, CaseDefinitionInfo> {
        QueryResource::new(self.client.clone(), "/case-definition", QueryMethod::Get, query)
    }

    /// A case definition by id.
    pub fn by_id(&self, case_definition_id: &str) -> CaseDefinitionResource {
        self.resource(format!("/case-definition/{}", segment(case_definition_id)))
    }

    /// The latest version of a case definition which belongs to no tenant.
    pub fn by_key(&self, case_definition_key: &str) -> CaseDefinitionResource {
        self.resource(format!("/case-definition/key/{}", segment(case_definition_key)))
    }

    /// The latest version of a case definition which belongs to the given tenant.
    pub fn by_key_and_tenant_id(
        &self,
        case_definition_key: &str,
        tenant_id: &str,
    ) -> CaseDefinitionResource {
        self.resource(format!(
            "/case-definition/key/{}/tenant-id/{}",
            segment(case_definition_key),
            segment(tenant_id)
        ))
    }

    fn resource(&self, path: String) -> CaseDefinitionResource {
        CaseDefinitionResource {
            client: self.client.clone(),
            path,
        }
    }
}

/// A single case definition.
#[derive(Clone, Debug)]
pub struct CaseDefinitionResource {
    client: Client,
    path: String,
}

impl CaseDefinitionResource {
    /// Retrieve the case definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_case_definition", err)]
    pub async fn get(&self) -> Result<CaseDefinitionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Retrieve the CMMN XML.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_case_definition_xml", err)]
    pub async fn xml(&self) -> Result<CaseDefinitionDiagram> {
        self.client.get(format!("{}/xml", self.path)).send().await
    }

    /// Retrieve the diagram image, if one was deployed.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_case_definition_diagram", err)]
    pub async fn diagram(&self) -> Result<Vec<u8>> {
        self.client
            .get(format!("{}/diagram", self.path))
            .send_bytes()
            .await
    }

    /// Create a new case instance.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "create_case_instance", err)]
    pub async fn create_case_instance(
        &self,
        request: CreateCaseInstance,
    ) -> Result<CaseInstanceInfo> {
        self.client
            .post(format!("{}/create", self.path))
            .json(&request)?
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
